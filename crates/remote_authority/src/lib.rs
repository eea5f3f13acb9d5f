//! Minimal transport-agnostic contract for talking to a remote authority.
//!
//! This crate defines only the identity model and the three request/response
//! operations a session store sequences. It excludes transport details, wire
//! payloads, and any local session state.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of roles an authenticated principal can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Returns the wire name of the role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an identity cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("username must not be empty")]
    EmptyUsername,
}

/// Authenticated principal.
///
/// Valid by construction: holding an `Identity` proves the username is
/// non-empty and the role is known. Identities are replaced wholesale, never
/// patched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IdentityFields")]
pub struct Identity {
    username: String,
    role: Role,
}

#[derive(Deserialize)]
struct IdentityFields {
    username: String,
    role: Role,
}

impl Identity {
    /// Creates an identity, rejecting blank usernames.
    pub fn new(username: impl Into<String>, role: Role) -> Result<Self, IdentityError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(IdentityError::EmptyUsername);
        }
        Ok(Self { username, role })
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }
}

impl TryFrom<IdentityFields> for Identity {
    type Error = IdentityError;

    fn try_from(fields: IdentityFields) -> Result<Self, Self::Error> {
        Self::new(fields.username, fields.role)
    }
}

/// Username/password pair submitted to the authority.
///
/// The password is redacted from `Debug` output.
#[derive(Debug)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Exposes the raw password for request serialization only.
    #[must_use]
    pub fn expose_password(&self) -> &str {
        self.password.expose_secret()
    }
}

/// Failure reported by a remote authority operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The authority answered but reports no current identity.
    #[error("no active session")]
    NoSession,

    /// Non-success status, optionally carrying the server's `error` text.
    #[error("request rejected (status {status}){}", message_suffix(.message))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    /// The request never produced a response (connect, timeout, reset).
    #[error("transport failure: {0}")]
    Transport(String),

    /// A success response whose body does not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl RemoteError {
    /// Returns the server-supplied message when one is present and non-blank.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|message| format!(": {message}"))
        .unwrap_or_default()
}

/// Request/response channel to the source of truth for authentication.
///
/// Implementations own all transport concerns, including the ambient
/// credential (for example a session cookie) that `fetch_current_identity`
/// and `revoke_session` rely on.
pub trait RemoteAuthority: Send + Sync {
    /// Asks the authority who the ambient credential belongs to.
    fn fetch_current_identity(
        &self,
    ) -> impl Future<Output = Result<Identity, RemoteError>> + Send;

    /// Submits credentials and returns the identity the authority granted.
    fn submit_credentials(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Identity, RemoteError>> + Send;

    /// Revokes the ambient session on the authority side.
    fn revoke_session(&self) -> impl Future<Output = Result<(), RemoteError>> + Send;
}

impl<T: RemoteAuthority> RemoteAuthority for Arc<T> {
    fn fetch_current_identity(
        &self,
    ) -> impl Future<Output = Result<Identity, RemoteError>> + Send {
        (**self).fetch_current_identity()
    }

    fn submit_credentials(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Identity, RemoteError>> + Send {
        (**self).submit_credentials(credentials)
    }

    fn revoke_session(&self) -> impl Future<Output = Result<(), RemoteError>> + Send {
        (**self).revoke_session()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::{Credentials, Identity, IdentityError, RemoteAuthority, RemoteError, Role};

    struct FixedAuthority;

    impl RemoteAuthority for FixedAuthority {
        async fn fetch_current_identity(&self) -> Result<Identity, RemoteError> {
            Err(RemoteError::NoSession)
        }

        async fn submit_credentials(
            &self,
            credentials: &Credentials,
        ) -> Result<Identity, RemoteError> {
            Identity::new(credentials.username(), Role::User)
                .map_err(|error| RemoteError::MalformedResponse(error.to_string()))
        }

        async fn revoke_session(&self) -> Result<(), RemoteError> {
            Ok(())
        }
    }

    #[test]
    fn identity_rejects_blank_username() {
        assert_eq!(
            Identity::new("", Role::User),
            Err(IdentityError::EmptyUsername)
        );
        assert_eq!(
            Identity::new("   ", Role::Admin),
            Err(IdentityError::EmptyUsername)
        );
    }

    #[test]
    fn identity_exposes_username_and_role() {
        let identity = Identity::new("alice", Role::Admin).expect("valid identity");
        assert_eq!(identity.username(), "alice");
        assert_eq!(identity.role(), Role::Admin);
    }

    #[test]
    fn identity_deserializes_lowercase_roles() {
        let identity: Identity =
            serde_json::from_value(json!({"username": "bob", "role": "user"}))
                .expect("user role should decode");
        assert_eq!(identity.role(), Role::User);

        let identity: Identity =
            serde_json::from_value(json!({"username": "root", "role": "admin"}))
                .expect("admin role should decode");
        assert_eq!(identity.role(), Role::Admin);
    }

    #[test]
    fn identity_deserialization_rejects_unknown_role_and_blank_username() {
        assert!(serde_json::from_value::<Identity>(json!({"username": "x", "role": "owner"}))
            .is_err());
        assert!(serde_json::from_value::<Identity>(json!({"username": "", "role": "user"}))
            .is_err());
        assert!(serde_json::from_value::<Identity>(json!({"username": "x"})).is_err());
    }

    #[test]
    fn identity_ignores_extra_profile_fields() {
        let identity: Identity = serde_json::from_value(json!({
            "id": 3,
            "username": "carol",
            "role": "user",
            "email": "carol@example.com",
            "is_active": true,
        }))
        .expect("extra fields are ignored");
        assert_eq!(identity.username(), "carol");
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let credentials = Credentials::new("alice", "hunter2");
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
        assert_eq!(credentials.expose_password(), "hunter2");
    }

    #[test]
    fn server_message_only_reports_non_blank_rejections() {
        let rejected = RemoteError::Rejected {
            status: 401,
            message: Some("invalid credentials".to_string()),
        };
        assert_eq!(rejected.server_message(), Some("invalid credentials"));

        let blank = RemoteError::Rejected {
            status: 401,
            message: Some("  ".to_string()),
        };
        assert_eq!(blank.server_message(), None);

        assert_eq!(
            RemoteError::Transport("connection refused".to_string()).server_message(),
            None
        );
        assert_eq!(RemoteError::NoSession.server_message(), None);
    }

    #[test]
    fn rejected_display_includes_status_and_message() {
        let with_message = RemoteError::Rejected {
            status: 403,
            message: Some("account is disabled".to_string()),
        };
        assert_eq!(
            with_message.to_string(),
            "request rejected (status 403): account is disabled"
        );

        let without_message = RemoteError::Rejected {
            status: 500,
            message: None,
        };
        assert_eq!(without_message.to_string(), "request rejected (status 500)");
    }

    #[tokio::test]
    async fn arc_forwards_every_operation() {
        let authority = Arc::new(FixedAuthority);

        assert_eq!(
            authority.fetch_current_identity().await,
            Err(RemoteError::NoSession)
        );
        let identity = authority
            .submit_credentials(&Credentials::new("dave", "pw"))
            .await
            .expect("fixed authority accepts any credentials");
        assert_eq!(identity.username(), "dave");
        assert_eq!(authority.revoke_session().await, Ok(()));
    }
}
