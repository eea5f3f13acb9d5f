use remote_authority::{Credentials, Identity};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a Credentials> for LoginRequest<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self {
            username: credentials.username(),
            password: credentials.expose_password(),
        }
    }
}

/// Body of the current-identity endpoint. A `null` or missing user means no
/// session is attached to the ambient credential.
#[derive(Debug, Deserialize)]
pub(crate) struct CurrentIdentityResponse {
    #[serde(default)]
    pub user: Option<Identity>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// New-account request for the authority's registration endpoint.
#[derive(Debug)]
pub struct Registration {
    username: String,
    password: SecretString,
    email: Option<String>,
    phone: Option<String>,
}

impl Registration {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
            email: None,
            phone: None,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
}

impl<'a> From<&'a Registration> for RegisterRequest<'a> {
    fn from(registration: &'a Registration) -> Self {
        Self {
            username: &registration.username,
            password: registration.password.expose_secret(),
            email: registration.email.as_deref().unwrap_or_default(),
            phone: registration.phone.as_deref().unwrap_or_default(),
        }
    }
}
