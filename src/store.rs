use remote_authority::{Credentials, Identity, RemoteAuthority, RemoteError, Role};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::AuthenticateError;
use crate::failure::login_failure_message;
use crate::state::SessionState;

/// Single source of truth for who is currently authenticated.
///
/// Every state write is one synchronous `watch` update and no borrow of the
/// state is held across an `.await`. Operations therefore interleave only at
/// their remote calls. Overlapping `authenticate` calls are not serialized:
/// the last remote response to resolve decides the final state.
#[derive(Debug)]
pub struct SessionStore<R> {
    remote: R,
    state: watch::Sender<SessionState>,
}

impl<R: RemoteAuthority> SessionStore<R> {
    pub fn new(remote: R) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self { remote, state }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state.borrow().busy
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.borrow().last_error.clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.borrow().is_logged_in()
    }

    pub fn is_admin(&self) -> bool {
        self.state.borrow().is_admin()
    }

    pub fn is_user(&self) -> bool {
        self.state.borrow().is_user()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.state.borrow().has_role(role)
    }

    /// Probes the authority for the session behind the ambient credential.
    ///
    /// Any failure leaves the store logged out. Nothing is surfaced to the
    /// caller and `last_error` is never touched.
    pub async fn acquire_from_existing_credentials(&self) -> Option<Identity> {
        let identity = match self.remote.fetch_current_identity().await {
            Ok(identity) => {
                debug!(
                    username = identity.username(),
                    role = %identity.role(),
                    "existing session confirmed"
                );
                Some(identity)
            }
            Err(RemoteError::NoSession) => {
                debug!("no existing session");
                None
            }
            Err(error) => {
                debug!(%error, "session probe failed");
                None
            }
        };

        self.state.send_if_modified(|state| {
            if state.identity == identity {
                return false;
            }
            state.identity = identity.clone();
            true
        });
        identity
    }

    /// Submits credentials and adopts the identity the authority grants.
    ///
    /// On failure the current identity is kept, the derived message is stored
    /// as `last_error` and returned in the error. `busy` is reset on every
    /// exit path, including when the returned future is dropped.
    pub async fn authenticate(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Identity, AuthenticateError> {
        let credentials = Credentials::new(username, password);
        self.state.send_modify(|state| {
            state.busy = true;
            state.last_error = None;
        });
        let _busy = BusyGuard { state: &self.state };

        info!(username = credentials.username(), "authenticating");
        match self.remote.submit_credentials(&credentials).await {
            Ok(identity) => {
                info!(
                    username = identity.username(),
                    role = %identity.role(),
                    "authenticated"
                );
                self.state.send_modify(|state| {
                    state.identity = Some(identity.clone());
                    state.busy = false;
                });
                Ok(identity)
            }
            Err(source) => {
                let message = login_failure_message(&source);
                warn!(
                    username = credentials.username(),
                    error = %source,
                    "authentication failed"
                );
                self.state.send_modify(|state| {
                    state.last_error = Some(message.clone());
                    state.busy = false;
                });
                Err(AuthenticateError::new(message, source))
            }
        }
    }

    /// Revokes the remote session and clears the local identity.
    ///
    /// The local clear does not depend on the remote outcome and still
    /// happens if the returned future is dropped.
    pub async fn deauthenticate(&self) {
        let _clear = ClearIdentityGuard { state: &self.state };

        match self.remote.revoke_session().await {
            Ok(()) => info!("remote session revoked"),
            Err(error) => warn!(%error, "remote revoke failed, clearing local session anyway"),
        }
    }
}

struct BusyGuard<'a> {
    state: &'a watch::Sender<SessionState>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state
            .send_if_modified(|state| std::mem::replace(&mut state.busy, false));
    }
}

struct ClearIdentityGuard<'a> {
    state: &'a watch::Sender<SessionState>,
}

impl Drop for ClearIdentityGuard<'_> {
    fn drop(&mut self) {
        self.state
            .send_if_modified(|state| state.identity.take().is_some());
    }
}
