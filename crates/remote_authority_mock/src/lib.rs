//! Deterministic scripted implementation of the `remote_authority` contract.
//!
//! This crate contains no transport logic and is intended for session-store
//! tests and local development. Outcomes are queued per operation and can be
//! held back behind a release gate so callers decide the order in which
//! overlapping calls resolve.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use remote_authority::{Credentials, Identity, RemoteAuthority, RemoteError};
use tokio::sync::oneshot;

/// One observed call against the scripted authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorityCall {
    FetchCurrentIdentity,
    SubmitCredentials { username: String },
    RevokeSession,
}

/// Releases a gated outcome so the waiting call can resolve.
#[derive(Debug)]
pub struct ReleaseHandle {
    sender: oneshot::Sender<()>,
}

impl ReleaseHandle {
    pub fn release(self) {
        let _ = self.sender.send(());
    }
}

#[derive(Debug)]
struct Scripted<T> {
    outcome: Result<T, RemoteError>,
    gate: Option<oneshot::Receiver<()>>,
}

impl<T> Scripted<T> {
    fn immediate(outcome: Result<T, RemoteError>) -> Self {
        Self {
            outcome,
            gate: None,
        }
    }

    fn gated(outcome: Result<T, RemoteError>) -> (Self, ReleaseHandle) {
        let (sender, receiver) = oneshot::channel();
        (
            Self {
                outcome,
                gate: Some(receiver),
            },
            ReleaseHandle { sender },
        )
    }
}

#[derive(Debug, Default)]
struct ScriptState {
    fetch: VecDeque<Scripted<Identity>>,
    submit: VecDeque<Scripted<Identity>>,
    revoke: VecDeque<Scripted<()>>,
    calls: Vec<AuthorityCall>,
}

/// Scripted authority whose outcomes are consumed in FIFO order per operation.
///
/// Calls with no scripted outcome left fail with [`RemoteError::Transport`].
#[derive(Debug, Default)]
pub struct ScriptedAuthority {
    state: Mutex<ScriptState>,
}

impl ScriptedAuthority {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_fetch(&self, outcome: Result<Identity, RemoteError>) {
        lock_unpoisoned(&self.state)
            .fetch
            .push_back(Scripted::immediate(outcome));
    }

    #[must_use]
    pub fn push_fetch_gated(&self, outcome: Result<Identity, RemoteError>) -> ReleaseHandle {
        let (scripted, handle) = Scripted::gated(outcome);
        lock_unpoisoned(&self.state).fetch.push_back(scripted);
        handle
    }

    pub fn push_submit(&self, outcome: Result<Identity, RemoteError>) {
        lock_unpoisoned(&self.state)
            .submit
            .push_back(Scripted::immediate(outcome));
    }

    #[must_use]
    pub fn push_submit_gated(&self, outcome: Result<Identity, RemoteError>) -> ReleaseHandle {
        let (scripted, handle) = Scripted::gated(outcome);
        lock_unpoisoned(&self.state).submit.push_back(scripted);
        handle
    }

    pub fn push_revoke(&self, outcome: Result<(), RemoteError>) {
        lock_unpoisoned(&self.state)
            .revoke
            .push_back(Scripted::immediate(outcome));
    }

    #[must_use]
    pub fn push_revoke_gated(&self, outcome: Result<(), RemoteError>) -> ReleaseHandle {
        let (scripted, handle) = Scripted::gated(outcome);
        lock_unpoisoned(&self.state).revoke.push_back(scripted);
        handle
    }

    /// Returns every call observed so far, in arrival order.
    #[must_use]
    pub fn calls(&self) -> Vec<AuthorityCall> {
        lock_unpoisoned(&self.state).calls.clone()
    }

    /// Number of scripted outcomes not yet consumed across all operations.
    #[must_use]
    pub fn remaining(&self) -> usize {
        let state = lock_unpoisoned(&self.state);
        state.fetch.len() + state.submit.len() + state.revoke.len()
    }

    fn next<T>(
        &self,
        call: AuthorityCall,
        queue: impl FnOnce(&mut ScriptState) -> &mut VecDeque<Scripted<T>>,
    ) -> Option<Scripted<T>> {
        let mut state = lock_unpoisoned(&self.state);
        state.calls.push(call);
        queue(&mut state).pop_front()
    }
}

async fn resolve<T>(scripted: Option<Scripted<T>>, operation: &str) -> Result<T, RemoteError> {
    let Some(scripted) = scripted else {
        return Err(RemoteError::Transport(format!(
            "unscripted {operation} call"
        )));
    };

    if let Some(gate) = scripted.gate {
        // A dropped handle releases the call as well.
        let _ = gate.await;
    }

    scripted.outcome
}

impl RemoteAuthority for ScriptedAuthority {
    async fn fetch_current_identity(&self) -> Result<Identity, RemoteError> {
        let scripted = self.next(AuthorityCall::FetchCurrentIdentity, |state| {
            &mut state.fetch
        });
        resolve(scripted, "fetch_current_identity").await
    }

    async fn submit_credentials(&self, credentials: &Credentials) -> Result<Identity, RemoteError> {
        let scripted = self.next(
            AuthorityCall::SubmitCredentials {
                username: credentials.username().to_string(),
            },
            |state| &mut state.submit,
        );
        resolve(scripted, "submit_credentials").await
    }

    async fn revoke_session(&self) -> Result<(), RemoteError> {
        let scripted = self.next(AuthorityCall::RevokeSession, |state| &mut state.revoke);
        resolve(scripted, "revoke_session").await
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
