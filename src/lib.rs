//! Client-side authentication session store.
//!
//! [`SessionStore`] holds the current [`Identity`] together with the `busy`
//! and `last_error` flags, reconciles them against a [`RemoteAuthority`], and
//! exposes role predicates for route guards and views. Transport lives behind
//! the `RemoteAuthority` trait; see the `remote_authority_http` crate for the
//! HTTP implementation.

mod error;
mod failure;
mod state;
mod store;

pub use error::AuthenticateError;
pub use failure::{login_failure_message, LOGIN_FAILED_MESSAGE};
pub use remote_authority::{Credentials, Identity, RemoteAuthority, RemoteError, Role};
pub use state::SessionState;
pub use store::SessionStore;
