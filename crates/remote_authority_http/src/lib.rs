//! HTTP transport for the `remote_authority` contract.
//!
//! This crate owns endpoint resolution, request/response payloads, and error
//! body parsing for the authority's `auth/*` routes. It holds the ambient
//! session cookie but contains no local session state; that lives in the
//! session store that drives it.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod payload;

pub use client::HttpAuthorityClient;
pub use config::AuthorityConfig;
pub use endpoint::{normalize_base_url, Endpoints, DEFAULT_BASE_URL};
pub use error::{parse_error_message, HttpAuthorityError};
pub use payload::Registration;
