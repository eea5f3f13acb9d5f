use remote_authority::{Credentials, Identity, RemoteAuthority, RemoteError};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::AuthorityConfig;
use crate::endpoint::Endpoints;
use crate::error::{parse_error_message, transport_error, HttpAuthorityError};
use crate::payload::{
    CurrentIdentityResponse, LoginRequest, MessageResponse, RegisterRequest, Registration,
};

/// HTTP-backed remote authority.
///
/// The underlying client keeps a cookie store, so the session cookie issued
/// by a successful login is the ambient credential for later calls.
#[derive(Debug)]
pub struct HttpAuthorityClient {
    http: Client,
    config: AuthorityConfig,
    endpoints: Endpoints,
}

impl HttpAuthorityClient {
    pub fn new(config: AuthorityConfig) -> Result<Self, HttpAuthorityError> {
        let endpoints = Endpoints::resolve(&config.base_url)?;

        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = config.user_agent.as_deref() {
            builder = builder.user_agent(user_agent.to_string());
        }
        let http = builder.build().map_err(HttpAuthorityError::ClientBuild)?;

        Ok(Self {
            http,
            config,
            endpoints,
        })
    }

    pub fn config(&self) -> &AuthorityConfig {
        &self.config
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Creates a new account. Returns the authority's confirmation message.
    ///
    /// Registration does not sign the new account in.
    pub async fn register(&self, registration: &Registration) -> Result<String, RemoteError> {
        let request = self
            .http
            .post(self.endpoints.register.clone())
            .json(&RegisterRequest::from(registration));
        let body = self.send(request, "register").await?;
        let response: MessageResponse = decode(&body, "register")?;

        Ok(response
            .message
            .unwrap_or_else(|| format!("registered {}", registration.username())))
    }

    /// Sends a request and returns the body of a success response.
    async fn send(
        &self,
        request: RequestBuilder,
        operation: &'static str,
    ) -> Result<String, RemoteError> {
        let response = request.send().await.map_err(|error| {
            warn!(operation, %error, "authority request failed before a response");
            transport_error(error)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if status.is_success() {
            debug!(operation, status = status.as_u16(), "authority request succeeded");
            return Ok(body);
        }

        let message = parse_error_message(&body);
        debug!(
            operation,
            status = status.as_u16(),
            server_message = message.as_deref().unwrap_or(""),
            "authority rejected request"
        );
        Err(RemoteError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

fn decode<T: DeserializeOwned>(body: &str, operation: &'static str) -> Result<T, RemoteError> {
    serde_json::from_str(body)
        .map_err(|error| RemoteError::MalformedResponse(format!("{operation}: {error}")))
}

impl RemoteAuthority for HttpAuthorityClient {
    async fn fetch_current_identity(&self) -> Result<Identity, RemoteError> {
        let request = self.http.get(self.endpoints.current_identity.clone());
        let body = self.send(request, "fetch_current_identity").await?;
        let response: CurrentIdentityResponse = decode(&body, "fetch_current_identity")?;

        response.user.ok_or(RemoteError::NoSession)
    }

    async fn submit_credentials(&self, credentials: &Credentials) -> Result<Identity, RemoteError> {
        let request = self
            .http
            .post(self.endpoints.login.clone())
            .json(&LoginRequest::from(credentials));
        let body = self.send(request, "submit_credentials").await?;

        decode(&body, "submit_credentials")
    }

    async fn revoke_session(&self) -> Result<(), RemoteError> {
        let request = self.http.post(self.endpoints.logout.clone());
        self.send(request, "revoke_session").await.map(|_| ())
    }
}
