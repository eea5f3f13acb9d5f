use url::Url;

use crate::error::HttpAuthorityError;

/// Default base URL for remote authority requests.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

pub const CURRENT_IDENTITY_PATH: &str = "auth/me";
pub const LOGIN_PATH: &str = "auth/login";
pub const LOGOUT_PATH: &str = "auth/logout";
pub const REGISTER_PATH: &str = "auth/register";

/// Normalize a base URL so relative endpoint paths join beneath it.
///
/// Normalization rules:
/// 1) blank input falls back to [`DEFAULT_BASE_URL`]
/// 2) query and fragment are dropped
/// 3) the path always ends in `/`
pub fn normalize_base_url(input: &str) -> Result<Url, HttpAuthorityError> {
    let base = if input.trim().is_empty() {
        DEFAULT_BASE_URL
    } else {
        input.trim()
    };

    let mut url = Url::parse(base)
        .map_err(|error| HttpAuthorityError::InvalidBaseUrl(format!("{base}: {error}")))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(HttpAuthorityError::InvalidBaseUrl(format!(
            "{base}: expected an http(s) URL"
        )));
    }

    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// Fully resolved endpoint URLs for one authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub current_identity: Url,
    pub login: Url,
    pub logout: Url,
    pub register: Url,
}

impl Endpoints {
    pub fn resolve(base_url: &str) -> Result<Self, HttpAuthorityError> {
        let base = normalize_base_url(base_url)?;
        let join = |path: &str| {
            base.join(path)
                .map_err(|error| HttpAuthorityError::InvalidBaseUrl(format!("{path}: {error}")))
        };

        Ok(Self {
            current_identity: join(CURRENT_IDENTITY_PATH)?,
            login: join(LOGIN_PATH)?,
            logout: join(LOGOUT_PATH)?,
            register: join(REGISTER_PATH)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_base_url_uses_default() {
        let url = normalize_base_url("  ").expect("default base is valid");
        assert_eq!(url.as_str(), "http://localhost:5000/api/");
    }

    #[test]
    fn trailing_slash_is_added_once() {
        assert_eq!(
            normalize_base_url("https://example.com/api")
                .expect("valid")
                .as_str(),
            "https://example.com/api/"
        );
        assert_eq!(
            normalize_base_url("https://example.com/api/")
                .expect("valid")
                .as_str(),
            "https://example.com/api/"
        );
    }

    #[test]
    fn query_and_fragment_are_dropped() {
        let url = normalize_base_url("https://example.com/api?x=1#top").expect("valid");
        assert_eq!(url.as_str(), "https://example.com/api/");
    }

    #[test]
    fn non_http_base_urls_are_rejected() {
        assert!(matches!(
            normalize_base_url("mailto:someone@example.com"),
            Err(HttpAuthorityError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            normalize_base_url("ftp://example.com/api"),
            Err(HttpAuthorityError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(HttpAuthorityError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn endpoints_resolve_beneath_base_path() {
        let endpoints = Endpoints::resolve("http://127.0.0.1:5000/api").expect("valid base");

        assert_eq!(
            endpoints.current_identity.as_str(),
            "http://127.0.0.1:5000/api/auth/me"
        );
        assert_eq!(endpoints.login.as_str(), "http://127.0.0.1:5000/api/auth/login");
        assert_eq!(endpoints.logout.as_str(), "http://127.0.0.1:5000/api/auth/logout");
        assert_eq!(
            endpoints.register.as_str(),
            "http://127.0.0.1:5000/api/auth/register"
        );
    }

    #[test]
    fn endpoints_resolve_at_host_root() {
        let endpoints = Endpoints::resolve("http://auth.internal").expect("valid base");
        assert_eq!(endpoints.login.as_str(), "http://auth.internal/auth/login");
    }
}
