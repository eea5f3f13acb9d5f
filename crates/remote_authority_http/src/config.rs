use std::env;
use std::time::Duration;

use crate::endpoint::DEFAULT_BASE_URL;
use crate::error::HttpAuthorityError;

pub const BASE_URL_ENV_VAR: &str = "AUTH_SESSION_BASE_URL";
pub const TIMEOUT_ENV_VAR: &str = "AUTH_SESSION_TIMEOUT_MS";
pub const USER_AGENT_ENV_VAR: &str = "AUTH_SESSION_USER_AGENT";

/// Transport configuration for remote authority requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityConfig {
    /// Base URL the `auth/*` endpoints are resolved against.
    pub base_url: String,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Optional whole-request timeout. No timeout is applied when unset.
    pub timeout: Option<Duration>,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: None,
            timeout: None,
        }
    }
}

impl AuthorityConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reads configuration from the process environment.
    ///
    /// Blank variables are treated as unset. A timeout that is not a positive
    /// integer number of milliseconds is rejected.
    pub fn from_env() -> Result<Self, HttpAuthorityError> {
        let mut config = Self::default();

        if let Some(base_url) = env_string_opt(BASE_URL_ENV_VAR) {
            config = config.with_base_url(base_url);
        }

        if let Some(user_agent) = env_string_opt(USER_AGENT_ENV_VAR) {
            config = config.with_user_agent(user_agent);
        }

        if let Some(raw) = env_string_opt(TIMEOUT_ENV_VAR) {
            config = config.with_timeout(parse_timeout_ms(TIMEOUT_ENV_VAR, &raw)?);
        }

        Ok(config)
    }
}

/// Parses a positive millisecond count into a [`Duration`].
pub fn parse_timeout_ms(key: &'static str, raw: &str) -> Result<Duration, HttpAuthorityError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(HttpAuthorityError::InvalidConfig {
            key,
            message: "timeout must be greater than zero".to_string(),
        }),
        Ok(millis) => Ok(Duration::from_millis(millis)),
        Err(error) => Err(HttpAuthorityError::InvalidConfig {
            key,
            message: format!("'{raw}' is not a millisecond count: {error}"),
        }),
    }
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    use super::*;

    struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .expect("env lock poisoned")
    }

    fn set_env_guard(key: &'static str, value: Option<&str>) -> EnvGuard {
        let previous = env::var(key).ok();
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
        EnvGuard { key, previous }
    }

    #[test]
    fn env_defaults_match_default_config() {
        let _lock = env_lock();
        let _g1 = set_env_guard(BASE_URL_ENV_VAR, None);
        let _g2 = set_env_guard(TIMEOUT_ENV_VAR, None);
        let _g3 = set_env_guard(USER_AGENT_ENV_VAR, None);

        let config = AuthorityConfig::from_env().expect("defaults are valid");
        assert_eq!(config, AuthorityConfig::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.timeout.is_none());
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn env_values_override_defaults() {
        let _lock = env_lock();
        let _g1 = set_env_guard(BASE_URL_ENV_VAR, Some("https://parking.example.com/api"));
        let _g2 = set_env_guard(TIMEOUT_ENV_VAR, Some("2500"));
        let _g3 = set_env_guard(USER_AGENT_ENV_VAR, Some("session-shell/0.1"));

        let config = AuthorityConfig::from_env().expect("env config is valid");
        assert_eq!(config.base_url, "https://parking.example.com/api");
        assert_eq!(config.timeout, Some(Duration::from_millis(2500)));
        assert_eq!(config.user_agent.as_deref(), Some("session-shell/0.1"));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let _lock = env_lock();
        let _g1 = set_env_guard(BASE_URL_ENV_VAR, Some("   "));
        let _g2 = set_env_guard(TIMEOUT_ENV_VAR, Some(""));
        let _g3 = set_env_guard(USER_AGENT_ENV_VAR, None);

        let config = AuthorityConfig::from_env().expect("blank values are ignored");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.timeout.is_none());
    }

    #[test]
    fn invalid_timeout_is_a_config_error() {
        let _lock = env_lock();
        let _g1 = set_env_guard(BASE_URL_ENV_VAR, None);
        let _g2 = set_env_guard(TIMEOUT_ENV_VAR, Some("soon"));
        let _g3 = set_env_guard(USER_AGENT_ENV_VAR, None);

        let error = AuthorityConfig::from_env().expect_err("non-numeric timeout must fail");
        assert!(matches!(
            error,
            HttpAuthorityError::InvalidConfig { key, .. } if key == TIMEOUT_ENV_VAR
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let error = parse_timeout_ms(TIMEOUT_ENV_VAR, "0").expect_err("zero timeout must fail");
        assert_eq!(
            error.to_string(),
            "invalid configuration value for AUTH_SESSION_TIMEOUT_MS: timeout must be greater than zero"
        );
    }

    #[test]
    fn builders_chain() {
        let config = AuthorityConfig::new("http://127.0.0.1:9000/api")
            .with_timeout(Duration::from_secs(3))
            .with_user_agent("tests");

        assert_eq!(config.base_url, "http://127.0.0.1:9000/api");
        assert_eq!(config.timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.user_agent.as_deref(), Some("tests"));
    }
}
