//! Auth state and configuration.

use std::sync::Arc;

use super::clock::{Clock, SystemClock};
use super::credentials::{CredentialVerifier, DigestCredentialVerifier};
use crate::api::notify::{LogNotifier, Notifier};

const DEFAULT_RESET_TOKEN_TTL_SECONDS: i64 = 60 * 60;
const DEFAULT_VERIFICATION_TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;
const DEFAULT_SESSION_COOKIE_TTL_SECONDS: i64 = 12 * 60 * 60;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    frontend_base_url: String,
    reset_token_ttl_seconds: i64,
    verification_token_ttl_seconds: i64,
    session_cookie_ttl_seconds: i64,
}

impl AuthConfig {
    #[must_use]
    pub fn new(frontend_base_url: String) -> Self {
        Self {
            frontend_base_url,
            reset_token_ttl_seconds: DEFAULT_RESET_TOKEN_TTL_SECONDS,
            verification_token_ttl_seconds: DEFAULT_VERIFICATION_TOKEN_TTL_SECONDS,
            session_cookie_ttl_seconds: DEFAULT_SESSION_COOKIE_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_reset_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.reset_token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_verification_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.verification_token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_session_cookie_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_cookie_ttl_seconds = seconds;
        self
    }

    pub(crate) fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    pub(super) fn reset_token_ttl_seconds(&self) -> i64 {
        self.reset_token_ttl_seconds
    }

    pub(super) fn verification_token_ttl_seconds(&self) -> i64 {
        self.verification_token_ttl_seconds
    }

    /// Cookie `Max-Age` only; server-side validity is not time-bound, a
    /// session lives until it is superseded or cleared.
    pub(super) fn session_cookie_ttl_seconds(&self) -> i64 {
        self.session_cookie_ttl_seconds
    }

    pub(super) fn session_cookie_secure(&self) -> bool {
        self.frontend_base_url.starts_with("https://")
    }
}

pub struct AuthState {
    config: AuthConfig,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    credentials: Arc<dyn CredentialVerifier>,
}

impl AuthState {
    #[must_use]
    pub fn new(
        config: AuthConfig,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            config,
            clock,
            notifier,
            credentials,
        }
    }

    /// Production wiring: wall clock, log-only notifier, digest verifier.
    #[must_use]
    pub fn with_defaults(config: AuthConfig) -> Self {
        Self::new(
            config,
            Arc::new(SystemClock),
            Arc::new(LogNotifier),
            Arc::new(DigestCredentialVerifier),
        )
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub(super) fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    pub(super) fn credentials(&self) -> &dyn CredentialVerifier {
        self.credentials.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthConfig, AuthState};

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = AuthConfig::new("https://dashboard.tld".to_string());

        assert_eq!(config.frontend_base_url(), "https://dashboard.tld");
        assert_eq!(
            config.reset_token_ttl_seconds(),
            super::DEFAULT_RESET_TOKEN_TTL_SECONDS
        );
        assert_eq!(
            config.verification_token_ttl_seconds(),
            super::DEFAULT_VERIFICATION_TOKEN_TTL_SECONDS
        );
        assert_eq!(
            config.session_cookie_ttl_seconds(),
            super::DEFAULT_SESSION_COOKIE_TTL_SECONDS
        );
        assert!(config.session_cookie_secure());

        let config = config
            .with_reset_token_ttl_seconds(120)
            .with_verification_token_ttl_seconds(300)
            .with_session_cookie_ttl_seconds(600);

        assert_eq!(config.reset_token_ttl_seconds(), 120);
        assert_eq!(config.verification_token_ttl_seconds(), 300);
        assert_eq!(config.session_cookie_ttl_seconds(), 600);
    }

    #[test]
    fn plain_http_frontend_disables_secure_cookies() {
        let config = AuthConfig::new("http://localhost:3000".to_string());
        assert!(!config.session_cookie_secure());
    }

    #[test]
    fn auth_state_default_wiring_constructs() {
        let state = AuthState::with_defaults(AuthConfig::new("https://dashboard.tld".to_string()));
        assert_eq!(state.config().frontend_base_url(), "https://dashboard.tld");
    }
}
