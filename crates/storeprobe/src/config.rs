//! Run configuration, loaded from YAML.
//!
//! ```yaml
//! base_url: https://www.saucedemo.com/
//! wait:
//!   timeout_ms: 10000
//!   poll_interval_ms: 100
//! matching: strict
//! fail_fast: false
//! credentials:
//!   username: standard_user
//!   password: secret_sauce
//! browser:
//!   headless: true
//! ```
//!
//! Every key is optional.

use crate::browser::BrowserConfig;
use crate::result::{ProbeError, ProbeResult};
use crate::scenario::Credentials;
use crate::wait::{MatchPolicy, WaitPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Store opened by default
pub const DEFAULT_BASE_URL: &str = "https://www.saucedemo.com/";

/// Configuration for a scenario run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Page opened at the start of every scenario
    pub base_url: String,
    /// Element wait policy
    pub wait: WaitPolicy,
    /// Treatment of locators matching several elements
    pub matching: MatchPolicy,
    /// Stop after the first failing scenario
    pub fail_fast: bool,
    /// Sign in before every scenario when set
    pub credentials: Option<Credentials>,
    /// Browser launch options
    pub browser: BrowserConfig,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            wait: WaitPolicy::default(),
            matching: MatchPolicy::default(),
            fail_fast: false,
            credentials: None,
            browser: BrowserConfig::default(),
        }
    }
}

impl ProbeConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a YAML document
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or fails validation.
    pub fn from_yaml_str(yaml: &str) -> ProbeResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> ProbeResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Render as YAML
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> ProbeResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` describing the first problem found.
    pub fn validate(&self) -> ProbeResult<()> {
        self.wait.validate()?;
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ProbeError::invalid_config(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if let Some(credentials) = &self.credentials {
            if credentials.username.is_empty() {
                return Err(ProbeError::invalid_config("credentials.username is empty"));
            }
        }
        Ok(())
    }

    /// Set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set wait policy
    #[must_use]
    pub const fn with_wait(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }

    /// Set match policy
    #[must_use]
    pub const fn with_matching(mut self, matching: MatchPolicy) -> Self {
        self.matching = matching;
        self
    }

    /// Set fail fast
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Set sign-in credentials
    #[must_use]
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Set browser options
    #[must_use]
    pub fn with_browser(mut self, browser: BrowserConfig) -> Self {
        self.browser = browser;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_empty_document_is_default() {
            assert_eq!(ProbeConfig::from_yaml_str("{}").unwrap(), ProbeConfig::default());
        }

        #[test]
        fn test_partial_document() {
            let config = ProbeConfig::from_yaml_str(
                "base_url: http://localhost:8080/\nwait:\n  timeout_ms: 2000\nmatching: first\n",
            )
            .unwrap();
            assert_eq!(config.base_url, "http://localhost:8080/");
            assert_eq!(config.wait.timeout_ms, 2000);
            assert_eq!(config.wait.poll_interval_ms, WaitPolicy::default().poll_interval_ms);
            assert_eq!(config.matching, MatchPolicy::First);
            assert!(config.browser.headless);
        }

        #[test]
        fn test_yaml_round_trip() {
            let config = ProbeConfig::new()
                .with_credentials("standard_user", "secret_sauce")
                .with_fail_fast(true);
            let yaml = config.to_yaml().unwrap();
            assert_eq!(ProbeConfig::from_yaml_str(&yaml).unwrap(), config);
        }

        #[test]
        fn test_load_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("storeprobe.yaml");
            std::fs::write(&path, "fail_fast: true\n").unwrap();
            assert!(ProbeConfig::load(&path).unwrap().fail_fast);
        }

        #[test]
        fn test_unknown_matching_rejected() {
            let err = ProbeConfig::from_yaml_str("matching: loose").unwrap_err();
            assert!(matches!(err, ProbeError::Yaml(_)));
        }
    }

    mod validate_tests {
        use super::*;

        #[test]
        fn test_zero_timeout_rejected() {
            let err = ProbeConfig::from_yaml_str("wait:\n  timeout_ms: 0\n").unwrap_err();
            assert!(matches!(err, ProbeError::InvalidConfig { .. }));
        }

        #[test]
        fn test_non_http_base_url_rejected() {
            let config = ProbeConfig::new().with_base_url("file:///tmp/store.html");
            assert!(matches!(
                config.validate(),
                Err(ProbeError::InvalidConfig { .. })
            ));
        }

        #[test]
        fn test_empty_username_rejected() {
            let config = ProbeConfig::new().with_credentials("", "secret");
            assert!(config.validate().is_err());
        }

        #[test]
        fn test_builders_validate() {
            let config = ProbeConfig::new()
                .with_wait(WaitPolicy::new(500, 50).unwrap())
                .with_matching(MatchPolicy::First)
                .with_browser(BrowserConfig::default().with_no_sandbox());
            assert!(config.validate().is_ok());
            assert!(!config.browser.sandbox);
        }
    }
}
