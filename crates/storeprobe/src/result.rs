//! Result and error types for Storeprobe.

use crate::locator::Locator;
use thiserror::Error;

/// Result type for Storeprobe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur while driving a scenario
#[derive(Debug, Error)]
pub enum ProbeError {
    /// No element satisfied the locator within the wait window
    #[error("Element {locator} not found after {waited_ms}ms")]
    ElementNotFound {
        /// Locator that was being resolved
        locator: Locator,
        /// Time spent polling
        waited_ms: u64,
    },

    /// Strict resolution found more than one element
    #[error("Locator {locator} is ambiguous: {matches} elements match")]
    AmbiguousLocator {
        /// Locator that was being resolved
        locator: Locator,
        /// Number of matching elements
        matches: usize,
    },

    /// The underlying browser session failed (crash, disconnect, protocol error)
    #[error("Session fault: {message}")]
    SessionFault {
        /// Error message
        message: String,
    },

    /// The session was used after `quit`
    #[error("Session already released")]
    SessionReleased,

    /// Scenario assertion did not hold
    #[error("Assertion failed: expected {expected:?} in {actual:?}")]
    AssertionFailed {
        /// Expected substring
        expected: String,
        /// Actual rendered text
        actual: String,
    },

    /// Configuration rejected during validation
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ProbeError {
    /// Create a session fault
    #[must_use]
    pub fn session_fault(message: impl Into<String>) -> Self {
        Self::SessionFault {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether this error ends the scenario regardless of what the caller wants.
    ///
    /// Session faults are never recoverable; element lookups and assertions
    /// are the caller's call.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::SessionFault { .. } | Self::SessionReleased)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_not_found_message() {
        let err = ProbeError::ElementNotFound {
            locator: Locator::id("finish"),
            waited_ms: 2000,
        };
        assert_eq!(err.to_string(), "Element id=finish not found after 2000ms");
    }

    #[test]
    fn test_assertion_message_quotes_both_sides() {
        let err = ProbeError::AssertionFailed {
            expected: "Thank you".to_string(),
            actual: "Checkout: Overview".to_string(),
        };
        assert!(err.to_string().contains("\"Thank you\""));
        assert!(err.to_string().contains("\"Checkout: Overview\""));
    }

    #[test]
    fn test_fatal_classification() {
        assert!(ProbeError::session_fault("disconnected").is_fatal());
        assert!(ProbeError::SessionReleased.is_fatal());
        assert!(!ProbeError::invalid_config("bad").is_fatal());
        assert!(!ProbeError::AmbiguousLocator {
            locator: Locator::css("button"),
            matches: 2
        }
        .is_fatal());
    }
}
