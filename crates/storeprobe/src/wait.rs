//! Wait policies for asynchronous UI readiness.
//!
//! Every element lookup in Storeprobe funnels through [`WaitPolicy::poll`],
//! the single place where render and network latency are absorbed. The loop
//! runs on the tokio clock, so tests can pause time and assert exact bounds.
//!
//! Bounds: a probe that never succeeds is retried every `poll_interval_ms`
//! until at least `timeout_ms` has passed, which puts the total wait in
//! `[timeout_ms, timeout_ms + poll_interval_ms)` plus probe latency.

use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Default timeout for element resolution (10 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Readiness an element must reach before `resolve` hands it out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Attached to the DOM
    Present,
    /// Rendered with a non-zero visible area
    Visible,
    /// Visible and enabled
    Interactable,
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Present => "present",
            Self::Visible => "visible",
            Self::Interactable => "interactable",
        };
        f.write_str(name)
    }
}

/// What to do when a locator matches more than one element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Fail with `AmbiguousLocator` as soon as two or more elements match
    #[default]
    Strict,
    /// Take the first element, in document order, that meets the condition
    First,
}

/// Timeout and polling contract for element readiness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitPolicy {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitPolicy {
    /// Create a validated policy
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either value is zero or the interval
    /// exceeds the timeout.
    pub fn new(timeout_ms: u64, poll_interval_ms: u64) -> ProbeResult<Self> {
        let policy = Self {
            timeout_ms,
            poll_interval_ms,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Check the policy invariants
    pub fn validate(&self) -> ProbeResult<()> {
        if self.timeout_ms == 0 {
            return Err(ProbeError::invalid_config("timeout_ms must be positive"));
        }
        if self.poll_interval_ms == 0 {
            return Err(ProbeError::invalid_config(
                "poll_interval_ms must be positive",
            ));
        }
        if self.poll_interval_ms > self.timeout_ms {
            return Err(ProbeError::invalid_config(format!(
                "poll_interval_ms ({}) exceeds timeout_ms ({})",
                self.poll_interval_ms, self.timeout_ms
            )));
        }
        Ok(())
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Run `probe` until it yields a value or the timeout passes.
    ///
    /// A probe error ends the wait immediately and is returned unchanged.
    pub async fn poll<T, F, Fut>(&self, mut probe: F) -> ProbeResult<WaitOutcome<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ProbeResult<Option<T>>>,
    {
        let start = Instant::now();
        let mut attempts = 0u32;
        loop {
            attempts = attempts.saturating_add(1);
            if let Some(value) = probe().await? {
                return Ok(WaitOutcome::Ready {
                    value,
                    elapsed: start.elapsed(),
                    attempts,
                });
            }
            let elapsed = start.elapsed();
            if elapsed >= self.timeout() {
                return Ok(WaitOutcome::TimedOut { elapsed, attempts });
            }
            sleep(self.poll_interval()).await;
        }
    }
}

/// Result of a wait operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome<T> {
    /// The probe produced a value
    Ready {
        /// Value the probe produced
        value: T,
        /// Time spent waiting
        elapsed: Duration,
        /// Number of probe calls
        attempts: u32,
    },
    /// The timeout passed first
    TimedOut {
        /// Time spent waiting
        elapsed: Duration,
        /// Number of probe calls
        attempts: u32,
    },
}

impl<T> WaitOutcome<T> {
    /// Time spent waiting
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        match self {
            Self::Ready { elapsed, .. } | Self::TimedOut { elapsed, .. } => *elapsed,
        }
    }

    /// Number of probe calls made
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Ready { attempts, .. } | Self::TimedOut { attempts, .. } => *attempts,
        }
    }

    /// Whether the probe succeeded
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}
