//! Element interaction primitives shared by every page object.
//!
//! [`ElementInteractor`] is the capability page objects compose: resolve a
//! locator under the wait policy, then click, type, read or check
//! visibility. [`Interactor`] is the session-backed implementation.
//! Page objects hold an interactor; they never inherit from one.

use crate::driver::{ElementHandle, Session};
use crate::locator::Locator;
use crate::result::{ProbeError, ProbeResult};
use crate::wait::{Condition, MatchPolicy, WaitOutcome, WaitPolicy};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Primitive element actions, each synchronized through `resolve`
#[async_trait]
pub trait ElementInteractor: Send + Sync {
    /// Wait until exactly one element (or the first, per match policy)
    /// matches `locator` and meets `condition`.
    ///
    /// # Errors
    ///
    /// `ElementNotFound` on timeout, `AmbiguousLocator` under strict
    /// matching, session errors unchanged.
    async fn resolve(&self, locator: &Locator, condition: Condition)
        -> ProbeResult<ElementHandle>;

    /// Resolve as interactable, then click
    async fn click(&self, locator: &Locator) -> ProbeResult<()>;

    /// Resolve as interactable, clear, then type `text` verbatim
    async fn type_text(&self, locator: &Locator, text: &str) -> ProbeResult<()>;

    /// Resolve under `condition`, then return the rendered text as-is
    async fn read_text_when(&self, locator: &Locator, condition: Condition)
        -> ProbeResult<String>;

    /// Resolve as present, then return the rendered text as-is
    async fn read_text(&self, locator: &Locator) -> ProbeResult<String> {
        self.read_text_when(locator, Condition::Present).await
    }

    /// Resolve as present, then report whether it is rendered.
    ///
    /// An element that never shows up is `Ok(false)`, not an error.
    async fn is_visible(&self, locator: &Locator) -> ProbeResult<bool>;
}

/// Session-backed [`ElementInteractor`].
///
/// Cheap to copy: it only borrows the session and carries the policies.
#[derive(Clone, Copy)]
pub struct Interactor<'s> {
    session: &'s dyn Session,
    policy: WaitPolicy,
    matching: MatchPolicy,
}

impl std::fmt::Debug for Interactor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interactor")
            .field("policy", &self.policy)
            .field("matching", &self.matching)
            .finish_non_exhaustive()
    }
}

impl<'s> Interactor<'s> {
    /// Create an interactor over a borrowed session
    #[must_use]
    pub fn new(session: &'s dyn Session, policy: WaitPolicy) -> Self {
        Self {
            session,
            policy,
            matching: MatchPolicy::default(),
        }
    }

    /// Override the wait policy for calls made through the returned copy
    #[must_use]
    pub const fn with_policy(mut self, policy: WaitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the ambiguity policy
    #[must_use]
    pub const fn with_match_policy(mut self, matching: MatchPolicy) -> Self {
        self.matching = matching;
        self
    }

    /// Get the wait policy
    #[must_use]
    pub const fn policy(&self) -> &WaitPolicy {
        &self.policy
    }

    /// Get the match policy
    #[must_use]
    pub const fn match_policy(&self) -> MatchPolicy {
        self.matching
    }

    /// The borrowed session
    #[must_use]
    pub fn session(&self) -> &'s dyn Session {
        self.session
    }

    async fn meets(&self, element: &ElementHandle, condition: Condition) -> ProbeResult<bool> {
        match condition {
            Condition::Present => Ok(true),
            Condition::Visible => self.session.is_displayed(element).await,
            Condition::Interactable => Ok(self.session.is_displayed(element).await?
                && self.session.is_enabled(element).await?),
        }
    }

    /// One poll: query, apply the match policy, check the condition
    async fn probe(
        &self,
        locator: &Locator,
        condition: Condition,
    ) -> ProbeResult<Option<ElementHandle>> {
        let found = self.session.find_elements(locator).await?;
        if self.matching == MatchPolicy::Strict && found.len() > 1 {
            return Err(ProbeError::AmbiguousLocator {
                locator: locator.clone(),
                matches: found.len(),
            });
        }
        for element in found {
            if self.meets(&element, condition).await? {
                return Ok(Some(element));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl ElementInteractor for Interactor<'_> {
    async fn resolve(
        &self,
        locator: &Locator,
        condition: Condition,
    ) -> ProbeResult<ElementHandle> {
        let this = self;
        let outcome = self
            .policy
            .poll(move || this.probe(locator, condition))
            .await?;
        match outcome {
            WaitOutcome::Ready {
                value,
                elapsed,
                attempts,
            } => {
                debug!(
                    %locator,
                    %condition,
                    elapsed_ms = elapsed.as_millis() as u64,
                    attempts,
                    "resolved element"
                );
                Ok(value)
            }
            WaitOutcome::TimedOut { elapsed, attempts } => {
                let waited_ms = elapsed.as_millis() as u64;
                warn!(%locator, %condition, waited_ms, attempts, "element not found");
                Err(ProbeError::ElementNotFound {
                    locator: locator.clone(),
                    waited_ms,
                })
            }
        }
    }

    async fn click(&self, locator: &Locator) -> ProbeResult<()> {
        let element = self.resolve(locator, Condition::Interactable).await?;
        debug!(%locator, "click");
        self.session.click(&element).await
    }

    async fn type_text(&self, locator: &Locator, text: &str) -> ProbeResult<()> {
        let element = self.resolve(locator, Condition::Interactable).await?;
        debug!(%locator, chars = text.chars().count(), "type text");
        self.session.clear(&element).await?;
        self.session.send_keys(&element, text).await
    }

    async fn read_text_when(
        &self,
        locator: &Locator,
        condition: Condition,
    ) -> ProbeResult<String> {
        let element = self.resolve(locator, condition).await?;
        self.session.text(&element).await
    }

    async fn is_visible(&self, locator: &Locator) -> ProbeResult<bool> {
        match self.resolve(locator, Condition::Present).await {
            Ok(element) => self.session.is_displayed(&element).await,
            Err(ProbeError::ElementNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl<T: ElementInteractor + ?Sized> ElementInteractor for &T {
    async fn resolve(
        &self,
        locator: &Locator,
        condition: Condition,
    ) -> ProbeResult<ElementHandle> {
        (**self).resolve(locator, condition).await
    }

    async fn click(&self, locator: &Locator) -> ProbeResult<()> {
        (**self).click(locator).await
    }

    async fn type_text(&self, locator: &Locator, text: &str) -> ProbeResult<()> {
        (**self).type_text(locator, text).await
    }

    async fn read_text_when(
        &self,
        locator: &Locator,
        condition: Condition,
    ) -> ProbeResult<String> {
        (**self).read_text_when(locator, condition).await
    }

    async fn is_visible(&self, locator: &Locator) -> ProbeResult<bool> {
        (**self).is_visible(locator).await
    }
}
