//! Session - the browser capability the page layer consumes.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Session (abstract trait, borrowed by every page object)      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────────────────┐      ┌──────────────────────────┐ │
//! │  │  ChromiumSession      │      │  MockSession             │ │
//! │  │  (feature `browser`)  │      │  (in-memory screens,     │ │
//! │  │  CDP via chromiumoxide│      │   tokio clock)           │ │
//! │  └───────────────────────┘      └──────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sessions are used strictly sequentially, one call awaited before the
//! next, so implementations only need interior mutability, not ordering.
//! An [`ElementHandle`] stays valid until the next `find_elements` call on
//! the same session.

use crate::locator::Locator;
use crate::result::{ProbeError, ProbeResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

/// Opaque reference to a live element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    id: String,
}

impl ElementHandle {
    /// Create a handle from a driver-specific id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Driver-specific id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// One live browser session: one tab, one navigation context.
///
/// Driver-level failures are reported as [`ProbeError::SessionFault`];
/// calls after [`Session::quit`] fail with [`ProbeError::SessionReleased`].
#[async_trait]
pub trait Session: Send + Sync {
    /// All elements currently matching `locator`, in document order
    async fn find_elements(&self, locator: &Locator) -> ProbeResult<Vec<ElementHandle>>;

    /// Click the element
    async fn click(&self, element: &ElementHandle) -> ProbeResult<()>;

    /// Clear an editable element's value
    async fn clear(&self, element: &ElementHandle) -> ProbeResult<()>;

    /// Type text into the element, verbatim
    async fn send_keys(&self, element: &ElementHandle, text: &str) -> ProbeResult<()>;

    /// Rendered text content
    async fn text(&self, element: &ElementHandle) -> ProbeResult<String>;

    /// Rendered with a non-zero visible area
    async fn is_displayed(&self, element: &ElementHandle) -> ProbeResult<bool>;

    /// Not disabled
    async fn is_enabled(&self, element: &ElementHandle) -> ProbeResult<bool>;

    /// End the session. Later calls fail with `SessionReleased`.
    async fn quit(&self) -> ProbeResult<()>;
}

/// Shared sessions, e.g. a factory keeping a handle for inspection
#[async_trait]
impl<T: Session + ?Sized> Session for Arc<T> {
    async fn find_elements(&self, locator: &Locator) -> ProbeResult<Vec<ElementHandle>> {
        (**self).find_elements(locator).await
    }

    async fn click(&self, element: &ElementHandle) -> ProbeResult<()> {
        (**self).click(element).await
    }

    async fn clear(&self, element: &ElementHandle) -> ProbeResult<()> {
        (**self).clear(element).await
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> ProbeResult<()> {
        (**self).send_keys(element, text).await
    }

    async fn text(&self, element: &ElementHandle) -> ProbeResult<String> {
        (**self).text(element).await
    }

    async fn is_displayed(&self, element: &ElementHandle) -> ProbeResult<bool> {
        (**self).is_displayed(element).await
    }

    async fn is_enabled(&self, element: &ElementHandle) -> ProbeResult<bool> {
        (**self).is_enabled(element).await
    }

    async fn quit(&self) -> ProbeResult<()> {
        (**self).quit().await
    }
}

// ============================================================================
// Mock session
// ============================================================================

/// Screen change triggered by clicking an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Screen shown after the click
    pub target: String,
    /// Inputs that must hold a non-empty value for the transition to happen
    pub requires_filled: Vec<Locator>,
}

/// An element on a mock screen
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Locator this element answers to
    pub locator: Locator,
    /// Rendered text
    pub text: String,
    /// Rendered with non-zero area
    pub displayed: bool,
    /// Not disabled
    pub enabled: bool,
    /// Delay after the screen is shown before the element is attached
    pub appears_after: Duration,
    /// Navigation on click
    pub on_click: Option<Transition>,
}

impl MockElement {
    /// Create a visible, enabled element that is attached immediately
    #[must_use]
    pub fn new(locator: Locator) -> Self {
        Self {
            locator,
            text: String::new(),
            displayed: true,
            enabled: true,
            appears_after: Duration::ZERO,
            on_click: None,
        }
    }

    /// Set rendered text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Attached but not rendered
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    /// Attached and rendered, but disabled
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Attach only after `delay` has passed since the screen was shown
    #[must_use]
    pub const fn appearing_after(mut self, delay: Duration) -> Self {
        self.appears_after = delay;
        self
    }

    /// Clicking shows `target`
    #[must_use]
    pub fn navigates_to(mut self, target: impl Into<String>) -> Self {
        self.on_click = Some(Transition {
            target: target.into(),
            requires_filled: Vec::new(),
        });
        self
    }

    /// Navigation only happens once `input` holds a value
    #[must_use]
    pub fn requiring_filled(mut self, input: Locator) -> Self {
        if let Some(ref mut transition) = self.on_click {
            transition.requires_filled.push(input);
        }
        self
    }
}

/// Builder for [`MockSession`]
#[derive(Debug)]
pub struct MockSessionBuilder {
    start: String,
    screens: HashMap<String, Vec<MockElement>>,
    faults: HashMap<Locator, String>,
}

impl MockSessionBuilder {
    /// Add a screen
    #[must_use]
    pub fn screen(mut self, name: impl Into<String>, elements: Vec<MockElement>) -> Self {
        let _ = self.screens.insert(name.into(), elements);
        self
    }

    /// Any lookup of `locator` fails with a session fault
    #[must_use]
    pub fn fault_on(mut self, locator: Locator, message: impl Into<String>) -> Self {
        let _ = self.faults.insert(locator, message.into());
        self
    }

    /// Build the session, showing the start screen now
    #[must_use]
    pub fn build(self) -> MockSession {
        MockSession {
            state: Mutex::new(MockState {
                screens: self.screens,
                current: self.start,
                shown_at: Instant::now(),
                values: HashMap::new(),
                faults: self.faults,
                call_history: Vec::new(),
                find_count: 0,
                quit_count: 0,
            }),
        }
    }
}

#[derive(Debug)]
struct MockState {
    screens: HashMap<String, Vec<MockElement>>,
    current: String,
    shown_at: Instant,
    values: HashMap<Locator, String>,
    faults: HashMap<Locator, String>,
    call_history: Vec<String>,
    find_count: usize,
    quit_count: u32,
}

impl MockState {
    fn ensure_live(&self) -> ProbeResult<()> {
        if self.quit_count > 0 {
            return Err(ProbeError::SessionReleased);
        }
        Ok(())
    }

    /// Resolve a handle, failing if it belongs to a screen no longer shown
    fn element(&self, handle: &ElementHandle) -> ProbeResult<&MockElement> {
        self.ensure_live()?;
        let stale = || ProbeError::session_fault(format!("stale element reference: {}", handle.id));
        let (screen, index) = handle.id.rsplit_once('#').ok_or_else(stale)?;
        if screen != self.current {
            return Err(stale());
        }
        let index: usize = index.parse().map_err(|_| stale())?;
        self.screens
            .get(screen)
            .and_then(|elements| elements.get(index))
            .ok_or_else(stale)
    }

    fn navigate(&mut self, target: &str) {
        self.current = target.to_string();
        self.shown_at = Instant::now();
        self.values.clear();
    }
}

/// In-memory session for tests and dry runs.
///
/// Models a site as named screens. Clicking an element with a
/// [`Transition`] swaps screens; elements can attach late to simulate
/// asynchronous rendering.
#[derive(Debug)]
pub struct MockSession {
    state: Mutex<MockState>,
}

impl MockSession {
    /// Start building a session that opens on `start`
    #[must_use]
    pub fn builder(start: impl Into<String>) -> MockSessionBuilder {
        MockSessionBuilder {
            start: start.into(),
            screens: HashMap::new(),
            faults: HashMap::new(),
        }
    }

    fn lock(&self) -> ProbeResult<MutexGuard<'_, MockState>> {
        self.state
            .lock()
            .map_err(|_| ProbeError::session_fault("mock session state poisoned"))
    }

    /// Name of the screen currently shown
    #[must_use]
    pub fn current_screen(&self) -> String {
        self.lock().map(|s| s.current.clone()).unwrap_or_default()
    }

    /// Value typed into an input on the current screen
    #[must_use]
    pub fn value_of(&self, locator: &Locator) -> Option<String> {
        self.lock().ok()?.values.get(locator).cloned()
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.lock().map(|s| s.call_history.clone()).unwrap_or_default()
    }

    /// Check if an action was recorded with the given prefix
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.history().iter().any(|c| c.starts_with(prefix))
    }

    /// Number of `find_elements` calls so far
    #[must_use]
    pub fn find_count(&self) -> usize {
        self.lock().map(|s| s.find_count).unwrap_or_default()
    }

    /// Number of `quit` calls so far
    #[must_use]
    pub fn quit_count(&self) -> u32 {
        self.lock().map(|s| s.quit_count).unwrap_or_default()
    }
}

#[async_trait]
impl Session for MockSession {
    async fn find_elements(&self, locator: &Locator) -> ProbeResult<Vec<ElementHandle>> {
        let mut state = self.lock()?;
        state.ensure_live()?;
        state.find_count += 1;
        if let Some(message) = state.faults.get(locator) {
            return Err(ProbeError::session_fault(message.clone()));
        }
        let since_shown = state.shown_at.elapsed();
        let current = state.current.clone();
        let found = state
            .screens
            .get(&current)
            .map(|elements| {
                elements
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| &e.locator == locator && since_shown >= e.appears_after)
                    .map(|(i, _)| ElementHandle::new(format!("{current}#{i}")))
                    .collect()
            })
            .unwrap_or_default();
        Ok(found)
    }

    async fn click(&self, element: &ElementHandle) -> ProbeResult<()> {
        let mut state = self.lock()?;
        let target = state.element(element)?;
        let entry = format!("click:{}", target.locator);
        let transition = target.on_click.clone();
        state.call_history.push(entry);
        if let Some(transition) = transition {
            let filled = transition
                .requires_filled
                .iter()
                .all(|input| state.values.get(input).is_some_and(|v| !v.is_empty()));
            if filled {
                state.navigate(&transition.target);
            }
        }
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> ProbeResult<()> {
        let mut state = self.lock()?;
        let locator = state.element(element)?.locator.clone();
        state.call_history.push(format!("clear:{locator}"));
        let _ = state.values.insert(locator, String::new());
        Ok(())
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> ProbeResult<()> {
        let mut state = self.lock()?;
        let locator = state.element(element)?.locator.clone();
        state.call_history.push(format!("type:{locator}:{text}"));
        state.values.entry(locator).or_default().push_str(text);
        Ok(())
    }

    async fn text(&self, element: &ElementHandle) -> ProbeResult<String> {
        let state = self.lock()?;
        Ok(state.element(element)?.text.clone())
    }

    async fn is_displayed(&self, element: &ElementHandle) -> ProbeResult<bool> {
        let state = self.lock()?;
        Ok(state.element(element)?.displayed)
    }

    async fn is_enabled(&self, element: &ElementHandle) -> ProbeResult<bool> {
        let state = self.lock()?;
        Ok(state.element(element)?.enabled)
    }

    async fn quit(&self) -> ProbeResult<()> {
        let mut state = self.lock()?;
        state.ensure_live()?;
        state.quit_count += 1;
        state.call_history.push("quit".to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn two_screens() -> MockSession {
        MockSession::builder("form")
            .screen(
                "form",
                vec![
                    MockElement::new(Locator::id("name")),
                    MockElement::new(Locator::id("submit"))
                        .navigates_to("done")
                        .requiring_filled(Locator::id("name")),
                    MockElement::new(Locator::id("late"))
                        .appearing_after(Duration::from_millis(300)),
                ],
            )
            .screen(
                "done",
                vec![MockElement::new(Locator::id("banner")).with_text("Saved")],
            )
            .build()
    }

    mod element_handle_tests {
        use super::*;

        #[test]
        fn test_element_handle_creation() {
            let handle = ElementHandle::new("form#0");
            assert_eq!(handle.id(), "form#0");
        }
    }

    mod mock_element_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let e = MockElement::new(Locator::id("x"));
            assert!(e.displayed);
            assert!(e.enabled);
            assert_eq!(e.appears_after, Duration::ZERO);
            assert!(e.on_click.is_none());
        }

        #[test]
        fn test_requiring_filled_without_transition_is_ignored() {
            let e = MockElement::new(Locator::id("x")).requiring_filled(Locator::id("y"));
            assert!(e.on_click.is_none());
        }
    }

    mod mock_session_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_find_respects_appearance_delay() {
            let session = two_screens();
            assert!(session
                .find_elements(&Locator::id("late"))
                .await
                .unwrap()
                .is_empty());
            tokio::time::sleep(Duration::from_millis(300)).await;
            assert_eq!(
                session.find_elements(&Locator::id("late")).await.unwrap().len(),
                1
            );
            assert_eq!(session.find_count(), 2);
        }

        #[tokio::test]
        async fn test_guarded_transition() {
            let session = two_screens();
            let submit = session.find_elements(&Locator::id("submit")).await.unwrap();
            session.click(&submit[0]).await.unwrap();
            assert_eq!(session.current_screen(), "form");

            let name = session.find_elements(&Locator::id("name")).await.unwrap();
            session.send_keys(&name[0], "Ada").await.unwrap();
            assert_eq!(session.value_of(&Locator::id("name")).as_deref(), Some("Ada"));
            session.click(&submit[0]).await.unwrap();
            assert_eq!(session.current_screen(), "done");
        }

        #[tokio::test]
        async fn test_clear_then_type_replaces_value() {
            let session = two_screens();
            let name = session.find_elements(&Locator::id("name")).await.unwrap();
            session.send_keys(&name[0], "old").await.unwrap();
            session.clear(&name[0]).await.unwrap();
            session.send_keys(&name[0], "new").await.unwrap();
            assert_eq!(session.value_of(&Locator::id("name")).as_deref(), Some("new"));
        }

        #[tokio::test]
        async fn test_handle_goes_stale_after_navigation() {
            let session = two_screens();
            let name = session.find_elements(&Locator::id("name")).await.unwrap();
            session.send_keys(&name[0], "Ada").await.unwrap();
            let submit = session.find_elements(&Locator::id("submit")).await.unwrap();
            session.click(&submit[0]).await.unwrap();
            let err = session.text(&name[0]).await.unwrap_err();
            assert!(matches!(err, ProbeError::SessionFault { .. }));
        }

        #[tokio::test]
        async fn test_fault_injection() {
            let session = MockSession::builder("a")
                .screen("a", vec![])
                .fault_on(Locator::id("boom"), "browser crashed")
                .build();
            let err = session.find_elements(&Locator::id("boom")).await.unwrap_err();
            assert_eq!(err.to_string(), "Session fault: browser crashed");
        }

        #[tokio::test]
        async fn test_quit_releases_session() {
            let session = two_screens();
            session.quit().await.unwrap();
            assert_eq!(session.quit_count(), 1);
            assert!(session.was_called("quit"));
            assert!(matches!(
                session.find_elements(&Locator::id("name")).await,
                Err(ProbeError::SessionReleased)
            ));
            assert!(matches!(session.quit().await, Err(ProbeError::SessionReleased)));
            assert_eq!(session.quit_count(), 1);
        }

        #[tokio::test]
        async fn test_history_records_actions() {
            let session = two_screens();
            let name = session.find_elements(&Locator::id("name")).await.unwrap();
            session.clear(&name[0]).await.unwrap();
            session.send_keys(&name[0], "Ada").await.unwrap();
            assert_eq!(
                session.history(),
                vec!["clear:id=name".to_string(), "type:id=name:Ada".to_string()]
            );
        }
    }
}
