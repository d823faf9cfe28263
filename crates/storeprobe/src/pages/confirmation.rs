//! Order complete screen.

use crate::interaction::ElementInteractor;
use crate::locator::{Locator, Strategy};
use crate::page_object::{PageKind, PageObject};
use crate::result::ProbeResult;
use crate::wait::Condition;

/// Completion heading
pub const HEADING: Locator = Locator::from_static(
    Strategy::XPath,
    "//h2[contains(text(),'Thank you for your order!')]",
);

/// Fixed locators, by name
#[must_use]
pub fn locators() -> Vec<(&'static str, Locator)> {
    vec![("heading", HEADING)]
}

/// Reads the final confirmation
#[derive(Debug, Clone)]
pub struct ConfirmationPage<I> {
    ui: I,
}

impl<I: ElementInteractor> PageObject<I> for ConfirmationPage<I> {
    const KIND: PageKind = PageKind::Confirmation;

    fn open(ui: I) -> Self {
        Self { ui }
    }

    fn landmark(&self) -> Locator {
        HEADING
    }
}

impl<I: ElementInteractor> ConfirmationPage<I> {
    /// Text of the completion heading, once it is visible.
    ///
    /// # Errors
    ///
    /// `ElementNotFound` when checkout never reached this screen, the
    /// primary signal of a broken flow.
    pub async fn confirmation_message(&self) -> ProbeResult<String> {
        self.ui.read_text_when(&HEADING, Condition::Visible).await
    }

    /// Whether the completion heading is rendered
    pub async fn is_displayed(&self) -> ProbeResult<bool> {
        self.ui.is_visible(&self.landmark()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pages::testing::Recorder;
    use crate::result::ProbeError;

    #[tokio::test]
    async fn test_waits_for_visibility_then_reads() {
        let rec = Recorder::default().with_text(HEADING, "Thank you for your order!");
        let page = ConfirmationPage::open(&rec);
        assert_eq!(
            page.confirmation_message().await.unwrap(),
            "Thank you for your order!"
        );
        assert_eq!(
            rec.calls(),
            vec![format!("read:visible:{HEADING}")]
        );
    }

    #[tokio::test]
    async fn test_missing_heading_is_not_found() {
        let rec = Recorder::default().missing(HEADING);
        let page = ConfirmationPage::open(&rec);
        assert!(matches!(
            page.confirmation_message().await,
            Err(ProbeError::ElementNotFound { .. })
        ));
        assert!(!page.is_displayed().await.unwrap());
    }
}
