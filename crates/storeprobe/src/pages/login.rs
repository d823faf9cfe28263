//! Sign-in screen the store opens on.

use crate::interaction::ElementInteractor;
use crate::locator::{Locator, Strategy};
use crate::page_object::{PageKind, PageObject};
use crate::result::ProbeResult;
use tracing::info;

/// Username input
pub const USERNAME_INPUT: Locator = Locator::from_static(Strategy::Id, "user-name");
/// Password input
pub const PASSWORD_INPUT: Locator = Locator::from_static(Strategy::Id, "password");
/// Submit button
pub const LOGIN_BUTTON: Locator = Locator::from_static(Strategy::Id, "login-button");

/// Fixed locators, by name
#[must_use]
pub fn locators() -> Vec<(&'static str, Locator)> {
    vec![
        ("username_input", USERNAME_INPUT),
        ("password_input", PASSWORD_INPUT),
        ("login_button", LOGIN_BUTTON),
    ]
}

/// Sign-in form
#[derive(Debug, Clone)]
pub struct LoginPage<I> {
    ui: I,
}

impl<I: ElementInteractor> PageObject<I> for LoginPage<I> {
    const KIND: PageKind = PageKind::Login;

    fn open(ui: I) -> Self {
        Self { ui }
    }

    fn landmark(&self) -> Locator {
        LOGIN_BUTTON
    }
}

impl<I: ElementInteractor> LoginPage<I> {
    /// Type credentials and submit
    pub async fn log_in(&self, username: &str, password: &str) -> ProbeResult<()> {
        info!(username, "logging in");
        self.ui.type_text(&USERNAME_INPUT, username).await?;
        self.ui.type_text(&PASSWORD_INPUT, password).await?;
        self.ui.click(&LOGIN_BUTTON).await
    }

    /// Whether the sign-in form is rendered
    pub async fn is_displayed(&self) -> ProbeResult<bool> {
        self.ui.is_visible(&self.landmark()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pages::testing::Recorder;

    #[tokio::test]
    async fn test_log_in_sequence() {
        let rec = Recorder::default();
        let page = LoginPage::open(&rec);
        page.log_in("standard_user", "secret_sauce").await.unwrap();
        assert_eq!(
            rec.calls(),
            vec![
                "type:id=user-name:standard_user",
                "type:id=password:secret_sauce",
                "click:id=login-button",
            ]
        );
    }
}
