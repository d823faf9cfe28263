//! Checkout flow: cart, customer information, overview.
//!
//! Modelled as plain sequential actions. The store exposes no state this
//! layer could verify between steps, so there is no state machine here;
//! a step that did not take effect shows up as a lookup failure on the next.

use crate::interaction::ElementInteractor;
use crate::locator::{Locator, Strategy};
use crate::page_object::{PageKind, PageObject};
use crate::result::ProbeResult;
use tracing::info;

/// Checkout entry button on the cart screen
pub const CHECKOUT_BUTTON: Locator = Locator::from_static(Strategy::Id, "checkout");
/// First name input
pub const FIRST_NAME_INPUT: Locator = Locator::from_static(Strategy::Id, "first-name");
/// Last name input
pub const LAST_NAME_INPUT: Locator = Locator::from_static(Strategy::Id, "last-name");
/// Postal code input
pub const POSTAL_CODE_INPUT: Locator = Locator::from_static(Strategy::Id, "postal-code");
/// Continue to the overview
pub const CONTINUE_BUTTON: Locator = Locator::from_static(Strategy::Id, "continue");
/// Place the order
pub const FINISH_BUTTON: Locator = Locator::from_static(Strategy::Id, "finish");

/// Fixed locators, by name
#[must_use]
pub fn locators() -> Vec<(&'static str, Locator)> {
    vec![
        ("checkout_button", CHECKOUT_BUTTON),
        ("first_name_input", FIRST_NAME_INPUT),
        ("last_name_input", LAST_NAME_INPUT),
        ("postal_code_input", POSTAL_CODE_INPUT),
        ("continue_button", CONTINUE_BUTTON),
        ("finish_button", FINISH_BUTTON),
    ]
}

/// Actions across the three checkout screens
#[derive(Debug, Clone)]
pub struct CheckoutPage<I> {
    ui: I,
}

impl<I: ElementInteractor> PageObject<I> for CheckoutPage<I> {
    const KIND: PageKind = PageKind::Checkout;

    fn open(ui: I) -> Self {
        Self { ui }
    }

    fn landmark(&self) -> Locator {
        CHECKOUT_BUTTON
    }
}

impl<I: ElementInteractor> CheckoutPage<I> {
    /// Leave the cart for the information form
    pub async fn proceed_to_checkout(&self) -> ProbeResult<()> {
        self.ui.click(&CHECKOUT_BUTTON).await
    }

    /// Fill first name, last name and postal code, then continue.
    ///
    /// All three fields are typed before `continue` is clicked. Values are
    /// sent as given; empty strings are typed (as nothing) and the click
    /// still happens.
    pub async fn enter_customer_info(
        &self,
        first_name: &str,
        last_name: &str,
        postal_code: &str,
    ) -> ProbeResult<()> {
        info!("entering customer information");
        self.ui.type_text(&FIRST_NAME_INPUT, first_name).await?;
        self.ui.type_text(&LAST_NAME_INPUT, last_name).await?;
        self.ui.type_text(&POSTAL_CODE_INPUT, postal_code).await?;
        self.ui.click(&CONTINUE_BUTTON).await
    }

    /// Place the order from the overview screen
    pub async fn finish_purchase(&self) -> ProbeResult<()> {
        self.ui.click(&FINISH_BUTTON).await
    }

    /// Whether the cart screen with its checkout button is rendered
    pub async fn is_displayed(&self) -> ProbeResult<bool> {
        self.ui.is_visible(&self.landmark()).await
    }
}
