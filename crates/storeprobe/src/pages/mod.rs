//! Page objects for the storefront purchase flow.
//!
//! Locators are module-level constants, one module per screen. The only
//! parameterized locator, the add-to-cart button of a named product, is
//! built per call with the product label quoted as an XPath literal.

pub mod checkout;
pub mod confirmation;
pub mod inventory;
pub mod login;

pub use checkout::CheckoutPage;
pub use confirmation::ConfirmationPage;
pub use inventory::InventoryPage;
pub use login::LoginPage;

use crate::page_object::{PageKind, PageSummary};

/// Static description of every page, in flow order
#[must_use]
pub fn catalog() -> Vec<PageSummary> {
    PageKind::ALL
        .into_iter()
        .map(|kind| PageSummary {
            kind,
            locators: match kind {
                PageKind::Login => login::locators(),
                PageKind::Inventory => inventory::locators(),
                PageKind::Checkout => checkout::locators(),
                PageKind::Confirmation => confirmation::locators(),
            },
        })
        .collect()
}
