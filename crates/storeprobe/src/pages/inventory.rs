//! Product listing screen.

use crate::interaction::ElementInteractor;
use crate::locator::{xpath_literal, Locator, Strategy};
use crate::page_object::{PageKind, PageObject};
use crate::result::ProbeResult;
use tracing::info;

/// Grid holding every catalog item
pub const CONTAINER: Locator = Locator::from_static(Strategy::Id, "inventory_container");

/// Cart summary control in the header
pub const CART_BUTTON: Locator = Locator::from_static(Strategy::Id, "shopping_cart_container");

/// Add button inside the catalog item whose label is exactly `product_name`.
///
/// The label is quoted as an XPath literal, so names containing quotes
/// select the intended item instead of corrupting the expression.
#[must_use]
pub fn add_to_cart_button(product_name: &str) -> Locator {
    Locator::xpath(format!(
        "//div[text()={}]/ancestor::div[@class='inventory_item']//button",
        xpath_literal(product_name)
    ))
}

/// Fixed locators, by name
#[must_use]
pub fn locators() -> Vec<(&'static str, Locator)> {
    vec![("container", CONTAINER), ("cart_button", CART_BUTTON)]
}

/// Actions available on the product listing
#[derive(Debug, Clone)]
pub struct InventoryPage<I> {
    ui: I,
}

impl<I: ElementInteractor> PageObject<I> for InventoryPage<I> {
    const KIND: PageKind = PageKind::Inventory;

    fn open(ui: I) -> Self {
        Self { ui }
    }

    fn landmark(&self) -> Locator {
        CONTAINER
    }
}

impl<I: ElementInteractor> InventoryPage<I> {
    /// Click the add button of the item labelled `product_name`.
    ///
    /// Not idempotent: adding a product already in the cart clicks again
    /// and whatever the store does with that is what happens.
    ///
    /// # Errors
    ///
    /// `ElementNotFound` if no item carries that label within the wait
    /// window; `AmbiguousLocator` if several do and matching is strict.
    pub async fn add_product_to_cart(&self, product_name: &str) -> ProbeResult<()> {
        info!(product = product_name, "adding product to cart");
        self.ui.click(&add_to_cart_button(product_name)).await
    }

    /// Click the cart summary. Arrival is judged by the next page.
    pub async fn go_to_cart(&self) -> ProbeResult<()> {
        self.ui.click(&CART_BUTTON).await
    }

    /// Whether the product grid is rendered
    pub async fn is_displayed(&self) -> ProbeResult<bool> {
        self.ui.is_visible(&self.landmark()).await
    }
}
