//! In-memory model of the demo store, built on [`MockSession`].
//!
//! Screens and transitions:
//!
//! ```text
//! login ──login-button──▶ inventory ──cart──▶ cart ──checkout──▶ checkout_info
//!                                                                    │ continue
//!                                                                    ▼ (all fields filled)
//!                               complete ◀──finish── checkout_overview
//! ```
//!
//! Every element on a screen attaches `render_delay` after the screen is
//! shown, so waits are exercised on each transition.

use crate::driver::{MockElement, MockSession};
use crate::locator::Locator;
use crate::pages::{checkout, confirmation, inventory, login};
use crate::result::ProbeResult;
use crate::scenario::SessionFactory;
use async_trait::async_trait;
use std::time::Duration;

/// Heading text on the completion screen
pub const CONFIRMATION_TEXT: &str = "Thank you for your order!";

/// Product labels on the demo inventory
pub const DEMO_PRODUCTS: [&str; 6] = [
    "Sauce Labs Backpack",
    "Sauce Labs Bike Light",
    "Sauce Labs Bolt T-Shirt",
    "Sauce Labs Fleece Jacket",
    "Sauce Labs Onesie",
    "Test.allTheThings() T-Shirt (Red)",
];

/// Screen names
pub mod screens {
    /// Sign-in form
    pub const LOGIN: &str = "login";
    /// Product grid
    pub const INVENTORY: &str = "inventory";
    /// Cart contents
    pub const CART: &str = "cart";
    /// Customer information form
    pub const CHECKOUT_INFO: &str = "checkout_info";
    /// Order overview
    pub const CHECKOUT_OVERVIEW: &str = "checkout_overview";
    /// Order placed
    pub const COMPLETE: &str = "complete";
}

/// Builder for mock storefront sessions
#[derive(Debug, Clone)]
pub struct Storefront {
    products: Vec<String>,
    render_delay: Duration,
    start_at_login: bool,
}

impl Default for Storefront {
    fn default() -> Self {
        Self {
            products: DEMO_PRODUCTS.iter().map(ToString::to_string).collect(),
            render_delay: Duration::ZERO,
            start_at_login: false,
        }
    }
}

impl Storefront {
    /// Demo products, no render delay, signed in already
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the product list. Repeated labels produce repeated items.
    #[must_use]
    pub fn with_products<S: Into<String>>(mut self, products: impl IntoIterator<Item = S>) -> Self {
        self.products = products.into_iter().map(Into::into).collect();
        self
    }

    /// Delay between a screen being shown and its elements attaching
    #[must_use]
    pub const fn with_render_delay(mut self, delay: Duration) -> Self {
        self.render_delay = delay;
        self
    }

    /// Open on the sign-in form instead of the inventory
    #[must_use]
    pub const fn starting_at_login(mut self) -> Self {
        self.start_at_login = true;
        self
    }

    /// Product labels, in display order
    #[must_use]
    pub fn products(&self) -> &[String] {
        &self.products
    }

    fn element(&self, locator: Locator) -> MockElement {
        MockElement::new(locator).appearing_after(self.render_delay)
    }

    /// Build a fresh session showing the start screen
    #[must_use]
    pub fn build(&self) -> MockSession {
        let start = if self.start_at_login {
            screens::LOGIN
        } else {
            screens::INVENTORY
        };

        let mut items = vec![
            self.element(inventory::CONTAINER),
            self.element(inventory::CART_BUTTON).navigates_to(screens::CART),
        ];
        items.extend(self.products.iter().map(|name| {
            self.element(inventory::add_to_cart_button(name))
                .with_text("Add to cart")
        }));

        MockSession::builder(start)
            .screen(
                screens::LOGIN,
                vec![
                    self.element(login::USERNAME_INPUT),
                    self.element(login::PASSWORD_INPUT),
                    self.element(login::LOGIN_BUTTON)
                        .navigates_to(screens::INVENTORY)
                        .requiring_filled(login::USERNAME_INPUT)
                        .requiring_filled(login::PASSWORD_INPUT),
                ],
            )
            .screen(screens::INVENTORY, items)
            .screen(
                screens::CART,
                vec![self
                    .element(checkout::CHECKOUT_BUTTON)
                    .navigates_to(screens::CHECKOUT_INFO)],
            )
            .screen(
                screens::CHECKOUT_INFO,
                vec![
                    self.element(checkout::FIRST_NAME_INPUT),
                    self.element(checkout::LAST_NAME_INPUT),
                    self.element(checkout::POSTAL_CODE_INPUT),
                    self.element(checkout::CONTINUE_BUTTON)
                        .navigates_to(screens::CHECKOUT_OVERVIEW)
                        .requiring_filled(checkout::FIRST_NAME_INPUT)
                        .requiring_filled(checkout::LAST_NAME_INPUT)
                        .requiring_filled(checkout::POSTAL_CODE_INPUT),
                ],
            )
            .screen(
                screens::CHECKOUT_OVERVIEW,
                vec![self
                    .element(checkout::FINISH_BUTTON)
                    .navigates_to(screens::COMPLETE)],
            )
            .screen(
                screens::COMPLETE,
                vec![self
                    .element(confirmation::HEADING)
                    .with_text(CONFIRMATION_TEXT)],
            )
            .build()
    }
}

#[async_trait]
impl SessionFactory for Storefront {
    type Session = MockSession;

    async fn open(&self) -> ProbeResult<MockSession> {
        Ok(self.build())
    }
}

/// Session on the default demo storefront
#[must_use]
pub fn demo_storefront() -> MockSession {
    Storefront::default().build()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::Session;

    #[tokio::test]
    async fn test_opens_on_inventory_with_demo_products() {
        let session = demo_storefront();
        assert_eq!(session.current_screen(), screens::INVENTORY);
        for name in DEMO_PRODUCTS {
            let found = session
                .find_elements(&inventory::add_to_cart_button(name))
                .await
                .unwrap();
            assert_eq!(found.len(), 1, "{name}");
        }
    }

    #[tokio::test]
    async fn test_duplicate_labels_produce_duplicate_buttons() {
        let session = Storefront::new()
            .with_products(["Bike Light", "Bike Light"])
            .build();
        let found = session
            .find_elements(&inventory::add_to_cart_button("Bike Light"))
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_login_start_screen() {
        let session = Storefront::new().starting_at_login().build();
        assert_eq!(session.current_screen(), screens::LOGIN);
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_delay_hides_elements_at_first() {
        let session = Storefront::new()
            .with_render_delay(Duration::from_millis(250))
            .build();
        assert!(session
            .find_elements(&inventory::CONTAINER)
            .await
            .unwrap()
            .is_empty());
        tokio::time::advance(Duration::from_millis(250)).await;
        assert_eq!(
            session
                .find_elements(&inventory::CONTAINER)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_factory_opens_fresh_sessions() {
        let store = Storefront::new();
        let a = store.open().await.unwrap();
        a.quit().await.unwrap();
        let b = store.open().await.unwrap();
        assert_eq!(a.quit_count(), 1);
        assert_eq!(b.quit_count(), 0);
    }
}
