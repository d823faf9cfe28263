//! Page Object Model support.
//!
//! A page object scopes a fixed set of locators and task-level actions to one
//! logical screen. It composes an [`ElementInteractor`] (usually an
//! [`crate::Interactor`] borrowing the scenario's session) and holds nothing
//! else: no element handles, no references to other page objects.
//! Sequencing across pages belongs to [`crate::StepBinder`].

use crate::interaction::ElementInteractor;
use crate::locator::Locator;
use serde::{Deserialize, Serialize};

/// The logical screens the harness knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    /// Sign-in form
    Login,
    /// Product listing
    Inventory,
    /// Cart, customer information and overview
    Checkout,
    /// Order complete
    Confirmation,
}

impl PageKind {
    /// All kinds, in flow order
    pub const ALL: [Self; 4] = [
        Self::Login,
        Self::Inventory,
        Self::Checkout,
        Self::Confirmation,
    ];

    /// Get the page name for logging
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Inventory => "inventory",
            Self::Checkout => "checkout",
            Self::Confirmation => "confirmation",
        }
    }
}

impl std::fmt::Display for PageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for page objects representing one screen of the store.
///
/// # Example
///
/// ```ignore
/// pub struct CartPage<I> {
///     ui: I,
/// }
///
/// impl<I: ElementInteractor> PageObject<I> for CartPage<I> {
///     const KIND: PageKind = PageKind::Checkout;
///
///     fn open(ui: I) -> Self {
///         Self { ui }
///     }
///
///     fn landmark(&self) -> Locator {
///         Locator::id("cart_list")
///     }
/// }
/// ```
pub trait PageObject<I: ElementInteractor>: Sized {
    /// Which screen this is
    const KIND: PageKind;

    /// Wrap an interactor. Must not touch the session.
    fn open(ui: I) -> Self;

    /// Element whose visibility marks the screen as shown
    fn landmark(&self) -> Locator;
}

/// Static description of a page, for listings and diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    /// Which screen
    pub kind: PageKind,
    /// Fixed locators, by name
    pub locators: Vec<(&'static str, Locator)>,
}

impl PageSummary {
    /// Get a locator by name
    #[must_use]
    pub fn locator(&self, name: &str) -> Option<&Locator> {
        self.locators
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, l)| l)
    }

    /// Get all locator names
    #[must_use]
    pub fn locator_names(&self) -> Vec<&str> {
        self.locators.iter().map(|(n, _)| *n).collect()
    }
}
