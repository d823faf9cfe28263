//! Step binding: scenario steps onto page-object operations.
//!
//! [`StepBinder`] owns a [`ScenarioContext`] for one scenario. Page objects
//! are created lazily on first reference and at most once per scenario;
//! every page receives a copy of the same interactor, so they all borrow the
//! one session. The binder keeps no element state of its own.

use crate::interaction::{ElementInteractor, Interactor};
use crate::page_object::{PageKind, PageObject};
use crate::pages::{CheckoutPage, ConfirmationPage, InventoryPage, LoginPage};
use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// One action or assertion of a purchase scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Sign in on the login screen
    LogIn {
        /// Account name
        username: String,
        /// Account password
        password: String,
    },
    /// Add the product with this exact label to the cart
    AddToCart {
        /// Displayed product label
        product: String,
    },
    /// Open the cart and start checkout
    ProceedToCheckout,
    /// Fill the customer information form and continue
    EnterShippingDetails {
        /// First name
        first_name: String,
        /// Last name
        last_name: String,
        /// Postal code
        postal_code: String,
    },
    /// Place the order
    CompletePurchase,
    /// Assert the confirmation contains `message`, then release the session
    ExpectConfirmation {
        /// Expected substring
        message: String,
    },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LogIn { username, .. } => write!(f, "log in as {username:?}"),
            Self::AddToCart { product } => write!(f, "add {product:?} to the cart"),
            Self::ProceedToCheckout => f.write_str("proceed to checkout"),
            Self::EnterShippingDetails {
                first_name,
                last_name,
                postal_code,
            } => write!(
                f,
                "enter shipping details {first_name:?} {last_name:?} {postal_code:?}"
            ),
            Self::CompletePurchase => f.write_str("complete the purchase"),
            Self::ExpectConfirmation { message } => {
                write!(f, "expect confirmation {message:?}")
            }
        }
    }
}

/// Scenario-scoped page objects, one slot per page kind
#[derive(Debug)]
pub struct ScenarioContext<I> {
    login: Option<LoginPage<I>>,
    inventory: Option<InventoryPage<I>>,
    checkout: Option<CheckoutPage<I>>,
    confirmation: Option<ConfirmationPage<I>>,
    opened: Vec<PageKind>,
}

impl<I> Default for ScenarioContext<I> {
    fn default() -> Self {
        Self {
            login: None,
            inventory: None,
            checkout: None,
            confirmation: None,
            opened: Vec::new(),
        }
    }
}

impl<I: ElementInteractor + Clone> ScenarioContext<I> {
    /// Create an empty context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn get_or_open<'a, P: PageObject<I>>(
        slot: &'a mut Option<P>,
        opened: &mut Vec<PageKind>,
        ui: &I,
    ) -> &'a P {
        slot.get_or_insert_with(|| {
            info!(page = %P::KIND, "opening page object");
            opened.push(P::KIND);
            P::open(ui.clone())
        })
    }

    /// The login page, created on first use
    pub fn login(&mut self, ui: &I) -> &LoginPage<I> {
        Self::get_or_open(&mut self.login, &mut self.opened, ui)
    }

    /// The inventory page, created on first use
    pub fn inventory(&mut self, ui: &I) -> &InventoryPage<I> {
        Self::get_or_open(&mut self.inventory, &mut self.opened, ui)
    }

    /// The checkout page, created on first use
    pub fn checkout(&mut self, ui: &I) -> &CheckoutPage<I> {
        Self::get_or_open(&mut self.checkout, &mut self.opened, ui)
    }

    /// The confirmation page, created on first use
    pub fn confirmation(&mut self, ui: &I) -> &ConfirmationPage<I> {
        Self::get_or_open(&mut self.confirmation, &mut self.opened, ui)
    }

    /// Page kinds created so far, in creation order
    #[must_use]
    pub fn opened(&self) -> &[PageKind] {
        &self.opened
    }

    /// How many times `kind` has been created in this scenario
    #[must_use]
    pub fn open_count(&self, kind: PageKind) -> usize {
        self.opened.iter().filter(|k| **k == kind).count()
    }

    /// Drop every page object
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Binds scenario steps to page objects over one session
#[derive(Debug)]
pub struct StepBinder<'s> {
    ui: Interactor<'s>,
    context: ScenarioContext<Interactor<'s>>,
    released: bool,
}

impl<'s> StepBinder<'s> {
    /// Create a binder with a fresh context
    #[must_use]
    pub fn new(ui: Interactor<'s>) -> Self {
        Self {
            ui,
            context: ScenarioContext::new(),
            released: false,
        }
    }

    /// Get the scenario context
    #[must_use]
    pub const fn context(&self) -> &ScenarioContext<Interactor<'s>> {
        &self.context
    }

    /// Whether the session has been released through this binder
    #[must_use]
    pub const fn is_released(&self) -> bool {
        self.released
    }

    /// Run one step.
    ///
    /// # Errors
    ///
    /// Whatever the page operation raises, unchanged, or `AssertionFailed`
    /// from `ExpectConfirmation`.
    pub async fn apply(&mut self, step: &Step) -> ProbeResult<()> {
        info!(%step, "step");
        let ui = &self.ui;
        match step {
            Step::LogIn { username, password } => {
                self.context.login(ui).log_in(username, password).await
            }
            Step::AddToCart { product } => {
                self.context.inventory(ui).add_product_to_cart(product).await
            }
            Step::ProceedToCheckout => {
                self.context.inventory(ui).go_to_cart().await?;
                self.context.checkout(ui).proceed_to_checkout().await
            }
            Step::EnterShippingDetails {
                first_name,
                last_name,
                postal_code,
            } => {
                self.context
                    .checkout(ui)
                    .enter_customer_info(first_name, last_name, postal_code)
                    .await
            }
            Step::CompletePurchase => self.context.checkout(ui).finish_purchase().await,
            Step::ExpectConfirmation { message } => self.expect_confirmation(message).await,
        }
    }

    /// Assert the confirmation contains `expected`, then release the session.
    ///
    /// The session is released only when the assertion holds.
    pub async fn expect_confirmation(&mut self, expected: &str) -> ProbeResult<()> {
        let actual = self
            .context
            .confirmation(&self.ui)
            .confirmation_message()
            .await?;
        if !actual.contains(expected) {
            warn!(expected, actual = %actual, "confirmation mismatch");
            return Err(ProbeError::AssertionFailed {
                expected: expected.to_string(),
                actual,
            });
        }
        self.release().await
    }

    /// Quit the session. Later calls are no-ops.
    pub async fn release(&mut self) -> ProbeResult<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        info!("releasing session");
        self.ui.session().quit().await
    }
}
