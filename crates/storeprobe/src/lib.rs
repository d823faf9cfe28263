//! Storeprobe: page-object acceptance harness for storefront checkout flows
//!
//! Scenarios are lists of business-level steps ("add the backpack to the
//! cart", "complete the purchase"). Steps are bound to page objects, page
//! objects express intent through locators, and every element lookup goes
//! through one bounded wait-and-resolve primitive before reaching a browser
//! session.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    STOREPROBE Architecture                       │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Scenario   │    │ Step       │    │ Page       │            │
//! │   │ (YAML)     │───►│ Binder     │───►│ Objects    │            │
//! │   └────────────┘    └────────────┘    └─────┬──────┘            │
//! │                                             │ Locator           │
//! │   ┌────────────┐    ┌────────────┐    ┌─────▼──────┐            │
//! │   │ Chromium / │◄───│ Session    │◄───│ Interactor │            │
//! │   │ Mock store │    │ (trait)    │    │ (waits)    │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use storeprobe::{ScenarioRunner, ScenarioSuite, Storefront, WaitPolicy};
//!
//! # async fn run() -> storeprobe::ProbeResult<()> {
//! let policy = WaitPolicy::new(2_000, 100)?;
//! let runner = ScenarioRunner::new(Storefront::new()).with_policy(policy);
//! let outcome = runner.run(&ScenarioSuite::demo()).await;
//! assert!(outcome.all_passed());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod browser;
pub mod config;
mod driver;
mod harness;
mod interaction;
mod locator;
mod page_object;
pub mod pages;
mod result;
mod scenario;
mod steps;
pub mod storefront;
mod wait;

pub use browser::BrowserConfig;
#[cfg(feature = "browser")]
pub use browser::{ChromiumBrowser, ChromiumFactory, ChromiumSession};
pub use config::ProbeConfig;
pub use driver::{ElementHandle, MockElement, MockSession, MockSessionBuilder, Session, Transition};
pub use harness::{ScenarioOutcome, SuiteOutcome};
pub use interaction::{ElementInteractor, Interactor};
pub use locator::{css_string, xpath_literal, Locator, Query, Strategy};
pub use page_object::{PageKind, PageObject, PageSummary};
pub use pages::{CheckoutPage, ConfirmationPage, InventoryPage, LoginPage};
pub use result::{ProbeError, ProbeResult};
pub use scenario::{Credentials, Scenario, ScenarioRunner, ScenarioSuite, SessionFactory};
pub use steps::{ScenarioContext, Step, StepBinder};
pub use storefront::{demo_storefront, Storefront};
pub use wait::{
    Condition, MatchPolicy, WaitOutcome, WaitPolicy, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS,
};

/// Prelude for writing page objects and scenarios
pub mod prelude {
    pub use super::{
        Condition, ElementInteractor, Interactor, Locator, MatchPolicy, PageKind, PageObject,
        ProbeError, ProbeResult, Scenario, ScenarioRunner, ScenarioSuite, Session, Step,
        StepBinder, Strategy, WaitPolicy,
    };
}
