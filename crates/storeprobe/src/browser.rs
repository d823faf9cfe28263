//! Real browser sessions over the Chrome `DevTools` Protocol.
//!
//! With the `browser` feature, [`ChromiumSession`] implements
//! [`Session`](crate::driver::Session) on a chromiumoxide page and
//! [`ChromiumFactory`] launches one browser per scenario. Without it only
//! [`BrowserConfig`] is available, so configuration files stay portable.

use serde::{Deserialize, Serialize};

/// Browser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// User agent string
    pub user_agent: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 800,
            chromium_path: None,
            user_agent: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Set user agent
    #[must_use]
    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

#[cfg(feature = "browser")]
#[allow(clippy::significant_drop_tightening, clippy::missing_errors_doc)]
mod cdp {
    use super::BrowserConfig;
    use crate::driver::{ElementHandle, Session};
    use crate::locator::{Locator, Query};
    use crate::result::{ProbeError, ProbeResult};
    use crate::scenario::SessionFactory;
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::input::InsertTextParams;
    use chromiumoxide::element::Element;
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
    use tokio::task::JoinHandle;
    use tracing::{debug, info};

    const IS_DISPLAYED_JS: &str = "function() { \
        const r = this.getBoundingClientRect(); \
        const s = window.getComputedStyle(this); \
        return r.width > 0 && r.height > 0 \
            && s.visibility !== 'hidden' && s.display !== 'none'; }";

    const IS_ENABLED_JS: &str = "function() { return !this.disabled; }";

    // Goes through the prototype setter so framework-controlled inputs
    // observe the change.
    const CLEAR_JS: &str = "function() { \
        const d = Object.getOwnPropertyDescriptor(Object.getPrototypeOf(this), 'value'); \
        if (d && d.set) { d.set.call(this, ''); } else if ('value' in this) { this.value = ''; } \
        this.dispatchEvent(new Event('input', { bubbles: true })); \
        this.dispatchEvent(new Event('change', { bubbles: true })); }";

    fn fault(e: impl std::fmt::Display) -> ProbeError {
        ProbeError::session_fault(e.to_string())
    }

    fn launch_error(e: impl std::fmt::Display) -> ProbeError {
        ProbeError::BrowserLaunch {
            message: e.to_string(),
        }
    }

    /// `cdp:{generation}#{index}`
    pub(super) fn parse_handle(id: &str) -> Option<(u64, usize)> {
        let (generation, index) = id.strip_prefix("cdp:")?.split_once('#')?;
        Some((generation.parse().ok()?, index.parse().ok()?))
    }

    /// Handles for the `count` elements returned by query `generation`
    pub(super) fn handles_for(generation: u64, count: usize) -> Vec<ElementHandle> {
        (0..count)
            .map(|i| ElementHandle::new(format!("cdp:{generation}#{i}")))
            .collect()
    }

    /// Arena index of `id`, if it came from query `generation`
    pub(super) fn live_index(id: &str, generation: u64) -> Option<usize> {
        let (issued, index) = parse_handle(id)?;
        (issued == generation).then_some(index)
    }

    /// Expression counting the nodes `xpath` selects in the document
    pub(super) fn xpath_count_js(xpath: &str) -> String {
        format!(
            "document.evaluate({}, document, null, \
             XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null).snapshotLength",
            serde_json::Value::from(xpath)
        )
    }

    /// `Input.insertText` carrying `text` unchanged, `None` for empty text.
    ///
    /// Inserted text bypasses the key table, so any character types.
    pub(super) fn insert_text(text: &str) -> Option<InsertTextParams> {
        (!text.is_empty()).then(|| InsertTextParams::new(text))
    }

    /// Launched Chromium process with its event handler task
    #[derive(Debug)]
    pub struct ChromiumBrowser {
        config: BrowserConfig,
        inner: CdpBrowser,
        handle: JoinHandle<()>,
    }

    impl ChromiumBrowser {
        /// Launch a new browser instance
        ///
        /// # Errors
        ///
        /// Returns `BrowserLaunch` if chromium cannot be started
        pub async fn launch(config: BrowserConfig) -> ProbeResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            if let Some(ref ua) = config.user_agent {
                builder = builder.arg(format!("--user-agent={ua}"));
            }

            let cdp_config = builder.build().map_err(launch_error)?;
            let (inner, mut handler) = CdpBrowser::launch(cdp_config)
                .await
                .map_err(launch_error)?;

            let handle = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            info!(headless = config.headless, "browser launched");
            Ok(Self {
                config,
                inner,
                handle,
            })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Open `url` in a new page. The session takes over the browser and
        /// closes it on `quit`.
        ///
        /// # Errors
        ///
        /// Returns `SessionFault` if the page cannot be created
        pub async fn open_session(self, url: &str) -> ProbeResult<ChromiumSession> {
            let page = self.inner.new_page(url).await.map_err(fault)?;
            debug!(url, "page opened");
            Ok(ChromiumSession {
                browser: Mutex::new(self.inner),
                handle: self.handle,
                page,
                arena: Mutex::new(Arena::default()),
                released: AtomicBool::new(false),
            })
        }
    }

    /// Elements returned by the latest query
    #[derive(Debug, Default)]
    struct Arena {
        generation: u64,
        elements: Vec<Element>,
    }

    /// [`Session`] backed by one Chromium page
    #[derive(Debug)]
    pub struct ChromiumSession {
        browser: Mutex<CdpBrowser>,
        handle: JoinHandle<()>,
        page: CdpPage,
        arena: Mutex<Arena>,
        released: AtomicBool,
    }

    impl ChromiumSession {
        fn ensure_live(&self) -> ProbeResult<()> {
            if self.released.load(Ordering::Acquire) {
                return Err(ProbeError::SessionReleased);
            }
            Ok(())
        }

        async fn element(&self, handle: &ElementHandle) -> ProbeResult<MappedMutexGuard<'_, Element>> {
            self.ensure_live()?;
            let stale =
                || ProbeError::session_fault(format!("stale element reference: {}", handle.id()));
            let arena = self.arena.lock().await;
            let index = live_index(handle.id(), arena.generation).ok_or_else(stale)?;
            MutexGuard::try_map(arena, |a| a.elements.get_mut(index)).map_err(|_| stale())
        }

        async fn xpath_count(&self, xpath: &str) -> ProbeResult<u64> {
            self.page
                .evaluate_expression(xpath_count_js(xpath))
                .await
                .map_err(fault)?
                .into_value::<u64>()
                .map_err(fault)
        }

        async fn js_bool(&self, handle: &ElementHandle, function: &str) -> ProbeResult<bool> {
            let element = self.element(handle).await?;
            let ret = element.call_js_fn(function, false).await.map_err(fault)?;
            Ok(ret
                .result
                .value
                .as_ref()
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false))
        }
    }

    #[async_trait]
    impl Session for ChromiumSession {
        async fn find_elements(&self, locator: &Locator) -> ProbeResult<Vec<ElementHandle>> {
            self.ensure_live()?;
            let found = match locator.to_query() {
                Query::Css(selector) => self.page.find_elements(selector).await,
                // DOM.getSearchResults rejects an empty range
                Query::XPath(expression) => {
                    if self.xpath_count(&expression).await? == 0 {
                        Ok(Vec::new())
                    } else {
                        self.page.find_xpaths(expression).await
                    }
                }
            }
            .map_err(fault)?;

            let mut arena = self.arena.lock().await;
            arena.generation += 1;
            let handles = handles_for(arena.generation, found.len());
            arena.elements = found;
            Ok(handles)
        }

        async fn click(&self, element: &ElementHandle) -> ProbeResult<()> {
            let _ = self.element(element).await?.click().await.map_err(fault)?;
            Ok(())
        }

        async fn clear(&self, element: &ElementHandle) -> ProbeResult<()> {
            let _ = self
                .element(element)
                .await?
                .call_js_fn(CLEAR_JS, false)
                .await
                .map_err(fault)?;
            Ok(())
        }

        async fn send_keys(&self, element: &ElementHandle, text: &str) -> ProbeResult<()> {
            {
                let target = self.element(element).await?;
                let _ = target.focus().await.map_err(fault)?;
            }
            if let Some(params) = insert_text(text) {
                let _ = self.page.execute(params).await.map_err(fault)?;
            }
            Ok(())
        }

        async fn text(&self, element: &ElementHandle) -> ProbeResult<String> {
            let text = self
                .element(element)
                .await?
                .inner_text()
                .await
                .map_err(fault)?;
            Ok(text.unwrap_or_default())
        }

        async fn is_displayed(&self, element: &ElementHandle) -> ProbeResult<bool> {
            self.js_bool(element, IS_DISPLAYED_JS).await
        }

        async fn is_enabled(&self, element: &ElementHandle) -> ProbeResult<bool> {
            self.js_bool(element, IS_ENABLED_JS).await
        }

        async fn quit(&self) -> ProbeResult<()> {
            if self.released.swap(true, Ordering::AcqRel) {
                return Err(ProbeError::SessionReleased);
            }
            self.arena.lock().await.elements.clear();
            let mut browser = self.browser.lock().await;
            let closed = browser.close().await.map_err(fault);
            let _ = browser.wait().await;
            self.handle.abort();
            info!("browser closed");
            closed.map(|_| ())
        }
    }

    /// Launches a fresh browser at `base_url` for every scenario
    #[derive(Debug, Clone)]
    pub struct ChromiumFactory {
        config: BrowserConfig,
        base_url: String,
    }

    impl ChromiumFactory {
        /// Create a factory
        #[must_use]
        pub fn new(config: BrowserConfig, base_url: impl Into<String>) -> Self {
            Self {
                config,
                base_url: base_url.into(),
            }
        }
    }

    #[async_trait]
    impl SessionFactory for ChromiumFactory {
        type Session = ChromiumSession;

        async fn open(&self) -> ProbeResult<ChromiumSession> {
            ChromiumBrowser::launch(self.config.clone())
                .await?
                .open_session(&self.base_url)
                .await
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::{ChromiumBrowser, ChromiumFactory, ChromiumSession};
