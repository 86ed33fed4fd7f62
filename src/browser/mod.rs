//! Browser capability used by the scrape engine.
//!
//! The engine never interprets locators itself. It hands opaque selector
//! strings to a [`Browser`] and reads fields out of the [`PageElement`]
//! handles the browser returns. Any driver that can open a page, find and
//! poke at elements and wait for a condition can run a scrape.
//!
//! # Implementations
//!
//! | Type | Module | Notes |
//! |------|--------|-------|
//! | [`HttpBrowser`] | [`http`] | Server-rendered pages over `reqwest`, CSS locators, forms re-submitted as GET |
//!
//! Tests use the scripted fakes in `crate::testing`.
//!
//! # Call Discipline
//!
//! A browser session is not shared between concurrent callers. The engine
//! awaits every call before issuing the next one.

pub mod http;

pub use http::HttpBrowser;

use crate::error::BrowserError;
use std::time::Duration;

/// Keys the engine may press on an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Submits the form the element belongs to.
    Enter,
}

/// A browser session driving one page at a time.
pub trait Browser {
    /// Handle type returned by [`Browser::get_elements`].
    type Element: PageElement;

    /// Navigate to `url`.
    async fn open(&self, url: &str) -> Result<(), BrowserError>;

    /// Whether at least one element matches `locator` right now.
    async fn is_visible(&self, locator: &str) -> Result<bool, BrowserError>;

    /// Click the first element matching `locator`.
    ///
    /// A click that navigates has finished loading the new page when this
    /// returns; callers must not repeat it on a later error.
    async fn click(&self, locator: &str) -> Result<(), BrowserError>;

    /// Type `text` into the field matched by `locator`.
    async fn input_text(&self, locator: &str, text: &str) -> Result<(), BrowserError>;

    async fn press_key(&self, locator: &str, key: Key) -> Result<(), BrowserError>;

    /// Block until `locator` matches or `timeout` elapses.
    async fn wait_until_visible(
        &self,
        locator: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError>;

    /// Block until the page text contains `text` or `timeout` elapses.
    async fn wait_until_contains(&self, text: &str, timeout: Duration) -> Result<(), BrowserError>;

    /// Tick the checkbox matched by `locator`. Ticking a ticked box is a no-op.
    async fn select_checkbox(&self, locator: &str) -> Result<(), BrowserError>;

    /// Choose the option with `value` in the list matched by `locator`.
    async fn select_from_list(&self, locator: &str, value: &str) -> Result<(), BrowserError>;

    /// Handles for every element matching `locator`, in document order.
    async fn get_elements(&self, locator: &str) -> Result<Vec<Self::Element>, BrowserError>;

    /// End the session. Nothing may be called afterwards.
    async fn close(&self) -> Result<(), BrowserError>;
}

/// Handle to one element on a rendered page.
///
/// Lookups are relative to the element. A locator that matches nothing is
/// reported as `Ok(None)`, not as an error.
pub trait PageElement {
    /// Whitespace-normalised text of the first descendant matching `locator`.
    async fn text(&self, locator: &str) -> Result<Option<String>, BrowserError>;

    /// Attribute `name` of the first descendant matching `locator`.
    ///
    /// `href` and `src` come back as absolute URLs, the way a live browser
    /// reports them.
    async fn attribute(&self, locator: &str, name: &str) -> Result<Option<String>, BrowserError>;
}
