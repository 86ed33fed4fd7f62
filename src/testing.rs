//! Scripted stand-ins for the external collaborators, shared by unit tests.

use crate::browser::{Browser, Key, PageElement};
use crate::error::{BrowserError, ImageError, WorkItemError};
use crate::images::ImageSink;
use crate::settings::{ArticleLocators, Locators};
use crate::work_item::WorkItemSource;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory work item.
#[derive(Debug, Default)]
pub struct MapWorkItems {
    values: HashMap<String, String>,
}

impl MapWorkItems {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl WorkItemSource for MapWorkItems {
    fn get(&self, key: &str) -> Result<Option<String>, WorkItemError> {
        Ok(self.values.get(key).cloned())
    }
}

/// Article element answering the default [`ArticleLocators`].
#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    texts: HashMap<String, String>,
    attributes: HashMap<(String, String), String>,
    broken: bool,
}

impl FakeElement {
    pub fn article(title: &str, date: Option<&str>, image_url: Option<&str>) -> Self {
        let locators = ArticleLocators::default();
        let mut element = Self::default();
        element.texts.insert(locators.title, title.to_string());
        if let Some(date) = date {
            element.texts.insert(locators.date, date.to_string());
        }
        if let Some(url) = image_url {
            element
                .attributes
                .insert((locators.image, "src".to_string()), url.to_string());
        }
        element
    }

    /// Element whose every lookup fails, as a stale handle would.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        let locator = ArticleLocators::default().description;
        self.texts.insert(locator, description.to_string());
        self
    }

    pub fn with_link(mut self, href: &str) -> Self {
        let locator = ArticleLocators::default().link.unwrap_or_default();
        self.attributes
            .insert((locator, "href".to_string()), href.to_string());
        self
    }
}

impl PageElement for FakeElement {
    async fn text(&self, locator: &str) -> Result<Option<String>, BrowserError> {
        if self.broken {
            return Err(BrowserError::NotFound(locator.to_string()));
        }
        Ok(self.texts.get(locator).cloned())
    }

    async fn attribute(&self, locator: &str, name: &str) -> Result<Option<String>, BrowserError> {
        if self.broken {
            return Err(BrowserError::NotFound(locator.to_string()));
        }
        Ok(self
            .attributes
            .get(&(locator.to_string(), name.to_string()))
            .cloned())
    }
}

/// Browser serving a fixed list of result pages.
///
/// The next-page control is visible while another page remains, and clicking
/// it moves to that page. Every other locator is visible unless the topic
/// filter was hidden with [`FakeBrowser::without_topic_filter`].
#[derive(Debug)]
pub struct FakeBrowser {
    locators: Locators,
    pages: Vec<Vec<FakeElement>>,
    current: Cell<usize>,
    topic_visible: bool,
    failures: RefCell<HashMap<&'static str, u32>>,
    /// Failures that start counting once the next page was clicked.
    after_page_turn: RefCell<HashMap<&'static str, u32>>,
    rejected: HashSet<&'static str>,
    calls: RefCell<Vec<String>>,
}

impl FakeBrowser {
    pub fn new(pages: Vec<Vec<FakeElement>>) -> Self {
        Self {
            locators: Locators::default(),
            pages,
            current: Cell::new(0),
            topic_visible: true,
            failures: RefCell::new(HashMap::new()),
            after_page_turn: RefCell::new(HashMap::new()),
            rejected: HashSet::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn without_topic_filter(mut self) -> Self {
        self.topic_visible = false;
        self
    }

    /// Make the next `times` calls of `operation` time out.
    pub fn failing(self, operation: &'static str, times: u32) -> Self {
        self.failures.borrow_mut().insert(operation, times);
        self
    }

    /// Like [`FakeBrowser::failing`], armed by the first next-page click.
    pub fn failing_after_page_turn(self, operation: &'static str, times: u32) -> Self {
        self.after_page_turn.borrow_mut().insert(operation, times);
        self
    }

    /// Make every call of `operation` fail with an invalid locator.
    pub fn rejecting(mut self, operation: &'static str) -> Self {
        self.rejected.insert(operation);
        self
    }

    /// Every call made so far, as `operation(argument)`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, operation: &str) -> usize {
        let prefix = format!("{operation}(");
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.starts_with(&prefix))
            .count()
    }

    fn record(&self, operation: &'static str, argument: &str) -> Result<(), BrowserError> {
        self.calls
            .borrow_mut()
            .push(format!("{operation}({argument})"));
        if self.rejected.contains(operation) {
            return Err(BrowserError::InvalidLocator {
                locator: argument.to_string(),
                reason: "rejected".to_string(),
            });
        }
        let mut failures = self.failures.borrow_mut();
        match failures.get_mut(operation) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                Err(BrowserError::Timeout {
                    condition: argument.to_string(),
                    timeout: Duration::ZERO,
                })
            }
            _ => Ok(()),
        }
    }

    fn is_topic_locator(&self, locator: &str) -> bool {
        let prefix = self
            .locators
            .topic_label
            .split(crate::settings::TOPIC_PLACEHOLDER)
            .next()
            .unwrap_or_default();
        locator.starts_with(prefix)
    }
}

impl Browser for FakeBrowser {
    type Element = FakeElement;

    async fn open(&self, url: &str) -> Result<(), BrowserError> {
        self.record("open", url)
    }

    async fn is_visible(&self, locator: &str) -> Result<bool, BrowserError> {
        self.record("is_visible", locator)?;
        if locator == self.locators.next_page {
            return Ok(self.current.get() + 1 < self.pages.len());
        }
        if self.is_topic_locator(locator) {
            return Ok(self.topic_visible);
        }
        Ok(true)
    }

    async fn click(&self, locator: &str) -> Result<(), BrowserError> {
        self.record("click", locator)?;
        if locator == self.locators.next_page {
            if self.current.get() + 1 >= self.pages.len() {
                return Err(BrowserError::NotFound(locator.to_string()));
            }
            self.current.set(self.current.get() + 1);
            let armed = std::mem::take(&mut *self.after_page_turn.borrow_mut());
            self.failures.borrow_mut().extend(armed);
        }
        Ok(())
    }

    async fn input_text(&self, locator: &str, text: &str) -> Result<(), BrowserError> {
        self.record("input_text", &format!("{locator}, {text}"))
    }

    async fn press_key(&self, locator: &str, _key: Key) -> Result<(), BrowserError> {
        self.record("press_key", locator)
    }

    async fn wait_until_visible(
        &self,
        locator: &str,
        _timeout: Duration,
    ) -> Result<(), BrowserError> {
        self.record("wait_until_visible", locator)
    }

    async fn wait_until_contains(&self, text: &str, _timeout: Duration) -> Result<(), BrowserError> {
        self.record("wait_until_contains", text)
    }

    async fn select_checkbox(&self, locator: &str) -> Result<(), BrowserError> {
        self.record("select_checkbox", locator)
    }

    async fn select_from_list(&self, locator: &str, value: &str) -> Result<(), BrowserError> {
        self.record("select_from_list", &format!("{locator}, {value}"))
    }

    async fn get_elements(&self, locator: &str) -> Result<Vec<FakeElement>, BrowserError> {
        self.record("get_elements", locator)?;
        Ok(self
            .pages
            .get(self.current.get())
            .cloned()
            .unwrap_or_default())
    }

    async fn close(&self) -> Result<(), BrowserError> {
        self.record("close", "")
    }
}

/// Image sink that records requests instead of downloading.
#[derive(Debug, Default)]
pub struct RecordingImageSink {
    fail: bool,
    calls: Mutex<Vec<(String, PathBuf)>>,
}

impl RecordingImageSink {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ImageSink for RecordingImageSink {
    async fn save(&self, url: &str, path: &Path) -> Result<(), ImageError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), path.to_path_buf()));
        if self.fail {
            return Err(ImageError::Io(std::io::Error::other("disk full")));
        }
        Ok(())
    }
}
