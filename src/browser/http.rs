//! Static-HTML browser over HTTP.
//!
//! [`HttpBrowser`] drives server-rendered search pages without a real
//! browser engine. Pages are fetched with `reqwest` and queried with
//! `scraper`; nothing on the page is executed.
//!
//! # Locators
//!
//! A locator is a chain of steps separated by `>>`:
//!
//! ```text
//! label >> text=California >> input[type='checkbox']
//! ```
//!
//! - a CSS step selects descendants of the current matches,
//! - a `text=` step keeps the current matches whose normalised text contains
//!   the needle.
//!
//! The first step must be CSS.
//!
//! # Interaction Model
//!
//! - `click` follows the target's link (or the first link inside it); a
//!   submit button re-submits its form; anything else is inert.
//! - `input_text` remembers a value for the named field.
//! - `press_key(Enter)`, `select_checkbox` and `select_from_list` re-submit
//!   the enclosing form as a GET request with the changed field. Controls
//!   outside any form edit the current URL's query string instead.
//! - `wait_until_*` re-fetch the current page every poll interval until the
//!   condition holds or the timeout elapses.

use super::{Browser, Key, PageElement};
use crate::error::BrowserError;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, instrument};
use url::Url;

const USER_AGENT: &str = concat!("fresh_news_scraper/", env!("CARGO_PKG_VERSION"));
const TEXT_STEP: &str = "text=";

static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static OPTION: Lazy<Selector> = Lazy::new(|| Selector::parse("option").unwrap());
static FORM_FIELDS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("input[name], select[name], textarea[name]").unwrap());

#[derive(Debug, Clone)]
enum Step {
    Css(Selector),
    Text(String),
}

/// A parsed locator string.
#[derive(Debug, Clone)]
pub struct Locator {
    source: String,
    steps: Vec<Step>,
}

impl Locator {
    pub fn parse(source: &str) -> Result<Self, BrowserError> {
        let invalid = |reason: String| BrowserError::InvalidLocator {
            locator: source.to_string(),
            reason,
        };

        let mut steps = Vec::new();
        for raw in source.split(">>").map(str::trim) {
            if raw.is_empty() {
                return Err(invalid("empty step".to_string()));
            }
            if let Some(needle) = raw.strip_prefix(TEXT_STEP) {
                let needle =
                    normalize_whitespace(needle.trim_matches(|c: char| c == '\'' || c == '"'));
                if needle.is_empty() {
                    return Err(invalid("empty text step".to_string()));
                }
                steps.push(Step::Text(needle));
            } else {
                let selector = Selector::parse(raw).map_err(|e| invalid(e.to_string()))?;
                steps.push(Step::Css(selector));
            }
        }

        if !matches!(steps.first(), Some(Step::Css(_))) {
            return Err(invalid("first step must be a CSS selector".to_string()));
        }
        Ok(Self {
            source: source.to_string(),
            steps,
        })
    }

    /// Every element under `scope` this locator matches, in document order.
    fn find_all<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        let mut current = vec![scope];
        for step in &self.steps {
            current = match step {
                Step::Css(selector) => current
                    .iter()
                    .flat_map(|el| el.select(selector))
                    .unique_by(|el| el.id())
                    .collect(),
                Step::Text(needle) => current
                    .into_iter()
                    .filter(|el| element_text(*el).contains(needle.as_str()))
                    .collect(),
            };
        }
        current
    }

    fn find_first<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.find_all(scope).into_iter().next()
    }

    fn require<'a>(&self, scope: ElementRef<'a>) -> Result<ElementRef<'a>, BrowserError> {
        self.find_first(scope)
            .ok_or_else(|| BrowserError::NotFound(self.source.clone()))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[derive(Debug, Default)]
struct PageState {
    url: Option<Url>,
    html: String,
    /// Values typed into named fields since the last navigation.
    typed: Vec<(String, String)>,
}

/// A [`Browser`] for server-rendered pages.
pub struct HttpBrowser {
    client: reqwest::Client,
    poll_interval: Duration,
    state: Mutex<PageState>,
}

impl fmt::Debug for HttpBrowser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpBrowser")
            .field("poll_interval", &self.poll_interval)
            .field("url", &self.lock().url)
            .finish()
    }
}

impl HttpBrowser {
    /// Build a browser with its own HTTP client.
    pub fn new(poll_interval: Duration) -> Result<Self, BrowserError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self::with_client(client, poll_interval))
    }

    pub fn with_client(client: reqwest::Client, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
            state: Mutex::new(PageState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// URL and HTML of the current page.
    fn page(&self) -> Result<(Url, String), BrowserError> {
        let state = self.lock();
        let url = state.url.clone().ok_or(BrowserError::NoPage)?;
        Ok((url, state.html.clone()))
    }

    fn typed(&self) -> Vec<(String, String)> {
        self.lock().typed.clone()
    }

    #[instrument(level = "debug", skip(self), fields(%url))]
    async fn navigate(&self, url: Url) -> Result<(), BrowserError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let final_url = response.url().clone();
        let html = response.text().await?;
        info!(url = %final_url, bytes = html.len(), "Page loaded");

        let mut state = self.lock();
        state.url = Some(final_url);
        state.html = html;
        state.typed.clear();
        Ok(())
    }

    async fn reload(&self) -> Result<(), BrowserError> {
        let (url, _) = self.page()?;
        self.navigate(url).await
    }

    /// Re-fetch the page until `check` accepts its HTML or `timeout` elapses.
    async fn poll_until<F>(
        &self,
        condition: String,
        timeout: Duration,
        check: F,
    ) -> Result<(), BrowserError>
    where
        F: Fn(&str) -> bool,
    {
        let deadline = Instant::now() + timeout;
        loop {
            let (_, html) = self.page()?;
            if check(&html) {
                return Ok(());
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(BrowserError::Timeout { condition, timeout });
            }
            sleep(self.poll_interval.min(deadline - now)).await;
            debug!(%condition, "Condition not met yet; reloading");
            self.reload().await?;
        }
    }

    #[cfg(test)]
    pub(crate) fn load(&self, url: &str, html: &str) {
        let mut state = self.lock();
        state.url = Some(Url::parse(url).unwrap());
        state.html = html.to_string();
        state.typed.clear();
    }
}

impl Browser for HttpBrowser {
    type Element = HtmlElement;

    #[instrument(level = "info", skip(self))]
    async fn open(&self, url: &str) -> Result<(), BrowserError> {
        let url = Url::parse(url)?;
        self.navigate(url).await
    }

    async fn is_visible(&self, locator: &str) -> Result<bool, BrowserError> {
        let locator = Locator::parse(locator)?;
        let (_, html) = self.page()?;
        Ok(matches_any(&html, &locator))
    }

    #[instrument(level = "debug", skip(self))]
    async fn click(&self, locator: &str) -> Result<(), BrowserError> {
        let locator = Locator::parse(locator)?;
        let (url, html) = self.page()?;
        match plan_click(&url, &html, &locator, &self.typed())? {
            Some(next) => self.navigate(next).await,
            None => {
                debug!(%locator, "Click has no effect on a static page");
                Ok(())
            }
        }
    }

    #[instrument(level = "debug", skip(self, text))]
    async fn input_text(&self, locator: &str, text: &str) -> Result<(), BrowserError> {
        let locator = Locator::parse(locator)?;
        let (_, html) = self.page()?;
        let name = text_field_name(&html, &locator)?;

        let mut state = self.lock();
        state.typed.retain(|(k, _)| *k != name);
        state.typed.push((name, text.to_string()));
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn press_key(&self, locator: &str, key: Key) -> Result<(), BrowserError> {
        let locator = Locator::parse(locator)?;
        let (url, html) = self.page()?;
        match key {
            Key::Enter => {
                let next =
                    plan_submission(&url, &html, &locator, FieldChange::Submit, &self.typed())?;
                self.navigate(next).await
            }
        }
    }

    async fn wait_until_visible(
        &self,
        locator: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let parsed = Locator::parse(locator)?;
        self.poll_until(format!("`{locator}` to be visible"), timeout, |html| {
            matches_any(html, &parsed)
        })
        .await
    }

    async fn wait_until_contains(&self, text: &str, timeout: Duration) -> Result<(), BrowserError> {
        let needle = normalize_whitespace(text);
        self.poll_until(format!("text `{text}`"), timeout, |html| {
            page_text(html).contains(&needle)
        })
        .await
    }

    #[instrument(level = "debug", skip(self))]
    async fn select_checkbox(&self, locator: &str) -> Result<(), BrowserError> {
        let locator = Locator::parse(locator)?;
        let (url, html) = self.page()?;
        let next = plan_submission(&url, &html, &locator, FieldChange::Check, &self.typed())?;
        self.navigate(next).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn select_from_list(&self, locator: &str, value: &str) -> Result<(), BrowserError> {
        let locator = Locator::parse(locator)?;
        let (url, html) = self.page()?;
        let next = plan_submission(
            &url,
            &html,
            &locator,
            FieldChange::Select(value),
            &self.typed(),
        )?;
        self.navigate(next).await
    }

    async fn get_elements(&self, locator: &str) -> Result<Vec<HtmlElement>, BrowserError> {
        let locator = Locator::parse(locator)?;
        let (url, html) = self.page()?;
        let document = Html::parse_document(&html);
        let elements = locator
            .find_all(document.root_element())
            .into_iter()
            .map(|el| HtmlElement {
                html: el.html(),
                base: url.clone(),
            })
            .collect::<Vec<_>>();
        debug!(%locator, count = elements.len(), "Collected elements");
        Ok(elements)
    }

    async fn close(&self) -> Result<(), BrowserError> {
        *self.lock() = PageState::default();
        info!("Browser closed");
        Ok(())
    }
}

/// Snapshot of one element, detached from the page it came from.
#[derive(Debug, Clone)]
pub struct HtmlElement {
    html: String,
    base: Url,
}

impl PageElement for HtmlElement {
    async fn text(&self, locator: &str) -> Result<Option<String>, BrowserError> {
        let locator = Locator::parse(locator)?;
        let fragment = Html::parse_fragment(&self.html);
        Ok(locator
            .find_first(fragment.root_element())
            .map(element_text)
            .filter(|text| !text.is_empty()))
    }

    async fn attribute(&self, locator: &str, name: &str) -> Result<Option<String>, BrowserError> {
        let locator = Locator::parse(locator)?;
        let fragment = Html::parse_fragment(&self.html);
        let value = locator
            .find_first(fragment.root_element())
            .and_then(|el| el.value().attr(name))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Ok(match (name, value) {
            ("href" | "src", Some(v)) => Some(self.base.join(&v).map(String::from).unwrap_or(v)),
            (_, value) => value,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum FieldChange<'v> {
    Submit,
    Check,
    Select(&'v str),
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().join(" ")
}

fn element_text(el: ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().join(" "))
}

fn page_text(html: &str) -> String {
    element_text(Html::parse_document(html).root_element())
}

fn matches_any(html: &str, locator: &Locator) -> bool {
    let document = Html::parse_document(html);
    locator.find_first(document.root_element()).is_some()
}

fn enclosing_form(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "form")
}

fn input_type(el: ElementRef<'_>) -> Option<String> {
    (el.value().name() == "input")
        .then(|| el.value().attr("type").unwrap_or("text").to_ascii_lowercase())
}

fn is_submit_control(el: ElementRef<'_>) -> bool {
    match el.value().name() {
        "button" => el
            .value()
            .attr("type")
            .is_none_or(|t| t.eq_ignore_ascii_case("submit")),
        "input" => matches!(input_type(el).as_deref(), Some("submit" | "image")),
        _ => false,
    }
}

fn link_href(el: ElementRef<'_>) -> Option<&str> {
    let href = if el.value().name() == "a" {
        el.value().attr("href")
    } else {
        el.select(&LINK).next().and_then(|a| a.value().attr("href"))
    }?;
    let href = href.trim();
    (!href.is_empty() && !href.starts_with("javascript:")).then_some(href)
}

fn option_value(option: ElementRef<'_>) -> String {
    option
        .value()
        .attr("value")
        .map(str::to_string)
        .unwrap_or_else(|| element_text(option))
}

fn selected_option(select: ElementRef<'_>) -> Option<String> {
    select
        .select(&OPTION)
        .find(|o| o.value().attr("selected").is_some())
        .or_else(|| select.select(&OPTION).next())
        .map(option_value)
}

/// Name/value pairs a browser would submit for `form` as rendered.
fn form_fields(form: ElementRef<'_>) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    for field in form.select(&FORM_FIELDS) {
        let Some(name) = field.value().attr("name") else {
            continue;
        };
        let value = match field.value().name() {
            "input" => match input_type(field).as_deref() {
                Some("submit" | "button" | "image" | "reset" | "file") => None,
                Some("checkbox" | "radio") => field
                    .value()
                    .attr("checked")
                    .map(|_| field.value().attr("value").unwrap_or("on").to_string()),
                _ => Some(field.value().attr("value").unwrap_or_default().to_string()),
            },
            "select" => selected_option(field),
            "textarea" => Some(field.text().collect()),
            _ => None,
        };
        if let Some(value) = value {
            fields.push((name.to_string(), value));
        }
    }
    fields
}

fn set_field(fields: &mut Vec<(String, String)>, name: &str, value: &str) {
    fields.retain(|(k, _)| k != name);
    fields.push((name.to_string(), value.to_string()));
}

fn field_name<'a>(
    el: ElementRef<'a>,
    locator: &Locator,
    action: &'static str,
) -> Result<&'a str, BrowserError> {
    el.value()
        .attr("name")
        .ok_or_else(|| BrowserError::Unsupported {
            locator: locator.to_string(),
            action,
        })
}

fn text_field_name(html: &str, locator: &Locator) -> Result<String, BrowserError> {
    let document = Html::parse_document(html);
    let target = locator.require(document.root_element())?;
    let is_text_field = match target.value().name() {
        "textarea" => true,
        "input" => !matches!(
            input_type(target).as_deref(),
            Some("checkbox" | "radio" | "submit" | "button" | "image" | "reset" | "file")
        ),
        _ => false,
    };
    if !is_text_field {
        return Err(BrowserError::Unsupported {
            locator: locator.to_string(),
            action: "text input",
        });
    }
    field_name(target, locator, "text input").map(str::to_string)
}

/// Where a click on `locator` leads, if anywhere.
fn plan_click(
    page_url: &Url,
    html: &str,
    locator: &Locator,
    typed: &[(String, String)],
) -> Result<Option<Url>, BrowserError> {
    let document = Html::parse_document(html);
    let target = locator.require(document.root_element())?;

    if let Some(href) = link_href(target) {
        return Ok(Some(page_url.join(href)?));
    }
    if is_submit_control(target) && enclosing_form(target).is_some() {
        return plan_submission(page_url, html, locator, FieldChange::Submit, typed).map(Some);
    }
    Ok(None)
}

/// URL of the GET request that submits the form around `locator` after `change`.
fn plan_submission(
    page_url: &Url,
    html: &str,
    locator: &Locator,
    change: FieldChange<'_>,
    typed: &[(String, String)],
) -> Result<Url, BrowserError> {
    let document = Html::parse_document(html);
    let target = locator.require(document.root_element())?;

    let (mut action, mut fields) = match enclosing_form(target) {
        Some(form) => {
            let action = match form.value().attr("action").map(str::trim) {
                Some(a) if !a.is_empty() => page_url.join(a)?,
                _ => page_url.clone(),
            };
            (action, form_fields(form))
        }
        None => (
            page_url.clone(),
            page_url.query_pairs().into_owned().collect(),
        ),
    };

    for (name, value) in typed {
        set_field(&mut fields, name, value);
    }

    match change {
        FieldChange::Submit => {}
        FieldChange::Check => {
            if input_type(target).as_deref() != Some("checkbox") {
                return Err(BrowserError::Unsupported {
                    locator: locator.to_string(),
                    action: "checkbox selection",
                });
            }
            let name = field_name(target, locator, "checkbox selection")?;
            let value = target.value().attr("value").unwrap_or("on");
            if !fields.iter().any(|(k, v)| k == name && v == value) {
                fields.push((name.to_string(), value.to_string()));
            }
        }
        FieldChange::Select(value) => {
            if target.value().name() != "select" {
                return Err(BrowserError::Unsupported {
                    locator: locator.to_string(),
                    action: "list selection",
                });
            }
            let name = field_name(target, locator, "list selection")?;
            if !target.select(&OPTION).any(|o| option_value(o) == value) {
                return Err(BrowserError::NotFound(format!(
                    "{locator} option with value `{value}`"
                )));
            }
            set_field(&mut fields, name, value);
        }
    }

    action.set_fragment(None);
    action.set_query(None);
    if !fields.is_empty() {
        action.query_pairs_mut().extend_pairs(fields.iter());
    }
    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_PAGE: &str = r#"
        <html><body>
          <button data-element="search-button" type="button">Search</button>
          <form action="/search" method="get">
            <input data-element="search-form-input" name="q" value="">
            <input type="hidden" name="lang" value="en">
            <button type="submit">Go</button>
          </form>
          <form action="/search">
            <input type="hidden" name="q" value="climate change">
            <label><span>California</span><input type="checkbox" name="f0" value="00000163-01e2"></label>
            <label><span>Politics</span><input type="checkbox" name="f0" value="00000168-8694" checked></label>
            <select name="s">
              <option value="0" selected>Relevance</option>
              <option value="1">Newest</option>
            </select>
          </form>
          <ul>
            <li><ps-promo>
              <h3><a href="/story/2024-05-06/heat">Heat wave   hits</a></h3>
              <p class="promo-description">Record temperatures</p>
              <p class="promo-timestamp">May 6, 2024</p>
              <picture><img src="https://cdn.example.com/resize/?url=a%2Fb%2Fheat.jpg"></picture>
            </ps-promo></li>
            <li><ps-promo>
              <h3><a href="https://other.example.com/x">Second</a></h3>
            </ps-promo></li>
          </ul>
          <div class="search-results-module-next-page"><a href="/search?q=climate+change&p=2">Next</a></div>
        </body></html>
    "#;

    fn loaded() -> HttpBrowser {
        let browser = HttpBrowser::with_client(reqwest::Client::new(), Duration::from_millis(10));
        browser.load("https://news.example.com/search?q=climate+change", SEARCH_PAGE);
        browser
    }

    fn locator(s: &str) -> Locator {
        Locator::parse(s).unwrap()
    }

    fn base() -> Url {
        Url::parse("https://news.example.com/search?q=climate+change").unwrap()
    }

    #[test]
    fn test_locator_rejects_bad_input() {
        assert!(matches!(
            Locator::parse("text=California"),
            Err(BrowserError::InvalidLocator { .. })
        ));
        assert!(matches!(
            Locator::parse("label >> "),
            Err(BrowserError::InvalidLocator { .. })
        ));
        assert!(matches!(
            Locator::parse("div[[["),
            Err(BrowserError::InvalidLocator { .. })
        ));
    }

    #[test]
    fn test_text_step_filters_by_label() {
        let document = Html::parse_document(SEARCH_PAGE);
        let found = locator("label >> text=California >> input[type='checkbox']")
            .find_all(document.root_element());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value().attr("value"), Some("00000163-01e2"));

        let missing = locator("label >> text=Sports").find_all(document.root_element());
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn test_is_visible_and_zero_timeout_wait() {
        let browser = loaded();
        assert!(browser.is_visible("li ps-promo").await.unwrap());
        assert!(!browser.is_visible("label >> text=Sports").await.unwrap());
        assert!(
            browser
                .wait_until_contains("Heat wave hits", Duration::ZERO)
                .await
                .is_ok()
        );

        let err = browser
            .wait_until_visible("div.nothing", Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, BrowserError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_no_page_before_open() {
        let browser = HttpBrowser::with_client(reqwest::Client::new(), Duration::ZERO);
        assert!(matches!(
            browser.is_visible("body").await,
            Err(BrowserError::NoPage)
        ));
    }

    #[tokio::test]
    async fn test_elements_resolve_links_and_images() {
        let browser = loaded();
        let elements = browser.get_elements("li > ps-promo").await.unwrap();
        assert_eq!(elements.len(), 2);

        let first = &elements[0];
        assert_eq!(
            first.text("h3 a").await.unwrap().as_deref(),
            Some("Heat wave hits")
        );
        assert_eq!(
            first.attribute("h3 a", "href").await.unwrap().as_deref(),
            Some("https://news.example.com/story/2024-05-06/heat")
        );
        assert_eq!(
            first.attribute("picture img", "src").await.unwrap().as_deref(),
            Some("https://cdn.example.com/resize/?url=a%2Fb%2Fheat.jpg")
        );

        let second = &elements[1];
        assert_eq!(second.text("p.promo-timestamp").await.unwrap(), None);
        assert_eq!(second.attribute("picture img", "src").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_typed_text_is_submitted_with_form() {
        let browser = loaded();
        browser
            .input_text("input[data-element='search-form-input']", "wildfire smoke")
            .await
            .unwrap();

        let (url, html) = browser.page().unwrap();
        let next = plan_submission(
            &url,
            &html,
            &locator("input[data-element='search-form-input']"),
            FieldChange::Submit,
            &browser.typed(),
        )
        .unwrap();
        assert_eq!(
            next.as_str(),
            "https://news.example.com/search?lang=en&q=wildfire+smoke"
        );
    }

    #[tokio::test]
    async fn test_input_text_rejects_checkbox() {
        let browser = loaded();
        let err = browser
            .input_text("input[type='checkbox']", "x")
            .await
            .unwrap_err();
        assert!(matches!(err, BrowserError::Unsupported { .. }));
    }

    #[test]
    fn test_checkbox_adds_value_and_keeps_checked_ones() {
        let next = plan_submission(
            &base(),
            SEARCH_PAGE,
            &locator("label >> text=California >> input[type='checkbox']"),
            FieldChange::Check,
            &[],
        )
        .unwrap();
        assert_eq!(
            next.as_str(),
            "https://news.example.com/search?q=climate+change&f0=00000168-8694&s=0&f0=00000163-01e2"
        );
    }

    #[test]
    fn test_select_replaces_value() {
        let next = plan_submission(
            &base(),
            SEARCH_PAGE,
            &locator("select[name='s']"),
            FieldChange::Select("1"),
            &[],
        )
        .unwrap();
        assert_eq!(
            next.as_str(),
            "https://news.example.com/search?q=climate+change&f0=00000168-8694&s=1"
        );

        let err = plan_submission(
            &base(),
            SEARCH_PAGE,
            &locator("select[name='s']"),
            FieldChange::Select("7"),
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, BrowserError::NotFound(_)));
    }

    #[test]
    fn test_click_follows_links_and_ignores_script_buttons() {
        let next = plan_click(
            &base(),
            SEARCH_PAGE,
            &locator("div.search-results-module-next-page"),
            &[],
        )
        .unwrap();
        assert_eq!(
            next.unwrap().as_str(),
            "https://news.example.com/search?q=climate+change&p=2"
        );

        let inert = plan_click(
            &base(),
            SEARCH_PAGE,
            &locator("button[data-element='search-button']"),
            &[],
        )
        .unwrap();
        assert!(inert.is_none());

        let submit = plan_click(&base(), SEARCH_PAGE, &locator("button[type='submit']"), &[])
            .unwrap()
            .unwrap();
        assert_eq!(submit.as_str(), "https://news.example.com/search?q=&lang=en");
    }
}
