//! The scrape state machine.
//!
//! A run walks through
//!
//! ```text
//! Init -> SearchSubmitted -> FiltersApplied -> Sorted -> PageExtracted -> NextPage | Done
//!                                                          ^                |
//!                                                          +----------------+
//! ```
//!
//! Every step that touches the browser runs under the run's
//! [`RetryPolicy`](crate::retry::RetryPolicy). Results are assumed newest
//! first, so the first article older than the date window ends the whole
//! run, not just the current page.
//!
//! # Failure Handling
//!
//! - A missing topic filter is logged and skipped.
//! - Only transient browser errors are retried; a malformed locator fails
//!   the step at once.
//! - A step that still fails after the last attempt ends the run with its error.
//! - Turning the page is its own step. Waiting for the new page belongs to
//!   the page read, so a slow page is re-read, never clicked past.
//! - A results page without articles is read as empty, not as a failure.
//! - Records of a page are kept only once that page was read successfully,
//!   so a retried page never contributes twice.

use crate::browser::{Browser, Key};
use crate::context::RunContext;
use crate::error::BrowserError;
use crate::extract::ArticleExtractor;
use crate::images::{ImageSink, capture_images};
use crate::models::{ArticleRecord, ExtractedArticle};
use crate::utils::truncate_for_log;
use tracing::{info, instrument, warn};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Init,
    SearchSubmitted,
    FiltersApplied,
    Sorted,
    PageExtracted,
    NextPage,
    Done,
}

/// Articles read from one results page.
#[derive(Debug)]
struct PageOutcome {
    /// Accepted articles, in page order.
    articles: Vec<ExtractedArticle>,
    /// An article fell outside the date window; nothing after it is wanted.
    exhausted: bool,
}

/// Drives one browser session from the home page to the last wanted article.
pub struct PaginationController<'a, B: Browser, S: ImageSink> {
    browser: &'a B,
    images: &'a S,
    ctx: &'a RunContext,
    extractor: ArticleExtractor,
    state: NavState,
    pages: u32,
    records: Vec<ArticleRecord>,
}

impl<'a, B: Browser, S: ImageSink> PaginationController<'a, B, S> {
    pub fn new(browser: &'a B, images: &'a S, ctx: &'a RunContext) -> Self {
        let extractor = ArticleExtractor::new(
            ctx.settings.locators.article.clone(),
            ctx.settings.extraction.clone(),
        );
        Self {
            browser,
            images,
            ctx,
            extractor,
            state: NavState::Init,
            pages: 0,
            records: Vec::new(),
        }
    }

    /// Run the whole workflow and hand back the accumulated records.
    #[instrument(level = "info", skip_all, fields(
        phrase = %self.ctx.criteria.search_phrase,
        topic = %self.ctx.criteria.topic,
        since = %self.ctx.window.start,
    ))]
    pub async fn run(mut self) -> Result<Vec<ArticleRecord>, BrowserError> {
        let ctx = self.ctx;
        let retry = &ctx.retry;

        let transient = BrowserError::is_transient;

        retry.guard_when("open", transient, || self.open()).await?;
        retry.guard_when("search", transient, || self.search()).await?;
        self.transition(NavState::SearchSubmitted);

        if retry.guard_when("filter", transient, || self.filter()).await? {
            self.transition(NavState::FiltersApplied);
        }

        retry.guard_when("sort", transient, || self.sort()).await?;
        self.transition(NavState::Sorted);

        loop {
            let outcome = retry
                .guard_when("scrape_page", transient, || self.scrape_page())
                .await?;
            self.pages += 1;
            self.transition(NavState::PageExtracted);
            self.accept(outcome.articles).await;

            if outcome.exhausted {
                info!("News is out of the date range; stopping");
                break;
            }
            if ctx.settings.max_pages.is_some_and(|max| self.pages >= max) {
                info!(pages = self.pages, "Page limit reached; stopping");
                break;
            }
            if !retry
                .guard_when("next_page", transient, || self.advance_page())
                .await?
            {
                info!("No more result pages");
                break;
            }
            self.transition(NavState::NextPage);
        }

        self.transition(NavState::Done);
        info!(
            pages = self.pages,
            records = self.records.len(),
            "Pagination finished"
        );
        Ok(self.records)
    }

    fn transition(&mut self, next: NavState) {
        info!(from = ?self.state, to = ?next, "Navigation state changed");
        self.state = next;
    }

    async fn accept(&mut self, articles: Vec<ExtractedArticle>) {
        capture_images(self.images, &self.ctx.settings.output_dir, &articles).await;
        for article in articles {
            info!(title = %truncate_for_log(&article.record.title, 120), "Scraped article");
            self.records.push(article.record);
        }
    }

    async fn open(&self) -> Result<(), BrowserError> {
        info!(url = %self.ctx.settings.target_url, "Opening site");
        self.browser.open(&self.ctx.settings.target_url).await
    }

    async fn search(&self) -> Result<(), BrowserError> {
        let locators = &self.ctx.settings.locators;
        let timeout = self.ctx.timeout();
        info!(phrase = %self.ctx.criteria.search_phrase, "Submitting search");

        self.browser.click(&locators.search_button).await?;
        self.browser
            .wait_until_visible(&locators.search_input, timeout)
            .await?;
        self.browser
            .input_text(&locators.search_input, &self.ctx.criteria.search_phrase)
            .await?;
        self.browser
            .press_key(&locators.search_input, Key::Enter)
            .await?;
        self.browser
            .wait_until_contains(&locators.results_marker, timeout)
            .await
    }

    /// Tick the topic filter. `Ok(false)` means there was nothing to tick.
    async fn filter(&self) -> Result<bool, BrowserError> {
        let topic = self.ctx.criteria.topic.trim();
        if topic.is_empty() {
            info!("No topic given; skipping filter");
            return Ok(false);
        }

        let locators = &self.ctx.settings.locators;
        let label = locators.topic_label_for(topic);
        if !self.browser.is_visible(&label).await? {
            warn!(topic, "Topic filter not found; continuing unfiltered");
            return Ok(false);
        }

        info!(topic, "Applying topic filter");
        self.browser
            .select_checkbox(&locators.topic_checkbox_for(topic))
            .await?;
        if let Some(marker) = &locators.filters_marker {
            self.browser
                .wait_until_contains(marker, self.ctx.timeout())
                .await?;
        }
        Ok(true)
    }

    async fn sort(&self) -> Result<(), BrowserError> {
        let locators = &self.ctx.settings.locators;
        info!("Sorting results by newest");
        self.browser
            .select_from_list(&locators.sort_select, &locators.sort_newest_value)
            .await?;
        self.browser
            .wait_until_visible(&locators.sort_confirmation, self.ctx.timeout())
            .await
    }

    /// Read the articles of the current page, up to the first one outside
    /// the date window.
    ///
    /// Readiness is the results marker, not the article locator, so a page
    /// with zero results reads as an empty, non-exhausted outcome.
    async fn scrape_page(&self) -> Result<PageOutcome, BrowserError> {
        let locators = &self.ctx.settings.locators;
        info!(page = self.pages + 1, "Scraping news articles on the current page");
        self.browser
            .wait_until_contains(&locators.results_marker, self.ctx.timeout())
            .await?;

        let handles = self.browser.get_elements(&locators.articles).await?;
        if handles.is_empty() {
            info!(page = self.pages + 1, "No articles on this page");
        }
        let mut articles = Vec::with_capacity(handles.len());
        for handle in &handles {
            let article = self.extractor.extract(handle, self.ctx.today).await?;
            if !self.ctx.window.contains(article.record.published_date) {
                info!(
                    title = %article.record.title,
                    date = %article.record.published_date,
                    "Article outside the date window"
                );
                return Ok(PageOutcome {
                    articles,
                    exhausted: true,
                });
            }
            articles.push(article);
        }

        Ok(PageOutcome {
            articles,
            exhausted: false,
        })
    }

    /// Click through to the next results page. `Ok(false)` when there is none.
    ///
    /// The click is the last browser call here: once it succeeded the page
    /// has turned, and the wait for the new page happens in `scrape_page`.
    async fn advance_page(&self) -> Result<bool, BrowserError> {
        let next_page = &self.ctx.settings.locators.next_page;
        if !self.browser.is_visible(next_page).await? {
            return Ok(false);
        }
        info!("Going to next page");
        self.browser.click(next_page).await?;
        Ok(true)
    }
}
