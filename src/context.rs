//! Per-run context shared by every component.

use crate::models::SearchCriteria;
use crate::retry::RetryPolicy;
use crate::settings::Settings;
use crate::window::DateWindow;
use chrono::NaiveDate;
use std::time::Duration;

/// Everything a run needs to know, built once at start-up and passed down
/// by reference.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub criteria: SearchCriteria,
    pub settings: Settings,
    pub window: DateWindow,
    pub retry: RetryPolicy,
    /// The run's notion of today, used for the window and date fallbacks.
    pub today: NaiveDate,
}

impl RunContext {
    pub fn new(criteria: SearchCriteria, settings: Settings, today: NaiveDate) -> Self {
        let window = DateWindow::compute(criteria.number_of_months, today)
            .with_upper_bound(settings.enforce_upper_bound);
        let retry = RetryPolicy::new(settings.retries, settings.delay());
        Self {
            criteria,
            settings,
            window,
            retry,
            today,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.settings.timeout()
    }
}
