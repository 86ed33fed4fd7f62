//! Recency window for accepted articles.

use chrono::{Datelike, Months, NaiveDate};

/// The interval of publication dates a run accepts.
///
/// `start` is always the first day of a month and `end` is the run's
/// "today". Membership only checks the lower bound unless the window was
/// built with [`DateWindow::with_upper_bound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    upper_bound: bool,
}

impl DateWindow {
    /// Derive the window for `number_of_months` ending at `today`.
    ///
    /// `0` and `1` both start on the first day of the current month; every
    /// further month moves the start one calendar month back.
    pub fn compute(number_of_months: u32, today: NaiveDate) -> Self {
        let first_of_month = today.with_day(1).unwrap_or(today);
        let back = number_of_months.saturating_sub(1);
        let start = first_of_month
            .checked_sub_months(Months::new(back))
            .unwrap_or(NaiveDate::MIN);
        Self {
            start,
            end: today,
            upper_bound: false,
        }
    }

    /// Also reject dates after `end`.
    pub fn with_upper_bound(mut self, enforce: bool) -> Self {
        self.upper_bound = enforce;
        self
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && (!self.upper_bound || date <= self.end)
    }
}
