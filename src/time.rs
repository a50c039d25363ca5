use chrono::{Local, NaiveDate};

/// Clock abstracts access to the current date so month filtering stays deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns today's calendar date.
    fn today(&self) -> NaiveDate;
}

/// Wall-clock time in the machine's local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
