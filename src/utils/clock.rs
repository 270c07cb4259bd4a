use chrono::{DateTime, Local, NaiveDate, Utc};

#[cfg(test)]
use mockall::automock;

/// Represents an entity responsible for providing dates across application. This can allow it to
/// be used for testing
#[cfg_attr(test, automock)]
pub trait Clock {
    fn time(&self) -> DateTime<Utc>;

    /// Calendar day as the user sees it. Used as the upper bound for entered dates.
    fn today(&self) -> NaiveDate;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
