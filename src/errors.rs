use chrono::NaiveDate;
use thiserror::Error;

/// Failures the booking and reporting flows branch on
#[derive(Debug, Error)]
pub enum BookingError {
    /// A page element the operation needs is absent
    #[error("page element '{0}' not found")]
    MissingElement(&'static str),

    #[error("check-out {end} must be at least one day after check-in {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("check-in {0} is before the earliest bookable date")]
    CheckInTooEarly(NaiveDate),

    #[error("guest count {guests} outside 1..={max}")]
    InvalidGuestCount { guests: u32, max: u32 },

    #[error("server returned status {0}")]
    Http(reqwest::StatusCode),

    #[error("report data malformed: {0}")]
    MalformedReport(String),
}
