use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::errors::BookingError;
use crate::format::format_currency;
use crate::models::{AvailabilityQuote, DateRange, ReservationDraft};

pub const NOT_AVAILABLE_TEXT: &str = "Not available for selected dates";
pub const QUOTE_FAILED_TEXT: &str = "Could not check availability";
pub const INVALID_DATES_TEXT: &str = "Check-out must be after check-in";
pub const NO_TOTAL_TEXT: &str = "N/A";

/// Where the form is in the date-picking flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormPhase {
    Empty,
    PartialDates,
    /// Both dates set, no answer applied for them yet
    AwaitingQuote,
    /// Both dates set but check-out is not after check-in
    InvalidDates,
    PricedValid,
    PricedUnavailable,
    QuoteFailed,
}

/// Text and enabled state of the price panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceDisplay {
    pub price_text: String,
    /// `None` when the page has no cleaning-fee element
    pub cleaning_fee_text: Option<String>,
    pub total_text: String,
    pub submit_enabled: bool,
}

/// Field state of the reservation form
#[derive(Debug, Clone)]
pub struct ReservationForm {
    check_in_min: NaiveDate,
    check_in: Option<NaiveDate>,
    check_out_min: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
    guests: u32,
    customer_id: Option<String>,
    has_cleaning_fee_display: bool,
    phase: FormPhase,
    display: PriceDisplay,
}

impl ReservationForm {
    /// Blank form; the earliest check-in is the day after `today`
    pub fn new(today: NaiveDate, has_cleaning_fee_display: bool) -> Self {
        Self {
            check_in_min: today + Duration::days(1),
            check_in: None,
            check_out_min: None,
            check_out: None,
            guests: 1,
            customer_id: None,
            has_cleaning_fee_display,
            phase: FormPhase::Empty,
            display: PriceDisplay {
                price_text: String::new(),
                cleaning_fee_text: has_cleaning_fee_display.then(String::new),
                total_text: String::new(),
                submit_enabled: true,
            },
        }
    }

    /// Form pre-filled with the default stay
    pub fn with_default_stay(today: NaiveDate, has_cleaning_fee_display: bool) -> Self {
        let stay = DateRange::default_stay(today);
        let mut form = Self::new(today, has_cleaning_fee_display);
        form.check_in = Some(stay.start);
        form.check_out_min = Some(stay.start + Duration::days(1));
        form.check_out = Some(stay.end);
        form.refresh_phase();
        form
    }

    pub fn check_in_min(&self) -> NaiveDate {
        self.check_in_min
    }

    pub fn check_in(&self) -> Option<NaiveDate> {
        self.check_in
    }

    pub fn check_out_min(&self) -> Option<NaiveDate> {
        self.check_out_min
    }

    pub fn check_out(&self) -> Option<NaiveDate> {
        self.check_out
    }

    pub fn guests(&self) -> u32 {
        self.guests
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref()
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn display(&self) -> &PriceDisplay {
        &self.display
    }

    /// Set check-in, moving the check-out floor to the next day and pulling
    /// check-out forward when it now falls before that floor
    pub fn set_check_in(&mut self, date: NaiveDate) -> Result<(), BookingError> {
        if date < self.check_in_min {
            return Err(BookingError::CheckInTooEarly(date));
        }
        let min_check_out = date + Duration::days(1);
        self.check_in = Some(date);
        self.check_out_min = Some(min_check_out);
        if matches!(self.check_out, Some(out) if out < min_check_out) {
            self.check_out = Some(min_check_out);
        }
        self.refresh_phase();
        Ok(())
    }

    pub fn set_check_out(&mut self, date: NaiveDate) {
        self.check_out = Some(date);
        self.refresh_phase();
    }

    pub fn set_guests(&mut self, guests: u32) {
        self.guests = guests;
    }

    pub fn set_customer(&mut self, customer_id: Option<String>) {
        self.customer_id = customer_id.filter(|id| !id.is_empty());
    }

    /// Range to quote, present only when both dates form a valid stay
    pub fn quote_range(&self) -> Option<DateRange> {
        match (self.check_in, self.check_out) {
            (Some(start), Some(end)) => DateRange::new(start, end).ok(),
            _ => None,
        }
    }

    fn refresh_phase(&mut self) {
        self.phase = match (self.check_in, self.check_out) {
            (None, None) => FormPhase::Empty,
            (Some(_), None) | (None, Some(_)) => FormPhase::PartialDates,
            (Some(_), Some(_)) if self.quote_range().is_none() => {
                self.show_no_price(INVALID_DATES_TEXT);
                FormPhase::InvalidDates
            }
            (Some(_), Some(_)) => FormPhase::AwaitingQuote,
        };
    }

    /// Show a server quote against the page's per-night rate
    pub fn apply_quote(&mut self, quote: &AvailabilityQuote, per_night: f64) {
        if quote.available {
            self.display.price_text = format!(
                "{} ({} × {} nights)",
                format_currency(quote.base_price_total),
                format_currency(per_night),
                quote.nights
            );
            if self.has_cleaning_fee_display {
                self.display.cleaning_fee_text = Some(format_currency(quote.cleaning_fee));
            }
            self.display.total_text = format_currency(quote.total_price);
            self.display.submit_enabled = true;
            self.phase = FormPhase::PricedValid;
        } else {
            self.show_no_price(NOT_AVAILABLE_TEXT);
            self.phase = FormPhase::PricedUnavailable;
        }
    }

    pub fn apply_quote_failure(&mut self) {
        self.show_no_price(QUOTE_FAILED_TEXT);
        self.phase = FormPhase::QuoteFailed;
    }

    /// Message instead of a price; the cleaning fee is blanked with it
    fn show_no_price(&mut self, message: &str) {
        self.display.price_text = message.to_string();
        if self.has_cleaning_fee_display {
            self.display.cleaning_fee_text = Some(String::new());
        }
        self.display.total_text = NO_TOTAL_TEXT.to_string();
        self.display.submit_enabled = false;
    }

    /// Reservation from the current fields, checked against the bed count
    pub fn draft(
        &self,
        resource_id: &str,
        max_guests: Option<u32>,
    ) -> Result<ReservationDraft, BookingError> {
        let (start, end) = match (self.check_in, self.check_out) {
            (Some(start), Some(end)) => (start, end),
            (None, _) => return Err(BookingError::MissingElement("check-in")),
            (_, None) => return Err(BookingError::MissingElement("check-out")),
        };
        let range = DateRange::new(start, end)?;
        let max = max_guests.unwrap_or(u32::MAX);
        if self.guests == 0 || self.guests > max {
            return Err(BookingError::InvalidGuestCount {
                guests: self.guests,
                max,
            });
        }
        Ok(ReservationDraft {
            resource_id: resource_id.to_string(),
            range,
            guests: self.guests,
            customer_id: self.customer_id.clone(),
        })
    }
}
