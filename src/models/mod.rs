use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::BookingError;

/// Inclusive check-in, exclusive check-out stay
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting anything shorter than one night
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, BookingError> {
        if end <= start {
            return Err(BookingError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Default stay offered on a fresh form: tomorrow plus five nights
    pub fn default_stay(today: NaiveDate) -> Self {
        let start = today + Duration::days(1);
        Self {
            start,
            end: start + Duration::days(5),
        }
    }

    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Server answer for one resource and date range.
///
/// An unavailable answer only carries `available: false`, so the price
/// fields default to zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailabilityQuote {
    pub available: bool,
    #[serde(default)]
    pub nights: u32,
    #[serde(default)]
    pub base_price_total: f64,
    #[serde(default)]
    pub cleaning_fee: f64,
    #[serde(default)]
    pub total_price: f64,
}

impl AvailabilityQuote {
    pub fn unavailable() -> Self {
        Self {
            available: false,
            nights: 0,
            base_price_total: 0.0,
            cleaning_fee: 0.0,
            total_price: 0.0,
        }
    }
}

/// Reservation assembled from the form fields at submit time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReservationDraft {
    pub resource_id: String,
    pub range: DateRange,
    pub guests: u32,
    pub customer_id: Option<String>,
}

impl ReservationDraft {
    /// Form-encoded body for the creation endpoint
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("cottage_id", self.resource_id.clone()),
            ("start_date", self.range.start.format("%Y-%m-%d").to_string()),
            ("end_date", self.range.end.format("%Y-%m-%d").to_string()),
            ("guests", self.guests.to_string()),
        ];
        if let Some(customer_id) = &self.customer_id {
            fields.push(("customer_id", customer_id.clone()));
        }
        fields
    }
}

/// Creation endpoint reply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateReservationResponse {
    pub success: bool,
    #[serde(default)]
    pub reservation_id: Option<i64>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Monthly occupancy percentages for one cottage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OccupancySeries {
    pub name: String,
    pub data: Vec<f64>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReportStats {
    #[serde(default)]
    pub total_revenue: Option<f64>,
}

/// Localized chart labels supplied by the page or the reporting endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Translations {
    pub monthly_revenue: String,
    pub revenue: String,
}

impl Default for Translations {
    fn default() -> Self {
        Self {
            monthly_revenue: "Monthly Revenue (€)".to_string(),
            revenue: "Revenue".to_string(),
        }
    }
}

/// Everything the reporting page charts
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReportDataset {
    pub months: Vec<String>,
    pub revenue: Vec<f64>,
    pub occupancy: Vec<OccupancySeries>,
    #[serde(default)]
    pub stats: ReportStats,
    #[serde(default)]
    pub translations: Translations,
}

impl ReportDataset {
    /// Every series must line up with the month labels
    pub fn validate(&self) -> Result<(), BookingError> {
        if self.revenue.len() != self.months.len() {
            return Err(BookingError::MalformedReport(format!(
                "{} revenue values for {} months",
                self.revenue.len(),
                self.months.len()
            )));
        }
        for series in &self.occupancy {
            if series.data.len() != self.months.len() {
                return Err(BookingError::MalformedReport(format!(
                    "occupancy series '{}' has {} values for {} months",
                    series.name,
                    series.data.len(),
                    self.months.len()
                )));
            }
        }
        Ok(())
    }
}

/// Customer metadata attached to a selectable option on the page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerOption {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_range_requires_at_least_one_night() {
        assert!(DateRange::new(date(2026, 7, 1), date(2026, 7, 1)).is_err());
        assert!(DateRange::new(date(2026, 7, 2), date(2026, 7, 1)).is_err());
        let range = DateRange::new(date(2026, 7, 1), date(2026, 7, 4)).unwrap();
        assert_eq!(range.nights(), 3);
    }

    #[test]
    fn default_stay_starts_tomorrow() {
        let range = DateRange::default_stay(date(2026, 12, 31));
        assert_eq!(range.start, date(2027, 1, 1));
        assert_eq!(range.end, date(2027, 1, 6));
    }

    #[test]
    fn unavailable_quote_parses_without_prices() {
        let quote: AvailabilityQuote = serde_json::from_str(r#"{"available": false}"#).unwrap();
        assert_eq!(quote, AvailabilityQuote::unavailable());
    }

    #[test]
    fn draft_form_fields_skip_missing_customer() {
        let draft = ReservationDraft {
            resource_id: "7".to_string(),
            range: DateRange::new(date(2026, 7, 1), date(2026, 7, 4)).unwrap(),
            guests: 2,
            customer_id: None,
        };
        let fields = draft.form_fields();
        assert_eq!(fields.len(), 4);
        assert!(fields.contains(&("start_date", "2026-07-01".to_string())));
        assert!(!fields.iter().any(|(k, _)| *k == "customer_id"));
    }

    #[test]
    fn report_with_short_series_is_rejected() {
        let dataset: ReportDataset = serde_json::from_str(
            r#"{
                "months": ["January 2026", "February 2026"],
                "revenue": [100.0, 200.0],
                "occupancy": [{"name": "Lakeside", "data": [10.0]}]
            }"#,
        )
        .unwrap();
        assert!(dataset.validate().is_err());
        assert_eq!(dataset.translations, Translations::default());
    }
}
