use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Filter form fields of the reporting page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportFilter {
    /// First month to include
    pub start: Option<NaiveDate>,
    /// Last day to include; the server widens it to the end of that month
    pub end: Option<NaiveDate>,
    /// Invoice status, `all` for no filter
    pub status: String,
    /// Cottage id, `all` for every cottage
    pub cottage: String,
}

impl Default for ReportFilter {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            status: "all".to_string(),
            cottage: "all".to_string(),
        }
    }
}

impl ReportFilter {
    /// Query parameters, leaving out anything that means "no filter"
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(start) = self.start {
            pairs.push(("start", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end {
            pairs.push(("end", end.format("%Y-%m-%d").to_string()));
        }
        if !self.status.is_empty() && self.status != "all" {
            pairs.push(("status", self.status.clone()));
        }
        if !self.cottage.is_empty() && self.cottage != "all" {
            pairs.push(("cottage", self.cottage.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_sends_nothing() {
        assert!(ReportFilter::default().query_pairs().is_empty());
    }

    #[test]
    fn filter_serializes_set_fields() {
        let filter = ReportFilter {
            start: NaiveDate::from_ymd_opt(2026, 1, 1),
            end: None,
            status: "paid".to_string(),
            cottage: "all".to_string(),
        };
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("start", "2026-01-01".to_string()),
                ("status", "paid".to_string())
            ]
        );
    }
}
