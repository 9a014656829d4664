use serde::Serialize;

use crate::format::{format_currency, format_one_decimal};
use crate::models::{OccupancySeries, ReportDataset};

/// Headline figures shown above the charts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub average_occupancy: String,
    pub total_revenue: String,
}

/// Mean over every month of every series, one decimal.
/// `"0.0"` when there are no data points at all.
pub fn average_occupancy(series: &[OccupancySeries]) -> String {
    let (sum, points) = series
        .iter()
        .flat_map(|s| s.data.iter())
        .fold((0.0f64, 0usize), |(sum, n), value| (sum + value, n + 1));

    if points == 0 {
        return "0.0".to_string();
    }
    format_one_decimal(sum / points as f64)
}

/// Server total when supplied, otherwise the sum of the monthly series
pub fn total_revenue(dataset: &ReportDataset) -> f64 {
    dataset
        .stats
        .total_revenue
        .unwrap_or_else(|| dataset.revenue.iter().sum())
}

pub fn build_summary(dataset: &ReportDataset) -> ReportSummary {
    ReportSummary {
        average_occupancy: average_occupancy(&dataset.occupancy),
        total_revenue: format_currency(total_revenue(dataset)),
    }
}
