//! Chart configurations in the shape the charting library consumes.
//!
//! Axis and tooltip formatting cannot travel as callbacks in JSON, so each
//! axis carries a [`TickFormat`] and the formatting itself lives here.

use serde::Serialize;
use tracing::warn;

use crate::format::{format_currency, format_currency_exact, format_percent};
use crate::models::{OccupancySeries, ReportDataset, Translations};

pub const DEFAULT_LINE_COLOR: &str = "#4e73df";
pub const FILL_OPACITY: f64 = 0.1;
const REVENUE_FILL: &str = "rgba(78, 115, 223, 0.5)";
const REVENUE_BORDER: &str = "rgba(78, 115, 223, 1)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TickFormat {
    Currency,
    Percent,
}

impl TickFormat {
    pub fn tick_label(&self, value: f64) -> String {
        match self {
            TickFormat::Currency => format_currency(value),
            TickFormat::Percent => format_percent(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub background_color: String,
    pub border_color: String,
    pub border_width: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticks {
    pub format: TickFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    pub begin_at_zero: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub ticks: Ticks,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub y: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub scales: Scales,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

impl ChartConfig {
    pub fn tick_label(&self, value: f64) -> String {
        self.options.scales.y.ticks.format.tick_label(value)
    }
}

fn options(axis: Axis) -> ChartOptions {
    ChartOptions {
        responsive: true,
        maintain_aspect_ratio: false,
        scales: Scales { y: axis },
    }
}

/// One bar per month, currency axis
pub fn revenue_chart(dataset: &ReportDataset) -> ChartConfig {
    ChartConfig {
        kind: ChartKind::Bar,
        data: ChartData {
            labels: dataset.months.clone(),
            datasets: vec![Dataset {
                label: dataset.translations.monthly_revenue.clone(),
                data: dataset.revenue.clone(),
                background_color: REVENUE_FILL.to_string(),
                border_color: REVENUE_BORDER.to_string(),
                border_width: 1,
                tension: None,
            }],
        },
        options: options(Axis {
            begin_at_zero: true,
            max: None,
            ticks: Ticks {
                format: TickFormat::Currency,
            },
        }),
    }
}

/// One line per cottage, y clamped to 0..=100 percent
pub fn occupancy_chart(dataset: &ReportDataset) -> ChartConfig {
    ChartConfig {
        kind: ChartKind::Line,
        data: ChartData {
            labels: dataset.months.clone(),
            datasets: dataset.occupancy.iter().map(occupancy_dataset).collect(),
        },
        options: options(Axis {
            begin_at_zero: true,
            max: Some(100.0),
            ticks: Ticks {
                format: TickFormat::Percent,
            },
        }),
    }
}

fn occupancy_dataset(series: &OccupancySeries) -> Dataset {
    let line = series
        .color
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(DEFAULT_LINE_COLOR);
    Dataset {
        label: series.name.clone(),
        data: series.data.clone(),
        background_color: fill_color(line),
        border_color: line.to_string(),
        border_width: 2,
        tension: Some(0.1),
    }
}

/// Translucent variant of a line colour, for the area under the line.
/// Understands `rgb(r, g, b)`, `rgba(..)` and `#rrggbb`; anything else is
/// returned unchanged.
pub fn fill_color(line: &str) -> String {
    let line = line.trim();
    if let Some(rgb) = parse_rgb(line).or_else(|| parse_hex(line)) {
        return format!("rgba({}, {}, {}, {})", rgb[0], rgb[1], rgb[2], FILL_OPACITY);
    }
    warn!("Unrecognised series colour '{}', using it as fill", line);
    line.to_string()
}

fn parse_rgb(color: &str) -> Option<[u8; 3]> {
    let inner = color
        .strip_prefix("rgba(")
        .or_else(|| color.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let mut parts = inner.split(',').map(|p| p.trim().parse::<u8>());
    let rgb = [parts.next()?.ok()?, parts.next()?.ok()?, parts.next()?.ok()?];
    Some(rgb)
}

fn parse_hex(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Tooltip line for a revenue bar: `Revenue: €1200.00`
pub fn revenue_tooltip(translations: &Translations, value: f64) -> String {
    format!("{}: {}", translations.revenue, format_currency_exact(value))
}

/// Tooltip line for an occupancy point: `Lakeside: 45.5%`
pub fn occupancy_tooltip(series_label: &str, value: f64) -> String {
    format!("{}: {}", series_label, format_percent(value))
}
