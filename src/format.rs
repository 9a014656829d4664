//! Display formatting shared by the price panel and the charts.

pub const CURRENCY_SYMBOL: &str = "€";

/// Plain number as the page shows it: `300`, `300.5`
pub fn format_amount(value: f64) -> String {
    if value == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    format!("{}", value)
}

/// Axis ticks and price fields: `€300`
pub fn format_currency(value: f64) -> String {
    format!("{}{}", CURRENCY_SYMBOL, format_amount(value))
}

/// Tooltips: always two decimals, `€300.00`
pub fn format_currency_exact(value: f64) -> String {
    format!("{}{:.2}", CURRENCY_SYMBOL, value)
}

pub fn format_percent(value: f64) -> String {
    format!("{}%", format_amount(value))
}

/// Round half away from zero to one decimal: `33.333` -> `33.3`
pub fn format_one_decimal(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}
