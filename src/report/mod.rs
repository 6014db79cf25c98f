use chrono::NaiveDate;

pub mod export;
pub mod json;
pub mod text;

pub use crate::model::{NA_SYMBOL, or_na};

pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => NA_SYMBOL.to_string(),
    }
}

/// Ratio in percent with one decimal, e.g. `0.125` -> `12.5`.
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}", ratio * 100.0)
}

pub fn format_coverage(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{}%", format_percent(r)),
        None => NA_SYMBOL.to_string(),
    }
}
