pub mod loader;

use chrono::NaiveDateTime;
use serde::Deserialize;

pub use loader::{load_records, read_records};

#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing column: {0}")]
    MissingColumn(&'static str),
}

/// One row of daily price data, as handed over by whoever produced it.
///
/// Fields are kept loosely typed; dates and prices may still be text at this
/// point and are only interpreted by the chart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StockRecord {
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Date")]
    pub date: DateValue,
    #[serde(rename = "Open")]
    pub open: NumberLike,
    #[serde(rename = "Close")]
    pub close: NumberLike,
}

impl StockRecord {
    pub fn new(
        company: impl Into<String>,
        date: impl Into<DateValue>,
        open: impl Into<NumberLike>,
        close: impl Into<NumberLike>,
    ) -> Self {
        Self {
            company: company.into(),
            date: date.into(),
            open: open.into(),
            close: close.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    Parsed(NaiveDateTime),
    Text(String),
}

impl From<NaiveDateTime> for DateValue {
    fn from(value: NaiveDateTime) -> Self {
        DateValue::Parsed(value)
    }
}

impl From<&str> for DateValue {
    fn from(value: &str) -> Self {
        DateValue::Text(value.to_string())
    }
}

impl From<String> for DateValue {
    fn from(value: String) -> Self {
        DateValue::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberLike {
    Number(f64),
    Text(String),
}

impl NumberLike {
    /// Loose numeric conversion: blank text is zero, anything unparsable is NaN.
    pub fn to_f64(&self) -> f64 {
        match self {
            NumberLike::Number(n) => *n,
            NumberLike::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    0.0
                } else {
                    s.parse::<f64>().unwrap_or(f64::NAN)
                }
            }
        }
    }
}

impl From<f64> for NumberLike {
    fn from(value: f64) -> Self {
        NumberLike::Number(value)
    }
}

impl From<&str> for NumberLike {
    fn from(value: &str) -> Self {
        NumberLike::Text(value.to_string())
    }
}

impl From<String> for NumberLike {
    fn from(value: String) -> Self {
        NumberLike::Text(value)
    }
}
