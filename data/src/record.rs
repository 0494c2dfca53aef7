use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use feed::{DateValue, StockRecord};

/// A record with its date resolved and prices coerced to numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub company: String,
    pub date: NaiveDateTime,
    pub open: f64,
    pub close: f64,
}

impl PricePoint {
    /// `None` when the record's date can't be interpreted.
    pub fn from_record(record: &StockRecord) -> Option<Self> {
        let date = match &record.date {
            DateValue::Parsed(date) => *date,
            DateValue::Text(text) => parse_date(text)?,
        };

        Some(Self {
            company: record.company.clone(),
            date,
            open: record.open.to_f64(),
            close: record.close.to_f64(),
        })
    }

    pub fn difference(&self) -> f64 {
        self.close - self.open
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%d-%b-%Y",
    "%d %B %Y",
];

/// Parses the date spellings found in daily price exports.
///
/// Offsets in RFC 3339 input are normalized to UTC.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}
