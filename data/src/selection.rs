use chrono::{Datelike, NaiveDateTime};
use serde::Deserialize;

use crate::record::PricePoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum Company {
    #[default]
    Apple,
    Microsoft,
    Amazon,
    Google,
    Meta,
}

impl Company {
    pub const ALL: [Company; 5] = [
        Company::Apple,
        Company::Microsoft,
        Company::Amazon,
        Company::Google,
        Company::Meta,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Company::Apple => "Apple",
            Company::Microsoft => "Microsoft",
            Company::Amazon => "Amazon",
            Company::Google => "Google",
            Company::Meta => "Meta",
        }
    }
}

impl std::fmt::Display for Company {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    #[default]
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// `number` is 1-based, as returned by [`Datelike::month`].
    pub fn from_number(number: u32) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|idx| Self::ALL.get(idx as usize))
            .copied()
    }

    pub fn of(date: &NaiveDateTime) -> Self {
        // month() is always within 1..=12
        Self::from_number(date.month()).unwrap_or_default()
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The company and month currently shown by the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub company: Company,
    pub month: Month,
}

impl Selection {
    pub fn new(company: Company, month: Month) -> Self {
        Self { company, month }
    }

    pub fn set_company(&mut self, company: Company) {
        self.company = company;
    }

    pub fn set_month(&mut self, month: Month) {
        self.month = month;
    }

    pub fn matches(&self, point: &PricePoint) -> bool {
        point.company == self.company.name() && Month::of(&point.date) == self.month
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn defaults_to_apple_in_november() {
        let selection = Selection::default();
        assert_eq!(selection.company, Company::Apple);
        assert_eq!(selection.month, Month::November);
    }

    #[test]
    fn month_numbers_are_one_based() {
        assert_eq!(Month::from_number(1), Some(Month::January));
        assert_eq!(Month::from_number(12), Some(Month::December));
        assert_eq!(Month::from_number(0), None);
        assert_eq!(Month::from_number(13), None);
    }

    #[test]
    fn month_of_date() {
        let date = NaiveDate::from_ymd_opt(2023, 3, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(Month::of(&date), Month::March);
        assert_eq!(Month::of(&date).to_string(), "March");
    }

    #[test]
    fn company_match_is_exact() {
        let date = NaiveDate::from_ymd_opt(2023, 11, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let point = |company: &str| PricePoint {
            company: company.to_string(),
            date,
            open: 1.0,
            close: 1.0,
        };
        let selection = Selection::default();

        assert!(selection.matches(&point("Apple")));
        assert!(!selection.matches(&point("apple")));
        assert!(!selection.matches(&point("Apple ")));
        assert!(!selection.matches(&point("Microsoft")));
    }
}
