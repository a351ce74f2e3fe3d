use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which day of the board to read, relative to a reference date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSelector {
    #[default]
    Today,
    Yesterday,
    Tomorrow,
    DayAfterTomorrow,
}

impl DateSelector {
    /// Unknown or missing values fall back to `Today`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("yesterday") => Self::Yesterday,
            Some("tomorrow") => Self::Tomorrow,
            Some("day_after_tomorrow") => Self::DayAfterTomorrow,
            _ => Self::Today,
        }
    }

    pub fn resolve(self, today: NaiveDate) -> NaiveDate {
        let shifted = match self {
            Self::Today => Some(today),
            Self::Yesterday => today.checked_sub_days(Days::new(1)),
            Self::Tomorrow => today.checked_add_days(Days::new(1)),
            Self::DayAfterTomorrow => today.checked_add_days(Days::new(2)),
        };
        shifted.unwrap_or(today)
    }
}

/// `YYYY/MM/DD`, the form the board and the reports use.
pub fn format_board_date(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

pub fn parse_board_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y/%m/%d").ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightType {
    Domestic,
    International,
}

impl FlightType {
    /// Only `"domestic"` selects the domestic board; everything else, including
    /// a missing value, reads the international one.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("domestic") => Self::Domestic,
            _ => Self::International,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Domestic => "domestic",
            Self::International => "international",
        }
    }
}

impl fmt::Display for FlightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of the reference date for relative selectors.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
