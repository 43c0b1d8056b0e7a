//! # Time Labels
//!
//! Slots are stored as 24-hour `NaiveTime` values and calendar days as
//! `NaiveDate`. This module owns the conversion to and from the strings that
//! cross the HTTP boundary: ISO 8601 date keys and 12-hour or 24-hour time
//! labels.

use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::{MediError, MediResult};

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Time-of-day formats accepted when parsing a label, tried in order.
const LABEL_FORMATS: [&str; 4] = ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p"];

/// Display format for slot labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    /// `2:30 PM`
    #[default]
    #[serde(rename = "12h")]
    TwelveHour,
    /// `14:30`
    #[serde(rename = "24h")]
    TwentyFourHour,
}

impl TimeFormat {
    pub fn format(self, time: NaiveTime) -> String {
        match self {
            TimeFormat::TwelveHour => time.format("%-I:%M %p").to_string(),
            TimeFormat::TwentyFourHour => time.format("%H:%M").to_string(),
        }
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFormat::TwelveHour => f.write_str("12h"),
            TimeFormat::TwentyFourHour => f.write_str("24h"),
        }
    }
}

impl FromStr for TimeFormat {
    type Err = MediError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "12h" | "12" => Ok(TimeFormat::TwelveHour),
            "24h" | "24" => Ok(TimeFormat::TwentyFourHour),
            other => Err(MediError::Validation(format!(
                "Unknown time format '{}', expected 12h or 24h",
                other
            ))),
        }
    }
}

/// Formats a date as its `YYYY-MM-DD` key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

pub fn parse_date_key(key: &str) -> MediResult<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), DATE_KEY_FORMAT)
        .map_err(|_| MediError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", key)))
}

/// Parses a time label in either 24-hour (`14:30`) or 12-hour (`2:30 PM`)
/// form.
pub fn parse_time_label(label: &str) -> MediResult<NaiveTime> {
    let trimmed = label.trim();

    LABEL_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| MediError::Validation(format!("Invalid time '{}'", label)))
}
