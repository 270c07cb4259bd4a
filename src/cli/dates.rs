use std::fmt::Display;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use chrono_english::parse_date_string;
use clap::{CommandFactory, ValueEnum};

use crate::utils::time::parse_date_key;

use super::Args;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum DateStyle {
    #[default]
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

/// Accepts `2024-06-15` as well as anything chrono-english understands, like "yesterday" or
/// "15/06/2024".
pub fn parse_day(value: &str, date_style: DateStyle) -> Result<NaiveDate> {
    if let Some(date) = parse_date_key(value.trim()) {
        return Ok(date);
    }
    match parse_date_string(value, Local::now(), date_style.into()) {
        Ok(v) => Ok(v.date_naive()),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate date {value:?}: {e}"),
            )
            .into()),
    }
}

/// Meals and payments can't be entered for days that haven't happened yet. A missing value means
/// today.
pub fn parse_past_day(
    value: Option<&str>,
    date_style: DateStyle,
    today: NaiveDate,
) -> Result<NaiveDate> {
    let Some(value) = value else {
        return Ok(today);
    };
    let date = parse_day(value, date_style)?;
    if date > today {
        return Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("{date} is in the future, the latest allowed date is {today}"),
            )
            .into());
    }
    Ok(date)
}
