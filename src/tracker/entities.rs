use std::{collections::BTreeMap, fmt::Display, ops::Deref, str::FromStr};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::error::TrackerError;

/// Meal attendance keyed by day. A day without an entry means no meal was eaten.
pub type MealRecords = BTreeMap<NaiveDate, MealRecord>;

/// At most one payment per day. Adding another one overwrites the previous.
pub type PaymentRecords = BTreeMap<NaiveDate, PaymentRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 3] = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];

    pub fn title(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Dinner => "Dinner",
        }
    }
}

impl Display for MealSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealRecord {
    #[serde(default)]
    pub breakfast: bool,
    #[serde(default)]
    pub lunch: bool,
    #[serde(default)]
    pub dinner: bool,
}

impl MealRecord {
    pub fn get(&self, slot: MealSlot) -> bool {
        match slot {
            MealSlot::Breakfast => self.breakfast,
            MealSlot::Lunch => self.lunch,
            MealSlot::Dinner => self.dinner,
        }
    }

    fn slot_mut(&mut self, slot: MealSlot) -> &mut bool {
        match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::Dinner => &mut self.dinner,
        }
    }

    /// Flips a slot and returns its new value.
    pub fn toggle(&mut self, slot: MealSlot) -> bool {
        let value = self.slot_mut(slot);
        *value = !*value;
        *value
    }

    pub fn meal_count(&self) -> u32 {
        MealSlot::ALL.iter().filter(|slot| self.get(**slot)).count() as u32
    }
}

/// Money paid for meals. Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Amount(f64);

impl Amount {
    pub fn new_opt(value: f64) -> Option<Amount> {
        if value.is_finite() && value > 0. {
            Some(Amount(value))
        } else {
            None
        }
    }
}

impl Deref for Amount {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        s.parse::<f64>()
            .ok()
            .and_then(Amount::new_opt)
            .ok_or_else(|| TrackerError::InvalidAmount(s.to_string()))
    }
}

impl TryFrom<f64> for Amount {
    type Error = TrackerError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Amount::new_opt(value).ok_or_else(|| TrackerError::InvalidAmount(value.to_string()))
    }
}

impl From<Amount> for f64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl PaymentRecord {
    pub fn new(amount: Amount, note: Option<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            amount,
            note: normalize_note(note),
            created_at,
        }
    }
}

/// Blank notes are the same as no note at all.
pub fn normalize_note(note: Option<String>) -> Option<String> {
    note.as_deref().and_then(single_line_note)
}

/// Joins the lines of a note with single spaces and trims them. CSV rows are one line each, so a
/// note never carries a line break. `None` if nothing but whitespace is left.
pub fn single_line_note(note: &str) -> Option<String> {
    let line = note
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!line.is_empty()).then_some(line)
}

/// A calendar month in `YYYY-MM` form. Reports select records falling into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new_opt(year: i32, month: u32) -> Option<YearMonth> {
        (1..=12).contains(&month).then_some(YearMonth { year, month })
    }

    pub fn of(date: NaiveDate) -> YearMonth {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TrackerError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        YearMonth::new_opt(year, month).ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::{normalize_note, Amount, MealRecord, MealSlot, PaymentRecord, YearMonth};

    #[test]
    fn test_amount_validation() {
        assert_eq!(*"12.5".parse::<Amount>().unwrap(), 12.5);
        assert_eq!(*" 100 ".parse::<Amount>().unwrap(), 100.);
        for value in ["0", "-5", "abc", "", "NaN", "inf"] {
            assert!(value.parse::<Amount>().is_err(), "{value} should be rejected");
        }
    }

    #[test]
    fn test_toggle_creates_and_flips() {
        let mut record = MealRecord::default();
        assert!(record.toggle(MealSlot::Lunch));
        assert!(record.lunch);
        assert!(!record.breakfast && !record.dinner);
        assert!(!record.toggle(MealSlot::Lunch));
        assert_eq!(record, MealRecord::default());
    }

    #[test]
    fn test_year_month_parsing() {
        let month = "2024-06".parse::<YearMonth>().unwrap();
        assert_eq!(month.to_string(), "2024-06");
        assert!(month.contains(&NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()));
        assert!(!month.contains(&NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()));
        assert!(!month.contains(&NaiveDate::from_ymd_opt(2023, 6, 1).unwrap()));
        for value in ["2024-13", "2024-6", "24-06", "2024/06", "june"] {
            assert!(value.parse::<YearMonth>().is_err(), "{value} should be rejected");
        }
    }

    #[test]
    fn test_note_normalization() {
        assert_eq!(normalize_note(None), None);
        assert_eq!(normalize_note(Some("   ".into())), None);
        assert_eq!(normalize_note(Some(" \r\n\t".into())), None);
        assert_eq!(normalize_note(Some("  cash ".into())).as_deref(), Some("cash"));
        assert_eq!(
            normalize_note(Some("line one\nline two\r\n\r\nthree".into())).as_deref(),
            Some("line one line two three")
        );
    }

    #[test]
    fn test_payment_json_shape() -> anyhow::Result<()> {
        let payment = PaymentRecord::new(
            Amount::new_opt(100.).unwrap(),
            Some("".into()),
            Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
        );
        assert_eq!(payment.note, None);
        let json = serde_json::to_value(&payment)?;
        assert_eq!(json["amount"], 100.0);
        assert!(json.get("timestamp").is_some());

        let parsed: PaymentRecord = serde_json::from_str(
            r#"{"amount": 50, "note": "week 1", "timestamp": "2024-06-15T08:30:00.000Z"}"#,
        )?;
        assert_eq!(*parsed.amount, 50.);
        assert_eq!(parsed.note.as_deref(), Some("week 1"));

        assert!(serde_json::from_str::<PaymentRecord>(
            r#"{"amount": 0, "timestamp": "2024-06-15T08:30:00.000Z"}"#
        )
        .is_err());
        Ok(())
    }
}
