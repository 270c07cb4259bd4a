//! CSV import and export of meal and payment records.
//!
//! One row per day that has either a meal record or a payment:
//!
//! ```text
//! Date,Breakfast,Lunch,Dinner,Payment Amount,Payment Note
//! 2024-06-01,Yes,Yes,No,100,"Paid for ""week 1"", partial"
//! 2024-06-02,No,No,No,,
//! ```

use std::{collections::BTreeSet, fmt::Write};

use chrono::{DateTime, NaiveDate, Utc};

use crate::utils::time::{date_key, parse_date_key};

use super::{
    entities::{
        single_line_note, Amount, MealRecord, MealRecords, PaymentRecord, PaymentRecords,
    },
    error::ImportError,
};

pub const CSV_HEADER: &str = "Date,Breakfast,Lunch,Dinner,Payment Amount,Payment Note";
pub const CSV_MIME_TYPE: &str = "text/csv";

const YES: &str = "Yes";
const NO: &str = "No";

/// Lines with fewer fields than this are ignored on import.
const MIN_FIELDS: usize = 4;

pub fn export_file_name(today: NaiveDate) -> String {
    format!("mess-data-{}.csv", date_key(today))
}

/// Serializes both mappings into one table, ordered by date.
pub fn export_csv(meals: &MealRecords, payments: &PaymentRecords) -> String {
    let dates = meals.keys().chain(payments.keys()).collect::<BTreeSet<_>>();

    let mut csv = String::with_capacity((dates.len() + 1) * 40);
    csv.push_str(CSV_HEADER);
    csv.push('\n');

    for date in dates {
        let meal = meals.get(date).copied().unwrap_or_default();
        let payment = payments.get(date);
        let amount = payment
            .map(|payment| payment.amount.to_string())
            .unwrap_or_default();
        // An empty note is written as an empty unquoted field, same as a missing one. Notes read
        // from older slot files may still hold line breaks.
        let note = payment
            .and_then(|payment| payment.note.as_deref())
            .and_then(single_line_note)
            .map(|note| quote(&note))
            .unwrap_or_default();

        // Writing into a String never fails.
        let _ = writeln!(
            csv,
            "{},{},{},{},{},{}",
            date_key(*date),
            yes_no(meal.breakfast),
            yes_no(meal.lunch),
            yes_no(meal.dinner),
            amount,
            note
        );
    }
    csv
}

fn yes_no(value: bool) -> &'static str {
    if value {
        YES
    } else {
        NO
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Records read out of a CSV file. They are only merged into the live records once the whole file
/// was parsed.
#[derive(Debug, Default, PartialEq)]
pub struct ParsedImport {
    pub meals: MealRecords,
    pub payments: PaymentRecords,
}

/// Parses CSV text produced by [export_csv] (or written by hand in the same layout). The first
/// non-blank line is the header and is skipped.
///
/// A row creates a meal record only when at least one meal column is `Yes`, so a row of three `No`
/// is indistinguishable from a day without a record. A non-empty amount creates a payment stamped
/// with `imported_at`.
pub fn parse_csv(text: &str, imported_at: DateTime<Utc>) -> Result<ParsedImport, ImportError> {
    let mut parsed = ParsedImport::default();

    let lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .skip(1);

    for (index, line) in lines {
        let line_number = index + 1;
        let fields =
            tokenize_line(line).ok_or(ImportError::UnterminatedQuote { line: line_number })?;
        if fields.len() < MIN_FIELDS {
            continue;
        }

        let parse_date = || {
            parse_date_key(&fields[0]).ok_or_else(|| ImportError::InvalidDate {
                line: line_number,
                value: fields[0].clone(),
            })
        };

        let [breakfast, lunch, dinner] = [&fields[1], &fields[2], &fields[3]].map(|v| v == YES);
        if breakfast || lunch || dinner {
            parsed.meals.insert(
                parse_date()?,
                MealRecord {
                    breakfast,
                    lunch,
                    dinner,
                },
            );
        }

        if let Some(amount) = fields.get(4).filter(|v| !v.is_empty()) {
            let amount = amount
                .parse::<Amount>()
                .map_err(|_| ImportError::InvalidAmount {
                    line: line_number,
                    value: amount.clone(),
                })?;
            let note = fields.get(5).cloned();
            parsed
                .payments
                .insert(parse_date()?, PaymentRecord::new(amount, note, imported_at));
        }
    }

    Ok(parsed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenizerState {
    FieldStart,
    InQuotedField,
    /// A quote was seen inside a quoted field. Either it closes the field or it's the first half
    /// of an escaped `""`.
    QuoteInQuotedField,
    InPlainField,
}

/// Splits a CSV line into trimmed fields. Commas and doubled quotes are only special inside a
/// quoted field. Returns `None` if a quoted field is never closed.
pub fn tokenize_line(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut state = TokenizerState::FieldStart;

    for c in line.chars() {
        state = match (state, c) {
            (TokenizerState::FieldStart, ',') => {
                fields.push(finish_field(&mut field));
                TokenizerState::FieldStart
            }
            (TokenizerState::FieldStart, '"') => TokenizerState::InQuotedField,
            (TokenizerState::FieldStart, c) if c.is_whitespace() => TokenizerState::FieldStart,
            (TokenizerState::FieldStart, c) => {
                field.push(c);
                TokenizerState::InPlainField
            }
            (TokenizerState::InQuotedField, '"') => TokenizerState::QuoteInQuotedField,
            (TokenizerState::InQuotedField, c) => {
                field.push(c);
                TokenizerState::InQuotedField
            }
            (TokenizerState::QuoteInQuotedField, '"') => {
                field.push('"');
                TokenizerState::InQuotedField
            }
            (TokenizerState::QuoteInQuotedField, ',') | (TokenizerState::InPlainField, ',') => {
                fields.push(finish_field(&mut field));
                TokenizerState::FieldStart
            }
            // Text trailing a closing quote is kept as is.
            (TokenizerState::QuoteInQuotedField, c) | (TokenizerState::InPlainField, c) => {
                field.push(c);
                TokenizerState::InPlainField
            }
        };
    }

    if state == TokenizerState::InQuotedField {
        return None;
    }
    fields.push(finish_field(&mut field));
    Some(fields)
}

fn finish_field(field: &mut String) -> String {
    let value = field.trim().to_string();
    field.clear();
    value
}
