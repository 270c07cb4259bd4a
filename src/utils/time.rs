use chrono::NaiveDate;

/// This is the standard way of converting a date to a string in messbook. Slot keys, CSV rows and
/// export file names all use it.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date_key(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Long human form used in confirmation prompts, e.g. "June 1, 2024".
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Rounds to a fixed number of decimal places, the way reports display averages.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{date_key, long_date, parse_date_key, round_to};

    #[test]
    fn test_date_key_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(date_key(date), "2024-06-01");
        assert_eq!(parse_date_key("2024-06-01"), Some(date));
        assert_eq!(parse_date_key("2024-6-1x"), None);
    }

    #[test]
    fn test_long_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(long_date(date), "June 1, 2024");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(37.5, 2), 37.5);
        assert_eq!(round_to(4.0 / 3.0, 1), 1.3);
        assert_eq!(round_to(100.0 / 3.0, 2), 33.33);
    }
}
