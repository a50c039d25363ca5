use chrono::{NaiveDate, NaiveDateTime};

/// Canonical on-disk date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATE_FALLBACKS: &[&str] = &["%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a ledger date, accepting ISO dates, a couple of spreadsheet layouts, and
/// ISO date-times (the time of day is dropped).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    std::iter::once(DATE_FORMAT)
        .chain(DATE_FALLBACKS.iter().copied())
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|stamp| stamp.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_supported_layouts() {
        assert_eq!(parse_date("2024-02-29"), Some(ymd(2024, 2, 29)));
        assert_eq!(parse_date("2024/02/29"), Some(ymd(2024, 2, 29)));
        assert_eq!(parse_date("02/29/2024"), Some(ymd(2024, 2, 29)));
        assert_eq!(parse_date("2024-02-29T18:30:00"), Some(ymd(2024, 2, 29)));
        assert_eq!(parse_date(" 2024-02-29 08:00:00 "), Some(ymd(2024, 2, 29)));
    }

    #[test]
    fn rejects_impossible_or_garbled_dates() {
        assert_eq!(parse_date("2023-02-29"), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn formats_as_iso() {
        assert_eq!(format_date(ymd(2024, 1, 5)), "2024-01-05");
    }
}
