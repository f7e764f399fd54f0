//! Snapshot file naming: `<prefix>_<YYYY-MM-DD>_<HH-MM-SS>.<ext>`.
//!
//! The timestamp is always the last two `_`-separated segments before the
//! extension, so prefixes may themselves contain underscores.

use crate::errors::{timestamp_parse, Result};
use chrono::NaiveDateTime;

/// `chrono` format of the two trailing segments
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Whether `file_name` is a candidate for `prefix` and `ext`.
///
/// Candidates still have to pass [`parse_timestamp`].
pub fn matches(file_name: &str, prefix: &str, ext: &str) -> bool {
    file_name.starts_with(prefix) && has_extension(file_name, ext)
}

/// Whether `file_name` ends in `.<ext>`.
pub fn has_extension(file_name: &str, ext: &str) -> bool {
    file_name
        .strip_suffix(ext)
        .map(|stem| stem.ends_with('.'))
        .unwrap_or(false)
}

/// Parse the trailing timestamp out of a snapshot file name.
///
/// # Errors
///
/// `TimestampParse` when the name lacks the extension, has fewer than two
/// `_`-separated segments, or the last two are not a valid date-time.
pub fn parse_timestamp(file_name: &str, ext: &str) -> Result<NaiveDateTime> {
    let stem = file_name
        .strip_suffix(ext)
        .and_then(|s| s.strip_suffix('.'))
        .ok_or_else(|| timestamp_parse(file_name, &format!("missing .{} extension", ext)))?;

    let mut segments = stem.rsplitn(3, '_');
    let (time, date) = match (segments.next(), segments.next()) {
        (Some(time), Some(date)) => (time, date),
        _ => return Err(timestamp_parse(file_name, "no <date>_<time> suffix")),
    };

    NaiveDateTime::parse_from_str(&format!("{}_{}", date, time), TIMESTAMP_FORMAT)
        .map_err(|e| timestamp_parse(file_name, &e.to_string()))
}

/// Build the file name for a snapshot or artifact taken at `timestamp`.
pub fn file_name(prefix: &str, timestamp: NaiveDateTime, ext: &str) -> String {
    format!("{}_{}.{}", prefix, timestamp.format(TIMESTAMP_FORMAT), ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookdelta_core::ExErrorKind;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 13)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_file_name_layout() {
        assert_eq!(
            file_name("books_data", ts(14, 30, 45), "csv"),
            "books_data_2025-06-13_14-30-45.csv"
        );
    }

    #[test]
    fn test_parse_with_underscored_prefix() {
        let parsed = parse_timestamp("books_data_2025-06-13_14-30-45.csv", "csv").unwrap();
        assert_eq!(parsed, ts(14, 30, 45));
    }

    #[test]
    fn test_parse_rejects_non_timestamp() {
        let err = parse_timestamp("books_data_notadate.csv", "csv").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::TimestampParse);
        assert!(err.kind().is_recoverable());
    }

    #[test]
    fn test_parse_rejects_impossible_date() {
        assert!(parse_timestamp("books_data_2025-02-30_10-00-00.csv", "csv").is_err());
        assert!(parse_timestamp("books_data_2025-06-13_25-00-00.csv", "csv").is_err());
    }

    #[test]
    fn test_parse_needs_two_segments() {
        assert!(parse_timestamp("books.csv", "csv").is_err());
        assert!(parse_timestamp("2025-06-13_14-30-45.csv", "csv").is_ok());
    }

    #[test]
    fn test_extension_matching_ignores_temp_files() {
        assert!(matches("changes_2025-06-13_14-30-45.csv", "changes", "csv"));
        assert!(!matches("changes_2025-06-13_14-30-45.csv.tmp", "changes", "csv"));
        assert!(!matches("changes_2025-06-13_14-30-45.xcsv", "changes", "csv"));
        assert!(!matches("books_data_2025-06-13_14-30-45.csv", "changes", "csv"));
    }
}
