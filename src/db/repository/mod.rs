pub mod appointment;
pub mod doctor;
pub mod message;
pub mod report;
pub mod vital_sign;

pub use appointment::*;
pub use doctor::*;
pub use message::*;
pub use report::*;
pub use vital_sign::*;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use uuid::Uuid;

/// Fixed-width microseconds keep stored timestamps sortable as text.
const TIMESTAMP_WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
const TIMESTAMP_READ_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_WRITE_FORMAT).to_string()
}

pub(crate) fn parse_timestamp(column: usize, raw: &str) -> Result<NaiveDateTime, rusqlite::Error> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_READ_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

pub(crate) fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(column: usize, raw: &str) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

pub(crate) fn parse_uuid(column: usize, raw: &str) -> Result<Uuid, rusqlite::Error> {
    Uuid::parse_str(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_survive_storage_format() {
        let ts = chrono::NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_micro_opt(9, 26, 53, 589_793)
            .unwrap();
        let stored = format_timestamp(&ts);
        assert_eq!(stored, "2026-03-14 09:26:53.589793");
        assert_eq!(parse_timestamp(0, &stored).unwrap(), ts);
    }

    #[test]
    fn whole_second_timestamps_sort_before_fractional() {
        let base = chrono::NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let later = base + chrono::Duration::milliseconds(250);
        assert!(format_timestamp(&base) < format_timestamp(&later));
    }

    #[test]
    fn dates_are_iso() {
        let date = NaiveDate::from_ymd_opt(2026, 7, 4).unwrap();
        assert_eq!(format_date(&date), "2026-07-04");
        assert_eq!(parse_date(0, "2026-07-04").unwrap(), date);
        assert!(parse_date(1, "07/04/2026").is_err());
    }

    #[test]
    fn bad_uuid_is_conversion_failure() {
        let err = parse_uuid(3, "not-a-uuid").unwrap_err();
        assert!(matches!(err, rusqlite::Error::FromSqlConversionFailure(3, Type::Text, _)));
    }
}
