//! # Date Arithmetic
//!
//! Normalizes the mixed date representations Google Sheets hands back
//! (numeric serials, ISO strings, day-first locale strings) into plain local
//! calendar dates, and computes the signed day differences the reminder
//! engine compares against its windows.
//!
//! Everything here works on `NaiveDate`: the sheet holds calendar dates, not
//! instants, and routing a `YYYY-MM-DD` string through UTC would shift the
//! day for hosts west of Greenwich.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Added day-first locale formats seen in manually edited cells
//! - 1.0.0: Initial release with serial and ISO parsing

use chrono::{Datelike, Duration, Local, NaiveDate};
use log::warn;

const WEEKDAYS_ES: [&str; 7] = [
    "Domingo",
    "Lunes",
    "Martes",
    "Miércoles",
    "Jueves",
    "Viernes",
    "Sábado",
];

const MONTHS_ES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Convert a spreadsheet serial (day count from the 1900 epoch) to a date.
///
/// The format counts from 1900-01-01 but inherited the fictitious
/// 1900-02-29, so real dates sit two days behind the raw serial. Fractional
/// parts encode time of day and are truncated.
pub fn from_sheet_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1900, 1, 1)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64 - 2))
}

/// Parse a raw cell value into a local calendar date.
///
/// Tries, in order: numeric serial, ISO `YYYY-MM-DD`, day-first `DD/MM/YYYY`
/// and `DD-MM-YYYY`. Returns `None` for anything else; callers treat that as
/// a validation failure, not an error. `context` identifies the row in the
/// warning log.
pub fn parse_to_local_date(raw: &str, context: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(serial) = trimmed.parse::<f64>() {
        return from_sheet_serial(serial);
    }

    for format in ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    warn!("{context} - unparseable date: {trimmed:?}");
    None
}

/// Signed difference `a - b` in whole days.
///
/// Kept as `f64` because the engine's range checks compare the unrounded
/// value while the day-of check rounds to the nearest integer; with both
/// sides already calendar dates the value is always an exact integer.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> f64 {
    (a - b).num_days() as f64
}

/// Current local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a date the way the messages spell it: "Miércoles 8 de Junio".
pub fn to_readable_spanish(date: NaiveDate) -> String {
    let weekday = WEEKDAYS_ES[date.weekday().num_days_from_sunday() as usize];
    let month = MONTHS_ES[date.month0() as usize];
    format!("{} {} de {}", weekday, date.day(), month)
}

/// Format a date for write-back: `YYYY-MM-DD`.
pub fn to_storage_format(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_parses_as_plain_calendar_date() {
        // Must not shift the day through a UTC conversion
        assert_eq!(
            parse_to_local_date("2025-06-08", "test"),
            Some(date(2025, 6, 8))
        );
    }

    #[test]
    fn test_sheet_serial_known_values() {
        // 25569 is the Unix epoch, 45292 is 2024-01-01
        assert_eq!(from_sheet_serial(25569.0), Some(date(1970, 1, 1)));
        assert_eq!(from_sheet_serial(45292.0), Some(date(2024, 1, 1)));
    }

    #[test]
    fn test_sheet_serial_fraction_truncated() {
        assert_eq!(from_sheet_serial(45292.75), Some(date(2024, 1, 1)));
    }

    #[test]
    fn test_serial_string_parses_via_serial_branch() {
        assert_eq!(parse_to_local_date("45292", "test"), Some(date(2024, 1, 1)));
    }

    #[test]
    fn test_locale_formats_day_first() {
        assert_eq!(
            parse_to_local_date("08/06/2025", "test"),
            Some(date(2025, 6, 8))
        );
        assert_eq!(
            parse_to_local_date("08-06-2025", "test"),
            Some(date(2025, 6, 8))
        );
    }

    #[test]
    fn test_garbage_and_empty_yield_none() {
        assert_eq!(parse_to_local_date("", "test"), None);
        assert_eq!(parse_to_local_date("   ", "test"), None);
        assert_eq!(parse_to_local_date("next Tuesday", "test"), None);
        assert_eq!(parse_to_local_date("2025-13-40", "test"), None);
    }

    #[test]
    fn test_days_between_sign_convention() {
        assert_eq!(days_between(date(2025, 6, 8), date(2025, 6, 1)), 7.0);
        assert_eq!(days_between(date(2025, 6, 1), date(2025, 6, 8)), -7.0);
        assert_eq!(days_between(date(2025, 6, 8), date(2025, 6, 8)), 0.0);
    }

    #[test]
    fn test_readable_spanish() {
        // 2025-06-08 is a Sunday
        assert_eq!(to_readable_spanish(date(2025, 6, 8)), "Domingo 8 de Junio");
        assert_eq!(
            to_readable_spanish(date(2025, 12, 24)),
            "Miércoles 24 de Diciembre"
        );
    }

    #[test]
    fn test_storage_format() {
        assert_eq!(to_storage_format(date(2025, 6, 8)), "2025-06-08");
    }
}
