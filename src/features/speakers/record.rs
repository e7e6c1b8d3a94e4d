//! # Feature: Speaker Record
//!
//! One `Speaker` per sheet row: field extraction tolerant of inconsistent
//! header casing, construction-time validation, and the derived predicates
//! the reminder engine evaluates (days until preaching, cooldown state,
//! notified flag).
//!
//! Speakers are immutable after construction. Write-backs go to the sheet
//! only; the in-memory snapshot is never refreshed mid-run.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: status_summary for the diagnostic mode
//! - 1.1.0: Business constants injected instead of read from a global
//! - 1.0.0: Initial release with alias extraction and validation

use chrono::NaiveDate;
use log::warn;
use serde::Serialize;

use crate::core::config::BusinessConfig;
use crate::core::dates;
use crate::core::error::ValidationError;
use crate::features::sheets::SheetRow;

/// Country prefix for every phone in the sheet (Colombian numbers).
const COUNTRY_PREFIX: &str = "+57";

/// Column-name aliases per logical field, tried in order; first present wins.
/// The sheet has been edited by hand for years, so header casing drifts.
const NAME_ALIASES: &[&str] = &["Nombre", "nombre", "NOMBRE"];
const PHONE_ALIASES: &[&str] = &["Teléfono", "Telefono", "teléfono", "telefono", "TELEFONO"];
const DATE_ALIASES: &[&str] = &["Fecha", "fecha", "FECHA"];
const NOTIFIED_ALIASES: &[&str] = &["Notificado", "notificado", "NOTIFICADO"];
const REMINDED_ALIASES: &[&str] = &["Recordado", "recordado", "RECORDADO"];
const CHURCH_ALIASES: &[&str] = &["Iglesia", "iglesia", "IGLESIA"];

/// A scheduled speaker, built from one spreadsheet row.
#[derive(Debug, Clone)]
pub struct Speaker {
    /// 0-based data-row index; the stable handle for every write-back.
    pub row_index: usize,
    pub name: String,
    pub phone: String,
    pub church: String,
    /// Original cell text, kept for logging.
    pub raw_date: String,
    /// Preach date normalized to a local calendar date; `None` if unparseable.
    pub preach_date: Option<NaiveDate>,
    /// Free-text "Notificado" cell value.
    pub notified_flag: String,
    /// Free-text "Recordado" cell value (date of the last reminder).
    pub last_reminder_raw: String,
    pub errors: Vec<ValidationError>,
}

/// Serializable snapshot of a speaker's eligibility state, for diagnostics.
#[derive(Debug, Serialize)]
pub struct SpeakerStatus {
    pub name: String,
    pub phone: String,
    pub date: String,
    pub days_until: Option<f64>,
    pub has_been_notified: bool,
    pub preaches_today: bool,
    pub preaches_soon: bool,
    pub can_receive_reminder: bool,
    pub days_since_last_reminder: Option<f64>,
}

impl Speaker {
    /// Build a speaker from a raw row. Always succeeds; validation problems
    /// are recorded in `errors` rather than returned.
    pub fn from_row(row: &SheetRow, row_index: usize) -> Self {
        let name = extract_field(row, NAME_ALIASES);
        let phone = extract_field(row, PHONE_ALIASES);
        let raw_date = extract_field(row, DATE_ALIASES);
        let notified_flag = extract_field(row, NOTIFIED_ALIASES);
        let last_reminder_raw = extract_field(row, REMINDED_ALIASES);
        let church = extract_field(row, CHURCH_ALIASES);

        let context = if name.is_empty() {
            format!("row {}", row_index + 2)
        } else {
            name.clone()
        };
        let preach_date = dates::parse_to_local_date(&raw_date, &context);

        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push(ValidationError::MissingName);
        }
        if phone.is_empty() {
            errors.push(ValidationError::MissingPhone);
        }
        if preach_date.is_none() {
            errors.push(ValidationError::InvalidDate);
        }

        Speaker {
            row_index,
            name,
            phone,
            church,
            raw_date,
            preach_date,
            notified_flag,
            last_reminder_raw,
            errors,
        }
    }

    /// Build speakers from all raw rows, keeping only the valid ones in
    /// original row order. Invalid rows are logged and dropped from
    /// processing but stay untouched in the sheet.
    pub fn from_rows(rows: &[SheetRow]) -> Vec<Speaker> {
        rows.iter()
            .enumerate()
            .map(|(index, row)| Speaker::from_row(row, index))
            .filter(|speaker| {
                if speaker.is_valid() {
                    true
                } else {
                    warn!(
                        "skipping row {}: {}",
                        speaker.row_index + 2,
                        speaker
                            .errors
                            .iter()
                            .map(|e| e.to_string())
                            .collect::<Vec<_>>()
                            .join(", ")
                    );
                    false
                }
            })
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Phone with the fixed country prefix, e.g. `+573001234567`.
    pub fn formatted_phone(&self) -> String {
        format!("{}{}", COUNTRY_PREFIX, self.phone)
    }

    /// True iff the notified cell case-insensitively equals the yes-marker.
    pub fn has_been_notified(&self, business: &BusinessConfig) -> bool {
        !self.notified_flag.is_empty()
            && self.notified_flag.to_lowercase() == business.yes_marker.to_lowercase()
    }

    /// Signed days from today to the preach date; `None` without a date.
    pub fn days_until_preaching(&self) -> Option<f64> {
        self.preach_date
            .map(|date| dates::days_between(date, dates::today()))
    }

    /// True iff the preach date falls within `[min, max]` days from today,
    /// bounds inclusive, compared on the unrounded value.
    pub fn preaches_in_range(&self, min: f64, max: f64) -> bool {
        match self.days_until_preaching() {
            Some(days) => days >= min && days <= max,
            None => false,
        }
    }

    pub fn preaches_today(&self) -> bool {
        match self.days_until_preaching() {
            Some(days) => days.round() == 0.0,
            None => false,
        }
    }

    /// Inside the advance-reminder window: 1 day out through the limit.
    pub fn preaches_soon(&self, business: &BusinessConfig) -> bool {
        self.preaches_in_range(1.0, business.reminder_days_limit as f64)
    }

    /// Days since the last recorded reminder, or `None` when the cell is
    /// empty or unparseable.
    pub fn days_since_last_reminder(&self) -> Option<f64> {
        if self.last_reminder_raw.is_empty() {
            return None;
        }
        dates::parse_to_local_date(&self.last_reminder_raw, &self.name)
            .map(|date| dates::days_between(dates::today(), date))
    }

    /// Cooldown check: no prior reminder, or enough days have passed.
    pub fn can_receive_reminder(&self, business: &BusinessConfig) -> bool {
        match self.days_since_last_reminder() {
            None => true,
            Some(days) => days >= business.cooldown_days as f64,
        }
    }

    /// Preach date formatted for message bodies.
    pub fn formatted_date(&self) -> String {
        match self.preach_date {
            Some(date) => dates::to_readable_spanish(date),
            None => "Fecha inválida".to_string(),
        }
    }

    /// Snapshot of the eligibility state, for the diagnostic dump.
    pub fn status_summary(&self, business: &BusinessConfig) -> SpeakerStatus {
        SpeakerStatus {
            name: self.name.clone(),
            phone: self.phone.clone(),
            date: self.formatted_date(),
            days_until: self.days_until_preaching(),
            has_been_notified: self.has_been_notified(business),
            preaches_today: self.preaches_today(),
            preaches_soon: self.preaches_soon(business),
            can_receive_reminder: self.can_receive_reminder(business),
            days_since_last_reminder: self.days_since_last_reminder(),
        }
    }
}

/// Extract a field by trying each alias in order; missing fields become "".
fn extract_field(row: &SheetRow, aliases: &[&str]) -> String {
    for alias in aliases {
        if let Some(value) = row.get(*alias) {
            return value.clone();
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dates::{to_storage_format, today};
    use chrono::Duration;

    fn row(pairs: &[(&str, &str)]) -> SheetRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn offset_date(days: i64) -> String {
        to_storage_format(today() + Duration::days(days))
    }

    fn business() -> BusinessConfig {
        BusinessConfig::default()
    }

    #[test]
    fn test_extracts_fields_across_header_casings() {
        let speaker = Speaker::from_row(
            &row(&[
                ("NOMBRE", "Ana"),
                ("telefono", "3001234567"),
                ("fecha", "2025-06-08"),
            ]),
            0,
        );
        assert_eq!(speaker.name, "Ana");
        assert_eq!(speaker.phone, "3001234567");
        assert!(speaker.preach_date.is_some());
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let speaker = Speaker::from_row(&row(&[("Fecha", "not a date")]), 0);
        assert!(!speaker.is_valid());
        assert!(speaker.errors.contains(&ValidationError::MissingName));
        assert!(speaker.errors.contains(&ValidationError::MissingPhone));
        assert!(speaker.errors.contains(&ValidationError::InvalidDate));
    }

    #[test]
    fn test_from_rows_drops_invalid_preserves_order() {
        let rows = vec![
            row(&[("Nombre", "Ana"), ("Teléfono", "300"), ("Fecha", "2025-06-08")]),
            row(&[("Nombre", "Sin Teléfono"), ("Fecha", "2025-06-08")]),
            row(&[("Nombre", "Luis"), ("Teléfono", "301"), ("Fecha", "2025-06-09")]),
        ];
        let speakers = Speaker::from_rows(&rows);
        assert_eq!(speakers.len(), 2);
        assert_eq!(speakers[0].name, "Ana");
        assert_eq!(speakers[0].row_index, 0);
        assert_eq!(speakers[1].name, "Luis");
        assert_eq!(speakers[1].row_index, 2);
    }

    #[test]
    fn test_notified_flag_case_insensitive() {
        for (flag, expected) in [("SÍ", true), ("sí", true), ("Sí", true), ("no", false), ("", false)] {
            let speaker = Speaker::from_row(
                &row(&[
                    ("Nombre", "Ana"),
                    ("Teléfono", "300"),
                    ("Fecha", "2025-06-08"),
                    ("Notificado", flag),
                ]),
                0,
            );
            assert_eq!(speaker.has_been_notified(&business()), expected, "flag {flag:?}");
        }
    }

    #[test]
    fn test_preaches_today_and_soon() {
        let today_speaker = Speaker::from_row(
            &row(&[("Nombre", "A"), ("Teléfono", "1"), ("Fecha", &offset_date(0))]),
            0,
        );
        assert!(today_speaker.preaches_today());
        assert!(!today_speaker.preaches_soon(&business()));

        let soon_speaker = Speaker::from_row(
            &row(&[("Nombre", "B"), ("Teléfono", "2"), ("Fecha", &offset_date(10))]),
            1,
        );
        assert!(!soon_speaker.preaches_today());
        assert!(soon_speaker.preaches_soon(&business()));

        let far_speaker = Speaker::from_row(
            &row(&[("Nombre", "C"), ("Teléfono", "3"), ("Fecha", &offset_date(16))]),
            2,
        );
        assert!(!far_speaker.preaches_soon(&business()));
    }

    #[test]
    fn test_window_bounds_inclusive() {
        for (offset, expected) in [(1, true), (15, true), (0, false), (16, false)] {
            let speaker = Speaker::from_row(
                &row(&[("Nombre", "A"), ("Teléfono", "1"), ("Fecha", &offset_date(offset))]),
                0,
            );
            assert_eq!(speaker.preaches_soon(&business()), expected, "offset {offset}");
        }
    }

    #[test]
    fn test_cooldown_boundary() {
        let make = |reminded_days_ago: i64| {
            Speaker::from_row(
                &row(&[
                    ("Nombre", "A"),
                    ("Teléfono", "1"),
                    ("Fecha", &offset_date(5)),
                    ("Recordado", &offset_date(-reminded_days_ago)),
                ]),
                0,
            )
        };
        assert!(!make(3).can_receive_reminder(&business()));
        assert!(make(7).can_receive_reminder(&business()));
        assert!(make(10).can_receive_reminder(&business()));
    }

    #[test]
    fn test_no_prior_reminder_allows_reminder() {
        let speaker = Speaker::from_row(
            &row(&[("Nombre", "A"), ("Teléfono", "1"), ("Fecha", &offset_date(5))]),
            0,
        );
        assert_eq!(speaker.days_since_last_reminder(), None);
        assert!(speaker.can_receive_reminder(&business()));
    }

    #[test]
    fn test_unparseable_reminder_cell_treated_as_none() {
        let speaker = Speaker::from_row(
            &row(&[
                ("Nombre", "A"),
                ("Teléfono", "1"),
                ("Fecha", &offset_date(5)),
                ("Recordado", "???"),
            ]),
            0,
        );
        assert_eq!(speaker.days_since_last_reminder(), None);
        assert!(speaker.can_receive_reminder(&business()));
    }

    #[test]
    fn test_formatted_phone_has_country_prefix() {
        let speaker = Speaker::from_row(
            &row(&[("Nombre", "A"), ("Teléfono", "3001234567"), ("Fecha", "2025-06-08")]),
            0,
        );
        assert_eq!(speaker.formatted_phone(), "+573001234567");
    }
}
