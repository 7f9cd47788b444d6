use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Status value that marks a missed appointment.
pub const NO_SHOW_STATUS: &str = "No-Show";

/// An appointment row from `appointments`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Option<String>,
    pub status: Option<String>,
    /// `None` when the stored value is NULL or does not parse.
    pub appointment_time: Option<NaiveDateTime>,
    /// `None` when NULL, non-numeric or negative.
    pub patient_age: Option<u32>,
}

impl Appointment {
    /// `Some(true)` for a no-show, `None` when the status is missing.
    pub fn is_no_show(&self) -> Option<bool> {
        self.status
            .as_deref()
            .map(|s| s.trim().eq_ignore_ascii_case(NO_SHOW_STATUS))
    }
}

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse an appointment timestamp. Zero padding is optional and a bare
/// date reads as midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn parses_space_and_t_separators() {
        assert_eq!(parse_timestamp("2024-03-01 09:30:00"), Some(ts("2024-03-01 09:30:00")));
        assert_eq!(parse_timestamp("2024-03-01T09:30:00"), Some(ts("2024-03-01 09:30:00")));
        assert_eq!(parse_timestamp("2024-03-01 09:30"), Some(ts("2024-03-01 09:30:00")));
    }

    #[test]
    fn parses_fractional_seconds() {
        let parsed = parse_timestamp("2024-03-01 09:30:00.250").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn bare_date_is_midnight() {
        assert_eq!(parse_timestamp("2024-03-01"), Some(ts("2024-03-01 00:00:00")));
    }

    #[test]
    fn garbage_does_not_parse() {
        assert_eq!(parse_timestamp("next tuesday"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2024-13-40"), None);
    }

    #[test]
    fn no_show_is_case_insensitive() {
        let mut appt = Appointment {
            status: Some("no-show".into()),
            ..Default::default()
        };
        assert_eq!(appt.is_no_show(), Some(true));
        appt.status = Some("Completed".into());
        assert_eq!(appt.is_no_show(), Some(false));
        appt.status = None;
        assert_eq!(appt.is_no_show(), None);
    }
}
