//! Filter composition: plain UI selections in, typed restrictions out.
//!
//! `FilterInput` is what a host UI hands over (strings, possibly JSON).
//! `FilterInput::compose` never fails: unknown departments widen to all,
//! malformed dates narrow the appointment set to nothing.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::appointment::{parse_timestamp, Appointment};
use super::enums::{LabDepartment, ViewPreference};
use super::lab::LabResult;

/// Label the UI uses for "no department restriction".
pub const ALL_DEPARTMENTS: &str = "All";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepartmentFilter {
    #[default]
    All,
    Only(LabDepartment),
}

impl DepartmentFilter {
    /// Unknown or empty labels fall back to `All`.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_DEPARTMENTS) {
            return Self::All;
        }
        match LabDepartment::from_label(trimmed) {
            Some(dept) => Self::Only(dept),
            None => {
                tracing::warn!(department = %trimmed, "Unknown department, showing all");
                Self::All
            }
        }
    }

    pub fn matches(&self, department: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Only(dept) => department
                .map(|d| d.trim().eq_ignore_ascii_case(dept.as_str()))
                .unwrap_or(false),
        }
    }
}

/// Test-name multi-selection. `Only` of an empty set selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestSelection {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl TestSelection {
    /// Blank names are dropped, so a selection of only blanks is empty.
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Only(
            names
                .into_iter()
                .map(|n| n.as_ref().trim().to_string())
                .filter(|n| !n.is_empty())
                .collect(),
        )
    }

    pub fn none() -> Self {
        Self::Only(BTreeSet::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Only(names) if names.is_empty())
    }

    pub fn matches(&self, test_name: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => test_name
                .map(|n| names.contains(n.trim()))
                .unwrap_or(false),
        }
    }
}

/// Inclusive date window over `appointment_time`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFilter {
    #[default]
    Any,
    Between {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    /// Malformed or inverted range: matches no appointment.
    Nothing,
}

impl DateFilter {
    pub fn between(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        match (from, to) {
            (None, None) => Self::Any,
            (Some(f), Some(t)) if t < f => Self::Nothing,
            _ => Self::Between { from, to },
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Nothing)
    }

    /// First instant inside the window.
    pub fn lower_bound(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Between { from: Some(f), .. } => f.and_hms_opt(0, 0, 0),
            _ => None,
        }
    }

    /// First instant after the window (midnight following `to`).
    pub fn upper_bound_exclusive(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Between { to: Some(t), .. } => {
                t.succ_opt().and_then(|next| next.and_hms_opt(0, 0, 0))
            }
            _ => None,
        }
    }

    pub fn matches(&self, time: Option<NaiveDateTime>) -> bool {
        match self {
            Self::Any => true,
            Self::Nothing => false,
            Self::Between { .. } => match time {
                Some(t) => {
                    self.lower_bound().map_or(true, |lo| t >= lo)
                        && self.upper_bound_exclusive().map_or(true, |hi| t < hi)
                }
                None => false,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabFilter {
    pub department: DepartmentFilter,
    pub tests: TestSelection,
}

impl LabFilter {
    pub fn matches(&self, lab: &LabResult) -> bool {
        self.department.matches(lab.department.as_deref())
            && self.tests.matches(lab.test_name.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentFilter {
    pub dates: DateFilter,
}

impl AppointmentFilter {
    pub fn matches(&self, appt: &Appointment) -> bool {
        self.dates.matches(appt.appointment_time)
    }
}

/// Everything a refresh restricts on. Claims and staffing are unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub lab: LabFilter,
    pub appointments: AppointmentFilter,
}

impl fmt::Display for ReportFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let department = match self.lab.department {
            DepartmentFilter::All => ALL_DEPARTMENTS,
            DepartmentFilter::Only(dept) => dept.as_str(),
        };
        let tests = match &self.lab.tests {
            TestSelection::All => "all".to_string(),
            TestSelection::Only(names) if names.is_empty() => "none".to_string(),
            TestSelection::Only(names) => names.iter().cloned().collect::<Vec<_>>().join(", "),
        };
        let dates = match self.appointments.dates {
            DateFilter::Any => "any".to_string(),
            DateFilter::Nothing => "none".to_string(),
            DateFilter::Between { from, to } => {
                let bound = |d: Option<NaiveDate>| d.map_or_else(|| "open".to_string(), |d| d.to_string());
                format!("{} to {}", bound(from), bound(to))
            }
        };
        write!(f, "department={department}; tests={tests}; dates={dates}")
    }
}

/// Raw selections from the host UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterInput {
    pub department: Option<String>,
    /// `None` selects every test; `Some(vec![])` selects none.
    pub test_names: Option<Vec<String>>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub view: Option<String>,
}

impl FilterInput {
    pub fn compose(&self) -> ReportFilter {
        let department = self
            .department
            .as_deref()
            .map(DepartmentFilter::from_label)
            .unwrap_or_default();

        let tests = match &self.test_names {
            None => TestSelection::All,
            Some(names) => TestSelection::only(names),
        };

        ReportFilter {
            lab: LabFilter { department, tests },
            appointments: AppointmentFilter {
                dates: compose_dates(self.date_from.as_deref(), self.date_to.as_deref()),
            },
        }
    }

    /// Unknown view labels fall back to the dashboard layout.
    pub fn view_preference(&self) -> ViewPreference {
        self.view
            .as_deref()
            .and_then(ViewPreference::from_label)
            .unwrap_or_default()
    }
}

enum DateBound {
    Absent,
    Valid(NaiveDate),
    Malformed,
}

fn parse_date_bound(raw: Option<&str>) -> DateBound {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return DateBound::Absent;
    };
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return DateBound::Valid(date);
    }
    match parse_timestamp(raw) {
        Some(ts) => DateBound::Valid(ts.date()),
        None => DateBound::Malformed,
    }
}

fn compose_dates(from: Option<&str>, to: Option<&str>) -> DateFilter {
    let bound = |b: DateBound| match b {
        DateBound::Absent => Ok(None),
        DateBound::Valid(d) => Ok(Some(d)),
        DateBound::Malformed => Err(()),
    };

    match (bound(parse_date_bound(from)), bound(parse_date_bound(to))) {
        (Ok(f), Ok(t)) => {
            let dates = DateFilter::between(f, t);
            if dates.is_empty() {
                tracing::warn!(?from, ?to, "Date range ends before it starts, no appointments selected");
            }
            dates
        }
        _ => {
            tracing::warn!(?from, ?to, "Unparseable date range, no appointments selected");
            DateFilter::Nothing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(s: &str) -> Option<NaiveDateTime> {
        parse_timestamp(s)
    }

    #[test]
    fn empty_input_is_identity() {
        let filter = FilterInput::default().compose();
        assert_eq!(filter, ReportFilter::default());
        assert!(filter.lab.matches(&LabResult::default()));
        assert!(filter.appointments.matches(&Appointment::default()));
    }

    #[test]
    fn department_all_and_unknown_fall_back() {
        assert_eq!(DepartmentFilter::from_label("All"), DepartmentFilter::All);
        assert_eq!(DepartmentFilter::from_label(""), DepartmentFilter::All);
        assert_eq!(DepartmentFilter::from_label("Radiology"), DepartmentFilter::All);
        assert_eq!(
            DepartmentFilter::from_label("microbiology"),
            DepartmentFilter::Only(LabDepartment::Microbiology)
        );
    }

    #[test]
    fn department_match_requires_value() {
        let filter = DepartmentFilter::Only(LabDepartment::Hematology);
        assert!(filter.matches(Some("Hematology")));
        assert!(filter.matches(Some(" hematology ")));
        assert!(!filter.matches(Some("Chemistry")));
        assert!(!filter.matches(None));
    }

    #[test]
    fn empty_test_selection_selects_nothing() {
        let input = FilterInput {
            test_names: Some(vec![]),
            ..Default::default()
        };
        let filter = input.compose();
        assert!(filter.lab.tests.is_empty());

        let lab = LabResult {
            test_name: Some("CBC".into()),
            ..Default::default()
        };
        assert!(!filter.lab.matches(&lab));
    }

    #[test]
    fn blank_test_names_are_dropped() {
        let selection = TestSelection::only(["  ", "CBC ", ""]);
        assert_eq!(selection, TestSelection::Only(BTreeSet::from(["CBC".to_string()])));
        assert!(TestSelection::only(["  "]).is_empty());
    }

    #[test]
    fn test_selection_matches_members_only() {
        let selection = TestSelection::only(["CBC", "Lipid Panel"]);
        assert!(selection.matches(Some("CBC")));
        assert!(selection.matches(Some("Lipid Panel ")));
        assert!(!selection.matches(Some("Culture")));
        assert!(!selection.matches(None));
        assert!(TestSelection::All.matches(None));
    }

    #[test]
    fn filters_compose_with_and() {
        let filter = LabFilter {
            department: DepartmentFilter::Only(LabDepartment::Chemistry),
            tests: TestSelection::only(["BMP"]),
        };
        let hit = LabResult {
            department: Some("Chemistry".into()),
            test_name: Some("BMP".into()),
            ..Default::default()
        };
        let wrong_dept = LabResult {
            department: Some("Hematology".into()),
            ..hit.clone()
        };
        let wrong_test = LabResult {
            test_name: Some("CBC".into()),
            ..hit.clone()
        };
        assert!(filter.matches(&hit));
        assert!(!filter.matches(&wrong_dept));
        assert!(!filter.matches(&wrong_test));
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let dates = DateFilter::between(Some(date(2024, 3, 1)), Some(date(2024, 3, 31)));
        assert!(dates.matches(at("2024-03-01 00:00:00")));
        assert!(dates.matches(at("2024-03-31 23:59:59")));
        assert!(!dates.matches(at("2024-02-29 23:59:59")));
        assert!(!dates.matches(at("2024-04-01 00:00:00")));
        assert!(!dates.matches(None));
    }

    #[test]
    fn open_ended_ranges() {
        let from_only = DateFilter::between(Some(date(2024, 3, 1)), None);
        assert!(from_only.matches(at("2030-01-01")));
        assert!(!from_only.matches(at("2024-02-01")));

        let to_only = DateFilter::between(None, Some(date(2024, 3, 1)));
        assert!(to_only.matches(at("1999-01-01")));
        assert!(!to_only.matches(at("2024-03-02")));
    }

    #[test]
    fn inverted_range_is_empty() {
        let input = FilterInput {
            date_from: Some("2024-03-31".into()),
            date_to: Some("2024-03-01".into()),
            ..Default::default()
        };
        let dates = input.compose().appointments.dates;
        assert_eq!(dates, DateFilter::Nothing);
        assert!(!dates.matches(at("2024-03-15")));
    }

    #[test]
    fn malformed_date_is_empty() {
        let input = FilterInput {
            date_from: Some("March 1st".into()),
            date_to: Some("2024-03-31".into()),
            ..Default::default()
        };
        assert_eq!(input.compose().appointments.dates, DateFilter::Nothing);
    }

    #[test]
    fn single_day_range() {
        let input = FilterInput {
            date_from: Some("2024-03-15".into()),
            date_to: Some("2024-03-15".into()),
            ..Default::default()
        };
        let dates = input.compose().appointments.dates;
        assert!(dates.matches(at("2024-03-15 17:45")));
        assert!(!dates.matches(at("2024-03-16 00:00:00")));
    }

    #[test]
    fn filter_input_from_json() {
        let input: FilterInput = serde_json::from_str(
            r#"{"department": "Hematology", "test_names": [], "view": "table"}"#,
        )
        .unwrap();
        let filter = input.compose();
        assert_eq!(filter.lab.department, DepartmentFilter::Only(LabDepartment::Hematology));
        assert!(filter.lab.tests.is_empty());
        assert_eq!(input.view_preference(), ViewPreference::Table);
    }

    #[test]
    fn display_summarises_selection() {
        let filter = FilterInput {
            department: Some("chemistry".into()),
            test_names: Some(vec![]),
            date_from: Some("2024-03-01".into()),
            ..Default::default()
        }
        .compose();
        assert_eq!(
            filter.to_string(),
            "department=Chemistry; tests=none; dates=2024-03-01 to open"
        );
        assert_eq!(
            ReportFilter::default().to_string(),
            "department=All; tests=all; dates=any"
        );
    }

    #[test]
    fn unknown_view_falls_back_to_auto() {
        let input = FilterInput {
            view: Some("pie".into()),
            ..Default::default()
        };
        assert_eq!(input.view_preference(), ViewPreference::Auto);
    }
}
