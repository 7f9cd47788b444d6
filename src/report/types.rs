use serde::Serialize;

use crate::models::enums::{AgeGroup, ViewMode};

/// Rows of one aggregate plus how many input rows it had to drop for
/// missing or unparseable grouping values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregate<R> {
    pub rows: Vec<R>,
    pub excluded: u32,
}

impl<R> Aggregate<R> {
    pub fn new(rows: Vec<R>, excluded: u32) -> Self {
        Self { rows, excluded }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Rows that carry a count.
pub trait Counted {
    fn count(&self) -> u32;
}

impl<R: Counted> Aggregate<R> {
    /// Sum of the group counts (excludes dropped rows).
    pub fn total(&self) -> u32 {
        self.rows.iter().map(Counted::count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlaCount {
    pub violation: bool,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentTat {
    pub department: String,
    pub avg_tat_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgeGroupNoShow {
    pub age_group: AgeGroup,
    pub total_appointments: u32,
    pub no_shows: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleHours {
    pub role: String,
    pub total_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftCount {
    pub department: String,
    pub shift: String,
    pub count: u32,
}

impl Counted for StatusCount {
    fn count(&self) -> u32 {
        self.count
    }
}

impl Counted for SlaCount {
    fn count(&self) -> u32 {
        self.count
    }
}

impl Counted for ShiftCount {
    fn count(&self) -> u32 {
        self.count
    }
}

impl Aggregate<SlaCount> {
    /// Count for one flag; a group that never occurred reads as zero.
    pub fn count_for(&self, violation: bool) -> u32 {
        self.rows
            .iter()
            .find(|r| r.violation == violation)
            .map_or(0, |r| r.count)
    }
}

/// The seven report sections, in dashboard order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateKind {
    ClaimsByStatus,
    SlaViolations,
    AvgTatByDepartment,
    AppointmentStatus,
    NoShowByAgeGroup,
    HoursByRole,
    ShiftsByDepartment,
}

impl AggregateKind {
    pub const ALL: [AggregateKind; 7] = [
        Self::ClaimsByStatus,
        Self::SlaViolations,
        Self::AvgTatByDepartment,
        Self::AppointmentStatus,
        Self::NoShowByAgeGroup,
        Self::HoursByRole,
        Self::ShiftsByDepartment,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::ClaimsByStatus => "Claims Summary",
            Self::SlaViolations => "Lab SLA Performance",
            Self::AvgTatByDepartment => "Average TAT by Department",
            Self::AppointmentStatus => "Appointment Status",
            Self::NoShowByAgeGroup => "No-Shows by Age Group",
            Self::HoursByRole => "Staffing Summary",
            Self::ShiftsByDepartment => "Shift Distribution by Department",
        }
    }

    /// How the dashboard draws the section unless told otherwise.
    pub fn default_view(&self) -> ViewMode {
        match self {
            Self::ClaimsByStatus
            | Self::AvgTatByDepartment
            | Self::AppointmentStatus
            | Self::HoursByRole => ViewMode::Chart,
            Self::SlaViolations | Self::NoShowByAgeGroup | Self::ShiftsByDepartment => {
                ViewMode::Table
            }
        }
    }
}

/// Typed rows of a section, as handed to a sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", content = "rows", rename_all = "snake_case")]
pub enum SectionRows {
    StatusCounts(Vec<StatusCount>),
    SlaCounts(Vec<SlaCount>),
    DepartmentTat(Vec<DepartmentTat>),
    AgeGroupNoShows(Vec<AgeGroupNoShow>),
    RoleHours(Vec<RoleHours>),
    ShiftCounts(Vec<ShiftCount>),
}

/// One labelled value in a bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    pub display: String,
}

impl ChartPoint {
    fn count(label: impl Into<String>, count: u32) -> Self {
        Self {
            label: label.into(),
            value: f64::from(count),
            display: count.to_string(),
        }
    }

    fn hours(label: impl Into<String>, hours: f64) -> Self {
        Self {
            label: label.into(),
            value: hours,
            display: format!("{hours:.2}"),
        }
    }
}

fn sla_label(violation: bool) -> &'static str {
    if violation {
        "Violation"
    } else {
        "Within SLA"
    }
}

impl SectionRows {
    pub fn len(&self) -> usize {
        match self {
            Self::StatusCounts(r) => r.len(),
            Self::SlaCounts(r) => r.len(),
            Self::DepartmentTat(r) => r.len(),
            Self::AgeGroupNoShows(r) => r.len(),
            Self::RoleHours(r) => r.len(),
            Self::ShiftCounts(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            Self::StatusCounts(_) => &["Status", "Total"],
            Self::SlaCounts(_) => &["SLA Violation", "Total"],
            Self::DepartmentTat(_) => &["Department", "Avg TAT (hours)"],
            Self::AgeGroupNoShows(_) => &["Age Group", "Total Appointments", "No-Shows"],
            Self::RoleHours(_) => &["Role", "Total Hours"],
            Self::ShiftCounts(_) => &["Department", "Shift", "Shift Count"],
        }
    }

    /// Rows as display strings, aligned with `headers`.
    pub fn cells(&self) -> Vec<Vec<String>> {
        match self {
            Self::StatusCounts(rows) => rows
                .iter()
                .map(|r| vec![r.status.clone(), r.count.to_string()])
                .collect(),
            Self::SlaCounts(rows) => rows
                .iter()
                .map(|r| vec![sla_label(r.violation).to_string(), r.count.to_string()])
                .collect(),
            Self::DepartmentTat(rows) => rows
                .iter()
                .map(|r| vec![r.department.clone(), format!("{:.2}", r.avg_tat_hours)])
                .collect(),
            Self::AgeGroupNoShows(rows) => rows
                .iter()
                .map(|r| {
                    vec![
                        r.age_group.as_str().to_string(),
                        r.total_appointments.to_string(),
                        r.no_shows.to_string(),
                    ]
                })
                .collect(),
            Self::RoleHours(rows) => rows
                .iter()
                .map(|r| vec![r.role.clone(), format!("{:.2}", r.total_hours)])
                .collect(),
            Self::ShiftCounts(rows) => rows
                .iter()
                .map(|r| vec![r.department.clone(), r.shift.clone(), r.count.to_string()])
                .collect(),
        }
    }

    /// One bar per row, measured on the section's headline value.
    pub fn chart_points(&self) -> Vec<ChartPoint> {
        match self {
            Self::StatusCounts(rows) => rows
                .iter()
                .map(|r| ChartPoint::count(r.status.as_str(), r.count))
                .collect(),
            Self::SlaCounts(rows) => rows
                .iter()
                .map(|r| ChartPoint::count(sla_label(r.violation), r.count))
                .collect(),
            Self::DepartmentTat(rows) => rows
                .iter()
                .map(|r| ChartPoint::hours(r.department.as_str(), r.avg_tat_hours))
                .collect(),
            Self::AgeGroupNoShows(rows) => rows
                .iter()
                .map(|r| ChartPoint::count(r.age_group.as_str(), r.no_shows))
                .collect(),
            Self::RoleHours(rows) => rows
                .iter()
                .map(|r| ChartPoint::hours(r.role.as_str(), r.total_hours))
                .collect(),
            Self::ShiftCounts(rows) => rows
                .iter()
                .map(|r| ChartPoint::count(format!("{} / {}", r.department, r.shift), r.count))
                .collect(),
        }
    }
}

/// A named, typed aggregate ready for a sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSection {
    pub kind: AggregateKind,
    pub title: &'static str,
    pub excluded: u32,
    pub data: SectionRows,
}

impl ReportSection {
    pub fn new(kind: AggregateKind, data: SectionRows, excluded: u32) -> Self {
        Self {
            kind,
            title: kind.title(),
            excluded,
            data,
        }
    }
}
