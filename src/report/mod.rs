//! Report assembly: one refresh computes all seven aggregates from the
//! current filter, then hands the finished report to a sink.
//!
//! The connection lives only inside `compute_report` and is closed before
//! anything is rendered. A failed refresh renders nothing.

mod aggregate;
mod source;
mod types;

pub use aggregate::*;
pub use source::*;
pub use types::*;

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use thiserror::Error;

use crate::db::{self, DatabaseError};
use crate::models::enums::ViewPreference;
use crate::models::{FilterInput, ReportFilter};
use crate::render::{RenderError, ReportSink};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Data source unavailable at {path}: {reason}")]
    SourceUnavailable { path: String, reason: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Render failed: {0}")]
    Render(#[from] RenderError),
}

/// All seven aggregates from one refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub generated_at: String,
    pub filter: ReportFilter,
    pub claims_by_status: Aggregate<StatusCount>,
    pub sla_violations: Aggregate<SlaCount>,
    pub avg_tat_by_department: Aggregate<DepartmentTat>,
    pub appointment_status: Aggregate<StatusCount>,
    pub no_show_by_age_group: Aggregate<AgeGroupNoShow>,
    pub hours_by_role: Aggregate<RoleHours>,
    pub shifts_by_department: Aggregate<ShiftCount>,
}

impl Report {
    /// Sections in dashboard order.
    pub fn sections(&self) -> Vec<ReportSection> {
        AggregateKind::ALL
            .iter()
            .map(|kind| self.section(*kind))
            .collect()
    }

    pub fn section(&self, kind: AggregateKind) -> ReportSection {
        let (data, excluded) = match kind {
            AggregateKind::ClaimsByStatus => (
                SectionRows::StatusCounts(self.claims_by_status.rows.clone()),
                self.claims_by_status.excluded,
            ),
            AggregateKind::SlaViolations => (
                SectionRows::SlaCounts(self.sla_violations.rows.clone()),
                self.sla_violations.excluded,
            ),
            AggregateKind::AvgTatByDepartment => (
                SectionRows::DepartmentTat(self.avg_tat_by_department.rows.clone()),
                self.avg_tat_by_department.excluded,
            ),
            AggregateKind::AppointmentStatus => (
                SectionRows::StatusCounts(self.appointment_status.rows.clone()),
                self.appointment_status.excluded,
            ),
            AggregateKind::NoShowByAgeGroup => (
                SectionRows::AgeGroupNoShows(self.no_show_by_age_group.rows.clone()),
                self.no_show_by_age_group.excluded,
            ),
            AggregateKind::HoursByRole => (
                SectionRows::RoleHours(self.hours_by_role.rows.clone()),
                self.hours_by_role.excluded,
            ),
            AggregateKind::ShiftsByDepartment => (
                SectionRows::ShiftCounts(self.shifts_by_department.rows.clone()),
                self.shifts_by_department.excluded,
            ),
        };
        ReportSection::new(kind, data, excluded)
    }
}

/// Reads the filtered records once and computes every aggregate.
pub fn build_report(
    source: &dyn RecordSource,
    filter: &ReportFilter,
) -> Result<Report, DatabaseError> {
    let claims = source.claims()?;
    let labs = source.lab_results(&filter.lab)?;
    let appointments = source.appointments(&filter.appointments)?;
    let shifts = source.staff_shifts()?;

    tracing::info!(
        claims = claims.len(),
        lab_results = labs.len(),
        appointments = appointments.len(),
        staff_shifts = shifts.len(),
        "Records loaded for report"
    );

    Ok(Report {
        generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        filter: filter.clone(),
        claims_by_status: claims_by_status(&claims),
        sla_violations: sla_violation_summary(&labs),
        avg_tat_by_department: avg_tat_by_department(&labs),
        appointment_status: appointment_status_summary(&appointments),
        no_show_by_age_group: no_show_by_age_group(&appointments),
        hours_by_role: hours_by_role(&shifts),
        shifts_by_department: shift_count_by_dept_and_shift(&shifts),
    })
}

/// Opens the database, computes the report, and closes the connection on
/// every path out.
pub fn compute_report(db_path: &Path, filter: &ReportFilter) -> Result<Report, ReportError> {
    let conn = db::open_database(db_path).map_err(|e| ReportError::SourceUnavailable {
        path: db_path.display().to_string(),
        reason: e.to_string(),
    })?;

    let result = SqliteSource::verified(&conn).and_then(|source| build_report(&source, filter));

    if let Err((_, e)) = conn.close() {
        tracing::warn!(error = %e, "Database did not close cleanly");
    }

    Ok(result?)
}

/// Hands a finished report to a sink, section by section.
pub fn render_report(
    report: &Report,
    view: ViewPreference,
    sink: &mut dyn ReportSink,
) -> Result<(), RenderError> {
    sink.begin(report)?;
    for section in report.sections() {
        let mode = view.resolve(section.kind.default_view());
        sink.render_section(&section, mode)?;
    }
    sink.finish()
}

/// One full refresh: compute everything, then render.
pub fn refresh(
    db_path: &Path,
    filter: &ReportFilter,
    view: ViewPreference,
    sink: &mut dyn ReportSink,
) -> Result<Report, ReportError> {
    let report = compute_report(db_path, filter)?;
    render_report(&report, view, sink)?;
    Ok(report)
}

/// Filter state plus the last good report, driven by explicit refreshes.
pub struct DashboardSession {
    db_path: PathBuf,
    filter: ReportFilter,
    view: ViewPreference,
    last_report: Option<Report>,
}

impl DashboardSession {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            filter: ReportFilter::default(),
            view: ViewPreference::default(),
            last_report: None,
        }
    }

    /// Replace the filter state. Takes effect on the next refresh.
    pub fn apply(&mut self, input: &FilterInput) {
        self.filter = input.compose();
        self.view = input.view_preference();
    }

    pub fn filter(&self) -> &ReportFilter {
        &self.filter
    }

    pub fn view(&self) -> ViewPreference {
        self.view
    }

    pub fn last_report(&self) -> Option<&Report> {
        self.last_report.as_ref()
    }

    /// Recompute everything. The previous report is dropped first, so a
    /// failure never leaves it standing in for the new filter.
    pub fn refresh(&mut self, sink: &mut dyn ReportSink) -> Result<&Report, ReportError> {
        self.last_report = None;
        let report = refresh(&self.db_path, &self.filter, self.view, sink)?;
        Ok(&*self.last_report.insert(report))
    }
}
