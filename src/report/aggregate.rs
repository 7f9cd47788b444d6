//! The seven report aggregates, as pure functions over record slices.
//!
//! Groups come out in key order. A row missing a field an aggregate needs
//! is left out of that aggregate only and counted in `excluded`.

use std::collections::BTreeMap;

use crate::models::enums::AgeGroup;
use crate::models::{Appointment, Claim, LabResult, StaffShift};

use super::types::*;

pub fn claims_by_status(claims: &[Claim]) -> Aggregate<StatusCount> {
    let (groups, excluded) = count_by(claims, |c| c.status.clone());
    note_exclusions(AggregateKind::ClaimsByStatus, excluded);
    Aggregate::new(
        groups
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect(),
        excluded,
    )
}

pub fn sla_violation_summary(labs: &[LabResult]) -> Aggregate<SlaCount> {
    let (groups, excluded) = count_by(labs, |l| l.sla_violation);
    note_exclusions(AggregateKind::SlaViolations, excluded);
    Aggregate::new(
        groups
            .into_iter()
            .map(|(violation, count)| SlaCount { violation, count })
            .collect(),
        excluded,
    )
}

/// Mean TAT per department, rounded to two decimals. Departments with no
/// usable rows are absent.
pub fn avg_tat_by_department(labs: &[LabResult]) -> Aggregate<DepartmentTat> {
    let (groups, excluded) = collect_by(labs, |l| Some((l.department.clone()?, l.tat_hours?)));
    note_exclusions(AggregateKind::AvgTatByDepartment, excluded);
    Aggregate::new(
        groups
            .into_iter()
            .map(|(department, mut hours)| {
                let mean = stable_sum(&mut hours) / hours.len() as f64;
                DepartmentTat {
                    department,
                    avg_tat_hours: round2(mean),
                }
            })
            .collect(),
        excluded,
    )
}

pub fn appointment_status_summary(appointments: &[Appointment]) -> Aggregate<StatusCount> {
    let (groups, excluded) = count_by(appointments, |a| a.status.clone());
    note_exclusions(AggregateKind::AppointmentStatus, excluded);
    Aggregate::new(
        groups
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect(),
        excluded,
    )
}

/// Always four rows in bucket order, zero-filled.
pub fn no_show_by_age_group(appointments: &[Appointment]) -> Aggregate<AgeGroupNoShow> {
    let mut buckets = [(0u32, 0u32); 4];
    let mut excluded = 0u32;

    for appt in appointments {
        match (appt.patient_age, appt.is_no_show()) {
            (Some(age), Some(no_show)) => {
                let bucket = &mut buckets[AgeGroup::for_age(age).index()];
                bucket.0 += 1;
                bucket.1 += u32::from(no_show);
            }
            _ => excluded += 1,
        }
    }

    note_exclusions(AggregateKind::NoShowByAgeGroup, excluded);
    Aggregate::new(
        AgeGroup::ALL
            .iter()
            .map(|group| {
                let (total, no_shows) = buckets[group.index()];
                AgeGroupNoShow {
                    age_group: *group,
                    total_appointments: total,
                    no_shows,
                }
            })
            .collect(),
        excluded,
    )
}

pub fn hours_by_role(shifts: &[StaffShift]) -> Aggregate<RoleHours> {
    let (groups, excluded) = collect_by(shifts, |s| Some((s.role.clone()?, s.hours_worked?)));
    note_exclusions(AggregateKind::HoursByRole, excluded);
    Aggregate::new(
        groups
            .into_iter()
            .map(|(role, mut hours)| RoleHours {
                role,
                total_hours: stable_sum(&mut hours),
            })
            .collect(),
        excluded,
    )
}

/// Ordered by department, then shift.
pub fn shift_count_by_dept_and_shift(shifts: &[StaffShift]) -> Aggregate<ShiftCount> {
    let (groups, excluded) = count_by(shifts, |s| Some((s.department.clone()?, s.shift.clone()?)));
    note_exclusions(AggregateKind::ShiftsByDepartment, excluded);
    Aggregate::new(
        groups
            .into_iter()
            .map(|((department, shift), count)| ShiftCount {
                department,
                shift,
                count,
            })
            .collect(),
        excluded,
    )
}

fn count_by<T, K: Ord>(items: &[T], key: impl Fn(&T) -> Option<K>) -> (BTreeMap<K, u32>, u32) {
    let mut groups = BTreeMap::new();
    let mut excluded = 0;
    for item in items {
        match key(item) {
            Some(k) => *groups.entry(k).or_insert(0) += 1,
            None => excluded += 1,
        }
    }
    (groups, excluded)
}

fn collect_by<T, K: Ord>(
    items: &[T],
    key_value: impl Fn(&T) -> Option<(K, f64)>,
) -> (BTreeMap<K, Vec<f64>>, u32) {
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    let mut excluded = 0;
    for item in items {
        match key_value(item) {
            Some((k, v)) => groups.entry(k).or_default().push(v),
            None => excluded += 1,
        }
    }
    (groups, excluded)
}

/// Float sums depend on addition order; sorting first makes the result a
/// function of the multiset alone.
fn stable_sum(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    values.iter().sum()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn note_exclusions(kind: AggregateKind, excluded: u32) {
    if excluded > 0 {
        tracing::warn!(
            aggregate = kind.title(),
            excluded,
            "Rows with missing or unparseable values left out"
        );
    }
}
