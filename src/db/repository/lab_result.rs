use std::collections::BTreeSet;

use rusqlite::{Connection, Row};

use super::{values, FilterQuery};
use crate::db::DatabaseError;
use crate::models::{DepartmentFilter, LabFilter, LabResult, TestSelection};

/// Lab results restricted by department and test selection.
///
/// SQL only narrows the scan; `LabFilter::matches` decides, so padded or
/// oddly typed cells filter exactly as they read.
pub fn fetch_lab_results(
    conn: &Connection,
    filter: &LabFilter,
) -> Result<Vec<LabResult>, DatabaseError> {
    let query = lab_filter_query(filter);
    let sql = format!(
        "SELECT id, department, test_name, tat_hours, sla_violation FROM lab_results{}",
        query.sql_suffix()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(query.param_refs().as_slice(), lab_from_row)?;
    let mut labs = rows.collect::<Result<Vec<_>, _>>()?;
    labs.retain(|l| filter.matches(l));
    Ok(labs)
}

/// Distinct test names present in the source, sorted. This is what an
/// unrestricted test selection covers.
pub fn list_test_names(conn: &Connection) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT test_name FROM lab_results WHERE test_name IS NOT NULL")?;
    let rows = stmt.query_map([], |row| Ok(values::text(row.get_ref(0)?)))?;
    let mut names = BTreeSet::new();
    for name in rows {
        names.extend(name?);
    }
    Ok(names.into_iter().collect())
}

fn lab_filter_query(filter: &LabFilter) -> FilterQuery {
    let mut query = FilterQuery::new();
    if let DepartmentFilter::Only(dept) = filter.department {
        query.contains_nocase("department", dept.as_str());
    }
    if let TestSelection::Only(names) = &filter.tests {
        query.contains_any("test_name", names.iter().cloned());
    }
    query
}

fn lab_from_row(row: &Row<'_>) -> Result<LabResult, rusqlite::Error> {
    Ok(LabResult {
        id: values::text(row.get_ref(0)?),
        department: values::text(row.get_ref(1)?),
        test_name: values::text(row.get_ref(2)?),
        tat_hours: values::real(row.get_ref(3)?),
        sla_violation: values::flag(row.get_ref(4)?),
    })
}
