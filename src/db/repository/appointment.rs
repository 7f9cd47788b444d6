use rusqlite::{Connection, Row};

use super::{values, FilterQuery};
use crate::db::DatabaseError;
use crate::models::{Appointment, AppointmentFilter, DateFilter};

/// Appointments inside the filter's date window.
///
/// SQL only skips cells that can never hold a timestamp. The window itself
/// is applied by `AppointmentFilter::matches`, since SQLite's date
/// functions reject unpadded dates that still read as valid times.
pub fn fetch_appointments(
    conn: &Connection,
    filter: &AppointmentFilter,
) -> Result<Vec<Appointment>, DatabaseError> {
    if filter.dates.is_empty() {
        return Ok(Vec::new());
    }

    let query = appointment_filter_query(filter);
    let sql = format!(
        "SELECT id, status, appointment_time, patient_age FROM appointments{}",
        query.sql_suffix()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(query.param_refs().as_slice(), appointment_from_row)?;
    let mut appointments = rows.collect::<Result<Vec<_>, _>>()?;
    appointments.retain(|a| filter.matches(a));
    Ok(appointments)
}

fn appointment_filter_query(filter: &AppointmentFilter) -> FilterQuery {
    let mut query = FilterQuery::new();
    match filter.dates {
        DateFilter::Any => {}
        DateFilter::Nothing => {
            query.never();
        }
        DateFilter::Between { .. } => {
            query.raw("typeof(appointment_time) = 'text'");
        }
    }
    query
}

fn appointment_from_row(row: &Row<'_>) -> Result<Appointment, rusqlite::Error> {
    Ok(Appointment {
        id: values::text(row.get_ref(0)?),
        status: values::text(row.get_ref(1)?),
        appointment_time: values::timestamp(row.get_ref(2)?),
        patient_age: values::age(row.get_ref(3)?),
    })
}
