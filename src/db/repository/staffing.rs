use rusqlite::{Connection, Row};

use super::values;
use crate::db::DatabaseError;
use crate::models::StaffShift;

/// All staffing rows. Staffing takes no report filters.
pub fn fetch_staff_shifts(conn: &Connection) -> Result<Vec<StaffShift>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT id, role, department, shift, hours_worked FROM staffing")?;
    let rows = stmt.query_map([], shift_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

fn shift_from_row(row: &Row<'_>) -> Result<StaffShift, rusqlite::Error> {
    Ok(StaffShift {
        id: values::text(row.get_ref(0)?),
        role: values::text(row.get_ref(1)?),
        department: values::text(row.get_ref(2)?),
        shift: values::text(row.get_ref(3)?),
        hours_worked: values::real(row.get_ref(4)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    #[test]
    fn reads_all_shifts() {
        let conn = open_memory_database().unwrap();
        conn.execute_batch(
            "INSERT INTO staffing (id, role, department, shift, hours_worked) VALUES
                ('s1', 'Nurse', 'ER', 'Night', 12),
                ('s2', 'Technician', 'Lab', 'Day', 8.5),
                ('s3', NULL, 'Lab', 'Day', 'eight');",
        )
        .unwrap();

        let shifts = fetch_staff_shifts(&conn).unwrap();
        assert_eq!(shifts.len(), 3);
        let s1 = shifts.iter().find(|s| s.id.as_deref() == Some("s1")).unwrap();
        assert_eq!(s1.hours_worked, Some(12.0));
        let s3 = shifts.iter().find(|s| s.id.as_deref() == Some("s3")).unwrap();
        assert_eq!(s3.role, None);
        assert_eq!(s3.hours_worked, None);
    }
}
