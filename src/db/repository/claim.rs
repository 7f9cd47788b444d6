use rusqlite::{params, Connection, Row};

use super::values;
use crate::db::DatabaseError;
use crate::models::Claim;

const CLAIM_COLUMNS: &str = "id, status, amount, department";

/// All claims. Claims take no report filters.
pub fn fetch_claims(conn: &Connection) -> Result<Vec<Claim>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {CLAIM_COLUMNS} FROM claims"))?;
    let rows = stmt.query_map([], claim_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// First `limit` claims in storage order, for a quick look at the table.
pub fn preview_claims(conn: &Connection, limit: u32) -> Result<Vec<Claim>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CLAIM_COLUMNS} FROM claims ORDER BY rowid LIMIT ?1"
    ))?;
    let rows = stmt.query_map(params![limit], claim_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

fn claim_from_row(row: &Row<'_>) -> Result<Claim, rusqlite::Error> {
    Ok(Claim {
        id: values::text(row.get_ref(0)?),
        status: values::text(row.get_ref(1)?),
        amount: values::real(row.get_ref(2)?),
        department: values::text(row.get_ref(3)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn insert_claim(conn: &Connection, id: &str, status: Option<&str>, amount: f64) {
        conn.execute(
            "INSERT INTO claims (id, status, amount, department) VALUES (?1, ?2, ?3, 'Cardiology')",
            params![id, status, amount],
        )
        .unwrap();
    }

    #[test]
    fn fetch_claims_empty() {
        let conn = open_memory_database().unwrap();
        assert!(fetch_claims(&conn).unwrap().is_empty());
    }

    #[test]
    fn fetch_claims_keeps_null_status() {
        let conn = open_memory_database().unwrap();
        insert_claim(&conn, "c1", Some("Paid"), 120.0);
        insert_claim(&conn, "c2", None, 80.5);

        let claims = fetch_claims(&conn).unwrap();
        assert_eq!(claims.len(), 2);
        assert!(claims.iter().any(|c| c.status.is_none()));
        assert!(claims.iter().any(|c| c.amount == Some(80.5)));
    }

    #[test]
    fn preview_respects_limit_and_order() {
        let conn = open_memory_database().unwrap();
        for i in 0..8 {
            insert_claim(&conn, &format!("c{i}"), Some("Pending"), 10.0 * i as f64);
        }

        let preview = preview_claims(&conn, 5).unwrap();
        assert_eq!(preview.len(), 5);
        assert_eq!(preview[0].id.as_deref(), Some("c0"));
        assert_eq!(preview[4].id.as_deref(), Some("c4"));
    }
}
