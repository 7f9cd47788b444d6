use rusqlite::{params, Connection};
use serde::Serialize;

use crate::db::DatabaseError;

/// The four collections a report reads, with the columns it needs.
pub const REQUIRED_COLLECTIONS: &[(&str, &[&str])] = &[
    ("claims", &["id", "status", "amount", "department"]),
    ("lab_results", &["id", "department", "test_name", "tat_hours", "sla_violation"]),
    ("appointments", &["id", "status", "appointment_time", "patient_age"]),
    ("staffing", &["id", "role", "department", "shift", "hours_worked"]),
];

/// Row count of one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionCount {
    pub collection: &'static str,
    pub rows: u64,
}

/// Fails on the first missing collection or column.
pub fn verify_collections(conn: &Connection) -> Result<(), DatabaseError> {
    for (collection, columns) in REQUIRED_COLLECTIONS {
        if !collection_exists(conn, collection)? {
            return Err(DatabaseError::MissingCollection((*collection).to_string()));
        }
        let present = column_names(conn, collection)?;
        if let Some(missing) = columns
            .iter()
            .find(|c| !present.iter().any(|p| p.eq_ignore_ascii_case(c)))
        {
            return Err(DatabaseError::MissingColumn {
                collection: (*collection).to_string(),
                column: (*missing).to_string(),
            });
        }
    }
    Ok(())
}

/// Row counts for every required collection.
pub fn count_collections(conn: &Connection) -> Result<Vec<CollectionCount>, DatabaseError> {
    REQUIRED_COLLECTIONS
        .iter()
        .map(|&(collection, _)| {
            // Table names come from the constant list above, never from input.
            let rows: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM {collection}"),
                [],
                |row| row.get(0),
            )?;
            Ok::<_, DatabaseError>(CollectionCount {
                collection,
                rows: rows.max(0) as u64,
            })
        })
        .collect()
}

fn collection_exists(conn: &Connection, name: &str) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master
         WHERE type IN ('table', 'view') AND name = ?1 COLLATE NOCASE",
        params![name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn column_names(conn: &Connection, table: &str) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let rows = stmt.query_map(params![table], |row| row.get::<_, String>(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    #[test]
    fn migrated_schema_passes() {
        let conn = open_memory_database().unwrap();
        assert!(verify_collections(&conn).is_ok());
    }

    #[test]
    fn missing_collection_reported() {
        let conn = open_memory_database().unwrap();
        conn.execute_batch("DROP TABLE staffing;").unwrap();
        match verify_collections(&conn) {
            Err(DatabaseError::MissingCollection(name)) => assert_eq!(name, "staffing"),
            other => panic!("expected MissingCollection, got {other:?}"),
        }
    }

    #[test]
    fn missing_column_reported() {
        let conn = open_memory_database().unwrap();
        conn.execute_batch(
            "DROP TABLE appointments;
             CREATE TABLE appointments (id TEXT, status TEXT, patient_age INTEGER);",
        )
        .unwrap();
        match verify_collections(&conn) {
            Err(DatabaseError::MissingColumn { collection, column }) => {
                assert_eq!(collection, "appointments");
                assert_eq!(column, "appointment_time");
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn column_names_match_case_insensitively() {
        let conn = open_memory_database().unwrap();
        conn.execute_batch(
            "DROP TABLE claims;
             CREATE TABLE claims (ID TEXT, Status TEXT, Amount REAL, Department TEXT);",
        )
        .unwrap();
        assert!(verify_collections(&conn).is_ok());
    }

    #[test]
    fn counts_every_collection() {
        let conn = open_memory_database().unwrap();
        conn.execute_batch(
            "INSERT INTO claims (id, status) VALUES ('c1', 'Paid'), ('c2', 'Denied');",
        )
        .unwrap();
        let counts = count_collections(&conn).unwrap();
        assert_eq!(counts.len(), 4);
        assert_eq!(counts[0], CollectionCount { collection: "claims", rows: 2 });
        assert!(counts[1..].iter().all(|c| c.rows == 0));
    }
}
