use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use super::DatabaseError;

/// Open an existing operations database for reporting.
///
/// The connection is read-only and never migrates: the reporting layer
/// consumes whatever the export produced.
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    conn.execute_batch("PRAGMA query_only=ON;")?;
    tracing::debug!(path = %path.display(), "Opened database read-only");
    Ok(conn)
}

/// Layout of an export, used to build fixture stores.
#[cfg(test)]
const FIXTURE_SCHEMA: &str = include_str!("../../resources/schema.sql");

/// Create a writable database file laid out like an export.
#[cfg(test)]
pub fn create_database(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path)?;
    conn.execute_batch(FIXTURE_SCHEMA)?;
    Ok(conn)
}

/// Open an in-memory database (for testing)
#[cfg(test)]
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(FIXTURE_SCHEMA)?;
    Ok(conn)
}
