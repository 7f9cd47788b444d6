use rusqlite::Connection;

use crate::db::{self, DatabaseError};
use crate::models::{Appointment, AppointmentFilter, Claim, LabFilter, LabResult, StaffShift};

/// Filtered read access to the four operations collections.
pub trait RecordSource {
    fn claims(&self) -> Result<Vec<Claim>, DatabaseError>;
    fn lab_results(&self, filter: &LabFilter) -> Result<Vec<LabResult>, DatabaseError>;
    fn appointments(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, DatabaseError>;
    fn staff_shifts(&self) -> Result<Vec<StaffShift>, DatabaseError>;
}

/// Reads through a borrowed connection; the caller owns its lifetime.
pub struct SqliteSource<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteSource<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Checks the required collections and columns before handing out a source.
    pub fn verified(conn: &'c Connection) -> Result<Self, DatabaseError> {
        db::verify_collections(conn)?;
        Ok(Self::new(conn))
    }
}

impl RecordSource for SqliteSource<'_> {
    fn claims(&self) -> Result<Vec<Claim>, DatabaseError> {
        db::fetch_claims(self.conn)
    }

    fn lab_results(&self, filter: &LabFilter) -> Result<Vec<LabResult>, DatabaseError> {
        db::fetch_lab_results(self.conn, filter)
    }

    fn appointments(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, DatabaseError> {
        db::fetch_appointments(self.conn, filter)
    }

    fn staff_shifts(&self) -> Result<Vec<StaffShift>, DatabaseError> {
        db::fetch_staff_shifts(self.conn)
    }
}

/// Records held in memory, filtered with the same predicates the SQL
/// restrictions implement. For hosts that already have the rows loaded.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pub claims: Vec<Claim>,
    pub lab_results: Vec<LabResult>,
    pub appointments: Vec<Appointment>,
    pub staff_shifts: Vec<StaffShift>,
}

impl RecordSource for MemorySource {
    fn claims(&self) -> Result<Vec<Claim>, DatabaseError> {
        Ok(self.claims.clone())
    }

    fn lab_results(&self, filter: &LabFilter) -> Result<Vec<LabResult>, DatabaseError> {
        Ok(self
            .lab_results
            .iter()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect())
    }

    fn appointments(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, DatabaseError> {
        Ok(self
            .appointments
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect())
    }

    fn staff_shifts(&self) -> Result<Vec<StaffShift>, DatabaseError> {
        Ok(self.staff_shifts.clone())
    }
}
