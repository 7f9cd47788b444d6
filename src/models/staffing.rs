use serde::{Deserialize, Serialize};

/// One worked shift from `staffing`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StaffShift {
    pub id: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub shift: Option<String>,
    pub hours_worked: Option<f64>,
}
