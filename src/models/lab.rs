use serde::{Deserialize, Serialize};

/// A lab result row from `lab_results`.
///
/// `department` stays a string: the reports group on whatever the export
/// holds, while filtering goes through `LabDepartment`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LabResult {
    pub id: Option<String>,
    pub department: Option<String>,
    pub test_name: Option<String>,
    pub tat_hours: Option<f64>,
    pub sla_violation: Option<bool>,
}
