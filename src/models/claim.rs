use serde::{Deserialize, Serialize};

/// A billing claim row from `claims`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Claim {
    pub id: Option<String>,
    pub status: Option<String>,
    pub amount: Option<f64>,
    pub department: Option<String>,
}
