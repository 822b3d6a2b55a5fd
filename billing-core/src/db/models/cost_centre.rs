//! Cost Centre Model

use serde::{Deserialize, Serialize};

/// Organizational billing unit. Employees reference it softly by code.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CostCentre {
    pub id: i64,
    pub code: String,
    pub description: Option<String>,
}

/// Create cost centre payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostCentreCreate {
    pub code: String,
    pub description: Option<String>,
}
