//! Raw per-period score records, as supplied by the evaluation sheets.

use crate::types::{EmployeeId, PeriodId};
use serde::{Deserialize, Serialize};

/// One quantitative metric for one employee. Several per employee per period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantitativeScoreRecord {
    pub employee_id: EmployeeId,
    pub metric_id: String,
    pub metric_name: String,
    pub actual_value: f64,
    pub target_value: f64,
    pub score: f64,
    pub weight: f64,
}

/// One qualitative category score for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitativeScoreRecord {
    pub employee_id: EmployeeId,
    pub evaluator_id: String,
    pub category_id: String,
    pub raw_score: f64,
    pub adjusted_score: f64,
    #[serde(default)]
    pub comment: String,
}

/// Per-period score set envelope (`quantitative_scores_<period>`,
/// `qualitative_scores_<period>`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSet<T> {
    pub period: PeriodId,
    pub items: Vec<T>,
}
