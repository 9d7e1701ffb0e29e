//! Per-period evaluation output. Recomputed wholesale on every
//! recalculation, never patched in place.

use crate::aggregate::{QualitativeBreakdown, QuantitativeBreakdown};
use crate::promotion::PromotionStatus;
use crate::types::{EmployeeId, PeriodId, RankCode, Role, StoreId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDetail {
    pub qualitative_breakdown: Vec<QualitativeBreakdown>,
    pub quantitative_breakdown: Vec<QuantitativeBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResultItem {
    pub employee_id: EmployeeId,
    pub employee_code: String,
    pub employee_name: String,
    pub role: Role,
    pub store_id: StoreId,
    /// Rounded sum of the two partial scores.
    pub total_score: f64,
    pub quantitative_score: f64,
    pub qualitative_score: f64,
    pub quantitative_rank: RankCode,
    pub qualitative_rank: RankCode,
    /// Final rank from the cross-matrix.
    pub rank: RankCode,
    pub overall_rank: u32,
    pub role_rank: u32,
    pub promotion_status: PromotionStatus,
    pub promotion_level: i32,
    pub promotion_reason: String,
    #[serde(default)]
    pub salary_adjustment: f64,
    pub detail: ResultDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResults {
    pub period: PeriodId,
    pub generated_at: DateTime<Utc>,
    pub items: Vec<EvaluationResultItem>,
}

impl EvaluationResults {
    /// Final rank per employee, for threading into the next period's
    /// promotion judgement.
    pub fn final_ranks(&self) -> HashMap<EmployeeId, RankCode> {
        self.items
            .iter()
            .map(|item| (item.employee_id.clone(), item.rank))
            .collect()
    }

    pub fn find(&self, employee_id: &str) -> Option<&EvaluationResultItem> {
        self.items.iter().find(|item| item.employee_id == employee_id)
    }
}
