//! Configurable rule tables: thresholds, cross-matrix, promotion matrix,
//! qualitative categories and the salary adjustment table.

use crate::types::{RankCode, SheetType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A rank and the minimum score that qualifies for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankThreshold {
    pub rank: RankCode,
    pub min_score: f64,
}

/// The three independent threshold tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdTables {
    /// Shared by every role.
    pub quantitative: Vec<RankThreshold>,
    /// Managers and assistant managers.
    pub manager_qualitative: Vec<RankThreshold>,
    pub staff_qualitative: Vec<RankThreshold>,
}

impl ThresholdTables {
    pub fn qualitative_for(&self, sheet: SheetType) -> &[RankThreshold] {
        match sheet {
            SheetType::Manager => &self.manager_qualitative,
            SheetType::Staff => &self.staff_qualitative,
        }
    }
}

/// (quantitative rank, qualitative rank) -> final rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossMatrixEntry {
    pub quantitative_rank: RankCode,
    pub qualitative_rank: RankCode,
    pub final_rank: RankCode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankRules {
    pub cross_matrix: Vec<CrossMatrixEntry>,
    pub thresholds: ThresholdTables,
}

/// (previous-period rank, this-period rank) -> promotion level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionRule {
    /// Rank in the previous period.
    pub current_rank: RankCode,
    /// Rank in this period.
    pub next_rank: RankCode,
    pub promotion_level: i32,
}

/// Qualitative category definition. Manager and staff sheets share the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitativeCategory {
    pub category_id: String,
    pub category_name: String,
    pub max_score: f64,
    #[serde(default)]
    pub sort_order: u32,
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitativeCategories {
    pub manager_categories: Vec<QualitativeCategory>,
    pub staff_categories: Vec<QualitativeCategory>,
}

impl QualitativeCategories {
    pub fn for_sheet(&self, sheet: SheetType) -> &[QualitativeCategory] {
        match sheet {
            SheetType::Manager => &self.manager_categories,
            SheetType::Staff => &self.staff_categories,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerSalaryAdjustment {
    /// Applied to S and A ranks.
    pub rank_a: f64,
    /// Applied to C, D and E ranks.
    pub rank_c: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffSalaryAdjustment {
    /// Applied to S and A ranks.
    pub rank_a: f64,
}

/// Salary adjustment amounts keyed by role category and rank bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryAdjustment {
    pub manager: ManagerSalaryAdjustment,
    pub staff: StaffSalaryAdjustment,
}

// ── Record set envelopes ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankRulesData {
    pub version: u32,
    pub updated_at: DateTime<Utc>,
    pub cross_matrix: Vec<CrossMatrixEntry>,
    pub thresholds: ThresholdTables,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RankRulesData {
    pub fn rules(&self) -> RankRules {
        RankRules {
            cross_matrix: self.cross_matrix.clone(),
            thresholds: self.thresholds.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionRulesData {
    pub version: u32,
    pub updated_at: DateTime<Utc>,
    pub rules: Vec<PromotionRule>,
    #[serde(default)]
    pub descriptions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_adjustment: Option<SalaryAdjustment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitativeCategoriesData {
    pub version: u32,
    pub updated_at: DateTime<Utc>,
    pub manager_categories: Vec<QualitativeCategory>,
    pub staff_categories: Vec<QualitativeCategory>,
}

impl QualitativeCategoriesData {
    pub fn categories(&self) -> QualitativeCategories {
        QualitativeCategories {
            manager_categories: self.manager_categories.clone(),
            staff_categories: self.staff_categories.clone(),
        }
    }
}

/// Rule category a change or simulation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    Rank,
    Promotion,
    Qualitative,
    /// Recognised for change logs; not simulatable.
    Bonus,
}

impl RuleType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rank => "rank",
            Self::Promotion => "promotion",
            Self::Qualitative => "qualitative",
            Self::Bonus => "bonus",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleType {
    type Err = crate::error::EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rank" => Ok(Self::Rank),
            "promotion" => Ok(Self::Promotion),
            "qualitative" => Ok(Self::Qualitative),
            "bonus" => Ok(Self::Bonus),
            other => Err(crate::error::EvalError::UnsupportedRuleType {
                rule_type: other.to_string(),
            }),
        }
    }
}
