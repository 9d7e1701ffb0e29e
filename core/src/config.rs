//! Application settings and the rule book.
//!
//! In production both come from the record store (see engine.rs).
//! In tests, use `AppSettings::default()` and `RuleBook::default_test()`.

use crate::rules::{
    CrossMatrixEntry, ManagerSalaryAdjustment, PromotionRule, QualitativeCategories,
    QualitativeCategory, RankRules, RankThreshold, SalaryAdjustment, StaffSalaryAdjustment,
    ThresholdTables,
};
use crate::types::{PeriodId, RankCode};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PERIOD: &str = "2025_H2";

/// How the summed quantitative + qualitative score becomes the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    #[default]
    Round,
    Floor,
    Ceil,
}

impl RoundingMode {
    pub fn apply(self, value: f64) -> f64 {
        // Halves round toward positive infinity; `+ 0.0` clears a negative zero.
        let rounded = match self {
            Self::Round => (value + 0.5).floor(),
            Self::Floor => value.floor(),
            Self::Ceil => value.ceil(),
        };
        rounded + 0.0
    }
}

/// Keys consulted, in order, when two results share a total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TieBreakKey {
    TotalScore,
    QuantitativeScore,
    QualitativeScore,
    EmployeeCode,
    EmployeeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub version: u32,
    pub rounding_mode: RoundingMode,
    pub tie_break_order: Vec<TieBreakKey>,
    pub default_period: PeriodId,
    pub allow_popup_windows: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            version: 1,
            rounding_mode: RoundingMode::Round,
            tie_break_order: vec![
                TieBreakKey::TotalScore,
                TieBreakKey::QuantitativeScore,
                TieBreakKey::EmployeeCode,
            ],
            default_period: DEFAULT_PERIOD.to_string(),
            allow_popup_windows: false,
        }
    }
}

/// The complete rule set one recalculation runs under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleBook {
    pub rank_rules: RankRules,
    pub promotion_rules: Vec<PromotionRule>,
    pub categories: QualitativeCategories,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_adjustment: Option<SalaryAdjustment>,
}

impl RuleBook {
    /// Fully populated tables for tests and demos.
    pub fn default_test() -> Self {
        Self {
            rank_rules: RankRules {
                cross_matrix: standard_cross_matrix(),
                thresholds: ThresholdTables {
                    quantitative: thresholds([90.0, 75.0, 60.0, 45.0, 30.0, 0.0]),
                    manager_qualitative: thresholds([54.0, 45.0, 36.0, 27.0, 18.0, 0.0]),
                    staff_qualitative: thresholds([45.0, 38.0, 30.0, 22.0, 15.0, 0.0]),
                },
            },
            promotion_rules: standard_promotion_rules(),
            categories: QualitativeCategories {
                manager_categories: categories(&[
                    ("M1", "Philosophy"),
                    ("M2", "Problem solving"),
                    ("M3", "Operations management"),
                    ("M4", "People development"),
                    ("M5", "Character"),
                    ("M6", "Basic attitude"),
                ]),
                staff_categories: categories(&[
                    ("S1", "Mindset"),
                    ("S2", "Interpersonal skills"),
                    ("S3", "Leadership"),
                    ("S4", "QSC"),
                    ("S5", "Operations"),
                ]),
            },
            salary_adjustment: Some(SalaryAdjustment {
                manager: ManagerSalaryAdjustment {
                    rank_a: 10_000.0,
                    rank_c: -5_000.0,
                },
                staff: StaffSalaryAdjustment { rank_a: 3_000.0 },
            }),
        }
    }
}

fn thresholds(min_scores: [f64; 6]) -> Vec<RankThreshold> {
    RankCode::ALL
        .iter()
        .zip(min_scores)
        .map(|(&rank, min_score)| RankThreshold { rank, min_score })
        .collect()
}

/// All 36 pairs; the final rank is the midpoint of the two ordinals,
/// rounded toward the better rank.
fn standard_cross_matrix() -> Vec<CrossMatrixEntry> {
    let mut matrix = Vec::with_capacity(36);
    for quantitative_rank in RankCode::ALL {
        for qualitative_rank in RankCode::ALL {
            let mid = (quantitative_rank.ordinal() + qualitative_rank.ordinal()) / 2;
            matrix.push(CrossMatrixEntry {
                quantitative_rank,
                qualitative_rank,
                final_rank: RankCode::ALL[(mid - 1) as usize],
            });
        }
    }
    matrix
}

/// Sparse: pairs that keep the same rank have no entry.
fn standard_promotion_rules() -> Vec<PromotionRule> {
    let mut rules = Vec::new();
    for previous in RankCode::ALL {
        for next in RankCode::ALL {
            let steps = previous.ordinal() as i32 - next.ordinal() as i32;
            if steps != 0 {
                rules.push(PromotionRule {
                    current_rank: previous,
                    next_rank: next,
                    promotion_level: steps.clamp(-2, 2),
                });
            }
        }
    }
    rules
}

fn categories(defs: &[(&str, &str)]) -> Vec<QualitativeCategory> {
    defs.iter()
        .enumerate()
        .map(|(i, (id, name))| QualitativeCategory {
            category_id: (*id).to_string(),
            category_name: (*name).to_string(),
            max_score: 10.0,
            sort_order: i as u32 + 1,
            enabled: true,
        })
        .collect()
}
