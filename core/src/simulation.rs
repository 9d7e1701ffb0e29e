//! Rule-change simulation: a side-effect-free dry run of a draft rule set.
//!
//! RULES:
//!   - Exactly one rule category varies between the two runs.
//!   - The draft is owned by the override; the current book is only read.
//!   - Nothing here persists. Adoption is the engine's job.

use crate::{
    config::{AppSettings, RuleBook},
    diff::{diff_results, ImpactSummary, ResultDiff},
    employee::Employee,
    error::{EvalError, EvalResult},
    recalculate::{recalculate_all, PromotionBasis, RecalculationInput},
    result::EvaluationResultItem,
    rules::{PromotionRule, QualitativeCategory, RankRules, RuleType},
    score::{QualitativeScoreRecord, QuantitativeScoreRecord},
};
use serde::{Deserialize, Serialize};

/// Loose bag of drafts as a caller submits them. Any subset may be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftRules {
    pub draft_rank_rules: Option<RankRules>,
    pub draft_promotion_rules: Option<Vec<PromotionRule>>,
    pub draft_manager_categories: Option<Vec<QualitativeCategory>>,
    pub draft_staff_categories: Option<Vec<QualitativeCategory>>,
}

/// A single-axis change to the rule book.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOverride {
    Rank(RankRules),
    Promotion(Vec<PromotionRule>),
    /// Either side left `None` keeps the current categories.
    Qualitative {
        manager: Option<Vec<QualitativeCategory>>,
        staff: Option<Vec<QualitativeCategory>>,
    },
}

impl RuleOverride {
    /// Keep only the draft for `rule_type`; every other draft is dropped.
    pub fn select(rule_type: RuleType, drafts: DraftRules) -> EvalResult<Self> {
        let missing = || EvalError::MissingDraft {
            rule_type: rule_type.to_string(),
        };

        match rule_type {
            RuleType::Rank => drafts.draft_rank_rules.map(Self::Rank).ok_or_else(missing),
            RuleType::Promotion => drafts
                .draft_promotion_rules
                .map(Self::Promotion)
                .ok_or_else(missing),
            RuleType::Qualitative => {
                if drafts.draft_manager_categories.is_none()
                    && drafts.draft_staff_categories.is_none()
                {
                    return Err(missing());
                }
                Ok(Self::Qualitative {
                    manager: drafts.draft_manager_categories,
                    staff: drafts.draft_staff_categories,
                })
            }
            RuleType::Bonus => Err(EvalError::UnsupportedRuleType {
                rule_type: rule_type.to_string(),
            }),
        }
    }

    pub fn rule_type(&self) -> RuleType {
        match self {
            Self::Rank(_) => RuleType::Rank,
            Self::Promotion(_) => RuleType::Promotion,
            Self::Qualitative { .. } => RuleType::Qualitative,
        }
    }

    /// An independent copy of `current` with this override applied.
    pub fn apply_to(&self, current: &RuleBook) -> RuleBook {
        let mut book = current.clone();
        match self {
            Self::Rank(rules) => book.rank_rules = rules.clone(),
            Self::Promotion(rules) => book.promotion_rules = rules.clone(),
            Self::Qualitative { manager, staff } => {
                if let Some(manager) = manager {
                    book.categories.manager_categories = manager.clone();
                }
                if let Some(staff) = staff {
                    book.categories.staff_categories = staff.clone();
                }
            }
        }
        book
    }
}

pub struct SimulationInput<'a> {
    pub employees: &'a [Employee],
    pub qualitative_scores: &'a [QualitativeScoreRecord],
    pub quantitative_scores: &'a [QuantitativeScoreRecord],
    pub current: &'a RuleBook,
    pub period: &'a str,
    pub settings: &'a AppSettings,
    pub promotion_basis: PromotionBasis<'a>,
}

impl SimulationInput<'_> {
    fn recalculation<'b>(&'b self, rules: &'b RuleBook) -> RecalculationInput<'b> {
        RecalculationInput {
            employees: self.employees,
            qualitative_scores: self.qualitative_scores,
            quantitative_scores: self.quantitative_scores,
            rules,
            period: self.period,
            settings: self.settings,
            promotion_basis: self.promotion_basis,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutcome {
    pub rule_type: RuleType,
    pub period: String,
    pub before_results: Vec<EvaluationResultItem>,
    pub after_results: Vec<EvaluationResultItem>,
    pub diffs: Vec<ResultDiff>,
    pub summary: ImpactSummary,
}

/// Run the recalculation under the current rules and under the current
/// rules with `rule_override` applied, then diff the two.
pub fn simulate_rule_change(
    input: &SimulationInput<'_>,
    rule_override: &RuleOverride,
) -> EvalResult<SimulationOutcome> {
    let before = recalculate_all(&input.recalculation(input.current))?;

    let draft_book = rule_override.apply_to(input.current);
    let after = recalculate_all(&input.recalculation(&draft_book))?;

    let report = diff_results(&before.evaluation_results.items, &after.evaluation_results.items);

    log::debug!(
        "period={} simulate {}: {} of {} employee(s) changed",
        input.period,
        rule_override.rule_type(),
        report.summary.changed_employees,
        report.summary.total_employees
    );

    Ok(SimulationOutcome {
        rule_type: rule_override.rule_type(),
        period: input.period.to_string(),
        before_results: before.evaluation_results.items,
        after_results: after.evaluation_results.items,
        diffs: report.diffs,
        summary: report.summary,
    })
}
