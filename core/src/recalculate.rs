//! Recalculation: one full evaluation pass over the active roster.
//!
//! PIPELINE (per active employee, fixed order):
//!   1. Select sheet variant by role (assistant managers use the manager sheet)
//!   2. Aggregate quantitative and qualitative scores
//!   3. Total = rounding_mode(quantitative + qualitative)
//!   4. Classify both partial ranks, combine through the cross-matrix
//!   5. Judge promotion under the caller's chosen basis
//!
//! Then overallRank / roleRank and the ranking structure are assigned
//! with strict sequential positions.
//!
//! RULE: no I/O and no mutation of inputs. Persistence belongs to the caller.

use crate::{
    aggregate::{aggregate_qualitative, aggregate_quantitative, calculate_total_score},
    config::{AppSettings, RuleBook},
    employee::Employee,
    error::{EvalError, EvalResult},
    promotion::{judge_promotion, judge_promotion_by_rank, salary_adjustment},
    rank::{judge_final_rank_by_cross_matrix, judge_rank},
    ranking::{partition_rankings, RankingData, RankingEntry, SequentialRanking},
    result::{EvaluationResultItem, EvaluationResults, ResultDetail},
    score::{QualitativeScoreRecord, QuantitativeScoreRecord},
    types::{EmployeeId, RankCode},
};
use chrono::Utc;
use std::collections::HashMap;

/// Which promotion policy a recalculation applies.
#[derive(Debug, Clone, Copy)]
pub enum PromotionBasis<'a> {
    /// No cross-period history: absolute-level heuristic on this rank.
    RankHeuristic,
    /// Previous period's final ranks: promotion-matrix transition judge.
    PeriodTransition {
        previous_ranks: &'a HashMap<EmployeeId, RankCode>,
    },
}

pub struct RecalculationInput<'a> {
    pub employees: &'a [Employee],
    pub qualitative_scores: &'a [QualitativeScoreRecord],
    pub quantitative_scores: &'a [QuantitativeScoreRecord],
    pub rules: &'a RuleBook,
    pub period: &'a str,
    pub settings: &'a AppSettings,
    pub promotion_basis: PromotionBasis<'a>,
}

#[derive(Debug, Clone)]
pub struct RecalculationOutput {
    pub evaluation_results: EvaluationResults,
    pub ranking: RankingData,
}

pub fn recalculate_all(input: &RecalculationInput<'_>) -> EvalResult<RecalculationOutput> {
    if input.period.trim().is_empty() {
        return Err(EvalError::EmptyPeriod);
    }

    let mut items: Vec<EvaluationResultItem> = input
        .employees
        .iter()
        .filter(|e| e.active)
        .map(|employee| evaluate_employee(employee, input))
        .collect();

    let ranking = partition_rankings(&items, input.period, &SequentialRanking);

    let overall = positions(&ranking.overall);
    let by_role: HashMap<&str, u32> = ranking
        .by_role
        .values()
        .flat_map(|entries| entries.iter())
        .map(|e| (e.employee_id.as_str(), e.position))
        .collect();

    for item in &mut items {
        item.overall_rank = overall.get(item.employee_id.as_str()).copied().unwrap_or(0);
        item.role_rank = by_role.get(item.employee_id.as_str()).copied().unwrap_or(0);
    }

    log::debug!(
        "period={} recalculated {} of {} employee(s)",
        input.period,
        items.len(),
        input.employees.len()
    );

    Ok(RecalculationOutput {
        evaluation_results: EvaluationResults {
            period: input.period.to_string(),
            generated_at: Utc::now(),
            items,
        },
        ranking,
    })
}

fn positions(entries: &[RankingEntry]) -> HashMap<&str, u32> {
    entries
        .iter()
        .map(|e| (e.employee_id.as_str(), e.position))
        .collect()
}

fn evaluate_employee(employee: &Employee, input: &RecalculationInput<'_>) -> EvaluationResultItem {
    let rules = input.rules;
    let sheet = employee.sheet_type();

    let quantitative = aggregate_quantitative(&employee.employee_id, input.quantitative_scores);
    let qualitative = aggregate_qualitative(
        &employee.employee_id,
        input.qualitative_scores,
        rules.categories.for_sheet(sheet),
    );

    let total_score = calculate_total_score(
        quantitative.total,
        qualitative.total,
        input.settings.rounding_mode,
    );

    let thresholds = &rules.rank_rules.thresholds;
    let quantitative_rank = judge_rank(quantitative.total, &thresholds.quantitative);
    let qualitative_rank = judge_rank(qualitative.total, thresholds.qualitative_for(sheet));
    let rank = judge_final_rank_by_cross_matrix(
        quantitative_rank,
        qualitative_rank,
        &rules.rank_rules.cross_matrix,
    );

    let promotion = match input.promotion_basis {
        PromotionBasis::RankHeuristic => judge_promotion_by_rank(rank, employee.role),
        PromotionBasis::PeriodTransition { previous_ranks } => judge_promotion(
            rank,
            previous_ranks.get(&employee.employee_id).copied(),
            &rules.promotion_rules,
            employee.role,
        ),
    };

    let salary = rules
        .salary_adjustment
        .as_ref()
        .map(|table| salary_adjustment(rank, employee.role, table))
        .unwrap_or(0.0);

    EvaluationResultItem {
        employee_id: employee.employee_id.clone(),
        employee_code: employee.employee_code.clone(),
        employee_name: employee.name.clone(),
        role: employee.role,
        store_id: employee.store_id.clone(),
        total_score,
        quantitative_score: quantitative.total,
        qualitative_score: qualitative.total,
        quantitative_rank,
        qualitative_rank,
        rank,
        overall_rank: 0,
        role_rank: 0,
        promotion_status: promotion.status,
        promotion_level: promotion.level,
        promotion_reason: promotion.reason,
        salary_adjustment: salary,
        detail: ResultDetail {
            qualitative_breakdown: qualitative.breakdown,
            quantitative_breakdown: quantitative.breakdown,
        },
    }
}
