//! Before/after comparison of two result sets, and of two promotion
//! matrices.

use crate::promotion::PromotionStatus;
use crate::result::EvaluationResultItem;
use crate::rules::PromotionRule;
use crate::types::{EmployeeId, RankCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMovement {
    Up,
    Down,
    Unchanged,
}

impl RankMovement {
    /// Compares ordinals over the full S..E scale.
    pub fn between(before: RankCode, after: RankCode) -> Self {
        if after.is_better_than(before) {
            Self::Up
        } else if before.is_better_than(after) {
            Self::Down
        } else {
            Self::Unchanged
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDiff {
    pub employee_id: EmployeeId,
    pub before_rank: RankCode,
    pub after_rank: RankCode,
    pub before_total_score: f64,
    pub after_total_score: f64,
    pub before_promotion_status: PromotionStatus,
    pub after_promotion_status: PromotionStatus,
    pub rank_change: bool,
    pub promotion_change: bool,
    pub rank_movement: RankMovement,
    pub changed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactSummary {
    pub total_employees: usize,
    pub changed_employees: usize,
    pub unchanged_employees: usize,
    pub rank_up_count: usize,
    pub rank_down_count: usize,
    pub promote_count: usize,
    pub demote_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultDiffReport {
    pub diffs: Vec<ResultDiff>,
    pub summary: ImpactSummary,
}

/// Diff every employee present in both sets, in `after` order.
///
/// Promotions and demotions count only on entry: an employee already in
/// a promotion status before is not counted again.
pub fn diff_results(
    before: &[EvaluationResultItem],
    after: &[EvaluationResultItem],
) -> ResultDiffReport {
    let before_by_id: HashMap<&str, &EvaluationResultItem> = before
        .iter()
        .map(|item| (item.employee_id.as_str(), item))
        .collect();

    let mut summary = ImpactSummary::default();
    let mut diffs = Vec::with_capacity(after.len());

    for after_item in after {
        let Some(before_item) = before_by_id.get(after_item.employee_id.as_str()) else {
            continue;
        };

        let rank_change = before_item.rank != after_item.rank;
        let promotion_change = before_item.promotion_status != after_item.promotion_status;
        let changed = rank_change || promotion_change;
        let rank_movement = RankMovement::between(before_item.rank, after_item.rank);

        summary.total_employees += 1;
        if changed {
            summary.changed_employees += 1;
        } else {
            summary.unchanged_employees += 1;
        }
        match rank_movement {
            RankMovement::Up => summary.rank_up_count += 1,
            RankMovement::Down => summary.rank_down_count += 1,
            RankMovement::Unchanged => {}
        }
        if after_item.promotion_status.is_promotion()
            && !before_item.promotion_status.is_promotion()
        {
            summary.promote_count += 1;
        }
        if after_item.promotion_status.is_demotion() && !before_item.promotion_status.is_demotion()
        {
            summary.demote_count += 1;
        }

        diffs.push(ResultDiff {
            employee_id: after_item.employee_id.clone(),
            before_rank: before_item.rank,
            after_rank: after_item.rank,
            before_total_score: before_item.total_score,
            after_total_score: after_item.total_score,
            before_promotion_status: before_item.promotion_status,
            after_promotion_status: after_item.promotion_status,
            rank_change,
            promotion_change,
            rank_movement,
            changed,
        });
    }

    ResultDiffReport { diffs, summary }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionRuleChange {
    pub previous_rank: RankCode,
    pub next_rank: RankCode,
    pub before_level: i32,
    pub after_level: i32,
}

fn effective_level(rules: &[PromotionRule], previous: RankCode, next: RankCode) -> i32 {
    rules
        .iter()
        .find(|r| r.current_rank == previous && r.next_rank == next)
        .map(|r| r.promotion_level)
        .unwrap_or(0)
}

/// Every (previous, next) pair whose effective level differs between the
/// two matrices. Unmatched pairs count as level 0.
pub fn diff_promotion_rules(
    current: &[PromotionRule],
    draft: &[PromotionRule],
) -> Vec<PromotionRuleChange> {
    let mut changes = Vec::new();
    for previous_rank in RankCode::ALL {
        for next_rank in RankCode::ALL {
            let before_level = effective_level(current, previous_rank, next_rank);
            let after_level = effective_level(draft, previous_rank, next_rank);
            if before_level != after_level {
                changes.push(PromotionRuleChange {
                    previous_rank,
                    next_rank,
                    before_level,
                    after_level,
                });
            }
        }
    }
    changes
}
