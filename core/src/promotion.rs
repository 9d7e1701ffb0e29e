//! Promotion classification.
//!
//! Two policies, kept separate:
//!   - `judge_promotion`: two-period transition, looked up in the
//!     promotion matrix. Needs the previous period's rank.
//!   - `judge_promotion_by_rank`: absolute-level heuristic on this
//!     period's rank alone. Used when no history is available.
//!
//! The caller picks one explicitly (see `PromotionBasis` in recalculate.rs).

use crate::rules::{PromotionRule, SalaryAdjustment};
use crate::types::{RankCode, Role};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromotionStatus {
    #[serde(rename = "promote_2")]
    Promote2,
    #[serde(rename = "promote_1")]
    Promote1,
    /// Unlevelled promotion, present in older result sets.
    #[serde(rename = "promote")]
    Promote,
    #[serde(rename = "keep")]
    Keep,
    /// Unlevelled demotion, present in older result sets.
    #[serde(rename = "demote")]
    Demote,
    #[serde(rename = "demote_1")]
    Demote1,
    #[serde(rename = "demote_2")]
    Demote2,
}

impl PromotionStatus {
    /// ≥2 promote_2, 1 promote_1, 0 keep, -1 demote_1, ≤-2 demote_2.
    pub fn from_level(level: i32) -> Self {
        match level {
            l if l >= 2 => Self::Promote2,
            1 => Self::Promote1,
            0 => Self::Keep,
            -1 => Self::Demote1,
            _ => Self::Demote2,
        }
    }

    pub fn is_promotion(self) -> bool {
        matches!(self, Self::Promote | Self::Promote1 | Self::Promote2)
    }

    pub fn is_demotion(self) -> bool {
        matches!(self, Self::Demote | Self::Demote1 | Self::Demote2)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Promote2 => "promoted two levels",
            Self::Promote1 => "promoted one level",
            Self::Promote => "promoted",
            Self::Keep => "no change",
            Self::Demote => "demoted",
            Self::Demote1 => "demoted one level",
            Self::Demote2 => "demoted two levels",
        }
    }
}

impl fmt::Display for PromotionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionJudgement {
    pub status: PromotionStatus,
    pub level: i32,
    pub reason: String,
}

impl PromotionJudgement {
    fn keep(reason: &str) -> Self {
        Self {
            status: PromotionStatus::Keep,
            level: 0,
            reason: reason.to_string(),
        }
    }
}

pub const REASON_NO_PREVIOUS_DATA: &str = "no previous data";
pub const REASON_NO_APPLICABLE_RULE: &str = "no applicable rule";
pub const REASON_KEEP: &str = "no change";

/// Matrix judge over the (previous, current) rank transition.
///
/// Without a previous rank no decision can be made: the result is keep.
pub fn judge_promotion(
    current_rank: RankCode,
    previous_rank: Option<RankCode>,
    rules: &[PromotionRule],
    role: Role,
) -> PromotionJudgement {
    let Some(previous_rank) = previous_rank else {
        return PromotionJudgement::keep(REASON_NO_PREVIOUS_DATA);
    };

    let Some(rule) = rules
        .iter()
        .find(|r| r.current_rank == previous_rank && r.next_rank == current_rank)
    else {
        log::debug!("role={role} transition {previous_rank}->{current_rank}: no rule");
        return PromotionJudgement::keep(REASON_NO_APPLICABLE_RULE);
    };

    let level = rule.promotion_level;
    let reason = match level.signum() {
        1 => format!("{previous_rank}->{current_rank}: promoted {level} level(s)"),
        -1 => format!(
            "{previous_rank}->{current_rank}: demoted {} level(s)",
            level.abs()
        ),
        _ => REASON_KEEP.to_string(),
    };

    PromotionJudgement {
        status: PromotionStatus::from_level(level),
        level,
        reason,
    }
}

/// Absolute-level heuristic: S/A promotion candidate, C/D/E demotion
/// candidate, B keeps.
pub fn judge_promotion_by_rank(rank: RankCode, role: Role) -> PromotionJudgement {
    let judgement = match rank {
        RankCode::S | RankCode::A => PromotionJudgement {
            status: PromotionStatus::Promote1,
            level: 1,
            reason: format!("rank {rank}: promotion candidate"),
        },
        RankCode::C | RankCode::D | RankCode::E => PromotionJudgement {
            status: PromotionStatus::Demote1,
            level: -1,
            reason: format!("rank {rank}: demotion candidate"),
        },
        RankCode::B => PromotionJudgement::keep(REASON_KEEP),
    };
    log::trace!("role={role} rank={rank} -> {:?}", judgement.status);
    judgement
}

/// Salary adjustment for a final rank. Pure table selection.
///
/// Manager sheet: S/A take `manager.rank_a`, C/D/E take `manager.rank_c`.
/// Staff: S/A take `staff.rank_a`. Everything else is 0.
pub fn salary_adjustment(rank: RankCode, role: Role, table: &SalaryAdjustment) -> f64 {
    let top = matches!(rank, RankCode::S | RankCode::A);
    let low = matches!(rank, RankCode::C | RankCode::D | RankCode::E);
    match role {
        Role::Manager | Role::AssistantManager if top => table.manager.rank_a,
        Role::Manager | Role::AssistantManager if low => table.manager.rank_c,
        Role::Staff if top => table.staff.rank_a,
        _ => 0.0,
    }
}
