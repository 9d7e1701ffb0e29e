//! Ranking construction.
//!
//! Two position-assignment strategies coexist and must stay separate:
//!   - `CompetitionRanking` ("1224"): ties share a position and the next
//!     distinct score skips by the tie count. Used by the ranking API.
//!   - `SequentialRanking`: positions always step by one, ties keep input
//!     order. Used by the recalculation to fill overallRank / roleRank.

use crate::config::TieBreakKey;
use crate::result::EvaluationResultItem;
use crate::types::{EmployeeId, PeriodId, RankCode, Role, StoreId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub employee_id: EmployeeId,
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingData {
    pub period: PeriodId,
    pub overall: Vec<RankingEntry>,
    pub by_role: BTreeMap<Role, Vec<RankingEntry>>,
    pub by_store: BTreeMap<StoreId, Vec<RankingEntry>>,
}

/// Position of `items[index]` in the ranked order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub index: usize,
    pub position: u32,
}

/// A pluggable sort + position-assignment function.
pub trait RankingStrategy {
    fn name(&self) -> &'static str;

    /// Returns one placement per item, in ranked order.
    fn place(&self, items: &[&EvaluationResultItem]) -> Vec<Placement>;
}

/// Which score a ranking is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind {
    Total,
    Quantitative,
    Qualitative,
}

impl ScoreKind {
    pub fn score(self, item: &EvaluationResultItem) -> f64 {
        match self {
            Self::Total => item.total_score,
            Self::Quantitative => item.quantitative_score,
            Self::Qualitative => item.qualitative_score,
        }
    }
}

/// Descending score order. `-0.0` and `0.0` compare equal.
fn score_desc(a: f64, b: f64) -> Ordering {
    (b + 0.0).total_cmp(&(a + 0.0))
}

// ── Strict sequential ──────────────────────────────────────────────

/// Total score descending, ties left in input order, positions 1, 2, 3, ...
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialRanking;

impl RankingStrategy for SequentialRanking {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn place(&self, items: &[&EvaluationResultItem]) -> Vec<Placement> {
        let mut order: Vec<usize> = (0..items.len()).collect();
        // sort_by is stable: equal totals keep input order.
        order.sort_by(|&a, &b| score_desc(items[a].total_score, items[b].total_score));

        order
            .into_iter()
            .enumerate()
            .map(|(i, index)| Placement {
                index,
                position: i as u32 + 1,
            })
            .collect()
    }
}

// ── Competition ("1224") ───────────────────────────────────────────

/// Score descending, tie-break keys in order, employee id ascending last.
/// Equal scores share a position.
#[derive(Debug, Clone)]
pub struct CompetitionRanking {
    pub score: ScoreKind,
    pub tie_break: Vec<TieBreakKey>,
}

impl CompetitionRanking {
    pub fn new(score: ScoreKind, tie_break: &[TieBreakKey]) -> Self {
        Self {
            score,
            tie_break: tie_break.to_vec(),
        }
    }

    fn compare(&self, a: &EvaluationResultItem, b: &EvaluationResultItem) -> Ordering {
        let primary = score_desc(self.score.score(a), self.score.score(b));
        if primary != Ordering::Equal {
            return primary;
        }

        for key in &self.tie_break {
            let ord = match key {
                TieBreakKey::TotalScore if self.score == ScoreKind::Total => Ordering::Equal,
                TieBreakKey::TotalScore => score_desc(a.total_score, b.total_score),
                TieBreakKey::QuantitativeScore => {
                    score_desc(a.quantitative_score, b.quantitative_score)
                }
                TieBreakKey::QualitativeScore => {
                    score_desc(a.qualitative_score, b.qualitative_score)
                }
                TieBreakKey::EmployeeCode => a.employee_code.cmp(&b.employee_code),
                TieBreakKey::EmployeeId => a.employee_id.cmp(&b.employee_id),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }

        // Every result needs a stable unique slot.
        a.employee_id.cmp(&b.employee_id)
    }
}

impl RankingStrategy for CompetitionRanking {
    fn name(&self) -> &'static str {
        "competition"
    }

    fn place(&self, items: &[&EvaluationResultItem]) -> Vec<Placement> {
        let mut order: Vec<usize> = (0..items.len()).collect();
        order.sort_by(|&a, &b| self.compare(items[a], items[b]));

        let mut placements = Vec::with_capacity(order.len());
        let mut previous: Option<(f64, u32)> = None;
        for (i, index) in order.into_iter().enumerate() {
            let score = self.score.score(items[index]);
            let position = match previous {
                Some((prev_score, prev_position)) if prev_score == score => prev_position,
                _ => i as u32 + 1,
            };
            previous = Some((score, position));
            placements.push(Placement { index, position });
        }
        placements
    }
}

// ── Partitioned rankings ───────────────────────────────────────────

fn entries(items: &[&EvaluationResultItem], placements: &[Placement]) -> Vec<RankingEntry> {
    placements
        .iter()
        .map(|p| RankingEntry {
            employee_id: items[p.index].employee_id.clone(),
            position: p.position,
        })
        .collect()
}

fn ranked_entries(
    items: &[&EvaluationResultItem],
    strategy: &dyn RankingStrategy,
) -> Vec<RankingEntry> {
    entries(items, &strategy.place(items))
}

/// Overall, per-role and per-store rankings under one strategy.
///
/// Every role has a key, possibly empty. Stores get one partition each
/// for every store id present in `results`.
pub fn partition_rankings(
    results: &[EvaluationResultItem],
    period: &str,
    strategy: &dyn RankingStrategy,
) -> RankingData {
    let all: Vec<&EvaluationResultItem> = results.iter().collect();
    let overall = ranked_entries(&all, strategy);

    let by_role = Role::ALL
        .iter()
        .map(|&role| {
            let members: Vec<&EvaluationResultItem> =
                results.iter().filter(|r| r.role == role).collect();
            (role, ranked_entries(&members, strategy))
        })
        .collect();

    let mut stores: BTreeMap<StoreId, Vec<&EvaluationResultItem>> = BTreeMap::new();
    for item in results {
        stores.entry(item.store_id.clone()).or_default().push(item);
    }
    let by_store = stores
        .into_iter()
        .map(|(store_id, members)| (store_id, ranked_entries(&members, strategy)))
        .collect();

    log::debug!(
        "period={period} {} ranking over {} result(s)",
        strategy.name(),
        results.len()
    );

    RankingData {
        period: period.to_string(),
        overall,
        by_role,
        by_store,
    }
}

/// User-facing rankings: competition ("1224") positions on total score.
pub fn build_rankings(
    results: &[EvaluationResultItem],
    period: &str,
    tie_break_order: &[TieBreakKey],
) -> RankingData {
    let strategy = CompetitionRanking::new(ScoreKind::Total, tie_break_order);
    partition_rankings(results, period, &strategy)
}

// ── Score boards ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBoardEntry {
    pub employee_id: EmployeeId,
    pub employee_code: String,
    pub employee_name: String,
    pub role: Role,
    pub store_id: StoreId,
    pub score: f64,
    pub rank: RankCode,
    pub position: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KindRankings {
    pub total: Vec<ScoreBoardEntry>,
    pub quantitative: Vec<ScoreBoardEntry>,
    pub qualitative: Vec<ScoreBoardEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBoard {
    pub period: PeriodId,
    pub overall: KindRankings,
    pub by_role: BTreeMap<Role, KindRankings>,
}

fn board_for(
    items: &[&EvaluationResultItem],
    kind: ScoreKind,
    tie_break: &[TieBreakKey],
) -> Vec<ScoreBoardEntry> {
    CompetitionRanking::new(kind, tie_break)
        .place(items)
        .into_iter()
        .map(|p| {
            let item = items[p.index];
            ScoreBoardEntry {
                employee_id: item.employee_id.clone(),
                employee_code: item.employee_code.clone(),
                employee_name: item.employee_name.clone(),
                role: item.role,
                store_id: item.store_id.clone(),
                score: kind.score(item),
                rank: item.rank,
                position: p.position,
            }
        })
        .collect()
}

fn kind_rankings(items: &[&EvaluationResultItem], tie_break: &[TieBreakKey]) -> KindRankings {
    KindRankings {
        total: board_for(items, ScoreKind::Total, tie_break),
        quantitative: board_for(items, ScoreKind::Quantitative, tie_break),
        qualitative: board_for(items, ScoreKind::Qualitative, tie_break),
    }
}

/// Competition rankings per evaluation type, overall and per role.
pub fn build_score_board(
    results: &[EvaluationResultItem],
    period: &str,
    tie_break_order: &[TieBreakKey],
) -> ScoreBoard {
    let all: Vec<&EvaluationResultItem> = results.iter().collect();
    let by_role = Role::ALL
        .iter()
        .map(|&role| {
            let members: Vec<&EvaluationResultItem> =
                results.iter().filter(|r| r.role == role).collect();
            (role, kind_rankings(&members, tie_break_order))
        })
        .collect();

    ScoreBoard {
        period: period.to_string(),
        overall: kind_rankings(&all, tie_break_order),
        by_role,
    }
}
