//! Rank classification: threshold tables and the cross-matrix.

use crate::rules::{CrossMatrixEntry, RankThreshold};
use crate::types::RankCode;

/// Classify a score against a threshold table.
///
/// The highest threshold whose `min_score <= score` wins, so a score
/// exactly on a boundary takes the higher rank. Below every threshold the
/// lowest-scored threshold's rank applies; an empty table yields E.
pub fn judge_rank(score: f64, thresholds: &[RankThreshold]) -> RankCode {
    let mut sorted: Vec<&RankThreshold> = thresholds.iter().collect();
    sorted.sort_by(|a, b| b.min_score.total_cmp(&a.min_score));

    sorted
        .iter()
        .find(|t| t.min_score <= score)
        .or_else(|| sorted.last())
        .map(|t| t.rank)
        .unwrap_or(RankCode::WORST)
}

/// Combine the two partial ranks into the final rank.
///
/// A missing entry means the matrix is incomplete; the pair falls back
/// to E and the gap is logged.
pub fn judge_final_rank_by_cross_matrix(
    quantitative_rank: RankCode,
    qualitative_rank: RankCode,
    matrix: &[CrossMatrixEntry],
) -> RankCode {
    match matrix
        .iter()
        .find(|m| m.quantitative_rank == quantitative_rank && m.qualitative_rank == qualitative_rank)
    {
        Some(entry) => entry.final_rank,
        None => {
            log::warn!(
                "cross-matrix has no entry for ({quantitative_rank}, {qualitative_rank}); \
                 falling back to {}",
                RankCode::WORST
            );
            RankCode::WORST
        }
    }
}

/// Pairs absent from the matrix, in S..E order.
pub fn missing_cross_matrix_pairs(matrix: &[CrossMatrixEntry]) -> Vec<(RankCode, RankCode)> {
    let mut missing = Vec::new();
    for quantitative in RankCode::ALL {
        for qualitative in RankCode::ALL {
            let present = matrix
                .iter()
                .any(|m| m.quantitative_rank == quantitative && m.qualitative_rank == qualitative);
            if !present {
                missing.push((quantitative, qualitative));
            }
        }
    }
    missing
}

/// Positive when `a` is the better rank, negative when worse, 0 if equal.
pub fn compare_ranks(a: RankCode, b: RankCode) -> i32 {
    b.ordinal() as i32 - a.ordinal() as i32
}
