//! Rank classifier tests.
//!
//! Tests cover: threshold boundaries, unsorted tables, below-all and
//! empty tables, cross-matrix lookup and its E fallback.

mod common;

use perfeval_core::{
    config::RuleBook,
    rank::{compare_ranks, judge_final_rank_by_cross_matrix, judge_rank, missing_cross_matrix_pairs},
    rules::RankThreshold,
    types::RankCode,
};

fn quantitative_table() -> Vec<RankThreshold> {
    RuleBook::default_test().rank_rules.thresholds.quantitative
}

/// A score exactly on a threshold takes that threshold's rank.
#[test]
fn score_on_boundary_takes_higher_rank() {
    let table = quantitative_table();
    assert_eq!(judge_rank(90.0, &table), RankCode::S);
    assert_eq!(judge_rank(89.999, &table), RankCode::A);
    assert_eq!(judge_rank(75.0, &table), RankCode::A);
    assert_eq!(judge_rank(74.9, &table), RankCode::B);
    assert_eq!(judge_rank(0.0, &table), RankCode::E);
    assert_eq!(judge_rank(150.0, &table), RankCode::S);
}

/// A table with fewer than six ranks classifies on its own boundaries.
#[test]
fn four_rank_table_boundaries() {
    let table = vec![
        RankThreshold { rank: RankCode::S, min_score: 90.0 },
        RankThreshold { rank: RankCode::A, min_score: 75.0 },
        RankThreshold { rank: RankCode::B, min_score: 60.0 },
        RankThreshold { rank: RankCode::C, min_score: 0.0 },
    ];
    assert_eq!(judge_rank(90.0, &table), RankCode::S);
    assert_eq!(judge_rank(89.999, &table), RankCode::A);
    assert_eq!(judge_rank(12.0, &table), RankCode::C);
}

/// Threshold tables are sorted before lookup.
#[test]
fn threshold_order_does_not_matter() {
    let mut table = quantitative_table();
    table.reverse();
    assert_eq!(judge_rank(90.0, &table), RankCode::S);
    assert_eq!(judge_rank(61.0, &table), RankCode::B);
}

/// A score under every threshold falls to the lowest listed rank.
#[test]
fn below_every_threshold_takes_lowest_entry() {
    let table = vec![
        RankThreshold { rank: RankCode::S, min_score: 80.0 },
        RankThreshold { rank: RankCode::B, min_score: 50.0 },
        RankThreshold { rank: RankCode::D, min_score: 20.0 },
    ];
    assert_eq!(judge_rank(10.0, &table), RankCode::D);
    assert_eq!(judge_rank(-5.0, &table), RankCode::D);
}

/// An empty threshold table classifies everything as E.
#[test]
fn empty_table_yields_e() {
    assert_eq!(judge_rank(99.0, &[]), RankCode::E);
}

/// The default cross matrix covers all 36 pairs.
#[test]
fn default_cross_matrix_is_complete() {
    let matrix = RuleBook::default_test().rank_rules.cross_matrix;
    assert_eq!(matrix.len(), 36);
    assert!(missing_cross_matrix_pairs(&matrix).is_empty());

    assert_eq!(judge_final_rank_by_cross_matrix(RankCode::S, RankCode::S, &matrix), RankCode::S);
    assert_eq!(judge_final_rank_by_cross_matrix(RankCode::S, RankCode::E, &matrix), RankCode::B);
    assert_eq!(judge_final_rank_by_cross_matrix(RankCode::C, RankCode::C, &matrix), RankCode::C);
    assert_eq!(judge_final_rank_by_cross_matrix(RankCode::E, RankCode::E, &matrix), RankCode::E);
}

/// A pair absent from the cross matrix resolves to E and is reported missing.
#[test]
fn missing_pair_falls_back_to_e() {
    common::init_logging();
    let mut matrix = RuleBook::default_test().rank_rules.cross_matrix;
    matrix.retain(|m| !(m.quantitative_rank == RankCode::A && m.qualitative_rank == RankCode::A));

    assert_eq!(missing_cross_matrix_pairs(&matrix), vec![(RankCode::A, RankCode::A)]);
    assert_eq!(judge_final_rank_by_cross_matrix(RankCode::A, RankCode::A, &matrix), RankCode::E);
    assert_eq!(judge_final_rank_by_cross_matrix(RankCode::A, RankCode::B, &matrix), RankCode::A);
}

/// Rank comparison follows S > A > B > C > D > E.
#[test]
fn rank_comparison_uses_ordinals() {
    assert!(compare_ranks(RankCode::S, RankCode::E) > 0);
    assert!(compare_ranks(RankCode::D, RankCode::B) < 0);
    assert_eq!(compare_ranks(RankCode::C, RankCode::C), 0);
    assert!(RankCode::A.is_better_than(RankCode::B));
    assert_eq!("B".parse::<RankCode>(), Ok(RankCode::B));
    assert!("F".parse::<RankCode>().is_err());
}
