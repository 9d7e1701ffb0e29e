//! Rule-change simulation and diff tests.
//!
//! Tests cover: identical drafts, single-axis isolation, rank and
//! qualitative drafts, impact summary counts, draft selection errors,
//! promotion matrix diff.

mod common;

use common::{scenario, Scenario, PERIOD};
use perfeval_core::{
    diff::{diff_promotion_rules, diff_results, RankMovement},
    error::EvalError,
    promotion::PromotionStatus,
    recalculate::PromotionBasis,
    rules::{RankThreshold, RuleType},
    simulation::{simulate_rule_change, DraftRules, RuleOverride, SimulationInput, SimulationOutcome},
    types::RankCode,
};
use std::collections::HashMap;

fn simulate(s: &Scenario, rule_type: RuleType, drafts: DraftRules) -> SimulationOutcome {
    simulate_with(s, rule_type, drafts, PromotionBasis::RankHeuristic)
}

fn simulate_with(
    s: &Scenario,
    rule_type: RuleType,
    drafts: DraftRules,
    promotion_basis: PromotionBasis<'_>,
) -> SimulationOutcome {
    let rule_override = RuleOverride::select(rule_type, drafts).expect("select draft");
    simulate_rule_change(
        &SimulationInput {
            employees: &s.employees,
            qualitative_scores: &s.qualitative,
            quantitative_scores: &s.quantitative,
            current: &s.rules,
            period: PERIOD,
            settings: &s.settings,
            promotion_basis,
        },
        &rule_override,
    )
    .expect("simulate")
}

fn stricter_quantitative(s: &Scenario) -> DraftRules {
    let mut rank_rules = s.rules.rank_rules.clone();
    rank_rules.thresholds.quantitative = RankCode::ALL
        .iter()
        .zip([100.0, 96.0, 90.0, 85.0, 70.0, 0.0])
        .map(|(&rank, min_score)| RankThreshold { rank, min_score })
        .collect();
    DraftRules {
        draft_rank_rules: Some(rank_rules),
        ..DraftRules::default()
    }
}

/// A draft equal to the current rules reports no changes.
#[test]
fn identical_draft_changes_nothing() {
    let s = scenario();
    let drafts = DraftRules {
        draft_rank_rules: Some(s.rules.rank_rules.clone()),
        ..DraftRules::default()
    };
    let outcome = simulate(&s, RuleType::Rank, drafts);

    assert_eq!(outcome.summary.total_employees, 3);
    assert_eq!(outcome.summary.changed_employees, 0);
    assert_eq!(outcome.summary.unchanged_employees, 3);
    assert!(outcome.diffs.iter().all(|d| !d.changed));
    assert_eq!(outcome.before_results, outcome.after_results);
}

/// Raised quantitative thresholds lower every final rank; nobody newly
/// enters a promotion or demotion status.
#[test]
fn stricter_thresholds_move_ranks_down() {
    let s = scenario();
    let outcome = simulate(&s, RuleType::Rank, stricter_quantitative(&s));
    let summary = outcome.summary;

    assert_eq!(outcome.rule_type, RuleType::Rank);
    assert_eq!(summary.total_employees, 3);
    assert_eq!(summary.changed_employees, 3);
    assert_eq!(summary.rank_down_count, 3);
    assert_eq!(summary.rank_up_count, 0);
    assert_eq!(summary.promote_count, 0);
    // s1 was already a demotion candidate; a1 drops only to keep.
    assert_eq!(summary.demote_count, 0);

    let a1 = outcome.diffs.iter().find(|d| d.employee_id == "a1").expect("a1");
    assert_eq!((a1.before_rank, a1.after_rank), (RankCode::A, RankCode::B));
    assert_eq!(a1.rank_movement, RankMovement::Down);
    assert_eq!(a1.before_promotion_status, PromotionStatus::Promote1);
    assert_eq!(a1.after_promotion_status, PromotionStatus::Keep);
    assert!(a1.promotion_change);

    let m1 = outcome.diffs.iter().find(|d| d.employee_id == "m1").expect("m1");
    assert_eq!((m1.before_rank, m1.after_rank), (RankCode::S, RankCode::A));
    assert!(m1.rank_change);
    assert!(!m1.promotion_change);
}

/// Drafts for other rule types are ignored.
#[test]
fn only_the_selected_draft_is_applied() {
    let s = scenario();
    // A drastic rank draft rides along but promotion is the selected axis.
    let mut drafts = stricter_quantitative(&s);
    drafts.draft_promotion_rules = Some(Vec::new());

    let outcome = simulate(&s, RuleType::Promotion, drafts);
    assert_eq!(outcome.rule_type, RuleType::Promotion);
    assert_eq!(outcome.summary.changed_employees, 0);
    assert!(outcome.diffs.iter().all(|d| d.before_rank == d.after_rank));
}

/// Under the transition basis, a rank simulation keeps the current
/// promotion matrix.
#[test]
fn rank_selection_ignores_promotion_draft() {
    let s = scenario();
    let previous: HashMap<String, RankCode> = s
        .employees
        .iter()
        .map(|e| (e.employee_id.clone(), RankCode::B))
        .collect();
    // Applying the empty promotion matrix would turn every transition into keep.
    let drafts = DraftRules {
        draft_rank_rules: Some(s.rules.rank_rules.clone()),
        draft_promotion_rules: Some(Vec::new()),
        ..DraftRules::default()
    };

    let outcome = simulate_with(
        &s,
        RuleType::Rank,
        drafts,
        PromotionBasis::PeriodTransition { previous_ranks: &previous },
    );
    assert_eq!(outcome.summary.changed_employees, 0);
    let m1 = outcome.after_results.iter().find(|r| r.employee_id == "m1").expect("m1");
    assert_eq!(m1.promotion_status, PromotionStatus::Promote2);
}

/// Disabling manager categories changes manager-sheet employees only.
#[test]
fn qualitative_draft_touches_only_its_sheet() {
    let s = scenario();
    let mut manager = s.rules.categories.manager_categories.clone();
    for category in manager.iter_mut().take(3) {
        category.enabled = false;
    }
    let drafts = DraftRules {
        draft_manager_categories: Some(manager),
        ..DraftRules::default()
    };

    let outcome = simulate(&s, RuleType::Qualitative, drafts);
    assert_eq!(outcome.summary.changed_employees, 2);
    assert_eq!(outcome.summary.unchanged_employees, 1);

    let s1 = outcome.diffs.iter().find(|d| d.employee_id == "s1").expect("s1");
    assert!(!s1.changed);
    let m1 = outcome.after_results.iter().find(|r| r.employee_id == "m1").expect("m1");
    assert_eq!(m1.qualitative_score, 30.0);
    assert_eq!(m1.detail.qualitative_breakdown.len(), 3);
}

/// The current rule book is not mutated by a simulation.
#[test]
fn simulation_leaves_current_rules_untouched() {
    let s = scenario();
    let before = s.rules.clone();
    let _ = simulate(&s, RuleType::Rank, stricter_quantitative(&s));
    assert_eq!(s.rules, before);
}

/// Draft selection fails for missing drafts, bonus and unknown types.
#[test]
fn select_rejects_missing_and_unsupported_drafts() {
    let err = RuleOverride::select(RuleType::Rank, DraftRules::default()).expect_err("missing");
    assert!(matches!(err, EvalError::MissingDraft { .. }));

    let err = RuleOverride::select(RuleType::Qualitative, DraftRules::default()).expect_err("missing");
    assert!(matches!(err, EvalError::MissingDraft { .. }));

    let err = RuleOverride::select(RuleType::Bonus, DraftRules::default()).expect_err("bonus");
    assert!(matches!(err, EvalError::UnsupportedRuleType { .. }));

    assert!("commission".parse::<RuleType>().is_err());
}

/// Drafts deserialize from camelCase JSON.
#[test]
fn drafts_parse_from_camel_case_json() {
    let drafts: DraftRules = serde_json::from_str(
        r#"{ "draftPromotionRules": [
               { "currentRank": "B", "nextRank": "A", "promotionLevel": 1 }
           ] }"#,
    )
    .expect("parse drafts");
    let rule_override = RuleOverride::select(RuleType::Promotion, drafts).expect("select");
    assert_eq!(rule_override.rule_type(), RuleType::Promotion);
}

/// Promote counts include only employees newly entering promotion.
#[test]
fn diff_counts_only_new_promotions() {
    let s = scenario();
    let outcome = simulate(&s, RuleType::Rank, stricter_quantitative(&s));

    // Reverse direction: after -> before.
    let report = diff_results(&outcome.after_results, &outcome.before_results);
    assert_eq!(report.summary.rank_up_count, 3);
    assert_eq!(report.summary.promote_count, 1);
    assert_eq!(report.summary.demote_count, 0);

    // Employees missing from one side are skipped.
    let report = diff_results(&outcome.before_results[..1], &outcome.after_results);
    assert_eq!(report.summary.total_employees, 1);
}

/// Changed and removed matrix pairs are listed with before/after levels.
#[test]
fn promotion_matrix_diff_lists_changed_pairs() {
    let s = scenario();
    let current = s.rules.promotion_rules.clone();
    assert!(diff_promotion_rules(&current, &current).is_empty());

    let mut draft = current.clone();
    let rule = draft
        .iter_mut()
        .find(|r| r.current_rank == RankCode::B && r.next_rank == RankCode::A)
        .expect("B->A rule");
    rule.promotion_level = 2;
    draft.retain(|r| !(r.current_rank == RankCode::E && r.next_rank == RankCode::D));

    let changes = diff_promotion_rules(&current, &draft);
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].previous_rank, RankCode::B);
    assert_eq!((changes[0].before_level, changes[0].after_level), (1, 2));
    assert_eq!(changes[1].previous_rank, RankCode::E);
    assert_eq!((changes[1].before_level, changes[1].after_level), (1, 0));
}
