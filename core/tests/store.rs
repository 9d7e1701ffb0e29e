//! Record store tests.
//!
//! Tests cover: SQLite round trip and upsert, per-period keys, missing
//! sets, change log order, the JSON directory store.

mod common;

use perfeval_core::{
    audit::{Actor, RuleChangeAction, RuleChangeLog},
    config::AppSettings,
    diff::ImpactSummary,
    error::EvalError,
    rules::RuleType,
    score::{QuantitativeScoreRecord, ScoreSet},
    store::{JsonDirStore, RecordSet, RecordStore, SqliteStore},
};
use serde_json::json;
use std::path::PathBuf;

fn sqlite() -> SqliteStore {
    let store = SqliteStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("perfeval-{name}-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn log_entry(rule_type: RuleType, reason: &str) -> RuleChangeLog {
    RuleChangeLog::new(
        &Actor {
            actor_id: "hr-01".to_string(),
            actor_name: "HR Admin".to_string(),
        },
        rule_type,
        RuleChangeAction::Apply,
        reason,
        json!({ "before": 1 }),
        json!({ "after": 2 }),
        ImpactSummary::default(),
    )
}

fn score_set(period: &str, score: f64) -> ScoreSet<QuantitativeScoreRecord> {
    ScoreSet {
        period: period.to_string(),
        items: vec![common::metric("e1", "sales", score, 1.0)],
    }
}

/// Writing a set twice upserts a single row.
#[test]
fn sqlite_round_trip_and_upsert() {
    let store = sqlite();
    let mut settings = AppSettings::default();
    store
        .write_record_set(RecordSet::AppSettings, None, &settings)
        .expect("write");

    settings.default_period = "2026_H1".to_string();
    store
        .write_record_set(RecordSet::AppSettings, None, &settings)
        .expect("overwrite");

    let read: AppSettings = store
        .read_record_set(RecordSet::AppSettings, None)
        .expect("read");
    assert_eq!(read, settings);
    assert_eq!(store.record_set_count(RecordSet::AppSettings).expect("count"), 1);
}

/// Per-period sets are stored and listed per period.
#[test]
fn periodic_sets_are_keyed_by_period() {
    let store = sqlite();
    for (period, score) in [("2025_H1", 60.0), ("2025_H2", 80.0)] {
        store
            .write_record_set(RecordSet::QuantitativeScores, Some(period), &score_set(period, score))
            .expect("write");
    }

    let h1: ScoreSet<QuantitativeScoreRecord> = store
        .read_record_set(RecordSet::QuantitativeScores, Some("2025_H1"))
        .expect("read h1");
    assert_eq!(h1.items[0].score, 60.0);
    assert_eq!(
        store.periods(RecordSet::QuantitativeScores).expect("periods"),
        vec!["2025_H1".to_string(), "2025_H2".to_string()]
    );
}

/// Per-period sets need a period; file names follow `<name>_<period>.json`.
#[test]
fn periodic_set_without_period_is_rejected() {
    let store = sqlite();
    let err = store
        .write_record_set(RecordSet::EvaluationResults, None, &json!({}))
        .expect_err("no period");
    assert!(matches!(err, EvalError::MissingPeriod { .. }));
    assert_eq!(
        RecordSet::QualitativeScores.file_name(Some("2025_H2")).expect("name"),
        "qualitative_scores_2025_H2.json"
    );
    assert_eq!(RecordSet::Employees.file_name(None).expect("name"), "employees.json");
}

/// Periods containing path separators or other unsafe bytes are escaped
/// into one file name, and both stores accept the same key.
#[test]
fn period_keys_with_separators_are_escaped() {
    assert_eq!(
        RecordSet::Ranking.file_name(Some("2025/H2")).expect("name"),
        "ranking_2025%2FH2.json"
    );
    assert_eq!(
        RecordSet::Ranking.file_name(Some("..\\x%y")).expect("name"),
        "ranking_..%5Cx%25y.json"
    );
    assert_ne!(
        RecordSet::Ranking.file_name(Some("2025/H2")).expect("name"),
        RecordSet::Ranking.file_name(Some("2025%2FH2")).expect("name")
    );

    let dir = temp_dir("json-escaped-period");
    let json = JsonDirStore::new(dir.clone());
    json.write_record_set(RecordSet::QuantitativeScores, Some("2025/H2"), &score_set("2025/H2", 64.0))
        .expect("json write");
    assert!(dir.join("quantitative_scores_2025%2FH2.json").exists());
    let read: ScoreSet<QuantitativeScoreRecord> = json
        .read_record_set(RecordSet::QuantitativeScores, Some("2025/H2"))
        .expect("json read");
    assert_eq!(read.period, "2025/H2");

    let db = sqlite();
    db.write_record_set(RecordSet::QuantitativeScores, Some("2025/H2"), &score_set("2025/H2", 64.0))
        .expect("sqlite write");
    assert_eq!(db.periods(RecordSet::QuantitativeScores).expect("periods"), vec!["2025/H2"]);

    let _ = std::fs::remove_dir_all(&dir);
}

/// Missing sets are errors on read and `None` on try-read.
#[test]
fn missing_set_is_not_found() {
    let store = sqlite();
    let err = store
        .read_record_set::<AppSettings>(RecordSet::AppSettings, None)
        .expect_err("missing");
    assert!(matches!(err, EvalError::RecordSetNotFound { .. }));

    let none: Option<AppSettings> = store
        .try_read_record_set(RecordSet::AppSettings, None)
        .expect("try read");
    assert!(none.is_none());
}

/// SQLite change logs come back newest first.
#[test]
fn sqlite_change_logs_newest_first() {
    let store = sqlite();
    store.append_rule_change_log(&log_entry(RuleType::Rank, "first")).expect("append");
    store.append_rule_change_log(&log_entry(RuleType::Promotion, "second")).expect("append");
    store.append_rule_change_log(&log_entry(RuleType::Rank, "third")).expect("append");

    let logs = store.rule_change_logs().expect("logs");
    let reasons: Vec<&str> = logs.items.iter().map(|l| l.reason.as_str()).collect();
    assert_eq!(reasons, vec!["third", "second", "first"]);
    assert_eq!(logs.latest().expect("latest").reason, "third");
    assert!(logs.items.iter().all(|l| l.applied));
    assert_eq!(store.rule_change_log_count(RuleType::Rank).expect("count"), 2);
}

/// The JSON directory store writes one file per set and period.
#[test]
fn json_dir_round_trip() {
    let dir = temp_dir("json-round-trip");
    let store = JsonDirStore::new(dir.clone());

    store
        .write_record_set(RecordSet::QuantitativeScores, Some("2025_H2"), &score_set("2025_H2", 72.0))
        .expect("write");
    assert!(dir.join("quantitative_scores_2025_H2.json").exists());

    let read: ScoreSet<QuantitativeScoreRecord> = store
        .read_record_set(RecordSet::QuantitativeScores, Some("2025_H2"))
        .expect("read");
    assert_eq!(read.items[0].score, 72.0);

    let missing: Option<ScoreSet<QuantitativeScoreRecord>> = store
        .try_read_record_set(RecordSet::QuantitativeScores, Some("2024_H1"))
        .expect("try read");
    assert!(missing.is_none());

    let _ = std::fs::remove_dir_all(&dir);
}

/// JSON directory change logs come back newest first.
#[test]
fn json_dir_change_logs_newest_first() {
    let dir = temp_dir("json-logs");
    let store = JsonDirStore::new(dir.clone());
    assert!(store.rule_change_logs().expect("empty logs").items.is_empty());

    store.append_rule_change_log(&log_entry(RuleType::Qualitative, "older")).expect("append");
    store.append_rule_change_log(&log_entry(RuleType::Qualitative, "newer")).expect("append");

    let logs = store.rule_change_logs().expect("logs");
    assert_eq!(logs.items.len(), 2);
    assert_eq!(logs.items[0].reason, "newer");
    assert_eq!(logs.items[1].reason, "older");

    let _ = std::fs::remove_dir_all(&dir);
}
