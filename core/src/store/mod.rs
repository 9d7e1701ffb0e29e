//! Record store: the data-store collaborator around the pure core.
//!
//! RULE: Only store/ talks to persistence.
//! The evaluation core never imports a store; the engine is handed one
//! explicitly and feeds plain records in and out.

use crate::{
    audit::{RuleChangeLog, RuleChangeLogs},
    error::{EvalError, EvalResult},
};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

mod change_log;
mod json_dir;

pub use json_dir::JsonDirStore;

/// Named record sets. Per-period sets are keyed by period as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordSet {
    Employees,
    Stores,
    RankRules,
    PromotionRules,
    QualitativeCategories,
    AppSettings,
    QualitativeScores,
    QuantitativeScores,
    EvaluationResults,
    Ranking,
}

impl RecordSet {
    pub fn name(self) -> &'static str {
        match self {
            Self::Employees => "employees",
            Self::Stores => "stores",
            Self::RankRules => "rank_rules",
            Self::PromotionRules => "promotion_rules",
            Self::QualitativeCategories => "qualitative_categories",
            Self::AppSettings => "app_settings",
            Self::QualitativeScores => "qualitative_scores",
            Self::QuantitativeScores => "quantitative_scores",
            Self::EvaluationResults => "evaluation_results",
            Self::Ranking => "ranking",
        }
    }

    pub fn is_periodic(self) -> bool {
        matches!(
            self,
            Self::QualitativeScores
                | Self::QuantitativeScores
                | Self::EvaluationResults
                | Self::Ranking
        )
    }

    /// The period component of the key: the given period for per-period
    /// sets, empty otherwise.
    pub fn period_key(self, period: Option<&str>) -> EvalResult<String> {
        if !self.is_periodic() {
            return Ok(String::new());
        }
        match period {
            Some(p) if !p.trim().is_empty() => Ok(p.to_string()),
            _ => Err(EvalError::MissingPeriod {
                record_set: self.name().to_string(),
            }),
        }
    }

    /// `employees.json`, `qualitative_scores_2025_H2.json`, ...
    ///
    /// Bytes of the period outside `[A-Za-z0-9_.-]` are written as `%XX`,
    /// so any period key maps to a single file in the data directory.
    pub fn file_name(self, period: Option<&str>) -> EvalResult<String> {
        let period = self.period_key(period)?;
        Ok(if period.is_empty() {
            format!("{}.json", self.name())
        } else {
            format!("{}_{}.json", self.name(), escape_period(&period))
        })
    }
}

fn escape_period(period: &str) -> String {
    let mut escaped = String::with_capacity(period.len());
    for byte in period.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.' => {
                escaped.push(byte as char)
            }
            _ => escaped.push_str(&format!("%{byte:02X}")),
        }
    }
    escaped
}

impl fmt::Display for RecordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read/write access to named record sets plus the append-only
/// rule change log.
pub trait RecordStore {
    fn read_record_set<T: DeserializeOwned>(
        &self,
        set: RecordSet,
        period: Option<&str>,
    ) -> EvalResult<T>;

    fn write_record_set<T: Serialize>(
        &self,
        set: RecordSet,
        period: Option<&str>,
        data: &T,
    ) -> EvalResult<()>;

    fn append_rule_change_log(&self, log: &RuleChangeLog) -> EvalResult<()>;

    /// All change logs, newest first.
    fn rule_change_logs(&self) -> EvalResult<RuleChangeLogs>;

    /// Write an adopted rule table together with its change log.
    /// The log is appended first: a failed log leaves the table untouched.
    fn commit_rule_change<T: Serialize>(
        &self,
        set: RecordSet,
        data: &T,
        log: &RuleChangeLog,
    ) -> EvalResult<()> {
        self.append_rule_change_log(log)?;
        self.write_record_set(set, None, data)
    }

    /// `read_record_set`, with "not found" mapped to `None`.
    fn try_read_record_set<T: DeserializeOwned>(
        &self,
        set: RecordSet,
        period: Option<&str>,
    ) -> EvalResult<Option<T>> {
        match self.read_record_set(set, period) {
            Ok(data) => Ok(Some(data)),
            Err(EvalError::RecordSetNotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

// ── SQLite ─────────────────────────────────────────────────────────

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> EvalResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; in-memory ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> EvalResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> EvalResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_record_sets.sql"))?;
        Ok(())
    }

    /// Number of stored payloads for a set, across all periods (for tests).
    pub fn record_set_count(&self, set: RecordSet) -> EvalResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM record_set WHERE name = ?1",
            params![set.name()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Periods with a stored payload for `set`, ascending.
    pub fn periods(&self, set: RecordSet) -> EvalResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT period FROM record_set
             WHERE name = ?1 AND period != ''
             ORDER BY period ASC",
        )?;
        let periods = stmt
            .query_map(params![set.name()], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(periods)
    }
}

impl RecordStore for SqliteStore {
    fn read_record_set<T: DeserializeOwned>(
        &self,
        set: RecordSet,
        period: Option<&str>,
    ) -> EvalResult<T> {
        let period_key = set.period_key(period)?;
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM record_set WHERE name = ?1 AND period = ?2",
                params![set.name(), period_key],
                |row| row.get(0),
            )
            .optional()?;

        let payload = payload.ok_or_else(|| EvalError::RecordSetNotFound {
            name: set.file_name(period).unwrap_or_else(|_| set.name().to_string()),
        })?;
        Ok(serde_json::from_str(&payload)?)
    }

    fn write_record_set<T: Serialize>(
        &self,
        set: RecordSet,
        period: Option<&str>,
        data: &T,
    ) -> EvalResult<()> {
        let period_key = set.period_key(period)?;
        let payload = serde_json::to_string(data)?;
        self.conn.execute(
            "INSERT INTO record_set (name, period, payload, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (name, period)
             DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
            params![set.name(), period_key, payload, Utc::now().to_rfc3339()],
        )?;
        log::debug!("stored record set {set} period='{period_key}'");
        Ok(())
    }

    fn append_rule_change_log(&self, log: &RuleChangeLog) -> EvalResult<()> {
        self.insert_rule_change_log(log)
    }

    fn rule_change_logs(&self) -> EvalResult<RuleChangeLogs> {
        Ok(RuleChangeLogs {
            items: self.rule_change_logs_newest_first()?,
        })
    }

    /// Table and log land in one transaction.
    fn commit_rule_change<T: Serialize>(
        &self,
        set: RecordSet,
        data: &T,
        log: &RuleChangeLog,
    ) -> EvalResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        self.write_record_set(set, None, data)?;
        self.insert_rule_change_log(log)?;
        tx.commit()?;
        Ok(())
    }
}
