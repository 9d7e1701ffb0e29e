//! Store methods for the rule change log.

use crate::{audit::RuleChangeLog, error::EvalResult, rules::RuleType};
use rusqlite::params;

use super::SqliteStore;

impl SqliteStore {
    /// Append one log entry. Entries are never updated or deleted.
    pub fn insert_rule_change_log(&self, log: &RuleChangeLog) -> EvalResult<()> {
        let payload = serde_json::to_string(log)?;
        self.conn.execute(
            "INSERT INTO rule_change_log (log_id, timestamp, rule_type, action, payload)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                log.log_id.to_string(),
                log.timestamp.to_rfc3339(),
                log.rule_type.as_str(),
                log.action.as_str(),
                payload,
            ],
        )?;
        Ok(())
    }

    pub fn rule_change_logs_newest_first(&self) -> EvalResult<Vec<RuleChangeLog>> {
        let mut stmt = self
            .conn
            .prepare("SELECT payload FROM rule_change_log ORDER BY seq DESC")?;
        let payloads = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        payloads
            .iter()
            .map(|p| serde_json::from_str(p).map_err(Into::into))
            .collect()
    }

    // ── Test / summary helpers ────────────────────────────────────────

    /// Number of change logs recorded for a rule type (for tests).
    pub fn rule_change_log_count(&self, rule_type: RuleType) -> EvalResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM rule_change_log WHERE rule_type = ?1",
            params![rule_type.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
