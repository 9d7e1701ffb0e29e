//! Rule-change audit records. Append-only, newest first.
//!
//! The core only builds the record; a `RecordStore` persists it.

use crate::diff::ImpactSummary;
use crate::rules::RuleType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleChangeAction {
    Simulate,
    Apply,
    Discard,
    Rollback,
}

impl RuleChangeAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simulate => "simulate",
            Self::Apply => "apply",
            Self::Discard => "discard",
            Self::Rollback => "rollback",
        }
    }
}

/// Who made the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub actor_id: String,
    pub actor_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleChangeLog {
    pub log_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub actor_id: String,
    pub actor_name: String,
    pub rule_type: RuleType,
    pub action: RuleChangeAction,
    pub reason: String,
    pub before_snapshot: serde_json::Value,
    pub after_snapshot: serde_json::Value,
    pub impact_summary: ImpactSummary,
    pub applied: bool,
}

impl RuleChangeLog {
    pub fn new(
        actor: &Actor,
        rule_type: RuleType,
        action: RuleChangeAction,
        reason: &str,
        before_snapshot: serde_json::Value,
        after_snapshot: serde_json::Value,
        impact_summary: ImpactSummary,
    ) -> Self {
        Self {
            log_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor_id: actor.actor_id.clone(),
            actor_name: actor.actor_name.clone(),
            rule_type,
            action,
            reason: reason.to_string(),
            before_snapshot,
            after_snapshot,
            impact_summary,
            applied: action == RuleChangeAction::Apply,
        }
    }
}

/// `rule_change_logs` record set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleChangeLogs {
    pub items: Vec<RuleChangeLog>,
}

impl RuleChangeLogs {
    pub fn push_newest(&mut self, log: RuleChangeLog) {
        self.items.insert(0, log);
    }

    pub fn latest(&self) -> Option<&RuleChangeLog> {
        self.items.first()
    }
}
