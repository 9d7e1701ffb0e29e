//! The evaluation engine: the I/O shell around the pure core.
//!
//! EXECUTION ORDER (every operation):
//!   1. Load record sets from the injected store
//!   2. Run the pure core (recalculate / rank / simulate)
//!   3. Persist outputs (recalculate, adopt only)
//!
//! RULES:
//!   - The store is passed in explicitly; nothing below engine.rs sees it.
//!   - Missing score sets mean "no data for this period": empty inputs.
//!   - Missing rule tables or roster are caller errors and fail loudly.

use crate::{
    audit::{Actor, RuleChangeAction, RuleChangeLog, RuleChangeLogs},
    config::{AppSettings, RuleBook},
    diff::{diff_promotion_rules, PromotionRuleChange},
    employee::{Employee, EmployeesData},
    error::EvalResult,
    ranking::{build_rankings, build_score_board, RankingData, ScoreBoard},
    recalculate::{recalculate_all, PromotionBasis, RecalculationInput, RecalculationOutput},
    result::EvaluationResults,
    rules::{PromotionRule, PromotionRulesData, QualitativeCategoriesData, RankRulesData, RuleType},
    score::{QualitativeScoreRecord, QuantitativeScoreRecord, ScoreSet},
    simulation::{simulate_rule_change, DraftRules, RuleOverride, SimulationInput, SimulationOutcome},
    store::{RecordSet, RecordStore},
    types::{EmployeeId, PeriodId, RankCode},
};
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Everything one period's recalculation reads besides the rules.
#[derive(Debug, Clone, Default)]
pub struct PeriodInputs {
    pub employees: Vec<Employee>,
    pub qualitative_scores: Vec<QualitativeScoreRecord>,
    pub quantitative_scores: Vec<QuantitativeScoreRecord>,
}

pub struct EvalEngine<S: RecordStore> {
    store: S,
    pub settings: AppSettings,
}

impl<S: RecordStore> EvalEngine<S> {
    /// Build an engine, reading app settings from the store.
    /// Falls back to defaults when the store has none.
    pub fn new(store: S) -> EvalResult<Self> {
        let settings = match store.try_read_record_set(RecordSet::AppSettings, None)? {
            Some(settings) => settings,
            None => {
                log::warn!("no app_settings record set; using defaults");
                AppSettings::default()
            }
        };
        Ok(Self { store, settings })
    }

    pub fn with_settings(store: S, settings: AppSettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The given period, or the configured default.
    pub fn resolve_period(&self, period: Option<&str>) -> PeriodId {
        period
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(&self.settings.default_period)
            .to_string()
    }

    // ── Loading ────────────────────────────────────────────────────────

    pub fn load_rule_book(&self) -> EvalResult<RuleBook> {
        let rank: RankRulesData = self.store.read_record_set(RecordSet::RankRules, None)?;
        let promotion: PromotionRulesData =
            self.store.read_record_set(RecordSet::PromotionRules, None)?;
        let categories: QualitativeCategoriesData =
            self.store.read_record_set(RecordSet::QualitativeCategories, None)?;

        Ok(RuleBook {
            rank_rules: rank.rules(),
            promotion_rules: promotion.rules,
            categories: categories.categories(),
            salary_adjustment: promotion.salary_adjustment,
        })
    }

    /// Write a complete rule book as version 1 of each table.
    pub fn save_rule_book(&self, book: &RuleBook) -> EvalResult<()> {
        let now = Utc::now();
        self.store.write_record_set(
            RecordSet::RankRules,
            None,
            &RankRulesData {
                version: 1,
                updated_at: now,
                cross_matrix: book.rank_rules.cross_matrix.clone(),
                thresholds: book.rank_rules.thresholds.clone(),
                description: None,
            },
        )?;
        self.store.write_record_set(
            RecordSet::PromotionRules,
            None,
            &PromotionRulesData {
                version: 1,
                updated_at: now,
                rules: book.promotion_rules.clone(),
                descriptions: Vec::new(),
                salary_adjustment: book.salary_adjustment,
            },
        )?;
        self.store.write_record_set(
            RecordSet::QualitativeCategories,
            None,
            &QualitativeCategoriesData {
                version: 1,
                updated_at: now,
                manager_categories: book.categories.manager_categories.clone(),
                staff_categories: book.categories.staff_categories.clone(),
            },
        )
    }

    pub fn load_period_inputs(&self, period: &str) -> EvalResult<PeriodInputs> {
        let employees: EmployeesData = self.store.read_record_set(RecordSet::Employees, None)?;

        let qualitative: Option<ScoreSet<QualitativeScoreRecord>> = self
            .store
            .try_read_record_set(RecordSet::QualitativeScores, Some(period))?;
        let quantitative: Option<ScoreSet<QuantitativeScoreRecord>> = self
            .store
            .try_read_record_set(RecordSet::QuantitativeScores, Some(period))?;

        if qualitative.is_none() && quantitative.is_none() {
            log::warn!("period={period} has no score data; every employee scores 0");
        }

        Ok(PeriodInputs {
            employees: employees.items,
            qualitative_scores: qualitative.map(|s| s.items).unwrap_or_default(),
            quantitative_scores: quantitative.map(|s| s.items).unwrap_or_default(),
        })
    }

    /// Final ranks of a stored period. Empty if that period has no results.
    pub fn previous_ranks(&self, previous_period: &str) -> EvalResult<HashMap<EmployeeId, RankCode>> {
        let results: Option<EvaluationResults> = self
            .store
            .try_read_record_set(RecordSet::EvaluationResults, Some(previous_period))?;
        Ok(match results {
            Some(results) => results.final_ranks(),
            None => {
                log::warn!("previous period={previous_period} has no results; no history applied");
                HashMap::new()
            }
        })
    }

    // ── Operations ─────────────────────────────────────────────────────

    /// Recalculate one period and persist its results and ranking.
    ///
    /// Naming `previous_period` switches promotion judgement from the
    /// rank heuristic to the promotion matrix.
    pub fn recalculate(
        &self,
        period: Option<&str>,
        previous_period: Option<&str>,
    ) -> EvalResult<RecalculationOutput> {
        let period = self.resolve_period(period);
        let rules = self.load_rule_book()?;
        let inputs = self.load_period_inputs(&period)?;
        let previous = match previous_period {
            Some(p) => Some(self.previous_ranks(p)?),
            None => None,
        };

        let output = recalculate_all(&RecalculationInput {
            employees: &inputs.employees,
            qualitative_scores: &inputs.qualitative_scores,
            quantitative_scores: &inputs.quantitative_scores,
            rules: &rules,
            period: &period,
            settings: &self.settings,
            promotion_basis: basis(previous.as_ref()),
        })?;

        self.store.write_record_set(
            RecordSet::EvaluationResults,
            Some(&period),
            &output.evaluation_results,
        )?;
        self.store
            .write_record_set(RecordSet::Ranking, Some(&period), &output.ranking)?;

        log::info!(
            "period={period} recalculated: {} result(s)",
            output.evaluation_results.items.len()
        );
        Ok(output)
    }

    pub fn results(&self, period: Option<&str>) -> EvalResult<EvaluationResults> {
        let period = self.resolve_period(period);
        self.store
            .read_record_set(RecordSet::EvaluationResults, Some(&period))
    }

    /// Competition ("1224") rankings over the stored results.
    pub fn rankings(&self, period: Option<&str>) -> EvalResult<RankingData> {
        let results = self.results(period)?;
        Ok(build_rankings(
            &results.items,
            &results.period,
            &self.settings.tie_break_order,
        ))
    }

    pub fn score_board(&self, period: Option<&str>) -> EvalResult<ScoreBoard> {
        let results = self.results(period)?;
        Ok(build_score_board(
            &results.items,
            &results.period,
            &self.settings.tie_break_order,
        ))
    }

    /// Dry-run a draft for one rule type. Persists nothing.
    pub fn simulate(
        &self,
        rule_type: RuleType,
        drafts: DraftRules,
        period: Option<&str>,
        previous_period: Option<&str>,
    ) -> EvalResult<SimulationOutcome> {
        let rule_override = RuleOverride::select(rule_type, drafts)?;
        let current = self.load_rule_book()?;
        self.simulate_override(&current, &rule_override, period, previous_period)
    }

    /// Per-pair level changes a promotion draft would make.
    pub fn promotion_rule_changes(
        &self,
        draft: &[PromotionRule],
    ) -> EvalResult<Vec<PromotionRuleChange>> {
        let current = self.load_rule_book()?;
        Ok(diff_promotion_rules(&current.promotion_rules, draft))
    }

    /// Adopt a draft: simulate it for the impact summary, then commit the
    /// draft table(s) together with an `apply` change log.
    pub fn adopt(
        &self,
        rule_type: RuleType,
        drafts: DraftRules,
        actor: &Actor,
        reason: &str,
        period: Option<&str>,
        previous_period: Option<&str>,
    ) -> EvalResult<RuleChangeLog> {
        let rule_override = RuleOverride::select(rule_type, drafts)?;
        let current = self.load_rule_book()?;
        let outcome = self.simulate_override(&current, &rule_override, period, previous_period)?;

        let adopted = rule_override.apply_to(&current);
        let before_snapshot = snapshot(&current, rule_type)?;
        let after_snapshot = snapshot(&adopted, rule_type)?;

        let log = RuleChangeLog::new(
            actor,
            rule_type,
            RuleChangeAction::Apply,
            reason,
            before_snapshot,
            after_snapshot,
            outcome.summary,
        );
        self.write_adopted(&rule_override, &log)?;

        log::info!(
            "{} rules adopted by {}: {} employee(s) affected",
            rule_type,
            actor.actor_id,
            outcome.summary.changed_employees
        );
        Ok(log)
    }

    pub fn rule_change_logs(&self) -> EvalResult<RuleChangeLogs> {
        self.store.rule_change_logs()
    }

    fn simulate_override(
        &self,
        current: &RuleBook,
        rule_override: &RuleOverride,
        period: Option<&str>,
        previous_period: Option<&str>,
    ) -> EvalResult<SimulationOutcome> {
        let period = self.resolve_period(period);
        let inputs = self.load_period_inputs(&period)?;
        let previous = match previous_period {
            Some(p) => Some(self.previous_ranks(p)?),
            None => None,
        };

        simulate_rule_change(
            &SimulationInput {
                employees: &inputs.employees,
                qualitative_scores: &inputs.qualitative_scores,
                quantitative_scores: &inputs.quantitative_scores,
                current,
                period: &period,
                settings: &self.settings,
                promotion_basis: basis(previous.as_ref()),
            },
            rule_override,
        )
    }

    fn write_adopted(&self, rule_override: &RuleOverride, log: &RuleChangeLog) -> EvalResult<()> {
        let now = Utc::now();
        match rule_override {
            RuleOverride::Rank(rules) => {
                let mut data: RankRulesData =
                    self.store.read_record_set(RecordSet::RankRules, None)?;
                data.cross_matrix = rules.cross_matrix.clone();
                data.thresholds = rules.thresholds.clone();
                data.version += 1;
                data.updated_at = now;
                self.store.commit_rule_change(RecordSet::RankRules, &data, log)
            }
            RuleOverride::Promotion(rules) => {
                let mut data: PromotionRulesData =
                    self.store.read_record_set(RecordSet::PromotionRules, None)?;
                data.rules = rules.clone();
                data.version += 1;
                data.updated_at = now;
                self.store
                    .commit_rule_change(RecordSet::PromotionRules, &data, log)
            }
            RuleOverride::Qualitative { manager, staff } => {
                let mut data: QualitativeCategoriesData = self
                    .store
                    .read_record_set(RecordSet::QualitativeCategories, None)?;
                if let Some(manager) = manager {
                    data.manager_categories = manager.clone();
                }
                if let Some(staff) = staff {
                    data.staff_categories = staff.clone();
                }
                data.version += 1;
                data.updated_at = now;
                self.store
                    .commit_rule_change(RecordSet::QualitativeCategories, &data, log)
            }
        }
    }
}

fn basis(previous: Option<&HashMap<EmployeeId, RankCode>>) -> PromotionBasis<'_> {
    match previous {
        Some(previous_ranks) => PromotionBasis::PeriodTransition { previous_ranks },
        None => PromotionBasis::RankHeuristic,
    }
}

/// The slice of a rule book one rule type governs, keyed by its name.
fn snapshot(book: &RuleBook, rule_type: RuleType) -> EvalResult<Value> {
    let (key, value) = match rule_type {
        RuleType::Rank => ("rankRules", serde_json::to_value(&book.rank_rules)?),
        RuleType::Promotion => ("promotionRules", serde_json::to_value(&book.promotion_rules)?),
        RuleType::Qualitative => ("categories", serde_json::to_value(&book.categories)?),
        RuleType::Bonus => ("salaryAdjustment", serde_json::to_value(book.salary_adjustment)?),
    };
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Ok(Value::Object(map))
}
