//! Deterministic synthetic dataset: stores, roster and one period of
//! score sheets. Same seed, same dataset.
//!
//! Used by the runner's `seed` command and by tests that need a
//! realistic population.

use crate::{
    employee::{Employee, EmployeesData, Store, StoresData},
    error::EvalResult,
    rng::{DatasetRng, DatasetSlot, RngBank},
    rules::QualitativeCategories,
    score::{QualitativeScoreRecord, QuantitativeScoreRecord, ScoreSet},
    store::{RecordSet, RecordStore},
    types::Role,
};
use chrono::NaiveDate;

/// (metric id, metric name, weight)
const METRICS: [(&str, &str, f64); 3] = [
    ("sales", "Sales vs target", 0.5),
    ("gross_profit", "Gross profit vs target", 0.3),
    ("customer_count", "Customer count vs target", 0.2),
];

const AREAS: [&str; 3] = ["North", "Central", "South"];

#[derive(Debug, Clone, Copy)]
pub struct DatasetShape {
    pub store_count: usize,
    pub staff_per_store: usize,
    /// Probability an employee is inactive.
    pub inactive_rate: f64,
}

impl Default for DatasetShape {
    fn default() -> Self {
        Self {
            store_count: 4,
            staff_per_store: 5,
            inactive_rate: 0.05,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    pub period: String,
    pub stores: Vec<Store>,
    pub employees: Vec<Employee>,
    pub quantitative_scores: Vec<QuantitativeScoreRecord>,
    pub qualitative_scores: Vec<QualitativeScoreRecord>,
}

impl SyntheticDataset {
    /// Generate a dataset. Every store gets one manager, one assistant
    /// manager and `staff_per_store` staff.
    pub fn generate(
        seed: u64,
        period: &str,
        shape: DatasetShape,
        categories: &QualitativeCategories,
    ) -> Self {
        let bank = RngBank::new(seed);
        let mut roster_rng = bank.for_slot(DatasetSlot::Roster);
        let mut names_rng = bank.for_slot(DatasetSlot::Names);

        let mut stores = Vec::with_capacity(shape.store_count);
        let mut employees = Vec::new();

        for s in 0..shape.store_count {
            let store_id = format!("store-{:03}", s + 1);
            stores.push(Store {
                store_id: store_id.clone(),
                store_code: format!("S{:03}", s + 1),
                store_name: format!("{} {}", pick_str(&mut names_rng, FAMILY_NAMES), "Branch"),
                brand: None,
                area: AREAS[s % AREAS.len()].to_string(),
                active: true,
                display_order: s as u32 + 1,
            });

            let roles = [Role::Manager, Role::AssistantManager]
                .into_iter()
                .chain(std::iter::repeat(Role::Staff).take(shape.staff_per_store));

            for role in roles {
                let n = employees.len() + 1;
                let tenure = roster_rng.below(180) as u32 + 3;
                employees.push(Employee {
                    employee_id: format!("emp-{n:04}"),
                    employee_code: format!("E{n:04}"),
                    name: format!(
                        "{} {}",
                        pick_str(&mut names_rng, GIVEN_NAMES),
                        pick_str(&mut names_rng, FAMILY_NAMES)
                    ),
                    name_kana: None,
                    role,
                    store_id: store_id.clone(),
                    grade: None,
                    active: !roster_rng.chance(shape.inactive_rate),
                    joined_at: joined_at(tenure),
                    tenure: Some(tenure),
                    display_order: n as u32,
                });
            }
        }

        let quantitative_scores =
            quantitative_sheet(&mut bank.for_slot(DatasetSlot::Quantitative), &employees);
        let qualitative_scores = qualitative_sheet(
            &mut bank.for_slot(DatasetSlot::Qualitative),
            &employees,
            categories,
        );

        log::debug!(
            "synthetic dataset seed={seed}: {} store(s), {} employee(s)",
            stores.len(),
            employees.len()
        );

        Self {
            period: period.to_string(),
            stores,
            employees,
            quantitative_scores,
            qualitative_scores,
        }
    }

    /// Write master data and this period's score sheets.
    pub fn write_to(&self, store: &impl RecordStore) -> EvalResult<()> {
        store.write_record_set(
            RecordSet::Stores,
            None,
            &StoresData {
                version: 1,
                items: self.stores.clone(),
            },
        )?;
        store.write_record_set(
            RecordSet::Employees,
            None,
            &EmployeesData {
                version: 1,
                items: self.employees.clone(),
            },
        )?;
        store.write_record_set(
            RecordSet::QuantitativeScores,
            Some(&self.period),
            &ScoreSet {
                period: self.period.clone(),
                items: self.quantitative_scores.clone(),
            },
        )?;
        store.write_record_set(
            RecordSet::QualitativeScores,
            Some(&self.period),
            &ScoreSet {
                period: self.period.clone(),
                items: self.qualitative_scores.clone(),
            },
        )
    }
}

fn quantitative_sheet(rng: &mut DatasetRng, employees: &[Employee]) -> Vec<QuantitativeScoreRecord> {
    let mut records = Vec::with_capacity(employees.len() * METRICS.len());
    for employee in employees {
        // One performance level per employee keeps metrics correlated.
        let level = rng.between(0.55, 1.15);
        for (metric_id, metric_name, weight) in METRICS {
            let target_value = (rng.between(50.0, 150.0) * 10.0).round();
            let achievement = (level + rng.between(-0.1, 0.1)).max(0.0);
            let actual_value = (target_value * achievement).round();
            records.push(QuantitativeScoreRecord {
                employee_id: employee.employee_id.clone(),
                metric_id: metric_id.to_string(),
                metric_name: metric_name.to_string(),
                actual_value,
                target_value,
                score: (achievement * 100.0).clamp(0.0, 100.0).round(),
                weight,
            });
        }
    }
    records
}

fn qualitative_sheet(
    rng: &mut DatasetRng,
    employees: &[Employee],
    categories: &QualitativeCategories,
) -> Vec<QualitativeScoreRecord> {
    let mut records = Vec::new();
    for employee in employees {
        let evaluator_id = format!("eval-{}", employee.store_id);
        for category in categories.for_sheet(employee.sheet_type()) {
            // Some sheets are left partly blank.
            if rng.chance(0.03) {
                continue;
            }
            let raw_score = (category.max_score * rng.between(0.3, 1.0)).round();
            records.push(QualitativeScoreRecord {
                employee_id: employee.employee_id.clone(),
                evaluator_id: evaluator_id.clone(),
                category_id: category.category_id.clone(),
                raw_score,
                adjusted_score: raw_score,
                comment: String::new(),
            });
        }
    }
    records
}

fn joined_at(tenure_months: u32) -> NaiveDate {
    let base = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap_or(NaiveDate::MIN);
    base.checked_sub_months(chrono::Months::new(tenure_months))
        .unwrap_or(base)
}

fn pick_str(rng: &mut DatasetRng, names: &[&'static str]) -> &'static str {
    rng.pick(names).copied().unwrap_or("Unknown")
}

const GIVEN_NAMES: &[&str] = &[
    "Haruto", "Yui", "Sota", "Hina", "Ren", "Aoi", "Minato", "Mei", "Riku", "Sakura",
    "James", "Mary", "Daniel", "Emily", "Samuel", "Laura", "Noah", "Emma", "Ethan", "Anna",
    "Lucas", "Sofia", "Mateo", "Isabella", "Omar", "Layla", "Arjun", "Priya", "Wei", "Lin",
];

const FAMILY_NAMES: &[&str] = &[
    "Sato", "Suzuki", "Takahashi", "Tanaka", "Watanabe", "Ito", "Yamamoto", "Nakamura",
    "Kobayashi", "Kato", "Smith", "Johnson", "Garcia", "Martinez", "Brown", "Wilson",
    "Nguyen", "Kim", "Patel", "Chen", "Silva", "Rossi", "Muller", "Cohen", "Okafor",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleBook;

    /// Same seed, same roster and score sheets.
    #[test]
    fn same_seed_same_dataset() {
        let categories = RuleBook::default_test().categories;
        let a = SyntheticDataset::generate(42, "2025_H2", DatasetShape::default(), &categories);
        let b = SyntheticDataset::generate(42, "2025_H2", DatasetShape::default(), &categories);
        assert_eq!(a.employees, b.employees);
        assert_eq!(a.quantitative_scores, b.quantitative_scores);
        assert_eq!(a.qualitative_scores, b.qualitative_scores);
    }

    /// Every generated store has a manager and each employee one record per metric.
    #[test]
    fn every_store_has_a_manager() {
        let categories = RuleBook::default_test().categories;
        let shape = DatasetShape {
            store_count: 3,
            staff_per_store: 2,
            inactive_rate: 0.0,
        };
        let data = SyntheticDataset::generate(9, "2025_H2", shape, &categories);
        assert_eq!(data.employees.len(), 3 * 4);
        for store in &data.stores {
            assert!(data
                .employees
                .iter()
                .any(|e| e.store_id == store.store_id && e.role == Role::Manager));
        }
        assert_eq!(data.quantitative_scores.len(), data.employees.len() * METRICS.len());
    }
}
