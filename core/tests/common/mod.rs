//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use perfeval_core::{
    config::{AppSettings, RuleBook},
    employee::Employee,
    result::{EvaluationResultItem, ResultDetail},
    promotion::PromotionStatus,
    rules::QualitativeCategories,
    score::{QualitativeScoreRecord, QuantitativeScoreRecord},
    types::{RankCode, Role},
};

pub const PERIOD: &str = "2025_H2";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn employee(id: &str, role: Role, store_id: &str) -> Employee {
    Employee {
        employee_id: id.to_string(),
        employee_code: format!("C-{id}"),
        name: format!("Employee {id}"),
        name_kana: None,
        role,
        store_id: store_id.to_string(),
        grade: None,
        active: true,
        joined_at: NaiveDate::from_ymd_opt(2020, 4, 1).expect("valid date"),
        tenure: Some(60),
        display_order: 0,
    }
}

pub fn metric(employee_id: &str, metric_id: &str, score: f64, weight: f64) -> QuantitativeScoreRecord {
    QuantitativeScoreRecord {
        employee_id: employee_id.to_string(),
        metric_id: metric_id.to_string(),
        metric_name: metric_id.to_string(),
        actual_value: score,
        target_value: 100.0,
        score,
        weight,
    }
}

pub fn category_score(employee_id: &str, category_id: &str, adjusted: f64) -> QualitativeScoreRecord {
    QualitativeScoreRecord {
        employee_id: employee_id.to_string(),
        evaluator_id: "evaluator-1".to_string(),
        category_id: category_id.to_string(),
        raw_score: adjusted,
        adjusted_score: adjusted,
        comment: String::new(),
    }
}

/// One record per category of the employee's sheet, all scoring `each`.
pub fn full_sheet(
    employee: &Employee,
    categories: &QualitativeCategories,
    each: f64,
) -> Vec<QualitativeScoreRecord> {
    categories
        .for_sheet(employee.sheet_type())
        .iter()
        .map(|c| category_score(&employee.employee_id, &c.category_id, each))
        .collect()
}

/// Three-person roster used across recalculation, simulation and engine
/// tests:
///   - m1 (manager): quantitative 95, qualitative 6x10=60, S/S, total 155
///   - a1 (assistant manager): 80, 6x8=48, A/A, total 128
///   - s1 (staff, other store): 50, 5x6=30, C/C, total 80
pub struct Scenario {
    pub rules: RuleBook,
    pub settings: AppSettings,
    pub employees: Vec<Employee>,
    pub quantitative: Vec<QuantitativeScoreRecord>,
    pub qualitative: Vec<QualitativeScoreRecord>,
}

pub fn scenario() -> Scenario {
    let rules = RuleBook::default_test();
    let employees = vec![
        employee("m1", Role::Manager, "store-1"),
        employee("a1", Role::AssistantManager, "store-1"),
        employee("s1", Role::Staff, "store-2"),
    ];
    let quantitative = vec![
        metric("m1", "sales", 95.0, 1.0),
        metric("a1", "sales", 80.0, 1.0),
        metric("s1", "sales", 50.0, 1.0),
    ];
    let mut qualitative = full_sheet(&employees[0], &rules.categories, 10.0);
    qualitative.extend(full_sheet(&employees[1], &rules.categories, 8.0));
    qualitative.extend(full_sheet(&employees[2], &rules.categories, 6.0));

    Scenario {
        rules,
        settings: AppSettings::default(),
        employees,
        quantitative,
        qualitative,
    }
}

/// Bare result item for ranking tests.
pub fn result_item(id: &str, role: Role, store_id: &str, total: f64) -> EvaluationResultItem {
    EvaluationResultItem {
        employee_id: id.to_string(),
        employee_code: format!("C-{id}"),
        employee_name: format!("Employee {id}"),
        role,
        store_id: store_id.to_string(),
        total_score: total,
        quantitative_score: total / 2.0,
        qualitative_score: total / 2.0,
        quantitative_rank: RankCode::B,
        qualitative_rank: RankCode::B,
        rank: RankCode::B,
        overall_rank: 0,
        role_rank: 0,
        promotion_status: PromotionStatus::Keep,
        promotion_level: 0,
        promotion_reason: String::new(),
        salary_adjustment: 0.0,
        detail: ResultDetail::default(),
    }
}
