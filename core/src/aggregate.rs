//! Score aggregation: raw score records to two scalar scores.
//!
//! Missing data is never an error here: an employee without records
//! scores 0, a category without a record contributes 0.

use crate::config::RoundingMode;
use crate::rules::QualitativeCategory;
use crate::score::{QualitativeScoreRecord, QuantitativeScoreRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantitativeBreakdown {
    pub metric_id: String,
    pub metric_name: String,
    pub actual_value: f64,
    pub target_value: f64,
    pub score: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitativeBreakdown {
    pub category_id: String,
    pub category_name: String,
    pub score: f64,
    pub max_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate<B> {
    pub total: f64,
    pub breakdown: Vec<B>,
}

pub type QuantitativeAggregate = Aggregate<QuantitativeBreakdown>;
pub type QualitativeAggregate = Aggregate<QualitativeBreakdown>;

/// Weighted mean of the employee's metric scores:
/// `Σ(score·weight) / Σ(weight)`.
///
/// Negative weights count as zero. A zero total weight yields 0.
pub fn aggregate_quantitative(
    employee_id: &str,
    records: &[QuantitativeScoreRecord],
) -> QuantitativeAggregate {
    let own: Vec<&QuantitativeScoreRecord> = records
        .iter()
        .filter(|r| r.employee_id == employee_id)
        .collect();

    if own.is_empty() {
        return Aggregate {
            total: 0.0,
            breakdown: Vec::new(),
        };
    }

    let mut total_weight = 0.0;
    let mut weighted_sum = 0.0;
    for record in &own {
        let weight = if record.weight < 0.0 {
            log::warn!(
                "employee={employee_id} metric={} has negative weight {}; counted as 0",
                record.metric_id,
                record.weight
            );
            0.0
        } else {
            record.weight
        };
        total_weight += weight;
        weighted_sum += record.score * weight;
    }

    let total = if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.0
    };

    let breakdown = own
        .into_iter()
        .map(|r| QuantitativeBreakdown {
            metric_id: r.metric_id.clone(),
            metric_name: r.metric_name.clone(),
            actual_value: r.actual_value,
            target_value: r.target_value,
            score: r.score,
            weight: r.weight,
        })
        .collect();

    Aggregate { total, breakdown }
}

/// Sum of adjusted scores over the enabled categories, in `sort_order`.
///
/// `categories` must already be the set for the employee's sheet type.
/// The breakdown has exactly one entry per enabled category.
pub fn aggregate_qualitative(
    employee_id: &str,
    records: &[QualitativeScoreRecord],
    categories: &[QualitativeCategory],
) -> QualitativeAggregate {
    let mut enabled: Vec<&QualitativeCategory> = categories.iter().filter(|c| c.enabled).collect();
    enabled.sort_by_key(|c| c.sort_order);

    let mut total = 0.0;
    let mut breakdown = Vec::with_capacity(enabled.len());

    for category in enabled {
        let record = records
            .iter()
            .find(|r| r.employee_id == employee_id && r.category_id == category.category_id);

        let score = record.map(|r| r.adjusted_score).unwrap_or(0.0);
        total += score;

        breakdown.push(QualitativeBreakdown {
            category_id: category.category_id.clone(),
            category_name: category.category_name.clone(),
            score,
            max_score: category.max_score,
            comment: record
                .map(|r| r.comment.clone())
                .filter(|c| !c.is_empty()),
        });
    }

    Aggregate { total, breakdown }
}

/// `mode(quantitative + qualitative)`.
pub fn calculate_total_score(quantitative: f64, qualitative: f64, mode: RoundingMode) -> f64 {
    mode.apply(quantitative + qualitative)
}
