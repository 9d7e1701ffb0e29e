//! perfeval-core: employee performance evaluation.
//!
//! Pure core: aggregate, rank, promotion, ranking, recalculate, diff,
//! simulation. I/O shell: store, engine.

pub mod aggregate;
pub mod audit;
pub mod config;
pub mod diff;
pub mod employee;
pub mod engine;
pub mod error;
pub mod promotion;
pub mod rank;
pub mod ranking;
pub mod recalculate;
pub mod result;
pub mod rng;
pub mod rules;
pub mod score;
pub mod simulation;
pub mod store;
pub mod synthetic;
pub mod types;
