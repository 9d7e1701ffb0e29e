use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported rule type '{rule_type}'")]
    UnsupportedRuleType { rule_type: String },

    #[error("No draft supplied for rule type '{rule_type}'")]
    MissingDraft { rule_type: String },

    #[error("Record set '{record_set}' is per-period but no period was given")]
    MissingPeriod { record_set: String },

    #[error("Evaluation period must not be empty")]
    EmptyPeriod,

    #[error("Record set '{name}' not found")]
    RecordSetNotFound { name: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EvalResult<T> = Result<T, EvalError>;
