//! JSON directory store: one file per record set under a data directory.

use crate::{
    audit::{RuleChangeLog, RuleChangeLogs},
    error::{EvalError, EvalResult},
};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::{RecordSet, RecordStore};

const CHANGE_LOG_FILE: &str = "rule_change_logs.json";

pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_file<T: DeserializeOwned>(&self, file_name: &str) -> EvalResult<T> {
        let path = self.root.join(file_name);
        if !path.exists() {
            return Err(EvalError::RecordSetNotFound {
                name: file_name.to_string(),
            });
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_file<T: Serialize>(&self, file_name: &str, data: &T) -> EvalResult<()> {
        fs::create_dir_all(&self.root)?;
        let content = serde_json::to_string_pretty(data)?;
        fs::write(self.root.join(file_name), content)?;
        Ok(())
    }
}

impl RecordStore for JsonDirStore {
    fn read_record_set<T: DeserializeOwned>(
        &self,
        set: RecordSet,
        period: Option<&str>,
    ) -> EvalResult<T> {
        self.read_file(&set.file_name(period)?)
    }

    fn write_record_set<T: Serialize>(
        &self,
        set: RecordSet,
        period: Option<&str>,
        data: &T,
    ) -> EvalResult<()> {
        let file_name = set.file_name(period)?;
        self.write_file(&file_name, data)?;
        log::debug!("wrote {}", self.root.join(&file_name).display());
        Ok(())
    }

    fn append_rule_change_log(&self, log: &RuleChangeLog) -> EvalResult<()> {
        let mut logs = self.rule_change_logs()?;
        logs.push_newest(log.clone());
        self.write_file(CHANGE_LOG_FILE, &logs)
    }

    fn rule_change_logs(&self) -> EvalResult<RuleChangeLogs> {
        match self.read_file(CHANGE_LOG_FILE) {
            Ok(logs) => Ok(logs),
            Err(EvalError::RecordSetNotFound { .. }) => Ok(RuleChangeLogs::default()),
            Err(err) => Err(err),
        }
    }
}
