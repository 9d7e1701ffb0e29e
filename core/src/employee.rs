//! Employee and store master records.
//!
//! Owned by the external master dataset. The core only reads them.

use crate::types::{EmployeeId, Role, SheetType, StoreId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub employee_id: EmployeeId,
    pub employee_code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_kana: Option<String>,
    pub role: Role,
    pub store_id: StoreId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    pub active: bool,
    pub joined_at: NaiveDate,
    /// Months of service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenure: Option<u32>,
    #[serde(default)]
    pub display_order: u32,
}

impl Employee {
    pub fn sheet_type(&self) -> SheetType {
        self.role.sheet_type()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub store_id: StoreId,
    pub store_code: String,
    pub store_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub area: String,
    pub active: bool,
    #[serde(default)]
    pub display_order: u32,
}

/// `employees` record set envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeesData {
    pub version: u32,
    pub items: Vec<Employee>,
}

/// `stores` record set envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoresData {
    pub version: u32,
    pub items: Vec<Store>,
}
