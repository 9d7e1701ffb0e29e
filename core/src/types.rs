//! Shared primitive types used across the evaluation core.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable employee identifier from the master dataset.
pub type EmployeeId = String;

/// Stable store identifier from the master dataset.
pub type StoreId = String;

/// Opaque evaluation period key, e.g. "2025_H2".
pub type PeriodId = String;

/// Rank code, S best and E worst.
///
/// Declaration order is the ordinal order, so the derived `Ord`
/// sorts best-first. Never compare rank codes as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RankCode {
    S,
    A,
    B,
    C,
    D,
    E,
}

impl RankCode {
    pub const ALL: [RankCode; 6] = [
        RankCode::S,
        RankCode::A,
        RankCode::B,
        RankCode::C,
        RankCode::D,
        RankCode::E,
    ];

    /// Worst rank; the fallback for every unresolved classification.
    pub const WORST: RankCode = RankCode::E;

    /// S=1 (best) through E=6 (worst).
    pub fn ordinal(self) -> u8 {
        match self {
            Self::S => 1,
            Self::A => 2,
            Self::B => 3,
            Self::C => 4,
            Self::D => 5,
            Self::E => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
        }
    }

    pub fn is_better_than(self, other: RankCode) -> bool {
        self.ordinal() < other.ordinal()
    }
}

impl fmt::Display for RankCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "S" => Ok(Self::S),
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            "E" => Ok(Self::E),
            other => Err(format!("unknown rank code '{other}'")),
        }
    }
}

/// Employee role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Manager,
    AssistantManager,
    Staff,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Manager, Role::AssistantManager, Role::Staff];

    /// Assistant managers always fill in the manager sheet.
    pub fn sheet_type(self) -> SheetType {
        match self {
            Self::Staff => SheetType::Staff,
            Self::Manager | Self::AssistantManager => SheetType::Manager,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::AssistantManager => "assistant_manager",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluation sheet variant, selected by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetType {
    Manager,
    Staff,
}
