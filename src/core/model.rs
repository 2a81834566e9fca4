//! Entity model for the planning hierarchy.
//!
//! Ambition → AnnualKeyResult, and Ambition → QuarterlyObjective →
//! QuarterlyKeyResult → Action. Entities arrive as flat, owner-scoped
//! collections from the entity store; nothing in this crate mutates them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::core::navigator;

/// A token that names no member of the enum it was parsed for.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} value '{token}'")]
pub struct UnknownToken {
    pub kind: &'static str,
    pub token: String,
}

/// Closed enums that travel as lowercase wire tokens.
macro_rules! token_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $token:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $token)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownToken;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(needle))
                    .ok_or_else(|| UnknownToken {
                        kind: stringify!($name),
                        token: s.to_string(),
                    })
            }
        }
    };
}

token_enum! {
    /// Calendar quarter of a quarterly objective.
    Quarter {
        Q1 => "Q1",
        Q2 => "Q2",
        Q3 => "Q3",
        Q4 => "Q4",
    }
}

token_enum! {
    Priority {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
}

token_enum! {
    /// Lifecycle of an action (the only status the filter panel targets).
    ActionStatus {
        Todo => "todo",
        InProgress => "in_progress",
        Done => "done",
    }
}

token_enum! {
    /// Lifecycle of ambitions and quarterly objectives.
    Status {
        Draft => "draft",
        Active => "active",
        Paused => "paused",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

token_enum! {
    AmbitionCategory {
        Revenue => "revenue",
        Growth => "growth",
        Market => "market",
        Product => "product",
        Team => "team",
        Customer => "customer",
        Operational => "operational",
        Innovation => "innovation",
        Other => "other",
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Default for ActionStatus {
    fn default() -> Self {
        ActionStatus::Todo
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Draft
    }
}

impl Default for AmbitionCategory {
    fn default() -> Self {
        AmbitionCategory::Other
    }
}

/// Entity kinds, used when reporting on snapshot integrity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Ambition,
    AnnualKeyResult,
    QuarterlyObjective,
    QuarterlyKeyResult,
    Action,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Ambition => "ambition",
            EntityKind::AnnualKeyResult => "annual key result",
            EntityKind::QuarterlyObjective => "quarterly objective",
            EntityKind::QuarterlyKeyResult => "quarterly key result",
            EntityKind::Action => "action",
        };
        f.write_str(name)
    }
}

/// Annual top-level objective; root of one branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ambition {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub year: i32,
    #[serde(default)]
    pub category: AmbitionCategory,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualKeyResult {
    pub id: String,
    pub ambition_id: String,
    pub title: String,
    #[serde(default)]
    pub current: f64,
    #[serde(default)]
    pub target: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterlyObjective {
    pub id: String,
    pub ambition_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub quarter: Quarter,
    pub year: i32,
    #[serde(default)]
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterlyKeyResult {
    pub id: String,
    pub quarterly_objective_id: String,
    pub title: String,
    #[serde(default)]
    pub current: f64,
    #[serde(default)]
    pub target: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: String,
    /// May be null, or name a key result that no longer exists.
    #[serde(default)]
    pub quarterly_key_result_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub status: ActionStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
}

impl Action {
    pub fn key_result_id(&self) -> Option<&str> {
        self.quarterly_key_result_id.as_deref()
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// Anything measured as `current` against `target`.
pub trait Measurable {
    fn current(&self) -> f64;
    fn target(&self) -> f64;

    /// Unclamped percentage; 0 when `target <= 0`.
    fn raw_progress(&self) -> f64 {
        navigator::raw_progress(self.current(), self.target())
    }

    /// Percentage clamped to `[0, 100]`, unrounded.
    fn progress(&self) -> f64 {
        navigator::progress(self.current(), self.target())
    }

    /// Display value: clamped and rounded to the nearest integer.
    fn progress_percent(&self) -> u32 {
        navigator::rounded_percent(self.progress())
    }
}

impl Measurable for AnnualKeyResult {
    fn current(&self) -> f64 {
        self.current
    }

    fn target(&self) -> f64 {
        self.target
    }
}

impl Measurable for QuarterlyKeyResult {
    fn current(&self) -> f64 {
        self.current
    }

    fn target(&self) -> f64 {
        self.target
    }
}

/// The five flat collections of one owner, as handed over by the entity store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub ambitions: Vec<Ambition>,
    #[serde(default)]
    pub key_results: Vec<AnnualKeyResult>,
    #[serde(default)]
    pub quarterly_objectives: Vec<QuarterlyObjective>,
    #[serde(default)]
    pub quarterly_key_results: Vec<QuarterlyKeyResult>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.ambitions.is_empty()
            && self.key_results.is_empty()
            && self.quarterly_objectives.is_empty()
            && self.quarterly_key_results.is_empty()
            && self.actions.is_empty()
    }

    pub fn ambition(&self, id: &str) -> Option<&Ambition> {
        self.ambitions.iter().find(|a| a.id == id)
    }

    pub fn objective(&self, id: &str) -> Option<&QuarterlyObjective> {
        self.quarterly_objectives.iter().find(|o| o.id == id)
    }

    pub fn quarterly_key_result(&self, id: &str) -> Option<&QuarterlyKeyResult> {
        self.quarterly_key_results.iter().find(|kr| kr.id == id)
    }

    /// Which level of the tree an id belongs to, searching top-down.
    pub fn kind_of(&self, id: &str) -> Option<EntityKind> {
        if self.ambition(id).is_some() {
            Some(EntityKind::Ambition)
        } else if self.key_results.iter().any(|kr| kr.id == id) {
            Some(EntityKind::AnnualKeyResult)
        } else if self.objective(id).is_some() {
            Some(EntityKind::QuarterlyObjective)
        } else if self.quarterly_key_result(id).is_some() {
            Some(EntityKind::QuarterlyKeyResult)
        } else if self.actions.iter().any(|a| a.id == id) {
            Some(EntityKind::Action)
        } else {
            None
        }
    }
}
