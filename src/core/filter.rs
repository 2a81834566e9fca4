//! Filter State: seven independent criteria.
//!
//! Across fields the criteria combine with AND; inside a field with OR.
//! The state is a value: every command returns a new `FilterState`, the
//! previous one is never touched.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::core::criteria::{Criterion, FilterToken};
use crate::core::model::{ActionStatus, Priority, Quarter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    AmbitionIds,
    Quarters,
    Years,
    ObjectiveIds,
    Priorities,
    Statuses,
    Labels,
}

impl FilterField {
    pub const ALL: [FilterField; 7] = [
        FilterField::AmbitionIds,
        FilterField::Quarters,
        FilterField::Years,
        FilterField::ObjectiveIds,
        FilterField::Priorities,
        FilterField::Statuses,
        FilterField::Labels,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::AmbitionIds => "ambitionIds",
            FilterField::Quarters => "quarters",
            FilterField::Years => "years",
            FilterField::ObjectiveIds => "objectiveIds",
            FilterField::Priorities => "priorities",
            FilterField::Statuses => "statuses",
            FilterField::Labels => "labels",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// UI-originated commands against the filter state.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCommand {
    /// Add the token to the field if absent, remove it otherwise.
    Toggle { field: FilterField, token: String },
    /// Whole-object replacement.
    Replace(FilterState),
    ClearAll,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFilter", into = "RawFilter")]
pub struct FilterState {
    pub ambition_ids: Criterion<String>,
    pub quarters: Criterion<Quarter>,
    pub years: Criterion<i32>,
    pub objective_ids: Criterion<String>,
    pub priorities: Criterion<Priority>,
    pub statuses: Criterion<ActionStatus>,
    pub labels: Criterion<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ambition(mut self, id: impl Into<String>) -> Self {
        self.ambition_ids = self.ambition_ids.with(id.into());
        self
    }

    pub fn with_quarter(mut self, quarter: Quarter) -> Self {
        self.quarters = self.quarters.with(quarter);
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.years = self.years.with(year);
        self
    }

    pub fn with_objective(mut self, id: impl Into<String>) -> Self {
        self.objective_ids = self.objective_ids.with(id.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priorities = self.priorities.with(priority);
        self
    }

    pub fn with_status(mut self, status: ActionStatus) -> Self {
        self.statuses = self.statuses.with(status);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels = self.labels.with(label.into());
        self
    }

    /// New state with `token` toggled in `field`.
    pub fn toggled(&self, field: FilterField, token: &str) -> Self {
        let mut next = self.clone();
        match field {
            FilterField::AmbitionIds => next.ambition_ids = self.ambition_ids.toggled_token(token),
            FilterField::Quarters => next.quarters = self.quarters.toggled_token(token),
            FilterField::Years => next.years = self.years.toggled_token(token),
            FilterField::ObjectiveIds => next.objective_ids = self.objective_ids.toggled_token(token),
            FilterField::Priorities => next.priorities = self.priorities.toggled_token(token),
            FilterField::Statuses => next.statuses = self.statuses.toggled_token(token),
            FilterField::Labels => next.labels = self.labels.toggled_token(token),
        }
        next
    }

    pub fn cleared(&self) -> Self {
        Self::default()
    }

    /// Apply a command, computing the next state from this one.
    pub fn apply(&self, command: FilterCommand) -> Self {
        match command {
            FilterCommand::Toggle { field, token } => self.toggled(field, &token),
            FilterCommand::Replace(next) => next,
            FilterCommand::ClearAll => self.cleared(),
        }
    }

    /// Field-wise union; used to layer command-line flags over a configured filter.
    pub fn merged(&self, other: &FilterState) -> Self {
        Self {
            ambition_ids: self.ambition_ids.union(&other.ambition_ids),
            quarters: self.quarters.union(&other.quarters),
            years: self.years.union(&other.years),
            objective_ids: self.objective_ids.union(&other.objective_ids),
            priorities: self.priorities.union(&other.priorities),
            statuses: self.statuses.union(&other.statuses),
            labels: self.labels.union(&other.labels),
        }
    }

    pub fn field_len(&self, field: FilterField) -> usize {
        match field {
            FilterField::AmbitionIds => self.ambition_ids.len(),
            FilterField::Quarters => self.quarters.len(),
            FilterField::Years => self.years.len(),
            FilterField::ObjectiveIds => self.objective_ids.len(),
            FilterField::Priorities => self.priorities.len(),
            FilterField::Statuses => self.statuses.len(),
            FilterField::Labels => self.labels.len(),
        }
    }

    pub fn has_active_filters(&self) -> bool {
        FilterField::ALL.iter().any(|f| self.field_len(*f) > 0)
    }

    /// Total number of selected values across all fields (the filter badge count).
    pub fn active_filter_count(&self) -> usize {
        FilterField::ALL.iter().map(|f| self.field_len(*f)).sum()
    }

    /// True when any filter reaches ambitions or objectives (everything but
    /// priority, status and label).
    pub fn has_hierarchy_filters(&self) -> bool {
        self.ambition_ids.is_active()
            || self.quarters.is_active()
            || self.years.is_active()
            || self.objective_ids.is_active()
    }

    pub fn to_raw(&self) -> RawFilter {
        RawFilter {
            ambition_ids: tokens_of(&self.ambition_ids),
            quarters: tokens_of(&self.quarters),
            years: tokens_of(&self.years),
            objective_ids: tokens_of(&self.objective_ids),
            priorities: tokens_of(&self.priorities),
            statuses: tokens_of(&self.statuses),
            labels: tokens_of(&self.labels),
        }
    }
}

/// One raw filter value; years are written as integers in config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawToken {
    Number(i64),
    Text(String),
}

impl RawToken {
    fn from_text(text: String) -> Self {
        match text.parse::<i64>() {
            Ok(n) if n.to_string() == text => RawToken::Number(n),
            _ => RawToken::Text(text),
        }
    }
}

impl fmt::Display for RawToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawToken::Number(n) => write!(f, "{}", n),
            RawToken::Text(s) => f.write_str(s),
        }
    }
}

/// Wire form of the filter state (config files, JSON, command-line flags).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawFilter {
    pub ambition_ids: Vec<RawToken>,
    pub quarters: Vec<RawToken>,
    pub years: Vec<RawToken>,
    pub objective_ids: Vec<RawToken>,
    pub priorities: Vec<RawToken>,
    pub statuses: Vec<RawToken>,
    pub labels: Vec<RawToken>,
}

impl RawFilter {
    pub fn is_empty(&self) -> bool {
        self.ambition_ids.is_empty()
            && self.quarters.is_empty()
            && self.years.is_empty()
            && self.objective_ids.is_empty()
            && self.priorities.is_empty()
            && self.statuses.is_empty()
            && self.labels.is_empty()
    }
}

impl From<RawFilter> for FilterState {
    fn from(raw: RawFilter) -> Self {
        Self {
            ambition_ids: criterion_of(FilterField::AmbitionIds, &raw.ambition_ids),
            quarters: criterion_of(FilterField::Quarters, &raw.quarters),
            years: criterion_of(FilterField::Years, &raw.years),
            objective_ids: criterion_of(FilterField::ObjectiveIds, &raw.objective_ids),
            priorities: criterion_of(FilterField::Priorities, &raw.priorities),
            statuses: criterion_of(FilterField::Statuses, &raw.statuses),
            labels: criterion_of(FilterField::Labels, &raw.labels),
        }
    }
}

impl From<FilterState> for RawFilter {
    fn from(state: FilterState) -> Self {
        state.to_raw()
    }
}

fn criterion_of<T: FilterToken>(field: FilterField, tokens: &[RawToken]) -> Criterion<T> {
    let criterion = Criterion::from_tokens(tokens.iter().map(ToString::to_string));
    for token in criterion.unrecognized() {
        warn!(field = %field, token, "filter value matches no known member; the field will match nothing");
    }
    criterion
}

fn tokens_of<T: FilterToken>(criterion: &Criterion<T>) -> Vec<RawToken> {
    criterion
        .to_tokens()
        .into_iter()
        .map(RawToken::from_text)
        .collect()
}
