//! Human-readable description of the active filters.

use crate::core::criteria::{Criterion, FilterToken};
use crate::core::filter::FilterState;
use crate::core::model::{ActionStatus, Ambition, Priority, Quarter, QuarterlyObjective};

pub const NO_ACTIVE_FILTERS: &str = "No active filters";
pub const VALUE_SEPARATOR: &str = ", ";
pub const FIELD_SEPARATOR: &str = " • ";

pub fn quarter_label(quarter: Quarter) -> &'static str {
    match quarter {
        Quarter::Q1 => "Q1 (Jan-Mar)",
        Quarter::Q2 => "Q2 (Apr-Jun)",
        Quarter::Q3 => "Q3 (Jul-Sep)",
        Quarter::Q4 => "Q4 (Oct-Dec)",
    }
}

pub fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "Low",
        Priority::Medium => "Medium",
        Priority::High => "High",
        Priority::Critical => "Critical",
    }
}

pub fn status_label(status: ActionStatus) -> &'static str {
    match status {
        ActionStatus::Todo => "To do",
        ActionStatus::InProgress => "In progress",
        ActionStatus::Done => "Done",
    }
}

/// Labels for typed values, then unrecognized tokens as typed by the user.
fn labels_of<T, F>(criterion: &Criterion<T>, label: F) -> Vec<String>
where
    T: FilterToken,
    F: Fn(&T) -> String,
{
    criterion
        .values()
        .map(label)
        .chain(criterion.unrecognized().map(str::to_string))
        .collect()
}

/// Ids resolved to titles. Ids naming nothing are dropped.
fn titles_of<'a, I>(criterion: &Criterion<String>, titles: I) -> Vec<String>
where
    I: Fn(&str) -> Option<&'a str>,
{
    criterion
        .values()
        .filter_map(|id| titles(id))
        .map(str::to_string)
        .collect()
}

/// One line describing every active field, in a fixed field order.
pub fn describe(
    filters: &FilterState,
    ambitions: &[Ambition],
    objectives: &[QuarterlyObjective],
) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut push = |name: &str, values: Vec<String>| {
        parts.push(format!("{}: {}", name, values.join(VALUE_SEPARATOR)));
    };

    if filters.ambition_ids.is_active() {
        push(
            "Ambitions",
            titles_of(&filters.ambition_ids, |id| {
                ambitions.iter().find(|a| a.id == id).map(|a| a.title.as_str())
            }),
        );
    }
    if filters.quarters.is_active() {
        push("Quarters", labels_of(&filters.quarters, |q| quarter_label(*q).to_string()));
    }
    if filters.years.is_active() {
        push("Years", labels_of(&filters.years, ToString::to_string));
    }
    if filters.objective_ids.is_active() {
        push(
            "Objectives",
            titles_of(&filters.objective_ids, |id| {
                objectives.iter().find(|o| o.id == id).map(|o| o.title.as_str())
            }),
        );
    }
    if filters.priorities.is_active() {
        push(
            "Priorities",
            labels_of(&filters.priorities, |p| priority_label(*p).to_string()),
        );
    }
    if filters.statuses.is_active() {
        push("Statuses", labels_of(&filters.statuses, |s| status_label(*s).to_string()));
    }
    if filters.labels.is_active() {
        push("Labels", labels_of(&filters.labels, Clone::clone));
    }

    if parts.is_empty() {
        NO_ACTIVE_FILTERS.to_string()
    } else {
        parts.join(FIELD_SEPARATOR)
    }
}
