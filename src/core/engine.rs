//! Filter Engine: filtered projections of actions, ambitions and objectives.
//!
//! Every filter field applies directly to the level that carries it and is
//! propagated to the levels that do not:
//!
//! - actions resolve their key result and objective, and test ambition,
//!   quarter, year and objective through that ancestor; a dangling reference
//!   fails any such test;
//! - objectives are tested directly on ambition, quarter, year and own id;
//!   priority, status and label never apply to them;
//! - ambitions are tested on their own id when an ambition selection exists
//!   (and nothing else is consulted), otherwise they are pulled in by having
//!   at least one objective that satisfies the active quarter/year/objective
//!   fields.
//!
//! All functions are pure over the snapshot and filter they receive. The
//! ancestor index lives only as long as one [`FilterEngine`].

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use crate::core::criteria::{Criterion, FilterToken};
use crate::core::filter::FilterState;
use crate::core::model::{Action, Ambition, QuarterlyKeyResult, QuarterlyObjective, Snapshot};

/// Size of each projection next to the unfiltered action count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterStats {
    pub total_actions: usize,
    pub filtered_actions: usize,
    pub ambitions_count: usize,
    pub objectives_count: usize,
}

/// The three filtered projections, borrowed from the snapshot in input order.
#[derive(Debug, Clone, Serialize)]
pub struct FilteredView<'a> {
    pub actions: Vec<&'a Action>,
    pub ambitions: Vec<&'a Ambition>,
    pub objectives: Vec<&'a QuarterlyObjective>,
    pub stats: FilterStats,
}

struct AncestorIndex<'a> {
    key_results: FxHashMap<&'a str, &'a QuarterlyKeyResult>,
    objectives: FxHashMap<&'a str, &'a QuarterlyObjective>,
    objectives_by_ambition: FxHashMap<&'a str, Vec<&'a QuarterlyObjective>>,
}

impl<'a> AncestorIndex<'a> {
    fn build(snapshot: &'a Snapshot) -> Self {
        let mut key_results = FxHashMap::default();
        for kr in &snapshot.quarterly_key_results {
            // First occurrence wins on duplicate ids.
            key_results.entry(kr.id.as_str()).or_insert(kr);
        }
        let mut objectives = FxHashMap::default();
        let mut objectives_by_ambition: FxHashMap<&str, Vec<&QuarterlyObjective>> =
            FxHashMap::default();
        for objective in &snapshot.quarterly_objectives {
            objectives.entry(objective.id.as_str()).or_insert(objective);
            objectives_by_ambition
                .entry(objective.ambition_id.as_str())
                .or_default()
                .push(objective);
        }
        Self {
            key_results,
            objectives,
            objectives_by_ambition,
        }
    }

    /// The objective an action hangs under, if both hops resolve.
    fn objective_of(&self, action: &Action) -> Option<&'a QuarterlyObjective> {
        let kr = self.key_results.get(action.key_result_id()?)?;
        self.objectives.get(kr.quarterly_objective_id.as_str()).copied()
    }

    fn objectives_of(&self, ambition_id: &str) -> &[&'a QuarterlyObjective] {
        self.objectives_by_ambition
            .get(ambition_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// A field tested through the action's resolved objective.
fn through_objective<T, F>(
    criterion: &Criterion<T>,
    objective: Option<&QuarterlyObjective>,
    field: F,
) -> bool
where
    T: FilterToken,
    F: Fn(&QuarterlyObjective) -> &T,
{
    if !criterion.is_active() {
        return true;
    }
    objective.is_some_and(|o| criterion.contains(field(o)))
}

/// The quarter/year/objective fields tested against one objective.
fn objective_scope_matches(filters: &FilterState, objective: &QuarterlyObjective) -> bool {
    filters.quarters.accepts(&objective.quarter)
        && filters.years.accepts(&objective.year)
        && filters.objective_ids.accepts(&objective.id)
}

/// Quarterly Objective predicate. Priority, status and label are ignored.
pub fn objective_matches(filters: &FilterState, objective: &QuarterlyObjective) -> bool {
    filters.ambition_ids.accepts(&objective.ambition_id) && objective_scope_matches(filters, objective)
}

pub struct FilterEngine<'s, 'f> {
    snapshot: &'s Snapshot,
    filters: &'f FilterState,
    index: AncestorIndex<'s>,
}

impl<'s, 'f> FilterEngine<'s, 'f> {
    pub fn new(snapshot: &'s Snapshot, filters: &'f FilterState) -> Self {
        Self {
            snapshot,
            filters,
            index: AncestorIndex::build(snapshot),
        }
    }

    pub fn filters(&self) -> &FilterState {
        self.filters
    }

    pub fn action_matches(&self, action: &Action) -> bool {
        let f = self.filters;
        let objective = self.index.objective_of(action);

        through_objective(&f.objective_ids, objective, |o| &o.id)
            && through_objective(&f.ambition_ids, objective, |o| &o.ambition_id)
            && through_objective(&f.quarters, objective, |o| &o.quarter)
            && through_objective(&f.years, objective, |o| &o.year)
            && f.priorities.accepts(&action.priority)
            && f.statuses.accepts(&action.status)
            && f.labels.accepts_any(action.labels.iter())
    }

    pub fn objective_matches(&self, objective: &QuarterlyObjective) -> bool {
        objective_matches(self.filters, objective)
    }

    pub fn ambition_matches(&self, ambition: &Ambition) -> bool {
        let f = self.filters;
        if f.ambition_ids.is_active() {
            return f.ambition_ids.contains(&ambition.id);
        }
        if !(f.quarters.is_active() || f.years.is_active() || f.objective_ids.is_active()) {
            return true;
        }
        self.index
            .objectives_of(&ambition.id)
            .iter()
            .any(|o| objective_scope_matches(f, o))
    }

    pub fn filtered_actions(&self) -> Vec<&'s Action> {
        self.snapshot
            .actions
            .iter()
            .filter(|a| self.action_matches(a))
            .collect()
    }

    pub fn filtered_ambitions(&self) -> Vec<&'s Ambition> {
        self.snapshot
            .ambitions
            .iter()
            .filter(|a| self.ambition_matches(a))
            .collect()
    }

    pub fn filtered_objectives(&self) -> Vec<&'s QuarterlyObjective> {
        self.snapshot
            .quarterly_objectives
            .iter()
            .filter(|o| self.objective_matches(o))
            .collect()
    }

    pub fn view(&self) -> FilteredView<'s> {
        let actions = self.filtered_actions();
        let ambitions = self.filtered_ambitions();
        let objectives = self.filtered_objectives();
        let stats = FilterStats {
            total_actions: self.snapshot.actions.len(),
            filtered_actions: actions.len(),
            ambitions_count: ambitions.len(),
            objectives_count: objectives.len(),
        };
        debug!(
            actions = stats.filtered_actions,
            total_actions = stats.total_actions,
            ambitions = stats.ambitions_count,
            objectives = stats.objectives_count,
            active_filters = self.filters.active_filter_count(),
            "filter projection computed"
        );
        FilteredView {
            actions,
            ambitions,
            objectives,
            stats,
        }
    }
}

/// Filter the snapshot in one call.
pub fn apply<'s>(snapshot: &'s Snapshot, filters: &FilterState) -> FilteredView<'s> {
    FilterEngine::new(snapshot, filters).view()
}

/// Distinct labels over all (unfiltered) actions, ascending.
pub fn available_labels(actions: &[Action]) -> Vec<String> {
    actions
        .iter()
        .flat_map(|a| a.labels.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct years over all (unfiltered) objectives, newest first.
pub fn available_years(objectives: &[QuarterlyObjective]) -> Vec<i32> {
    objectives
        .iter()
        .map(|o| o.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .collect()
}
