//! Expansion State: which tree nodes are disclosed.
//!
//! Three independent id sets (ambitions, objectives, quarterly key results).
//! The first time a non-empty ambition list is observed, every ambition and
//! every objective present at that moment is expanded; key results are never
//! seeded. After that the state only changes through explicit toggles.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::core::model::{Ambition, QuarterlyObjective};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeLevel {
    Ambition,
    Objective,
    KeyResult,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionState {
    ambitions: BTreeSet<String>,
    objectives: BTreeSet<String>,
    key_results: BTreeSet<String>,
    initialized: bool,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Feed the currently displayed ambitions/objectives; seeds once.
    pub fn observe<'a, A, O>(&self, ambitions: A, objectives: O) -> Self
    where
        A: IntoIterator<Item = &'a Ambition>,
        O: IntoIterator<Item = &'a QuarterlyObjective>,
    {
        if self.initialized {
            return self.clone();
        }
        let ambition_ids: BTreeSet<String> = ambitions.into_iter().map(|a| a.id.clone()).collect();
        if ambition_ids.is_empty() {
            return self.clone();
        }
        let objective_ids: BTreeSet<String> =
            objectives.into_iter().map(|o| o.id.clone()).collect();
        debug!(
            ambitions = ambition_ids.len(),
            objectives = objective_ids.len(),
            "seeding tree expansion"
        );

        let mut next = self.clone();
        next.ambitions = ambition_ids;
        next.objectives = objective_ids;
        next.initialized = true;
        next
    }

    fn level(&self, level: TreeLevel) -> &BTreeSet<String> {
        match level {
            TreeLevel::Ambition => &self.ambitions,
            TreeLevel::Objective => &self.objectives,
            TreeLevel::KeyResult => &self.key_results,
        }
    }

    fn level_mut(&mut self, level: TreeLevel) -> &mut BTreeSet<String> {
        match level {
            TreeLevel::Ambition => &mut self.ambitions,
            TreeLevel::Objective => &mut self.objectives,
            TreeLevel::KeyResult => &mut self.key_results,
        }
    }

    pub fn is_expanded(&self, level: TreeLevel, id: &str) -> bool {
        self.level(level).contains(id)
    }

    pub fn expanded(&self, level: TreeLevel) -> impl Iterator<Item = &str> {
        self.level(level).iter().map(String::as_str)
    }

    /// New state with `id` flipped between collapsed and expanded.
    pub fn toggled(&self, level: TreeLevel, id: &str) -> Self {
        let mut next = self.clone();
        let set = next.level_mut(level);
        if !set.remove(id) {
            set.insert(id.to_string());
        }
        next
    }

    /// Everything collapsed; seeding stays spent.
    pub fn collapsed_all(&self) -> Self {
        Self {
            initialized: self.initialized,
            ..Self::default()
        }
    }
}
