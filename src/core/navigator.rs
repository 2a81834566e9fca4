//! Hierarchy Navigator: child lookups and subtree roll-ups.
//!
//! The navigator is filter-agnostic. Build it over the raw snapshot for
//! ground-truth counts, or over a [`FilteredView`] for the filtered tree;
//! either way it answers from whatever collections it was given. Child
//! indexes are built once at construction and keep input order.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::core::engine::FilteredView;
use crate::core::model::{
    Action, ActionStatus, Ambition, AnnualKeyResult, Measurable, QuarterlyKeyResult,
    QuarterlyObjective, Snapshot,
};

/// `current / target * 100` without clamping; 0 when `target <= 0`.
pub fn raw_progress(current: f64, target: f64) -> f64 {
    if target.is_nan() || target <= 0.0 || !current.is_finite() {
        return 0.0;
    }
    current / target * 100.0
}

/// Progress clamped to `[0, 100]`, unrounded.
pub fn progress(current: f64, target: f64) -> f64 {
    raw_progress(current, target).clamp(0.0, 100.0)
}

pub fn rounded_percent(progress: f64) -> u32 {
    progress.clamp(0.0, 100.0).round() as u32
}

/// Action counts by status under one subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionStats {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl ActionStats {
    pub fn tally<'a, I>(actions: I) -> Self
    where
        I: IntoIterator<Item = &'a Action>,
    {
        let mut stats = Self::default();
        for action in actions {
            stats.total += 1;
            match action.status {
                ActionStatus::Todo => stats.todo += 1,
                ActionStatus::InProgress => stats.in_progress += 1,
                ActionStatus::Done => stats.done += 1,
            }
        }
        stats
    }
}

fn group_by<'a, T, F>(items: &[&'a T], parent_of: F) -> FxHashMap<&'a str, Vec<&'a T>>
where
    F: Fn(&'a T) -> Option<&'a str>,
{
    let mut map: FxHashMap<&'a str, Vec<&'a T>> = FxHashMap::default();
    for item in items {
        if let Some(parent) = parent_of(*item) {
            map.entry(parent).or_default().push(*item);
        }
    }
    map
}

fn mean_progress<'a, T, I>(items: I) -> f64
where
    T: Measurable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let (sum, count) = items
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), item| (sum + item.progress(), count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

pub struct Navigator<'a> {
    key_results_by_ambition: FxHashMap<&'a str, Vec<&'a AnnualKeyResult>>,
    objectives_by_ambition: FxHashMap<&'a str, Vec<&'a QuarterlyObjective>>,
    key_results_by_objective: FxHashMap<&'a str, Vec<&'a QuarterlyKeyResult>>,
    actions_by_key_result: FxHashMap<&'a str, Vec<&'a Action>>,
}

impl<'a> Navigator<'a> {
    /// Navigator over explicit collections.
    pub fn new<K, O, Q, A>(key_results: K, objectives: O, quarterly_key_results: Q, actions: A) -> Self
    where
        K: IntoIterator<Item = &'a AnnualKeyResult>,
        O: IntoIterator<Item = &'a QuarterlyObjective>,
        Q: IntoIterator<Item = &'a QuarterlyKeyResult>,
        A: IntoIterator<Item = &'a Action>,
    {
        let key_results: Vec<_> = key_results.into_iter().collect();
        let objectives: Vec<_> = objectives.into_iter().collect();
        let quarterly_key_results: Vec<_> = quarterly_key_results.into_iter().collect();
        let actions: Vec<_> = actions.into_iter().collect();

        Self {
            key_results_by_ambition: group_by(&key_results, |kr| Some(kr.ambition_id.as_str())),
            objectives_by_ambition: group_by(&objectives, |o| Some(o.ambition_id.as_str())),
            key_results_by_objective: group_by(&quarterly_key_results, |kr| {
                Some(kr.quarterly_objective_id.as_str())
            }),
            actions_by_key_result: group_by(&actions, |a| a.key_result_id()),
        }
    }

    /// Ground truth: every collection of the snapshot, unfiltered.
    pub fn unfiltered(snapshot: &'a Snapshot) -> Self {
        Self::new(
            &snapshot.key_results,
            &snapshot.quarterly_objectives,
            &snapshot.quarterly_key_results,
            &snapshot.actions,
        )
    }

    /// The filtered tree: filtered objectives and actions, with key results
    /// (which carry no filterable fields) taken from the snapshot.
    pub fn filtered(snapshot: &'a Snapshot, view: &FilteredView<'a>) -> Self {
        Self::new(
            &snapshot.key_results,
            view.objectives.iter().copied(),
            &snapshot.quarterly_key_results,
            view.actions.iter().copied(),
        )
    }

    pub fn key_results_for_ambition(&self, ambition_id: &str) -> &[&'a AnnualKeyResult] {
        children(&self.key_results_by_ambition, ambition_id)
    }

    pub fn objectives_for_ambition(&self, ambition_id: &str) -> &[&'a QuarterlyObjective] {
        children(&self.objectives_by_ambition, ambition_id)
    }

    pub fn key_results_for_objective(&self, objective_id: &str) -> &[&'a QuarterlyKeyResult] {
        children(&self.key_results_by_objective, objective_id)
    }

    pub fn actions_for_key_result(&self, key_result_id: &str) -> &[&'a Action] {
        children(&self.actions_by_key_result, key_result_id)
    }

    /// Every action under any key result of the objective.
    pub fn actions_for_objective(&self, objective_id: &str) -> Vec<&'a Action> {
        self.key_results_for_objective(objective_id)
            .iter()
            .flat_map(|kr| self.actions_for_key_result(&kr.id).iter().copied())
            .collect()
    }

    pub fn action_stats_for_objective(&self, objective_id: &str) -> ActionStats {
        ActionStats::tally(self.actions_for_objective(objective_id))
    }

    pub fn action_stats_for_ambition(&self, ambition: &Ambition) -> ActionStats {
        let actions: Vec<&Action> = self
            .objectives_for_ambition(&ambition.id)
            .iter()
            .flat_map(|o| self.actions_for_objective(&o.id))
            .collect();
        ActionStats::tally(actions)
    }

    /// Mean clamped progress of the objective's key results; 0 without any.
    pub fn objective_progress(&self, objective_id: &str) -> f64 {
        mean_progress(self.key_results_for_objective(objective_id).iter().copied())
    }

    /// Mean clamped progress of the ambition's annual key results; 0 without any.
    pub fn ambition_progress(&self, ambition_id: &str) -> f64 {
        mean_progress(self.key_results_for_ambition(ambition_id).iter().copied())
    }
}

/// One quarterly key result with its actions, for serialized tree output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyResultNode<'a> {
    #[serde(flatten)]
    pub key_result: &'a QuarterlyKeyResult,
    pub progress: f64,
    pub actions: Vec<&'a Action>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveNode<'a> {
    #[serde(flatten)]
    pub objective: &'a QuarterlyObjective,
    pub progress: f64,
    pub stats: ActionStats,
    pub key_results: Vec<KeyResultNode<'a>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbitionNode<'a> {
    #[serde(flatten)]
    pub ambition: &'a Ambition,
    pub progress: f64,
    pub stats: ActionStats,
    pub key_results: Vec<&'a AnnualKeyResult>,
    pub objectives: Vec<ObjectiveNode<'a>>,
}

impl<'a> Navigator<'a> {
    /// The whole subtree of each given ambition, in input order.
    pub fn tree(&self, ambitions: &[&'a Ambition]) -> Vec<AmbitionNode<'a>> {
        ambitions
            .iter()
            .map(|&ambition| AmbitionNode {
                ambition,
                progress: self.ambition_progress(&ambition.id),
                stats: self.action_stats_for_ambition(ambition),
                key_results: self.key_results_for_ambition(&ambition.id).to_vec(),
                objectives: self
                    .objectives_for_ambition(&ambition.id)
                    .iter()
                    .map(|&objective| self.objective_node(objective))
                    .collect(),
            })
            .collect()
    }

    fn objective_node(&self, objective: &'a QuarterlyObjective) -> ObjectiveNode<'a> {
        ObjectiveNode {
            objective,
            progress: self.objective_progress(&objective.id),
            stats: self.action_stats_for_objective(&objective.id),
            key_results: self
                .key_results_for_objective(&objective.id)
                .iter()
                .map(|&kr| KeyResultNode {
                    key_result: kr,
                    progress: kr.progress(),
                    actions: self.actions_for_key_result(&kr.id).to_vec(),
                })
                .collect(),
        }
    }
}

fn children<'m, 'a, T>(map: &'m FxHashMap<&'a str, Vec<&'a T>>, parent_id: &str) -> &'m [&'a T] {
    map.get(parent_id).map(Vec::as_slice).unwrap_or(&[])
}
