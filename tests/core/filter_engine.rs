mod common;

use common::*;
use oskar::core::engine::{FilterEngine, FilterStats, apply, available_labels, available_years};
use oskar::core::filter::{FilterCommand, FilterField, FilterState, RawFilter};
use oskar::core::model::{ActionStatus, Measurable, Priority, Quarter};

fn action_ids(snapshot: &oskar::core::model::Snapshot, filters: &FilterState) -> Vec<String> {
    let view = apply(snapshot, filters);
    ids(&view.actions, |a| a.id.as_str())
}

fn ambition_ids(snapshot: &oskar::core::model::Snapshot, filters: &FilterState) -> Vec<String> {
    let view = apply(snapshot, filters);
    ids(&view.ambitions, |a| a.id.as_str())
}

fn objective_ids(snapshot: &oskar::core::model::Snapshot, filters: &FilterState) -> Vec<String> {
    let view = apply(snapshot, filters);
    ids(&view.objectives, |o| o.id.as_str())
}

#[test]
fn test_empty_filter_is_identity() {
    let snapshot = sample_snapshot();
    let view = apply(&snapshot, &FilterState::new());

    assert_eq!(view.actions.len(), snapshot.actions.len());
    assert_eq!(view.ambitions.len(), snapshot.ambitions.len());
    assert_eq!(view.objectives.len(), snapshot.quarterly_objectives.len());
    for (filtered, original) in view.actions.iter().zip(&snapshot.actions) {
        assert_eq!(*filtered, original);
    }
    assert_eq!(
        view.stats,
        FilterStats {
            total_actions: 8,
            filtered_actions: 8,
            ambitions_count: 3,
            objectives_count: 4,
        }
    );
}

#[test]
fn test_status_filter_is_exact() {
    let snapshot = sample_snapshot();
    let subsets: [&[ActionStatus]; 4] = [
        &[ActionStatus::Todo],
        &[ActionStatus::Done],
        &[ActionStatus::InProgress, ActionStatus::Done],
        &[ActionStatus::Todo, ActionStatus::InProgress, ActionStatus::Done],
    ];
    for subset in subsets {
        let filters = subset
            .iter()
            .fold(FilterState::new(), |f, s| f.with_status(*s));
        let view = apply(&snapshot, &filters);

        assert!(view.actions.iter().all(|a| subset.contains(&a.status)));
        let expected = snapshot
            .actions
            .iter()
            .filter(|a| subset.contains(&a.status))
            .count();
        assert_eq!(view.actions.len(), expected, "subset {:?}", subset);
    }
}

#[test]
fn test_applying_twice_is_idempotent() {
    let snapshot = sample_snapshot();
    let filters = FilterState::new()
        .with_quarter(Quarter::Q1)
        .with_label("mkt")
        .with_priority(Priority::High);

    let first = apply(&snapshot, &filters);
    let second = apply(&snapshot, &filters);
    assert_eq!(first.actions, second.actions);
    assert_eq!(first.ambitions, second.ambitions);
    assert_eq!(first.objectives, second.objectives);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn test_direct_ambition_selection_short_circuits() {
    let snapshot = sample_snapshot();
    // A2 owns O3, a Q1 objective, but is not selected.
    let filters = FilterState::new()
        .with_ambition("A1")
        .with_quarter(Quarter::Q1);
    assert_eq!(ambition_ids(&snapshot, &filters), vec!["A1"]);
    assert_eq!(objective_ids(&snapshot, &filters), vec!["O1"]);
    assert_eq!(action_ids(&snapshot, &filters), vec!["X1", "X2", "X3"]);
}

#[test]
fn test_selected_ambition_shows_even_without_matching_objective() {
    let snapshot = sample_snapshot();
    let filters = FilterState::new()
        .with_ambition("A3")
        .with_quarter(Quarter::Q1);
    assert_eq!(ambition_ids(&snapshot, &filters), vec!["A3"]);
    assert!(objective_ids(&snapshot, &filters).is_empty());
    assert!(action_ids(&snapshot, &filters).is_empty());
}

#[test]
fn test_quarter_pulls_in_ambitions_transitively() {
    let snapshot = sample_snapshot();
    let filters = FilterState::new().with_quarter(Quarter::Q2);
    assert_eq!(ambition_ids(&snapshot, &filters), vec!["A1"]);
    assert_eq!(objective_ids(&snapshot, &filters), vec!["O2"]);
    assert_eq!(action_ids(&snapshot, &filters), vec!["X4"]);
}

#[test]
fn test_transitive_match_needs_one_objective_satisfying_every_active_field() {
    let snapshot = sample_snapshot();
    // A1 has a Q2 objective and a 2025 objective, but A3's only objective is Q4 2024.
    let filters = FilterState::new()
        .with_quarter(Quarter::Q4)
        .with_year(2025);
    assert!(ambition_ids(&snapshot, &filters).is_empty());

    let filters = FilterState::new()
        .with_quarter(Quarter::Q4)
        .with_year(2024);
    assert_eq!(ambition_ids(&snapshot, &filters), vec!["A3"]);
}

#[test]
fn test_year_and_objective_filters_pull_in_ambitions() {
    let snapshot = sample_snapshot();
    let by_year = FilterState::new().with_year(2024);
    assert_eq!(ambition_ids(&snapshot, &by_year), vec!["A3"]);
    assert_eq!(action_ids(&snapshot, &by_year), vec!["X6"]);

    let by_objective = FilterState::new().with_objective("O3");
    assert_eq!(ambition_ids(&snapshot, &by_objective), vec!["A2"]);
    assert_eq!(objective_ids(&snapshot, &by_objective), vec!["O3"]);
    assert_eq!(action_ids(&snapshot, &by_objective), vec!["X5"]);
}

#[test]
fn test_action_level_fields_do_not_touch_ambitions_or_objectives() {
    let snapshot = sample_snapshot();
    let filters = FilterState::new()
        .with_priority(Priority::Critical)
        .with_status(ActionStatus::InProgress)
        .with_label("nothing-has-this");

    let view = apply(&snapshot, &filters);
    assert!(view.actions.is_empty());
    assert_eq!(view.ambitions.len(), 3);
    assert_eq!(view.objectives.len(), 4);
}

#[test]
fn test_labels_intersect_rather_than_subset() {
    let snapshot = sample_snapshot();
    let filters = FilterState::new().with_label("sales").with_label("ops");
    assert_eq!(action_ids(&snapshot, &filters), vec!["X2", "X4", "X5"]);
}

#[test]
fn test_priority_filter_applies_to_action_itself() {
    let snapshot = sample_snapshot();
    let filters = FilterState::new().with_priority(Priority::High);
    // X7 is dangling but priority needs no ancestor.
    assert_eq!(action_ids(&snapshot, &filters), vec!["X1", "X5", "X7"]);
}

#[test]
fn test_ambition_filter_reaches_actions_through_objective() {
    let snapshot = sample_snapshot();
    let filters = FilterState::new().with_ambition("A2");
    assert_eq!(ambition_ids(&snapshot, &filters), vec!["A2"]);
    assert_eq!(objective_ids(&snapshot, &filters), vec!["O3"]);
    assert_eq!(action_ids(&snapshot, &filters), vec!["X5"]);
}

#[test]
fn test_dangling_actions_fail_every_ancestor_filter() {
    let snapshot = sample_snapshot();
    let ancestor_filters = [
        FilterState::new().with_objective("O1"),
        FilterState::new().with_ambition("A1"),
        FilterState::new().with_quarter(Quarter::Q1),
        FilterState::new().with_year(2025),
    ];
    for filters in &ancestor_filters {
        let found = action_ids(&snapshot, filters);
        assert!(!found.contains(&"X7".to_string()), "{:?}", filters);
        assert!(!found.contains(&"X8".to_string()), "{:?}", filters);
    }

    let by_status = action_ids(&snapshot, &FilterState::new().with_status(ActionStatus::Todo));
    assert_eq!(by_status, vec!["X2", "X4", "X6", "X7", "X8"]);
}

#[test]
fn test_action_whose_objective_is_missing_is_excluded() {
    let mut snapshot = sample_snapshot();
    snapshot.quarterly_key_results.push(key_result("K9", "O404", 1.0, 2.0));
    snapshot.actions.push(action("X9", "K9", ActionStatus::Todo, &[]));

    let by_objective = action_ids(&snapshot, &FilterState::new().with_objective("O1"));
    assert!(!by_objective.contains(&"X9".to_string()));
    let by_status = action_ids(&snapshot, &FilterState::new().with_status(ActionStatus::Todo));
    assert!(by_status.contains(&"X9".to_string()));
}

#[test]
fn test_unknown_filter_values_match_nothing() {
    let snapshot = sample_snapshot();
    let filters = FilterState::new().toggled(FilterField::Quarters, "Q9");
    assert!(filters.has_active_filters());

    let view = apply(&snapshot, &filters);
    assert!(view.actions.is_empty());
    assert!(view.objectives.is_empty());
    assert!(view.ambitions.is_empty());

    let statuses = FilterState::new().toggled(FilterField::Statuses, "archived");
    let view = apply(&snapshot, &statuses);
    assert!(view.actions.is_empty());
    assert_eq!(view.ambitions.len(), 3);
}

#[test]
fn test_unknown_value_beside_a_known_one_keeps_the_known_match() {
    let snapshot = sample_snapshot();
    let filters = FilterState::new()
        .toggled(FilterField::Quarters, "Q2")
        .toggled(FilterField::Quarters, "Q9");
    assert_eq!(objective_ids(&snapshot, &filters), vec!["O2"]);
}

#[test]
fn test_duplicate_raw_values_collapse() {
    let raw: RawFilter = serde_json::from_value(serde_json::json!({
        "quarters": ["Q1", "q1", "Q1"],
        "labels": ["mkt", "mkt"],
    }))
    .unwrap();
    let filters = FilterState::from(raw);
    assert_eq!(filters.active_filter_count(), 2);

    let snapshot = sample_snapshot();
    let once = FilterState::new().with_quarter(Quarter::Q1).with_label("mkt");
    assert_eq!(action_ids(&snapshot, &filters), action_ids(&snapshot, &once));
}

#[test]
fn test_filter_commands_compute_next_state() {
    let snapshot = sample_snapshot();
    let state = FilterState::new()
        .apply(FilterCommand::Toggle {
            field: FilterField::Years,
            token: "2024".into(),
        })
        .apply(FilterCommand::Toggle {
            field: FilterField::Labels,
            token: "ops".into(),
        });
    assert_eq!(state.active_filter_count(), 2);
    assert!(action_ids(&snapshot, &state).is_empty());

    let replaced = state.apply(FilterCommand::Replace(FilterState::new().with_label("ops")));
    assert_eq!(action_ids(&snapshot, &replaced), vec!["X4"]);
    // The previous state is untouched.
    assert!(state.years.contains(&2024));

    let cleared = replaced.apply(FilterCommand::ClearAll);
    assert!(!cleared.has_active_filters());
    assert_eq!(action_ids(&snapshot, &cleared).len(), 8);
}

#[test]
fn test_engine_predicates_agree_with_projections() {
    let snapshot = sample_snapshot();
    let filters = FilterState::new().with_quarter(Quarter::Q1);
    let engine = FilterEngine::new(&snapshot, &filters);
    let view = engine.view();

    for action in &snapshot.actions {
        let listed = view.actions.iter().any(|a| a.id == action.id);
        assert_eq!(engine.action_matches(action), listed, "{}", action.id);
    }
    for ambition in &snapshot.ambitions {
        let listed = view.ambitions.iter().any(|a| a.id == ambition.id);
        assert_eq!(engine.ambition_matches(ambition), listed, "{}", ambition.id);
    }
    assert_eq!(engine.filters(), &filters);
}

#[test]
fn test_stats_count_each_projection() {
    let snapshot = sample_snapshot();
    let view = apply(&snapshot, &FilterState::new().with_quarter(Quarter::Q1));
    assert_eq!(
        view.stats,
        FilterStats {
            total_actions: 8,
            filtered_actions: 4,
            ambitions_count: 2,
            objectives_count: 2,
        }
    );
}

#[test]
fn test_available_labels_and_years() {
    let snapshot = sample_snapshot();
    assert_eq!(available_labels(&snapshot.actions), vec!["mkt", "ops", "sales"]);
    assert_eq!(available_years(&snapshot.quarterly_objectives), vec![2025, 2024]);
    assert!(available_labels(&[]).is_empty());
}

#[test]
fn test_scenario_quarter_filter() {
    let snapshot = scenario_snapshot();
    let filters = FilterState::new().with_quarter(Quarter::Q1);
    let engine = FilterEngine::new(&snapshot, &filters);

    assert_eq!(ambition_ids(&snapshot, &filters), vec!["A1"]);
    assert_eq!(objective_ids(&snapshot, &filters), vec!["O1"]);
    assert!(engine.action_matches(&snapshot.actions[0]));
    assert_eq!(snapshot.quarterly_key_results[0].progress(), 50.0);
    assert_eq!(snapshot.quarterly_key_results[0].progress_percent(), 50);
}

#[test]
fn test_scenario_status_filter() {
    let snapshot = scenario_snapshot();
    let filters = FilterState::new().with_status(ActionStatus::Todo);
    let view = apply(&snapshot, &filters);

    assert!(view.actions.is_empty());
    assert_eq!(ids(&view.ambitions, |a| a.id.as_str()), vec!["A1"]);
    assert_eq!(ids(&view.objectives, |o| o.id.as_str()), vec!["O1"]);
}

#[test]
fn test_scenario_dangling_key_result() {
    let mut snapshot = scenario_snapshot();
    snapshot
        .actions
        .push(action("X2", "K-missing", ActionStatus::Todo, &[]));
    let filters = FilterState::new().with_objective("O1");
    assert_eq!(action_ids(&snapshot, &filters), vec!["X1"]);
}

#[test]
fn test_zero_target_progress_is_zero() {
    let kr = key_result("K0", "O1", 25.0, 0.0);
    assert_eq!(kr.progress(), 0.0);
    assert_eq!(kr.raw_progress(), 0.0);
    assert!(!kr.progress().is_nan());
}

#[test]
fn test_ids_and_labels_match_verbatim() {
    let mut snapshot = sample_snapshot();
    snapshot
        .quarterly_objectives
        .push(objective(" O9 ", "A1", Quarter::Q3, 2025));
    snapshot
        .quarterly_key_results
        .push(key_result("K9", " O9 ", 10.0, 100.0));
    snapshot
        .actions
        .push(action("X9", "K9", ActionStatus::Todo, &[" urgent"]));

    assert!(available_labels(&snapshot.actions).contains(&" urgent".to_string()));

    let padded = FilterState::new().toggled(FilterField::Labels, " urgent");
    assert_eq!(action_ids(&snapshot, &padded), vec!["X9"]);
    assert!(padded.labels.unrecognized().next().is_none());
    let bare = FilterState::new().toggled(FilterField::Labels, "urgent");
    assert!(action_ids(&snapshot, &bare).is_empty());

    let by_objective = FilterState::new().toggled(FilterField::ObjectiveIds, " O9 ");
    assert_eq!(objective_ids(&snapshot, &by_objective), vec![" O9 "]);
    assert_eq!(action_ids(&snapshot, &by_objective), vec!["X9"]);
    let trimmed = FilterState::new().toggled(FilterField::ObjectiveIds, "O9");
    assert!(action_ids(&snapshot, &trimmed).is_empty());

    let json = serde_json::to_string(&padded).unwrap();
    let back: FilterState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, padded);
}
