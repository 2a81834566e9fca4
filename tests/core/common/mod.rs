#![allow(dead_code)]

use chrono::NaiveDate;
use oskar::core::model::{
    Action, ActionStatus, Ambition, AmbitionCategory, AnnualKeyResult, Priority, Quarter,
    QuarterlyKeyResult, QuarterlyObjective, Snapshot, Status,
};

pub fn ambition(id: &str, year: i32) -> Ambition {
    Ambition {
        id: id.to_string(),
        title: format!("Ambition {}", id),
        description: String::new(),
        year,
        category: AmbitionCategory::Other,
        priority: Priority::Medium,
        status: Status::Active,
    }
}

pub fn annual_key_result(id: &str, ambition_id: &str, current: f64, target: f64) -> AnnualKeyResult {
    AnnualKeyResult {
        id: id.to_string(),
        ambition_id: ambition_id.to_string(),
        title: format!("Annual KR {}", id),
        current,
        target,
        unit: "units".to_string(),
        priority: Priority::Medium,
    }
}

pub fn objective(id: &str, ambition_id: &str, quarter: Quarter, year: i32) -> QuarterlyObjective {
    QuarterlyObjective {
        id: id.to_string(),
        ambition_id: ambition_id.to_string(),
        title: format!("Objective {}", id),
        description: String::new(),
        quarter,
        year,
        status: Status::Active,
    }
}

pub fn key_result(id: &str, objective_id: &str, current: f64, target: f64) -> QuarterlyKeyResult {
    QuarterlyKeyResult {
        id: id.to_string(),
        quarterly_objective_id: objective_id.to_string(),
        title: format!("KR {}", id),
        current,
        target,
        unit: "units".to_string(),
        deadline: None,
    }
}

pub fn action(id: &str, key_result_id: &str, status: ActionStatus, labels: &[&str]) -> Action {
    Action {
        id: id.to_string(),
        quarterly_key_result_id: Some(key_result_id.to_string()),
        title: format!("Action {}", id),
        status,
        priority: Priority::Medium,
        labels: labels.iter().map(|l| l.to_string()).collect(),
        deadline: None,
    }
}

pub fn with_priority(mut action: Action, priority: Priority) -> Action {
    action.priority = priority;
    action
}

pub fn with_deadline(mut action: Action, deadline: NaiveDate) -> Action {
    action.deadline = Some(deadline);
    action
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A1 → O1 (Q1 2025) → K1 (50/100) → X1 (done, "mkt").
pub fn scenario_snapshot() -> Snapshot {
    Snapshot {
        ambitions: vec![ambition("A1", 2025)],
        key_results: vec![],
        quarterly_objectives: vec![objective("O1", "A1", Quarter::Q1, 2025)],
        quarterly_key_results: vec![key_result("K1", "O1", 50.0, 100.0)],
        actions: vec![action("X1", "K1", ActionStatus::Done, &["mkt"])],
    }
}

/// Three ambitions over two years, with one dangling and one unattached action.
///
/// ```text
/// A1 2025 ─┬─ AK1 30/60, AK2 120/100
///          ├─ O1 Q1 2025 ─┬─ K1 50/100 ─┬─ X1 done high [mkt]
///          │              │             └─ X2 todo medium [mkt, sales]
///          │              └─ K2 10/40 ─── X3 in_progress critical []
///          └─ O2 Q2 2025 ─── K3 0/0 ───── X4 todo low [ops]
/// A2 2025 ─┬─ AK3 5/0
///          └─ O3 Q1 2025 ─── K4 80/80 ─── X5 done high [sales]
/// A3 2024 ─── O4 Q4 2024 ─── K5 5/10 ──── X6 todo medium []
/// X7 → K404 (missing), todo high [mkt]
/// X8 → none, todo medium []
/// ```
pub fn sample_snapshot() -> Snapshot {
    let mut a3 = ambition("A3", 2024);
    a3.status = Status::Draft;
    let mut unattached = action("X8", "", ActionStatus::Todo, &[]);
    unattached.quarterly_key_result_id = None;

    Snapshot {
        ambitions: vec![ambition("A1", 2025), ambition("A2", 2025), a3],
        key_results: vec![
            annual_key_result("AK1", "A1", 30.0, 60.0),
            annual_key_result("AK2", "A1", 120.0, 100.0),
            annual_key_result("AK3", "A2", 5.0, 0.0),
        ],
        quarterly_objectives: vec![
            objective("O1", "A1", Quarter::Q1, 2025),
            objective("O2", "A1", Quarter::Q2, 2025),
            objective("O3", "A2", Quarter::Q1, 2025),
            objective("O4", "A3", Quarter::Q4, 2024),
        ],
        quarterly_key_results: vec![
            key_result("K1", "O1", 50.0, 100.0),
            key_result("K2", "O1", 10.0, 40.0),
            key_result("K3", "O2", 0.0, 0.0),
            key_result("K4", "O3", 80.0, 80.0),
            key_result("K5", "O4", 5.0, 10.0),
        ],
        actions: vec![
            with_priority(action("X1", "K1", ActionStatus::Done, &["mkt"]), Priority::High),
            action("X2", "K1", ActionStatus::Todo, &["mkt", "sales"]),
            with_priority(action("X3", "K2", ActionStatus::InProgress, &[]), Priority::Critical),
            with_priority(action("X4", "K3", ActionStatus::Todo, &["ops"]), Priority::Low),
            with_priority(action("X5", "K4", ActionStatus::Done, &["sales"]), Priority::High),
            action("X6", "K5", ActionStatus::Todo, &[]),
            with_priority(action("X7", "K404", ActionStatus::Todo, &["mkt"]), Priority::High),
            unattached,
        ],
    }
}

pub fn ids<T, F>(items: &[&T], id: F) -> Vec<String>
where
    F: Fn(&T) -> &str,
{
    items.iter().map(|item| id(item).to_string()).collect()
}
