//! Dashboard roll-ups over the whole (unfiltered) snapshot.

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::model::{Action, ActionStatus, Measurable, Snapshot, Status};
use crate::core::time::days_until;

pub const DEFAULT_DEADLINE_HORIZON_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub active_ambitions: usize,
    pub active_objectives: usize,
    pub completed_actions: usize,
    /// Mean quarterly key-result progress, each capped at 100.
    pub overall_progress: f64,
    pub upcoming_deadlines: usize,
}

impl DashboardMetrics {
    pub fn compute(snapshot: &Snapshot, today: NaiveDate, horizon_days: u32) -> Self {
        let krs = &snapshot.quarterly_key_results;
        let overall_progress = if krs.is_empty() {
            0.0
        } else {
            krs.iter().map(|kr| kr.progress()).sum::<f64>() / krs.len() as f64
        };

        Self {
            active_ambitions: snapshot
                .ambitions
                .iter()
                .filter(|a| a.status == Status::Active)
                .count(),
            active_objectives: snapshot
                .quarterly_objectives
                .iter()
                .filter(|o| o.status == Status::Active)
                .count(),
            completed_actions: snapshot
                .actions
                .iter()
                .filter(|a| a.status == ActionStatus::Done)
                .count(),
            overall_progress,
            upcoming_deadlines: upcoming_deadlines(&snapshot.actions, today, horizon_days).len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingDeadline {
    pub id: String,
    pub title: String,
    pub deadline: NaiveDate,
    pub days_left: i64,
}

/// Actions due 1..=`horizon_days` days after `today`, soonest first.
/// Today and overdue deadlines are excluded.
pub fn upcoming_deadlines(actions: &[Action], today: NaiveDate, horizon_days: u32) -> Vec<UpcomingDeadline> {
    let horizon = i64::from(horizon_days);
    let mut out: Vec<UpcomingDeadline> = actions
        .iter()
        .filter_map(|a| {
            let deadline = a.deadline?;
            let days_left = days_until(deadline, today);
            (days_left > 0 && days_left <= horizon).then(|| UpcomingDeadline {
                id: a.id.clone(),
                title: a.title.clone(),
                deadline,
                days_left,
            })
        })
        .collect();
    out.sort_by(|a, b| a.days_left.cmp(&b.days_left).then_with(|| a.id.cmp(&b.id)));
    out
}
