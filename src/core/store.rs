//! Entity store adapter.
//!
//! The planning application owns persistence; this crate only reads
//! owner-scoped snapshots. The command-line surface loads them from a JSON
//! export with the five collections at the top level.

use rustc_hash::FxHashSet;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::core::error::OskarError;
use crate::core::model::{EntityKind, Snapshot};

/// A child whose parent id names nothing in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    pub kind: EntityKind,
    pub id: String,
    pub missing_parent: String,
}

/// Read and parse a snapshot file; dangling references are reported, not rejected.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, OskarError> {
    if !path.exists() {
        return Err(OskarError::NotFound(format!(
            "snapshot file {}",
            path.display()
        )));
    }
    let bytes = fs::read(path).map_err(OskarError::IoError)?;
    let snapshot: Snapshot = serde_json::from_slice(&bytes).map_err(|e| {
        OskarError::ValidationError(format!("Invalid snapshot JSON in {}: {e}", path.display()))
    })?;

    info!(
        path = %path.display(),
        ambitions = snapshot.ambitions.len(),
        key_results = snapshot.key_results.len(),
        objectives = snapshot.quarterly_objectives.len(),
        quarterly_key_results = snapshot.quarterly_key_results.len(),
        actions = snapshot.actions.len(),
        "snapshot loaded"
    );
    for dangling in dangling_references(&snapshot) {
        warn!(
            kind = %dangling.kind,
            id = %dangling.id,
            missing_parent = %dangling.missing_parent,
            "parent not found; entity is excluded from ancestor-based filters"
        );
    }
    Ok(snapshot)
}

pub fn dangling_references(snapshot: &Snapshot) -> Vec<DanglingReference> {
    let ambitions: FxHashSet<&str> = snapshot.ambitions.iter().map(|a| a.id.as_str()).collect();
    let objectives: FxHashSet<&str> = snapshot
        .quarterly_objectives
        .iter()
        .map(|o| o.id.as_str())
        .collect();
    let key_results: FxHashSet<&str> = snapshot
        .quarterly_key_results
        .iter()
        .map(|kr| kr.id.as_str())
        .collect();

    let mut out = Vec::new();
    let mut check = |kind: EntityKind, id: &str, parent: &str, known: &FxHashSet<&str>| {
        if !known.contains(parent) {
            out.push(DanglingReference {
                kind,
                id: id.to_string(),
                missing_parent: parent.to_string(),
            });
        }
    };

    for kr in &snapshot.key_results {
        check(EntityKind::AnnualKeyResult, &kr.id, &kr.ambition_id, &ambitions);
    }
    for objective in &snapshot.quarterly_objectives {
        check(EntityKind::QuarterlyObjective, &objective.id, &objective.ambition_id, &ambitions);
    }
    for kr in &snapshot.quarterly_key_results {
        check(
            EntityKind::QuarterlyKeyResult,
            &kr.id,
            &kr.quarterly_objective_id,
            &objectives,
        );
    }
    for action in &snapshot.actions {
        if let Some(kr_id) = action.key_result_id() {
            check(EntityKind::Action, &action.id, kr_id, &key_results);
        }
    }
    out
}
