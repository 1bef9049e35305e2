use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::ids::TaskId;

/// Percentage of `known` ids present in `completed`, rounded half up.
///
/// Ids in `completed` that are not in `known` do not count. An empty `known`
/// set yields 0.
#[must_use]
pub fn completion_percent(completed: &BTreeSet<TaskId>, known: &BTreeSet<TaskId>) -> u8 {
    let total = known.len();
    if total == 0 {
        return 0;
    }
    let done = completed.intersection(known).count();
    // round(100 * done / total) with halves going up, in integers.
    let rounded = (200 * done + total) / (2 * total);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}

/// Which entries are complete, plus the derived completion percent.
///
/// Persisted as `{"completedTasks": {"<id>": true, ...}, "percent": n}`.
/// The stored percent is only a hint; owners call [`ProgressState::recounted`]
/// once the set of known ids is available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ProgressRecord", into = "ProgressRecord")]
pub struct ProgressState {
    completed: BTreeSet<TaskId>,
    percent: u8,
}

impl ProgressState {
    /// The state after a reset: nothing completed, 0%.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn completed(&self) -> &BTreeSet<TaskId> {
        &self.completed
    }

    #[must_use]
    pub fn percent(&self) -> u8 {
        self.percent
    }

    #[must_use]
    pub fn is_completed(&self, id: &TaskId) -> bool {
        self.completed.contains(id)
    }

    /// Flip the completion of `id` and recompute the percent against `known`.
    ///
    /// Applying the same toggle twice restores the original completed set.
    #[must_use]
    pub fn toggled(&self, id: &TaskId, known: &BTreeSet<TaskId>) -> Self {
        let mut completed = self.completed.clone();
        if !completed.remove(id) {
            completed.insert(id.clone());
        }
        let percent = completion_percent(&completed, known);
        Self { completed, percent }
    }

    /// Same completed set, percent recomputed against `known`.
    #[must_use]
    pub fn recounted(self, known: &BTreeSet<TaskId>) -> Self {
        let percent = completion_percent(&self.completed, known);
        Self {
            completed: self.completed,
            percent,
        }
    }
}

//
// ─── PERSISTED SHAPE ───────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressRecord {
    #[serde(rename = "completedTasks")]
    completed_tasks: BTreeMap<TaskId, bool>,
    percent: u64,
}

impl From<ProgressRecord> for ProgressState {
    fn from(record: ProgressRecord) -> Self {
        // Older snapshots counted checklist items against schedule tasks only,
        // so values past 100 occur in the wild.
        let percent = u8::try_from(record.percent.min(100)).unwrap_or(100);
        let completed = record
            .completed_tasks
            .into_iter()
            .filter_map(|(id, done)| done.then_some(id))
            .collect();
        Self { completed, percent }
    }
}

impl From<ProgressState> for ProgressRecord {
    fn from(state: ProgressState) -> Self {
        Self {
            completed_tasks: state.completed.into_iter().map(|id| (id, true)).collect(),
            percent: u64::from(state.percent),
        }
    }
}
