use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::checklist::{ChecklistItem, reference_checklist};
use crate::model::ids::TaskId;
use crate::model::task::{Task, USER_TASK_EFFORT};
use crate::model::week::WeekNumber;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("task title cannot be empty")]
    EmptyTitle,
}

//
// ─── REFERENCE SCHEDULE ────────────────────────────────────────────────────────
//

const REFERENCE_SCHEDULE: &[(u8, &[(&str, &str, &str)])] = &[
    (
        1,
        &[
            ("w1t1", "Start Intro to FinTech (HKU - edX)", "6 hrs"),
            ("w1t2", "Excel: Pivot tables & VLOOKUP (Coursera)", "3 hrs"),
            ("w1t3", "SQL basics (SQLBolt)", "2 hrs"),
        ],
    ),
    (
        2,
        &[
            ("w2t1", "Continue FinTech course", "4 hrs"),
            ("w2t2", "Complete SQL basics", "4 hrs"),
        ],
    ),
    (
        3,
        &[
            ("w3t1", "Finish Excel course + mini project", "6 hrs"),
            ("w3t2", "Start documenting notes for portfolio", "2 hrs"),
        ],
    ),
    (
        4,
        &[
            ("w4t1", "Finish FinTech course", "4 hrs"),
            ("w4t2", "Create simple Excel dashboard", "4 hrs"),
        ],
    ),
    (
        5,
        &[
            ("w5t1", "Business Analysis Fundamentals (Udemy)", "5 hrs"),
            ("w5t2", "Write user stories and acceptance criteria", "3 hrs"),
        ],
    ),
    (
        6,
        &[
            ("w6t1", "Start Product Management course (Coursera)", "5 hrs"),
            ("w6t2", "Map user journeys (Miro/Figma)", "3 hrs"),
        ],
    ),
    (
        7,
        &[
            ("w7t1", "API basics (Postman) - get free certificate", "3 hrs"),
            ("w7t2", "Combine workflows into first portfolio case study", "5 hrs"),
        ],
    ),
    (
        8,
        &[
            ("w8t1", "Payments 101 (Payments Association)", "4 hrs"),
            ("w8t2", "AML/KYC basics (Udemy)", "4 hrs"),
        ],
    ),
];

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Weekly task plan plus the fixed checklist.
///
/// Every id known to the catalog (week tasks and checklist items) is unique,
/// which lets progress be keyed by id alone. Runtime additions live only as
/// long as this value does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCatalog {
    weeks: BTreeMap<WeekNumber, Vec<Task>>,
    checklist: Vec<ChecklistItem>,
}

impl TaskCatalog {
    /// An empty plan with the given checklist.
    #[must_use]
    pub fn new(checklist: Vec<ChecklistItem>) -> Self {
        Self {
            weeks: BTreeMap::new(),
            checklist,
        }
    }

    /// The built-in plan: tasks for weeks 1-8 and the ten checklist items.
    #[must_use]
    pub fn reference() -> Self {
        let mut weeks = BTreeMap::new();
        for (week, tasks) in REFERENCE_SCHEDULE {
            // Reference weeks are all within the plan.
            let Ok(week) = WeekNumber::new(*week) else {
                continue;
            };
            let tasks = tasks
                .iter()
                .map(|(id, title, time)| Task::new(TaskId::new(*id), *title, *time))
                .collect();
            weeks.insert(week, tasks);
        }
        Self {
            weeks,
            checklist: reference_checklist(),
        }
    }

    /// Tasks planned for `week`, in insertion order.
    #[must_use]
    pub fn tasks_for_week(&self, week: WeekNumber) -> &[Task] {
        self.weeks.get(&week).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every planned task across all weeks, in week order.
    #[must_use]
    pub fn all_tasks(&self) -> Vec<&Task> {
        self.weeks.values().flatten().collect()
    }

    /// Weeks that currently have at least one task.
    pub fn weeks_with_tasks(&self) -> impl Iterator<Item = (WeekNumber, &[Task])> {
        self.weeks
            .iter()
            .filter(|(_, tasks)| !tasks.is_empty())
            .map(|(week, tasks)| (*week, tasks.as_slice()))
    }

    #[must_use]
    pub fn checklist(&self) -> &[ChecklistItem] {
        &self.checklist
    }

    /// Ids of everything that can be marked complete: planned tasks and
    /// checklist items.
    #[must_use]
    pub fn completable_ids(&self) -> BTreeSet<TaskId> {
        self.weeks
            .values()
            .flatten()
            .map(|task| task.id().clone())
            .chain(self.checklist.iter().map(|item| item.id().clone()))
            .collect()
    }

    #[must_use]
    pub fn contains(&self, id: &TaskId) -> bool {
        self.weeks.values().flatten().any(|task| task.id() == id)
            || self.checklist.iter().any(|item| item.id() == id)
    }

    /// Append a user task to `week` and return it.
    ///
    /// The id is `w{week}t{unix_millis}`, bumped until it is unique.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyTitle` if the title is blank after trimming;
    /// the catalog is left untouched.
    pub fn add_task(
        &mut self,
        week: WeekNumber,
        title: &str,
        now: DateTime<Utc>,
    ) -> Result<Task, CatalogError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CatalogError::EmptyTitle);
        }

        let mut stamp = now.timestamp_millis();
        let mut id = TaskId::new(format!("w{week}t{stamp}"));
        while self.contains(&id) {
            stamp += 1;
            id = TaskId::new(format!("w{week}t{stamp}"));
        }

        let task = Task::new(id, title, USER_TASK_EFFORT);
        self.weeks.entry(week).or_default().push(task.clone());
        Ok(task)
    }
}

impl Default for TaskCatalog {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn week(n: u8) -> WeekNumber {
        WeekNumber::new(n).unwrap()
    }

    #[test]
    fn reference_plan_covers_first_eight_weeks() {
        let catalog = TaskCatalog::reference();
        assert_eq!(catalog.tasks_for_week(week(1)).len(), 3);
        for n in 2..=8 {
            assert_eq!(catalog.tasks_for_week(week(n)).len(), 2, "week {n}");
        }
        for n in 9..=24 {
            assert!(catalog.tasks_for_week(week(n)).is_empty(), "week {n}");
        }
        assert_eq!(catalog.all_tasks().len(), 17);
        assert_eq!(catalog.completable_ids().len(), 27);
    }

    #[test]
    fn reference_ids_are_unique() {
        let catalog = TaskCatalog::reference();
        let total = catalog.all_tasks().len() + catalog.checklist().len();
        assert_eq!(catalog.completable_ids().len(), total);
    }

    #[test]
    fn add_task_appends_user_task() {
        let mut catalog = TaskCatalog::reference();
        let task = catalog
            .add_task(week(9), "  Build a KYC flow  ", fixed_now())
            .unwrap();

        assert_eq!(task.title(), "Build a KYC flow");
        assert_eq!(task.estimated_effort(), USER_TASK_EFFORT);
        assert_eq!(
            task.id().as_str(),
            format!("w9t{}", fixed_now().timestamp_millis())
        );
        assert_eq!(catalog.tasks_for_week(week(9)), &[task.clone()]);
        assert!(catalog.completable_ids().contains(task.id()));
    }

    #[test]
    fn add_task_same_instant_mints_distinct_ids() {
        let mut catalog = TaskCatalog::reference();
        let a = catalog.add_task(week(1), "first", fixed_now()).unwrap();
        let b = catalog.add_task(week(1), "second", fixed_now()).unwrap();

        assert_ne!(a.id(), b.id());
        assert_eq!(catalog.tasks_for_week(week(1)).len(), 5);
        assert_eq!(catalog.tasks_for_week(week(1))[4], b);
    }

    #[test]
    fn add_task_rejects_blank_titles() {
        let mut catalog = TaskCatalog::reference();
        let before = catalog.tasks_for_week(week(2)).to_vec();

        assert_eq!(
            catalog.add_task(week(2), "", fixed_now()),
            Err(CatalogError::EmptyTitle)
        );
        assert_eq!(
            catalog.add_task(week(2), "   ", fixed_now()),
            Err(CatalogError::EmptyTitle)
        );
        assert_eq!(catalog.tasks_for_week(week(2)), before.as_slice());
    }

    #[test]
    fn weeks_with_tasks_skips_empty_weeks() {
        let mut catalog = TaskCatalog::new(Vec::new());
        catalog.add_task(week(12), "late task", fixed_now()).unwrap();
        let weeks: Vec<u8> = catalog.weeks_with_tasks().map(|(w, _)| w.value()).collect();
        assert_eq!(weeks, vec![12]);
    }
}
