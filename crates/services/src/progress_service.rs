use std::sync::Arc;

use fasttrack_core::model::{ProgressState, TaskCatalog, TaskId};
use storage::repository::ProgressRepository;
use tracing::{debug, warn};

use crate::error::ProgressError;

/// Owns the completion state and writes it through on every change.
pub struct ProgressService {
    repo: Arc<dyn ProgressRepository>,
    state: ProgressState,
}

impl ProgressService {
    /// Rehydrate from storage, falling back to the empty state.
    ///
    /// The percent is recounted against `catalog`, since the stored value may
    /// have been computed over tasks this session no longer has.
    pub async fn open(repo: Arc<dyn ProgressRepository>, catalog: &TaskCatalog) -> Self {
        let state = Self::load(repo.as_ref())
            .await
            .recounted(&catalog.completable_ids());
        Self { repo, state }
    }

    /// Read the persisted snapshot.
    ///
    /// Never fails: a missing, unreadable or malformed snapshot yields
    /// `ProgressState::empty()`.
    pub async fn load(repo: &dyn ProgressRepository) -> ProgressState {
        match repo.load_progress().await {
            Ok(Some(state)) => {
                debug!(
                    completed = state.completed().len(),
                    percent = state.percent(),
                    "loaded progress"
                );
                state
            }
            Ok(None) => ProgressState::empty(),
            Err(err) => {
                warn!(error = %err, "ignoring unreadable progress snapshot");
                ProgressState::empty()
            }
        }
    }

    #[must_use]
    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    #[must_use]
    pub fn is_completed(&self, id: &TaskId) -> bool {
        self.state.is_completed(id)
    }

    /// Flip `task_id` and persist.
    ///
    /// The percent is recomputed against every id the catalog currently knows,
    /// including runtime additions and checklist items.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Persist` if the write fails; the in-memory state
    /// is unchanged in that case.
    pub async fn toggle(
        &mut self,
        task_id: &TaskId,
        catalog: &TaskCatalog,
    ) -> Result<&ProgressState, ProgressError> {
        if !catalog.contains(task_id) {
            debug!(task_id = %task_id, "toggling id unknown to the catalog");
        }
        let next = self.state.toggled(task_id, &catalog.completable_ids());
        self.commit(next).await
    }

    /// Clear every completion and persist.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Persist` if the write fails.
    pub async fn reset(&mut self) -> Result<&ProgressState, ProgressError> {
        self.commit(ProgressState::empty()).await
    }

    async fn commit(&mut self, next: ProgressState) -> Result<&ProgressState, ProgressError> {
        self.repo.save_progress(&next).await?;
        self.state = next;
        Ok(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use fasttrack_core::model::reference_checklist;
    use fasttrack_core::time::fixed_now;
    use storage::repository::{InMemoryRepository, KeyValueRepository, PROGRESS_KEY, StorageError};

    struct FailingRepo;

    #[async_trait]
    impl ProgressRepository for FailingRepo {
        async fn load_progress(&self) -> Result<Option<ProgressState>, StorageError> {
            Err(StorageError::Connection("disk unplugged".into()))
        }

        async fn save_progress(&self, _state: &ProgressState) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk unplugged".into()))
        }
    }

    fn twelve_task_catalog() -> TaskCatalog {
        let mut catalog = TaskCatalog::new(reference_checklist());
        let week = fasttrack_core::model::WeekNumber::first();
        catalog.add_task(week, "seeded one", fixed_now()).unwrap();
        catalog.add_task(week, "seeded two", fixed_now()).unwrap();
        catalog
    }

    #[tokio::test]
    async fn open_without_snapshot_is_empty() {
        let repo = InMemoryRepository::new();
        let service = ProgressService::open(Arc::new(repo), &TaskCatalog::reference()).await;
        assert_eq!(service.state(), &ProgressState::empty());
    }

    #[tokio::test]
    async fn open_with_garbage_snapshot_is_empty() {
        let repo = InMemoryRepository::new();
        repo.put(PROGRESS_KEY, "[1, 2, 3]").await.unwrap();
        let service = ProgressService::open(Arc::new(repo), &TaskCatalog::reference()).await;
        assert_eq!(service.state(), &ProgressState::empty());
    }

    #[tokio::test]
    async fn open_with_failing_backend_is_empty() {
        let catalog = TaskCatalog::reference();
        let service = ProgressService::open(Arc::new(FailingRepo), &catalog).await;
        assert_eq!(service.state(), &ProgressState::empty());
    }

    #[tokio::test]
    async fn three_of_twelve_toggled_is_25_percent() {
        let catalog = twelve_task_catalog();
        assert_eq!(catalog.completable_ids().len(), 12);
        let first_task = catalog.all_tasks()[0].id().clone();

        let mut service = ProgressService::open(Arc::new(InMemoryRepository::new()), &catalog).await;
        service.toggle(&first_task, &catalog).await.unwrap();
        service.toggle(&TaskId::new("c1"), &catalog).await.unwrap();
        let state = service.toggle(&TaskId::new("c2"), &catalog).await.unwrap();

        assert_eq!(state.percent(), 25);
    }

    #[tokio::test]
    async fn toggle_writes_through() {
        let repo = InMemoryRepository::new();
        let catalog = TaskCatalog::reference();
        let mut service = ProgressService::open(Arc::new(repo.clone()), &catalog).await;

        service.toggle(&TaskId::new("w1t1"), &catalog).await.unwrap();

        let persisted = repo.load_progress().await.unwrap();
        assert_eq!(persisted.as_ref(), Some(service.state()));
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_state() {
        let catalog = TaskCatalog::reference();
        let mut service = ProgressService::open(Arc::new(FailingRepo), &catalog).await;

        let result = service.toggle(&TaskId::new("w1t1"), &catalog).await;

        assert!(matches!(result, Err(ProgressError::Persist(_))));
        assert!(!service.is_completed(&TaskId::new("w1t1")));
    }

    #[tokio::test]
    async fn reset_clears_and_persists() {
        let repo = InMemoryRepository::new();
        let catalog = TaskCatalog::reference();
        let mut service = ProgressService::open(Arc::new(repo.clone()), &catalog).await;
        service.toggle(&TaskId::new("c5"), &catalog).await.unwrap();

        let state = service.reset().await.unwrap();
        assert_eq!(state, &ProgressState::empty());

        let reopened = ProgressService::open(Arc::new(repo), &catalog).await;
        assert_eq!(reopened.state(), &ProgressState::empty());
    }

    #[tokio::test]
    async fn open_recounts_stored_percent() {
        let repo = InMemoryRepository::new();
        repo.put(PROGRESS_KEY, r#"{"completedTasks":{"c1":true},"percent":100}"#)
            .await
            .unwrap();

        let service = ProgressService::open(Arc::new(repo), &TaskCatalog::reference()).await;

        assert!(service.is_completed(&TaskId::new("c1")));
        assert_eq!(service.state().percent(), 4);
    }

    #[tokio::test]
    async fn open_keeps_completions_of_oversized_snapshot() {
        let catalog = TaskCatalog::reference();
        let mut completed: Vec<String> = catalog
            .all_tasks()
            .iter()
            .map(|task| format!("\"{}\":true", task.id()))
            .collect();
        completed.push("\"c1\":true".to_string());
        let raw = format!(r#"{{"completedTasks":{{{}}},"percent":106}}"#, completed.join(","));
        let repo = InMemoryRepository::new();
        repo.put(PROGRESS_KEY, &raw).await.unwrap();

        let service = ProgressService::open(Arc::new(repo), &catalog).await;

        assert_eq!(service.state().completed().len(), 18);
        // 18 of 27 known ids
        assert_eq!(service.state().percent(), 67);
    }
}
