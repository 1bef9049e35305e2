use std::path::{Path, PathBuf};
use std::sync::Arc;

use fasttrack_core::model::{
    CvField, CvFields, ProgressState, QuestionId, QuizScore, QuizSession, Task, TaskCatalog,
    TaskId, WeekNumber, render_cv_text,
};
use storage::repository::Storage;
use tracing::info;

use crate::Clock;
use crate::error::{AppServicesError, PlannerError};
use crate::export;
use crate::progress_service::ProgressService;

/// The planner's single owned state: catalog, progress, CV and quiz.
///
/// Every mutation goes through `&mut self`; callers re-read state afterwards.
pub struct AppServices {
    clock: Clock,
    catalog: TaskCatalog,
    progress: ProgressService,
    cv: CvFields,
    quiz: QuizSession,
    week: WeekNumber,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::with_storage(&storage, clock).await)
    }

    /// Build services over an existing storage bundle with the reference plan.
    pub async fn with_storage(storage: &Storage, clock: Clock) -> Self {
        Self::with_catalog(storage, clock, TaskCatalog::reference()).await
    }

    pub async fn with_catalog(storage: &Storage, clock: Clock, catalog: TaskCatalog) -> Self {
        let progress = ProgressService::open(Arc::clone(&storage.progress), &catalog).await;
        info!(
            tasks = catalog.all_tasks().len(),
            checklist = catalog.checklist().len(),
            percent = progress.state().percent(),
            "planner ready"
        );
        Self {
            clock,
            catalog,
            progress,
            cv: CvFields::default(),
            quiz: QuizSession::default(),
            week: WeekNumber::first(),
        }
    }

    // ─── Schedule ──────────────────────────────────────────────────────────────

    #[must_use]
    pub fn catalog(&self) -> &TaskCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn current_week(&self) -> WeekNumber {
        self.week
    }

    pub fn select_week(&mut self, week: WeekNumber) {
        self.week = week;
    }

    pub fn next_week(&mut self) -> WeekNumber {
        self.week = self.week.next();
        self.week
    }

    pub fn prev_week(&mut self) -> WeekNumber {
        self.week = self.week.prev();
        self.week
    }

    #[must_use]
    pub fn tasks_for_week(&self, week: WeekNumber) -> &[Task] {
        self.catalog.tasks_for_week(week)
    }

    /// Add a session-only task to the currently selected week.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::Catalog` for a blank title; nothing changes.
    pub fn add_task(&mut self, title: &str) -> Result<Task, PlannerError> {
        let task = self
            .catalog
            .add_task(self.week, title, self.clock.now())?;
        info!(week = %self.week, task_id = %task.id(), "added task");
        Ok(task)
    }

    // ─── Progress ──────────────────────────────────────────────────────────────

    #[must_use]
    pub fn progress(&self) -> &ProgressState {
        self.progress.state()
    }

    #[must_use]
    pub fn is_completed(&self, id: &TaskId) -> bool {
        self.progress.is_completed(id)
    }

    /// Toggle completion of a task or checklist item and persist it.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::Progress` if persisting fails.
    pub async fn toggle(&mut self, id: &TaskId) -> Result<&ProgressState, PlannerError> {
        let state = self.progress.toggle(id, &self.catalog).await?;
        info!(task_id = %id, percent = state.percent(), "toggled");
        Ok(state)
    }

    /// Clear all completions and persist.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::Progress` if persisting fails.
    pub async fn reset_progress(&mut self) -> Result<&ProgressState, PlannerError> {
        let state = self.progress.reset().await?;
        info!("progress reset");
        Ok(state)
    }

    // ─── CV ────────────────────────────────────────────────────────────────────

    #[must_use]
    pub fn cv(&self) -> &CvFields {
        &self.cv
    }

    pub fn set_cv_field(&mut self, field: CvField, value: impl Into<String>) {
        self.cv.set(field, value);
    }

    /// Text for the clipboard; identical to the `cv.txt` download.
    #[must_use]
    pub fn cv_text(&self) -> String {
        render_cv_text(&self.cv)
    }

    /// # Errors
    ///
    /// Returns `PlannerError::Export` if the file cannot be written.
    pub fn save_cv(&self, dir: &Path) -> Result<PathBuf, PlannerError> {
        Ok(export::write_cv_text(dir, &self.cv)?)
    }

    // ─── Quiz ──────────────────────────────────────────────────────────────────

    #[must_use]
    pub fn quiz(&self) -> &QuizSession {
        &self.quiz
    }

    /// # Errors
    ///
    /// Returns `PlannerError::Quiz` for an unknown question or option.
    pub fn answer_quiz(&mut self, question: QuestionId, option: usize) -> Result<(), PlannerError> {
        Ok(self.quiz.select(question, option)?)
    }

    pub fn submit_quiz(&mut self) -> QuizScore {
        let score = self.quiz.submit();
        info!(score = %score, "quiz submitted");
        score
    }

    // ─── Export ────────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `PlannerError::Export` if serialization fails.
    pub fn export_document(&self) -> Result<String, PlannerError> {
        Ok(export::export_document(
            &self.catalog,
            self.progress.state(),
            &self.cv,
        )?)
    }

    /// # Errors
    ///
    /// Returns `PlannerError::Export` if encoding or writing fails.
    pub fn write_export(&self, dir: &Path) -> Result<PathBuf, PlannerError> {
        Ok(export::write_export(
            dir,
            &self.catalog,
            self.progress.state(),
            &self.cv,
        )?)
    }
}
