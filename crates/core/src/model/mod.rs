mod catalog;
mod checklist;
pub mod cv;
mod ids;
mod progress;
pub mod quiz;
mod task;
mod week;

pub use catalog::{CatalogError, TaskCatalog};
pub use checklist::{ChecklistItem, reference_checklist};
pub use cv::{CvField, CvFieldError, CvFields, render_cv_text};
pub use ids::{ParseIdError, QuestionId, TaskId};
pub use progress::{ProgressState, completion_percent};
pub use quiz::{QuizAnswers, QuizBank, QuizError, QuizQuestion, QuizScore, QuizSession};
pub use task::{Task, USER_TASK_EFFORT};
pub use week::{WeekError, WeekNumber};
