use serde::{Deserialize, Serialize};

use crate::model::ids::TaskId;

/// Effort label given to tasks added by the user at runtime.
pub const USER_TASK_EFFORT: &str = "user";

/// A single unit of planned work.
///
/// Tasks are immutable once created. The serialized field for the effort is
/// `time`, matching the export format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    #[serde(rename = "time")]
    estimated_effort: String,
}

impl Task {
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>, estimated_effort: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            estimated_effort: estimated_effort.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &TaskId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn estimated_effort(&self) -> &str {
        &self.estimated_effort
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_effort_as_time() {
        let task = Task::new(TaskId::new("w1t1"), "SQL basics", "2 hrs");
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": "w1t1", "title": "SQL basics", "time": "2 hrs" })
        );
    }
}
