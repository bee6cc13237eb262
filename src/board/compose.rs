//! Draft of a new task.

use crate::api::{Api, ApiError};
use crate::model::{Priority, TaskFields};

use super::assign::AssigneeSelection;
use super::detail::StagedSubtasks;

/// A task being composed. It owns its own assignee selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Due date.
    pub due_date: String,
    /// Category key.
    pub category: String,
    /// Urgency; must be chosen.
    pub priority: Option<Priority>,
    /// Subtasks added so far.
    pub subtasks: StagedSubtasks,
    /// Chosen assignees.
    pub assignees: AssigneeSelection,
}

impl TaskDraft {
    /// An empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks required fields and builds the `add-task` payload.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] naming every missing field.
    pub fn validate(&self) -> Result<TaskFields, ApiError> {
        let mut missing = Vec::new();
        for (name, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("due date", &self.due_date),
            ("category", &self.category),
        ] {
            if value.trim().is_empty() {
                missing.push(name);
            }
        }
        let Some(priority) = self.priority else {
            missing.push("priority");
            return Err(missing_fields(&missing));
        };
        if !missing.is_empty() {
            return Err(missing_fields(&missing));
        }
        Ok(TaskFields {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            due_date: self.due_date.trim().to_string(),
            assignee_names: self.assignees.names().to_vec(),
            category: self.category.trim().to_string(),
            priority,
            sub_tasks: self.subtasks.items().to_vec(),
        })
    }

    /// Posts the draft; it is cleared once the backend accepts it.
    ///
    /// # Errors
    ///
    /// Validation errors (nothing is sent) or the backend's error, whose
    /// message is the server's `message` field when present.
    pub async fn submit(&mut self, api: Api<'_>) -> Result<(), ApiError> {
        let fields = self.validate()?;
        api.add_task(&fields).await?;
        tracing::info!(title = %fields.title, "task added");
        *self = Self::new();
        Ok(())
    }
}

fn missing_fields(missing: &[&str]) -> ApiError {
    ApiError::Validation(format!("All fields are required (missing: {})", missing.join(", ")))
}
