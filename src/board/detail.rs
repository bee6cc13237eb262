//! Task detail view, the edit form and the two-step delete prompt.

use crate::api::ApiError;
use crate::model::{Priority, TaskFields, TaskPatch};

use super::assign::AssigneeSelection;
use super::cache::TaskCache;

/// Shown instead of an empty assignee list.
pub const NO_ASSIGNEES: &str = "No one assigned";

/// Subtasks being edited, kept apart from the cached record until saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedSubtasks {
    items: Vec<String>,
}

impl StagedSubtasks {
    /// Stages a copy of `items`.
    #[must_use]
    pub fn from_items(items: &[String]) -> Self {
        Self { items: items.to_vec() }
    }

    /// Appends `text` trimmed. Blank input is ignored; returns whether
    /// something was added.
    pub fn add(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.items.push(text.to_string());
        true
    }

    /// Removes the subtask at `index`.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Staged texts in order.
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Drops every staged subtask.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Editable copy of a task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditForm {
    /// Title (required).
    pub title: String,
    /// Description.
    pub description: String,
    /// Due date.
    pub due_date: String,
    /// Category key.
    pub category: String,
    /// Urgency.
    pub priority: Priority,
    /// Subtasks, the only place subtasks change while editing.
    pub subtasks: StagedSubtasks,
    /// Assignees, owned by this edit session.
    pub assignees: AssigneeSelection,
}

impl EditForm {
    fn to_fields(&self) -> TaskFields {
        TaskFields {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            due_date: self.due_date.clone(),
            assignee_names: self.assignees.names().to_vec(),
            category: self.category.clone(),
            priority: self.priority,
            sub_tasks: self.subtasks.items().to_vec(),
        }
    }
}

/// Read-only projection of a cached task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskView {
    /// Cache key.
    pub key: String,
    /// Human-facing id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Due date.
    pub due_date: String,
    /// Category label.
    pub category: String,
    /// Urgency.
    pub priority: Priority,
    /// Assignee names, or [`NO_ASSIGNEES`].
    pub assignees: Vec<String>,
    /// Subtasks with their checked flag.
    pub subtasks: Vec<(String, bool)>,
    /// Raw state.
    pub state: String,
}

/// The detail popup of one task: `Viewing`, or `Editing` until saved or
/// cancelled.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDetail {
    key: String,
    editing: Option<EditForm>,
}

impl TaskDetail {
    /// Opens the task stored under `key`.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] if the cache has no such task.
    pub fn open(cache: &TaskCache<'_>, key: &str) -> Result<Self, ApiError> {
        cache.get(key).ok_or_else(|| ApiError::task_not_found(key))?;
        Ok(Self { key: key.to_string(), editing: None })
    }

    /// Cache key of the open task.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the edit form is open.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// The cached record as shown in `Viewing`.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] if the task left the cache.
    pub fn view(&self, cache: &TaskCache<'_>) -> Result<TaskView, ApiError> {
        let task = cache.get(&self.key).ok_or_else(|| ApiError::task_not_found(&self.key))?;
        let assignees = if task.assignee_names.is_empty() {
            vec![NO_ASSIGNEES.to_string()]
        } else {
            task.assignee_names.clone()
        };
        Ok(TaskView {
            key: self.key.clone(),
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.clone(),
            category: task.category_label().to_string(),
            priority: task.priority,
            assignees,
            subtasks: task.subtasks().map(|(text, checked)| (text.to_string(), checked)).collect(),
            state: task.state.clone().unwrap_or_default(),
        })
    }

    /// Opens the edit form seeded from the cached record.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] if the task left the cache.
    pub fn begin_edit(&mut self, cache: &TaskCache<'_>) -> Result<&mut EditForm, ApiError> {
        let task = cache.get(&self.key).ok_or_else(|| ApiError::task_not_found(&self.key))?;
        Ok(self.editing.insert(EditForm {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.clone(),
            category: task.category.clone(),
            priority: task.priority,
            subtasks: StagedSubtasks::from_items(&task.sub_tasks),
            assignees: AssigneeSelection::seeded(task.assignee_names.iter().cloned()),
        }))
    }

    /// The open edit form.
    pub fn form_mut(&mut self) -> Option<&mut EditForm> {
        self.editing.as_mut()
    }

    /// Discards the edit form.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Sends the whole form as one `edit-task` and refreshes the cache.
    ///
    /// On failure the form stays open with its contents.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] when not editing or the title is blank,
    /// otherwise the backend's error.
    pub async fn save(&mut self, cache: &mut TaskCache<'_>) -> Result<(), ApiError> {
        let Some(form) = &self.editing else {
            return Err(ApiError::Validation("task is not being edited".into()));
        };
        if form.title.trim().is_empty() {
            return Err(ApiError::Validation("title is required".into()));
        }
        let patch = TaskPatch::from(form.to_fields());
        if let Err(err) = cache.apply_patch(&self.key, &patch).await {
            tracing::error!(task = %self.key, error = %err, "saving task failed");
            return Err(err);
        }
        self.editing = None;
        cache.refresh().await
    }

    fn require_viewing(&self) -> Result<(), ApiError> {
        if self.is_editing() {
            Err(ApiError::Validation("finish or cancel the edit first".into()))
        } else {
            Ok(())
        }
    }

    /// Checks or unchecks a subtask right away.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] while editing, otherwise as
    /// [`TaskCache::set_subtask_checked`].
    pub async fn set_subtask(
        &self,
        cache: &mut TaskCache<'_>,
        index: usize,
        checked: bool,
    ) -> Result<(), ApiError> {
        self.require_viewing()?;
        cache.set_subtask_checked(&self.key, index, checked).await
    }

    /// Flips a subtask's checkbox. Returns the new flag.
    ///
    /// # Errors
    ///
    /// As [`TaskDetail::set_subtask`].
    pub async fn toggle_subtask(
        &self,
        cache: &mut TaskCache<'_>,
        index: usize,
    ) -> Result<bool, ApiError> {
        let current = cache
            .get(&self.key)
            .and_then(|task| task.sub_tasks_checked.get(index).copied())
            .unwrap_or(false);
        self.set_subtask(cache, index, !current).await?;
        Ok(!current)
    }

    /// Removes a subtask through `remove-subtask`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] while editing, otherwise as
    /// [`TaskCache::remove_subtask`].
    pub async fn remove_subtask(
        &self,
        cache: &mut TaskCache<'_>,
        index: usize,
    ) -> Result<(), ApiError> {
        self.require_viewing()?;
        cache.remove_subtask(&self.key, index).await
    }
}

/// Two-step delete confirmation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletePrompt {
    pending: Option<String>,
    visible: bool,
}

impl DeletePrompt {
    /// A hidden prompt with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows the prompt for task `key`.
    pub fn show(&mut self, key: &str) {
        self.pending = Some(key.to_string());
        self.visible = true;
    }

    /// Hides the prompt. The pending id is kept.
    pub fn close(&mut self) {
        self.visible = false;
    }

    /// Whether the prompt is shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Task awaiting confirmation.
    #[must_use]
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Deletes the pending task and refreshes the cache.
    ///
    /// The pending id is cleared whatever happens. Returns `false` if
    /// nothing was pending.
    ///
    /// # Errors
    ///
    /// The backend's error.
    pub async fn confirm(&mut self, cache: &mut TaskCache<'_>) -> Result<bool, ApiError> {
        self.visible = false;
        let Some(key) = self.pending.take() else {
            return Ok(false);
        };
        cache.api().delete_task(&key).await?;
        tracing::info!(task = %key, "task deleted");
        cache.refresh().await?;
        Ok(true)
    }
}
