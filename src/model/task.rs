//! Task records and their board state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::de;

/// Board column a task lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    /// Not started.
    Todo,
    /// Being worked on.
    InProgress,
    /// Waiting for someone else.
    AwaitingFeedback,
    /// Finished.
    Done,
}

/// Suffix that turns a state into the id of its bucket.
pub const BUCKET_SUFFIX: &str = "-box";

impl TaskState {
    /// All states in board order.
    pub const ALL: [Self; 4] = [Self::Todo, Self::InProgress, Self::AwaitingFeedback, Self::Done];

    /// Wire name (`todo`, `in-progress`, `awaiting-feedback`, `done`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::AwaitingFeedback => "awaiting-feedback",
            Self::Done => "done",
        }
    }

    /// Column heading.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Todo => "To do",
            Self::InProgress => "In progress",
            Self::AwaitingFeedback => "Awaiting feedback",
            Self::Done => "Done",
        }
    }

    /// Id of the bucket holding this state, e.g. `in-progress-box`.
    #[must_use]
    pub fn bucket_id(self) -> String {
        format!("{}{BUCKET_SUFFIX}", self.as_str())
    }

    /// Parses a bucket id (`done-box`) or a bare state name (`done`).
    ///
    /// # Errors
    ///
    /// Returns [`UnknownState`] if the name matches no bucket.
    pub fn from_bucket_id(bucket_id: &str) -> Result<Self, UnknownState> {
        bucket_id.strip_suffix(BUCKET_SUFFIX).unwrap_or(bucket_id).parse()
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| UnknownState(Some(s.to_string())))
    }
}

/// A task whose state is missing or not one of the four buckets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task state: {}", .0.as_deref().unwrap_or("<missing>"))]
pub struct UnknownState(pub Option<String>);

/// Task urgency.
///
/// Parsing is strict; task records fall back to `Low` for unknown wire
/// values, matching how the board draws them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low urgency.
    #[default]
    Low,
    /// Medium urgency.
    Medium,
    /// Urgent.
    Urgent,
}

impl Priority {
    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "urgent" => Ok(Self::Urgent),
            other => Err(format!("unknown priority '{other}' (expected low, medium or urgent)")),
        }
    }
}

/// A task as stored by the backend.
///
/// `sub_tasks_checked` runs parallel to `sub_tasks`; call [`Task::normalize`]
/// after receiving a record to enforce equal lengths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Human-facing id (the cache key is the backend's record key).
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub id: String,
    /// Title.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub title: String,
    /// Free-text description.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub description: String,
    /// Due date as entered, usually `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub due_date: String,
    /// Category key, e.g. `technicalTask` or `userStory`.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub category: String,
    /// Urgency.
    #[serde(default, deserialize_with = "de::lenient_priority")]
    pub priority: Priority,
    /// Full names of the assigned accounts.
    #[serde(default, deserialize_with = "de::string_list")]
    pub assignee_names: Vec<String>,
    /// Subtask texts.
    #[serde(default, deserialize_with = "de::string_list")]
    pub sub_tasks: Vec<String>,
    /// Completion flag per subtask.
    #[serde(default, deserialize_with = "de::bool_list")]
    pub sub_tasks_checked: Vec<bool>,
    /// Raw state as sent by the backend.
    #[serde(default, deserialize_with = "de::raw_text")]
    pub state: Option<String>,
    /// Legacy single-assignee reference, resolved on cache refresh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
}

impl Task {
    /// Classifies the task into a bucket.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownState`] when the state is missing or unrecognised.
    pub fn board_state(&self) -> Result<TaskState, UnknownState> {
        match self.state.as_deref() {
            Some(raw) => raw.parse(),
            None => Err(UnknownState(None)),
        }
    }

    /// Pads or truncates the checked flags to match the subtask list.
    pub fn normalize(&mut self) {
        self.sub_tasks_checked.resize(self.sub_tasks.len(), false);
    }

    /// Number of checked subtasks.
    #[must_use]
    pub fn completed_subtasks(&self) -> usize {
        self.sub_tasks_checked.iter().take(self.sub_tasks.len()).filter(|c| **c).count()
    }

    /// Subtasks paired with their checked flag.
    pub fn subtasks(&self) -> impl Iterator<Item = (&str, bool)> {
        self.sub_tasks
            .iter()
            .enumerate()
            .map(|(i, text)| (text.as_str(), self.sub_tasks_checked.get(i).copied().unwrap_or(false)))
    }

    /// Display label of the category.
    #[must_use]
    pub fn category_label(&self) -> &str {
        category_label(&self.category)
    }
}

/// Full set of editable task fields, as posted by `add-task`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFields {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Due date.
    pub due_date: String,
    /// Assigned full names.
    pub assignee_names: Vec<String>,
    /// Category key.
    pub category: String,
    /// Urgency.
    pub priority: Priority,
    /// Subtask texts.
    pub sub_tasks: Vec<String>,
}

/// Partial update sent by `edit-task`. Only the fields that are set are
/// serialized and merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New due date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// New assignee list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_names: Option<Vec<String>>,
    /// New category key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New urgency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// New subtask list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_tasks: Option<Vec<String>>,
}

impl TaskPatch {
    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges the set fields into `task`, keeping the subtask invariant.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            task.description.clone_from(description);
        }
        if let Some(due_date) = &self.due_date {
            task.due_date.clone_from(due_date);
        }
        if let Some(names) = &self.assignee_names {
            task.assignee_names.clone_from(names);
        }
        if let Some(category) = &self.category {
            task.category.clone_from(category);
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(sub_tasks) = &self.sub_tasks {
            task.sub_tasks.clone_from(sub_tasks);
        }
        task.normalize();
    }
}

impl From<TaskFields> for TaskPatch {
    fn from(fields: TaskFields) -> Self {
        Self {
            title: Some(fields.title),
            description: Some(fields.description),
            due_date: Some(fields.due_date),
            assignee_names: Some(fields.assignee_names),
            category: Some(fields.category),
            priority: Some(fields.priority),
            sub_tasks: Some(fields.sub_tasks),
        }
    }
}

/// Display label for a category key; unknown keys are shown as-is.
#[must_use]
pub fn category_label(category: &str) -> &str {
    match category {
        "technicalTask" => "Technical Task",
        "userStory" => "User Story",
        other => other,
    }
}
