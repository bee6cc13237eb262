//! Client-side copy of the backend's task records.

use std::collections::BTreeMap;

use crate::api::{Api, ApiError};
use crate::model::{Task, TaskPatch, TaskState};

/// Task records keyed by the backend's record key.
///
/// Mutations are sent to the backend first and only applied here once the
/// backend has confirmed them. After a failed mutation the cache is
/// unchanged; callers recover with [`TaskCache::refresh`].
pub struct TaskCache<'a> {
    api: Api<'a>,
    tasks: BTreeMap<String, Task>,
    total: Option<usize>,
}

impl<'a> TaskCache<'a> {
    /// An empty cache; call [`TaskCache::refresh`] to fill it.
    #[must_use]
    pub fn new(api: Api<'a>) -> Self {
        Self { api, tasks: BTreeMap::new(), total: None }
    }

    /// The API the cache talks through.
    #[must_use]
    pub fn api(&self) -> Api<'a> {
        self.api
    }

    /// Replaces every record with the backend's current listing.
    ///
    /// Legacy records carrying a single `assigneeId` get that account's
    /// name added to their assignee list.
    ///
    /// # Errors
    ///
    /// Errors of `GET /api/tasks`; the previous records are kept then.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let listing = self.api.tasks().await?;
        let mut tasks = listing.tasks;
        for (key, task) in &mut tasks {
            let Some(assignee_id) = task.assignee_id.clone().filter(|id| !id.is_empty()) else {
                continue;
            };
            match self.api.account(&assignee_id).await {
                Ok(account) => {
                    let name = account.full_name();
                    if !name.is_empty() && !task.assignee_names.contains(&name) {
                        task.assignee_names.push(name);
                    }
                }
                Err(err) => {
                    tracing::warn!(task = %key, %assignee_id, error = %err, "could not resolve assignee");
                }
            }
        }
        tracing::debug!(count = tasks.len(), "task cache refreshed");
        self.tasks = tasks;
        self.total = listing.total;
        Ok(())
    }

    /// The record stored under `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Records in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Task)> {
        self.tasks.iter().map(|(id, task)| (id.as_str(), task))
    }

    /// Number of cached records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the cache holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Total reported by the backend, or the number of cached records.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total.unwrap_or(self.tasks.len())
    }

    fn require(&self, id: &str) -> Result<&Task, ApiError> {
        self.tasks.get(id).ok_or_else(|| ApiError::task_not_found(id))
    }

    fn require_subtask(&self, id: &str, index: usize) -> Result<(), ApiError> {
        let count = self.require(id)?.sub_tasks.len();
        if index < count {
            Ok(())
        } else {
            Err(ApiError::Validation(format!(
                "task '{id}' has no subtask {index} (it has {count})"
            )))
        }
    }

    /// Sends `edit-task` and merges `patch` once confirmed.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] for unknown ids (nothing is sent), otherwise the
    /// backend's error with the cache left as it was.
    pub async fn apply_patch(&mut self, id: &str, patch: &TaskPatch) -> Result<(), ApiError> {
        self.require(id)?;
        self.api.edit_task(id, patch).await?;
        if let Some(task) = self.tasks.get_mut(id) {
            patch.apply_to(task);
        }
        Ok(())
    }

    /// Sends `edit-task-state` and records the new state once confirmed.
    ///
    /// # Errors
    ///
    /// As [`TaskCache::apply_patch`].
    pub async fn apply_state(&mut self, id: &str, state: TaskState) -> Result<(), ApiError> {
        self.require(id)?;
        self.api.edit_task_state(id, state).await?;
        if let Some(task) = self.tasks.get_mut(id) {
            task.state = Some(state.as_str().to_string());
        }
        Ok(())
    }

    /// Sends `update-subtask-status` and flips the flag once confirmed.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] for an index past the end, otherwise as
    /// [`TaskCache::apply_patch`].
    pub async fn set_subtask_checked(
        &mut self,
        id: &str,
        index: usize,
        checked: bool,
    ) -> Result<(), ApiError> {
        self.require_subtask(id, index)?;
        self.api.update_subtask_status(id, index, checked).await?;
        if let Some(task) = self.tasks.get_mut(id) {
            task.normalize();
            task.sub_tasks_checked[index] = checked;
        }
        Ok(())
    }

    /// Sends `remove-subtask` and drops the subtask and its flag once confirmed.
    ///
    /// # Errors
    ///
    /// As [`TaskCache::set_subtask_checked`].
    pub async fn remove_subtask(&mut self, id: &str, index: usize) -> Result<(), ApiError> {
        self.require_subtask(id, index)?;
        self.api.remove_subtask(id, index).await?;
        if let Some(task) = self.tasks.get_mut(id) {
            task.normalize();
            task.sub_tasks.remove(index);
            task.sub_tasks_checked.remove(index);
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn insert(&mut self, id: &str, mut task: Task) {
        task.normalize();
        self.tasks.insert(id.to_string(), task);
    }
}
