//! Moving cards between buckets.

use crate::api::ApiError;
use crate::model::TaskState;

use super::cache::TaskCache;
use super::render::Board;

/// Drag state. At most one drag is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    /// Nothing is being dragged.
    #[default]
    Idle,
    /// A card was picked up.
    Dragging {
        /// Cache key of the dragged task.
        key: String,
    },
}

/// Drives a drag from pick-up to drop.
///
/// A drop moves the card at once, then asks the backend to change the
/// task's state. If the backend refuses, the card goes back where it was.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    /// An idle controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Picks up the card with `key`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] if another drag is already in flight.
    pub fn drag_start(&mut self, key: &str) -> Result<(), ApiError> {
        if let DragState::Dragging { key: current } = &self.state {
            return Err(ApiError::Validation(format!("already dragging task '{current}'")));
        }
        self.state = DragState::Dragging { key: key.to_string() };
        Ok(())
    }

    /// Abandons the current drag.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Drops the dragged card on the bucket `bucket_id` (`done-box` or `done`).
    ///
    /// Exactly one state-change request is sent for a valid drop. The
    /// controller is idle again afterwards, whatever the outcome.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] without a drag or for an unknown bucket (no
    /// request is sent then); otherwise the backend's error, after the card
    /// has been moved back.
    pub async fn drop_on(
        &mut self,
        bucket_id: &str,
        board: &mut Board,
        cache: &mut TaskCache<'_>,
    ) -> Result<TaskState, ApiError> {
        let DragState::Dragging { key } = std::mem::take(&mut self.state) else {
            return Err(ApiError::Validation("no drag in progress".into()));
        };
        let target = TaskState::from_bucket_id(bucket_id)
            .map_err(|_| ApiError::Validation(format!("unknown bucket '{bucket_id}'")))?;
        let from = board.move_card(&key, target).ok_or_else(|| off_board(board, &key))?;

        match cache.apply_state(&key, target).await {
            Ok(()) => {
                tracing::debug!(task = %key, %from, to = %target, "task moved");
                Ok(target)
            }
            Err(err) => {
                board.move_card(&key, from);
                tracing::error!(task = %key, %from, to = %target, error = %err, "move reverted");
                Err(err)
            }
        }
    }
}

/// Why `key` has no card: skipped for its state, or not a task at all.
fn off_board(board: &Board, key: &str) -> ApiError {
    match board.skipped.iter().find(|skipped| skipped.key == key) {
        Some(skipped) => ApiError::Validation(format!(
            "task '{key}' has unknown state {}",
            skipped.state.as_deref().unwrap_or("<missing>")
        )),
        None => ApiError::task_not_found(key),
    }
}

/// Moves one task in a single drag-and-drop.
///
/// # Errors
///
/// As [`DragController::drop_on`].
pub async fn move_task(
    key: &str,
    bucket_id: &str,
    board: &mut Board,
    cache: &mut TaskCache<'_>,
) -> Result<TaskState, ApiError> {
    let mut controller = DragController::new();
    controller.drag_start(key)?;
    controller.drop_on(bucket_id, board, cache).await
}
