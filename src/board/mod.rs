//! The Kanban board: cached tasks, their projection onto buckets and the
//! interactions that change them.

pub mod assign;
pub mod cache;
pub mod compose;
pub mod detail;
pub mod drag;
pub mod render;
pub mod search;

pub use assign::{AccountDirectory, AssigneeOption, AssigneeSelection};
pub use cache::TaskCache;
pub use compose::TaskDraft;
pub use detail::{DeletePrompt, EditForm, StagedSubtasks, TaskDetail, TaskView};
pub use drag::{DragController, DragState};
pub use render::{Board, Bucket, Card};
