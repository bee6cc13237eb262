//! Summary dashboard: task counts, next deadline and the greeting.

use chrono::{NaiveDate, Timelike};

use crate::board::TaskCache;
use crate::model::{Priority, Profile, Task, TaskState};
use crate::ports::Clock;

/// Shown when no open task has a future due date.
pub const NO_DEADLINE: &str = "No upcoming deadlines";

/// Counts shown on the summary page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Tasks on the board.
    pub total: usize,
    /// Tasks in `todo`.
    pub todo: usize,
    /// Tasks in `in-progress`.
    pub in_progress: usize,
    /// Tasks in `awaiting-feedback`.
    pub awaiting_feedback: usize,
    /// Tasks in `done`.
    pub done: usize,
    /// Tasks with urgent priority.
    pub urgent: usize,
    /// Earliest future due date of an open task.
    pub next_deadline: Option<NaiveDate>,
}

impl Summary {
    /// Summarizes the cached tasks as of `today`.
    #[must_use]
    pub fn of(cache: &TaskCache<'_>, today: NaiveDate) -> Self {
        Self::from_tasks(cache.iter().map(|(_, task)| task), cache.total(), today)
    }

    /// Summarizes `tasks`; `total` is the board size to report.
    #[must_use]
    pub fn from_tasks<'t>(tasks: impl IntoIterator<Item = &'t Task>, total: usize, today: NaiveDate) -> Self {
        let mut summary = Self { total, ..Self::default() };
        for task in tasks {
            if task.priority == Priority::Urgent {
                summary.urgent += 1;
            }
            let Ok(state) = task.board_state() else {
                continue;
            };
            match state {
                TaskState::Todo => summary.todo += 1,
                TaskState::InProgress => summary.in_progress += 1,
                TaskState::AwaitingFeedback => summary.awaiting_feedback += 1,
                TaskState::Done => summary.done += 1,
            }
            if matches!(state, TaskState::Todo | TaskState::InProgress) {
                let due = parse_due_date(&task.due_date).filter(|due| *due > today);
                if let Some(due) = due {
                    summary.next_deadline = Some(summary.next_deadline.map_or(due, |d| d.min(due)));
                }
            }
        }
        summary
    }

    /// `Month D, YYYY`, or [`NO_DEADLINE`].
    #[must_use]
    pub fn deadline_label(&self) -> String {
        self.next_deadline
            .map_or_else(|| NO_DEADLINE.to_string(), |d| d.format("%B %-d, %Y").to_string())
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date = raw.get(..10).unwrap_or(raw);
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) if raw.is_empty() => None,
        Err(err) => {
            tracing::debug!(due_date = %raw, error = %err, "ignoring unparsable due date");
            None
        }
    }
}

/// Salutation for the hour of day (0-23).
#[must_use]
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        6..=9 => "Good morning",
        10..=14 => "Good noon",
        15..=17 => "Good afternoon",
        18..=21 => "Good evening",
        _ => "Good night",
    }
}

/// `"<greeting>, <name>"` for the logged-in user at the clock's current time.
#[must_use]
pub fn greet(clock: &dyn Clock, profile: &Profile) -> String {
    let salutation = greeting(clock.now().hour());
    let name = profile.full_name();
    if name.is_empty() {
        salutation.to_string()
    } else {
        format!("{salutation}, {name}")
    }
}
