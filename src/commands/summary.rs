//! `joinboard summary` command.

use std::fmt::Write as _;

use crate::board::TaskCache;
use crate::context::ServiceContext;
use crate::summary::{greet, Summary};

/// Execute the `summary` command.
///
/// # Errors
///
/// Returns an error string without a session or if the tasks cannot be loaded.
pub async fn run(ctx: &ServiceContext) -> Result<(), String> {
    let profile = super::require_login(ctx).await?;
    let mut cache = TaskCache::new(ctx.api());
    cache.refresh().await.map_err(|e| e.to_string())?;

    let greeting = greet(ctx.clock.as_ref(), &profile);
    let today = ctx.clock.now().date_naive();
    print!("{}", format_summary(&greeting, &Summary::of(&cache, today)));
    Ok(())
}

/// The dashboard as text.
#[must_use]
pub fn format_summary(greeting: &str, summary: &Summary) -> String {
    let rows = [
        ("To-do", summary.todo.to_string()),
        ("Done", summary.done.to_string()),
        ("Urgent", summary.urgent.to_string()),
        ("Upcoming deadline", summary.deadline_label()),
        ("Tasks in board", summary.total.to_string()),
        ("Tasks in progress", summary.in_progress.to_string()),
        ("Awaiting feedback", summary.awaiting_feedback.to_string()),
    ];
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or_default();

    let mut out = format!("{greeting}\n\n");
    for (label, value) in rows {
        let _ = writeln!(out, "{label:<width$}  {value}");
    }
    out
}
