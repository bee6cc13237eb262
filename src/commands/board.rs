//! `joinboard board` command.

use std::fmt::Write as _;

use crate::board::render::{render, Skipped};
use crate::board::search::{search, SearchHit, NO_MATCHES};
use crate::board::{AccountDirectory, Board, Card, TaskCache};
use crate::context::ServiceContext;

/// Execute the `board` command.
///
/// Prints all four buckets, or the titles matching `query`.
///
/// # Errors
///
/// Returns an error string without a session or if the tasks cannot be loaded.
pub async fn run(ctx: &ServiceContext, query: Option<&str>) -> Result<(), String> {
    super::require_login(ctx).await?;
    let mut cache = TaskCache::new(ctx.api());
    cache.refresh().await.map_err(|e| e.to_string())?;

    if let Some(hits) = query.and_then(|q| search(&cache, q)) {
        print!("{}", format_hits(&hits));
        return Ok(());
    }

    let mut directory = AccountDirectory::new(ctx.api());
    let board = render(&cache, &mut directory).await;
    print!("{}", format_board(&board));
    Ok(())
}

/// Search results, one `id - title` per line.
#[must_use]
pub fn format_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return format!("{NO_MATCHES}\n");
    }
    let mut out = String::new();
    for hit in hits {
        let _ = writeln!(out, "{}  {}", hit.key, hit.label());
    }
    out
}

/// The whole board as text.
#[must_use]
pub fn format_board(board: &Board) -> String {
    let mut out = String::new();
    for bucket in &board.buckets {
        let _ = writeln!(out, "== {} ({}) ==", bucket.state.label(), bucket.cards.len());
        if bucket.cards.is_empty() {
            let _ = writeln!(out, "  No tasks {}", bucket.state.label().to_lowercase());
        }
        for card in &bucket.cards {
            out.push_str(&format_card(card));
        }
        out.push('\n');
    }
    for Skipped { key, state } in &board.skipped {
        let _ = writeln!(out, "skipped {key}: unknown state {}", state.as_deref().unwrap_or("<missing>"));
    }
    out
}

/// One card: headline, description and the optional progress and badge lines.
#[must_use]
pub fn format_card(card: &Card) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {}  [{}] {} ({})",
        card.key, card.category_label, card.title, card.priority
    );
    if !card.description.is_empty() {
        let _ = writeln!(out, "      {}", card.description);
    }
    if card.subtasks_total > 0 {
        let _ = writeln!(out, "      {}/{} Subtasks", card.subtasks_done, card.subtasks_total);
    }
    if !card.assignees.is_empty() {
        let badges: Vec<String> =
            card.assignees.iter().map(|b| format!("{} {}", b.initials, b.color)).collect();
        let _ = writeln!(out, "      {}", badges.join(", "));
    }
    out
}
