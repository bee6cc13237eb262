//! `joinboard task ...` commands.

use std::fmt::Write as _;

use crate::board::drag::move_task;
use crate::board::render::layout;
use crate::board::{DeletePrompt, EditForm, TaskCache, TaskDetail, TaskDraft, TaskView};
use crate::cli::{TaskAddArgs, TaskCommand, TaskEditArgs};
use crate::context::ServiceContext;

/// Execute a `task` subcommand.
///
/// Every subcommand checks the session first; all but `add` then work on
/// a freshly loaded task cache.
///
/// # Errors
///
/// Returns an error string without a session, for unknown tasks, invalid
/// input or a failed backend call.
pub async fn run(ctx: &ServiceContext, command: &TaskCommand) -> Result<(), String> {
    super::require_login(ctx).await?;

    match command {
        TaskCommand::Add(args) => add(ctx, args).await,
        TaskCommand::Show { id } => {
            let cache = load(ctx).await?;
            let detail = TaskDetail::open(&cache, id).map_err(|e| e.to_string())?;
            let view = detail.view(&cache).map_err(|e| e.to_string())?;
            print!("{}", format_view(&view));
            Ok(())
        }
        TaskCommand::Edit(args) => edit(&mut load(ctx).await?, args).await,
        TaskCommand::Move { id, bucket } => {
            let mut cache = load(ctx).await?;
            let mut board = layout(cache.iter(), &[]);
            let state = move_task(id, bucket, &mut board, &mut cache).await.map_err(|e| e.to_string())?;
            println!("Moved {id} to {}.", state.label());
            Ok(())
        }
        TaskCommand::Check { id, index, uncheck } => {
            let mut cache = load(ctx).await?;
            let detail = TaskDetail::open(&cache, id).map_err(|e| e.to_string())?;
            detail.set_subtask(&mut cache, *index, !uncheck).await.map_err(|e| e.to_string())?;
            println!("Subtask {index} of {id} {}.", if *uncheck { "unchecked" } else { "checked" });
            Ok(())
        }
        TaskCommand::RemoveSubtask { id, index } => {
            let mut cache = load(ctx).await?;
            let detail = TaskDetail::open(&cache, id).map_err(|e| e.to_string())?;
            detail.remove_subtask(&mut cache, *index).await.map_err(|e| e.to_string())?;
            println!("Removed subtask {index} from {id}.");
            Ok(())
        }
        TaskCommand::Delete { id, yes } => delete(&mut load(ctx).await?, id, *yes).await,
    }
}

async fn load(ctx: &ServiceContext) -> Result<TaskCache<'_>, String> {
    let mut cache = TaskCache::new(ctx.api());
    cache.refresh().await.map_err(|e| e.to_string())?;
    Ok(cache)
}

async fn add(ctx: &ServiceContext, args: &TaskAddArgs) -> Result<(), String> {
    let mut draft = TaskDraft {
        title: args.title.clone(),
        description: args.description.clone(),
        due_date: args.due_date.clone(),
        category: args.category.clone(),
        priority: args.priority,
        ..TaskDraft::new()
    };
    for name in &args.assignees {
        if !draft.assignees.contains(name) {
            draft.assignees.toggle(name);
        }
    }
    for subtask in &args.subtasks {
        draft.subtasks.add(subtask);
    }
    let title = draft.title.trim().to_string();
    draft.submit(ctx.api()).await.map_err(|e| e.to_string())?;
    println!("Task added: {title}");
    Ok(())
}

async fn edit(cache: &mut TaskCache<'_>, args: &TaskEditArgs) -> Result<(), String> {
    let mut detail = TaskDetail::open(cache, &args.id).map_err(|e| e.to_string())?;
    let form = detail.begin_edit(cache).map_err(|e| e.to_string())?;
    apply_edits(form, args)?;
    detail.save(cache).await.map_err(|e| e.to_string())?;
    println!("Task {} saved.", args.id);
    Ok(())
}

/// Copies the flags given on the command line into the edit form.
///
/// Subtask removals use the indexes as listed before this edit.
fn apply_edits(form: &mut EditForm, args: &TaskEditArgs) -> Result<(), String> {
    let fields = [
        (&mut form.title, &args.title),
        (&mut form.description, &args.description),
        (&mut form.due_date, &args.due_date),
        (&mut form.category, &args.category),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            field.clone_from(value);
        }
    }
    if let Some(priority) = args.priority {
        form.priority = priority;
    }
    for name in &args.toggle_assignee {
        form.assignees.toggle(name);
    }

    let mut removals = args.remove_subtask.clone();
    removals.sort_unstable();
    removals.dedup();
    for index in removals.into_iter().rev() {
        form.subtasks
            .remove(index)
            .ok_or_else(|| format!("task '{}' has no subtask {index}", args.id))?;
    }
    for subtask in &args.add_subtask {
        form.subtasks.add(subtask);
    }
    Ok(())
}

async fn delete(cache: &mut TaskCache<'_>, id: &str, yes: bool) -> Result<(), String> {
    TaskDetail::open(cache, id).map_err(|e| e.to_string())?;
    let mut prompt = DeletePrompt::new();
    prompt.show(id);
    if !yes {
        prompt.close();
        println!("Delete task {id}? Re-run with --yes to confirm.");
        return Ok(());
    }
    prompt.confirm(cache).await.map_err(|e| e.to_string())?;
    println!("Task {id} deleted.");
    Ok(())
}

/// A task's detail view as text.
#[must_use]
pub fn format_view(view: &TaskView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", view.title, view.key);
    let _ = writeln!(out, "Category:    {}", view.category);
    let _ = writeln!(out, "State:       {}", view.state);
    let _ = writeln!(out, "Due date:    {}", view.due_date);
    let _ = writeln!(out, "Priority:    {}", view.priority);
    let _ = writeln!(out, "Assigned to: {}", view.assignees.join(", "));
    if !view.description.is_empty() {
        let _ = writeln!(out, "\n{}", view.description);
    }
    if !view.subtasks.is_empty() {
        let _ = writeln!(out, "\nSubtasks:");
        for (index, (text, checked)) in view.subtasks.iter().enumerate() {
            let _ = writeln!(out, "  {index}. [{}] {text}", if *checked { "x" } else { " " });
        }
    }
    out
}
