//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::Priority;

/// Top-level CLI parser for `joinboard`.
#[derive(Debug, Parser)]
#[command(name = "joinboard", version, about = "Kanban tasks and contacts from the terminal")]
pub struct Cli {
    /// Path to `config.json` (defaults to `JOINBOARD_CONFIG`, then `./config.json`).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session token.
    Login(LoginArgs),
    /// Sign out and forget the session token.
    Logout,
    /// Create an account, then sign in with it.
    Signup(SignupArgs),
    /// Show the signed-in user.
    Whoami,
    /// Task counts, next deadline and a greeting.
    Summary,
    /// Show the board, or search task titles.
    Board {
        /// Case-insensitive title search.
        #[arg(long)]
        search: Option<String>,
    },
    /// Work with a single task.
    #[command(subcommand)]
    Task(TaskCommand),
    /// Work with the address book.
    #[command(subcommand)]
    Contacts(ContactsCommand),
    /// List accounts that tasks can be assigned to.
    Accounts,
}

/// Arguments of `login`.
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Use the guest account from `config.json`.
    #[arg(long, conflicts_with_all = ["email", "password"])]
    pub guest: bool,
    /// Account e-mail.
    #[arg(long, required_unless_present = "guest")]
    pub email: Option<String>,
    /// Account password.
    #[arg(long, required_unless_present = "guest")]
    pub password: Option<String>,
}

/// Arguments of `signup`.
#[derive(Debug, Args)]
pub struct SignupArgs {
    /// Given name.
    #[arg(long)]
    pub first_name: String,
    /// Family name.
    #[arg(long)]
    pub last_name: String,
    /// E-mail address.
    #[arg(long)]
    pub email: String,
    /// Password.
    #[arg(long)]
    pub password: String,
    /// Password again.
    #[arg(long)]
    pub confirm_password: String,
    /// Accept the privacy policy.
    #[arg(long)]
    pub accept_privacy_policy: bool,
    /// Badge color.
    #[arg(long, default_value = "#29abe2")]
    pub color: String,
}

/// `task` subcommands.
#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// Show a task in full.
    Show {
        /// Task key.
        id: String,
    },
    /// Create a task.
    Add(TaskAddArgs),
    /// Edit a task and save all changes at once.
    Edit(TaskEditArgs),
    /// Move a task to another bucket (`todo`, `in-progress-box`, ...).
    Move {
        /// Task key.
        id: String,
        /// Target bucket id or state name.
        bucket: String,
    },
    /// Check (or uncheck) a subtask.
    Check {
        /// Task key.
        id: String,
        /// Zero-based subtask index.
        index: usize,
        /// Uncheck instead of check.
        #[arg(long)]
        uncheck: bool,
    },
    /// Remove a subtask.
    RemoveSubtask {
        /// Task key.
        id: String,
        /// Zero-based subtask index.
        index: usize,
    },
    /// Delete a task.
    Delete {
        /// Task key.
        id: String,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
}

/// Arguments of `task add`.
#[derive(Debug, Args)]
pub struct TaskAddArgs {
    /// Title.
    #[arg(long, default_value = "")]
    pub title: String,
    /// Description.
    #[arg(long, default_value = "")]
    pub description: String,
    /// Due date (`YYYY-MM-DD`).
    #[arg(long, default_value = "")]
    pub due_date: String,
    /// Category key (`technicalTask` or `userStory`).
    #[arg(long, default_value = "")]
    pub category: String,
    /// `low`, `medium` or `urgent`.
    #[arg(long)]
    pub priority: Option<Priority>,
    /// Assignee full name; repeatable.
    #[arg(long = "assignee")]
    pub assignees: Vec<String>,
    /// Subtask text; repeatable.
    #[arg(long = "subtask")]
    pub subtasks: Vec<String>,
}

/// Arguments of `task edit`.
#[derive(Debug, Args)]
pub struct TaskEditArgs {
    /// Task key.
    pub id: String,
    /// New title.
    #[arg(long)]
    pub title: Option<String>,
    /// New description.
    #[arg(long)]
    pub description: Option<String>,
    /// New due date.
    #[arg(long)]
    pub due_date: Option<String>,
    /// New category key.
    #[arg(long)]
    pub category: Option<String>,
    /// New priority.
    #[arg(long)]
    pub priority: Option<Priority>,
    /// Add or remove an assignee by full name; repeatable.
    #[arg(long)]
    pub toggle_assignee: Vec<String>,
    /// Append a subtask; repeatable.
    #[arg(long)]
    pub add_subtask: Vec<String>,
    /// Drop the subtask at this index; repeatable.
    #[arg(long)]
    pub remove_subtask: Vec<usize>,
}

/// `contacts` subcommands.
#[derive(Debug, Subcommand)]
pub enum ContactsCommand {
    /// List contacts grouped by initial.
    List,
    /// Show one contact.
    Show {
        /// Contact id.
        id: String,
    },
    /// Create a contact.
    Add(ContactArgs),
    /// Change a contact; unspecified fields keep their value.
    Edit {
        /// Contact id.
        id: String,
        /// New field values.
        #[command(flatten)]
        fields: ContactArgs,
        /// Picture to upload.
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete a contact.
    Delete {
        /// Contact id.
        id: String,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
}

/// Contact fields.
#[derive(Debug, Args)]
pub struct ContactArgs {
    /// Given name.
    #[arg(long)]
    pub first_name: Option<String>,
    /// Family name.
    #[arg(long)]
    pub last_name: Option<String>,
    /// E-mail address.
    #[arg(long)]
    pub email: Option<String>,
    /// Phone number.
    #[arg(long)]
    pub phone: Option<String>,
    /// Badge color.
    #[arg(long)]
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["joinboard", "board", "--search", "launch", "--log-level", "debug"]);
        assert_eq!(cli.log_level, "debug");
        assert!(matches!(cli.command, Command::Board { search: Some(ref q) } if q == "launch"));
    }

    #[test]
    fn login_needs_credentials_or_guest() {
        assert!(Cli::try_parse_from(["joinboard", "login"]).is_err());
        assert!(Cli::try_parse_from(["joinboard", "login", "--guest", "--email", "a@b.c"]).is_err());
        let cli = Cli::parse_from(["joinboard", "login", "--guest"]);
        assert!(matches!(cli.command, Command::Login(LoginArgs { guest: true, .. })));
    }

    #[test]
    fn parses_task_edit_repeatables() {
        let cli = Cli::parse_from([
            "joinboard",
            "task",
            "edit",
            "k1",
            "--priority",
            "urgent",
            "--toggle-assignee",
            "Ann Lee",
            "--add-subtask",
            "QA",
            "--add-subtask",
            "Docs",
            "--remove-subtask",
            "0",
        ]);
        let Command::Task(TaskCommand::Edit(args)) = cli.command else {
            panic!("expected task edit");
        };
        assert_eq!(args.priority, Some(Priority::Urgent));
        assert_eq!(args.toggle_assignee, ["Ann Lee"]);
        assert_eq!(args.add_subtask, ["QA", "Docs"]);
        assert_eq!(args.remove_subtask, [0]);
    }

    #[test]
    fn rejects_unknown_priority() {
        assert!(Cli::try_parse_from(["joinboard", "task", "add", "--priority", "asap"]).is_err());
        assert!(
            Cli::try_parse_from(["joinboard", "task", "edit", "k1", "--priority", "asap"]).is_err()
        );
        let cli = Cli::parse_from(["joinboard", "task", "add", "--priority", "medium"]);
        let Command::Task(TaskCommand::Add(args)) = cli.command else {
            panic!("expected task add");
        };
        assert_eq!(args.priority, Some(Priority::Medium));
    }

    #[test]
    fn parses_contact_edit_with_image() {
        let cli = Cli::parse_from([
            "joinboard",
            "contacts",
            "edit",
            "c1",
            "--email",
            "ann@x.io",
            "--image",
            "ann.png",
        ]);
        let Command::Contacts(ContactsCommand::Edit { id, fields, image }) = cli.command else {
            panic!("expected contacts edit");
        };
        assert_eq!(id, "c1");
        assert_eq!(fields.email.as_deref(), Some("ann@x.io"));
        assert_eq!(fields.first_name, None);
        assert_eq!(image, Some(PathBuf::from("ann.png")));
    }
}
