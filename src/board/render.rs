//! Projection of the task cache onto the four board buckets.

use crate::model::{initials_of, Account, Priority, Task, TaskState};

use super::assign::{color_for, AccountDirectory};
use super::cache::TaskCache;

/// Descriptions longer than this many characters are cut on cards.
pub const DESCRIPTION_LIMIT: usize = 91;

/// Badge color for assignees without a matching account.
pub const FALLBACK_COLOR: &str = "#ccc";

/// An assignee badge on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    /// Full name as stored on the task.
    pub name: String,
    /// Initials shown in the badge.
    pub initials: String,
    /// Background color.
    pub color: String,
}

/// A task as drawn on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Cache key of the task.
    pub key: String,
    /// Human-facing id.
    pub id: String,
    /// Category key.
    pub category: String,
    /// Category label.
    pub category_label: String,
    /// Title.
    pub title: String,
    /// Description, truncated for display.
    pub description: String,
    /// Checked subtasks.
    pub subtasks_done: usize,
    /// All subtasks.
    pub subtasks_total: usize,
    /// Assignee badges.
    pub assignees: Vec<Badge>,
    /// Urgency.
    pub priority: Priority,
}

/// One board column.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    /// State the column stands for.
    pub state: TaskState,
    /// Cards in cache order.
    pub cards: Vec<Card>,
}

impl Bucket {
    /// `<state>-box`.
    #[must_use]
    pub fn id(&self) -> String {
        self.state.bucket_id()
    }
}

/// A task left off the board because its state is missing or unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// Cache key of the task.
    pub key: String,
    /// The state the backend sent.
    pub state: Option<String>,
}

/// The whole board.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// The four buckets in [`TaskState::ALL`] order.
    pub buckets: Vec<Bucket>,
    /// Tasks that could not be classified.
    pub skipped: Vec<Skipped>,
}

impl Board {
    fn empty() -> Self {
        Self {
            buckets: TaskState::ALL.iter().map(|&state| Bucket { state, cards: Vec::new() }).collect(),
            skipped: Vec::new(),
        }
    }

    /// The bucket for `state`.
    #[must_use]
    pub fn bucket(&self, state: TaskState) -> &Bucket {
        &self.buckets[state_index(state)]
    }

    /// The bucket currently holding the card with `key`.
    #[must_use]
    pub fn bucket_of(&self, key: &str) -> Option<TaskState> {
        self.buckets
            .iter()
            .find(|bucket| bucket.cards.iter().any(|card| card.key == key))
            .map(|bucket| bucket.state)
    }

    /// Moves a card to the end of `to`. Returns the bucket it came from.
    pub fn move_card(&mut self, key: &str, to: TaskState) -> Option<TaskState> {
        let from = self.bucket_of(key)?;
        let cards = &mut self.buckets[state_index(from)].cards;
        let pos = cards.iter().position(|card| card.key == key)?;
        let card = cards.remove(pos);
        self.buckets[state_index(to)].cards.push(card);
        Some(from)
    }

    /// Number of cards across all buckets.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.cards.len()).sum()
    }
}

fn state_index(state: TaskState) -> usize {
    TaskState::ALL.iter().position(|s| *s == state).unwrap_or_default()
}

/// Cuts `text` after [`DESCRIPTION_LIMIT`] characters and appends `...`.
#[must_use]
pub fn truncate_description(text: &str) -> String {
    if text.chars().count() > DESCRIPTION_LIMIT {
        let cut: String = text.chars().take(DESCRIPTION_LIMIT).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Builds the card for one task, coloring badges from `accounts`.
#[must_use]
pub fn card(key: &str, task: &Task, accounts: &[Account]) -> Card {
    Card {
        key: key.to_string(),
        id: task.id.clone(),
        category: task.category.clone(),
        category_label: task.category_label().to_string(),
        title: task.title.clone(),
        description: truncate_description(&task.description),
        subtasks_done: task.completed_subtasks(),
        subtasks_total: task.sub_tasks.len(),
        assignees: task
            .assignee_names
            .iter()
            .map(|name| Badge {
                name: name.clone(),
                initials: initials_of(name),
                color: color_for(accounts, name).unwrap_or(FALLBACK_COLOR).to_string(),
            })
            .collect(),
        priority: task.priority,
    }
}

/// Classifies every cached task into its bucket.
#[must_use]
pub fn layout<'t>(tasks: impl IntoIterator<Item = (&'t str, &'t Task)>, accounts: &[Account]) -> Board {
    let mut board = Board::empty();
    for (key, task) in tasks {
        match task.board_state() {
            Ok(state) => board.buckets[state_index(state)].cards.push(card(key, task, accounts)),
            Err(err) => {
                tracing::warn!(task = %key, error = %err, "task skipped");
                board.skipped.push(Skipped { key: key.to_string(), state: task.state.clone() });
            }
        }
    }
    board
}

/// Renders the cache with one account listing for the whole cycle.
///
/// If the accounts cannot be fetched, badges fall back to [`FALLBACK_COLOR`].
pub async fn render(cache: &TaskCache<'_>, directory: &mut AccountDirectory<'_>) -> Board {
    let accounts = match directory.accounts().await {
        Ok(accounts) => accounts.to_vec(),
        Err(err) => {
            tracing::warn!(error = %err, "account colors unavailable");
            Vec::new()
        }
    };
    layout(cache.iter(), &accounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Api;
    use crate::testing::{reply, unreachable, ScriptedBackend};
    use serde_json::json;

    fn task(state: Option<&str>) -> Task {
        Task { title: "T".into(), state: state.map(String::from), ..Task::default() }
    }

    #[test]
    fn truncates_after_91_characters() {
        let short = "a".repeat(91);
        assert_eq!(truncate_description(&short), short);
        let long = "é".repeat(100);
        let cut = truncate_description(&long);
        assert_eq!(cut.chars().count(), 94);
        assert!(cut.ends_with("é..."));
    }

    #[test]
    fn every_task_lands_in_exactly_one_bucket_or_is_skipped() {
        let tasks = [
            ("a", task(Some("todo"))),
            ("b", task(Some("done"))),
            ("c", task(Some("archived"))),
            ("d", task(None)),
            ("e", task(Some("awaiting-feedback"))),
        ];
        let board = layout(tasks.iter().map(|(k, t)| (*k, t)), &[]);

        assert_eq!(board.card_count(), 3);
        assert_eq!(board.bucket_of("a"), Some(TaskState::Todo));
        assert_eq!(board.bucket_of("e"), Some(TaskState::AwaitingFeedback));
        assert_eq!(board.bucket(TaskState::InProgress).cards.len(), 0);
        assert_eq!(board.bucket(TaskState::Done).id(), "done-box");
        let skipped: Vec<_> = board.skipped.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(skipped, ["c", "d"]);
    }

    #[test]
    fn card_projects_progress_badges_and_labels() {
        let task = Task {
            category: "technicalTask".into(),
            assignee_names: vec!["Ann Lee".into(), "Zed Unknown".into()],
            sub_tasks: vec!["a".into(), "b".into()],
            sub_tasks_checked: vec![true, false],
            state: Some("todo".into()),
            ..Task::default()
        };
        let accounts = [Account {
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            profile_color: "#ff7a00".into(),
            ..Account::default()
        }];

        let card = card("k", &task, &accounts);

        assert_eq!(card.category_label, "Technical Task");
        assert_eq!((card.subtasks_done, card.subtasks_total), (1, 2));
        assert_eq!(card.assignees[0].color, "#ff7a00");
        assert_eq!(card.assignees[0].initials, "AL");
        assert_eq!(card.assignees[1].color, FALLBACK_COLOR);
    }

    #[test]
    fn move_card_reports_origin() {
        let tasks = [("a", task(Some("todo")))];
        let mut board = layout(tasks.iter().map(|(k, t)| (*k, t)), &[]);

        assert_eq!(board.move_card("a", TaskState::Done), Some(TaskState::Todo));
        assert_eq!(board.bucket_of("a"), Some(TaskState::Done));
        assert_eq!(board.move_card("zz", TaskState::Done), None);
    }

    #[tokio::test]
    async fn render_fetches_accounts_once_and_survives_failure() {
        let backend = ScriptedBackend::new(vec![
            reply("GET /api/tasks", 200, json!({"tasks": {
                "a": {"state": "todo", "assigneeNames": ["Ann Lee"]},
                "b": {"state": "done", "assigneeNames": ["Ann Lee"]}
            }})),
            unreachable("GET /api/accounts"),
        ]);
        let api = Api::new(&backend);
        let mut cache = TaskCache::new(api);
        cache.refresh().await.unwrap();
        let mut directory = AccountDirectory::new(api);

        let board = render(&cache, &mut directory).await;

        assert_eq!(board.card_count(), 2);
        assert_eq!(board.bucket(TaskState::Todo).cards[0].assignees[0].color, FALLBACK_COLOR);
        assert_eq!(backend.routes(), vec!["GET /api/tasks", "GET /api/accounts"]);
    }
}
