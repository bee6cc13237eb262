//! Integration tests for top-level CLI behavior.
//!
//! Each test replays a hand-written cassette through `JOINBOARD_REPLAY`, so
//! the binary runs its real code paths without a backend.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::{json, Value};

struct Tape {
    dir: PathBuf,
    interactions: Vec<Value>,
}

impl Tape {
    /// A cassette that already serves the config read and a missing token.
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("joinboard_cli_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let mut tape = Self { dir, interactions: Vec::new() };
        tape.push("fs", "read_to_string", json!({"Ok": r#"{"apiUrl": "http://api.test", "guestEmail": "guest@join.de", "guestPassword": "guest"}"#}));
        tape.push("fs", "exists", json!(false));
        tape
    }

    fn push(&mut self, port: &str, method: &str, output: Value) -> &mut Self {
        let seq = self.interactions.len();
        self.interactions.push(json!({
            "seq": seq,
            "port": port,
            "method": method,
            "input": {},
            "output": output,
        }));
        self
    }

    fn reply(&mut self, route: &str, status: u16, body: Value) -> &mut Self {
        self.push("backend", route, json!({"Ok": {"status": status, "body": body}}))
    }

    fn logged_in(&mut self) -> &mut Self {
        self.reply(
            "GET /api/status",
            200,
            json!({"loggedIn": true, "firstName": "Ann", "lastName": "Lee", "email": "ann@x.io"}),
        )
    }

    fn run(&self, args: &[&str]) -> std::process::Output {
        let cassette = json!({
            "name": "cli",
            "recorded_at": "2024-06-01T10:00:00Z",
            "api_url": "http://api.test",
            "interactions": self.interactions,
        });
        let path = self.dir.join("cli.cassette.yaml");
        std::fs::write(&path, serde_yaml::to_string(&cassette).unwrap()).unwrap();
        run_joinboard(args, Some(&path), &self.dir)
    }
}

impl Drop for Tape {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

fn run_joinboard(args: &[&str], replay: Option<&Path>, home: &Path) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_joinboard");
    let mut command = Command::new(bin);
    command
        .args(args)
        .env("JOINBOARD_HOME", home)
        .env_remove("JOINBOARD_RECORD")
        .env_remove("JOINBOARD_API_URL")
        .env_remove("RUST_LOG");
    if let Some(replay) = replay {
        command.env("JOINBOARD_REPLAY", replay);
    }
    command.output().expect("failed to run joinboard binary")
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn tasks() -> Value {
    json!({
        "tasks": {
            "k1": {"id": "1", "title": "Launch board", "category": "userStory",
                   "priority": "urgent", "state": "todo", "dueDate": "2024-06-20",
                   "assigneeNames": ["Ann Lee"], "subTasks": ["QA"], "subTasksChecked": [true]},
            "k2": {"id": "2", "title": "Write docs", "category": "technicalTask",
                   "priority": "low", "state": "in-progress", "dueDate": "2024-06-10"},
            "k3": {"id": "3", "title": "Old idea", "state": "archived"}
        },
        "total": 3
    })
}

#[test]
fn help_lists_commands() {
    let output = run_joinboard(&["--help"], None, &std::env::temp_dir());
    let out = stdout(&output);
    assert!(output.status.success());
    for command in ["login", "board", "task", "contacts", "summary", "accounts"] {
        assert!(out.contains(command), "missing {command} in help:\n{out}");
    }
}

#[test]
fn board_requires_a_session() {
    let mut tape = Tape::new("no_session");
    tape.reply("GET /api/status", 401, json!({"message": "Unauthorized"}));

    let output = tape.run(&["board"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("not logged in, run `joinboard login`"), "{}", stderr(&output));
}

#[test]
fn logged_out_status_is_not_a_session() {
    let mut tape = Tape::new("logged_out");
    tape.reply("GET /api/status", 200, json!({"loggedIn": false}));

    let output = tape.run(&["contacts", "list"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("not logged in"));
}

#[test]
fn board_prints_buckets() {
    let mut tape = Tape::new("board");
    tape.logged_in()
        .reply("GET /api/tasks", 200, tasks())
        .reply("GET /api/accounts", 200, json!({"u1": {"firstName": "Ann", "lastName": "Lee", "profileColor": "#ff7a00"}}));

    let output = tape.run(&["board"]);
    let out = stdout(&output);

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(out.contains("== To do (1) ==\n  k1  [User Story] Launch board (urgent)\n"), "{out}");
    assert!(out.contains("AL #ff7a00"), "{out}");
    assert!(out.contains("== In progress (1) ==\n  k2  [Technical Task] Write docs (low)\n"), "{out}");
    assert!(out.contains("== Awaiting feedback (0) =="), "{out}");
    assert!(out.contains("skipped k3"), "{out}");
}

#[test]
fn board_search_without_matches() {
    let mut tape = Tape::new("search");
    tape.logged_in().reply("GET /api/tasks", 200, tasks());

    let output = tape.run(&["board", "--search", "zzz"]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "No tasks found.\n");
}

#[test]
fn summary_uses_replayed_clock() {
    let mut tape = Tape::new("summary");
    tape.logged_in()
        .reply("GET /api/tasks", 200, tasks())
        .push("clock", "now", json!("2024-06-01T09:15:00+00:00"))
        .push("clock", "now", json!("2024-06-01T09:15:00+00:00"));

    let output = tape.run(&["summary"]);
    let out = stdout(&output);

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(out.contains(", Ann Lee\n"), "{out}");
    assert!(out.contains("Upcoming deadline  June 10, 2024"), "{out}");
    assert!(out.contains("Tasks in board     3"), "{out}");
    assert!(out.contains("Urgent             1"), "{out}");
}

#[test]
fn task_move_reports_new_bucket() {
    let mut tape = Tape::new("move");
    tape.logged_in()
        .reply("GET /api/tasks", 200, tasks())
        .reply("PATCH /api/edit-task-state/k1", 200, json!({"message": "ok"}));

    let output = tape.run(&["task", "move", "k1", "in-progress-box"]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "Moved k1 to In progress.\n");
}

#[test]
fn failed_move_exits_with_backend_message() {
    let mut tape = Tape::new("move_fail");
    tape.logged_in()
        .reply("GET /api/tasks", 200, tasks())
        .reply("PATCH /api/edit-task-state/k1", 500, json!({"message": "db down"}));

    let output = tape.run(&["task", "move", "k1", "done"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("backend returned 500: db down"), "{}", stderr(&output));
}

#[test]
fn task_show_prints_detail() {
    let mut tape = Tape::new("show");
    tape.logged_in().reply("GET /api/tasks", 200, tasks());

    let output = tape.run(&["task", "show", "k2"]);
    let out = stdout(&output);

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(out.starts_with("Write docs (k2)\n"), "{out}");
    assert!(out.contains("Assigned to: No one assigned"), "{out}");
}

#[test]
fn unknown_task_is_reported() {
    let mut tape = Tape::new("unknown_task");
    tape.logged_in().reply("GET /api/tasks", 200, tasks());

    let output = tape.run(&["task", "show", "k9"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("task 'k9' not found"), "{}", stderr(&output));
}

#[test]
fn task_add_without_fields_sends_nothing() {
    let mut tape = Tape::new("add_invalid");
    tape.logged_in();

    let output = tape.run(&["task", "add", "--title", "Only a title"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("All fields are required"), "{}", stderr(&output));
}

#[test]
fn contacts_list_groups_by_letter() {
    let mut tape = Tape::new("contacts");
    tape.logged_in().reply(
        "GET /api/contacts",
        200,
        json!({
            "c1": {"firstName": "Carl", "lastName": "Berg", "email": "carl@x.io"},
            "c2": {"firstName": "bob", "lastName": "Stone", "email": "bob@x.io"},
            "c3": {"firstName": "Ann", "lastName": "Lee", "email": "ann@x.io"}
        }),
    );

    let output = tape.run(&["contacts", "list"]);
    let out = stdout(&output);

    assert!(output.status.success(), "{}", stderr(&output));
    let headings: Vec<&str> = out.lines().filter(|l| !l.starts_with(' ')).collect();
    assert_eq!(headings, ["A", "B", "C"]);
}

#[test]
fn guest_login_stores_token() {
    let mut tape = Tape::new("guest");
    tape.reply("POST /api/login", 200, json!({"status": "200", "token": "guest-token"}))
        .push("fs", "write", json!({"Ok": null}));

    let output = tape.run(&["login", "--guest"]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "Logged in as guest.\n");
}

#[test]
fn rejected_login_fails() {
    let mut tape = Tape::new("bad_login");
    tape.reply("POST /api/login", 401, json!({"message": "Invalid credentials"}));

    let output = tape.run(&["login", "--email", "ann@x.io", "--password", "nope"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("login failed, check your e-mail and password"));
}

#[test]
fn board_survives_malformed_task_records() {
    let mut tape = Tape::new("malformed");
    tape.logged_in()
        .reply(
            "GET /api/tasks",
            200,
            json!({"tasks": {
                "k1": {"title": "Fine", "state": "todo", "priority": null},
                "k2": {"title": "Numeric", "state": 3},
                "k3": {"title": {"nested": true}, "state": "done"}
            }}),
        )
        .reply("GET /api/accounts", 200, json!({}));

    let output = tape.run(&["board"]);
    let out = stdout(&output);

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(out.contains("== To do (1) ==\n  k1  [] Fine (low)\n"), "{out}");
    assert!(out.contains("skipped k2: unknown state 3"), "{out}");
    assert!(!out.contains("k3"), "{out}");
}

#[test]
fn moving_a_task_with_unknown_state_says_so() {
    let mut tape = Tape::new("move_unknown_state");
    tape.logged_in().reply("GET /api/tasks", 200, tasks());

    let output = tape.run(&["task", "move", "k3", "done"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("task 'k3' has unknown state archived"), "{}", stderr(&output));
}
