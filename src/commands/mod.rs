//! Command dispatch and handlers.

pub mod accounts;
pub mod board;
pub mod contacts;
pub mod session;
pub mod summary;
pub mod task;

use std::env;
use std::future::Future;
use std::path::PathBuf;

use crate::cli::{Cli, Command};
use crate::config::{config_path, state_dir};
use crate::context::ServiceContext;
use crate::model::Profile;

/// Set to `1` to record every port call of this run.
pub const RECORD_ENV: &str = "JOINBOARD_RECORD";
/// Path of a cassette file or recording directory to replay instead of
/// talking to the backend.
pub const REPLAY_ENV: &str = "JOINBOARD_REPLAY";

/// Dispatch a parsed command line to its handler.
///
/// With `JOINBOARD_REPLAY` set, all ports are served from that cassette.
/// With `JOINBOARD_RECORD=1`, all port interactions are recorded to
/// per-port cassette files under `<state dir>/cassettes/<timestamp>/`.
///
/// # Errors
///
/// Returns an error string if the context cannot be built or the selected
/// command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let config_path = config_path(cli.config.as_deref());
    let state_dir = state_dir();

    let ctx = if let Ok(path) = env::var(REPLAY_ENV) {
        ServiceContext::replaying(&PathBuf::from(path), &config_path, state_dir)?
    } else if env::var(RECORD_ENV).is_ok_and(|v| v == "1") {
        ServiceContext::recording(&config_path, state_dir)?
    } else {
        ServiceContext::live(&config_path, state_dir)?
    };

    let result = block_on(dispatch_with_context(&cli.command, &ctx));

    // Finish recording after the command completes, even on error.
    if let Some(dir) = ctx.finish()? {
        eprintln!("Recording saved to: {}", dir.display());
    }

    result
}

/// Dispatch a command with the given service context.
async fn dispatch_with_context(command: &Command, ctx: &ServiceContext) -> Result<(), String> {
    match command {
        Command::Login(args) => session::login(ctx, args).await,
        Command::Logout => session::logout(ctx).await,
        Command::Signup(args) => session::signup(ctx, args).await,
        Command::Whoami => session::whoami(ctx).await,
        Command::Summary => summary::run(ctx).await,
        Command::Board { search } => board::run(ctx, search.as_deref()).await,
        Command::Task(command) => task::run(ctx, command).await,
        Command::Contacts(command) => contacts::run(ctx, command).await,
        Command::Accounts => accounts::run(ctx).await,
    }
}

/// Runs `future` to completion on a single-threaded runtime.
fn block_on<F: Future<Output = Result<(), String>>>(future: F) -> Result<(), String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?
        .block_on(future)
}

/// Checks the backend session before a board, task or contact command.
///
/// # Errors
///
/// The "not logged in" message for any failure.
pub(crate) async fn require_login(ctx: &ServiceContext) -> Result<Profile, String> {
    crate::session::require_login(ctx.api()).await.map_err(|e| e.to_string())
}
