//! Replaying adapters that replay recorded interactions.

pub mod backend;
pub mod clock;
pub mod filesystem;

pub use backend::ReplayingBackend;
pub use clock::ReplayingClock;
pub use filesystem::ReplayingFileSystem;

use std::sync::{Arc, Mutex};

use crate::cassette::replayer::CassetteReplayer;

/// Fetch the output of the next recorded interaction for `port`/`method`.
///
/// # Panics
///
/// Panics when the cassette is exhausted for this port and method.
pub(crate) fn next_output(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut guard = replayer.lock().expect("replayer lock poisoned");
    guard.next_interaction(port, method).output.clone()
}

/// Decode a recorded `Result` using the Ok/Err JSON convention.
///
/// Mirror of `recording::record_result`.
pub(crate) fn replay_result<T>(
    output: serde_json::Value,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>>
where
    T: serde::de::DeserializeOwned,
{
    if let Some(err) = output.get("Err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("Ok").cloned().unwrap_or(output);
    serde_json::from_value(value).map_err(|e| format!("failed to decode replayed value: {e}").into())
}
