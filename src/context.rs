//! Service context bundling the port trait objects and the loaded config.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::backend::LiveBackend;
use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::recording::{RecordingBackend, RecordingClock, RecordingFileSystem};
use crate::adapters::replaying::{ReplayingBackend, ReplayingClock, ReplayingFileSystem};
use crate::api::Api;
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::config::Config;
use crate::ports::{Backend, Clock, FileSystem};
use crate::session::TokenStore;

const CASSETTE_SUFFIX: &str = ".cassette.yaml";

/// Bundles the ports with the configuration read through them.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying). Config and token are always read through the
/// context's own filesystem, so a recorded session replays the same way.
pub struct ServiceContext {
    /// Clock for obtaining the current time.
    pub clock: Box<dyn Clock>,
    /// Filesystem for config, token and uploads.
    pub fs: Box<dyn FileSystem>,
    /// REST backend.
    pub backend: Box<dyn Backend>,
    /// Loaded `config.json`.
    pub config: Config,
    /// Directory holding the token and recorded cassettes.
    pub state_dir: PathBuf,
    recording: Option<RecordingSession>,
}

impl ServiceContext {
    /// Creates a live context talking to the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the config or token cannot be read, or the HTTP
    /// client cannot be built.
    pub fn live(config_path: &Path, state_dir: PathBuf) -> Result<Self, String> {
        let fs: Box<dyn FileSystem> = Box::new(LiveFileSystem);
        let (config, token) = bootstrap(fs.as_ref(), config_path, &state_dir)?;
        let backend = LiveBackend::new(&config.api_url, token)
            .map_err(|e| format!("Failed to create HTTP client: {e}"))?;
        Ok(Self {
            clock: Box::new(LiveClock),
            fs,
            backend: Box::new(backend),
            config,
            state_dir,
            recording: None,
        })
    }

    /// Creates a live context that records every port call.
    ///
    /// Cassettes are written under `<state_dir>/cassettes/<timestamp>/` by
    /// [`ServiceContext::finish`]. This is the developer mechanism behind
    /// `JOINBOARD_RECORD=1`.
    ///
    /// # Errors
    ///
    /// As [`ServiceContext::live`], plus failures creating the cassette directory.
    pub fn recording(config_path: &Path, state_dir: PathBuf) -> Result<Self, String> {
        let session = RecordingSession::new(&state_dir, "")?;
        let fs: Box<dyn FileSystem> =
            Box::new(RecordingFileSystem::new(Box::new(LiveFileSystem), Arc::clone(&session.fs)));
        let (config, token) = bootstrap(fs.as_ref(), config_path, &state_dir)?;
        session.set_api_url(&config.api_url);
        let live = LiveBackend::new(&config.api_url, token)
            .map_err(|e| format!("Failed to create HTTP client: {e}"))?;
        Ok(Self {
            clock: Box::new(RecordingClock::new(Box::new(LiveClock), Arc::clone(&session.clock))),
            fs,
            backend: Box::new(RecordingBackend::new(Box::new(live), Arc::clone(&session.backend))),
            config,
            state_dir,
            recording: Some(session),
        })
    }

    /// Creates a context served entirely from recorded cassettes.
    ///
    /// `path` is either one cassette file or a recording directory whose
    /// `*.cassette.yaml` files are merged. Every port shares one replayer;
    /// each port/method pair keeps its own cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if a cassette cannot be read or parsed, or the
    /// replayed config is invalid.
    pub fn replaying(path: &Path, config_path: &Path, state_dir: PathBuf) -> Result<Self, String> {
        let cassette = read_cassettes(path)?;
        let replayer = Arc::new(Mutex::new(CassetteReplayer::new(&cassette)));
        let fs: Box<dyn FileSystem> = Box::new(ReplayingFileSystem::new(Arc::clone(&replayer)));
        let (config, _token) = bootstrap(fs.as_ref(), config_path, &state_dir)?;
        Ok(Self {
            clock: Box::new(ReplayingClock::new(Arc::clone(&replayer))),
            fs,
            backend: Box::new(ReplayingBackend::new(replayer)),
            config,
            state_dir,
            recording: None,
        })
    }

    /// Typed API over this context's backend.
    #[must_use]
    pub fn api(&self) -> Api<'_> {
        Api::new(self.backend.as_ref())
    }

    /// Token store in the state directory.
    #[must_use]
    pub fn tokens(&self) -> TokenStore<'_> {
        TokenStore::new(self.fs.as_ref(), &self.state_dir)
    }

    /// Releases the adapters and writes any recorded cassettes.
    ///
    /// Returns the recording directory when this was a recording context.
    ///
    /// # Errors
    ///
    /// Returns an error if a cassette cannot be written.
    pub fn finish(self) -> Result<Option<PathBuf>, String> {
        let Self { clock, fs, backend, recording, .. } = self;
        drop((clock, fs, backend));
        recording.map(RecordingSession::finish).transpose()
    }
}

fn bootstrap(
    fs: &dyn FileSystem,
    config_path: &Path,
    state_dir: &Path,
) -> Result<(Config, Option<String>), String> {
    let config = Config::load(fs, config_path)?;
    let token = TokenStore::new(fs, state_dir).load()?;
    tracing::debug!(api_url = %config.api_url, has_token = token.is_some(), "context ready");
    Ok((config, token))
}

fn read_cassettes(path: &Path) -> Result<Cassette, String> {
    if !path.is_dir() {
        return read_cassette(path);
    }
    let entries = std::fs::read_dir(path)
        .map_err(|e| format!("Failed to read cassette directory {}: {e}", path.display()))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.to_string_lossy().ends_with(CASSETTE_SUFFIX))
        .collect();
    files.sort();

    let mut merged: Option<Cassette> = None;
    for file in files {
        let cassette = read_cassette(&file)?;
        match merged.as_mut() {
            Some(m) => m.interactions.extend(cassette.interactions),
            None => merged = Some(cassette),
        }
    }
    merged.ok_or_else(|| format!("No cassettes found in {}", path.display()))
}

fn read_cassette(path: &Path) -> Result<Cassette, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
    serde_yaml::from_str(&content)
        .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Interaction;
    use chrono::{Timelike, Utc};
    use serde_json::json;

    fn interaction(port: &str, method: &str, output: serde_json::Value) -> Interaction {
        Interaction { seq: 0, port: port.into(), method: method.into(), input: json!({}), output }
    }

    fn write_cassette(path: &Path, interactions: Vec<Interaction>) {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            api_url: "http://api.test".into(),
            interactions,
        };
        std::fs::write(path, serde_yaml::to_string(&cassette).unwrap()).unwrap();
    }

    fn config_read() -> Interaction {
        interaction(
            "fs",
            "read_to_string",
            json!({"Ok": r#"{"apiUrl": "http://api.test", "guestEmail": "guest@join.de", "guestPassword": "guest"}"#}),
        )
    }

    #[tokio::test]
    async fn replaying_context_serves_all_ports_from_one_cassette() {
        let dir = std::env::temp_dir().join("joinboard_ctx_test_mono");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("session.cassette.yaml");
        write_cassette(
            &path,
            vec![
                config_read(),
                interaction("fs", "exists", json!(false)),
                interaction("clock", "now", json!("2024-06-15T10:30:00+02:00")),
                interaction(
                    "backend",
                    "GET /api/status",
                    json!({"Ok": {"status": 200, "body": {"loggedIn": true, "firstName": "Ann"}}}),
                ),
            ],
        );

        let ctx = ServiceContext::replaying(&path, Path::new("config.json"), dir.clone()).unwrap();

        assert_eq!(ctx.config.guest_email, "guest@join.de");
        assert_eq!(ctx.clock.now().with_timezone(&Utc).hour(), 8);
        let profile = ctx.api().status().await.unwrap();
        assert_eq!(profile.first_name, "Ann");
        assert_eq!(ctx.finish().unwrap(), None);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn replaying_merges_a_recording_directory() {
        let dir = std::env::temp_dir().join("joinboard_ctx_test_dir");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        write_cassette(
            &dir.join("fs.cassette.yaml"),
            vec![config_read(), interaction("fs", "exists", json!(true)), interaction(
                "fs",
                "read_to_string",
                json!({"Ok": "tok-1\n"}),
            )],
        );
        write_cassette(
            &dir.join("clock.cassette.yaml"),
            vec![interaction("clock", "now", json!("2024-01-01T08:00:00+00:00"))],
        );
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let ctx = ServiceContext::replaying(&dir, Path::new("config.json"), dir.clone()).unwrap();

        assert_eq!(ctx.config.api_url, "http://api.test");
        assert_eq!(ctx.clock.now().with_timezone(&Utc).hour(), 8);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_recording_directory_is_an_error() {
        let dir = std::env::temp_dir().join("joinboard_ctx_test_empty");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let err = ServiceContext::replaying(&dir, Path::new("config.json"), dir.clone())
            .err()
            .unwrap();
        assert!(err.starts_with("No cassettes found"), "{err}");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_config_is_reported() {
        let dir = std::env::temp_dir().join("joinboard_ctx_test_noconfig");
        let _ = std::fs::remove_dir_all(&dir);

        let err = ServiceContext::live(&dir.join("config.json"), dir.clone()).err().unwrap();
        assert!(err.starts_with("Failed to read config"), "{err}");
    }
}
