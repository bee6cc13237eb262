//! Shared fixtures for unit tests: a scripted backend that replays canned
//! responses and records every request it receives, and an in-memory
//! filesystem.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::{json, Value};

use crate::adapters::recording::RecordingBackend;
use crate::adapters::replaying::ReplayingBackend;
use crate::cassette::format::{Cassette, Interaction};
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{ApiRequest, Backend, BackendFuture, FileSystem};

/// A canned `status`/`body` reply for `route`.
pub(crate) fn reply(route: &str, status: u16, body: Value) -> Interaction {
    Interaction {
        seq: 0,
        port: "backend".into(),
        method: route.into(),
        input: Value::Null,
        output: json!({"Ok": {"status": status, "body": body}}),
    }
}

/// A transport failure for `route`.
pub(crate) fn unreachable(route: &str) -> Interaction {
    Interaction {
        seq: 0,
        port: "backend".into(),
        method: route.into(),
        input: Value::Null,
        output: json!({"Err": "connection refused"}),
    }
}

/// Backend double: serves replies by route, remembers requests in order.
pub(crate) struct ScriptedBackend {
    inner: RecordingBackend,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl ScriptedBackend {
    pub(crate) fn new(replies: Vec<Interaction>) -> Self {
        let cassette = Cassette {
            name: "scripted".into(),
            recorded_at: Utc::now(),
            api_url: "http://api.test".into(),
            interactions: replies,
        };
        let replayer = Arc::new(Mutex::new(CassetteReplayer::new(&cassette)));
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            std::env::temp_dir().join("joinboard_scripted.yaml"),
            "scripted",
            "http://api.test",
        )));
        let inner =
            RecordingBackend::new(Box::new(ReplayingBackend::new(replayer)), Arc::clone(&recorder));
        Self { inner, recorder }
    }

    /// Routes of all requests sent so far.
    pub(crate) fn routes(&self) -> Vec<String> {
        let recorder = self.recorder.lock().unwrap();
        recorder.interactions().iter().map(|i| i.method.clone()).collect()
    }

    /// All requests sent to `route`, decoded.
    pub(crate) fn requests_to(&self, route: &str) -> Vec<ApiRequest> {
        let recorder = self.recorder.lock().unwrap();
        recorder
            .interactions()
            .iter()
            .filter(|i| i.method == route)
            .map(|i| serde_json::from_value(i.input.clone()).unwrap())
            .collect()
    }

    /// JSON body of the single request sent to `route`.
    pub(crate) fn json_body(&self, route: &str) -> Value {
        let requests = self.requests_to(route);
        assert_eq!(requests.len(), 1, "expected exactly one {route} request");
        match &requests[0].body {
            crate::ports::RequestBody::Json(value) => value.clone(),
            other => panic!("expected JSON body for {route}, got {other:?}"),
        }
    }
}

impl Backend for ScriptedBackend {
    fn send(&self, request: &ApiRequest) -> BackendFuture<'_> {
        self.inner.send(request)
    }
}

/// In-memory filesystem.
#[derive(Default)]
pub(crate) struct MemFs {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemFs {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_file(self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.files.lock().unwrap().insert(path.into(), contents.to_string());
        self
    }

    pub(crate) fn contents(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }
}

impl FileSystem for MemFs {
    fn read_to_string(&self, path: &Path) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.contents(path).ok_or_else(|| format!("File not found: {}", path.display()).into())
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.files.lock().unwrap().insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.contains_key(path) || files.keys().any(|k| k.starts_with(path) && k != path)
    }

    fn remove(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }
}
