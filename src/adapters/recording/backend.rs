//! Recording adapter for the `Backend` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{ApiRequest, Backend, BackendFuture};

/// Records backend requests and responses while delegating to an inner backend.
///
/// Interactions are keyed by route (`"PATCH /api/edit-task/<id>"`), and the
/// full request, body included, is kept as the interaction input.
pub struct RecordingBackend {
    inner: Box<dyn Backend>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingBackend {
    /// Creates a new recording backend wrapping the given implementation.
    pub fn new(inner: Box<dyn Backend>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl Backend for RecordingBackend {
    fn send(&self, request: &ApiRequest) -> BackendFuture<'_> {
        let request = request.clone();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = self.inner.send(&request).await;
            record_result(&recorder, "backend", &request.route(), &request, &result);
            result
        })
    }
}
