//! Replaying adapter for the `Backend` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{ApiRequest, ApiResponse, Backend, BackendFuture};

/// Serves recorded backend responses from a cassette, matched by route.
pub struct ReplayingBackend {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingBackend {
    /// Create a replaying backend backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl Backend for ReplayingBackend {
    fn send(&self, request: &ApiRequest) -> BackendFuture<'_> {
        let output = next_output(&self.replayer, "backend", &request.route());
        Box::pin(async move { replay_result::<ApiResponse>(output) })
    }
}
