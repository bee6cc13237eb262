//! Clock port for obtaining the current time.

use chrono::{DateTime, Local};

/// Provides the current local time.
///
/// The summary view depends on "today" for deadlines and greetings, so
/// time access goes through this port and can be pinned in tests and
/// cassette playback.
pub trait Clock: Send + Sync {
    /// Returns the current local time.
    fn now(&self) -> DateTime<Local>;
}
