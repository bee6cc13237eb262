//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the board client and an
//! external system (the REST backend, time, the local filesystem).
//! Implementations live in `src/adapters/`.

pub mod backend;
pub mod clock;
pub mod filesystem;

pub use backend::{ApiRequest, ApiResponse, Backend, BackendFuture, Method, RequestBody};
pub use clock::Clock;
pub use filesystem::FileSystem;
