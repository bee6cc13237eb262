//! Adapter implementations of the port traits.
//!
//! - `live`: real HTTP, clock and disk.
//! - `recording`: wrap another adapter and capture every call into a cassette.
//! - `replaying`: serve calls from a previously recorded cassette.

pub mod live;
pub mod recording;
pub mod replaying;
