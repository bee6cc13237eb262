//! Records exchanged with the board backend.

mod de;
pub mod account;
pub mod contact;
pub mod task;

pub use account::{Account, Profile, Registration};
pub use contact::{Contact, ContactFields};
pub use task::{Priority, Task, TaskFields, TaskPatch, TaskState, UnknownState};

/// Initials of a full name: the upper-cased first character of each word.
///
/// `"Anna Maria Schmidt"` becomes `"AMS"`.
#[must_use]
pub fn initials_of(full_name: &str) -> String {
    full_name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
