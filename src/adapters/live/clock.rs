//! Live clock using the system clock.

use chrono::{DateTime, Local};

use crate::ports::clock::Clock;

/// Live clock that returns the real current local time.
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_current_time() {
        let clock = LiveClock;
        let before = Local::now();
        let now = clock.now();
        let after = Local::now();

        assert!(now >= before);
        assert!(now <= after);
    }
}
