//! Wall-clock abstraction.
//!
//! Check-in, check-out and the dashboard's default date all read the current
//! local time through [`Clock`], so tests can pin it with [`FixedClock`].

use std::sync::{Arc, Mutex};

use chrono::{Duration, Local, NaiveDateTime};

/// Source of the current local date and time.
pub trait Clock: Send + Sync + 'static {
    /// Returns the current local wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// The system's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A manually controlled clock for tests.
///
/// Clones share the same underlying time.
///
/// # Example
///
/// ```
/// use attendance_engine::clock::{Clock, FixedClock};
/// use chrono::{Duration, NaiveDateTime};
///
/// let start = NaiveDateTime::parse_from_str("2026-03-02 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let clock = FixedClock::new(start);
/// clock.advance(Duration::hours(8));
/// assert_eq!(clock.now().to_string(), "2026-03-02 17:00:00");
/// ```
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<NaiveDateTime>>,
}

impl FixedClock {
    /// Creates a clock frozen at `now`.
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: NaiveDateTime) {
        let mut guard = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = now;
    }

    /// Moves the clock forward (or backward, for a negative duration).
    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
