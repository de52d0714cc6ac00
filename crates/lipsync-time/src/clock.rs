//! Clock implementations

use std::sync::Arc;
use std::time::{Duration, Instant};

use lipsync_core::Timestamp;
use parking_lot::RwLock;

/// Source of monotonic timestamps
/// INVARIANT: successive calls to `now` never go backwards
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall clock backed by the OS monotonic clock
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    /// Origin of the timestamp scale
    reference: Instant,
}

impl MonotonicClock {
    /// Create a clock whose origin is the current instant
    pub fn new() -> Self {
        MonotonicClock {
            reference: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        let elapsed = Instant::now().duration_since(self.reference);
        Timestamp::from_micros(elapsed.as_micros() as u64)
    }
}

/// Manually driven clock.
///
/// Clones share the same time value, so a test can keep one handle and
/// give another to the engine.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    value: Arc<RwLock<Timestamp>>,
}

impl ManualClock {
    /// Create a manual clock starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manual clock starting at `start`
    pub fn starting_at(start: Timestamp) -> Self {
        ManualClock {
            value: Arc::new(RwLock::new(start)),
        }
    }

    /// Move time forward by `dt`, returning the new time
    pub fn advance(&self, dt: Duration) -> Timestamp {
        let mut value = self.value.write();
        *value = value.saturating_add(dt);
        *value
    }

    /// Move time forward by whole milliseconds
    pub fn advance_millis(&self, millis: u64) -> Timestamp {
        self.advance(Duration::from_millis(millis))
    }

    /// Jump to `target`. Only moves forward.
    pub fn set(&self, target: Timestamp) {
        let mut value = self.value.write();
        if target > *value {
            *value = target;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.value.read()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
