//! Classification state - the held viseme and when it was entered

use std::time::Duration;

use lipsync_core::{FsmCategory, Timestamp, Viseme};

/// Currently held viseme
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassificationState {
    pub viseme: Viseme,
    pub category: FsmCategory,
    /// When `viseme` was entered
    pub entered_at: Timestamp,
}

impl ClassificationState {
    /// Silence, entered at `now`
    pub fn new(now: Timestamp) -> Self {
        Self {
            viseme: Viseme::sil,
            category: FsmCategory::Silence,
            entered_at: now,
        }
    }

    /// How long the current viseme has been held
    pub fn held_for(&self, now: Timestamp) -> Duration {
        now - self.entered_at
    }

    /// Apply the step's selection. The entry time resets only on change.
    /// Returns true if the viseme changed.
    pub fn transition(&mut self, selected: Viseme, now: Timestamp) -> bool {
        let changed = selected != self.viseme;
        if changed {
            self.entered_at = now;
        }
        self.viseme = selected;
        self.category = selected.category();
        changed
    }
}
