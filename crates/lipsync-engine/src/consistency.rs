//! Consistency adjustment - temporal hysteresis on the held viseme
//!
//! A freshly entered viseme is boosted so single-frame noise cannot flip
//! it; once held past `max_hold` it is penalized more the longer it
//! stays, so the mouth does not freeze on one shape.

use std::time::Duration;

use lipsync_core::{HysteresisConfig, Timestamp};

use crate::{ClassificationState, VisemeScores};

/// Applies the hold-time multiplier to the current viseme's score
#[derive(Debug, Clone, Default)]
pub struct ConsistencyAdjuster {
    config: HysteresisConfig,
}

impl ConsistencyAdjuster {
    pub fn new(config: HysteresisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HysteresisConfig {
        &self.config
    }

    /// Multiplier for a viseme held for `held`
    pub fn hold_factor(&self, held: Duration) -> f32 {
        let h = &self.config;

        if held <= h.early_phase {
            h.boost
        } else if held <= h.max_hold {
            // non-empty interval: early_phase < held <= max_hold
            let range = (h.max_hold - h.early_phase).as_secs_f32();
            let decay = (held - h.early_phase).as_secs_f32() / range;
            h.boost - (h.boost - 1.0) * decay
        } else {
            let excess = (held - h.max_hold).as_secs_f32();
            let window = h.penalty_window.as_secs_f32();
            let penalty = if window > 0.0 { excess / window } else { 1.0 };
            (1.0 - penalty).max(h.penalty_floor)
        }
    }

    /// Scale the held viseme's score; all others pass through
    pub fn adjust(
        &self,
        scores: &VisemeScores,
        state: &ClassificationState,
        now: Timestamp,
    ) -> VisemeScores {
        let mut adjusted = *scores;
        let factor = self.hold_factor(state.held_for(now));
        adjusted.scale(state.viseme, factor);
        adjusted
    }
}
