//! Engine configuration
//!
//! Nothing here is enforced at construction: out-of-range values are the
//! caller's responsibility. [`EngineConfig::validate`] is available for
//! callers that want to reject them up front.

use std::time::Duration;

use crate::{LipsyncError, LipsyncResult};

/// Default FFT size
pub const DEFAULT_FFT_SIZE: u32 = 2048;

/// Default number of retained feature frames
pub const DEFAULT_HISTORY_SIZE: usize = 10;

/// Temporal hysteresis applied to the currently held viseme
#[derive(Clone, Debug, PartialEq)]
pub struct HysteresisConfig {
    /// Full boost while the viseme is younger than this
    pub early_phase: Duration,
    /// Hold time after which the penalty applies
    pub max_hold: Duration,
    /// Multiplier during the early phase
    pub boost: f32,
    /// Time over `max_hold` for the penalty to go from 1.0 to 0.0
    pub penalty_window: Duration,
    /// Lowest penalty multiplier
    pub penalty_floor: f32,
}

impl Default for HysteresisConfig {
    fn default() -> Self {
        // Reference heuristic: early phase and max hold coincide, so the
        // linear decay between them never runs.
        HysteresisConfig {
            early_phase: Duration::from_millis(100),
            max_hold: Duration::from_millis(100),
            boost: 1.3,
            penalty_window: Duration::from_millis(1000),
            penalty_floor: 0.5,
        }
    }
}

impl HysteresisConfig {
    /// Hysteresis disabled: every multiplier is 1.0
    pub fn disabled() -> Self {
        HysteresisConfig {
            early_phase: Duration::ZERO,
            max_hold: Duration::MAX,
            boost: 1.0,
            penalty_window: Duration::from_millis(1000),
            penalty_floor: 1.0,
        }
    }
}

/// Engine configuration, fixed at construction
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// FFT size used by the spectrum source (power of two)
    pub fft_size: u32,
    /// Maximum number of retained non-silent frames
    pub history_size: usize,
    /// Hold-time boost/penalty
    pub hysteresis: HysteresisConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            fft_size: DEFAULT_FFT_SIZE,
            history_size: DEFAULT_HISTORY_SIZE,
            hysteresis: HysteresisConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Configuration for hosts that step faster than the render loop
    pub fn low_latency() -> Self {
        EngineConfig {
            fft_size: 1024,
            history_size: 5,
            hysteresis: HysteresisConfig::default(),
        }
    }

    pub fn with_fft_size(mut self, fft_size: u32) -> Self {
        self.fft_size = fft_size;
        self
    }

    pub fn with_history_size(mut self, history_size: usize) -> Self {
        self.history_size = history_size;
        self
    }

    pub fn with_hysteresis(mut self, hysteresis: HysteresisConfig) -> Self {
        self.hysteresis = hysteresis;
        self
    }

    /// Number of frequency bins in a spectrum snapshot
    #[inline]
    pub fn bin_count(&self) -> usize {
        (self.fft_size / 2) as usize
    }

    /// Width of one bin in Hz
    #[inline]
    pub fn bin_width_hz(&self, sample_rate: f32) -> f32 {
        if self.fft_size == 0 {
            return 0.0;
        }
        sample_rate / self.fft_size as f32
    }

    /// Check the values the engine assumes but does not enforce
    pub fn validate(&self) -> LipsyncResult<()> {
        if self.fft_size == 0 || !self.fft_size.is_power_of_two() {
            return Err(LipsyncError::InvalidConfig(format!(
                "fft_size must be a power of two, got {}",
                self.fft_size
            )));
        }
        if self.history_size == 0 {
            return Err(LipsyncError::InvalidConfig(
                "history_size must be positive".to_string(),
            ));
        }
        if self.hysteresis.max_hold < self.hysteresis.early_phase {
            return Err(LipsyncError::InvalidConfig(
                "max_hold must not be shorter than early_phase".to_string(),
            ));
        }
        Ok(())
    }
}
