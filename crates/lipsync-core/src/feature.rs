//! Feature frames - the per-step acoustic summary of a spectrum

use crate::BAND_COUNT;

/// Acoustic features extracted from one spectrum snapshot
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FeatureFrame {
    /// Mean normalized amplitude per band [0.0 - 1.0]
    pub bands: [f32; BAND_COUNT],

    /// Change per band against the reference history entry
    pub delta_bands: [f32; BAND_COUNT],

    /// Mean of `bands` [0.0 - 1.0]
    pub volume: f32,

    /// Amplitude-weighted mean frequency in Hz (0 for an empty spectrum)
    pub centroid_hz: f32,
}

impl FeatureFrame {
    /// All-zero frame (no speech observed)
    pub const ZERO: FeatureFrame = FeatureFrame {
        bands: [0.0; BAND_COUNT],
        delta_bands: [0.0; BAND_COUNT],
        volume: 0.0,
        centroid_hz: 0.0,
    };

    /// Build a frame from band energies; volume is derived
    pub fn from_bands(bands: [f32; BAND_COUNT], centroid_hz: f32) -> Self {
        FeatureFrame {
            bands,
            delta_bands: [0.0; BAND_COUNT],
            volume: mean(&bands),
            centroid_hz,
        }
    }

    /// Attach band deltas
    pub fn with_deltas(mut self, delta_bands: [f32; BAND_COUNT]) -> Self {
        self.delta_bands = delta_bands;
        self
    }

    /// Highest band (4-8 kHz), the fricative indicator
    #[inline]
    pub fn high_band(&self) -> f32 {
        self.bands[BAND_COUNT - 1]
    }
}

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}
