//! Frequency bands used for band-energy extraction
//!
//! Seven fixed ranges cover 50-8000 Hz:
//! - Band 1: low energy
//! - Bands 2-3: first formant (F1) region
//! - Bands 4-5: second/third formant (F2/F3) region
//! - Bands 6-7: fricative energy

use std::ops::Range;

/// Number of bands in a feature frame
pub const BAND_COUNT: usize = 7;

/// A half-open frequency range `[start_hz, end_hz)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrequencyBand {
    pub start_hz: f32,
    pub end_hz: f32,
}

impl FrequencyBand {
    pub const fn new(start_hz: f32, end_hz: f32) -> Self {
        FrequencyBand { start_hz, end_hz }
    }

    /// Bin indices covered by this band.
    ///
    /// `[round(start / bin_width), min(round(end / bin_width), bin_count - 1))`,
    /// empty when the bounds cross or the spectrum is empty.
    pub fn bin_range(&self, bin_width_hz: f32, bin_count: usize) -> Range<usize> {
        if bin_count == 0 || !(bin_width_hz > 0.0) {
            return 0..0;
        }
        let start = (self.start_hz / bin_width_hz).round() as usize;
        let end = ((self.end_hz / bin_width_hz).round() as usize).min(bin_count - 1);
        if start >= end {
            return end..end;
        }
        start..end
    }

    /// Band width in Hz
    #[inline]
    pub fn width_hz(&self) -> f32 {
        self.end_hz - self.start_hz
    }
}

/// The fixed band layout
pub const SPEECH_BANDS: [FrequencyBand; BAND_COUNT] = [
    FrequencyBand::new(50.0, 200.0),    // low energy
    FrequencyBand::new(200.0, 400.0),   // F1 lower
    FrequencyBand::new(400.0, 800.0),   // F1 mid
    FrequencyBand::new(800.0, 1500.0),  // F2 front
    FrequencyBand::new(1500.0, 2500.0), // F2/F3
    FrequencyBand::new(2500.0, 4000.0), // fricatives
    FrequencyBand::new(4000.0, 8000.0), // high fricatives
];
