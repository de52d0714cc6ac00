//! Feature extraction - spectrum snapshot to feature frame

use lipsync_core::{FeatureFrame, FrequencyBand, BAND_COUNT, SPEECH_BANDS};

use crate::{FeatureHistory, SpectrumSnapshot};

/// Raw measurements of one snapshot
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpectrumMeasurement {
    /// Mean amplitude per band
    pub bands: [f32; BAND_COUNT],
    /// Amplitude-weighted mean frequency in Hz
    pub centroid_hz: f32,
    /// Sum of all bin amplitudes
    pub total_amplitude: f32,
}

impl SpectrumMeasurement {
    /// Pure silence carries no amplitude at all
    #[inline]
    pub fn is_silent(&self) -> bool {
        self.total_amplitude <= 0.0
    }
}

/// Reduces spectra to band energies, centroid and volume
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    bands: [FrequencyBand; BAND_COUNT],
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor {
    /// Extractor over the fixed speech bands
    pub fn new() -> Self {
        Self {
            bands: SPEECH_BANDS,
        }
    }

    pub fn bands(&self) -> &[FrequencyBand; BAND_COUNT] {
        &self.bands
    }

    /// Measure band energies and centroid without touching any history
    pub fn measure(&self, snapshot: &SpectrumSnapshot<'_>, bin_width_hz: f32) -> SpectrumMeasurement {
        let bin_count = snapshot.bin_count();
        let bin_width_hz = if bin_width_hz.is_finite() && bin_width_hz > 0.0 {
            bin_width_hz
        } else {
            0.0
        };

        let mut bands = [0.0f32; BAND_COUNT];
        for (energy, band) in bands.iter_mut().zip(self.bands.iter()) {
            let range = band.bin_range(bin_width_hz, bin_count);
            if range.is_empty() {
                continue;
            }
            let len = range.len() as f32;
            let sum: f32 = range.map(|i| snapshot.amplitude(i)).sum();
            *energy = sum / len;
        }

        let mut total_amplitude = 0.0f64;
        let mut weighted = 0.0f64;
        for i in 0..bin_count {
            let amp = snapshot.amplitude(i) as f64;
            total_amplitude += amp;
            weighted += i as f64 * bin_width_hz as f64 * amp;
        }
        let centroid_hz = if total_amplitude > 0.0 {
            (weighted / total_amplitude) as f32
        } else {
            0.0
        };

        SpectrumMeasurement {
            bands,
            centroid_hz,
            total_amplitude: total_amplitude as f32,
        }
    }

    /// Extract one frame and retain it in `history` if it carries sound.
    ///
    /// Deltas are taken against `history` as it stands before the append.
    pub fn extract(
        &self,
        snapshot: &SpectrumSnapshot<'_>,
        bin_width_hz: f32,
        history: &mut FeatureHistory,
    ) -> FeatureFrame {
        let measurement = self.measure(snapshot, bin_width_hz);

        let mut delta_bands = [0.0f32; BAND_COUNT];
        if let Some(reference) = history.delta_reference() {
            for (i, delta) in delta_bands.iter_mut().enumerate() {
                *delta = measurement.bands[i] - reference.bands[i];
            }
        }

        let frame = FeatureFrame::from_bands(measurement.bands, measurement.centroid_hz)
            .with_deltas(delta_bands);

        if !measurement.is_silent() {
            history.push(frame);
        }

        frame
    }
}
