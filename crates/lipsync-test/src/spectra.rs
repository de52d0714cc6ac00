//! Synthetic spectra shaped like the sounds the scorer looks for

use std::collections::VecDeque;

use lipsync_core::{EngineConfig, BAND_COUNT, SPEECH_BANDS};
use lipsync_engine::{SourceId, SpectrumSource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Common test sample rate
pub const TEST_SAMPLE_RATE: f32 = 48_000.0;

/// Band levels for an open "ah"
pub const VOWEL_AA: [f32; BAND_COUNT] = [0.5, 0.1, 0.3, 0.6, 0.2, 0.1, 0.05];

/// Band levels for "eh": formants falling through F1/F2
pub const VOWEL_E: [f32; BAND_COUNT] = [0.3, 0.8, 0.5, 0.2, 0.1, 0.05, 0.05];

/// Generates spectra for a fixed FFT size and sample rate
#[derive(Debug)]
pub struct SpectrumGenerator {
    bin_count: usize,
    sample_rate: f32,
    rng: StdRng,
}

impl SpectrumGenerator {
    /// Create a generator with a deterministic seed
    pub fn new(config: &EngineConfig, sample_rate: f32, seed: u64) -> Self {
        SpectrumGenerator {
            bin_count: config.bin_count(),
            sample_rate,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Default config at 48 kHz
    pub fn standard(seed: u64) -> Self {
        Self::new(&EngineConfig::default(), TEST_SAMPLE_RATE, seed)
    }

    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Width of one bin in Hz
    pub fn bin_width_hz(&self) -> f32 {
        self.sample_rate / (self.bin_count * 2) as f32
    }

    /// All bins zero
    pub fn silence(&self) -> Vec<f32> {
        vec![0.0; self.bin_count]
    }

    /// All bins at `level`
    pub fn uniform(&self, level: f32) -> Vec<f32> {
        vec![level; self.bin_count]
    }

    /// Bins filled so each speech band averages exactly its level.
    /// Bins outside the bands stay zero.
    pub fn band_levels(&self, levels: [f32; BAND_COUNT]) -> Vec<f32> {
        let mut bins = self.silence();
        let bin_width = self.bin_width_hz();
        for (band, level) in SPEECH_BANDS.iter().zip(levels) {
            for i in band.bin_range(bin_width, self.bin_count) {
                bins[i] = level;
            }
        }
        bins
    }

    /// High-frequency hiss: energy in the two fricative bands only
    pub fn hiss(&self, mid: f32, high: f32) -> Vec<f32> {
        let mut levels = [0.0; BAND_COUNT];
        levels[5] = mid;
        levels[6] = high;
        self.band_levels(levels)
    }

    /// Uniform random amplitudes in `[0, max]`
    pub fn noise(&mut self, max: f32) -> Vec<f32> {
        let max = max.max(f32::EPSILON);
        (0..self.bin_count)
            .map(|_| self.rng.gen_range(0.0..=max))
            .collect()
    }

    /// Perturb non-zero bins by up to `amount`, keeping them in [0, 1]
    pub fn jitter(&mut self, bins: &mut [f32], amount: f32) {
        if amount <= 0.0 {
            return;
        }
        for bin in bins.iter_mut().filter(|b| **b > 0.0) {
            let offset = self.rng.gen_range(-amount..=amount);
            *bin = (*bin + offset).clamp(0.0, 1.0);
        }
    }
}

/// Source that plays back a script of spectra, holding the last one
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    id: SourceId,
    sample_rate: f32,
    frames: VecDeque<Vec<f32>>,
    last: Option<Vec<f32>>,
    has_audio: bool,
}

impl ScriptedSource {
    pub fn new(id: u64, sample_rate: f32) -> Self {
        ScriptedSource {
            id: SourceId::new(id),
            sample_rate,
            frames: VecDeque::new(),
            last: None,
            has_audio: true,
        }
    }

    /// Source with nothing loaded; the engine refuses to connect it
    pub fn empty(id: u64) -> Self {
        ScriptedSource {
            has_audio: false,
            ..Self::new(id, TEST_SAMPLE_RATE)
        }
    }

    /// Queue a spectrum
    pub fn push(&mut self, bins: Vec<f32>) {
        self.frames.push_back(bins);
    }

    /// Queue a spectrum `count` times
    pub fn push_repeated(&mut self, bins: Vec<f32>, count: usize) {
        for _ in 0..count {
            self.frames.push_back(bins.clone());
        }
    }

    pub fn with_frames(mut self, frames: impl IntoIterator<Item = Vec<f32>>) -> Self {
        self.frames.extend(frames);
        self
    }

    /// Spectra not yet played
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl SpectrumSource for ScriptedSource {
    fn id(&self) -> SourceId {
        self.id
    }

    fn has_audio(&self) -> bool {
        self.has_audio
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn read_spectrum(&mut self, bins: &mut [f32]) {
        if let Some(next) = self.frames.pop_front() {
            self.last = Some(next);
        }
        bins.fill(0.0);
        if let Some(last) = &self.last {
            let n = bins.len().min(last.len());
            bins[..n].copy_from_slice(&last[..n]);
        }
    }
}
