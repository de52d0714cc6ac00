//! Spectrum sources - the boundary to the platform audio pipeline
//!
//! The engine never captures or transforms audio itself. A host pipeline
//! owns the signal and its frequency transform, and hands the engine a
//! normalized amplitude-per-bin snapshot on demand.

use std::fmt;

use lipsync_core::LipsyncResult;

/// Identity of a connected audio source
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u64);

impl SourceId {
    pub fn new(id: u64) -> Self {
        SourceId(id)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source#{}", self.0)
    }
}

/// Borrowed view of one frequency-domain snapshot
#[derive(Clone, Copy, Debug)]
pub struct SpectrumSnapshot<'a> {
    /// Amplitude per bin, nominally [0.0 - 1.0]
    pub bins: &'a [f32],
    /// Sample rate of the analysed signal in Hz
    pub sample_rate: f32,
}

impl<'a> SpectrumSnapshot<'a> {
    pub fn new(bins: &'a [f32], sample_rate: f32) -> Self {
        SpectrumSnapshot { bins, sample_rate }
    }

    /// Normalize byte frequency data (0..=255) into `scratch` and view it
    pub fn from_bytes(bytes: &[u8], sample_rate: f32, scratch: &'a mut Vec<f32>) -> Self {
        scratch.clear();
        scratch.extend(bytes.iter().map(|&b| b as f32 / 255.0));
        SpectrumSnapshot {
            bins: scratch.as_slice(),
            sample_rate,
        }
    }

    #[inline]
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    /// Amplitude of bin `i`, clamped to [0, 1]; non-finite values read as 0
    #[inline]
    pub fn amplitude(&self, i: usize) -> f32 {
        normalize(self.bins[i])
    }
}

#[inline]
pub(crate) fn normalize(raw: f32) -> f32 {
    if raw.is_finite() {
        raw.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// A playable audio source exposing its live spectrum
pub trait SpectrumSource {
    /// Stable identity, used to detect reconnects of the same source
    fn id(&self) -> SourceId;

    /// Whether the source has audio data configured
    fn has_audio(&self) -> bool {
        true
    }

    /// Sample rate of the signal in Hz
    fn sample_rate(&self) -> f32;

    /// Fill `bins` with the current normalized amplitudes.
    /// `bins.len()` is the engine's bin count (fft_size / 2).
    fn read_spectrum(&mut self, bins: &mut [f32]);
}

impl<S: SpectrumSource + ?Sized> SpectrumSource for Box<S> {
    fn id(&self) -> SourceId {
        (**self).id()
    }

    fn has_audio(&self) -> bool {
        (**self).has_audio()
    }

    fn sample_rate(&self) -> f32 {
        (**self).sample_rate()
    }

    fn read_spectrum(&mut self, bins: &mut [f32]) {
        (**self).read_spectrum(bins)
    }
}

/// A live input granted by a [`MicrophoneProvider`]
pub struct MicrophoneInput {
    /// Human-readable device name
    pub device: String,
    /// Spectrum of the live signal
    pub source: Box<dyn SpectrumSource>,
}

impl fmt::Debug for MicrophoneInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MicrophoneInput")
            .field("device", &self.device)
            .field("source", &self.source.id())
            .finish()
    }
}

/// Handle describing a connected live input
#[derive(Clone, Debug, PartialEq)]
pub struct InputHandle {
    pub source: SourceId,
    pub device: String,
    pub sample_rate: f32,
}

/// Platform access to a microphone-equivalent input.
///
/// Fails with `PermissionDenied` when access is refused and
/// `DeviceUnavailable` when no device exists.
pub trait MicrophoneProvider {
    fn request_input(&mut self) -> LipsyncResult<MicrophoneInput>;
}
