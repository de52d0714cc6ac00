//! Feature history - the adaptive baseline
//!
//! A bounded FIFO of the most recent non-silent frames. Silent frames are
//! never retained, so the baseline reflects recent speech rather than the
//! pauses between it.

use std::collections::VecDeque;

use lipsync_core::{FeatureFrame, BAND_COUNT};

/// Frames reserved up front; larger windows grow on demand
const PREALLOCATED_FRAMES: usize = 64;

/// Bounded window of retained feature frames
#[derive(Debug, Clone)]
pub struct FeatureHistory {
    /// Retained frames, oldest first
    frames: VecDeque<FeatureFrame>,

    /// Maximum number of frames
    capacity: usize,

    /// Frames ever appended, survives `clear`
    pushed: u64,
}

impl FeatureHistory {
    /// Create an empty history holding at most `capacity` frames
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: VecDeque::with_capacity(capacity.min(PREALLOCATED_FRAMES) + 1),
            capacity,
            pushed: 0,
        }
    }

    /// Append a frame, evicting the oldest beyond capacity
    pub fn push(&mut self, frame: FeatureFrame) {
        self.frames.push_back(frame);
        self.pushed += 1;
        while self.frames.len() > self.capacity {
            self.frames.pop_front();
        }
    }

    /// Frame whose bands the next frame's deltas are measured against:
    /// the entry before the latest, `None` with fewer than two frames.
    pub fn delta_reference(&self) -> Option<&FeatureFrame> {
        let len = self.frames.len();
        if len < 2 {
            return None;
        }
        self.frames.get(len - 2)
    }

    /// Mean volume, centroid and bands over all retained frames.
    ///
    /// All-zero when empty. The baseline's `delta_bands` mirror its bands.
    pub fn average(&self) -> FeatureFrame {
        if self.frames.is_empty() {
            return FeatureFrame::ZERO;
        }

        let mut volume = 0.0f32;
        let mut centroid = 0.0f32;
        let mut bands = [0.0f32; BAND_COUNT];

        for frame in &self.frames {
            volume += frame.volume;
            centroid += frame.centroid_hz;
            for (sum, band) in bands.iter_mut().zip(frame.bands.iter()) {
                *sum += band;
            }
        }

        let len = self.frames.len() as f32;
        for band in bands.iter_mut() {
            *band /= len;
        }

        FeatureFrame {
            bands,
            delta_bands: bands,
            volume: volume / len,
            centroid_hz: centroid / len,
        }
    }

    /// Most recently retained frame
    pub fn latest(&self) -> Option<&FeatureFrame> {
        self.frames.back()
    }

    /// Oldest retained frame
    pub fn oldest(&self) -> Option<&FeatureFrame> {
        self.frames.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureFrame> {
        self.frames.iter()
    }

    /// Number of retained frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Is the window full?
    pub fn is_full(&self) -> bool {
        self.frames.len() >= self.capacity
    }

    /// Number of frames ever appended
    pub fn total_pushed(&self) -> u64 {
        self.pushed
    }

    /// Drop all frames
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
