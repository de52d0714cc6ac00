//! Lipsync engine - one synchronous classification step per call
//!
//! The host's render loop drives the engine: each `process` call pulls a
//! spectrum snapshot, extracts features, updates the baseline, scores all
//! visemes, applies hysteresis and selects the winner. Nothing runs in the
//! background.

use lipsync_core::{
    EngineConfig, FeatureFrame, FsmCategory, LipsyncError, LipsyncResult, Viseme,
};
use lipsync_time::{Clock, MonotonicClock};
use tracing::{debug, error, trace, warn};

use crate::{
    score_visemes, ClassificationState, ConsistencyAdjuster, FeatureExtractor, FeatureHistory,
    InputHandle, MicrophoneProvider, SourceId, SpectrumSnapshot, SpectrumSource, VisemeScores,
};

/// Counters over the engine's lifetime
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Processing steps run
    pub steps: u64,
    /// Frames retained in history
    pub retained_frames: u64,
    /// Steps where the selected viseme changed
    pub viseme_changes: u64,
    /// Successful connects to a new source
    pub connections: u64,
}

/// Frame-driven viseme classifier
pub struct LipsyncEngine<C: Clock = MonotonicClock> {
    /// Configuration
    config: EngineConfig,
    /// Band energy / centroid extraction
    extractor: FeatureExtractor,
    /// Hold-time hysteresis
    adjuster: ConsistencyAdjuster,
    /// Time source for hold durations
    clock: C,
    /// Bound spectrum source
    source: Option<Box<dyn SpectrumSource>>,
    /// Scratch buffer the source fills each step
    spectrum: Vec<f32>,
    /// Adaptive baseline
    history: FeatureHistory,
    /// Latest extracted features, retained or not
    features: Option<FeatureFrame>,
    /// Adjusted scores of the latest step
    scores: Option<VisemeScores>,
    /// Held viseme
    state: ClassificationState,
    stats: EngineStats,
}

impl LipsyncEngine<MonotonicClock> {
    /// Create an engine timed by the wall clock
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl Default for LipsyncEngine<MonotonicClock> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<C: Clock> LipsyncEngine<C> {
    /// Create an engine with an injected clock
    pub fn with_clock(config: EngineConfig, clock: C) -> Self {
        let now = clock.now();
        LipsyncEngine {
            extractor: FeatureExtractor::new(),
            adjuster: ConsistencyAdjuster::new(config.hysteresis.clone()),
            spectrum: vec![0.0; config.bin_count()],
            history: FeatureHistory::new(config.history_size),
            features: None,
            scores: None,
            state: ClassificationState::new(now),
            stats: EngineStats::default(),
            source: None,
            clock,
            config,
        }
    }

    /// Bind an audio source.
    ///
    /// Reconnecting the already bound source does nothing. A source
    /// without audio data is logged and ignored. Otherwise all history
    /// and classification state is reset before binding.
    pub fn connect(&mut self, source: Box<dyn SpectrumSource>) {
        let id = source.id();

        if self.source_id() == Some(id) {
            debug!(source = %id, "source already connected");
            return;
        }

        if !source.has_audio() {
            warn!(
                source = %id,
                reason = %LipsyncError::NoAudioData,
                "An audio source must be set before connecting"
            );
            return;
        }

        self.reset();
        self.source = Some(source);
        self.stats.connections += 1;
        debug!(source = %id, "source connected");
    }

    /// Request a live input and bind it.
    ///
    /// Permission and device failures are logged and returned to the
    /// caller, which decides how to prompt the user. A granted input
    /// without audio data fails with `NoAudioData` and nothing is bound.
    pub fn connect_microphone<P>(&mut self, provider: &mut P) -> LipsyncResult<InputHandle>
    where
        P: MicrophoneProvider + ?Sized,
    {
        let input = provider.request_input().map_err(|err| {
            error!(error = %err, "Error accessing microphone");
            err
        })?;

        if !input.source.has_audio() {
            let err = LipsyncError::NoAudioData;
            error!(
                source = %input.source.id(),
                device = %input.device,
                error = %err,
                "Error accessing microphone"
            );
            return Err(err);
        }

        let handle = InputHandle {
            source: input.source.id(),
            device: input.device,
            sample_rate: input.source.sample_rate(),
        };
        self.connect(input.source);
        Ok(handle)
    }

    /// Unbind the current source and reset
    pub fn disconnect(&mut self) {
        if let Some(source) = self.source.take() {
            debug!(source = %source.id(), "source disconnected");
        }
        self.reset();
    }

    /// Run one step against the bound source.
    ///
    /// Without a source the step sees an all-zero spectrum.
    pub fn process(&mut self) {
        let mut spectrum = std::mem::take(&mut self.spectrum);
        spectrum.resize(self.config.bin_count(), 0.0);

        let sample_rate = match self.source.as_mut() {
            Some(source) => {
                source.read_spectrum(&mut spectrum);
                source.sample_rate()
            }
            None => {
                spectrum.fill(0.0);
                0.0
            }
        };

        self.process_snapshot(&SpectrumSnapshot::new(&spectrum, sample_rate));
        self.spectrum = spectrum;
    }

    /// Run one step against a caller-provided snapshot
    pub fn process_snapshot(&mut self, snapshot: &SpectrumSnapshot<'_>) {
        let bin_width_hz = self.config.bin_width_hz(snapshot.sample_rate);
        let pushed_before = self.history.total_pushed();

        let current = self
            .extractor
            .extract(snapshot, bin_width_hz, &mut self.history);
        self.stats.retained_frames += self.history.total_pushed() - pushed_before;
        self.features = Some(current);

        let baseline = self.history.average();
        let d_volume = current.volume - baseline.volume;
        let d_centroid = current.centroid_hz - baseline.centroid_hz;

        let raw = score_visemes(&current, &baseline, d_volume, d_centroid);

        let now = self.clock.now();
        let adjusted = self.adjuster.adjust(&raw, &self.state, now);
        let selected = adjusted.argmax();

        trace!(
            volume = current.volume,
            centroid_hz = current.centroid_hz,
            scores = ?adjusted.as_array(),
            selected = %selected,
            "viseme scores"
        );

        let previous = self.state.viseme;
        let held = self.state.held_for(now);
        if self.state.transition(selected, now) {
            self.stats.viseme_changes += 1;
            debug!(
                from = %previous,
                to = %selected,
                category = %self.state.category,
                held_ms = held.as_millis() as u64,
                "viseme transition"
            );
        }

        self.scores = Some(adjusted);
        self.stats.steps += 1;
    }

    /// Clear history, features and classification state
    fn reset(&mut self) {
        self.history.clear();
        self.features = None;
        self.scores = None;
        self.state = ClassificationState::new(self.clock.now());
        debug!("engine state reset");
    }

    /// Latest features, `None` before the first step
    pub fn features(&self) -> Option<&FeatureFrame> {
        self.features.as_ref()
    }

    /// Currently selected viseme
    pub fn viseme(&self) -> Viseme {
        self.state.viseme
    }

    /// Category of the current viseme
    pub fn category(&self) -> FsmCategory {
        self.state.category
    }

    pub fn state(&self) -> &ClassificationState {
        &self.state
    }

    /// Adjusted scores of the latest step
    pub fn last_scores(&self) -> Option<&VisemeScores> {
        self.scores.as_ref()
    }

    pub fn history(&self) -> &FeatureHistory {
        &self.history
    }

    /// Number of retained frames
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn source_id(&self) -> Option<SourceId> {
        self.source.as_ref().map(|s| s.id())
    }

    pub fn is_connected(&self) -> bool {
        self.source.is_some()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }
}
