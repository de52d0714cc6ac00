//! Scenario runner - steps an engine on a manual clock and records results

use std::time::Duration;

use lipsync_core::{EngineConfig, FsmCategory, Timestamp, Viseme};
use lipsync_engine::{LipsyncEngine, SpectrumSnapshot};
use lipsync_time::{Clock, ManualClock};
use tracing::trace;

/// Default step interval, one 60 Hz frame
pub const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// What the engine reported after one step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepRecord {
    pub at: Timestamp,
    pub viseme: Viseme,
    pub category: FsmCategory,
    pub volume: f32,
    pub centroid_hz: f32,
}

/// Drives an engine with synthetic spectra at a fixed cadence
pub struct ScenarioRunner {
    engine: LipsyncEngine<ManualClock>,
    clock: ManualClock,
    frame_interval: Duration,
    sample_rate: f32,
    records: Vec<StepRecord>,
}

impl ScenarioRunner {
    pub fn new(config: EngineConfig, sample_rate: f32) -> Self {
        let clock = ManualClock::new();
        ScenarioRunner {
            engine: LipsyncEngine::with_clock(config, clock.clone()),
            clock,
            frame_interval: FRAME_INTERVAL,
            sample_rate,
            records: Vec::new(),
        }
    }

    /// Step cadence
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Advance one frame and process `bins`
    pub fn step(&mut self, bins: &[f32]) -> StepRecord {
        self.clock.advance(self.frame_interval);
        self.engine
            .process_snapshot(&SpectrumSnapshot::new(bins, self.sample_rate));
        self.record()
    }

    /// Advance one frame and pull from the connected source
    pub fn step_source(&mut self) -> StepRecord {
        self.clock.advance(self.frame_interval);
        self.engine.process();
        self.record()
    }

    /// Step through every spectrum in order
    pub fn run<'a>(&mut self, frames: impl IntoIterator<Item = &'a Vec<f32>>) -> &[StepRecord] {
        let start = self.records.len();
        for bins in frames {
            self.step(bins);
        }
        &self.records[start..]
    }

    fn record(&mut self) -> StepRecord {
        let features = self.engine.features().copied().unwrap_or_default();
        let record = StepRecord {
            at: self.clock.now(),
            viseme: self.engine.viseme(),
            category: self.engine.category(),
            volume: features.volume,
            centroid_hz: features.centroid_hz,
        };
        trace!(
            step = self.records.len(),
            at = ?record.at,
            viseme = %record.viseme,
            volume = record.volume,
            "scenario step"
        );
        self.records.push(record);
        record
    }

    pub fn engine(&self) -> &LipsyncEngine<ManualClock> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut LipsyncEngine<ManualClock> {
        &mut self.engine
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Visemes chosen so far, one per step
    pub fn visemes(&self) -> Vec<Viseme> {
        self.records.iter().map(|r| r.viseme).collect()
    }

    /// Index of the first step that selected `viseme`
    pub fn first_step_with(&self, viseme: Viseme) -> Option<usize> {
        self.records.iter().position(|r| r.viseme == viseme)
    }

    /// Number of viseme changes between consecutive steps
    pub fn transitions(&self) -> usize {
        self.records
            .windows(2)
            .filter(|w| w[0].viseme != w[1].viseme)
            .count()
    }
}
