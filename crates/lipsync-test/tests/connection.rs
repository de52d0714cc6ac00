//! Binding, rebinding and refusing input sources

use lipsync_core::{EngineConfig, LipsyncError, LipsyncResult, Viseme};
use lipsync_engine::{MicrophoneInput, MicrophoneProvider, SourceId};
use lipsync_test::{
    init_tracing, ScenarioRunner, ScriptedSource, SpectrumGenerator, TEST_SAMPLE_RATE, VOWEL_AA,
};

enum Microphone {
    Denied,
    Missing,
    Silent(u64),
    Granted(u64),
}

impl MicrophoneProvider for Microphone {
    fn request_input(&mut self) -> LipsyncResult<MicrophoneInput> {
        match self {
            Microphone::Denied => Err(LipsyncError::PermissionDenied("blocked by user".into())),
            Microphone::Missing => Err(LipsyncError::DeviceUnavailable("no capture device".into())),
            Microphone::Silent(id) => Ok(MicrophoneInput {
                device: "muted mic".into(),
                source: Box::new(ScriptedSource::empty(*id)),
            }),
            Microphone::Granted(id) => {
                let gen = SpectrumGenerator::standard(*id);
                let mut source = ScriptedSource::new(*id, TEST_SAMPLE_RATE);
                source.push(gen.band_levels(VOWEL_AA));
                Ok(MicrophoneInput {
                    device: "test mic".into(),
                    source: Box::new(source),
                })
            }
        }
    }
}

fn vowel_source(id: u64, frames: usize) -> ScriptedSource {
    let gen = SpectrumGenerator::standard(id);
    let mut source = ScriptedSource::new(id, TEST_SAMPLE_RATE);
    source.push_repeated(gen.band_levels(VOWEL_AA), frames);
    source
}

#[test]
fn test_same_source_reconnect_keeps_state() {
    init_tracing();
    let mut runner = ScenarioRunner::new(EngineConfig::default(), TEST_SAMPLE_RATE);
    runner.engine_mut().connect(Box::new(vowel_source(1, 5)));
    for _ in 0..3 {
        runner.step_source();
    }
    assert_eq!(runner.engine().viseme(), Viseme::aa);
    assert_eq!(runner.engine().history_len(), 3);

    runner.engine_mut().connect(Box::new(vowel_source(1, 5)));

    assert_eq!(runner.engine().viseme(), Viseme::aa);
    assert_eq!(runner.engine().history_len(), 3);
    assert_eq!(runner.engine().stats().connections, 1);
}

#[test]
fn test_new_source_resets_everything() {
    let mut runner = ScenarioRunner::new(EngineConfig::default(), TEST_SAMPLE_RATE);
    runner.engine_mut().connect(Box::new(vowel_source(1, 5)));
    for _ in 0..3 {
        runner.step_source();
    }

    runner.engine_mut().connect(Box::new(vowel_source(2, 5)));

    let engine = runner.engine();
    assert_eq!(engine.source_id(), Some(SourceId::new(2)));
    assert_eq!(engine.viseme(), Viseme::sil);
    assert_eq!(engine.history_len(), 0);
    assert!(engine.features().is_none());
    assert_eq!(engine.stats().connections, 2);
}

#[test]
fn test_source_without_audio_is_ignored() {
    let mut runner = ScenarioRunner::new(EngineConfig::default(), TEST_SAMPLE_RATE);
    runner.engine_mut().connect(Box::new(vowel_source(1, 5)));
    runner.step_source();

    runner.engine_mut().connect(Box::new(ScriptedSource::empty(7)));

    let engine = runner.engine();
    assert_eq!(engine.source_id(), Some(SourceId::new(1)));
    assert_eq!(engine.history_len(), 1);
    assert_eq!(engine.viseme(), Viseme::aa);
}

#[test]
fn test_microphone_failures_propagate() {
    let mut runner = ScenarioRunner::new(EngineConfig::default(), TEST_SAMPLE_RATE);

    let denied = runner
        .engine_mut()
        .connect_microphone(&mut Microphone::Denied)
        .unwrap_err();
    assert!(denied.is_permission());

    let missing = runner
        .engine_mut()
        .connect_microphone(&mut Microphone::Missing)
        .unwrap_err();
    assert!(matches!(missing, LipsyncError::DeviceUnavailable(_)));

    assert!(!runner.engine().is_connected());
}

#[test]
fn test_microphone_without_audio_is_an_error() {
    let mut runner = ScenarioRunner::new(EngineConfig::default(), TEST_SAMPLE_RATE);

    let err = runner
        .engine_mut()
        .connect_microphone(&mut Microphone::Silent(5))
        .unwrap_err();
    assert_eq!(err, LipsyncError::NoAudioData);
    assert!(!runner.engine().is_connected());
    assert_eq!(runner.engine().stats().connections, 0);

    // an already bound source stays bound
    runner.engine_mut().connect(Box::new(vowel_source(1, 5)));
    runner.step_source();
    let err = runner
        .engine_mut()
        .connect_microphone(&mut Microphone::Silent(5))
        .unwrap_err();
    assert_eq!(err, LipsyncError::NoAudioData);
    assert_eq!(runner.engine().source_id(), Some(SourceId::new(1)));
    assert_eq!(runner.engine().history_len(), 1);
}

#[test]
fn test_microphone_grant_binds_live_input() {
    let mut runner = ScenarioRunner::new(EngineConfig::default(), TEST_SAMPLE_RATE);

    let handle = runner
        .engine_mut()
        .connect_microphone(&mut Microphone::Granted(42))
        .unwrap();
    assert_eq!(handle.source, SourceId::new(42));
    assert_eq!(handle.device, "test mic");
    assert_eq!(handle.sample_rate, TEST_SAMPLE_RATE);

    // the single scripted frame is held on later reads
    for _ in 0..4 {
        runner.step_source();
    }
    assert_eq!(runner.engine().viseme(), Viseme::aa);
    assert_eq!(runner.engine().history_len(), 4);
}

#[test]
fn test_disconnect_falls_back_to_silence() {
    let mut runner = ScenarioRunner::new(EngineConfig::default(), TEST_SAMPLE_RATE);
    runner.engine_mut().connect(Box::new(vowel_source(1, 5)));
    runner.step_source();
    runner.engine_mut().disconnect();

    for _ in 0..5 {
        runner.step_source();
    }

    assert!(!runner.engine().is_connected());
    assert_eq!(runner.engine().viseme(), Viseme::sil);
    assert_eq!(runner.engine().history_len(), 0);
}
