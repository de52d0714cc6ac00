//! Lipsync Engine - viseme classification from live spectra
//!
//! This is NOT speech recognition. It is a cheap, rule-based approximation
//! of the mouth shape that best matches the audio playing right now, tuned
//! for responsiveness over accuracy.
//!
//! # Pipeline (one `process` call)
//!
//! 1. Feature extraction: 7 band energies, spectral centroid, volume
//! 2. History update: non-silent frames feed the adaptive baseline
//! 3. Scoring: plosive, fricative, vowel and silence heuristics
//! 4. Consistency: boost the held viseme early, penalize it when held long
//! 5. Selection: highest adjusted score wins

pub mod source;
pub mod history;
pub mod extract;
pub mod scoring;
pub mod consistency;
pub mod state;
pub mod engine;

pub use source::*;
pub use history::*;
pub use extract::*;
pub use scoring::*;
pub use consistency::*;
pub use state::*;
pub use engine::*;
