//! Lipsync Test Harness - synthetic spectra and scenario driving
//!
//! This crate provides:
//! - Seeded synthetic spectrum generation (silence, vowels, hiss, noise)
//! - A scripted spectrum source for connect/process flows
//! - A scenario runner that steps the engine on a manual clock
//! - Tracing setup for test binaries

pub mod spectra;
pub mod scenario;
pub mod logging;

pub use spectra::*;
pub use scenario::*;
pub use logging::*;
