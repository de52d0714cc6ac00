//! Lipsync Time - Clocks for viseme hold timing
//!
//! The engine never sleeps or schedules; it only asks a clock what time it
//! is when a step runs. Production code uses [`MonotonicClock`], tests
//! inject a [`ManualClock`] and advance it explicitly.

pub mod clock;

pub use clock::*;
