//! Lipsync Core - Fundamental types and primitives
//!
//! This crate defines the core types shared by the lipsync engine:
//! - Visemes and their coarse acoustic categories
//! - Frequency bands and per-step feature frames
//! - Monotonic timestamps
//! - Engine configuration and error types

pub mod viseme;
pub mod band;
pub mod feature;
pub mod time;
pub mod config;
pub mod error;

pub use viseme::*;
pub use band::*;
pub use feature::*;
pub use time::*;
pub use config::*;
pub use error::*;
