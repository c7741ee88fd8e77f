//! Wavetrim Core - waveform analysis and coordinate math for the trim editor
//!
//! Everything in this crate is pure data and arithmetic: building the
//! multi-resolution amplitude pyramid from per-frame gains, converting between
//! seconds, milliseconds, frames and pixels at each zoom level, and the
//! tuning configuration shared by the interactive widgets.

pub mod audio_file;
pub mod config;
pub mod coords;
pub mod error;
pub mod player;
pub mod pyramid;
pub mod timecode;
pub mod types;

pub use types::*;
