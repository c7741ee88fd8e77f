//! Configuration for the wavetrim editor
//!
//! This module provides:
//!
//! - Tuning constants for interaction (fling, easing, tap, pinch)
//! - Contrast-stretch fractions used when building the amplitude pyramid
//! - Grid and timecode spacing for the render description
//! - YAML loading/saving of the engine config for the embedding application,
//!   with out-of-range values clamped
//!
//! # Usage
//!
//! ```ignore
//! use wavetrim_core::config::{default_config_path, load_engine_config, save_engine_config};
//!
//! let path = default_config_path("engine.yaml");
//! let config = load_engine_config(&path);
//! save_engine_config(&config, &path)?;
//! ```
//!
//! The engine itself never reads or writes files; only these helpers do.

mod engine;
mod io;
mod paths;

pub use engine::{ContrastConfig, EngineConfig, GridConfig, InteractionConfig};
pub use io::{load_engine_config, read_engine_config, save_engine_config};
pub use paths::{default_config_dir, default_config_path};
