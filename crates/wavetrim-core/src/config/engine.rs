//! Engine tuning configuration
//!
//! The interaction numbers here were tuned by feel, not derived. They are
//! kept configurable so an embedding application can retune them per device.

use serde::{Deserialize, Serialize};

/// Root configuration for the waveform editor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Scrolling, fling, tap and pinch tuning
    pub interaction: InteractionConfig,
    /// Outlier trimming for the pyramid's contrast stretch
    pub contrast: ContrastConfig,
    /// Grid-line and timecode spacing
    pub grid: GridConfig,
}

impl EngineConfig {
    /// Bring every value into a range the editor can run with
    ///
    /// Hand-edited files can hold zero divisors, a zero fling decay or
    /// fractions outside `[0, 1]`; those would stall animations or invert the
    /// contrast stretch. Out-of-range values are clamped, unusable ones
    /// (non-finite, empty interval lists) fall back to their defaults.
    pub fn sanitized(self) -> Self {
        let sanitized = Self {
            interaction: self.interaction.sanitized(),
            contrast: self.contrast.sanitized(),
            grid: self.grid.clone().sanitized(),
        };
        if sanitized != self {
            log::warn!("Engine config had out-of-range values; using {:?}", sanitized);
        }
        sanitized
    }
}

/// Finite values pass through `clamp`, anything else becomes `fallback`
fn finite_or(value: f64, fallback: f64, clamp: impl Fn(f64) -> f64) -> f64 {
    if value.is_finite() {
        clamp(value)
    } else {
        fallback
    }
}

/// Touch, fling and keyboard tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Fling velocity is divided by this to get the per-tick offset step
    /// Default: 30
    pub fling_step_divisor: i32,

    /// Fling velocity magnitude lost per tick
    /// Default: 80
    pub fling_decay: i32,

    /// Touches released sooner than this are taps, not drags
    /// Default: 300ms
    pub tap_threshold_ms: u64,

    /// Easing moves `distance / ease_divisor` per tick while far from the goal
    /// Default: 10
    pub ease_divisor: i32,

    /// Within this distance easing moves a single pixel per tick
    /// Default: 10
    pub ease_snap_distance: i32,

    /// Span change (in touch units) that triggers one pinch zoom step
    /// Default: 40.0
    pub pinch_zoom_threshold: f32,

    /// Rewind / fast-forward jump while playing
    /// Default: 5000ms
    pub seek_jump_ms: i32,

    /// Length of the selection created when a file is attached
    /// Default: 15 seconds
    pub initial_selection_secs: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            fling_step_divisor: 30,
            fling_decay: 80,
            tap_threshold_ms: 300,
            ease_divisor: 10,
            ease_snap_distance: 10,
            pinch_zoom_threshold: 40.0,
            seek_jump_ms: 5000,
            initial_selection_secs: 15.0,
        }
    }
}

impl InteractionConfig {
    /// Divisors and decay of at least 1 so every animation reaches rest
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            fling_step_divisor: self.fling_step_divisor.max(1),
            fling_decay: self.fling_decay.max(1),
            tap_threshold_ms: self.tap_threshold_ms,
            ease_divisor: self.ease_divisor.max(1),
            ease_snap_distance: self.ease_snap_distance.max(0),
            pinch_zoom_threshold: if self.pinch_zoom_threshold.is_finite() {
                self.pinch_zoom_threshold.abs()
            } else {
                defaults.pinch_zoom_threshold
            },
            seek_jump_ms: self.seek_jump_ms.max(0),
            initial_selection_secs: finite_or(
                self.initial_selection_secs,
                defaults.initial_selection_secs,
                |secs| secs.max(0.0),
            ),
        }
    }
}

/// Histogram outlier trimming used to stretch waveform contrast
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrastConfig {
    /// Fraction of frames treated as the quiet floor
    /// Default: 0.05 (5%)
    pub low_outlier_fraction: f64,

    /// Fraction of frames allowed to clip at full height
    /// Default: 0.01 (1%)
    pub high_outlier_fraction: f64,
}

impl Default for ContrastConfig {
    fn default() -> Self {
        Self {
            low_outlier_fraction: 0.05,
            high_outlier_fraction: 0.01,
        }
    }
}

impl ContrastConfig {
    /// Fractions clamped to `[0, 1]`
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            low_outlier_fraction: finite_or(
                self.low_outlier_fraction,
                defaults.low_outlier_fraction,
                |f| f.clamp(0.0, 1.0),
            ),
            high_outlier_fraction: finite_or(
                self.high_outlier_fraction,
                defaults.high_outlier_fraction,
                |f| f.clamp(0.0, 1.0),
            ),
        }
    }
}

/// Grid line and timecode label spacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// When one pixel spans more seconds than this, grid lines are drawn
    /// only every fifth second
    /// Default: 1/50 s
    pub dense_grid_secs_per_px: f64,

    /// Minimum on-screen distance between two timecode labels
    /// Default: 50px
    pub min_label_spacing_px: f64,

    /// Candidate label intervals in seconds, smallest first
    /// Default: [1, 5, 15]
    pub label_intervals_secs: Vec<f64>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            dense_grid_secs_per_px: 1.0 / 50.0,
            min_label_spacing_px: 50.0,
            label_intervals_secs: vec![1.0, 5.0, 15.0],
        }
    }
}

impl GridConfig {
    /// Positive finite spacing; label intervals positive and ascending
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let mut intervals: Vec<f64> = self
            .label_intervals_secs
            .into_iter()
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .collect();
        intervals.sort_by(f64::total_cmp);
        intervals.dedup();
        if intervals.is_empty() {
            intervals = defaults.label_intervals_secs;
        }

        Self {
            dense_grid_secs_per_px: match self.dense_grid_secs_per_px {
                secs if secs.is_finite() && secs > 0.0 => secs,
                _ => defaults.dense_grid_secs_per_px,
            },
            min_label_spacing_px: finite_or(
                self.min_label_spacing_px,
                defaults.min_label_spacing_px,
                |px| px.max(0.0),
            ),
            label_intervals_secs: intervals,
        }
    }

    /// Pick the label interval for the given pixel duration
    ///
    /// Takes the first candidate whose spacing reaches `min_label_spacing_px`,
    /// falling back to the largest candidate.
    pub fn label_interval_secs(&self, secs_per_px: f64) -> f64 {
        if secs_per_px <= 0.0 {
            return self.label_intervals_secs.first().copied().unwrap_or(1.0);
        }
        self.label_intervals_secs
            .iter()
            .copied()
            .find(|interval| interval / secs_per_px >= self.min_label_spacing_px)
            .or_else(|| self.label_intervals_secs.last().copied())
            .unwrap_or(1.0)
    }
}
