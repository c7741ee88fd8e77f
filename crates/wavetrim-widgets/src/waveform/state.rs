//! Waveform state structures
//!
//! Plain data shared by the controllers. Controllers own the invariants;
//! these types only carry values between them and out to the renderer.

use serde::{Deserialize, Serialize};
use wavetrim_core::Pixel;

// =============================================================================
// Viewport
// =============================================================================

/// Scroll and zoom state of the visible window over the current level
///
/// All pixel values are indices into the amplitude level selected by
/// `zoom_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewportState {
    /// Index of the first visible pixel
    pub offset: Pixel,
    /// Offset the viewport is animating toward
    pub offset_goal: Pixel,
    /// Remaining fling velocity in pixels per second (signed)
    pub fling_velocity: i32,
    /// Active pyramid level (0 = most zoomed in)
    pub zoom_level: usize,
    /// Visible width in pixels
    pub width: i32,
}

/// What is currently moving the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewportPhase {
    #[default]
    Idle,
    /// A finger (or pointer) is down on the waveform
    Dragging,
    /// Momentum scrolling after a fling
    Flinging,
    /// Stepping toward `offset_goal`
    Easing,
}

// =============================================================================
// Selection
// =============================================================================

/// Selected range in pixels of the current level, `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub start: Pixel,
    pub end: Pixel,
}

impl Selection {
    pub fn new(start: Pixel, end: Pixel) -> Self {
        Self { start, end }
    }

    /// Selection length in pixels
    pub fn width(&self) -> i32 {
        self.end - self.start
    }

    /// Whether a pixel falls inside the half-open range `[start, end)`
    pub fn contains(&self, pixel: Pixel) -> bool {
        pixel >= self.start && pixel < self.end
    }
}

/// One of the two selection markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    Start,
    End,
}

// =============================================================================
// Drag Session
// =============================================================================

/// Values captured when a drag begins
///
/// Moves are applied relative to these, so a drag never accumulates
/// rounding error from intermediate positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Screen x where the touch started
    pub anchor_x: f32,
    /// Viewport offset at touch down
    pub initial_offset: Pixel,
    /// Selection at touch down
    pub initial_selection: Selection,
    /// Timestamp of touch down (milliseconds, caller's clock)
    pub started_at_ms: u64,
}

impl DragSession {
    /// Horizontal distance moved since the drag started
    pub fn delta(&self, x: f32) -> f32 {
        x - self.anchor_x
    }
}
