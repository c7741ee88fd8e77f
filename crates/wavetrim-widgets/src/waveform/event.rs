//! Input events accepted by the editor and signals it emits
//!
//! Every user gesture and timer tick enters the editor as one
//! [`InputEvent`]; the editor answers with zero or more [`EditorSignal`]s
//! describing state changes the host application may care about.

use wavetrim_core::Millis;

use super::playback::PlayRange;
use super::state::{Marker, Selection};

// ============================================================================
// Input
// ============================================================================

/// Events fed to [`super::WaveformEditor`]
///
/// Timestamps come from the caller's monotonic clock in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    // --- Waveform touch ---
    TouchDown { x: f32, now_ms: u64 },
    TouchMove { x: f32 },
    TouchUp { now_ms: u64 },
    /// Gesture velocity in screen pixels per second
    Fling { vx: f32 },

    // --- Zoom ---
    PinchZoomIn,
    PinchZoomOut,
    /// Second finger down; `span` is the distance between the fingers
    PinchBegin { span: f32 },
    PinchMove { span: f32 },
    PinchEnd,

    // --- Markers ---
    MarkerTouchDown { marker: Marker, x: f32 },
    MarkerTouchMove { x: f32 },
    MarkerTouchUp,
    /// Marker gained keyboard focus
    MarkerFocus(Marker),
    KeyLeft,
    KeyRight,
    /// Direction key released
    KeyUp,

    // --- Transport ---
    PlayPause,
    Rewind,
    FastForward,
    /// Set the start marker to the playback position
    MarkStart,
    /// Set the end marker to the playback position and pause
    MarkEnd,
    /// The player finished on its own
    PlaybackCompleted,

    // --- Text entry ---
    SetStartSeconds(f64),
    SetEndSeconds(f64),

    // --- Layout and timer ---
    Resize { width: i32, height: i32 },
    Tick { now_ms: u64 },
}

// ============================================================================
// Output
// ============================================================================

/// State changes reported back to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorSignal {
    PlaybackStarted(PlayRange),
    /// Seek inside the current play range
    PlaybackSeeked { position_ms: Millis },
    /// Stopped by the user
    PlaybackStopped,
    /// Play range end reached or player finished
    PlaybackComplete,
    ZoomChanged { zoom_level: usize },
    SelectionChanged(Selection),
    /// The host should move keyboard focus to this marker
    FocusMarker(Marker),
}
