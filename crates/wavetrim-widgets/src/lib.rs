//! Interactive waveform state for the wavetrim editor
//!
//! This crate turns an [`wavetrim_core::pyramid::Pyramid`] into something a
//! user can scroll, zoom and trim. Nothing here paints pixels; the editor
//! produces a [`WaveformFrame`] each redraw and an external renderer draws it.
//!
//! ## Architecture
//!
//! - **State structs**: plain data (`ViewportState`, `Selection`, `DragSession`)
//! - **Controllers**: `ViewportController`, `SelectionModel`, `PlaybackCursorSync`
//!   own one concern each and expose total, clamping operations
//! - **Editor**: `WaveformEditor` serializes every input through one
//!   `handle_event` entry point and reports what happened as `EditorSignal`s
//! - **Loader**: `PyramidLoader` builds the pyramid off-thread and hands it
//!   over exactly once
//!
//! ```text
//! InputEvent → WaveformEditor::handle_event → controllers → WaveformFrame → renderer
//! ```

pub mod traits;
pub mod waveform;

pub use traits::{dispatch, InputSink, ViewportObserver};

pub use waveform::{
    build_frame, DragSession, EditorSignal, FrameInput, GridLine, InputEvent, LoaderError,
    Marker, PinchTracker, PinchZoom, PlayRange, PlaybackCursorSync, PyramidLoader, Selection,
    SelectionModel, SyncStatus, TouchRelease, ViewportController, ViewportPhase, ViewportState,
    WaveformBar, WaveformEditor, WaveformFrame,
};
