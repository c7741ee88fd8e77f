//! Waveform viewport, selection and playback-cursor components
//!
//! ## Components
//!
//! - [`ViewportController`]: scroll offset, zoom level, drag / fling / ease animation
//! - [`SelectionModel`]: start/end markers, marker drags and accelerated key nudges
//! - [`PlaybackCursorSync`]: keeps the viewport on the playing position and
//!   stops playback at the end of the play range
//! - [`PinchTracker`]: turns pinch span changes into discrete zoom steps
//! - [`build_frame`]: the drawable description handed to the renderer
//! - [`WaveformEditor`]: owns all of the above and is driven by [`InputEvent`]s
//! - [`PyramidLoader`]: background pyramid construction
//!
//! ## Usage
//!
//! ```ignore
//! let loader = PyramidLoader::spawn(track, config.contrast)?;
//! let pyramid = loader.wait()?;
//! let mut editor = WaveformEditor::attach(pyramid, player, 800, 200, config);
//!
//! // From the UI thread, for every input and on a fixed timer:
//! for signal in editor.handle_event(InputEvent::Tick { now_ms }) {
//!     if signal == EditorSignal::PlaybackComplete { /* update play button */ }
//! }
//! let frame = editor.frame();
//! ```

mod editor;
mod event;
mod gesture;
mod loader;
mod playback;
mod render;
mod selection;
mod state;
mod viewport;

pub use editor::WaveformEditor;
pub use event::{EditorSignal, InputEvent};
pub use gesture::{pinch_span, PinchTracker, PinchZoom};
pub use loader::{LoaderError, PyramidLoader};
pub use playback::{PlayRange, PlaybackCursorSync, SyncStatus};
pub use render::{build_frame, FrameInput, GridLine, WaveformBar, WaveformFrame};
pub use selection::SelectionModel;
pub use state::{DragSession, Marker, Selection, ViewportPhase, ViewportState};
pub use viewport::{TouchRelease, ViewportController};
