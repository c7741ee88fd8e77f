//! Capability traits for embedding the waveform editor
//!
//! A host feeds input through [`InputSink`] and learns about state changes
//! through a [`ViewportObserver`]. Closures work as observers:
//!
//! ```ignore
//! let mut completed = false;
//! dispatch(&mut editor, InputEvent::Tick { now_ms }, &mut |signal: &EditorSignal| {
//!     if *signal == EditorSignal::PlaybackComplete {
//!         completed = true;
//!     }
//! });
//! ```

use crate::waveform::{EditorSignal, InputEvent};

/// Something that consumes waveform input events
pub trait InputSink {
    /// Apply one event and report the resulting signals, in order
    fn handle_event(&mut self, event: InputEvent) -> Vec<EditorSignal>;
}

/// Receiver of editor signals
pub trait ViewportObserver {
    fn on_signal(&mut self, signal: &EditorSignal);
}

impl<F: FnMut(&EditorSignal)> ViewportObserver for F {
    fn on_signal(&mut self, signal: &EditorSignal) {
        self(signal)
    }
}

/// Feed one event to a sink and forward every resulting signal to an observer
pub fn dispatch<S, O>(sink: &mut S, event: InputEvent, observer: &mut O)
where
    S: InputSink + ?Sized,
    O: ViewportObserver + ?Sized,
{
    for signal in sink.handle_event(event) {
        observer.on_signal(&signal);
    }
}
