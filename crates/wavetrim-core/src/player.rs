//! Playback collaborator interface
//!
//! The editor never produces audio. It drives whatever player the embedding
//! application provides through this trait and reads the play position back
//! on every tick.

use crate::types::Millis;

/// Audio player driven by the waveform editor
pub trait SamplePlayer {
    /// Current playback position in milliseconds
    fn current_position_ms(&self) -> Millis;

    /// Jump to a position in milliseconds
    fn seek_to(&mut self, position_ms: Millis);

    /// Start or resume playback
    fn start(&mut self);

    /// Pause playback, keeping the position
    fn pause(&mut self);

    /// Stop playback entirely
    fn stop(&mut self);

    /// Whether audio is currently running
    fn is_playing(&self) -> bool;
}

impl<P: SamplePlayer + ?Sized> SamplePlayer for Box<P> {
    fn current_position_ms(&self) -> Millis {
        (**self).current_position_ms()
    }

    fn seek_to(&mut self, position_ms: Millis) {
        (**self).seek_to(position_ms)
    }

    fn start(&mut self) {
        (**self).start()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn is_playing(&self) -> bool {
        (**self).is_playing()
    }
}
