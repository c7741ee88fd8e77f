//! Background pyramid construction
//!
//! Building the amplitude pyramid walks every frame of the file several
//! times, which is noticeable for long recordings. [`PyramidLoader`] runs the
//! build on a dedicated thread and publishes the finished, immutable pyramid
//! exactly once.
//!
//! ## Usage
//!
//! ```ignore
//! let mut loader = PyramidLoader::spawn(track, config.contrast)?;
//!
//! // In the tick handler:
//! if let Some(result) = loader.try_take() {
//!     let pyramid = result?;
//!     editor = Some(WaveformEditor::attach(pyramid, player, width, height, config));
//! }
//! ```

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam::channel::{bounded, Receiver, TryRecvError};
use thiserror::Error;
use wavetrim_core::audio_file::GainTrack;
use wavetrim_core::config::ContrastConfig;
use wavetrim_core::error::{InvalidInput, PyramidResult};
use wavetrim_core::pyramid::Pyramid;

/// Errors surfaced by [`PyramidLoader`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoaderError {
    #[error("Failed to spawn pyramid builder thread: {0}")]
    Spawn(String),

    #[error("Pyramid builder exited without publishing a result")]
    Disconnected,

    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
}

/// Single-assignment hand-off of a pyramid built off-thread
pub struct PyramidLoader {
    rx: Receiver<PyramidResult<Pyramid>>,
    taken: bool,
    _handle: JoinHandle<()>,
}

impl PyramidLoader {
    /// Start building a pyramid for `track` on the "pyramid-builder" thread
    pub fn spawn(track: GainTrack, contrast: ContrastConfig) -> Result<Self, LoaderError> {
        let (tx, rx) = bounded::<PyramidResult<Pyramid>>(1);

        let handle = thread::Builder::new()
            .name("pyramid-builder".to_string())
            .spawn(move || {
                let start_time = Instant::now();
                let result = Pyramid::build(
                    track.sample_rate,
                    track.samples_per_frame,
                    track.num_frames,
                    &track.frame_gains,
                    &contrast,
                );
                log::debug!(
                    "Pyramid builder finished in {:?} (ok: {})",
                    start_time.elapsed(),
                    result.is_ok()
                );
                // Receiver gone means nobody wants the result any more
                let _ = tx.send(result);
            })
            .map_err(|e| LoaderError::Spawn(e.to_string()))?;

        log::info!("Pyramid builder thread started");

        Ok(Self {
            rx,
            taken: false,
            _handle: handle,
        })
    }

    /// Whether the result has already been handed out
    pub fn is_taken(&self) -> bool {
        self.taken
    }

    /// Poll for the finished pyramid (non-blocking)
    ///
    /// Returns `Some` exactly once; `None` while building and after the
    /// result was taken.
    pub fn try_take(&mut self) -> Option<Result<Arc<Pyramid>, LoaderError>> {
        if self.taken {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.taken = true;
                Some(result.map(Arc::new).map_err(LoaderError::from))
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::error!("Pyramid builder thread disconnected unexpectedly");
                self.taken = true;
                Some(Err(LoaderError::Disconnected))
            }
        }
    }

    /// Block until the pyramid is ready
    pub fn wait(mut self) -> Result<Arc<Pyramid>, LoaderError> {
        if self.taken {
            return Err(LoaderError::Disconnected);
        }
        self.taken = true;
        match self.rx.recv() {
            Ok(result) => result.map(Arc::new).map_err(LoaderError::from),
            Err(_) => {
                log::error!("Pyramid builder thread disconnected unexpectedly");
                Err(LoaderError::Disconnected)
            }
        }
    }
}

impl std::fmt::Debug for PyramidLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PyramidLoader")
            .field("taken", &self.taken)
            .field("pending", &self.rx.len())
            .finish()
    }
}
