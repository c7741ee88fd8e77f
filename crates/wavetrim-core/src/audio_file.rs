//! Per-frame gain input for waveform analysis
//!
//! Decoding is someone else's job. Whatever decodes the audio hands over one
//! loudness value per frame through the [`SoundFile`] trait, which is read
//! exactly once when a file is attached to the editor.

use serde::{Deserialize, Serialize};

/// Provider of decoded per-frame gains
pub trait SoundFile {
    /// Sample rate in Hz
    fn sample_rate(&self) -> u32;

    /// Number of raw samples folded into each frame
    fn samples_per_frame(&self) -> u32;

    /// Declared frame count (may disagree with `frame_gains` on bad input)
    fn num_frames(&self) -> i64;

    /// One non-negative gain per frame, in playback order
    fn frame_gains(&self) -> &[i32];
}

/// Owned snapshot of a sound file's gains
///
/// Cheap to move across threads, which is what the background pyramid
/// loader needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GainTrack {
    pub sample_rate: u32,
    pub samples_per_frame: u32,
    pub num_frames: i64,
    pub frame_gains: Vec<i32>,
}

impl GainTrack {
    /// Create a track whose declared frame count matches its gains
    pub fn new(sample_rate: u32, samples_per_frame: u32, frame_gains: Vec<i32>) -> Self {
        Self {
            sample_rate,
            samples_per_frame,
            num_frames: frame_gains.len() as i64,
            frame_gains,
        }
    }

    /// Copy everything the pyramid needs out of a sound file provider
    pub fn from_sound_file(file: &dyn SoundFile) -> Self {
        Self {
            sample_rate: file.sample_rate(),
            samples_per_frame: file.samples_per_frame(),
            num_frames: file.num_frames(),
            frame_gains: file.frame_gains().to_vec(),
        }
    }

    /// Track duration in seconds, derived from the frame count
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_gains.len() as f64 * self.samples_per_frame as f64 / self.sample_rate as f64
    }
}

impl SoundFile for GainTrack {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn samples_per_frame(&self) -> u32 {
        self.samples_per_frame
    }

    fn num_frames(&self) -> i64 {
        self.num_frames
    }

    fn frame_gains(&self) -> &[i32] {
        &self.frame_gains
    }
}
