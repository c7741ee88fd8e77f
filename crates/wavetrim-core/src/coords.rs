//! Time / pixel / frame conversions
//!
//! All conversions are parameterized by the zoom factor of the active
//! pyramid level. Integer results round half-up.

use crate::pyramid::Pyramid;
use crate::types::{Millis, Pixel};

/// Round half-up to the nearest integer
#[inline]
fn round_half_up(x: f64) -> i32 {
    (x + 0.5).floor() as i32
}

/// Stateless converter for one zoom level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    pub sample_rate: u32,
    pub samples_per_frame: u32,
    pub zoom_factor: f64,
}

impl CoordinateMapper {
    pub fn new(sample_rate: u32, samples_per_frame: u32, zoom_factor: f64) -> Self {
        Self {
            sample_rate,
            samples_per_frame,
            zoom_factor,
        }
    }

    /// Mapper for one level of a built pyramid
    pub fn for_level(pyramid: &Pyramid, zoom_level: usize) -> Self {
        Self::new(
            pyramid.sample_rate(),
            pyramid.samples_per_frame(),
            pyramid.zoom_factor(zoom_level),
        )
    }

    /// Frames per second of audio
    fn frame_rate(&self) -> f64 {
        self.sample_rate as f64 / self.samples_per_frame as f64
    }

    pub fn seconds_to_pixels(&self, seconds: f64) -> Pixel {
        round_half_up(self.zoom_factor * seconds * self.frame_rate())
    }

    pub fn pixels_to_seconds(&self, pixels: Pixel) -> f64 {
        pixels as f64 * self.samples_per_frame as f64 / (self.sample_rate as f64 * self.zoom_factor)
    }

    pub fn millisecs_to_pixels(&self, msecs: Millis) -> Pixel {
        round_half_up(
            msecs as f64 * self.sample_rate as f64 * self.zoom_factor
                / (1000.0 * self.samples_per_frame as f64),
        )
    }

    pub fn pixels_to_millisecs(&self, pixels: Pixel) -> Millis {
        round_half_up(
            pixels as f64 * 1000.0 * self.samples_per_frame as f64
                / (self.sample_rate as f64 * self.zoom_factor),
        )
    }

    /// Frame index for a time, independent of zoom
    pub fn seconds_to_frames(&self, seconds: f64) -> i32 {
        round_half_up(seconds * self.frame_rate())
    }
}
