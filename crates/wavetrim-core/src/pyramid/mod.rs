//! Multi-resolution amplitude pyramid
//!
//! Built once per attached file from per-frame gains. Level 1 holds one
//! normalized height per frame; level 0 doubles it by interpolation and
//! levels 2-4 each halve the level before by pairwise averaging.
//!
//! ```text
//! level:        0      1      2      3      4
//! zoom factor:  2.0    1.0    0.5    0.25   0.125
//! length:       2n     n      n/2    n/4    n/8   (floor division)
//! ```
//!
//! A built [`Pyramid`] is immutable; share it behind an `Arc`.

mod conditioning;

pub use conditioning::{
    normalized_heights, smooth_gains, working_scale, ContrastWindow, GainHistogram,
};

use std::time::Instant;

use crate::audio_file::SoundFile;
use crate::config::ContrastConfig;
use crate::error::{InvalidInput, PyramidResult};
use crate::types::{initial_zoom_level, NUM_ZOOM_LEVELS};

/// Bar heights at one horizontal resolution
#[derive(Debug, Clone, PartialEq)]
pub struct AmplitudeLevel {
    /// Pixels per frame at this level
    pub zoom_factor: f64,
    /// Normalized heights in `[0, 1]`, one per pixel
    pub values: Vec<f64>,
}

impl AmplitudeLevel {
    /// Number of pixels at this level
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Interpolate a frame-resolution level up to two pixels per frame
    fn doubled(native: &AmplitudeLevel) -> Self {
        let h = &native.values;
        let mut values = Vec::with_capacity(h.len() * 2);
        if let Some(&first) = h.first() {
            values.push(0.5 * first);
            values.push(first);
        }
        for pair in h.windows(2) {
            values.push(0.5 * (pair[0] + pair[1]));
            values.push(pair[1]);
        }
        Self {
            zoom_factor: native.zoom_factor * 2.0,
            values,
        }
    }

    /// Average adjacent pairs; an odd trailing value is dropped
    fn halved(&self) -> Self {
        let values = self
            .values
            .chunks_exact(2)
            .map(|pair| 0.5 * (pair[0] + pair[1]))
            .collect();
        Self {
            zoom_factor: self.zoom_factor / 2.0,
            values,
        }
    }
}

/// The full set of zoom levels for one sound file
#[derive(Debug, Clone, PartialEq)]
pub struct Pyramid {
    levels: Vec<AmplitudeLevel>,
    sample_rate: u32,
    samples_per_frame: u32,
    num_frames: usize,
    initial_zoom_level: usize,
}

impl Pyramid {
    /// Build the pyramid from raw frame gains
    ///
    /// Fails with [`InvalidInput`] when the declared frame count is negative
    /// or disagrees with `frame_gains`, when a gain is negative, or when the
    /// sample rate / frame size is zero.
    pub fn build(
        sample_rate: u32,
        samples_per_frame: u32,
        num_frames: i64,
        frame_gains: &[i32],
        contrast: &ContrastConfig,
    ) -> PyramidResult<Self> {
        if num_frames < 0 {
            return Err(InvalidInput::NegativeFrameCount(num_frames));
        }
        if frame_gains.len() as i64 != num_frames {
            return Err(InvalidInput::FrameCountMismatch {
                declared: num_frames,
                actual: frame_gains.len(),
            });
        }
        if let Some((frame, &gain)) = frame_gains.iter().enumerate().find(|&(_, &g)| g < 0) {
            return Err(InvalidInput::NegativeGain { frame, gain });
        }
        if sample_rate == 0 {
            return Err(InvalidInput::ZeroSampleRate);
        }
        if samples_per_frame == 0 {
            return Err(InvalidInput::ZeroSamplesPerFrame);
        }

        let start_time = Instant::now();

        let native = AmplitudeLevel {
            zoom_factor: 1.0,
            values: normalized_heights(frame_gains, contrast),
        };

        let mut levels = Vec::with_capacity(NUM_ZOOM_LEVELS);
        levels.push(AmplitudeLevel::doubled(&native));
        levels.push(native);
        while levels.len() < NUM_ZOOM_LEVELS {
            let next = levels[levels.len() - 1].halved();
            levels.push(next);
        }

        let num_frames = frame_gains.len();
        let initial_zoom_level = initial_zoom_level(num_frames);

        log::info!(
            "Built amplitude pyramid: {} frames @ {}Hz/{} spf in {:?}, initial zoom level {}",
            num_frames,
            sample_rate,
            samples_per_frame,
            start_time.elapsed(),
            initial_zoom_level
        );

        Ok(Self {
            levels,
            sample_rate,
            samples_per_frame,
            num_frames,
            initial_zoom_level,
        })
    }

    /// Build from a sound file provider
    pub fn from_sound_file(file: &dyn SoundFile, contrast: &ContrastConfig) -> PyramidResult<Self> {
        Self::build(
            file.sample_rate(),
            file.samples_per_frame(),
            file.num_frames(),
            file.frame_gains(),
            contrast,
        )
    }

    /// All levels, most zoomed-in first
    pub fn levels(&self) -> &[AmplitudeLevel] {
        &self.levels
    }

    /// One level, or `None` past the last level
    pub fn level(&self, zoom_level: usize) -> Option<&AmplitudeLevel> {
        self.levels.get(zoom_level)
    }

    /// Number of pixels at a zoom level (0 for out-of-range levels)
    pub fn max_pos(&self, zoom_level: usize) -> i32 {
        self.level(zoom_level).map(|l| l.len() as i32).unwrap_or(0)
    }

    /// Pixels per frame at a zoom level
    ///
    /// Out-of-range levels clamp to the nearest valid one.
    pub fn zoom_factor(&self, zoom_level: usize) -> f64 {
        let idx = zoom_level.min(self.levels.len().saturating_sub(1));
        self.levels
            .get(idx)
            .map(|l| l.zoom_factor)
            .unwrap_or(1.0)
    }

    /// Zoom level picked from the file length
    pub fn initial_zoom_level(&self) -> usize {
        self.initial_zoom_level
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples_per_frame(&self) -> u32 {
        self.samples_per_frame
    }

    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Integer bar half-heights for a pixel range of one level
    ///
    /// `half_height` is the number of pixels available above the center line.
    /// Pixels outside the level are skipped, so the result can be shorter
    /// than `len`.
    pub fn bar_heights(&self, zoom_level: usize, start: usize, len: usize, half_height: i32) -> Vec<i32> {
        let Some(level) = self.level(zoom_level) else {
            return Vec::new();
        };
        let half_height = half_height.max(0) as f64;
        level
            .values
            .iter()
            .skip(start)
            .take(len)
            .map(|&v| (v * half_height) as i32)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MAX_ZOOM_LEVEL;

    fn build(gains: &[i32]) -> Pyramid {
        Pyramid::build(44100, 1152, gains.len() as i64, gains, &ContrastConfig::default()).unwrap()
    }

    fn ramp(n: usize) -> Vec<i32> {
        (0..n).map(|i| ((i * 7919) % 600) as i32).collect()
    }

    #[test]
    fn test_level_shapes() {
        for n in [0usize, 1, 2, 3, 7, 16, 301, 1001] {
            let pyramid = build(&ramp(n));
            let levels = pyramid.levels();
            assert_eq!(levels.len(), NUM_ZOOM_LEVELS);
            assert_eq!(levels[1].len(), n);
            assert_eq!(levels[0].len(), 2 * n);
            for k in 2..NUM_ZOOM_LEVELS {
                assert_eq!(levels[k].len(), levels[k - 1].len() / 2, "n={} level={}", n, k);
            }
        }
    }

    #[test]
    fn test_zoom_factors_halve() {
        let pyramid = build(&ramp(64));
        let factors: Vec<f64> = pyramid.levels().iter().map(|l| l.zoom_factor).collect();
        assert_eq!(factors, vec![2.0, 1.0, 0.5, 0.25, 0.125]);
        assert_eq!(pyramid.zoom_factor(MAX_ZOOM_LEVEL + 3), 0.125);
    }

    #[test]
    fn test_all_values_in_unit_range() {
        let pyramid = build(&ramp(2000));
        for level in pyramid.levels() {
            assert!(level.values.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn test_empty_input() {
        let pyramid = build(&[]);
        assert!(pyramid.levels().iter().all(|l| l.is_empty()));
        assert_eq!(pyramid.initial_zoom_level(), 0);
        assert_eq!(pyramid.max_pos(0), 0);
    }

    #[test]
    fn test_constant_gains_are_flat_zero() {
        let pyramid = build(&[10, 10, 10, 10, 10, 10]);
        for level in pyramid.levels() {
            assert!(level.values.iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_level_zero_interpolation() {
        let pyramid = build(&ramp(50));
        let h = &pyramid.levels()[1].values;
        let l0 = &pyramid.levels()[0].values;
        assert!((l0[0] - 0.5 * h[0]).abs() < 1e-12);
        assert_eq!(l0[1], h[0]);
        for i in 1..h.len() {
            assert!((l0[2 * i] - 0.5 * (h[i - 1] + h[i])).abs() < 1e-12);
            assert_eq!(l0[2 * i + 1], h[i]);
        }
    }

    #[test]
    fn test_halved_levels_average_pairs() {
        let pyramid = build(&ramp(33));
        let l1 = &pyramid.levels()[1].values;
        let l2 = &pyramid.levels()[2].values;
        for i in 0..l2.len() {
            assert!((l2[i] - 0.5 * (l1[2 * i] + l1[2 * i + 1])).abs() < 1e-12);
        }
    }

    #[test]
    fn test_initial_zoom_from_length() {
        assert_eq!(build(&ramp(300)).initial_zoom_level(), 0);
        assert_eq!(build(&ramp(301)).initial_zoom_level(), 1);
        assert_eq!(build(&ramp(1001)).initial_zoom_level(), 2);
        assert_eq!(build(&ramp(5001)).initial_zoom_level(), 3);
    }

    #[test]
    fn test_invalid_inputs() {
        let contrast = ContrastConfig::default();
        assert_eq!(
            Pyramid::build(44100, 1152, -1, &[], &contrast),
            Err(InvalidInput::NegativeFrameCount(-1))
        );
        assert_eq!(
            Pyramid::build(44100, 1152, 3, &[1, 2], &contrast),
            Err(InvalidInput::FrameCountMismatch { declared: 3, actual: 2 })
        );
        assert_eq!(
            Pyramid::build(44100, 1152, 2, &[1, -2], &contrast),
            Err(InvalidInput::NegativeGain { frame: 1, gain: -2 })
        );
        assert_eq!(
            Pyramid::build(0, 1152, 1, &[1], &contrast),
            Err(InvalidInput::ZeroSampleRate)
        );
        assert_eq!(
            Pyramid::build(44100, 0, 1, &[1], &contrast),
            Err(InvalidInput::ZeroSamplesPerFrame)
        );
    }

    #[test]
    fn test_bar_heights_truncate_and_skip_out_of_range() {
        let pyramid = build(&ramp(20));
        let all = pyramid.bar_heights(1, 0, 20, 100);
        assert_eq!(all.len(), 20);
        for (i, &h) in all.iter().enumerate() {
            assert_eq!(h, (pyramid.levels()[1].values[i] * 100.0) as i32);
        }
        assert_eq!(pyramid.bar_heights(1, 15, 10, 100).len(), 5);
        assert!(pyramid.bar_heights(9, 0, 10, 100).is_empty());
    }
}
