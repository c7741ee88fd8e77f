//! Gain conditioning for waveform display
//!
//! Raw frame gains are noisy and their useful range varies wildly between
//! recordings. Before they become bar heights they are smoothed, squeezed
//! into one byte, contrast-stretched between histogram percentiles and
//! compressed so quiet passages don't look flat.

use crate::config::ContrastConfig;
use crate::types::{GAIN_HISTOGRAM_BINS, MAX_WORKING_GAIN};

/// Apply a 3-point moving average to frame gains
///
/// Unlike a windowed smoother this keeps the array length: the first and
/// last frame average with their single neighbour instead.
pub fn smooth_gains(gains: &[i32]) -> Vec<f64> {
    let n = gains.len();
    if n < 2 {
        return gains.iter().map(|&g| g as f64).collect();
    }

    let mut smoothed = Vec::with_capacity(n);
    smoothed.push((gains[0] as f64 + gains[1] as f64) / 2.0);
    for w in gains.windows(3) {
        smoothed.push((w[0] as f64 + w[1] as f64 + w[2] as f64) / 3.0);
    }
    smoothed.push((gains[n - 2] as f64 + gains[n - 1] as f64) / 2.0);
    smoothed
}

/// Factor that brings the loudest smoothed gain down to one byte
pub fn working_scale(smoothed: &[f64]) -> f64 {
    let max_gain = smoothed.iter().copied().fold(0.0f64, f64::max);
    if max_gain > MAX_WORKING_GAIN {
        MAX_WORKING_GAIN / max_gain
    } else {
        1.0
    }
}

/// 256-bucket histogram of scaled gains
#[derive(Debug, Clone)]
pub struct GainHistogram {
    bins: [u64; GAIN_HISTOGRAM_BINS],
    /// Highest occupied bucket
    peak: usize,
    total: u64,
}

impl GainHistogram {
    /// Bucket every smoothed gain after applying `scale`
    pub fn build(smoothed: &[f64], scale: f64) -> Self {
        let mut bins = [0u64; GAIN_HISTOGRAM_BINS];
        let mut peak = 0usize;
        for &gain in smoothed {
            let bucket = Self::bucket(gain * scale);
            peak = peak.max(bucket);
            bins[bucket] += 1;
        }
        Self {
            bins,
            peak,
            total: smoothed.len() as u64,
        }
    }

    fn bucket(scaled: f64) -> usize {
        // Truncation, then clamp into the byte range
        (scaled as i64).clamp(0, GAIN_HISTOGRAM_BINS as i64 - 1) as usize
    }

    /// Highest occupied bucket
    pub fn peak(&self) -> usize {
        self.peak
    }

    /// Number of gains in a bucket
    pub fn count(&self, bucket: usize) -> u64 {
        self.bins.get(bucket).copied().unwrap_or(0)
    }

    /// Total number of gains counted
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Find the stretch window that discards the configured outliers
    ///
    /// The floor walks up from 0 until the bottom `low_outlier_fraction` of
    /// frames has been passed; the ceiling walks down from the peak until the
    /// top `high_outlier_fraction` has been passed.
    pub fn contrast_window(&self, config: &ContrastConfig) -> ContrastWindow {
        let last = GAIN_HISTOGRAM_BINS - 1;

        let low_target = self.total as f64 * config.low_outlier_fraction;
        let mut min_gain = 0usize;
        let mut sum = 0u64;
        while min_gain < last && (sum as f64) < low_target {
            sum += self.bins[min_gain];
            min_gain += 1;
        }

        let high_target = self.total as f64 * config.high_outlier_fraction;
        let mut max_gain = self.peak;
        sum = 0;
        while max_gain > 2 && (sum as f64) < high_target {
            sum += self.bins[max_gain];
            max_gain -= 1;
        }

        ContrastWindow {
            min_gain: min_gain as f64,
            max_gain: max_gain as f64,
        }
    }
}

/// Scaled gain range mapped onto `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastWindow {
    pub min_gain: f64,
    pub max_gain: f64,
}

impl ContrastWindow {
    /// Whether outlier trimming left no usable range (silent or constant input)
    pub fn is_collapsed(&self) -> bool {
        self.max_gain <= self.min_gain
    }

    /// Normalize one scaled gain and apply perceptual compression (`v * v`)
    ///
    /// A collapsed window yields 0 for every input.
    pub fn height(&self, scaled_gain: f64) -> f64 {
        if self.is_collapsed() {
            return 0.0;
        }
        let v = ((scaled_gain - self.min_gain) / (self.max_gain - self.min_gain)).clamp(0.0, 1.0);
        v * v
    }
}

/// Run the whole conditioning chain: smooth, scale, stretch, compress
///
/// Every returned height is in `[0, 1]`.
pub fn normalized_heights(gains: &[i32], config: &ContrastConfig) -> Vec<f64> {
    let smoothed = smooth_gains(gains);
    let scale = working_scale(&smoothed);
    let histogram = GainHistogram::build(&smoothed, scale);
    let window = histogram.contrast_window(&config.sanitized());

    log::debug!(
        "Contrast window: frames={}, scale={:.4}, peak={}, min={}, max={}{}",
        gains.len(),
        scale,
        histogram.peak(),
        window.min_gain,
        window.max_gain,
        if window.is_collapsed() { " (collapsed)" } else { "" }
    );

    smoothed.iter().map(|&g| window.height(g * scale)).collect()
}
