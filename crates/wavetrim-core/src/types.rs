//! Common types and constants for Wavetrim

/// Number of zoom levels in every amplitude pyramid
pub const NUM_ZOOM_LEVELS: usize = 5;

/// Most zoomed-in level (two pixels per frame)
pub const MIN_ZOOM_LEVEL: usize = 0;

/// Most zoomed-out level (one pixel per eight frames)
pub const MAX_ZOOM_LEVEL: usize = NUM_ZOOM_LEVELS - 1;

/// Number of buckets in the gain histogram (gains are scaled into one byte)
pub const GAIN_HISTOGRAM_BINS: usize = 256;

/// Upper bound of the working gain range after scaling
pub const MAX_WORKING_GAIN: f64 = 255.0;

/// Frame-count thresholds for picking the initial zoom level.
///
/// Checked in order; the first threshold the frame count exceeds wins.
pub const INITIAL_ZOOM_THRESHOLDS: [(usize, usize); 3] = [(5000, 3), (1000, 2), (300, 1)];

/// Pixel coordinate at the current zoom level
pub type Pixel = i32;

/// Playback position or duration in milliseconds
pub type Millis = i32;

/// Pick the zoom level a freshly loaded file is first shown at
pub fn initial_zoom_level(num_frames: usize) -> usize {
    INITIAL_ZOOM_THRESHOLDS
        .iter()
        .find(|(threshold, _)| num_frames > *threshold)
        .map(|(_, level)| *level)
        .unwrap_or(MIN_ZOOM_LEVEL)
}
