//! Drawable description of the waveform view
//!
//! [`build_frame`] reads the current pyramid level, viewport and selection
//! and produces everything a renderer needs for one redraw. All x values are
//! screen pixels relative to the left edge of the view.

use std::collections::BTreeMap;

use wavetrim_core::config::GridConfig;
use wavetrim_core::coords::CoordinateMapper;
use wavetrim_core::pyramid::Pyramid;
use wavetrim_core::timecode::format_timecode;
use wavetrim_core::Pixel;

use super::state::Selection;

/// One vertical amplitude bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveformBar {
    pub x: i32,
    /// Pixels above (and below) the center line
    pub half_height: i32,
    /// Inside the selection
    pub selected: bool,
}

impl WaveformBar {
    /// Vertical extent `(top, bottom)` around `center_y`
    pub fn extent(&self, center_y: i32) -> (i32, i32) {
        (center_y - self.half_height, center_y + 1 + self.half_height)
    }
}

/// Vertical grid line, optionally carrying an `m:ss` label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLine {
    pub x: i32,
    pub label: Option<String>,
}

/// Inputs for [`build_frame`]
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    pub pyramid: &'a Pyramid,
    pub zoom_level: usize,
    pub offset: Pixel,
    pub width: i32,
    pub height: i32,
    pub selection: Selection,
    /// Playback cursor in level pixels
    pub playback_cursor: Option<Pixel>,
    pub grid: &'a GridConfig,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveformFrame {
    pub width: i32,
    pub height: i32,
    pub center_y: i32,
    pub bars: Vec<WaveformBar>,
    /// Selection start marker x (may lie outside `[0, width)`)
    pub selection_start_x: i32,
    /// Selection end marker x (may lie outside `[0, width)`)
    pub selection_end_x: i32,
    /// Playback cursor x, when playing and on screen
    pub playback_cursor_x: Option<i32>,
    pub grid_lines: Vec<GridLine>,
    /// Right of this x there is no audio; draw unselected background
    pub background_from_x: i32,
}

impl WaveformFrame {
    /// Signed bar heights `(-h, +h)` in left-to-right order
    pub fn signed_heights(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.bars.iter().map(|bar| (-bar.half_height, bar.half_height))
    }
}

/// Build the drawable description for one redraw
pub fn build_frame(input: FrameInput<'_>) -> WaveformFrame {
    let FrameInput {
        pyramid,
        zoom_level,
        offset,
        width,
        height,
        selection,
        playback_cursor,
        grid,
    } = input;

    let width = width.max(0);
    let offset = offset.max(0);
    let center_y = height / 2;
    let half_height = center_y - 1;
    let visible = (pyramid.max_pos(zoom_level) - offset).clamp(0, width);

    let bars = pyramid
        .bar_heights(zoom_level, offset as usize, visible as usize, half_height)
        .into_iter()
        .enumerate()
        .map(|(i, half_height)| {
            let x = i as i32;
            WaveformBar {
                x,
                half_height,
                selected: selection.contains(offset + x),
            }
        })
        .collect();

    let playback_cursor_x = playback_cursor
        .map(|cursor| cursor - offset)
        .filter(|x| (0..visible).contains(x));

    let mapper = CoordinateMapper::for_level(pyramid, zoom_level);

    WaveformFrame {
        width,
        height,
        center_y,
        bars,
        selection_start_x: selection.start - offset,
        selection_end_x: selection.end - offset,
        playback_cursor_x,
        grid_lines: grid_lines(&mapper, offset, visible, grid),
        background_from_x: visible,
    }
}

/// Grid lines where the whole second changes, labelled at multiples of the
/// label interval
///
/// Columns `1..=visible` are scanned, so a second boundary on the column just
/// past the last bar (where the waveform ends inside the view) still gets its
/// line.
fn grid_lines(mapper: &CoordinateMapper, offset: Pixel, visible: i32, grid: &GridConfig) -> Vec<GridLine> {
    let secs_per_px = mapper.pixels_to_seconds(1);
    let every_fifth = secs_per_px > grid.dense_grid_secs_per_px;
    let label_interval = match grid.label_interval_secs(secs_per_px) {
        interval if interval > 0.0 => interval,
        _ => 1.0,
    };

    let mut lines: BTreeMap<i32, Option<String>> = BTreeMap::new();
    let start_secs = mapper.pixels_to_seconds(offset);
    let mut prev_whole = start_secs.floor() as i64;
    let mut prev_label = (start_secs / label_interval).floor() as i64;

    for x in 1..=visible {
        let secs = mapper.pixels_to_seconds(offset + x);
        let whole = secs.floor() as i64;
        if whole != prev_whole {
            prev_whole = whole;
            if !every_fifth || whole % 5 == 0 {
                lines.entry(x).or_insert(None);
            }
        }

        let label = (secs / label_interval).floor() as i64;
        if label != prev_label {
            prev_label = label;
            lines.insert(x, Some(format_timecode(whole)));
        }
    }

    lines
        .into_iter()
        .map(|(x, label)| GridLine { x, label })
        .collect()
}
