//! Selection model
//!
//! Start/end markers over the active level. Every mutation goes through
//! [`SelectionModel::trap`], so `0 <= start <= end <= max_pos` holds after
//! each call.

use log::debug;
use wavetrim_core::Pixel;

use super::state::{DragSession, Marker, Selection};

/// Selection markers with drag and keyboard nudging
#[derive(Debug, Clone)]
pub struct SelectionModel {
    selection: Selection,
    max_pos: i32,
    drag: Option<(Marker, DragSession)>,
    /// Consecutive key-repeat events since the last key release
    key_repeat: u32,
}

impl SelectionModel {
    pub fn new(start: Pixel, end: Pixel, max_pos: i32) -> Self {
        let mut model = Self {
            selection: Selection::default(),
            max_pos: max_pos.max(0),
            drag: None,
            key_repeat: 0,
        };
        model.set_range(start, end);
        model
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn start(&self) -> Pixel {
        self.selection.start
    }

    pub fn end(&self) -> Pixel {
        self.selection.end
    }

    pub fn max_pos(&self) -> i32 {
        self.max_pos
    }

    pub fn position(&self, marker: Marker) -> Pixel {
        match marker {
            Marker::Start => self.selection.start,
            Marker::End => self.selection.end,
        }
    }

    /// Clamp a position into `[0, max_pos]`
    pub fn trap(&self, pos: Pixel) -> Pixel {
        pos.clamp(0, self.max_pos)
    }

    /// Replace the whole range, ordering and clamping it
    pub fn set_range(&mut self, start: Pixel, end: Pixel) {
        let start = self.trap(start);
        self.selection = Selection::new(start, self.trap(end).max(start));
    }

    /// Move the start marker, pushing the end along if it would cross
    pub fn set_start(&mut self, pos: Pixel) {
        self.selection.start = self.trap(pos);
        if self.selection.end < self.selection.start {
            self.selection.end = self.selection.start;
        }
    }

    /// Move the end marker, never before the start
    pub fn set_end(&mut self, pos: Pixel) {
        self.selection.end = self.trap(pos).max(self.selection.start);
    }

    /// Change the level length (e.g. after a zoom) and re-clamp
    pub fn set_max_pos(&mut self, max_pos: i32) {
        self.max_pos = max_pos.max(0);
        self.set_range(self.selection.start, self.selection.end);
    }

    // =========================================================================
    // Marker Drag
    // =========================================================================

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn dragged_marker(&self) -> Option<Marker> {
        self.drag.map(|(marker, _)| marker)
    }

    /// Touch down on a marker
    pub fn begin_drag(&mut self, marker: Marker, x: f32) {
        self.drag = Some((
            marker,
            DragSession {
                anchor_x: x,
                initial_offset: 0,
                initial_selection: self.selection,
                started_at_ms: 0,
            },
        ));
    }

    /// Marker dragged to screen x. Dragging the start marker moves the whole
    /// selection; dragging the end marker resizes it.
    ///
    /// Returns whether the selection changed.
    pub fn drag_to(&mut self, x: f32) -> bool {
        let Some((marker, drag)) = self.drag else {
            return false;
        };
        let before = self.selection;
        let delta = drag.delta(x);
        let initial = drag.initial_selection;

        match marker {
            Marker::Start => {
                self.selection.start = self.trap((initial.start as f32 + delta) as i32);
                self.selection.end = self.trap((initial.end as f32 + delta) as i32);
            }
            Marker::End => {
                self.selection.end = self.trap((initial.end as f32 + delta) as i32);
            }
        }
        if self.selection.end < self.selection.start {
            self.selection.end = self.selection.start;
        }
        self.selection != before
    }

    /// Touch released; returns the marker that was being dragged
    pub fn end_drag(&mut self) -> Option<Marker> {
        self.drag.take().map(|(marker, _)| marker)
    }

    // =========================================================================
    // Keyboard Nudge
    // =========================================================================

    /// Register one key-repeat event and return the step size in pixels.
    /// Holding a key accelerates as `floor(sqrt(1 + repeats / 2))`.
    pub fn key_velocity(&mut self) -> i32 {
        self.key_repeat = self.key_repeat.saturating_add(1);
        (f64::from(1 + self.key_repeat / 2)).sqrt() as i32
    }

    /// Key released: velocity starts over
    pub fn release_keys(&mut self) {
        self.key_repeat = 0;
    }

    pub fn nudge_left(&mut self, marker: Marker, velocity: i32) {
        match marker {
            Marker::Start => {
                let old_start = self.selection.start;
                self.selection.start = self.trap(old_start - velocity);
                let moved = old_start - self.selection.start;
                self.selection.end = self.trap(self.selection.end - moved);
            }
            Marker::End if self.selection.end == self.selection.start => {
                self.selection.start = self.trap(self.selection.start - velocity);
                self.selection.end = self.selection.start;
            }
            Marker::End => {
                let end = self.trap(self.selection.end - velocity);
                self.selection.end = end.max(self.selection.start);
            }
        }
    }

    pub fn nudge_right(&mut self, marker: Marker, velocity: i32) {
        match marker {
            Marker::Start => {
                let old_start = self.selection.start;
                self.selection.start = self.trap(old_start + velocity);
                let moved = self.selection.start - old_start;
                self.selection.end = self.trap(self.selection.end + moved);
            }
            Marker::End => {
                self.selection.end = self.trap(self.selection.end + velocity);
            }
        }
        if self.selection.end < self.selection.start {
            self.selection.end = self.selection.start;
        }
    }

    // =========================================================================
    // Zoom
    // =========================================================================

    /// Scale positions into the next finer level (twice as many pixels)
    pub fn rescale_zoom_in(&mut self, new_max_pos: i32) {
        self.rescale(new_max_pos, |p| p.saturating_mul(2));
    }

    /// Scale positions into the next coarser level (half as many pixels)
    pub fn rescale_zoom_out(&mut self, new_max_pos: i32) {
        self.rescale(new_max_pos, |p| p / 2);
    }

    fn rescale(&mut self, new_max_pos: i32, scale: impl Fn(Pixel) -> Pixel) {
        let start = scale(self.selection.start);
        let end = scale(self.selection.end);
        self.max_pos = new_max_pos.max(0);
        self.set_range(start, end);
        self.drag = None;
        debug!(
            "Selection rescaled to {}..{} (max {})",
            self.selection.start, self.selection.end, self.max_pos
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lcg(seed: &mut u64) -> u64 {
        *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        *seed >> 33
    }

    fn assert_valid(model: &SelectionModel) {
        let sel = model.selection();
        assert!(0 <= sel.start, "start {} < 0", sel.start);
        assert!(sel.start <= sel.end, "start {} > end {}", sel.start, sel.end);
        assert!(sel.end <= model.max_pos(), "end {} > max {}", sel.end, model.max_pos());
    }

    #[test]
    fn test_new_orders_and_clamps() {
        let model = SelectionModel::new(-20, 5000, 1000);
        assert_eq!(model.selection(), Selection::new(0, 1000));
        let model = SelectionModel::new(600, 100, 1000);
        assert_eq!(model.selection(), Selection::new(600, 600));
    }

    #[test]
    fn test_start_drag_moves_whole_selection() {
        let mut model = SelectionModel::new(100, 200, 1000);
        model.begin_drag(Marker::Start, 400.0);
        assert!(model.drag_to(350.0));
        assert_eq!(model.selection(), Selection::new(50, 150));
        assert_eq!(model.end_drag(), Some(Marker::Start));
        assert!(!model.is_dragging());
    }

    #[test]
    fn test_start_drag_traps_at_zero() {
        let mut model = SelectionModel::new(100, 200, 1000);
        model.begin_drag(Marker::Start, 400.0);
        model.drag_to(0.0);
        assert_eq!(model.selection(), Selection::new(0, 0));
    }

    #[test]
    fn test_end_drag_cannot_cross_start() {
        let mut model = SelectionModel::new(100, 200, 1000);
        model.begin_drag(Marker::End, 500.0);
        model.drag_to(300.0);
        assert_eq!(model.selection(), Selection::new(100, 100));
        model.drag_to(2000.0);
        assert_eq!(model.selection(), Selection::new(100, 1000));
    }

    #[test]
    fn test_drag_without_begin_is_noop() {
        let mut model = SelectionModel::new(100, 200, 1000);
        assert!(!model.drag_to(10.0));
        assert_eq!(model.end_drag(), None);
    }

    #[test]
    fn test_key_velocity_accelerates() {
        let mut model = SelectionModel::new(0, 0, 1000);
        let steps: Vec<i32> = (0..8).map(|_| model.key_velocity()).collect();
        // repeats 1..=8 → sqrt(1), sqrt(2), sqrt(2), sqrt(3), sqrt(3), sqrt(4), sqrt(4), sqrt(5)
        assert_eq!(steps, vec![1, 1, 1, 1, 1, 2, 2, 2]);
        model.release_keys();
        assert_eq!(model.key_velocity(), 1);
    }

    #[test]
    fn test_nudge_start_moves_both() {
        let mut model = SelectionModel::new(100, 200, 1000);
        model.nudge_left(Marker::Start, 5);
        assert_eq!(model.selection(), Selection::new(95, 195));
        model.nudge_right(Marker::Start, 10);
        assert_eq!(model.selection(), Selection::new(105, 205));
    }

    #[test]
    fn test_nudge_start_at_zero_keeps_end() {
        let mut model = SelectionModel::new(2, 50, 1000);
        model.nudge_left(Marker::Start, 5);
        assert_eq!(model.selection(), Selection::new(0, 48));
    }

    #[test]
    fn test_nudge_end_stops_at_start() {
        let mut model = SelectionModel::new(100, 102, 1000);
        model.nudge_left(Marker::End, 5);
        assert_eq!(model.selection(), Selection::new(100, 100));
        model.nudge_left(Marker::End, 5);
        assert_eq!(model.selection(), Selection::new(95, 95));
        model.nudge_right(Marker::End, 2000);
        assert_eq!(model.selection(), Selection::new(95, 1000));
    }

    #[test]
    fn test_set_start_pushes_end() {
        let mut model = SelectionModel::new(100, 200, 1000);
        model.set_start(300);
        assert_eq!(model.selection(), Selection::new(300, 300));
        model.set_end(50);
        assert_eq!(model.selection(), Selection::new(300, 300));
    }

    #[test]
    fn test_rescale_on_zoom() {
        let mut model = SelectionModel::new(100, 250, 1000);
        model.rescale_zoom_in(2000);
        assert_eq!(model.selection(), Selection::new(200, 500));
        model.rescale_zoom_out(1000);
        model.rescale_zoom_out(500);
        assert_eq!(model.selection(), Selection::new(50, 125));
        assert_eq!(model.max_pos(), 500);
    }

    #[test]
    fn test_invariant_under_random_operations() {
        let mut model = SelectionModel::new(10, 300, 1000);
        let mut seed = 42;
        for _ in 0..5_000 {
            let pos = (lcg(&mut seed) % 3000) as i32 - 1000;
            let marker = if lcg(&mut seed) % 2 == 0 { Marker::Start } else { Marker::End };
            match lcg(&mut seed) % 10 {
                0 => model.set_start(pos),
                1 => model.set_end(pos),
                2 => model.begin_drag(marker, (lcg(&mut seed) % 800) as f32),
                3 => {
                    model.drag_to(pos as f32);
                }
                4 => {
                    model.end_drag();
                }
                5 => {
                    let v = model.key_velocity();
                    model.nudge_left(marker, v);
                }
                6 => {
                    let v = model.key_velocity();
                    model.nudge_right(marker, v);
                }
                7 => model.set_max_pos((lcg(&mut seed) % 2000) as i32),
                8 => {
                    let max = model.max_pos();
                    model.rescale_zoom_in(max.saturating_mul(2));
                }
                _ => {
                    let max = model.max_pos();
                    model.rescale_zoom_out(max / 2);
                }
            }
            assert_valid(&model);
        }
    }
}
