//! Viewport controller
//!
//! Owns the scroll offset and zoom level over the amplitude pyramid and
//! animates between them. Animation advances only on [`ViewportController::tick`],
//! which the editor calls from its redraw timer.
//!
//! ## Invariant
//!
//! After every operation `0 <= offset <= max(0, max_pos - width)` where
//! `max_pos` is the length of the active level.

use log::{debug, trace};
use wavetrim_core::config::InteractionConfig;
use wavetrim_core::pyramid::Pyramid;
use wavetrim_core::{Pixel, MAX_ZOOM_LEVEL, MIN_ZOOM_LEVEL, NUM_ZOOM_LEVELS};

use super::state::{DragSession, Selection, ViewportPhase, ViewportState};

/// Result of lifting the finger off the waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchRelease {
    /// Short press: the touched pixel in level coordinates
    Tap { pixel: Pixel },
    /// Long press or drag ended
    Released,
    /// No drag was in progress (e.g. a fling already took over)
    Ignored,
}

/// Scroll / zoom state machine for the waveform view
#[derive(Debug, Clone)]
pub struct ViewportController {
    state: ViewportState,
    phase: ViewportPhase,
    drag: Option<DragSession>,
    level_lengths: [i32; NUM_ZOOM_LEVELS],
    tuning: InteractionConfig,
}

impl ViewportController {
    /// Create a viewport at the pyramid's initial zoom level, scrolled to the start
    pub fn new(pyramid: &Pyramid, width: i32, tuning: InteractionConfig) -> Self {
        let mut level_lengths = [0; NUM_ZOOM_LEVELS];
        for (level, len) in level_lengths.iter_mut().enumerate() {
            *len = pyramid.max_pos(level);
        }
        Self::with_level_lengths(level_lengths, pyramid.initial_zoom_level(), width, tuning)
    }

    /// Create a viewport directly from per-level lengths
    pub fn with_level_lengths(
        level_lengths: [i32; NUM_ZOOM_LEVELS],
        zoom_level: usize,
        width: i32,
        tuning: InteractionConfig,
    ) -> Self {
        Self {
            state: ViewportState {
                offset: 0,
                offset_goal: 0,
                fling_velocity: 0,
                zoom_level: zoom_level.min(MAX_ZOOM_LEVEL),
                width: width.max(0),
            },
            phase: ViewportPhase::Idle,
            drag: None,
            level_lengths,
            tuning: tuning.sanitized(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn phase(&self) -> ViewportPhase {
        self.phase
    }

    pub fn offset(&self) -> Pixel {
        self.state.offset
    }

    pub fn offset_goal(&self) -> Pixel {
        self.state.offset_goal
    }

    pub fn zoom_level(&self) -> usize {
        self.state.zoom_level
    }

    pub fn width(&self) -> i32 {
        self.state.width
    }

    pub fn fling_velocity(&self) -> i32 {
        self.state.fling_velocity
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == ViewportPhase::Dragging
    }

    /// Length in pixels of the active level
    pub fn max_pos(&self) -> i32 {
        self.level_lengths[self.state.zoom_level]
    }

    /// Largest offset that still fills the view (0 when the level is narrower)
    pub fn max_offset(&self) -> i32 {
        (self.max_pos() - self.state.width).max(0)
    }

    pub fn clamp_offset(&self, offset: Pixel) -> Pixel {
        offset.clamp(0, self.max_offset())
    }

    pub fn can_zoom_in(&self) -> bool {
        self.state.zoom_level > MIN_ZOOM_LEVEL
    }

    pub fn can_zoom_out(&self) -> bool {
        self.state.zoom_level < MAX_ZOOM_LEVEL
    }

    // =========================================================================
    // Touch
    // =========================================================================

    /// Finger down on the waveform: cancels any fling and starts a drag
    pub fn touch_down(&mut self, x: f32, now_ms: u64) {
        self.drag = Some(DragSession {
            anchor_x: x,
            initial_offset: self.state.offset,
            initial_selection: Selection::default(),
            started_at_ms: now_ms,
        });
        self.state.fling_velocity = 0;
        self.phase = ViewportPhase::Dragging;
    }

    /// Finger moved: content follows the finger
    pub fn touch_move(&mut self, x: f32) {
        let Some(drag) = self.drag else {
            return;
        };
        let target = (drag.initial_offset as f32 - drag.delta(x)) as i32;
        self.state.offset = self.clamp_offset(target);
    }

    /// Finger lifted: classify as tap or drag end
    pub fn touch_up(&mut self, now_ms: u64) -> TouchRelease {
        let Some(drag) = self.drag.take() else {
            return TouchRelease::Ignored;
        };
        self.state.offset_goal = self.state.offset;

        let elapsed = now_ms.saturating_sub(drag.started_at_ms);
        if elapsed < self.tuning.tap_threshold_ms {
            self.phase = ViewportPhase::Idle;
            let pixel = (drag.anchor_x + self.state.offset as f32) as i32;
            debug!("Waveform tap at pixel {} ({}ms)", pixel, elapsed);
            TouchRelease::Tap { pixel }
        } else {
            self.phase = ViewportPhase::Easing;
            TouchRelease::Released
        }
    }

    /// Start momentum scrolling. `vx` is the gesture velocity in screen
    /// pixels per second; content moves opposite to the finger.
    pub fn fling(&mut self, vx: f32) {
        self.drag = None;
        self.state.fling_velocity = (-vx).round() as i32;
        self.state.offset_goal = self.state.offset;
        self.phase = if self.state.fling_velocity == 0 {
            ViewportPhase::Idle
        } else {
            ViewportPhase::Flinging
        };
        debug!("Fling with velocity {}", self.state.fling_velocity);
    }

    // =========================================================================
    // Goals and Animation
    // =========================================================================

    /// Request an animated scroll. Ignored while the user is dragging.
    ///
    /// Returns whether the goal was accepted.
    pub fn set_offset_goal(&mut self, goal: Pixel) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.state.offset_goal = self.clamp_offset(goal);
        if self.phase != ViewportPhase::Flinging {
            self.phase = ViewportPhase::Easing;
        }
        true
    }

    /// Request that `pixel` ends up in the middle of the view
    pub fn center_on(&mut self, pixel: Pixel) -> bool {
        self.set_offset_goal(pixel - self.state.width / 2)
    }

    /// Advance one animation step
    pub fn tick(&mut self) {
        match self.phase {
            ViewportPhase::Dragging => {}
            ViewportPhase::Flinging => self.fling_step(),
            ViewportPhase::Easing | ViewportPhase::Idle => self.ease_step(),
        }
    }

    fn fling_step(&mut self) {
        let velocity = self.state.fling_velocity;
        let delta = velocity / self.tuning.fling_step_divisor.max(1);
        let decay = self.tuning.fling_decay.max(1);

        self.state.fling_velocity = if velocity > decay {
            velocity - decay
        } else if velocity < -decay {
            velocity + decay
        } else {
            0
        };

        let target = self.state.offset + delta;
        let clamped = self.clamp_offset(target);
        if clamped != target {
            self.state.fling_velocity = 0;
        }
        self.state.offset = clamped;
        self.state.offset_goal = clamped;

        trace!("Fling step: offset={} velocity={}", clamped, self.state.fling_velocity);
        if self.state.fling_velocity == 0 {
            self.phase = ViewportPhase::Idle;
        }
    }

    fn ease_step(&mut self) {
        self.state.offset_goal = self.clamp_offset(self.state.offset_goal);
        let distance = self.state.offset_goal - self.state.offset;
        if distance == 0 {
            self.phase = ViewportPhase::Idle;
            return;
        }

        let step = match distance / self.tuning.ease_divisor.max(1) {
            step if step != 0 && distance.abs() > self.tuning.ease_snap_distance => step,
            _ => distance.signum(),
        };
        self.state.offset = self.clamp_offset(self.state.offset + step);
        self.phase = if self.state.offset == self.state.offset_goal {
            ViewportPhase::Idle
        } else {
            ViewportPhase::Easing
        };
    }

    // =========================================================================
    // Zoom and Layout
    // =========================================================================

    /// Step one level in, keeping the view center fixed. Returns false at the limit.
    pub fn zoom_in(&mut self) -> bool {
        if !self.can_zoom_in() {
            return false;
        }
        let center = self.state.offset + self.state.width / 2;
        self.state.zoom_level -= 1;
        self.rebase_after_zoom(center * 2);
        true
    }

    /// Step one level out, keeping the view center fixed. Returns false at the limit.
    pub fn zoom_out(&mut self) -> bool {
        if !self.can_zoom_out() {
            return false;
        }
        let center = self.state.offset + self.state.width / 2;
        self.state.zoom_level += 1;
        self.rebase_after_zoom(center / 2);
        true
    }

    fn rebase_after_zoom(&mut self, new_center: Pixel) {
        self.state.offset = self.clamp_offset(new_center - self.state.width / 2);
        self.state.offset_goal = self.state.offset;
        self.state.fling_velocity = 0;
        self.drag = None;
        self.phase = ViewportPhase::Idle;
        debug!(
            "Zoom level {} (offset {}, max_pos {})",
            self.state.zoom_level,
            self.state.offset,
            self.max_pos()
        );
    }

    /// Change the visible width, re-clamping offset and goal
    pub fn set_width(&mut self, width: i32) {
        self.state.width = width.max(0);
        self.state.offset = self.clamp_offset(self.state.offset);
        self.state.offset_goal = self.clamp_offset(self.state.offset_goal);
    }
}
