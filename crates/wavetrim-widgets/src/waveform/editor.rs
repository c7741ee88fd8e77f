//! Waveform editor
//!
//! Owns the pyramid, the three controllers and the player, and applies
//! [`InputEvent`]s one at a time. This is the only place that coordinates
//! controllers: zoom rescales the selection, taps drive playback, playback
//! steers the viewport.

use std::sync::Arc;

use log::{debug, info};
use wavetrim_core::config::EngineConfig;
use wavetrim_core::coords::CoordinateMapper;
use wavetrim_core::player::SamplePlayer;
use wavetrim_core::pyramid::Pyramid;
use wavetrim_core::timecode::format_decimal;
use wavetrim_core::{Pixel, MAX_ZOOM_LEVEL};

use super::event::{EditorSignal, InputEvent};
use super::gesture::{PinchTracker, PinchZoom};
use super::playback::{PlayRange, PlaybackCursorSync, SyncStatus};
use super::render::{build_frame, FrameInput, WaveformFrame};
use super::selection::SelectionModel;
use super::state::{Marker, Selection};
use super::viewport::{TouchRelease, ViewportController};
use crate::traits::InputSink;

/// Interactive waveform over one loaded file
pub struct WaveformEditor<P: SamplePlayer> {
    pyramid: Arc<Pyramid>,
    player: P,
    config: EngineConfig,
    viewport: ViewportController,
    selection: SelectionModel,
    playback: PlaybackCursorSync,
    pinch: PinchTracker,
    /// Marker that receives key nudges
    focused_marker: Option<Marker>,
    height: i32,
}

impl<P: SamplePlayer> WaveformEditor<P> {
    /// Attach a freshly built pyramid
    ///
    /// Starts at the pyramid's initial zoom level, scrolled to the start,
    /// with the first `initial_selection_secs` selected.
    pub fn attach(pyramid: Arc<Pyramid>, player: P, width: i32, height: i32, config: EngineConfig) -> Self {
        let config = config.sanitized();
        let viewport = ViewportController::new(&pyramid, width, config.interaction);
        let mapper = CoordinateMapper::for_level(&pyramid, viewport.zoom_level());
        let selection = SelectionModel::new(
            mapper.seconds_to_pixels(0.0),
            mapper.seconds_to_pixels(config.interaction.initial_selection_secs),
            viewport.max_pos(),
        );
        info!(
            "Waveform attached: {} frames, zoom level {}, selection {}..{}",
            pyramid.num_frames(),
            viewport.zoom_level(),
            selection.start(),
            selection.end()
        );

        Self {
            pinch: PinchTracker::new(config.interaction.pinch_zoom_threshold),
            pyramid,
            player,
            config,
            viewport,
            selection,
            playback: PlaybackCursorSync::new(),
            focused_marker: None,
            height: height.max(0),
        }
    }

    /// Stop playback and hand the player back
    pub fn detach(mut self) -> P {
        if self.playback.is_active() {
            self.playback.stop(&mut self.player);
        }
        self.player
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn pyramid(&self) -> &Arc<Pyramid> {
        &self.pyramid
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn selection(&self) -> Selection {
        self.selection.selection()
    }

    pub fn playback(&self) -> &PlaybackCursorSync {
        &self.playback
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn zoom_level(&self) -> usize {
        self.viewport.zoom_level()
    }

    pub fn focused_marker(&self) -> Option<Marker> {
        self.focused_marker
    }

    /// Whether a finger is down on the waveform or a marker
    pub fn is_dragging(&self) -> bool {
        self.viewport.is_dragging() || self.selection.is_dragging()
    }

    /// Coordinate mapper for the active zoom level
    pub fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::for_level(&self.pyramid, self.viewport.zoom_level())
    }

    /// Selection start in seconds, two decimals
    pub fn start_label(&self) -> String {
        format_decimal(self.mapper().pixels_to_seconds(self.selection.start()))
    }

    /// Selection end in seconds, two decimals
    pub fn end_label(&self) -> String {
        format_decimal(self.mapper().pixels_to_seconds(self.selection.end()))
    }

    /// Drawable description of the current state
    pub fn frame(&self) -> WaveformFrame {
        build_frame(FrameInput {
            pyramid: &self.pyramid,
            zoom_level: self.viewport.zoom_level(),
            offset: self.viewport.offset(),
            width: self.viewport.width(),
            height: self.height,
            selection: self.selection.selection(),
            playback_cursor: self.playback.cursor(),
            grid: &self.config.grid,
        })
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Apply one input event
    pub fn handle_event(&mut self, event: InputEvent) -> Vec<EditorSignal> {
        let mut signals = Vec::new();
        match event {
            InputEvent::TouchDown { x, now_ms } => self.viewport.touch_down(x, now_ms),
            InputEvent::TouchMove { x } => self.viewport.touch_move(x),
            InputEvent::TouchUp { now_ms } => {
                if let TouchRelease::Tap { pixel } = self.viewport.touch_up(now_ms) {
                    self.on_tap(pixel, &mut signals);
                }
            }
            InputEvent::Fling { vx } => self.viewport.fling(vx),

            InputEvent::PinchZoomIn => self.zoom(PinchZoom::In, &mut signals),
            InputEvent::PinchZoomOut => self.zoom(PinchZoom::Out, &mut signals),
            InputEvent::PinchBegin { span } => self.pinch.begin(span),
            InputEvent::PinchMove { span } => {
                if let Some(step) = self.pinch.update(span) {
                    self.zoom(step, &mut signals);
                }
            }
            InputEvent::PinchEnd => self.pinch.end(),

            InputEvent::MarkerTouchDown { marker, x } => {
                self.focused_marker = Some(marker);
                self.selection.begin_drag(marker, x);
            }
            InputEvent::MarkerTouchMove { x } => {
                if self.selection.drag_to(x) {
                    signals.push(EditorSignal::SelectionChanged(self.selection.selection()));
                }
            }
            InputEvent::MarkerTouchUp => {
                if let Some(marker) = self.selection.end_drag() {
                    self.center_on_marker(marker);
                }
            }
            InputEvent::MarkerFocus(marker) => self.focus_marker(marker),
            InputEvent::KeyLeft => self.nudge(false, &mut signals),
            InputEvent::KeyRight => self.nudge(true, &mut signals),
            InputEvent::KeyUp => self.selection.release_keys(),

            InputEvent::PlayPause => {
                if self.playback.is_active() {
                    self.playback.stop(&mut self.player);
                    signals.push(EditorSignal::PlaybackStopped);
                } else {
                    self.play_from(self.selection.start(), &mut signals);
                }
            }
            InputEvent::Rewind => self.jump(Marker::Start, &mut signals),
            InputEvent::FastForward => self.jump(Marker::End, &mut signals),
            InputEvent::MarkStart => {
                if let Some(cursor) = self.playing_pixel() {
                    self.selection.set_start(cursor);
                    signals.push(EditorSignal::SelectionChanged(self.selection.selection()));
                }
            }
            InputEvent::MarkEnd => {
                if let Some(cursor) = self.playing_pixel() {
                    self.selection.set_end(cursor);
                    signals.push(EditorSignal::SelectionChanged(self.selection.selection()));
                    self.playback.stop(&mut self.player);
                    signals.push(EditorSignal::PlaybackStopped);
                }
            }
            InputEvent::PlaybackCompleted => {
                if self.playback.is_active() {
                    self.playback.complete();
                    signals.push(EditorSignal::PlaybackComplete);
                }
            }

            InputEvent::SetStartSeconds(seconds) => {
                if seconds.is_finite() {
                    self.selection.set_start(self.mapper().seconds_to_pixels(seconds));
                    signals.push(EditorSignal::SelectionChanged(self.selection.selection()));
                }
            }
            InputEvent::SetEndSeconds(seconds) => {
                if seconds.is_finite() {
                    self.selection.set_end(self.mapper().seconds_to_pixels(seconds));
                    signals.push(EditorSignal::SelectionChanged(self.selection.selection()));
                }
            }

            InputEvent::Resize { width, height } => {
                self.viewport.set_width(width);
                self.height = height.max(0);
            }
            InputEvent::Tick { .. } => self.tick(&mut signals),
        }
        signals
    }

    /// Step to an absolute zoom level one level at a time
    pub fn set_zoom_level(&mut self, zoom_level: usize) -> Vec<EditorSignal> {
        let target = zoom_level.min(MAX_ZOOM_LEVEL);
        let mut signals = Vec::new();
        while self.viewport.zoom_level() > target {
            self.zoom(PinchZoom::In, &mut signals);
        }
        while self.viewport.zoom_level() < target {
            self.zoom(PinchZoom::Out, &mut signals);
        }
        signals
    }

    fn tick(&mut self, signals: &mut Vec<EditorSignal>) {
        let mapper = self.mapper();
        let follow = !self.is_dragging();
        let status = self
            .playback
            .tick(&mut self.player, &mapper, &mut self.viewport, follow);
        if status == SyncStatus::Completed {
            signals.push(EditorSignal::PlaybackComplete);
        }

        // Marker drags hold the view still
        if !self.selection.is_dragging() {
            self.viewport.tick();
        }
    }

    fn zoom(&mut self, step: PinchZoom, signals: &mut Vec<EditorSignal>) {
        let zoomed = match step {
            PinchZoom::In => self.viewport.zoom_in(),
            PinchZoom::Out => self.viewport.zoom_out(),
        };
        if !zoomed {
            return;
        }

        let max_pos = self.viewport.max_pos();
        match step {
            PinchZoom::In => self.selection.rescale_zoom_in(max_pos),
            PinchZoom::Out => self.selection.rescale_zoom_out(max_pos),
        }
        let mapper = self.mapper();
        self.playback.refresh_cursor(&self.player, &mapper);

        signals.push(EditorSignal::ZoomChanged {
            zoom_level: self.viewport.zoom_level(),
        });
        signals.push(EditorSignal::SelectionChanged(self.selection.selection()));
    }

    fn on_tap(&mut self, pixel: Pixel, signals: &mut Vec<EditorSignal>) {
        let pixel = pixel.clamp(0, self.viewport.max_pos());
        if self.playback.is_active() {
            let position_ms = self.mapper().pixels_to_millisecs(pixel);
            if self.playback.seek_within(&mut self.player, position_ms) {
                debug!("Tap seek to {}ms", position_ms);
                signals.push(EditorSignal::PlaybackSeeked { position_ms });
                return;
            }
            self.playback.stop(&mut self.player);
            signals.push(EditorSignal::PlaybackStopped);
        }
        self.play_from(pixel, signals);
    }

    fn play_from(&mut self, pixel: Pixel, signals: &mut Vec<EditorSignal>) {
        let range = PlayRange::for_start_pixel(
            pixel,
            self.selection.selection(),
            self.viewport.max_pos(),
            &self.mapper(),
        );
        self.playback.start(&mut self.player, range);
        signals.push(EditorSignal::PlaybackStarted(range));
    }

    /// Rewind / fast-forward while playing; focus a marker otherwise
    fn jump(&mut self, marker: Marker, signals: &mut Vec<EditorSignal>) {
        if self.playback.is_active() {
            let jump = self.config.interaction.seek_jump_ms;
            let delta = match marker {
                Marker::Start => -jump,
                Marker::End => jump,
            };
            if let Some(position_ms) = self.playback.seek_by(&mut self.player, delta) {
                signals.push(EditorSignal::PlaybackSeeked { position_ms });
            }
        } else {
            self.focus_marker(marker);
            signals.push(EditorSignal::FocusMarker(marker));
        }
    }

    /// Current playback position in level pixels, when playing
    fn playing_pixel(&self) -> Option<Pixel> {
        self.playback
            .is_active()
            .then(|| self.mapper().millisecs_to_pixels(self.player.current_position_ms()))
    }

    fn focus_marker(&mut self, marker: Marker) {
        self.focused_marker = Some(marker);
        self.selection.release_keys();
        self.center_on_marker(marker);
    }

    fn nudge(&mut self, right: bool, signals: &mut Vec<EditorSignal>) {
        let Some(marker) = self.focused_marker else {
            return;
        };
        let velocity = self.selection.key_velocity();
        if right {
            self.selection.nudge_right(marker, velocity);
        } else {
            self.selection.nudge_left(marker, velocity);
        }
        self.center_on_marker(marker);
        signals.push(EditorSignal::SelectionChanged(self.selection.selection()));
    }

    fn center_on_marker(&mut self, marker: Marker) {
        if !self.is_dragging() {
            self.viewport.center_on(self.selection.position(marker));
        }
    }
}

impl<P: SamplePlayer> InputSink for WaveformEditor<P> {
    fn handle_event(&mut self, event: InputEvent) -> Vec<EditorSignal> {
        WaveformEditor::handle_event(self, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::dispatch;
    use crate::waveform::test_support::{pyramid, MockPlayer};

    /// 600 frames at 100 frames/s, 400px wide view at zoom level 1
    fn editor() -> WaveformEditor<MockPlayer> {
        WaveformEditor::attach(pyramid(600), MockPlayer::default(), 400, 200, EngineConfig::default())
    }

    fn select(editor: &mut WaveformEditor<MockPlayer>, start_secs: f64, end_secs: f64) {
        editor.handle_event(InputEvent::SetStartSeconds(start_secs));
        editor.handle_event(InputEvent::SetEndSeconds(end_secs));
    }

    fn tap(editor: &mut WaveformEditor<MockPlayer>, x: f32) -> Vec<EditorSignal> {
        editor.handle_event(InputEvent::TouchDown { x, now_ms: 10_000 });
        editor.handle_event(InputEvent::TouchUp { now_ms: 10_050 })
    }

    #[test]
    fn test_attach_defaults() {
        let e = editor();
        assert_eq!(e.zoom_level(), 1);
        assert_eq!(e.selection(), Selection::new(0, 600));
        assert_eq!(e.viewport().offset(), 0);
        assert!(!e.playback().is_active());

        let long = WaveformEditor::attach(
            pyramid(6000),
            MockPlayer::default(),
            400,
            200,
            EngineConfig::default(),
        );
        assert_eq!(long.zoom_level(), 3);
        assert_eq!(long.selection(), Selection::new(0, 375));
        assert_eq!(long.end_label(), "15.00");
    }

    #[test]
    fn test_tap_starts_playback() {
        let mut e = editor();
        select(&mut e, 1.0, 3.0);
        let signals = tap(&mut e, 150.0);
        assert_eq!(
            signals,
            vec![EditorSignal::PlaybackStarted(PlayRange { start_ms: 1500, end_ms: 3000 })]
        );
        assert!(e.player().playing);
        assert_eq!(e.player().seeks, vec![1500]);
    }

    #[test]
    fn test_tap_while_playing_seeks_or_restarts() {
        let mut e = editor();
        select(&mut e, 1.0, 3.0);
        tap(&mut e, 150.0);

        assert_eq!(tap(&mut e, 200.0), vec![EditorSignal::PlaybackSeeked { position_ms: 2000 }]);

        let signals = tap(&mut e, 350.0);
        assert_eq!(
            signals,
            vec![
                EditorSignal::PlaybackStopped,
                EditorSignal::PlaybackStarted(PlayRange { start_ms: 3500, end_ms: 6000 }),
            ]
        );
        assert!(e.player().playing);
    }

    #[test]
    fn test_long_press_is_not_a_tap() {
        let mut e = editor();
        e.handle_event(InputEvent::TouchDown { x: 150.0, now_ms: 0 });
        let signals = e.handle_event(InputEvent::TouchUp { now_ms: 300 });
        assert!(signals.is_empty());
        assert!(!e.playback().is_active());
    }

    #[test]
    fn test_playback_completes_at_range_end() {
        let mut e = editor();
        e.handle_event(InputEvent::PlayPause);
        assert_eq!(e.playback().range(), Some(PlayRange { start_ms: 0, end_ms: 6000 }));

        e.player_mut().position_ms = 1000;
        assert!(e.handle_event(InputEvent::Tick { now_ms: 0 }).is_empty());
        assert_eq!(e.frame().playback_cursor_x, Some(100));

        e.player_mut().position_ms = 6000;
        let signals = e.handle_event(InputEvent::Tick { now_ms: 16 });
        assert_eq!(signals, vec![EditorSignal::PlaybackComplete]);
        assert!(!e.player().playing);
        assert_eq!(e.frame().playback_cursor_x, None);
    }

    #[test]
    fn test_external_completion() {
        let mut e = editor();
        e.handle_event(InputEvent::PlayPause);
        assert_eq!(
            e.handle_event(InputEvent::PlaybackCompleted),
            vec![EditorSignal::PlaybackComplete]
        );
        assert!(e.handle_event(InputEvent::PlaybackCompleted).is_empty());
    }

    #[test]
    fn test_play_pause_toggles() {
        let mut e = editor();
        e.handle_event(InputEvent::PlayPause);
        assert_eq!(
            e.handle_event(InputEvent::PlayPause),
            vec![EditorSignal::PlaybackStopped]
        );
        assert!(!e.player().playing);
    }

    #[test]
    fn test_drag_suspends_auto_centering() {
        let mut e = editor();
        e.handle_event(InputEvent::PlayPause);
        e.handle_event(InputEvent::TouchDown { x: 10.0, now_ms: 0 });
        e.player_mut().position_ms = 5000;
        e.handle_event(InputEvent::Tick { now_ms: 16 });
        assert_eq!(e.viewport().offset_goal(), 0);

        e.handle_event(InputEvent::TouchUp { now_ms: 1000 });
        e.handle_event(InputEvent::Tick { now_ms: 1016 });
        assert_eq!(e.viewport().offset_goal(), 200);
        assert_eq!(e.viewport().offset(), 20);
    }

    #[test]
    fn test_pinch_zoom_rescales_selection() {
        let mut e = editor();
        let signals = e.handle_event(InputEvent::PinchZoomIn);
        assert_eq!(
            signals,
            vec![
                EditorSignal::ZoomChanged { zoom_level: 0 },
                EditorSignal::SelectionChanged(Selection::new(0, 1200)),
            ]
        );
        assert!(e.handle_event(InputEvent::PinchZoomIn).is_empty());

        e.handle_event(InputEvent::PinchZoomOut);
        e.handle_event(InputEvent::PinchZoomOut);
        assert_eq!(e.zoom_level(), 2);
        assert_eq!(e.selection(), Selection::new(0, 300));
        assert_eq!(e.viewport().max_pos(), 300);
    }

    #[test]
    fn test_pinch_span_steps_zoom() {
        let mut e = editor();
        e.handle_event(InputEvent::PinchBegin { span: 100.0 });
        assert!(e.handle_event(InputEvent::PinchMove { span: 130.0 }).is_empty());
        let signals = e.handle_event(InputEvent::PinchMove { span: 150.0 });
        assert_eq!(signals.first(), Some(&EditorSignal::ZoomChanged { zoom_level: 0 }));
        e.handle_event(InputEvent::PinchEnd);
        assert!(e.handle_event(InputEvent::PinchMove { span: 10.0 }).is_empty());
    }

    #[test]
    fn test_set_zoom_level_steps() {
        let mut e = editor();
        let signals = e.set_zoom_level(3);
        assert_eq!(
            signals
                .iter()
                .filter(|s| matches!(s, EditorSignal::ZoomChanged { .. }))
                .count(),
            2
        );
        assert_eq!(e.zoom_level(), 3);
        assert_eq!(e.selection(), Selection::new(0, 150));
    }

    #[test]
    fn test_marker_drag_recenters_on_release() {
        let mut e = editor();
        select(&mut e, 1.0, 3.0);
        e.handle_event(InputEvent::MarkerTouchDown { marker: Marker::End, x: 300.0 });
        assert!(e.is_dragging());
        let signals = e.handle_event(InputEvent::MarkerTouchMove { x: 350.0 });
        assert_eq!(signals, vec![EditorSignal::SelectionChanged(Selection::new(100, 350))]);

        e.handle_event(InputEvent::MarkerTouchUp);
        assert!(!e.is_dragging());
        assert_eq!(e.viewport().offset_goal(), 150);
        assert_eq!(e.focused_marker(), Some(Marker::End));
    }

    #[test]
    fn test_key_nudges_focused_marker() {
        let mut e = editor();
        select(&mut e, 1.0, 3.0);
        assert!(e.handle_event(InputEvent::KeyRight).is_empty());

        e.handle_event(InputEvent::MarkerFocus(Marker::Start));
        for _ in 0..3 {
            e.handle_event(InputEvent::KeyRight);
        }
        assert_eq!(e.selection(), Selection::new(103, 303));
        e.handle_event(InputEvent::KeyUp);
        e.handle_event(InputEvent::KeyLeft);
        assert_eq!(e.selection(), Selection::new(102, 302));
    }

    #[test]
    fn test_rewind_and_fast_forward() {
        let mut e = editor();
        assert_eq!(
            e.handle_event(InputEvent::Rewind),
            vec![EditorSignal::FocusMarker(Marker::Start)]
        );
        assert_eq!(e.focused_marker(), Some(Marker::Start));

        e.handle_event(InputEvent::PlayPause);
        e.player_mut().position_ms = 3000;
        assert_eq!(
            e.handle_event(InputEvent::FastForward),
            vec![EditorSignal::PlaybackSeeked { position_ms: 6000 }]
        );
        assert_eq!(
            e.handle_event(InputEvent::Rewind),
            vec![EditorSignal::PlaybackSeeked { position_ms: 1000 }]
        );
    }

    #[test]
    fn test_mark_start_and_end_from_playback() {
        let mut e = editor();
        assert!(e.handle_event(InputEvent::MarkStart).is_empty());

        e.handle_event(InputEvent::PlayPause);
        e.player_mut().position_ms = 2500;
        assert_eq!(
            e.handle_event(InputEvent::MarkStart),
            vec![EditorSignal::SelectionChanged(Selection::new(250, 600))]
        );
        e.player_mut().position_ms = 4000;
        assert_eq!(
            e.handle_event(InputEvent::MarkEnd),
            vec![
                EditorSignal::SelectionChanged(Selection::new(250, 400)),
                EditorSignal::PlaybackStopped,
            ]
        );
        assert!(!e.playback().is_active());
    }

    #[test]
    fn test_text_entry_labels() {
        let mut e = editor();
        select(&mut e, 1.0, 2.5);
        assert_eq!(e.start_label(), "1.00");
        assert_eq!(e.end_label(), "2.50");
        e.handle_event(InputEvent::SetStartSeconds(f64::NAN));
        assert_eq!(e.selection(), Selection::new(100, 250));
    }

    #[test]
    fn test_resize_updates_frame() {
        let mut e = editor();
        e.handle_event(InputEvent::Resize { width: 300, height: 100 });
        let frame = e.frame();
        assert_eq!(frame.width, 300);
        assert_eq!(frame.bars.len(), 300);
        assert_eq!(frame.center_y, 50);
    }

    #[test]
    fn test_dispatch_through_input_sink() {
        let mut e = editor();
        let mut started = 0;
        let mut observer = |signal: &EditorSignal| {
            if matches!(signal, EditorSignal::PlaybackStarted(_)) {
                started += 1;
            }
        };
        dispatch(&mut e, InputEvent::PlayPause, &mut observer);
        assert_eq!(started, 1);
    }

    #[test]
    fn test_detach_stops_playback() {
        let mut e = editor();
        e.handle_event(InputEvent::PlayPause);
        let player = e.detach();
        assert!(!player.playing);
        assert_eq!(player.pauses, 1);
    }
}
