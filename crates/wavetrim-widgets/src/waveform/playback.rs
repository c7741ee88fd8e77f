//! Playback cursor synchronization
//!
//! While audio plays, the cursor follows the player's position and the
//! viewport eases to keep it centered. Reaching the end of the play range
//! pauses the player and ends tracking.

use log::{debug, info};
use wavetrim_core::coords::CoordinateMapper;
use wavetrim_core::player::SamplePlayer;
use wavetrim_core::{Millis, Pixel};

use super::state::Selection;
use super::viewport::ViewportController;

/// Millisecond range being played, `[start_ms, end_ms)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayRange {
    pub start_ms: Millis,
    pub end_ms: Millis,
}

impl PlayRange {
    /// Range for playback starting at `start_px`
    ///
    /// Starting before the selection plays up to its start, starting after it
    /// plays to the end of the file, and starting inside plays to its end.
    pub fn for_start_pixel(
        start_px: Pixel,
        selection: Selection,
        max_pos: i32,
        mapper: &CoordinateMapper,
    ) -> Self {
        let end_px = if start_px < selection.start {
            selection.start
        } else if start_px > selection.end {
            max_pos
        } else {
            selection.end
        };
        Self {
            start_ms: mapper.pixels_to_millisecs(start_px),
            end_ms: mapper.pixels_to_millisecs(end_px),
        }
    }

    pub fn contains(&self, position_ms: Millis) -> bool {
        position_ms >= self.start_ms && position_ms < self.end_ms
    }

    pub fn clamp(&self, position_ms: Millis) -> Millis {
        position_ms.clamp(self.start_ms, self.end_ms.max(self.start_ms))
    }
}

/// Outcome of one playback tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Nothing is playing
    Idle,
    /// Cursor updated
    Tracking { cursor: Pixel },
    /// Play range end reached; the player has been paused
    Completed,
}

/// Playback range and cursor position
#[derive(Debug, Clone, Default)]
pub struct PlaybackCursorSync {
    range: Option<PlayRange>,
    cursor: Option<Pixel>,
}

impl PlaybackCursorSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.range.is_some()
    }

    pub fn range(&self) -> Option<PlayRange> {
        self.range
    }

    /// Cursor pixel for rendering, `None` when not playing
    pub fn cursor(&self) -> Option<Pixel> {
        self.cursor
    }

    /// Seek to the range start and start the player
    pub fn start<P: SamplePlayer + ?Sized>(&mut self, player: &mut P, range: PlayRange) {
        player.seek_to(range.start_ms);
        player.start();
        self.range = Some(range);
        info!("Playback started: {}ms..{}ms", range.start_ms, range.end_ms);
    }

    /// Pause the player and stop tracking
    pub fn stop<P: SamplePlayer + ?Sized>(&mut self, player: &mut P) {
        if player.is_playing() {
            player.pause();
        }
        self.clear();
        debug!("Playback stopped");
    }

    /// Stop tracking without touching the player (it already finished)
    pub fn complete(&mut self) {
        self.clear();
        debug!("Playback completed by player");
    }

    fn clear(&mut self) {
        self.range = None;
        self.cursor = None;
    }

    /// Follow the player's position
    ///
    /// When `follow` is set the viewport is asked to center on the cursor;
    /// callers pass `false` while the user is dragging.
    pub fn tick<P: SamplePlayer + ?Sized>(
        &mut self,
        player: &mut P,
        mapper: &CoordinateMapper,
        viewport: &mut ViewportController,
        follow: bool,
    ) -> SyncStatus {
        let Some(range) = self.range else {
            return SyncStatus::Idle;
        };

        let now = player.current_position_ms();
        let cursor = mapper.millisecs_to_pixels(now);
        self.cursor = Some(cursor);
        if follow {
            viewport.center_on(cursor);
        }

        if now >= range.end_ms {
            self.stop(player);
            info!("Playback reached end of range at {}ms", now);
            return SyncStatus::Completed;
        }
        SyncStatus::Tracking { cursor }
    }

    /// Recompute the cursor pixel after the zoom level changed
    pub fn refresh_cursor<P: SamplePlayer + ?Sized>(&mut self, player: &P, mapper: &CoordinateMapper) {
        if self.is_active() {
            self.cursor = Some(mapper.millisecs_to_pixels(player.current_position_ms()));
        }
    }

    /// Seek within the play range. Returns the position actually sought to,
    /// or `None` when nothing is playing.
    pub fn seek_by<P: SamplePlayer + ?Sized>(&mut self, player: &mut P, delta_ms: Millis) -> Option<Millis> {
        let range = self.range?;
        let target = range.clamp(player.current_position_ms().saturating_add(delta_ms));
        player.seek_to(target);
        Some(target)
    }

    /// Seek to `position_ms` if it lies inside the play range
    pub fn seek_within<P: SamplePlayer + ?Sized>(&mut self, player: &mut P, position_ms: Millis) -> bool {
        match self.range {
            Some(range) if range.contains(position_ms) => {
                player.seek_to(position_ms);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waveform::test_support::MockPlayer;
    use wavetrim_core::config::InteractionConfig;

    /// 100 pixels per second at the native level
    fn mapper() -> CoordinateMapper {
        CoordinateMapper::new(8000, 80, 1.0)
    }

    fn viewport() -> ViewportController {
        ViewportController::with_level_lengths(
            [4000, 2000, 1000, 500, 250],
            1,
            400,
            InteractionConfig::default(),
        )
    }

    #[test]
    fn test_play_range_rules() {
        let sel = Selection::new(100, 300);
        let m = mapper();
        assert_eq!(
            PlayRange::for_start_pixel(50, sel, 2000, &m),
            PlayRange { start_ms: 500, end_ms: 1000 }
        );
        assert_eq!(
            PlayRange::for_start_pixel(150, sel, 2000, &m),
            PlayRange { start_ms: 1500, end_ms: 3000 }
        );
        assert_eq!(
            PlayRange::for_start_pixel(500, sel, 2000, &m),
            PlayRange { start_ms: 5000, end_ms: 20000 }
        );
    }

    #[test]
    fn test_start_seeks_then_plays() {
        let mut player = MockPlayer::default();
        let mut sync = PlaybackCursorSync::new();
        sync.start(&mut player, PlayRange { start_ms: 1000, end_ms: 3000 });
        assert!(sync.is_active());
        assert!(player.playing);
        assert_eq!(player.seeks, vec![1000]);
    }

    #[test]
    fn test_tick_centers_viewport_on_cursor() {
        let mut player = MockPlayer::default();
        let mut vp = viewport();
        let mut sync = PlaybackCursorSync::new();
        sync.start(&mut player, PlayRange { start_ms: 0, end_ms: 15_000 });

        player.position_ms = 8_000;
        let status = sync.tick(&mut player, &mapper(), &mut vp, true);
        assert_eq!(status, SyncStatus::Tracking { cursor: 800 });
        assert_eq!(sync.cursor(), Some(800));
        assert_eq!(vp.offset_goal(), 600);
    }

    #[test]
    fn test_tick_does_not_steer_while_dragging() {
        let mut player = MockPlayer::default();
        let mut vp = viewport();
        let mut sync = PlaybackCursorSync::new();
        sync.start(&mut player, PlayRange { start_ms: 0, end_ms: 15_000 });
        vp.touch_down(10.0, 0);

        player.position_ms = 8_000;
        sync.tick(&mut player, &mapper(), &mut vp, true);
        assert_eq!(vp.offset_goal(), 0);
        assert_eq!(sync.cursor(), Some(800));
    }

    #[test]
    fn test_completion_at_range_end() {
        let mut player = MockPlayer::default();
        let mut vp = viewport();
        let mut sync = PlaybackCursorSync::new();
        sync.start(&mut player, PlayRange { start_ms: 1000, end_ms: 2000 });

        player.position_ms = 1999;
        assert!(matches!(
            sync.tick(&mut player, &mapper(), &mut vp, true),
            SyncStatus::Tracking { .. }
        ));

        player.position_ms = 2000;
        assert_eq!(sync.tick(&mut player, &mapper(), &mut vp, true), SyncStatus::Completed);
        assert!(!sync.is_active());
        assert_eq!(sync.cursor(), None);
        assert!(!player.playing);
        assert_eq!(player.pauses, 1);

        assert_eq!(sync.tick(&mut player, &mapper(), &mut vp, true), SyncStatus::Idle);
    }

    #[test]
    fn test_seek_by_clamps_to_range() {
        let mut player = MockPlayer::default();
        let mut sync = PlaybackCursorSync::new();
        assert_eq!(sync.seek_by(&mut player, 5000), None);

        sync.start(&mut player, PlayRange { start_ms: 1000, end_ms: 9000 });
        player.position_ms = 3000;
        assert_eq!(sync.seek_by(&mut player, -5000), Some(1000));
        assert_eq!(sync.seek_by(&mut player, 5000), Some(6000));
        assert_eq!(sync.seek_by(&mut player, 5000), Some(9000));
    }

    #[test]
    fn test_seek_within() {
        let mut player = MockPlayer::default();
        let mut sync = PlaybackCursorSync::new();
        sync.start(&mut player, PlayRange { start_ms: 1000, end_ms: 2000 });
        assert!(sync.seek_within(&mut player, 1500));
        assert_eq!(player.position_ms, 1500);
        assert!(!sync.seek_within(&mut player, 2000));
        assert!(!sync.seek_within(&mut player, 500));
    }

    #[test]
    fn test_refresh_cursor_after_zoom() {
        let mut player = MockPlayer::default();
        let mut sync = PlaybackCursorSync::new();
        sync.start(&mut player, PlayRange { start_ms: 0, end_ms: 10_000 });
        player.position_ms = 2_000;
        sync.refresh_cursor(&player, &CoordinateMapper::new(8000, 80, 2.0));
        assert_eq!(sync.cursor(), Some(400));
    }
}
