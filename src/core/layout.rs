//! Timeline layout engine.
//!
//! Owns the ordered item list, the cached interval boundaries, and playback
//! state. Intervals are a prefix sum over item durations; the boundary array
//! has `n + 1` entries and is the sole authority for time-to-item lookups.

use crate::constants::{
    PIXELS_PER_SECOND_DEFAULT, PIXELS_PER_SECOND_MAX, PIXELS_PER_SECOND_MIN,
};
use crate::core::extract::TimelineItem;

/// Playback state owned by the layout engine. The host UI's timer callbacks
/// advance time through [`TimelineLayout::advance`] and [`TimelineLayout::seek`]
/// rather than mutating this directly.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current_time_seconds: f64,
    pub is_playing: bool,
    pub pixels_per_second: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_time_seconds: 0.0,
            is_playing: false,
            pixels_per_second: PIXELS_PER_SECOND_DEFAULT,
        }
    }
}

/// The clip the playhead is currently inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveClip {
    pub index: usize,
    /// Seconds into the clip, for syncing a media element's own clock.
    pub offset_in_clip: f64,
}

#[derive(Debug, Clone, Default)]
pub struct TimelineLayout {
    items: Vec<TimelineItem>,
    /// `starts[i]` is where item `i` begins; the final entry is the total
    /// duration. Monotonically non-decreasing.
    starts: Vec<f64>,
    pub playback: PlaybackState,
}

impl TimelineLayout {
    pub fn new(items: Vec<TimelineItem>) -> Self {
        let mut layout = Self {
            items: Vec::new(),
            starts: vec![0.0],
            playback: PlaybackState::default(),
        };
        layout.set_items(items);
        layout
    }

    /// Replace the item list after a document change. Boundaries are
    /// recomputed and the playhead is clamped into the new range; playback
    /// and zoom survive as-is.
    pub fn set_items(&mut self, items: Vec<TimelineItem>) {
        let mut starts = Vec::with_capacity(items.len() + 1);
        let mut total = 0.0;
        starts.push(0.0);
        for item in items.iter() {
            total += item.duration_seconds;
            starts.push(total);
        }
        self.items = items;
        self.starts = starts;
        self.playback.current_time_seconds =
            self.playback.current_time_seconds.clamp(0.0, self.total_duration());
        if self.items.is_empty() {
            self.playback.current_time_seconds = 0.0;
            self.playback.is_playing = false;
        }
    }

    pub fn items(&self) -> &[TimelineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_duration(&self) -> f64 {
        *self.starts.last().unwrap_or(&0.0)
    }

    /// Start time of item `index`.
    pub fn clip_start(&self, index: usize) -> f64 {
        self.starts.get(index).copied().unwrap_or(0.0)
    }

    /// Interval boundaries, `items.len() + 1` entries.
    pub fn boundaries(&self) -> &[f64] {
        &self.starts
    }

    /// Move the playhead. `t` is clamped into `[0, total_duration]`; with no
    /// items this is a no-op at time zero.
    pub fn seek(&mut self, t: f64) {
        if self.items.is_empty() {
            self.playback.current_time_seconds = 0.0;
            return;
        }
        self.playback.current_time_seconds = t.clamp(0.0, self.total_duration());
    }

    /// Advance the playhead by `dt` seconds of wall time. Stops playback at
    /// the end of the final clip.
    pub fn advance(&mut self, dt: f64) {
        if self.items.is_empty() || !self.playback.is_playing {
            return;
        }
        let next = self.playback.current_time_seconds + dt.max(0.0);
        let total = self.total_duration();
        if next >= total {
            self.playback.current_time_seconds = total;
            self.playback.is_playing = false;
        } else {
            self.playback.current_time_seconds = next;
        }
    }

    pub fn play(&mut self) {
        if !self.items.is_empty() {
            self.playback.is_playing = true;
        }
    }

    pub fn pause(&mut self) {
        self.playback.is_playing = false;
    }

    pub fn toggle_playback(&mut self) {
        if self.playback.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Resolve the item under time `t` by the half-open interval rule:
    /// `start[i] <= t < end[i]`. Times at or past the end clamp to the final
    /// item.
    pub fn item_index_at(&self, t: f64) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        let t = t.clamp(0.0, self.total_duration());
        // partition_point counts boundaries <= t; the boundary at t itself
        // belongs to the item starting there.
        let index = self.starts.partition_point(|&start| start <= t).saturating_sub(1);
        Some(index.min(self.items.len() - 1))
    }

    /// The clip under the playhead, with the offset into it.
    pub fn active_clip(&self) -> Option<ActiveClip> {
        let index = self.item_index_at(self.playback.current_time_seconds)?;
        let offset = self.playback.current_time_seconds - self.starts[index];
        Some(ActiveClip {
            index,
            offset_in_clip: offset.max(0.0),
        })
    }

    pub fn active_item(&self) -> Option<&TimelineItem> {
        self.active_clip().map(|clip| &self.items[clip.index])
    }

    /// Zoom is purely presentational; bounds-checked, never touches
    /// intervals.
    pub fn set_zoom(&mut self, pixels_per_second: f64) {
        self.playback.pixels_per_second =
            pixels_per_second.clamp(PIXELS_PER_SECOND_MIN, PIXELS_PER_SECOND_MAX);
    }

    pub fn time_to_pixels(&self, t: f64) -> f64 {
        t * self.playback.pixels_per_second
    }

    pub fn pixels_to_time(&self, px: f64) -> f64 {
        (px / self.playback.pixels_per_second).clamp(0.0, self.total_duration())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extract::TimelineItemKind;

    fn item(id: &str, kind: TimelineItemKind, duration: f64) -> TimelineItem {
        TimelineItem {
            id: id.to_string(),
            scene_index: 0,
            frame_index: None,
            kind,
            label: id.to_string(),
            duration_seconds: duration,
            media: None,
            thumb: None,
        }
    }

    fn sample_layout() -> TimelineLayout {
        TimelineLayout::new(vec![
            item("a", TimelineItemKind::Image, 2.0),
            item("b", TimelineItemKind::Image, 2.0),
            item("c", TimelineItemKind::Video, 5.0),
        ])
    }

    #[test]
    fn test_duration_is_exact_sum() {
        let layout = sample_layout();
        assert_eq!(layout.total_duration(), 9.0);
        assert_eq!(layout.boundaries(), &[0.0, 2.0, 4.0, 9.0]);
    }

    #[test]
    fn test_interval_coverage() {
        let layout = sample_layout();
        // Every probe time lands in exactly one clip.
        let mut t = 0.0;
        while t < 9.0 {
            let index = layout.item_index_at(t).unwrap();
            let start = layout.clip_start(index);
            let end = start + layout.items()[index].duration_seconds;
            assert!(start <= t && t < end, "t={} resolved to [{}, {})", t, start, end);
            t += 0.125;
        }
    }

    #[test]
    fn test_boundary_resolves_to_starting_item() {
        let layout = sample_layout();
        assert_eq!(layout.item_index_at(0.0), Some(0));
        assert_eq!(layout.item_index_at(2.0), Some(1));
        assert_eq!(layout.item_index_at(4.0), Some(2));
        // At or past the total duration clamps to the final item.
        assert_eq!(layout.item_index_at(9.0), Some(2));
        assert_eq!(layout.item_index_at(100.0), Some(2));
    }

    #[test]
    fn test_seek_clamps_and_reports_offset() {
        let mut layout = sample_layout();
        layout.seek(3.5);
        let active = layout.active_clip().unwrap();
        assert_eq!(active.index, 1);
        assert!((active.offset_in_clip - 1.5).abs() < 1e-12);

        layout.seek(-5.0);
        assert_eq!(layout.playback.current_time_seconds, 0.0);
        layout.seek(50.0);
        assert_eq!(layout.playback.current_time_seconds, 9.0);
        assert_eq!(layout.active_clip().unwrap().index, 2);
    }

    #[test]
    fn test_empty_timeline_is_inert() {
        let mut layout = TimelineLayout::new(Vec::new());
        assert_eq!(layout.total_duration(), 0.0);
        layout.seek(3.0);
        assert_eq!(layout.playback.current_time_seconds, 0.0);
        assert!(layout.active_clip().is_none());
        layout.play();
        assert!(!layout.playback.is_playing);
    }

    #[test]
    fn test_advance_stops_at_end() {
        let mut layout = sample_layout();
        layout.play();
        layout.advance(8.9);
        assert!(layout.playback.is_playing);
        layout.advance(0.5);
        assert_eq!(layout.playback.current_time_seconds, 9.0);
        assert!(!layout.playback.is_playing);
    }

    #[test]
    fn test_zoom_bounds_and_round_trip() {
        let mut layout = sample_layout();
        layout.set_zoom(10.0);
        assert_eq!(layout.playback.pixels_per_second, 40.0);
        layout.set_zoom(10_000.0);
        assert_eq!(layout.playback.pixels_per_second, 240.0);

        for zoom in [40.0, 80.0, 133.7, 240.0] {
            layout.set_zoom(zoom);
            let mut t = 0.0;
            while t <= 9.0 {
                let round_trip = layout.pixels_to_time(layout.time_to_pixels(t));
                assert!((round_trip - t).abs() < 1e-9, "zoom={} t={}", zoom, t);
                t += 0.375;
            }
        }
    }

    #[test]
    fn test_set_items_preserves_clamped_playhead() {
        let mut layout = sample_layout();
        layout.seek(8.0);
        layout.set_items(vec![item("only", TimelineItemKind::Image, 2.0)]);
        assert_eq!(layout.playback.current_time_seconds, 2.0);
        layout.set_items(Vec::new());
        assert_eq!(layout.playback.current_time_seconds, 0.0);
        assert!(!layout.playback.is_playing);
    }
}
