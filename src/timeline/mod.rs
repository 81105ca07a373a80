//! Timeline components
//!
//! This module contains the timeline panel and related components:
//! - TimelinePanel: header with transport controls plus the single video track
//! - TimeRuler: time ruler with tick marks
//! - PlaybackBtn: transport button
//! - ClipElement: one clip block per timeline item

mod clip_element;
mod panel;
mod playback_controls;
mod ruler;

pub use panel::TimelinePanel;

pub(crate) const RULER_HEIGHT_PX: f64 = 24.0;
pub(crate) const TRACK_STRIP_HEIGHT_PX: f64 = 96.0;
pub(crate) const MIN_CLIP_WIDTH_PX: f64 = 20.0;
