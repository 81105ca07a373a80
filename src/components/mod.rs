//! Reusable UI components outside the timeline.

mod preview_panel;
mod scene_strip;

pub use preview_panel::PreviewPanel;
pub use scene_strip::SceneStrip;
