//! Timeline item extraction.
//!
//! Walks the storyboard in document order and flattens it into the ordered
//! clip list the layout engine and exporter consume. A scene with a usable
//! video contributes exactly one video item; otherwise it contributes one
//! image item per keyframe group that resolves to a URL. A scene whose only
//! video is unplayable and that has no keyframes, and any scene with no
//! media at all, is simply absent from the timeline.

use std::path::Path;

use crate::constants::{IMAGE_CLIP_DURATION_SECONDS, VIDEO_CLIP_DURATION_SECONDS};
use crate::state::{preferred_resource, MediaSource, Scene, Storyboard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineItemKind {
    Video,
    Image,
}

/// One playable unit on the single video track. Derived from the document,
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineItem {
    /// Stable key, e.g. `scene-3-video` or `scene-3-frame-1`.
    pub id: String,
    /// Index into the source scene list. Not unique across the image items
    /// of one scene.
    pub scene_index: usize,
    /// Index of the keyframe group an image item came from; `None` for
    /// video items.
    pub frame_index: Option<usize>,
    pub kind: TimelineItemKind,
    pub label: String,
    pub duration_seconds: f64,
    /// Playable media; `None` means the item is listed but not playable.
    pub media: Option<MediaSource>,
    /// Representative still for clip iconography.
    pub thumb: Option<MediaSource>,
}

/// Flatten the storyboard into timeline items. Pure function of the scene
/// list; malformed records resolve to "no URL" and are skipped, never an
/// error.
pub fn extract_timeline_items(board: &Storyboard, work_dir: &Path) -> Vec<TimelineItem> {
    let mut items = Vec::new();
    for (scene_index, scene) in board.scene_board.iter().enumerate() {
        if let Some(video) = scene.preferred_video() {
            let media = video.url().and_then(|url| MediaSource::classify(url, work_dir));
            // A video without a playable URL only claims its scene when
            // there are keyframes behind it; a scene with neither emits
            // nothing at all.
            if media.is_some() || !scene.frame_groups().is_empty() {
                let thumb = video
                    .parameters
                    .first_frame_image
                    .as_deref()
                    .filter(|url| !url.is_empty())
                    .or_else(|| {
                        scene.picture.first_frame.first().and_then(|record| record.url())
                    });
                items.push(TimelineItem {
                    id: format!("scene-{}-video", scene_index),
                    scene_index,
                    frame_index: None,
                    kind: TimelineItemKind::Video,
                    label: scene_label(scene, scene_index),
                    duration_seconds: VIDEO_CLIP_DURATION_SECONDS,
                    media,
                    thumb: thumb.and_then(|url| MediaSource::classify(url, work_dir)),
                });
                continue;
            }
        }

        for (frame_index, group) in scene.frame_groups().into_iter().enumerate() {
            let preferred = preferred_resource(
                group,
                |image| image.status,
                |image| image.created_at,
                |image| image.is_selected,
            );
            let url = preferred
                .and_then(|image| image.url())
                .or_else(|| scene.picture.first_frame.first().and_then(|record| record.url()));
            let Some(media) = url.and_then(|url| MediaSource::classify(url, work_dir)) else {
                continue;
            };
            items.push(TimelineItem {
                id: format!("scene-{}-frame-{}", scene_index, frame_index),
                scene_index,
                frame_index: Some(frame_index),
                kind: TimelineItemKind::Image,
                label: format!("{} - Frame {}", scene_label(scene, scene_index), frame_index + 1),
                duration_seconds: IMAGE_CLIP_DURATION_SECONDS,
                media: Some(media.clone()),
                thumb: Some(media),
            });
        }
    }
    items
}

fn scene_label(scene: &Scene, scene_index: usize) -> String {
    if !scene.description.is_empty() {
        return scene.description.clone();
    }
    match scene.shot_id {
        Some(shot_id) => format!("Shot {}", shot_id),
        None => format!("Shot {}", scene_index + 1),
    }
}
