//! Storyboard document model.
//!
//! This module contains the data structures for a storyboard document:
//! - Storyboard: the top-level container (ordered scene list)
//! - Scene: one storyboard row with candidate videos and keyframe groups
//! - VideoRecord / ImageRecord: generated media candidates with status
//!
//! The document is file-backed JSON owned by the embedding shell. Loading is
//! deliberately lenient: missing or malformed fields default instead of
//! failing the whole document.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Terminal and in-flight states of a generation task, as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    IsLoading,
    Completed,
    Failed,
    Overtime,
    #[serde(other)]
    Unknown,
}

impl Default for GenerationStatus {
    fn default() -> Self {
        GenerationStatus::Unknown
    }
}

impl GenerationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GenerationStatus::Completed | GenerationStatus::Failed | GenerationStatus::Overtime
        )
    }
}

/// A generated video candidate for a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(default)]
    pub status: GenerationStatus,
    /// Creation time in epoch milliseconds.
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub video_urls: Vec<String>,
    #[serde(default)]
    pub parameters: VideoParameters,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoParameters {
    /// Still used as the clip thumbnail when present.
    #[serde(default)]
    pub first_frame_image: Option<String>,
}

impl VideoRecord {
    /// The playable URL, preferring the singular field over the list.
    pub fn url(&self) -> Option<&str> {
        self.video_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .or_else(|| self.video_urls.first().map(|url| url.as_str()))
    }
}

/// A generated image candidate inside a keyframe group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    #[serde(default)]
    pub status: GenerationStatus,
    /// Creation time in epoch milliseconds.
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ImageRecord {
    pub fn url(&self) -> Option<&str> {
        self.image_urls
            .first()
            .map(|url| url.as_str())
            .filter(|url| !url.is_empty())
    }
}

/// The picture track of a scene: keyframe groups plus the legacy
/// single-slot `first_frame` shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Picture {
    #[serde(default)]
    pub frames: Vec<Vec<ImageRecord>>,
    #[serde(default)]
    pub first_frame: Vec<ImageRecord>,
}

/// One storyboard row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub shot_id: Option<u32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub videos: Vec<VideoRecord>,
    #[serde(default)]
    pub picture: Picture,
    /// Oldest document shape: a flat candidate list with no groups.
    #[serde(default)]
    pub images: Vec<ImageRecord>,
}

impl Scene {
    /// The video this scene should play, if any. See [`preferred_resource`].
    pub fn preferred_video(&self) -> Option<&VideoRecord> {
        preferred_resource(&self.videos, |v| v.status, |v| v.created_at, |v| v.is_selected)
    }

    /// Keyframe groups in display order. Falls back through the historical
    /// document shapes: `picture.frames`, then `picture.first_frame` as a
    /// single group, then the legacy flat `images` list.
    pub fn frame_groups(&self) -> Vec<&[ImageRecord]> {
        if !self.picture.frames.is_empty() {
            return self.picture.frames.iter().map(|group| group.as_slice()).collect();
        }
        if !self.picture.first_frame.is_empty() {
            return vec![self.picture.first_frame.as_slice()];
        }
        if !self.images.is_empty() {
            return vec![self.images.as_slice()];
        }
        Vec::new()
    }

    /// Representative still for scene strip icons: the preferred video's
    /// first frame, else the first first-frame candidate.
    pub fn thumb_url(&self) -> Option<&str> {
        if let Some(video) = self.preferred_video() {
            if let Some(url) = video.parameters.first_frame_image.as_deref() {
                if !url.is_empty() {
                    return Some(url);
                }
            }
        }
        self.picture.first_frame.first().and_then(|record| record.url())
    }
}

/// Pick the candidate a scene (or keyframe group) should use.
///
/// Pool is the completed candidates when any exist, else all candidates.
/// Inside the pool an explicitly selected candidate wins; otherwise the
/// latest `created_at` (missing treated as 0), with original list order
/// breaking ties in favor of the later entry.
pub fn preferred_resource<T>(
    items: &[T],
    status: impl Fn(&T) -> GenerationStatus,
    created_at: impl Fn(&T) -> Option<i64>,
    is_selected: impl Fn(&T) -> bool,
) -> Option<&T> {
    if items.is_empty() {
        return None;
    }
    let completed: Vec<&T> = items
        .iter()
        .filter(|item| status(item) == GenerationStatus::Completed)
        .collect();
    let pool: Vec<&T> = if completed.is_empty() {
        items.iter().collect()
    } else {
        completed
    };
    if let Some(selected) = pool.iter().find(|item| is_selected(item)) {
        return Some(selected);
    }
    // max_by_key keeps the last maximum, so equal timestamps resolve to the
    // later list entry.
    pool.into_iter().max_by_key(|item| created_at(item).unwrap_or(0))
}

/// The top-level storyboard document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Storyboard {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub scene_board: Vec<Scene>,

    /// Directory relative media paths resolve against (not serialized -
    /// set on load).
    #[serde(skip)]
    pub work_dir: Option<PathBuf>,
}

impl Storyboard {
    /// Parse a document from raw JSON, tolerating an empty string.
    pub fn parse(raw: &str) -> io::Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    /// Load a storyboard from a JSON file. The file's directory becomes the
    /// work dir for relative media paths.
    pub fn load(path: &Path) -> io::Result<Self> {
        let raw = fs::read_to_string(path)?;
        let mut board = Self::parse(&raw)?;
        board.work_dir = path.parent().map(|dir| dir.to_path_buf());
        if board.name.is_empty() {
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                board.name = stem.to_string();
            }
        }
        Ok(board)
    }

    /// Save the document back to `path`, writing through a temp file so a
    /// failed write never truncates the original.
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        if path.exists() {
            let _ = fs::remove_file(path);
        }
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Sanitized project name for export: whitespace runs collapse to `_`,
    /// truncated to 80 chars, `"Timeline"` when empty.
    pub fn export_name(&self) -> String {
        let joined = self
            .name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        let name: String = joined.chars().take(80).collect();
        if name.is_empty() {
            "Timeline".to_string()
        } else {
            name
        }
    }

    /// Mark a video candidate as the scene's selection, clearing the flag on
    /// its siblings. Returns false when the indices don't resolve.
    pub fn select_video(&mut self, scene_index: usize, video_index: usize) -> bool {
        let Some(scene) = self.scene_board.get_mut(scene_index) else {
            return false;
        };
        if video_index >= scene.videos.len() {
            return false;
        }
        for (index, video) in scene.videos.iter_mut().enumerate() {
            video.is_selected = index == video_index;
        }
        true
    }

    /// Mark an image candidate as its keyframe group's selection.
    pub fn select_image(
        &mut self,
        scene_index: usize,
        frame_index: usize,
        candidate_index: usize,
    ) -> bool {
        let Some(scene) = self.scene_board.get_mut(scene_index) else {
            return false;
        };
        let Some(group) = scene.picture.frames.get_mut(frame_index) else {
            return false;
        };
        if candidate_index >= group.len() {
            return false;
        }
        for (index, image) in group.iter_mut().enumerate() {
            image.is_selected = index == candidate_index;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(status: GenerationStatus, created_at: i64, is_selected: bool) -> VideoRecord {
        VideoRecord {
            status,
            created_at: Some(created_at),
            is_selected,
            video_url: Some(format!("clip-{}.mp4", created_at)),
            ..Default::default()
        }
    }

    #[test]
    fn test_status_wire_names() {
        let parsed: GenerationStatus = serde_json::from_str("\"isloading\"").unwrap();
        assert_eq!(parsed, GenerationStatus::IsLoading);
        let parsed: GenerationStatus = serde_json::from_str("\"overtime\"").unwrap();
        assert_eq!(parsed, GenerationStatus::Overtime);
        // Unknown statuses degrade instead of failing the document.
        let parsed: GenerationStatus = serde_json::from_str("\"queued\"").unwrap();
        assert_eq!(parsed, GenerationStatus::Unknown);
    }

    #[test]
    fn test_lenient_scene_parse() {
        let board = Storyboard::parse(
            r#"{"name":"Demo","scene_board":[{"description":"Opening"},{}]}"#,
        )
        .unwrap();
        assert_eq!(board.scene_board.len(), 2);
        assert_eq!(board.scene_board[0].description, "Opening");
        assert!(board.scene_board[1].videos.is_empty());
        assert!(board.scene_board[1].frame_groups().is_empty());
    }

    #[test]
    fn test_preferred_prefers_selected_over_latest() {
        // Scenario: two completed videos, the older one explicitly selected.
        let scene = Scene {
            videos: vec![
                video(GenerationStatus::Completed, 100, true),
                video(GenerationStatus::Completed, 200, false),
            ],
            ..Default::default()
        };
        let preferred = scene.preferred_video().unwrap();
        assert_eq!(preferred.created_at, Some(100));
    }

    #[test]
    fn test_preferred_latest_completed_wins() {
        let scene = Scene {
            videos: vec![
                video(GenerationStatus::Completed, 300, false),
                video(GenerationStatus::Failed, 900, false),
                video(GenerationStatus::Completed, 500, false),
            ],
            ..Default::default()
        };
        // The failed record is newer but outside the completed pool.
        assert_eq!(scene.preferred_video().unwrap().created_at, Some(500));
    }

    #[test]
    fn test_preferred_falls_back_to_latest_overall() {
        let scene = Scene {
            videos: vec![
                video(GenerationStatus::Failed, 100, false),
                video(GenerationStatus::IsLoading, 200, false),
            ],
            ..Default::default()
        };
        assert_eq!(scene.preferred_video().unwrap().created_at, Some(200));
    }

    #[test]
    fn test_preferred_equal_timestamps_keep_later_entry() {
        let mut a = video(GenerationStatus::Completed, 100, false);
        a.video_url = Some("a.mp4".into());
        let mut b = video(GenerationStatus::Completed, 100, false);
        b.video_url = Some("b.mp4".into());
        let scene = Scene { videos: vec![a, b], ..Default::default() };
        assert_eq!(scene.preferred_video().unwrap().video_url.as_deref(), Some("b.mp4"));
    }

    #[test]
    fn test_frame_group_fallback_chain() {
        let record = ImageRecord {
            status: GenerationStatus::Completed,
            image_urls: vec!["k.png".into()],
            ..Default::default()
        };
        let mut scene = Scene::default();
        scene.images = vec![record.clone()];
        assert_eq!(scene.frame_groups().len(), 1);

        scene.picture.first_frame = vec![record.clone()];
        assert_eq!(scene.frame_groups().len(), 1);
        assert_eq!(scene.frame_groups()[0][0].image_urls[0], "k.png");

        scene.picture.frames = vec![vec![record.clone()], vec![record]];
        assert_eq!(scene.frame_groups().len(), 2);
    }

    #[test]
    fn test_export_name_sanitization() {
        let mut board = Storyboard::default();
        assert_eq!(board.export_name(), "Timeline");
        board.name = "My  Storyboard  Cut".into();
        assert_eq!(board.export_name(), "My_Storyboard_Cut");
        board.name = "x".repeat(120);
        assert_eq!(board.export_name().len(), 80);
    }

    #[test]
    fn test_select_video_is_exclusive() {
        let mut board = Storyboard {
            scene_board: vec![Scene {
                videos: vec![
                    video(GenerationStatus::Completed, 1, true),
                    video(GenerationStatus::Completed, 2, false),
                ],
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(board.select_video(0, 1));
        assert!(!board.scene_board[0].videos[0].is_selected);
        assert!(board.scene_board[0].videos[1].is_selected);
        assert!(!board.select_video(0, 5));
        assert!(!board.select_video(3, 0));
    }

    #[test]
    fn test_select_image_targets_one_group() {
        let image = |created_at: i64, is_selected: bool| ImageRecord {
            status: GenerationStatus::Completed,
            created_at: Some(created_at),
            is_selected,
            ..Default::default()
        };
        let mut board = Storyboard {
            scene_board: vec![Scene {
                picture: Picture {
                    frames: vec![
                        vec![image(1, true), image(2, false)],
                        vec![image(3, true), image(4, false)],
                    ],
                    ..Default::default()
                },
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(board.select_image(0, 1, 1));
        // Sibling groups keep their own selection.
        let frames = &board.scene_board[0].picture.frames;
        assert!(frames[0][0].is_selected);
        assert!(!frames[1][0].is_selected);
        assert!(frames[1][1].is_selected);
        assert!(!board.select_image(0, 5, 0));
        assert!(!board.select_image(0, 1, 9));
    }

    #[test]
    fn test_document_round_trip() {
        let json = r#"{
            "name": "Demo",
            "scene_board": [{
                "shot_id": 1,
                "description": "Opening",
                "videos": [{"status": "completed", "created_at": 10, "video_url": "v.mp4"}],
                "picture": {"frames": [[{"status": "completed", "image_urls": ["a.png"]}]]}
            }]
        }"#;
        let board = Storyboard::parse(json).unwrap();
        let serialized = serde_json::to_string(&board).unwrap();
        let reparsed = Storyboard::parse(&serialized).unwrap();
        assert_eq!(reparsed.scene_board, board.scene_board);
        assert_eq!(reparsed.name, "Demo");
    }
}
