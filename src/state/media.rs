//! Media source classification.
//!
//! Generated records carry URLs in several shapes: inline data URLs, remote
//! http(s) URLs, absolute local paths, and paths relative to the storyboard's
//! working directory. Classification happens once, at ingestion, so the
//! extractor, layout engine, and exporter never branch on string prefixes.

use std::path::{Path, PathBuf};

use crate::utils::get_local_file_url;

/// A resolved reference to a piece of generated media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// A `data:` URL with the payload inlined.
    Inline(String),
    /// A remote `http(s)` or `file:` URL, used as-is.
    Remote(String),
    /// A local filesystem path, absolute after classification.
    LocalPath(PathBuf),
}

impl MediaSource {
    /// Classify a raw URL string from the document. Relative paths are
    /// joined against `work_dir`. Empty strings yield `None`.
    pub fn classify(raw: &str, work_dir: &Path) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        if raw.starts_with("data:") {
            return Some(MediaSource::Inline(raw.to_string()));
        }
        if raw.starts_with("http") || raw.starts_with("file:") {
            return Some(MediaSource::Remote(raw.to_string()));
        }
        let path = Path::new(raw);
        if path.is_absolute() || is_windows_drive_path(raw) {
            Some(MediaSource::LocalPath(PathBuf::from(raw)))
        } else {
            Some(MediaSource::LocalPath(work_dir.join(raw)))
        }
    }

    /// URL the webview can render: inline and remote sources pass through,
    /// local paths go through the custom protocol helper.
    pub fn display_url(&self) -> String {
        match self {
            MediaSource::Inline(url) | MediaSource::Remote(url) => url.clone(),
            MediaSource::LocalPath(path) => get_local_file_url(path),
        }
    }

    /// File extension, lowercased, when the source carries one.
    pub fn extension(&self) -> Option<String> {
        let name = match self {
            MediaSource::Inline(_) => return None,
            MediaSource::Remote(url) => url.as_str(),
            MediaSource::LocalPath(path) => return path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.to_ascii_lowercase()),
        };
        let tail = name.rsplit('/').next().unwrap_or(name);
        let tail = tail.split(['?', '#']).next().unwrap_or(tail);
        match tail.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => Some(ext.to_ascii_lowercase()),
            _ => None,
        }
    }

    /// Best-effort check whether the source is video rather than a still,
    /// by MIME type. Sources without a recognizable type read as stills.
    pub fn is_video_file(&self) -> bool {
        if let MediaSource::Inline(url) = self {
            return url.starts_with("data:video/");
        }
        self.extension()
            .and_then(|ext| mime_guess::from_ext(&ext).first())
            .map(|mime| mime.type_() == mime_guess::mime::VIDEO)
            .unwrap_or(false)
    }
}

// `C:\...` and `C:/...` are absolute on Windows but `Path::is_absolute`
// only reports that when compiled for Windows; documents move between hosts.
fn is_windows_drive_path(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_kinds() {
        let work_dir = Path::new("/projects/demo");
        assert_eq!(
            MediaSource::classify("data:image/png;base64,AAAA", work_dir),
            Some(MediaSource::Inline("data:image/png;base64,AAAA".into()))
        );
        assert_eq!(
            MediaSource::classify("https://cdn.example.com/a.mp4", work_dir),
            Some(MediaSource::Remote("https://cdn.example.com/a.mp4".into()))
        );
        assert_eq!(
            MediaSource::classify("shots/001.png", work_dir),
            Some(MediaSource::LocalPath(PathBuf::from(
                "/projects/demo/shots/001.png"
            )))
        );
        assert_eq!(MediaSource::classify("", work_dir), None);
    }

    #[test]
    fn test_windows_drive_paths_stay_absolute() {
        let work_dir = Path::new("/projects/demo");
        assert_eq!(
            MediaSource::classify("C:/media/clip.mp4", work_dir),
            Some(MediaSource::LocalPath(PathBuf::from("C:/media/clip.mp4")))
        );
    }

    #[test]
    fn test_extension() {
        let work_dir = Path::new("/w");
        let remote = MediaSource::classify("https://x/a/b.video.MP4?sig=1", work_dir).unwrap();
        assert_eq!(remote.extension(), Some("mp4".to_string()));
        let local = MediaSource::classify("frames/k1.PNG", work_dir).unwrap();
        assert_eq!(local.extension(), Some("png".to_string()));
        let bare = MediaSource::classify("https://x/stream", work_dir).unwrap();
        assert_eq!(bare.extension(), None);
    }

    #[test]
    fn test_is_video_file() {
        let work_dir = Path::new("/w");
        assert!(MediaSource::classify("clips/a.mp4", work_dir)
            .unwrap()
            .is_video_file());
        assert!(MediaSource::classify("https://x/a.webm?sig=1", work_dir)
            .unwrap()
            .is_video_file());
        assert!(MediaSource::classify("data:video/mp4;base64,AAAA", work_dir)
            .unwrap()
            .is_video_file());
        assert!(!MediaSource::classify("frames/k1.png", work_dir)
            .unwrap()
            .is_video_file());
        assert!(!MediaSource::classify("https://x/stream", work_dir)
            .unwrap()
            .is_video_file());
    }
}
