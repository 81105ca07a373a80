use std::path::Path;
use urlencoding;

/// Generates a URL for a local file that is compatible with the custom
/// protocol handler the webview serves media through. This abstracts away
/// the scheme (http://storyboard.localhost/) and encoding requirements.
pub fn get_local_file_url(path: &Path) -> String {
    // 1. Convert path separators to forward slashes (standard API for URL paths)
    let p_str = path.to_string_lossy().replace("\\", "/");

    // 2. Percent-encode the path to handle spaces, distinct characters, etc.
    // 3. Prefix with the configured custom protocol host mapping.
    format!("http://storyboard.localhost/{}", urlencoding::encode(&p_str))
}

/// Format seconds as `m:ss` for the preview time label.
pub fn format_clip_time(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let m = (seconds / 60.0).floor() as u64;
    let s = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", m, s)
}

/// Format seconds as `mm:ss` for ruler tick labels.
pub fn format_ruler_label(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let m = (seconds / 60.0).floor() as u64;
    let s = (seconds % 60.0).floor() as u64;
    format!("{:02}:{:02}", m, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clip_time() {
        assert_eq!(format_clip_time(0.0), "0:00");
        assert_eq!(format_clip_time(9.0), "0:09");
        assert_eq!(format_clip_time(75.4), "1:15");
        assert_eq!(format_clip_time(-3.0), "0:00");
    }

    #[test]
    fn test_format_ruler_label() {
        assert_eq!(format_ruler_label(0.0), "00:00");
        assert_eq!(format_ruler_label(61.0), "01:01");
    }

    #[test]
    fn test_local_file_url_encodes_path() {
        let url = get_local_file_url(Path::new("work dir/shot 01.png"));
        assert_eq!(
            url,
            "http://storyboard.localhost/work%20dir%2Fshot%2001.png"
        );
    }
}
