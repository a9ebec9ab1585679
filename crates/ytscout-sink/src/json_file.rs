//! JSON snapshot of a run's results.

use std::path::Path;

use ytscout_core::Video;

use crate::error::SinkError;

/// Write `videos` to `path` as a pretty-printed JSON array of flat records.
///
/// Output is UTF-8 with non-ASCII text written as-is.
///
/// # Errors
///
/// Returns [`SinkError::Json`] if serialization fails or [`SinkError::Io`]
/// if the file cannot be written.
pub fn write_json_snapshot(path: &Path, videos: &[Video]) -> Result<(), SinkError> {
    let body = serde_json::to_string_pretty(videos)?;
    std::fs::write(path, body)?;
    tracing::info!(path = %path.display(), count = videos.len(), "saved JSON snapshot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ytscout_core::{video_url, VideoDetails};

    fn video(id: &str, title: &str) -> Video {
        Video::new(VideoDetails {
            id: id.to_string(),
            title: title.to_string(),
            description: "línea uno".to_string(),
            channel_name: "Canal".to_string(),
            published_at: "2026-10-11T07:45:00Z".parse().unwrap(),
            url: video_url(id),
            views: 4000,
            likes: 320,
            comments: 12,
        })
    }

    #[test]
    fn writes_pretty_array_with_unescaped_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");

        write_json_snapshot(&path, &[video("a", "Café ☕ SaaS"), video("b", "Second")]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Café ☕ SaaS"), "unicode was escaped: {text}");
        assert!(!text.contains("\\u"), "unexpected escape sequence: {text}");
        assert!(text.contains("\n  {"), "expected indented output: {text}");

        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        let rows = parsed.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["video_id"], "a");
        assert_eq!(rows[0]["channel_title"], "Canal");
        assert_eq!(rows[0]["like_ratio_percent"], "8.00%");
        assert_eq!(rows[1]["url"], "https://www.youtube.com/watch?v=b");
    }

    #[test]
    fn empty_list_writes_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");

        write_json_snapshot(&path, &[]).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.json");

        let err = write_json_snapshot(&path, &[]).unwrap_err();
        assert!(matches!(err, SinkError::Io(_)), "got {err:?}");
    }
}
