use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Watch URL for a video id.
#[must_use]
pub fn video_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={id}")
}

/// Metadata and raw counts for one video, as returned by the source client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDetails {
    #[serde(rename = "video_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "channel_title")]
    pub channel_name: String,
    pub published_at: DateTime<Utc>,
    pub url: String,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
}

/// Likes and comments as fractions of views, plus their display strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Engagement {
    pub like_ratio: f64,
    pub comment_ratio: f64,
    pub like_ratio_percent: String,
    pub comment_ratio_percent: String,
}

impl Engagement {
    /// Compute ratios from raw counts. Both ratios are `0.0` when `views == 0`.
    ///
    /// Ratios are not clamped: `likes > views` yields a ratio above 1.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_counts(views: u64, likes: u64, comments: u64) -> Self {
        let (like_ratio, comment_ratio) = if views > 0 {
            let views = views as f64;
            (likes as f64 / views, comments as f64 / views)
        } else {
            (0.0, 0.0)
        };

        Self {
            like_ratio,
            comment_ratio,
            like_ratio_percent: format_percent(like_ratio),
            comment_ratio_percent: format_percent(comment_ratio),
        }
    }
}

fn format_percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// A video with its engagement ratios attached.
///
/// Serializes as one flat record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(flatten)]
    pub details: VideoDetails,
    #[serde(flatten)]
    pub engagement: Engagement,
}

impl Video {
    #[must_use]
    pub fn new(details: VideoDetails) -> Self {
        let engagement = Engagement::from_counts(details.views, details.likes, details.comments);
        Self {
            details,
            engagement,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.details.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.details.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(id: &str, title: &str) -> VideoDetails {
        VideoDetails {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            channel_name: "Channel".to_string(),
            published_at: "2026-10-01T12:00:00Z".parse().unwrap(),
            url: video_url(id),
            views: 2000,
            likes: 150,
            comments: 9,
        }
    }

    #[test]
    fn video_url_uses_watch_path() {
        assert_eq!(
            video_url("dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn percent_strings_use_two_decimals() {
        let e = Engagement::from_counts(10_000, 523, 17);
        assert_eq!(e.like_ratio_percent, "5.23%");
        assert_eq!(e.comment_ratio_percent, "0.17%");
    }

    #[test]
    fn zero_views_yields_zero_ratios() {
        let e = Engagement::from_counts(0, 40, 7);
        assert_eq!(e.like_ratio, 0.0);
        assert_eq!(e.comment_ratio, 0.0);
        assert_eq!(e.like_ratio_percent, "0.00%");
    }

    #[test]
    fn likes_above_views_are_not_clamped() {
        let e = Engagement::from_counts(100, 250, 0);
        assert!((e.like_ratio - 2.5).abs() < f64::EPSILON);
        assert_eq!(e.like_ratio_percent, "250.00%");
    }

    #[test]
    fn video_serializes_as_flat_record() {
        let video = Video::new(details("abc", "Été à Paris"));
        let value = serde_json::to_value(&video).unwrap();
        let obj = value.as_object().expect("flat object");

        for key in [
            "video_id",
            "title",
            "description",
            "channel_title",
            "published_at",
            "url",
            "views",
            "likes",
            "comments",
            "like_ratio",
            "comment_ratio",
            "like_ratio_percent",
            "comment_ratio_percent",
        ] {
            assert!(obj.contains_key(key), "missing key {key}: {value}");
        }
        assert_eq!(obj["video_id"], "abc");
        assert_eq!(obj["title"], "Été à Paris");
        assert_eq!(obj["like_ratio_percent"], "7.50%");
        assert_eq!(obj["published_at"], "2026-10-01T12:00:00Z");
    }
}
