//! Engagement stages: ratio computation, threshold filter, dedupe, and sort.
//!
//! Every function here is a single pass over an in-memory list and takes its
//! inputs by value, returning a new list.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::video::{Video, VideoDetails};

/// Minimum engagement a video needs to survive [`filter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngagementThresholds {
    /// Minimum `likes / views`, e.g. `0.05` for 5%.
    pub min_like_ratio: f64,
    /// Minimum `comments / views`, e.g. `0.002` for 0.2%.
    pub min_comment_ratio: f64,
    pub min_views: u64,
}

impl Default for EngagementThresholds {
    fn default() -> Self {
        Self {
            min_like_ratio: 0.05,
            min_comment_ratio: 0.002,
            min_views: 1000,
        }
    }
}

impl EngagementThresholds {
    #[must_use]
    pub fn accepts(&self, video: &Video) -> bool {
        video.engagement.like_ratio >= self.min_like_ratio
            && video.engagement.comment_ratio >= self.min_comment_ratio
            && video.details.views >= self.min_views
    }
}

/// Numeric field used to order results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    LikeRatio,
    CommentRatio,
    Views,
    Likes,
    Comments,
}

impl SortKey {
    fn compare(self, a: &Video, b: &Video) -> Ordering {
        match self {
            SortKey::LikeRatio => a.engagement.like_ratio.total_cmp(&b.engagement.like_ratio),
            SortKey::CommentRatio => a
                .engagement
                .comment_ratio
                .total_cmp(&b.engagement.comment_ratio),
            SortKey::Views => a.details.views.cmp(&b.details.views),
            SortKey::Likes => a.details.likes.cmp(&b.details.likes),
            SortKey::Comments => a.details.comments.cmp(&b.details.comments),
        }
    }
}

/// Attach engagement ratios to each record.
#[must_use]
pub fn compute(details: Vec<VideoDetails>) -> Vec<Video> {
    details.into_iter().map(Video::new).collect()
}

/// Keep videos meeting every threshold, preserving order.
#[must_use]
pub fn filter(videos: Vec<Video>, thresholds: &EngagementThresholds) -> Vec<Video> {
    videos
        .into_iter()
        .filter(|v| thresholds.accepts(v))
        .collect()
}

/// Keep the first occurrence of each id. Videos with an empty id are dropped.
#[must_use]
pub fn dedupe(videos: Vec<Video>) -> Vec<Video> {
    let mut seen: HashSet<String> = HashSet::with_capacity(videos.len());
    videos
        .into_iter()
        .filter(|v| !v.id().is_empty() && seen.insert(v.id().to_string()))
        .collect()
}

/// Stable sort by `key`. Equal keys keep their input order in either direction.
#[must_use]
pub fn sort(mut videos: Vec<Video>, key: SortKey, descending: bool) -> Vec<Video> {
    if descending {
        videos.sort_by(|a, b| key.compare(b, a));
    } else {
        videos.sort_by(|a, b| key.compare(a, b));
    }
    videos
}

#[cfg(test)]
#[path = "engagement_test.rs"]
mod tests;
