//! HTTP client for the YouTube Data API v3.
//!
//! Wraps `reqwest` with API key management and typed response
//! deserialization. The public operations never fail: transport and API
//! errors are logged and turned into an empty (or partial) result.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, Url};
use ytscout_core::{video_url, VideoDetails};

use crate::error::YoutubeError;
use crate::types::{ErrorEnvelope, SearchResponse, VideoItem, VideoListResponse};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Largest number of ids `videos.list` accepts in one call.
pub const MAX_IDS_PER_REQUEST: usize = 50;

/// Default cap on search hits.
pub const DEFAULT_MAX_RESULTS: u32 = 50;

/// Client for the YouTube Data API.
///
/// Use [`YoutubeClient::new`] for production or
/// [`YoutubeClient::with_base_url`] to point at a mock server in tests.
pub struct YoutubeClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl YoutubeClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::MissingApiKey`] if `api_key` is blank, or
    /// [`YoutubeError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, YoutubeError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`YoutubeClient::new`], plus [`YoutubeError::InvalidBaseUrl`]
    /// if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, YoutubeError> {
        if api_key.trim().is_empty() {
            return Err(YoutubeError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("ytscout/0.1 (engagement-research)")
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| YoutubeError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Searches for videos on `query` published in the last `days_back` days.
    ///
    /// Returns video ids ordered by relevance, at most `max_results`. On any
    /// failure the error is logged and an empty list is returned.
    pub async fn search(&self, query: &str, days_back: u32, max_results: u32) -> Vec<String> {
        let after = published_after(Utc::now(), days_back);
        match self.try_search(query, &after, max_results).await {
            Ok(ids) => {
                tracing::debug!(query, count = ids.len(), published_after = %after, "search complete");
                ids
            }
            Err(e) => {
                tracing::error!(query, error = %e, "YouTube API error during search");
                Vec::new()
            }
        }
    }

    /// Fetches snippet and statistics for `ids`, [`MAX_IDS_PER_REQUEST`] per call.
    ///
    /// A failed batch is logged and skipped; the remaining batches still run.
    pub async fn fetch_details(&self, ids: &[String]) -> Vec<VideoDetails> {
        let mut videos = Vec::with_capacity(ids.len());

        for (batch, chunk) in ids.chunks(MAX_IDS_PER_REQUEST).enumerate() {
            match self.try_fetch_batch(chunk).await {
                Ok(items) => videos.extend(items.into_iter().map(into_details)),
                Err(e) => {
                    tracing::error!(
                        batch,
                        size = chunk.len(),
                        error = %e,
                        "YouTube API error fetching details; skipping batch"
                    );
                }
            }
        }

        videos
    }

    /// `search` followed by `fetch_details`.
    pub async fn search_videos(
        &self,
        query: &str,
        days_back: u32,
        max_results: u32,
    ) -> Vec<VideoDetails> {
        let ids = self.search(query, days_back, max_results).await;
        self.fetch_details(&ids).await
    }

    async fn try_search(
        &self,
        query: &str,
        published_after: &str,
        max_results: u32,
    ) -> Result<Vec<String>, YoutubeError> {
        let url = self.build_url(
            "search",
            &[
                ("part", "id"),
                ("q", query),
                ("type", "video"),
                ("order", "relevance"),
                ("publishedAfter", published_after),
                ("maxResults", &max_results.to_string()),
            ],
        );
        let body = self.request_json(&url).await?;

        let response: SearchResponse =
            serde_json::from_value(body).map_err(|e| YoutubeError::Deserialize {
                context: format!("search(q={query})"),
                source: e,
            })?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect())
    }

    async fn try_fetch_batch(&self, ids: &[String]) -> Result<Vec<VideoItem>, YoutubeError> {
        let joined = ids.join(",");
        let url = self.build_url("videos", &[("part", "snippet,statistics"), ("id", &joined)]);
        let body = self.request_json(&url).await?;

        let response: VideoListResponse =
            serde_json::from_value(body).map_err(|e| YoutubeError::Deserialize {
                context: format!("videos(count={})", ids.len()),
                source: e,
            })?;

        Ok(response.items)
    }

    /// Builds `{base}{endpoint}?key=...&...` with percent-encoded parameters.
    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self
            .base_url
            .join(endpoint)
            .unwrap_or_else(|_| self.base_url.clone());
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a GET request and parses the body as JSON.
    ///
    /// Non-2xx responses become [`YoutubeError::Api`] carrying the message
    /// from the API's error envelope when one is present.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, YoutubeError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|env| env.error.message)
                .unwrap_or(body);
            return Err(YoutubeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| YoutubeError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }
}

/// RFC 3339 lower bound `days_back` days before `now`, e.g. `2026-10-12T09:00:00Z`.
///
/// A window reaching past the Unix epoch is clamped to `1970-01-01T00:00:00Z`.
#[must_use]
pub fn published_after(now: DateTime<Utc>, days_back: u32) -> String {
    chrono::Duration::try_days(i64::from(days_back))
        .and_then(|window| now.checked_sub_signed(window))
        .filter(|after| after.timestamp() >= 0)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

fn into_details(item: VideoItem) -> VideoDetails {
    let VideoItem {
        id,
        snippet,
        statistics,
    } = item;

    VideoDetails {
        url: video_url(&id),
        title: snippet.title,
        description: snippet.description,
        channel_name: snippet.channel_title,
        published_at: snippet.published_at.unwrap_or_default(),
        views: parse_count(statistics.view_count.as_deref()),
        likes: parse_count(statistics.like_count.as_deref()),
        comments: parse_count(statistics.comment_count.as_deref()),
        id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> YoutubeClient {
        YoutubeClient::with_base_url("test-key", 30, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let result = YoutubeClient::new("  ", 30);
        assert!(matches!(result, Err(YoutubeError::MissingApiKey)));
    }

    #[test]
    fn build_url_constructs_correct_query_string() {
        let client = test_client("https://www.googleapis.com/youtube/v3");
        let url = client.build_url("videos", &[("part", "snippet"), ("id", "abc")]);
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/youtube/v3/videos?key=test-key&part=snippet&id=abc"
        );
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let client = test_client("https://www.googleapis.com/youtube/v3/");
        let url = client.build_url("search", &[("q", "saas & ai")]);
        assert!(
            url.as_str().contains("q=saas+%26+ai"),
            "query param should be percent-encoded: {url}"
        );
    }

    #[test]
    fn published_after_subtracts_whole_days() {
        let now: DateTime<Utc> = "2026-10-19T09:15:30Z".parse().unwrap();
        assert_eq!(published_after(now, 7), "2026-10-12T09:15:30Z");
        assert_eq!(published_after(now, 0), "2026-10-19T09:15:30Z");
    }

    #[test]
    fn published_after_clamps_huge_windows_to_epoch() {
        let now: DateTime<Utc> = "2026-10-19T09:15:30Z".parse().unwrap();
        assert_eq!(published_after(now, 30_000), "1970-01-01T00:00:00Z");
        assert_eq!(published_after(now, 200_000_000), "1970-01-01T00:00:00Z");
        assert_eq!(published_after(now, u32::MAX), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn parse_count_defaults_to_zero() {
        assert_eq!(parse_count(Some("1234")), 1234);
        assert_eq!(parse_count(None), 0);
        assert_eq!(parse_count(Some("")), 0);
        assert_eq!(parse_count(Some("n/a")), 0);
    }

    #[test]
    fn into_details_fills_missing_statistics() {
        let item: VideoItem = serde_json::from_value(serde_json::json!({
            "id": "xyz",
            "snippet": {
                "title": "Title",
                "channelTitle": "Chan",
                "publishedAt": "2026-10-10T10:00:00Z"
            }
        }))
        .unwrap();

        let details = into_details(item);
        assert_eq!(details.id, "xyz");
        assert_eq!(details.url, "https://www.youtube.com/watch?v=xyz");
        assert_eq!(details.description, "");
        assert_eq!(details.channel_name, "Chan");
        assert_eq!((details.views, details.likes, details.comments), (0, 0, 0));
    }
}
