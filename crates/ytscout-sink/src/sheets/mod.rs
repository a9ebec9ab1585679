//! Google Sheets sink: keeps a header row and appends one row per video.

mod auth;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::SecondsFormat;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use serde_json::{json, Value};
use ytscout_core::Video;

use crate::error::SinkError;
use auth::ServiceAccount;

const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";

/// Column headers written to row 1, in sheet order.
pub const HEADERS: [&str; 9] = [
    "Video Name",
    "URL",
    "Channel",
    "Views",
    "Likes",
    "Comments",
    "Like Ratio",
    "Comment Ratio",
    "Published",
];

/// Characters left unescaped in a range path segment.
const RANGE_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendResponse {
    #[serde(default)]
    updates: AppendUpdates,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    #[serde(default)]
    updated_rows: usize,
}

/// Appends result rows to a Google Sheet.
///
/// A sink built without usable credentials or a spreadsheet id is inert:
/// [`SheetsSink::store_videos`] returns 0 and never touches the network.
pub struct SheetsSink {
    target: Option<SheetTarget>,
}

struct SheetTarget {
    client: reqwest::Client,
    account: ServiceAccount,
    spreadsheet_id: String,
    sheet_name: String,
    api_base: String,
    headers_ready: AtomicBool,
}

impl SheetsSink {
    /// Build a sink against the production Sheets API.
    #[must_use]
    pub fn new(
        credentials_file: &Path,
        spreadsheet_id: &str,
        sheet_name: &str,
        timeout_secs: u64,
    ) -> Self {
        Self::with_api_base(
            credentials_file,
            spreadsheet_id,
            sheet_name,
            timeout_secs,
            DEFAULT_API_BASE,
        )
    }

    /// Build a sink with a custom API base URL (for testing with wiremock).
    ///
    /// Missing, unreadable, or invalid credentials and a blank spreadsheet id
    /// all produce an inert sink with a logged warning.
    #[must_use]
    pub fn with_api_base(
        credentials_file: &Path,
        spreadsheet_id: &str,
        sheet_name: &str,
        timeout_secs: u64,
        api_base: &str,
    ) -> Self {
        if !credentials_file.is_file() {
            tracing::warn!(
                path = %credentials_file.display(),
                "Google Sheets credentials file not found; storage will be skipped"
            );
            return Self::disabled();
        }
        if spreadsheet_id.trim().is_empty() {
            tracing::warn!("Google Sheets spreadsheet ID not set; storage will be skipped");
            return Self::disabled();
        }

        let account = match ServiceAccount::from_file(credentials_file) {
            Ok(account) => account,
            Err(e) => {
                tracing::error!(
                    path = %credentials_file.display(),
                    error = %e,
                    "failed to load Google Sheets credentials; storage will be skipped"
                );
                return Self::disabled();
            }
        };

        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                tracing::error!(error = %e, "failed to build Google Sheets HTTP client");
                return Self::disabled();
            }
        };

        Self {
            target: Some(SheetTarget {
                client,
                account,
                spreadsheet_id: spreadsheet_id.trim().to_owned(),
                sheet_name: sheet_name.to_owned(),
                api_base: api_base.trim_end_matches('/').to_owned(),
                headers_ready: AtomicBool::new(false),
            }),
        }
    }

    /// A sink that stores nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self { target: None }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.target.is_some()
    }

    /// Browser URL of the target spreadsheet, if one is configured.
    #[must_use]
    pub fn spreadsheet_url(&self) -> Option<String> {
        self.target
            .as_ref()
            .map(|t| format!("https://docs.google.com/spreadsheets/d/{}", t.spreadsheet_id))
    }

    /// Append one row per video, in order, and return the appended row count.
    ///
    /// Returns 0 for an inert sink or an empty list without any network I/O.
    /// Failures are logged and also yield 0.
    pub async fn store_videos(&self, videos: &[Video]) -> usize {
        let Some(target) = &self.target else {
            tracing::info!("skipping Google Sheets storage (missing credentials)");
            return 0;
        };
        if videos.is_empty() {
            return 0;
        }

        match target.store(videos).await {
            Ok(rows) => {
                tracing::info!(rows, "stored videos to Google Sheets");
                rows
            }
            Err(e) => {
                tracing::error!(error = %e, "Google Sheets storage error");
                0
            }
        }
    }
}

impl SheetTarget {
    async fn store(&self, videos: &[Video]) -> Result<usize, SinkError> {
        let token = self.account.access_token(&self.client).await?;
        self.ensure_headers(&token).await;

        let rows: Vec<Vec<Value>> = videos.iter().map(video_row).collect();
        let url = format!(
            "{}:append?valueInputOption=RAW&insertDataOption=INSERT_ROWS",
            self.values_url(&format!("{}!A:I", self.sheet_name))
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(&json!({ "values": rows }))
            .send()
            .await?;
        let response = check_status(response).await?;

        let body: AppendResponse = response.json().await?;
        Ok(body.updates.updated_rows)
    }

    /// Make sure row 1 holds [`HEADERS`], writing it when absent or different.
    ///
    /// Runs once per sink. Errors are logged; the append still proceeds.
    async fn ensure_headers(&self, token: &str) {
        if self.headers_ready.load(Ordering::Acquire) {
            return;
        }

        let range = self.header_range();
        match self.read_range(token, &range).await {
            Ok(existing) if header_matches(&existing) => {
                self.headers_ready.store(true, Ordering::Release);
            }
            Ok(_) => match self.write_headers(token, &range).await {
                Ok(()) => {
                    tracing::info!("added headers to Google Sheet");
                    self.headers_ready.store(true, Ordering::Release);
                }
                Err(e) => tracing::warn!(error = %e, "failed to write header row"),
            },
            Err(SinkError::Api { status: 404, .. }) => {
                // The tab may not exist yet; try the write anyway.
                match self.write_headers(token, &range).await {
                    Ok(()) => self.headers_ready.store(true, Ordering::Release),
                    Err(e) => tracing::warn!(error = %e, "failed to write header row"),
                }
            }
            Err(e) => tracing::warn!(error = %e, "error checking headers"),
        }
    }

    async fn read_range(&self, token: &str, range: &str) -> Result<Vec<Vec<Value>>, SinkError> {
        let response = self
            .client
            .get(self.values_url(range))
            .bearer_auth(token)
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: ValueRange = response.json().await?;
        Ok(body.values)
    }

    async fn write_headers(&self, token: &str, range: &str) -> Result<(), SinkError> {
        let url = format!("{}?valueInputOption=RAW", self.values_url(range));
        let response = self
            .client
            .put(&url)
            .bearer_auth(token)
            .json(&json!({ "range": range, "values": [HEADERS] }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    fn header_range(&self) -> String {
        format!("{}!A1:I1", self.sheet_name)
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.api_base,
            utf8_percent_encode(&self.spreadsheet_id, RANGE_ENCODE),
            utf8_percent_encode(range, RANGE_ENCODE)
        )
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SinkError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(SinkError::Api {
        status: status.as_u16(),
        body: response.text().await.unwrap_or_default(),
    })
}

fn header_matches(existing: &[Vec<Value>]) -> bool {
    existing.first().is_some_and(|row| {
        row.len() == HEADERS.len()
            && row
                .iter()
                .zip(HEADERS)
                .all(|(cell, expected)| cell.as_str() == Some(expected))
    })
}

fn video_row(video: &Video) -> Vec<Value> {
    let d = &video.details;
    let e = &video.engagement;
    vec![
        json!(d.title),
        json!(d.url),
        json!(d.channel_name),
        json!(d.views),
        json!(d.likes),
        json!(d.comments),
        json!(e.like_ratio_percent),
        json!(e.comment_ratio_percent),
        json!(d.published_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
    ]
}
