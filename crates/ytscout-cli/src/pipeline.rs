//! Research run orchestration.

use std::path::PathBuf;

use anyhow::Context;
use ytscout_core::{engagement, AppConfig, EngagementThresholds, SortKey, Video};
use ytscout_language::LanguageValidator;
use ytscout_sink::{write_json_snapshot, SheetsSink};
use ytscout_youtube::YoutubeClient;

/// Per-run parameters, already merged from config and CLI flags.
#[derive(Debug, Clone)]
pub(crate) struct ResearchOptions {
    pub topic: String,
    pub days_back: u32,
    pub max_results: u32,
    pub thresholds: EngagementThresholds,
    pub sort_key: SortKey,
    pub output: Option<PathBuf>,
}

/// External clients for one run. Optional stages are `None` when disabled.
pub(crate) struct Services {
    pub youtube: YoutubeClient,
    pub validator: Option<LanguageValidator>,
    pub sheets: Option<SheetsSink>,
}

impl Services {
    /// Build clients from config.
    ///
    /// # Errors
    ///
    /// Fails if the YouTube key is missing or an HTTP client cannot be built.
    /// No request is made here.
    pub(crate) fn from_config(
        config: &AppConfig,
        validate_language: bool,
        save_to_sheets: bool,
    ) -> anyhow::Result<Self> {
        let youtube = YoutubeClient::new(&config.youtube_api_key, config.request_timeout_secs)
            .context("failed to build YouTube client")?;

        let validator = if validate_language {
            Some(
                LanguageValidator::new(
                    config.openrouter_api_key.as_deref(),
                    &config.openrouter_model,
                    &config.openrouter_base_url,
                )
                .context("failed to build language validator")?,
            )
        } else {
            None
        };

        let sheets = save_to_sheets.then(|| {
            SheetsSink::new(
                &config.sheets_credentials_file,
                &config.sheets_spreadsheet_id,
                &config.sheets_sheet_name,
                config.request_timeout_secs,
            )
        });

        Ok(Self {
            youtube,
            validator,
            sheets,
        })
    }
}

/// Run search, engagement, dedupe, language, sort, and sink stages in order.
///
/// An empty search result or an empty filter result ends the run early with
/// `Ok(vec![])`.
///
/// # Errors
///
/// Only a failed JSON snapshot write is returned as an error; every remote
/// failure has already degraded to an empty or partial result.
pub(crate) async fn run_research(
    services: &Services,
    options: &ResearchOptions,
) -> anyhow::Result<Vec<Video>> {
    let t = &options.thresholds;
    tracing::info!(
        topic = %options.topic,
        days_back = options.days_back,
        min_views = t.min_views,
        min_like_ratio = t.min_like_ratio,
        min_comment_ratio = t.min_comment_ratio,
        "starting YouTube research"
    );

    let details = services
        .youtube
        .search_videos(&options.topic, options.days_back, options.max_results)
        .await;
    tracing::info!(count = details.len(), "step 1: searched YouTube");
    if details.is_empty() {
        tracing::warn!("no videos found; check your API key and search term");
        return Ok(Vec::new());
    }

    let videos = engagement::compute(details);
    tracing::info!(count = videos.len(), "step 2: calculated engagement ratios");

    let videos = engagement::filter(videos, t);
    tracing::info!(count = videos.len(), "step 3: passed engagement filters");
    if videos.is_empty() {
        tracing::info!("no videos met the engagement criteria");
        return Ok(Vec::new());
    }

    let videos = engagement::dedupe(videos);
    tracing::info!(count = videos.len(), "step 4: removed duplicates");

    let videos = match &services.validator {
        Some(validator) => {
            let kept = validator.filter_videos(videos).await;
            tracing::info!(count = kept.len(), "step 5: validated title language");
            kept
        }
        None => videos,
    };

    let videos = engagement::sort(videos, options.sort_key, true);
    tracing::info!(key = ?options.sort_key, "step 6: sorted by engagement");

    if let Some(sheets) = &services.sheets {
        let rows = sheets.store_videos(&videos).await;
        tracing::info!(rows, "step 7: stored rows in Google Sheets");
        if rows > 0 {
            if let Some(url) = sheets.spreadsheet_url() {
                tracing::info!(%url, "spreadsheet updated");
            }
        }
    }

    if let Some(path) = &options.output {
        write_json_snapshot(path, &videos)
            .with_context(|| format!("failed to write results to {}", path.display()))?;
    }

    Ok(videos)
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
