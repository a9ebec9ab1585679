use std::path::PathBuf;

use crate::engagement::EngagementThresholds;

#[derive(Clone)]
pub struct AppConfig {
    pub youtube_api_key: String,
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: String,
    pub openrouter_base_url: String,
    pub sheets_credentials_file: PathBuf,
    pub sheets_spreadsheet_id: String,
    pub sheets_sheet_name: String,
    pub search_days: u32,
    pub max_results: u32,
    pub thresholds: EngagementThresholds,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("youtube_api_key", &"[redacted]")
            .field(
                "openrouter_api_key",
                &self.openrouter_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("openrouter_model", &self.openrouter_model)
            .field("openrouter_base_url", &self.openrouter_base_url)
            .field("sheets_credentials_file", &self.sheets_credentials_file)
            .field("sheets_spreadsheet_id", &self.sheets_spreadsheet_id)
            .field("sheets_sheet_name", &self.sheets_sheet_name)
            .field("search_days", &self.search_days)
            .field("max_results", &self.max_results)
            .field("thresholds", &self.thresholds)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}
