//! Shared data model, engagement math, and configuration for ytscout.

mod app_config;
mod config;
pub mod engagement;
mod video;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use engagement::{compute, dedupe, filter, sort, EngagementThresholds, SortKey};
pub use video::{video_url, Engagement, Video, VideoDetails};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
