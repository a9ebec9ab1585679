//! YouTube Data API v3 client: relevance search plus batched detail lookup.

pub mod client;
pub mod error;
pub mod types;

pub use client::{published_after, YoutubeClient, DEFAULT_MAX_RESULTS, MAX_IDS_PER_REQUEST};
pub use error::YoutubeError;
