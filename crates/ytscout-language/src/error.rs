use thiserror::Error;

#[derive(Debug, Error)]
pub enum LanguageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("classifier returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("classifier response had no message content")]
    EmptyResponse,
}
