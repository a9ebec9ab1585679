//! Title language validation through an LLM classifier.

pub mod error;
pub mod validator;

pub use error::LanguageError;
pub use validator::{LanguageValidator, DEFAULT_BASE_URL, DEFAULT_MODEL};
