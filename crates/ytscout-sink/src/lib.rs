//! Result sinks: Google Sheets rows and a JSON file snapshot.

pub mod error;
pub mod json_file;
pub mod sheets;

pub use error::SinkError;
pub use json_file::write_json_snapshot;
pub use sheets::{SheetsSink, HEADERS};
