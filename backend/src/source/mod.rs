//! The spreadsheet backend as seen by the rest of the server.
//!
//! Handlers and session tasks only ever talk to a [`SheetSource`]; which
//! implementation sits behind it is decided once in `main.rs` from the config.

pub mod a1;
mod csv_dir;
mod google;
#[cfg(test)]
pub mod memory;

pub use csv_dir::CsvDirSource;
pub use google::GoogleSheetsSource;

use async_trait::async_trait;
use common::model::sheet::RawSheet;

/// Errors raised while talking to the spreadsheet backend.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// A setting the upstream needs is missing from the environment.
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),

    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream answered with a non-success status.
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Read access to one spreadsheet.
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Values of `range` in A1 notation. An empty range is an empty sheet, not an error.
    async fn fetch_range(&self, range: &str) -> Result<RawSheet, SourceError>;

    /// Modification time of the spreadsheet file as an RFC 3339 string, if known.
    async fn fetch_last_modified(&self) -> Result<Option<String>, SourceError>;
}
