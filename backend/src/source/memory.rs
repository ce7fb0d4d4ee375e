use super::a1::A1Range;
use super::{SheetSource, SourceError};
use async_trait::async_trait;
use common::model::sheet::{sheet_from_strings, RawSheet};
use std::collections::HashMap;

/// In-memory sheets for handler and session tests.
#[derive(Default)]
pub struct MemorySource {
    sheets: HashMap<String, RawSheet>,
    modified: Option<String>,
    down: bool,
}

fn outage() -> SourceError {
    SourceError::Status {
        status: 503,
        body: "unavailable".to_string(),
    }
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, name: &str, rows: Vec<Vec<&str>>) -> Self {
        self.sheets.insert(name.to_string(), sheet_from_strings(rows));
        self
    }

    pub fn modified_at(mut self, stamp: &str) -> Self {
        self.modified = Some(stamp.to_string());
        self
    }

    /// Every request fails as if the upstream were unreachable.
    pub fn unavailable() -> Self {
        Self {
            down: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl SheetSource for MemorySource {
    async fn fetch_range(&self, range: &str) -> Result<RawSheet, SourceError> {
        if self.down {
            return Err(outage());
        }
        let range = A1Range::parse(range).ok_or_else(|| SourceError::InvalidRange(range.to_string()))?;
        let sheet = self
            .sheets
            .get(&range.sheet)
            .ok_or_else(|| SourceError::SheetNotFound(range.sheet.clone()))?;
        Ok(range.clip(sheet.clone()))
    }

    async fn fetch_last_modified(&self) -> Result<Option<String>, SourceError> {
        if self.down {
            return Err(outage());
        }
        Ok(self.modified.clone())
    }
}
