use super::a1::A1Range;
use super::{SheetSource, SourceError};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use common::model::sheet::{RawCell, RawSheet};
use log::debug;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

/// Offline stand-in for the spreadsheet: one `<sheet>.csv` per tab.
///
/// Cells are read as text exactly like the upstream's formatted values, so the
/// pipeline sees the same strings either way.
pub struct CsvDirSource {
    dir: PathBuf,
}

impl CsvDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<dir>/<sheet>.csv`, or `None` when `sheet` would leave `dir`.
    fn sheet_path(&self, sheet: &str) -> Option<PathBuf> {
        if sheet.contains(['/', '\\']) || sheet.contains("..") {
            return None;
        }
        let file = format!("{}.csv", sheet);
        let mut components = Path::new(&file).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Some(self.dir.join(file)),
            _ => None,
        }
    }

    fn read_sheet(path: &Path) -> Result<RawSheet, SourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;
        let mut sheet = RawSheet::new();
        for record in reader.records() {
            let record = record?;
            sheet.push(
                record
                    .iter()
                    .map(|cell| {
                        if cell.is_empty() {
                            RawCell::Empty
                        } else {
                            RawCell::from(cell)
                        }
                    })
                    .collect(),
            );
        }
        Ok(sheet)
    }
}

#[async_trait]
impl SheetSource for CsvDirSource {
    async fn fetch_range(&self, range: &str) -> Result<RawSheet, SourceError> {
        let range = A1Range::parse(range).ok_or_else(|| SourceError::InvalidRange(range.to_string()))?;
        let path = self
            .sheet_path(&range.sheet)
            .ok_or_else(|| SourceError::InvalidRange(range.sheet.clone()))?;
        if !path.is_file() {
            return Err(SourceError::SheetNotFound(range.sheet));
        }
        debug!("reading {}", path.display());
        Ok(range.clip(Self::read_sheet(&path)?))
    }

    async fn fetch_last_modified(&self) -> Result<Option<String>, SourceError> {
        let mut latest: Option<SystemTime> = None;
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            let modified = entry.metadata()?.modified()?;
            if latest.is_none_or(|current| modified > current) {
                latest = Some(modified);
            }
        }
        Ok(latest.map(|time| DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Secs, true)))
    }
}
