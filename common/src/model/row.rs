use serde::Serialize;

/// One typed observation of an indicator sheet.
///
/// Rows only come out of [`crate::pipeline::fill::normalize_sheet`], which is
/// why the fields are crate-private: a row always went through decoding and
/// date forward-fill before anything else sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRow {
    pub(crate) territory: String,
    pub(crate) date: String,
    pub(crate) modality: String,
    pub(crate) value: Option<f64>,
    pub(crate) source: String,
}

impl NormalizedRow {
    pub fn territory(&self) -> &str {
        &self.territory
    }

    /// ISO `yyyy-mm-dd` when the cell could be read as a date, the raw token
    /// otherwise. Blank only if no earlier row had a date to carry forward.
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn modality(&self) -> &str {
        &self.modality
    }

    /// `None` means the cell was blank or unreadable, which is not the same as zero.
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Empty when the sheet has no source column.
    pub fn source(&self) -> &str {
        &self.source
    }
}
