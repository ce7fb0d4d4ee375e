use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A single untyped cell as returned by the spreadsheet service.
///
/// The upstream JSON mixes strings, numbers and `null` freely inside one
/// `values` array, so the enum is untagged and deserializes whatever shape
/// arrives. `Empty` stands for both `null` and a cell missing at the end of a
/// short row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum RawCell {
    Number(f64),
    Bool(bool),
    Text(String),
    #[default]
    Empty,
}

impl RawCell {
    /// Textual form of the cell, used by every parser downstream.
    ///
    /// Integral numbers are rendered without a fractional part so that a date
    /// serial or a count round-trips as `"12"` rather than `"12.0"`.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            RawCell::Text(s) => Cow::Borrowed(s.as_str()),
            RawCell::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                Cow::Owned(format!("{}", *n as i64))
            }
            RawCell::Number(n) => Cow::Owned(n.to_string()),
            RawCell::Bool(b) => Cow::Owned(b.to_string()),
            RawCell::Empty => Cow::Borrowed(""),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.as_text().trim().is_empty()
    }
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        RawCell::Text(value.to_string())
    }
}

impl From<String> for RawCell {
    fn from(value: String) -> Self {
        RawCell::Text(value)
    }
}

impl From<f64> for RawCell {
    fn from(value: f64) -> Self {
        RawCell::Number(value)
    }
}

/// Header row followed by body rows, exactly as fetched. Rows may be ragged.
pub type RawSheet = Vec<Vec<RawCell>>;

/// Payload shape of the sheets proxy: `{ "values": [[...], ...] }`.
///
/// The upstream omits `values` entirely for an empty range, hence the default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SheetValues {
    #[serde(default)]
    pub values: RawSheet,
}

/// Builds a `RawSheet` out of string literals. Mostly handy in tests and for
/// sources that only ever produce text (CSV).
pub fn sheet_from_strings<R, C>(rows: R) -> RawSheet
where
    R: IntoIterator<Item = C>,
    C: IntoIterator,
    C::Item: AsRef<str>,
{
    rows.into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| {
                    let cell = cell.as_ref();
                    if cell.is_empty() {
                        RawCell::Empty
                    } else {
                        RawCell::Text(cell.to_string())
                    }
                })
                .collect()
        })
        .collect()
}
