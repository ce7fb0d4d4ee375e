//! A1 notation (`sheet!A1:E90`) as accepted by the proxy.

use common::model::sheet::RawSheet;
use regex::Regex;
use std::sync::OnceLock;

fn a1_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:'((?:[^']|'')+)'|([^'!:]+))(?:!([A-Za-z]{0,3})(\d*)(?::([A-Za-z]{0,3})(\d*))?)?$").ok()
    })
    .as_ref()
}

/// A parsed range. Bounds are zero-based and inclusive; `None` means unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A1Range {
    pub sheet: String,
    pub first_col: Option<usize>,
    pub first_row: Option<usize>,
    pub last_col: Option<usize>,
    pub last_row: Option<usize>,
}

fn column_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let n = letters
        .bytes()
        .fold(0usize, |acc, b| acc * 26 + usize::from(b.to_ascii_uppercase() - b'A' + 1));
    Some(n - 1)
}

fn row_index(digits: &str) -> Result<Option<usize>, ()> {
    if digits.is_empty() {
        return Ok(None);
    }
    match digits.parse::<usize>() {
        Ok(0) | Err(_) => Err(()),
        Ok(n) => Ok(Some(n - 1)),
    }
}

impl A1Range {
    /// Parses `Sheet`, `Sheet!A:E`, `'My sheet'!A2:E`, `_meta!B1`...
    ///
    /// Returns `None` for anything the proxy should reject with a 400.
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = a1_regex()?.captures(raw.trim())?;
        let sheet = match (caps.get(1), caps.get(2)) {
            (Some(quoted), _) => quoted.as_str().replace("''", "'"),
            (None, Some(bare)) => bare.as_str().trim().to_string(),
            _ => return None,
        };
        if sheet.is_empty() {
            return None;
        }

        let text = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or("");
        let has_bang = caps.get(3).is_some();
        if has_bang && text(3).is_empty() && text(4).is_empty() {
            return None;
        }

        let first_col = column_index(text(3));
        let first_row = row_index(text(4)).ok()?;
        let (last_col, last_row) = if caps.get(5).is_some() {
            (column_index(text(5)), row_index(text(6)).ok()?)
        } else {
            // A single reference such as `B1` or `C` selects only itself.
            (first_col, first_row)
        };

        Some(Self {
            sheet,
            first_col,
            first_row,
            last_col,
            last_row,
        })
    }

    /// Cuts `sheet` down to this range, dropping trailing blank cells like the upstream does.
    pub fn clip(&self, sheet: RawSheet) -> RawSheet {
        let first_row = self.first_row.unwrap_or(0);
        let first_col = self.first_col.unwrap_or(0);
        sheet
            .into_iter()
            .enumerate()
            .filter(|(i, _)| *i >= first_row && self.last_row.map_or(true, |last| *i <= last))
            .map(|(_, row)| {
                let mut cells: Vec<_> = row
                    .into_iter()
                    .enumerate()
                    .filter(|(j, _)| *j >= first_col && self.last_col.map_or(true, |last| *j <= last))
                    .map(|(_, cell)| cell)
                    .collect();
                while cells.last().is_some_and(|c| c.is_blank()) {
                    cells.pop();
                }
                cells
            })
            .collect()
    }
}
