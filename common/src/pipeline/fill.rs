//! Merged-cell date reconstruction.
//!
//! Spreadsheets render a merged date cell once and leave the rows below it
//! blank in the exported values. Carrying the last seen date down, in sheet
//! order and before any grouping, puts those rows back under their date.

use crate::model::row::NormalizedRow;
use crate::model::sheet::RawSheet;
use crate::pipeline::decode::{ColumnRole, DecodeSpec, DecodedRecord, decode_sheet};
use crate::pipeline::parse::parse_number_locale;
use chrono::{NaiveDate, NaiveDateTime};

/// Canonical form of a date cell.
///
/// `yyyy-mm-dd` passes through, `dd/mm/yyyy` and ISO timestamps are reduced
/// to `yyyy-mm-dd`, anything else is kept verbatim so it still sorts and
/// groups consistently with itself.
pub fn normalize_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%d/%m/%Y") {
        return date.format("%Y-%m-%d").to_string();
    }
    if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return stamp.date().format("%Y-%m-%d").to_string();
    }
    if let Some((day, _)) = raw.split_once('T') {
        if let Ok(date) = NaiveDate::parse_from_str(day, "%Y-%m-%d") {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    raw.to_string()
}

/// Replaces every blank date with the closest non-blank date above it.
///
/// Rows before the first dated row keep an empty date.
pub fn forward_fill_dates<I>(records: I) -> Vec<NormalizedRow>
where
    I: IntoIterator<Item = DecodedRecord>,
{
    records
        .into_iter()
        .scan(String::new(), |last_seen, record| {
            let raw_date = record.get(ColumnRole::Date);
            if !raw_date.is_empty() {
                *last_seen = normalize_date(raw_date);
            }
            Some(NormalizedRow {
                territory: record.get(ColumnRole::Territory).to_string(),
                date: last_seen.clone(),
                modality: record.get(ColumnRole::Modality).to_string(),
                value: record
                    .number(ColumnRole::Value)
                    .or_else(|| parse_number_locale(record.get(ColumnRole::Value))),
                source: record.get(ColumnRole::Source).to_string(),
            })
        })
        .collect()
}

/// Decode + forward-fill: the one way to obtain [`NormalizedRow`]s.
pub fn normalize_sheet(sheet: &RawSheet, spec: &DecodeSpec) -> Vec<NormalizedRow> {
    forward_fill_dates(decode_sheet(sheet, spec))
}
