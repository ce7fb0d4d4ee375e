//! The catalog sheet and the queries the filter cascade runs against it.
//!
//! The catalog is the only table whose headers are matched case-sensitively:
//! it is maintained by the dashboard team and its labels are fixed.

use crate::model::catalog::{CatalogEntry, ChartProfile};
use crate::model::sheet::{RawCell, RawSheet};
use crate::pipeline::decode::{ColumnRole, DecodeSpec, decode_sheet, territory_candidates};
use crate::pipeline::parse::{clean_text, normalize_key};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

const CATALOG_COLUMNS: [&str; 11] = [
    "area",
    "indicador_id",
    "indicador_nome",
    "fonte",
    "fonte_url",
    "sheet",
    "range",
    "tipo",
    "titulo",
    "unidade",
    "territorio_col",
];

/// An indicator as offered in the indicator dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorOption {
    pub id: String,
    pub name: String,
}

/// Read-only reference data, loaded once per session.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Parses the catalog sheet.
    ///
    /// A header without `indicador_id` or `sheet` gives an empty catalog, and
    /// rows missing either value are skipped. Optional columns may be absent.
    pub fn from_sheet(sheet: &RawSheet) -> Self {
        let Some((header, body)) = sheet.split_first() else {
            return Self::default();
        };

        let mut index: BTreeMap<&str, usize> = BTreeMap::new();
        for (i, cell) in header.iter().enumerate() {
            let label = cell.as_text();
            if let Some(known) = CATALOG_COLUMNS.iter().find(|c| **c == label.trim()) {
                index.entry(*known).or_insert(i);
            }
        }
        if !index.contains_key("indicador_id") || !index.contains_key("sheet") {
            debug!("catalog: header lacks indicador_id or sheet, ignoring sheet");
            return Self::default();
        }

        let cell = |row: &[RawCell], column: &str| -> String {
            index
                .get(column)
                .and_then(|i| row.get(*i))
                .map(|c| clean_text(&c.as_text()))
                .unwrap_or_default()
        };

        let entries = body
            .iter()
            .enumerate()
            .filter_map(|(i, row)| {
                let indicator_id = cell(row, "indicador_id");
                let sheet_name = cell(row, "sheet");
                if indicator_id.is_empty() || sheet_name.is_empty() {
                    debug!("catalog: skipping row {} without indicator or sheet", i + 2);
                    return None;
                }
                let indicator_name = cell(row, "indicador_nome");
                let display_title = cell(row, "titulo");
                Some(CatalogEntry {
                    area: cell(row, "area"),
                    indicator_name: if indicator_name.is_empty() {
                        indicator_id.clone()
                    } else {
                        indicator_name.clone()
                    },
                    indicator_id,
                    source: cell(row, "fonte"),
                    source_url: cell(row, "fonte_url"),
                    sheet_name,
                    range_spec: cell(row, "range"),
                    display_title: if display_title.is_empty() {
                        indicator_name
                    } else {
                        display_title
                    },
                    unit: cell(row, "unidade"),
                    chart_profile: ChartProfile::from_label(&cell(row, "tipo")),
                    territory_column: cell(row, "territorio_col"),
                })
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct non-blank areas in catalog order.
    pub fn areas(&self) -> Vec<String> {
        let mut areas: Vec<String> = Vec::new();
        for entry in &self.entries {
            if !entry.area.is_empty() && !areas.contains(&entry.area) {
                areas.push(entry.area.clone());
            }
        }
        areas
    }

    /// Indicators of `area` (all of them for `None`), in catalog order.
    pub fn indicators(&self, area: Option<&str>) -> Vec<IndicatorOption> {
        let area = area.map(normalize_key).filter(|a| !a.is_empty());
        let mut options: Vec<IndicatorOption> = Vec::new();
        for entry in &self.entries {
            if area.as_ref().is_some_and(|a| *a != normalize_key(&entry.area)) {
                continue;
            }
            if options.iter().all(|o| o.id != entry.indicator_id) {
                options.push(IndicatorOption {
                    id: entry.indicator_id.clone(),
                    name: entry.indicator_name.clone(),
                });
            }
        }
        options
    }

    /// Distinct non-blank sources published for `indicator_id`.
    pub fn sources(&self, indicator_id: &str) -> Vec<String> {
        let mut sources: Vec<String> = Vec::new();
        for entry in self.entries.iter().filter(|e| e.indicator_id == indicator_id) {
            if !entry.source.is_empty() && !sources.contains(&entry.source) {
                sources.push(entry.source.clone());
            }
        }
        sources
    }

    /// Where `indicator_id` lives for `source`.
    ///
    /// Without a source the first entry of the indicator is used. A source that
    /// the indicator does not publish resolves to nothing.
    pub fn resolve(&self, indicator_id: &str, source: Option<&str>) -> Option<&CatalogEntry> {
        let mut candidates = self.entries.iter().filter(|e| e.indicator_id == indicator_id);
        match source.map(normalize_key).filter(|s| !s.is_empty()) {
            Some(wanted) => candidates.find(|e| normalize_key(&e.source) == wanted),
            None => candidates.next(),
        }
    }
}

/// Territory options of a fetched indicator sheet.
///
/// Distinct non-blank values of the territory column, de-duplicated by
/// [`normalize_key`] keeping the first spelling seen, sorted by that key. A
/// sheet without the column yields no options.
pub fn territory_options(sheet: &RawSheet, territory_header: Option<&str>) -> Vec<String> {
    let spec = DecodeSpec::new()
        .named(ColumnRole::Territory, territory_candidates(territory_header))
        .required(&[ColumnRole::Territory]);

    let mut by_key: BTreeMap<String, String> = BTreeMap::new();
    for record in decode_sheet(sheet, &spec) {
        let territory = record.get(ColumnRole::Territory);
        if !territory.is_empty() {
            by_key
                .entry(normalize_key(territory))
                .or_insert_with(|| territory.to_string());
        }
    }
    by_key.into_values().collect()
}
