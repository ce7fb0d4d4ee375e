//! Header-driven decoding of a raw sheet into per-row records.
//!
//! Columns are located by header label, never by position, so sheets can be
//! reordered or gain extra columns without breaking the dashboard. A sheet that
//! lacks a required column decodes to nothing at all.

use crate::model::sheet::{RawCell, RawSheet};
use crate::pipeline::parse::{clean_text, normalize_key};
use log::debug;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Territory,
    Date,
    Modality,
    Value,
    Source,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 5] = [
        ColumnRole::Territory,
        ColumnRole::Date,
        ColumnRole::Modality,
        ColumnRole::Value,
        ColumnRole::Source,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

/// How one role finds its column.
#[derive(Debug, Clone, PartialEq)]
pub enum RoleMatch {
    /// Accepted header spellings, tried in order.
    Named(Vec<String>),
    /// The left-most column no other role has claimed.
    FirstUnclaimed,
}

/// Which roles to look for and which of them must be present.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodeSpec {
    roles: Vec<(ColumnRole, RoleMatch)>,
    required: Vec<ColumnRole>,
}

impl DecodeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named<I, S>(mut self, role: ColumnRole, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let candidates = candidates.into_iter().map(Into::into).collect();
        self.set(role, RoleMatch::Named(candidates));
        self
    }

    pub fn first_unclaimed(mut self, role: ColumnRole) -> Self {
        self.set(role, RoleMatch::FirstUnclaimed);
        self
    }

    pub fn required(mut self, roles: &[ColumnRole]) -> Self {
        for role in roles {
            if !self.required.contains(role) {
                self.required.push(*role);
            }
        }
        self
    }

    fn set(&mut self, role: ColumnRole, matcher: RoleMatch) {
        self.roles.retain(|(r, _)| *r != role);
        self.roles.push((role, matcher));
    }

    /// The schema of indicator data sheets: `territorio, data, modalidade, valor, fonte`.
    ///
    /// `territory_header` comes from the catalog's `territorio_col` and replaces
    /// the default label when non-blank.
    pub fn indicator(territory_header: Option<&str>) -> Self {
        Self::new()
            .named(ColumnRole::Territory, territory_candidates(territory_header))
            .named(ColumnRole::Date, ["data"])
            .named(
                ColumnRole::Modality,
                ["modalidade", "categoria", "faixa_etaria", "faixa etaria", "idade"],
            )
            .named(ColumnRole::Value, ["valor"])
            .named(ColumnRole::Source, ["fonte"])
            .required(&[ColumnRole::Territory, ColumnRole::Date, ColumnRole::Value])
    }
}

/// Accepted territory headers: the catalog's override when given, the defaults otherwise.
pub fn territory_candidates(territory_header: Option<&str>) -> Vec<String> {
    match territory_header.map(str::trim) {
        Some(header) if !header.is_empty() => vec![header.to_string()],
        _ => vec!["territorio".into(), "municipio".into()],
    }
}

/// Resolved header positions, one optional index per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnMap {
    indices: [Option<usize>; 5],
}

impl ColumnMap {
    pub fn get(&self, role: ColumnRole) -> Option<usize> {
        self.indices[role.slot()]
    }

    fn claimed(&self, column: usize) -> bool {
        self.indices.contains(&Some(column))
    }
}

/// Locates every role of `spec` in the header row.
///
/// Named roles are resolved first, in the order they were configured, and each
/// takes the first column whose trimmed, case-folded label equals one of its
/// candidates. `FirstUnclaimed` roles are resolved afterwards.
pub fn resolve_columns(header: &[RawCell], spec: &DecodeSpec) -> ColumnMap {
    let labels: Vec<String> = header.iter().map(|c| normalize_key(&c.as_text())).collect();
    let mut map = ColumnMap::default();

    for (role, matcher) in &spec.roles {
        let RoleMatch::Named(candidates) = matcher else {
            continue;
        };
        let found = candidates.iter().find_map(|candidate| {
            let wanted = normalize_key(candidate);
            labels
                .iter()
                .enumerate()
                .find(|(i, label)| **label == wanted && !map.claimed(*i))
                .map(|(i, _)| i)
        });
        map.indices[role.slot()] = found;
    }

    for (role, matcher) in &spec.roles {
        if *matcher == RoleMatch::FirstUnclaimed {
            let found = (0..labels.len()).find(|i| !map.claimed(*i));
            map.indices[role.slot()] = found;
        }
    }

    map
}

/// One body row with its cells picked out by role. Missing cells read as "".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedRecord {
    cells: [String; 5],
    /// Cells that arrived as typed numbers; these skip text parsing.
    numbers: [Option<f64>; 5],
}

impl DecodedRecord {
    pub fn get(&self, role: ColumnRole) -> &str {
        &self.cells[role.slot()]
    }

    /// The cell's value when the upstream sent it as a number rather than text.
    pub fn number(&self, role: ColumnRole) -> Option<f64> {
        self.numbers[role.slot()]
    }
}

/// Decodes the body rows of `sheet` according to `spec`.
///
/// Fewer than two rows, or any required role missing from the header, gives an
/// empty vector.
pub fn decode_sheet(sheet: &RawSheet, spec: &DecodeSpec) -> Vec<DecodedRecord> {
    let Some((header, body)) = sheet.split_first() else {
        debug!("decode: empty sheet");
        return Vec::new();
    };
    if body.is_empty() {
        debug!("decode: sheet has a header but no body rows");
        return Vec::new();
    }

    let map = resolve_columns(header, spec);
    if let Some(missing) = spec.required.iter().find(|role| map.get(**role).is_none()) {
        debug!("decode: required column {:?} not found in header", missing);
        return Vec::new();
    }

    body.iter()
        .map(|row| {
            let mut record = DecodedRecord::default();
            for role in ColumnRole::ALL {
                if let Some(cell) = map.get(role).and_then(|i| row.get(i)) {
                    record.cells[role.slot()] = clean_text(&cell.as_text());
                    if let RawCell::Number(n) = cell {
                        record.numbers[role.slot()] = Some(*n).filter(|n| n.is_finite());
                    }
                }
            }
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sheet::sheet_from_strings;

    fn indicator_sheet(header: [&str; 4]) -> RawSheet {
        sheet_from_strings(vec![header.to_vec(), vec!["RJ", "2024-01-01", "Abrigo", "3"]])
    }

    #[test]
    fn header_match_ignores_case_and_padding() {
        for territory in [" Territorio ", "TERRITORIO", "territorio"] {
            let sheet = indicator_sheet([territory, "data", "modalidade", "valor"]);
            let rows = decode_sheet(&sheet, &DecodeSpec::indicator(None));
            assert_eq!(rows.len(), 1, "header {:?}", territory);
            assert_eq!(rows[0].get(ColumnRole::Territory), "RJ");
        }
    }

    #[test]
    fn column_order_does_not_matter() {
        let sheet = sheet_from_strings(vec![
            vec!["valor", "modalidade", "data", "territorio"],
            vec!["7", "Abrigo", "2024-02-01", "Niterói"],
        ]);
        let rows = decode_sheet(&sheet, &DecodeSpec::indicator(None));
        assert_eq!(rows[0].get(ColumnRole::Value), "7");
        assert_eq!(rows[0].get(ColumnRole::Territory), "Niterói");
        assert_eq!(rows[0].get(ColumnRole::Source), "");
    }

    #[test]
    fn alternative_spellings_are_accepted() {
        let sheet = indicator_sheet(["territorio", "data", "Faixa Etaria", "valor"]);
        let rows = decode_sheet(&sheet, &DecodeSpec::indicator(None));
        assert_eq!(rows[0].get(ColumnRole::Modality), "Abrigo");
    }

    #[test]
    fn missing_required_column_yields_nothing() {
        let sheet = indicator_sheet(["territorio", "data", "modalidade", "quantidade"]);
        assert!(decode_sheet(&sheet, &DecodeSpec::indicator(None)).is_empty());
    }

    #[test]
    fn header_only_sheet_yields_nothing() {
        let sheet = sheet_from_strings(vec![vec!["territorio", "data", "valor"]]);
        assert!(decode_sheet(&sheet, &DecodeSpec::indicator(None)).is_empty());
        assert!(decode_sheet(&Vec::new(), &DecodeSpec::indicator(None)).is_empty());
    }

    #[test]
    fn short_rows_read_as_blank() {
        let sheet = sheet_from_strings(vec![
            vec!["territorio", "data", "modalidade", "valor"],
            vec!["RJ", ""],
        ]);
        let rows = decode_sheet(&sheet, &DecodeSpec::indicator(None));
        assert_eq!(rows[0].get(ColumnRole::Value), "");
        assert_eq!(rows[0].get(ColumnRole::Modality), "");
    }

    #[test]
    fn typed_numbers_are_kept_alongside_their_text() {
        let sheet = vec![
            sheet_from_strings(vec![vec!["territorio", "data", "valor"]]).remove(0),
            vec![RawCell::from("RJ"), RawCell::from("2024-01-01"), RawCell::Number(1.234)],
        ];
        let rows = decode_sheet(&sheet, &DecodeSpec::indicator(None));
        assert_eq!(rows[0].number(ColumnRole::Value), Some(1.234));
        assert_eq!(rows[0].number(ColumnRole::Territory), None);
    }

    #[test]
    fn catalog_territory_header_overrides_default() {
        let sheet = indicator_sheet(["regiao", "data", "modalidade", "valor"]);
        assert!(decode_sheet(&sheet, &DecodeSpec::indicator(None)).is_empty());
        let rows = decode_sheet(&sheet, &DecodeSpec::indicator(Some("Regiao")));
        assert_eq!(rows[0].get(ColumnRole::Territory), "RJ");
    }

    #[test]
    fn unclaimed_fallback_skips_claimed_columns() {
        let spec = DecodeSpec::new()
            .named(ColumnRole::Territory, ["territorio"])
            .named(ColumnRole::Date, ["data"])
            .named(ColumnRole::Value, ["valor"])
            .first_unclaimed(ColumnRole::Modality)
            .required(&[ColumnRole::Territory, ColumnRole::Value]);
        let header = sheet_from_strings(vec![vec!["territorio", "data", "sexo", "valor"]]);
        let map = resolve_columns(&header[0], &spec);
        assert_eq!(map.get(ColumnRole::Modality), Some(2));
        assert_eq!(map.get(ColumnRole::Source), None);
    }
}
