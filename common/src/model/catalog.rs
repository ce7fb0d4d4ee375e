use serde::{Deserialize, Serialize};

/// How the renderer should draw an indicator.
///
/// Read from the catalog's `tipo` column. Anything unrecognised falls back to
/// the standard profile so an unknown label never hides an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChartProfile {
    /// Bars for the snapshot, a line for the total and stacked bars for the composition.
    #[default]
    Standard,
    /// Share of the latest snapshot as a pie.
    Pie,
}

impl ChartProfile {
    pub fn from_label(label: &str) -> Self {
        match crate::pipeline::parse::normalize_key(label).as_str() {
            "pizza" | "pie" => ChartProfile::Pie,
            _ => ChartProfile::Standard,
        }
    }
}

/// One row of the catalog sheet: where an (indicator, source) pair lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub area: String,
    pub indicator_id: String,
    pub indicator_name: String,
    pub source: String,
    pub source_url: String,
    pub sheet_name: String,
    pub range_spec: String,
    pub display_title: String,
    pub unit: String,
    pub chart_profile: ChartProfile,
    /// Header of the territory column in the target sheet, empty for the default.
    pub territory_column: String,
}

impl CatalogEntry {
    /// A1 notation for the data fetch, e.g. `'Acolhimento RJ'!A:E`.
    ///
    /// Sheet names containing anything but letters, digits and underscores are
    /// quoted, with embedded quotes doubled.
    pub fn a1_range(&self) -> String {
        let sheet = if self
            .sheet_name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_')
        {
            self.sheet_name.clone()
        } else {
            format!("'{}'", self.sheet_name.replace('\'', "''"))
        };
        if self.range_spec.trim().is_empty() {
            sheet
        } else {
            format!("{}!{}", sheet, self.range_spec.trim())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(sheet: &str, range: &str) -> CatalogEntry {
        CatalogEntry {
            area: String::new(),
            indicator_id: "x".into(),
            indicator_name: String::new(),
            source: String::new(),
            source_url: String::new(),
            sheet_name: sheet.into(),
            range_spec: range.into(),
            display_title: String::new(),
            unit: String::new(),
            chart_profile: ChartProfile::Standard,
            territory_column: String::new(),
        }
    }

    #[test]
    fn plain_sheet_names_are_not_quoted() {
        assert_eq!(entry("dados_rj", "A:E").a1_range(), "dados_rj!A:E");
    }

    #[test]
    fn sheet_names_with_spaces_are_quoted() {
        assert_eq!(entry("Dados RJ", "A1:E90").a1_range(), "'Dados RJ'!A1:E90");
        assert_eq!(entry("Rio's", "").a1_range(), "'Rio''s'");
    }

    #[test]
    fn profile_labels_ignore_case_and_accents() {
        assert_eq!(ChartProfile::from_label(" Pizza "), ChartProfile::Pie);
        assert_eq!(ChartProfile::from_label("padrão"), ChartProfile::Standard);
        assert_eq!(ChartProfile::from_label(""), ChartProfile::Standard);
    }
}
