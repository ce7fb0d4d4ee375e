//! Headline figures of the summary sheet, shown as cards above the charts.

use crate::model::sheet::RawSheet;
use crate::pipeline::decode::{ColumnRole, DecodeSpec, decode_sheet};
use crate::pipeline::parse::parse_number_simple;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub label: String,
    /// Unreadable cells show as zero on a card.
    pub value: f64,
    pub date: String,
    pub source: String,
}

fn summary_spec() -> DecodeSpec {
    DecodeSpec::new()
        .named(ColumnRole::Modality, ["indicador", "titulo", "rotulo"])
        .named(ColumnRole::Value, ["valor"])
        .named(ColumnRole::Date, ["data", "atualizacao"])
        .named(ColumnRole::Source, ["fonte"])
        .required(&[ColumnRole::Modality, ColumnRole::Value])
}

/// One card per labelled row of the summary sheet, in sheet order.
pub fn kpi_cards(sheet: &RawSheet) -> Vec<KpiCard> {
    decode_sheet(sheet, &summary_spec())
        .into_iter()
        .filter(|record| !record.get(ColumnRole::Modality).is_empty())
        .map(|record| KpiCard {
            label: record.get(ColumnRole::Modality).to_string(),
            value: parse_number_simple(record.get(ColumnRole::Value)),
            date: record.get(ColumnRole::Date).to_string(),
            source: record.get(ColumnRole::Source).to_string(),
        })
        .collect()
}
