use crate::model::catalog::CatalogEntry;
use serde::{Deserialize, Serialize};

/// Everything that can move the filter cascade.
///
/// The `Select*` events come from the user; the `Territories*` events report
/// the outcome of a fetch the reducer asked for and carry its request id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FilterEvent {
    SelectArea(Option<String>),
    SelectIndicator(Option<String>),
    SelectSource(Option<String>),
    SelectTerritory(Option<String>),
    TerritoriesLoaded { request: u64, territories: Vec<String> },
    TerritoriesFailed { request: u64, message: String },
}

/// Side effect requested by the reducer: fetch this sheet and report its territories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerritoryRequest {
    pub request: u64,
    pub entry: CatalogEntry,
}
