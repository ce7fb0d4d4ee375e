use crate::error::ProxyError;
use crate::services::catalog::load_catalog;
use crate::services::{degrade, fresh, AppState};
use actix_web::{web, HttpResponse};
use common::catalog::Catalog;
use common::model::catalog::CatalogEntry;
use common::model::series::{AggregatedSeries, Share};
use common::pipeline::aggregate::{aggregate, filter_rows};
use common::pipeline::decode::DecodeSpec;
use common::pipeline::fill::normalize_sheet;
use common::pipeline::percent::{percentages, Denominator};
use common::requests::SeriesQuery;
use serde::Serialize;

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SeriesPayload {
    /// The catalog entry the series was read from, absent when none could be resolved.
    pub entry: Option<CatalogEntry>,
    pub territory: String,
    pub series: AggregatedSeries,
    pub percentages: Vec<Share>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SeriesPayload {
    pub fn empty(territory: String, error: Option<String>) -> Self {
        Self {
            territory,
            error,
            ..Self::default()
        }
    }
}

/// Fetches, normalizes, filters and aggregates the sheet behind `query`.
pub(crate) async fn build_series(
    state: &AppState,
    catalog: &Catalog,
    query: &SeriesQuery,
) -> Result<SeriesPayload, ProxyError> {
    let territory = query
        .territory
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(&state.config.default_territory)
        .to_string();

    let source = query.source.as_deref().filter(|s| !s.trim().is_empty());
    let Some(entry) = catalog.resolve(&query.indicator, source).cloned() else {
        if catalog.is_empty() {
            return Ok(SeriesPayload::empty(territory, Some("catalog is empty".to_string())));
        }
        return Err(ProxyError::UnknownIndicator(query.indicator.clone()));
    };

    let (sheet, error) = degrade(
        state.source.fetch_range(&entry.a1_range()).await,
        &entry.sheet_name,
    )?;
    let rows = normalize_sheet(&sheet, &DecodeSpec::indicator(Some(&entry.territory_column)));
    let rows = filter_rows(&rows, Some(&territory), Some(entry.source.as_str()));
    let series = aggregate(&rows);

    let denominator = query.fixed_total.map_or(Denominator::Dynamic, Denominator::Fixed);
    let percentages = percentages(&series.by_category_at_date, denominator);

    Ok(SeriesPayload {
        entry: Some(entry),
        territory,
        series,
        percentages,
        error,
    })
}

pub(crate) async fn process(
    query: web::Query<SeriesQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ProxyError> {
    let (catalog, error) = degrade(load_catalog(&state).await, "catalog")?;
    let payload = match error {
        Some(message) => SeriesPayload::empty(state.config.default_territory.clone(), Some(message)),
        None => build_series(&state, &catalog, &query).await?,
    };
    Ok(fresh().json(payload))
}
