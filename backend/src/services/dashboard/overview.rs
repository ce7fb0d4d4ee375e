use crate::error::ProxyError;
use crate::services::catalog::load_catalog;
use crate::services::sheets::meta_label::read_label;
use crate::services::{degrade, fresh, AppState};
use actix_web::{web, HttpResponse};
use common::catalog::IndicatorOption;
use common::pipeline::kpi::{kpi_cards, KpiCard};
use serde::Serialize;

/// Everything the landing view shows before an indicator is picked.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Overview {
    areas: Vec<String>,
    indicators: Vec<IndicatorOption>,
    kpis: Vec<KpiCard>,
    /// Curated label from the metadata cell.
    label: String,
    /// Modification time of the spreadsheet file.
    modified_time: Option<String>,
    errors: Vec<String>,
}

pub(crate) async fn process(state: web::Data<AppState>) -> Result<HttpResponse, ProxyError> {
    let (catalog, summary, label, modified) = futures_util::join!(
        load_catalog(&state),
        state.source.fetch_range(&state.config.summary_range),
        read_label(state.source.as_ref(), &state.config.meta_cell),
        state.source.fetch_last_modified(),
    );

    let (catalog, catalog_error) = degrade(catalog, "catalog")?;
    let (summary, summary_error) = degrade(summary, "summary sheet")?;
    let (label, label_error) = degrade(label, "metadata cell")?;
    let (modified_time, modified_error) = degrade(modified, "modification time")?;

    Ok(fresh().json(Overview {
        areas: catalog.areas(),
        indicators: catalog.indicators(None),
        kpis: kpi_cards(&summary),
        label,
        modified_time,
        errors: [catalog_error, summary_error, label_error, modified_error]
            .into_iter()
            .flatten()
            .collect(),
    }))
}
