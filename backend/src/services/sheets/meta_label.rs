use crate::error::ProxyError;
use crate::services::{fresh, AppState};
use crate::source::{SheetSource, SourceError};
use actix_web::{web, HttpResponse};
use serde_json::json;

/// The metadata cell as text, verbatim apart from the usual trimming.
pub(crate) async fn read_label(source: &dyn SheetSource, cell: &str) -> Result<String, SourceError> {
    let sheet = source.fetch_range(cell).await?;
    Ok(sheet
        .first()
        .and_then(|row| row.first())
        .map(|c| c.as_text().trim().to_string())
        .unwrap_or_default())
}

pub(crate) async fn process(state: web::Data<AppState>) -> Result<HttpResponse, ProxyError> {
    let label = read_label(state.source.as_ref(), &state.config.meta_cell).await?;
    Ok(fresh().json(json!({ "label": label })))
}
