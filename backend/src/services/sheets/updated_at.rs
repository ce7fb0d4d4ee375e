use crate::error::ProxyError;
use crate::services::{fresh, AppState};
use actix_web::{web, HttpResponse};
use serde_json::json;

pub(crate) async fn process(state: web::Data<AppState>) -> Result<HttpResponse, ProxyError> {
    let modified = state.source.fetch_last_modified().await?;
    Ok(fresh().json(json!({ "modifiedTime": modified })))
}
