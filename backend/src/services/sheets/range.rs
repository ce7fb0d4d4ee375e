use crate::error::ProxyError;
use crate::services::{fresh, AppState};
use crate::source::a1::A1Range;
use actix_web::{web, HttpResponse};
use common::model::sheet::SheetValues;
use common::requests::SheetQuery;

pub(crate) async fn process(
    query: web::Query<SheetQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ProxyError> {
    let range = query.into_inner().range.unwrap_or_default();
    if A1Range::parse(&range).is_none() {
        return Err(ProxyError::InvalidRange(range));
    }
    let values = state.source.fetch_range(range.trim()).await?;
    Ok(fresh().json(SheetValues { values }))
}
