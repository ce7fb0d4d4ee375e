use super::series::{build_series, SeriesPayload};
use crate::error::ProxyError;
use crate::services::catalog::load_catalog;
use crate::services::{degrade, fresh, AppState};
use crate::session::state::{Session, SessionsState};
use actix_web::{web, HttpResponse};
use common::filter::{FilterEvent, FilterPhase, FilterState};
use common::requests::{SeriesQuery, SessionSeriesQuery};
use log::info;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionView {
    session_id: String,
    phase: FilterPhase,
    filter: FilterState,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl SessionView {
    fn new(session_id: String, filter: FilterState, error: Option<String>) -> Self {
        Self {
            session_id,
            phase: filter.phase(),
            filter,
            error,
        }
    }
}

/// Loads the catalog, opens a session on it and runs the initial cascade.
pub(crate) async fn create(
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
) -> Result<HttpResponse, ProxyError> {
    let (catalog, error) = degrade(load_catalog(&state).await, "catalog")?;
    let session_id = sessions
        .insert(Session::new(
            catalog,
            FilterState::with_default_territory(&state.config.default_territory),
        ))
        .await;
    info!("session {} opened", session_id);

    let filter = sessions
        .apply(&session_id, FilterEvent::SelectArea(None), &state.source)
        .await
        .ok_or_else(|| ProxyError::SessionNotFound(session_id.clone()))?;
    Ok(fresh().json(SessionView::new(session_id, filter, error)))
}

/// Current filter state; reading it counts as activity for the idle timeout.
pub(crate) async fn get_state(
    session_id: web::Path<String>,
    sessions: web::Data<SessionsState>,
) -> Result<HttpResponse, ProxyError> {
    let session_id = session_id.into_inner();
    match sessions.filter(&session_id).await {
        Some(filter) => Ok(fresh().json(SessionView::new(session_id, filter, None))),
        None => Err(ProxyError::SessionNotFound(session_id)),
    }
}

/// Drops a session before its idle timeout does.
pub(crate) async fn close(
    session_id: web::Path<String>,
    sessions: web::Data<SessionsState>,
) -> Result<HttpResponse, ProxyError> {
    let session_id = session_id.into_inner();
    if !sessions.remove(&session_id).await {
        return Err(ProxyError::SessionNotFound(session_id));
    }
    info!("session {} closed", session_id);
    Ok(HttpResponse::NoContent().finish())
}

/// Accepts user selections only; territory results are produced server-side.
pub(crate) async fn post_event(
    session_id: web::Path<String>,
    event: web::Json<FilterEvent>,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
) -> Result<HttpResponse, ProxyError> {
    let session_id = session_id.into_inner();
    let event = event.into_inner();
    if matches!(
        event,
        FilterEvent::TerritoriesLoaded { .. } | FilterEvent::TerritoriesFailed { .. }
    ) {
        return Err(ProxyError::UnsupportedEvent("territory results come from the server"));
    }

    let filter = sessions
        .apply(&session_id, event, &state.source)
        .await
        .ok_or_else(|| ProxyError::SessionNotFound(session_id.clone()))?;
    Ok(fresh().json(SessionView::new(session_id, filter, None)))
}

/// Series for whatever the session has selected; empty until an indicator is picked.
pub(crate) async fn series(
    session_id: web::Path<String>,
    query: web::Query<SessionSeriesQuery>,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
) -> Result<HttpResponse, ProxyError> {
    let session_id = session_id.into_inner();
    let session = sessions
        .session(&session_id)
        .await
        .ok_or(ProxyError::SessionNotFound(session_id))?;
    let selection = session.filter.selection;

    let payload = match selection.indicator_id {
        Some(indicator) => {
            let query = SeriesQuery {
                indicator,
                source: selection.source,
                territory: selection.territory,
                fixed_total: query.fixed_total,
            };
            build_series(&state, &session.catalog, &query).await?
        }
        None => SeriesPayload::empty(
            selection
                .territory
                .unwrap_or_else(|| state.config.default_territory.clone()),
            None,
        ),
    };
    Ok(fresh().json(payload))
}
