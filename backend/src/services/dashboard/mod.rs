//! Chart-ready data built on the normalization pipeline.
//!
//! - `GET /api/dashboard/series`: aggregated series for an explicit selection.
//! - `GET /api/dashboard/overview`: catalog, KPI cards and both update stamps in one call.
//! - `POST /api/dashboard/sessions`: starts a server-held filter session.
//! - `GET /api/dashboard/sessions/{id}`: current filter state of a session.
//! - `DELETE /api/dashboard/sessions/{id}`: closes a session.
//! - `POST /api/dashboard/sessions/{id}/events`: feeds a `Select*` event to the cascade.
//! - `GET /api/dashboard/sessions/{id}/series`: series for the session's selection.
//!
//! Upstream failures on these routes do not fail the request: the payload
//! comes back empty with an `error` message for display.

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

mod overview;
mod series;
mod sessions;

const API_PATH: &str = "/api/dashboard";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/series", get().to(series::process))
        .route("/overview", get().to(overview::process))
        .route("/sessions", post().to(sessions::create))
        .route("/sessions/{session_id}", get().to(sessions::get_state))
        .route("/sessions/{session_id}", delete().to(sessions::close))
        .route("/sessions/{session_id}/events", post().to(sessions::post_event))
        .route("/sessions/{session_id}/series", get().to(sessions::series))
}
