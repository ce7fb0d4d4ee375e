//! Thin proxy over the spreadsheet.
//!
//! - `GET /api/sheets?range=<A1>`: `{ values }` for the range, `400` when the
//!   range is missing or malformed, `500` when the upstream fails.
//! - `GET /api/sheets/updated-at`: `{ modifiedTime }` of the spreadsheet file.
//! - `GET /api/sheets/meta-label`: `{ label }`, the curated "last updated" cell.

use actix_web::web::{get, scope};
use actix_web::Scope;

pub(crate) mod meta_label;
mod range;
mod updated_at;

const API_PATH: &str = "/api/sheets";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(range::process))
        .route("/updated-at", get().to(updated_at::process))
        .route("/meta-label", get().to(meta_label::process))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::services::AppState;
    use crate::source::memory::MemorySource;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn state(source: MemorySource) -> web::Data<AppState> {
        web::Data::new(AppState {
            source: Arc::new(source),
            config: Config::from_lookup(|_| None),
        })
    }

    fn sample() -> MemorySource {
        MemorySource::new()
            .with_sheet("dados", vec![vec!["territorio", "valor"], vec!["RJ", "10"]])
            .with_sheet("_meta", vec![vec!["atualizado", "Atualizado em março/2024"]])
            .modified_at("2024-03-01T12:00:00Z")
    }

    #[actix_web::test]
    async fn returns_range_values() {
        let app = test::init_service(App::new().app_data(state(sample())).service(configure_routes())).await;
        let req = test::TestRequest::get().uri("/api/sheets?range=dados!A:B").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("cache-control").unwrap(), "no-store");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "values": [["territorio", "valor"], ["RJ", "10"]] }));
    }

    #[actix_web::test]
    async fn missing_or_bad_range_is_400() {
        let app = test::init_service(App::new().app_data(state(sample())).service(configure_routes())).await;
        for uri in ["/api/sheets", "/api/sheets?range=dados!A0"] {
            let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
            let body: Value = test::read_body_json(resp).await;
            assert!(body["error"].is_string());
        }
    }

    #[actix_web::test]
    async fn upstream_failure_is_500_with_message() {
        let app = test::init_service(
            App::new()
                .app_data(state(MemorySource::unavailable()))
                .service(configure_routes()),
        )
        .await;
        let req = test::TestRequest::get().uri("/api/sheets?range=dados").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "upstream returned 503: unavailable");
    }

    #[actix_web::test]
    async fn metadata_endpoints() {
        let app = test::init_service(App::new().app_data(state(sample())).service(configure_routes())).await;

        let req = test::TestRequest::get().uri("/api/sheets/updated-at").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "modifiedTime": "2024-03-01T12:00:00Z" }));

        let req = test::TestRequest::get().uri("/api/sheets/meta-label").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "label": "Atualizado em março/2024" }));
    }
}
