//! `GET /api/catalog`: the indicator catalog as parsed from its sheet.

use crate::error::ProxyError;
use crate::services::{fresh, AppState};
use crate::source::SourceError;
use actix_web::web::{get, scope};
use actix_web::{web, HttpResponse, Scope};
use common::catalog::Catalog;
use serde_json::json;

const API_PATH: &str = "/api/catalog";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(process))
}

/// Fetches and parses the catalog sheet named in the config.
pub(crate) async fn load_catalog(state: &AppState) -> Result<Catalog, SourceError> {
    let sheet = state.source.fetch_range(&state.config.catalog_range).await?;
    Ok(Catalog::from_sheet(&sheet))
}

async fn process(state: web::Data<AppState>) -> Result<HttpResponse, ProxyError> {
    let catalog = load_catalog(&state).await?;
    Ok(fresh().json(json!({
        "areas": catalog.areas(),
        "indicators": catalog.indicators(None),
        "entries": catalog.entries(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::source::memory::MemorySource;
    use actix_web::{test, App};
    use serde_json::Value;
    use std::sync::Arc;

    #[actix_web::test]
    async fn lists_entries_and_areas() {
        let source = MemorySource::new().with_sheet(
            "catalogo",
            vec![
                vec!["area", "indicador_id", "indicador_nome", "fonte", "sheet", "tipo"],
                vec!["Acolhimento", "acolhidos", "Acolhidos", "MP", "acolhidos_mp", "barras"],
                vec!["Adoção", "faixa", "Faixa etária", "CNJ", "faixa", "pizza"],
                vec!["Adoção", "", "sem id", "", "x", ""],
            ],
        );
        let state = web::Data::new(AppState {
            source: Arc::new(source),
            config: Config::from_lookup(|_| None),
        });
        let app = test::init_service(App::new().app_data(state).service(configure_routes())).await;
        let req = test::TestRequest::get().uri("/api/catalog").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["areas"], serde_json::json!(["Acolhimento", "Adoção"]));
        assert_eq!(body["entries"].as_array().unwrap().len(), 2);
        assert_eq!(body["entries"][1]["chartProfile"], "pie");
        assert_eq!(body["indicators"][0]["id"], "acolhidos");
    }
}
