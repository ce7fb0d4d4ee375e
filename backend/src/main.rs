mod config;
mod error;
mod services;
mod session;
mod source;

use crate::config::Config;
use crate::services::AppState;
use crate::session::state::SessionsState;
use crate::source::{CsvDirSource, GoogleSheetsSource, SheetSource};
use actix_files::Files;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::{info, warn};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;

fn build_source(config: &Config) -> std::io::Result<Arc<dyn SheetSource>> {
    match &config.data_dir {
        Some(dir) => {
            info!("Reading sheets from {}", dir.display());
            Ok(Arc::new(CsvDirSource::new(dir)))
        }
        None => {
            if config.spreadsheet_id.is_none() {
                warn!("SPREADSHEET_ID is not set, sheet requests will fail");
            }
            let source = GoogleSheetsSource::new(config).map_err(std::io::Error::other)?;
            Ok(Arc::new(source))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::from_env();
    let url = config.url();
    let source = build_source(&config)?;

    if config.open_browser {
        let url = url.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            let _ = webbrowser::open(&url);
        });
    }

    // Territory discovery results flow back through this channel
    let (tx, rx) = mpsc::channel(100);
    let sessions = SessionsState::new(tx);
    let updater_state = sessions.clone();
    let updater_source = Arc::clone(&source);
    tokio::spawn(async move {
        session::state::start_session_updater(updater_state, updater_source, rx).await;
    });
    tokio::spawn(session::state::start_session_sweeper(
        sessions.clone(),
        config.session_ttl,
    ));

    let static_dir = config.static_dir.clone();
    if !static_dir.is_dir() {
        warn!("{} not found, serving the API only", static_dir.display());
    }
    let bind = (config.host.clone(), config.port);
    let app_state = web::Data::new(AppState { source, config });
    let sessions = web::Data::new(sessions);

    info!("Server running at {}", url);

    HttpServer::new(move || {
        let static_dir = static_dir.clone();
        App::new()
            .app_data(app_state.clone())
            .app_data(sessions.clone())
            .service(services::sheets::configure_routes())
            .service(services::catalog::configure_routes())
            .service(services::dashboard::configure_routes())
            .configure(move |cfg| {
                if static_dir.is_dir() {
                    cfg.service(Files::new("/", static_dir).index_file("index.html"));
                }
            })
    })
    .bind(bind)?
    .run()
    .await
}
