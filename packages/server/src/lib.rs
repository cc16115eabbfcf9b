#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the MapMarks application.
//!
//! Serves the REST API backing the map frontend: nearby incidents, AI
//! summarization and chat, geocoding pass-throughs, and the client
//! configuration surface. Static frontend files are served from
//! `app/dist` in production.
//!
//! No endpoint failure is fatal to the process: AI and geocoder errors
//! map to JSON error responses, and a missing maps API key is reported
//! through `/api/config` so the client can render a configuration
//! message instead of a broken map.

mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use map_marks_ai::providers::{PromptProvider, create_provider_from_env};
use map_marks_incident::IncidentSource;
use map_marks_incident::dummy::DummyIncidentSource;
use map_marks_incident::http::HttpIncidentSource;

/// Shared application state.
pub struct AppState {
    /// Incident data collaborator.
    pub incidents: Arc<dyn IncidentSource>,
    /// Generative-language provider; `None` when no API key is configured.
    pub provider: Option<Arc<dyn PromptProvider>>,
    /// HTTP client for geocoding calls.
    pub http: reqwest::Client,
    /// Nominatim base URL.
    pub nominatim_base: String,
    /// Maps API key handed to the client; `None` renders a configuration
    /// message client-side.
    pub maps_api_key: Option<String>,
}

/// Picks the incident source from the environment.
///
/// `INCIDENTS_API_URL` selects the HTTP source; otherwise the in-memory
/// dummy dataset is served.
fn incident_source_from_env() -> Arc<dyn IncidentSource> {
    std::env::var("INCIDENTS_API_URL").map_or_else(
        |_| {
            log::info!("Serving the in-memory dummy incident dataset");
            Arc::new(DummyIncidentSource::new()) as Arc<dyn IncidentSource>
        },
        |url| {
            log::info!("Proxying incidents from {url}");
            Arc::new(HttpIncidentSource::new(url)) as Arc<dyn IncidentSource>
        },
    )
}

/// Starts the MapMarks API server.
///
/// Reads configuration from the environment (`BIND_ADDR`, `PORT`,
/// `MAPS_API_KEY`, `GEMINI_API_KEY`, `AI_MODEL`, `NOMINATIM_URL`,
/// `INCIDENTS_API_URL`), builds the shared state, and runs the Actix-Web
/// HTTP server. This is a regular async function — the caller provides
/// the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let incidents = incident_source_from_env();

    let provider: Option<Arc<dyn PromptProvider>> = match create_provider_from_env() {
        Ok(p) => Some(Arc::from(p)),
        Err(e) => {
            log::warn!("AI provider unavailable: {e}. Summarize and chat endpoints will 503.");
            None
        }
    };

    let maps_api_key = std::env::var("MAPS_API_KEY").ok();
    if maps_api_key.is_none() {
        log::warn!("MAPS_API_KEY not set; clients will show a configuration message");
    }

    let state = web::Data::new(AppState {
        incidents,
        provider,
        http: reqwest::Client::new(),
        nominatim_base: map_marks_geocoder::base_url_from_env(),
        maps_api_key,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/config", web::get().to(handlers::config))
                    .route("/incidents", web::get().to(handlers::incidents))
                    .route("/summarize", web::post().to(handlers::summarize))
                    .route("/chat", web::post().to(handlers::chat))
                    .route(
                        "/geocode/reverse",
                        web::get().to(handlers::reverse_geocode),
                    )
                    .route("/geocode/search", web::get().to(handlers::search_places)),
            )
            // Serve frontend static files (production)
            .service(Files::new("/", "app/dist").index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
