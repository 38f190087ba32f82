#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for ward lookups.
//!
//! Resolves coordinates and report photos to municipal wards and serves
//! the boundary dataset to map clients. Everything is loaded once at
//! startup; request handling never touches the filesystem.

mod handlers;

use std::path::Path;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, error::InternalError, middleware, web};
use civic_map_locator::WardLocator;
use civic_map_server_models::ApiError;
use civic_map_spatial::DatasetSources;

/// Largest accepted report photo.
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state.
pub struct AppState {
    /// Ward lookup service.
    pub locator: WardLocator,
    /// Boundary `GeoJSON` exactly as read from disk.
    pub divisions: web::Bytes,
    /// Ward name table exactly as read from disk.
    pub ward_zones: web::Bytes,
}

impl AppState {
    /// Builds state from a loaded locator and the sources it was parsed
    /// from.
    #[must_use]
    pub fn new(locator: WardLocator, sources: DatasetSources) -> Self {
        Self {
            locator,
            divisions: web::Bytes::from(sources.boundaries),
            ward_zones: web::Bytes::from(sources.zones),
        }
    }
}

/// Registers the `/api` routes and their extractor limits.
///
/// Expects a `web::Data<AppState>` to be registered on the `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("Rejected JSON body: {err}");
        let response =
            HttpResponse::BadRequest().json(ApiError::new("lat and lng must be numbers"));
        InternalError::from_response(err, response).into()
    }))
    .app_data(web::PayloadConfig::new(MAX_PHOTO_BYTES))
    .service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/geo/locate", web::post().to(handlers::locate))
            .route("/geo/ward-zones", web::get().to(handlers::ward_zones))
            .route("/geo/divisions", web::get().to(handlers::divisions))
            .route(
                "/reports/location",
                web::post().to(handlers::report_location),
            ),
    );
}

/// Starts the ward lookup API server.
///
/// Loads configuration and the boundary dataset (see
/// [`civic_map_locator::bootstrap`]), then serves until shut down. The
/// `BIND_ADDR` and `PORT` environment variables override the configured
/// listener. The caller is responsible for providing the async runtime
/// (e.g. via `#[actix_web::main]`) and for initialising logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the configuration or dataset
/// cannot be loaded, or if the HTTP server fails to bind or encounters a
/// runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config_path: Option<&Path>) -> std::io::Result<()> {
    let (config, sources, locator) = civic_map_locator::bootstrap(config_path).map_err(|e| {
        log::error!("Failed to load ward dataset: {e}");
        std::io::Error::other(e)
    })?;

    log::info!("Loaded {} wards", locator.ward_count());
    let state = web::Data::new(AppState::new(locator, sources));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or(config.server.bind_addr);
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(config.server.port);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
