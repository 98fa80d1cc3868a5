//! # ClassDesk API
//!
//! The API crate provides the web server for the ClassDesk course-assignment
//! service. It exposes the instructor and course catalog and the assignment
//! submission, edit and delete workflows over JSON.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into coordinator calls and results into responses
//! - **Middleware**: Error-to-status mapping
//! - **Config**: Handle environment and application configuration
//!
//! The workflow logic lives in `classdesk-core`; storage is injected through
//! the store traits so the same router runs against PostgreSQL or memory.

/// Configuration module for API settings
pub mod config;
/// Request handlers for the catalog and assignment endpoints
pub mod handlers;
/// Middleware for error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use classdesk_core::{
    catalog::CatalogStore,
    coordinator::AssignmentCoordinator,
    store::{AssignmentStore, CatalogSource},
};
use classdesk_db::{DbPool, PgStore};
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use classdesk_api::{app, ApiState};
/// use classdesk_db::mock::InMemoryStore;
///
/// let store = Arc::new(InMemoryStore::new());
/// let state = Arc::new(ApiState::new(store.clone(), store));
/// let router = app(state);
/// ```
pub struct ApiState {
    /// Runs the assignment workflows and owns the catalog snapshot
    pub coordinator: Arc<AssignmentCoordinator>,
}

impl ApiState {
    pub fn new(catalog_source: Arc<dyn CatalogSource>, store: Arc<dyn AssignmentStore>) -> Self {
        let catalog = Arc::new(CatalogStore::new(catalog_source));
        Self {
            coordinator: Arc::new(AssignmentCoordinator::new(catalog, store)),
        }
    }

    pub fn catalog(&self) -> &Arc<CatalogStore> {
        self.coordinator.catalog()
    }
}

/// Builds the application router with all routes attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Instructor and course catalog endpoints
        .merge(routes::catalog::routes())
        // Assignment workflow endpoints
        .merge(routes::assignment::routes())
        .with_state(state)
}

/// Starts the API server with the provided configuration and database connection
///
/// This function initializes logging, optionally warms the catalog snapshot,
/// configures routes and middleware, and starts the HTTP server.
///
/// # Arguments
///
/// * `config` - API configuration including host, port, and other settings
/// * `db_pool` - PostgreSQL connection pool backing both store traits
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// use classdesk_api::{config::ApiConfig, start_server};
///
/// let config = ApiConfig::from_env()?;
/// let db_pool = classdesk_db::create_pool(&config.database_url).await?;
/// start_server(config, db_pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create shared state with dependencies
    let store = Arc::new(PgStore::new(db_pool));
    let state = Arc::new(ApiState::new(store.clone(), store));

    if config.catalog_refresh_on_start {
        // The snapshot loads lazily on first use if this fails.
        if let Err(err) = state.catalog().refresh().await {
            warn!("Initial catalog load failed: {err}");
        }
    }

    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    // Add tracing and request timeout middleware
    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin: {origin}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true))
}
