//! API Server - HTTP server for the form and JSON API

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::{self, AppState};
use crate::api::web;
use crate::spam::SpamService;

/// API Server configuration
pub struct ApiServer {
    state: Arc<AppState>,
    addr: String,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(service: SpamService, addr: String) -> Self {
        let state = Arc::new(AppState { service });
        Self { state, addr }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        // CORS configuration
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let api_routes = Router::new()
            .route("/check_spam", post(handlers::check_spam))
            .route("/logs", get(handlers::get_logs).delete(handlers::clear_logs))
            .route("/stats", get(handlers::get_stats));

        // Web routes (HTML form)
        let web_routes = Router::new().route("/", get(web::index).post(web::check_submit));

        Router::new()
            .route("/health", get(handlers::health))
            .nest("/api", api_routes)
            .merge(web_routes)
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// Start the API server
    pub async fn run(&self) -> std::io::Result<()> {
        let router = self.router();

        info!("Starting API server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
