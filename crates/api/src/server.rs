use crate::handlers;
use abtest_core::BootstrapConfig;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// HTTP server for the analytics engine.
pub struct ApiServer {
    bootstrap: Arc<BootstrapConfig>,
}

impl ApiServer {
    #[must_use]
    pub fn new(bootstrap: BootstrapConfig) -> Self {
        Self {
            bootstrap: Arc::new(bootstrap),
        }
    }

    /// Builds the router with all analysis routes.
    #[must_use]
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

        let stateful = Router::new()
            .route("/calculate-overview", post(handlers::calculate_overview))
            .route("/calculate-revenue", post(handlers::calculate_revenue))
            .with_state(self.bootstrap.clone());

        let stateless = Router::new()
            .route("/health", get(handlers::health))
            .route("/analyze", post(handlers::analyze))
            .route("/aggregate-transactions", post(handlers::aggregate_transactions))
            .route("/validate-data", post(handlers::validate_data))
            .route("/create-analysis", post(handlers::create_analysis));

        stateless.merge(stateful).layer(cors).layer(TraceLayer::new_for_http())
    }

    /// Starts the web server listening on the specified address.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the address or serve requests.
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("analytics API listening on {}", addr);

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}
