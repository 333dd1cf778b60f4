//! Info server setup.
//!
//! # Responsibilities
//! - Create the Axum router with the info endpoint
//! - Wire up the trace layer
//! - Serve until shutdown

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::http::info::info;
use crate::lifecycle::Shutdown;
use crate::reference::ReferenceCache;

/// HTTP server exposing service information.
pub struct InfoServer {
    router: Router,
}

impl InfoServer {
    pub fn new(cache: Arc<ReferenceCache>) -> Self {
        Self {
            router: Self::build_router(cache),
        }
    }

    fn build_router(cache: Arc<ReferenceCache>) -> Router {
        Router::new()
            .route("/info", get(info))
            .with_state(cache)
            .layer(TraceLayer::new_for_http())
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Info server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.signalled())
            .await?;

        tracing::info!("Info server stopped");
        Ok(())
    }
}
