use crate::{Result, SessionStore, handler};
use axum::{
    Router,
    routing::{get, post},
};
use devjoke_conversation::ConversationManager;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<ConversationManager>,
    pub sessions: SessionStore,
}

impl AppState {
    #[must_use]
    pub fn new(manager: ConversationManager) -> Self {
        Self {
            manager: Arc::new(manager),
            sessions: SessionStore::new(),
        }
    }
}

/// Idle time after which a browser session is discarded.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// HTTP server for the joke bot UI.
pub struct WebServer {
    state: AppState,
    session_ttl: Duration,
}

impl WebServer {
    #[must_use]
    pub const fn new(state: AppState) -> Self {
        Self {
            state,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    #[must_use]
    pub const fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Routes for the page and the JSON API.
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(handler::index))
            .route("/health", get(handler::health))
            .route("/api/options", get(handler::options))
            .route("/api/sessions", post(handler::create_session))
            .route(
                "/api/sessions/{id}",
                get(handler::get_session).delete(handler::delete_session),
            )
            .route("/api/sessions/{id}/messages", post(handler::post_message))
            .route(
                "/api/sessions/{id}/suggestions/{index}",
                post(handler::post_suggestion),
            )
            .route("/api/sessions/{id}/clear", post(handler::clear_session))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind `addr` and serve until Ctrl+C.
    pub async fn run(self, addr: &str) -> Result<()> {
        let listener = TcpListener::bind(addr).await?;
        info!("Dev Joke Bot listening on http://{}", listener.local_addr()?);

        info!("Idle sessions expire after {}s", self.session_ttl.as_secs());
        let sweeper = self.state.sessions.spawn_sweeper(self.session_ttl);

        let served = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await;
        sweeper.abort();
        served?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
