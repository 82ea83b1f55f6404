//! Server execution logic.

use std::{future::Future, path::PathBuf, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tokio::{net::TcpListener, sync::mpsc};
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::usecase::{ConnectClientUseCase, GetSessionDetailUseCase, GetSessionsUseCase};

use super::{
    dispatcher::{CommandDispatcher, spawn_event_loop},
    handler::{
        get_session_detail, get_session_statistics, get_sessions, health_check,
        websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// How long to wait for the event loop to drain after the listener stops
const EVENT_LOOP_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Runtime settings of the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the presentation layer (served for every non-API path)
    pub static_dir: PathBuf,
    /// Sessions without participants older than this are reclaimed
    pub session_ttl: Duration,
    /// Period of the idle-session sweep
    pub sweep_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: PathBuf::from("public"),
            session_ttl: Duration::from_secs(60 * 60),
            sweep_interval: Duration::from_secs(15 * 60),
        }
    }
}

/// Build the router for the given state
///
/// `/ws` carries the sync protocol, `/api/*` the read-only HTTP API, and every other
/// path is served from `static_dir` with `index.html` as fallback.
pub fn router(app_state: Arc<AppState>, static_dir: &std::path::Path) -> Router {
    let assets =
        ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/api/sessions", get(get_sessions))
        .route("/api/sessions/{session_id}", get(get_session_detail))
        .route(
            "/api/sessions/{session_id}/statistics",
            get(get_session_statistics),
        )
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Session server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     config,
///     dispatcher,
///     connect_client_usecase,
///     get_sessions_usecase,
///     get_session_detail_usecase,
/// );
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    /// CommandDispatcher（イベントループが所有する）
    dispatcher: CommandDispatcher,
    /// ConnectClientUseCase（クライアント接続のユースケース）
    connect_client_usecase: Arc<ConnectClientUseCase>,
    /// GetSessionsUseCase（セッション一覧取得のユースケース）
    get_sessions_usecase: Arc<GetSessionsUseCase>,
    /// GetSessionDetailUseCase（セッション詳細取得のユースケース）
    get_session_detail_usecase: Arc<GetSessionDetailUseCase>,
}

impl Server {
    pub fn new(
        config: ServerConfig,
        dispatcher: CommandDispatcher,
        connect_client_usecase: Arc<ConnectClientUseCase>,
        get_sessions_usecase: Arc<GetSessionsUseCase>,
        get_session_detail_usecase: Arc<GetSessionDetailUseCase>,
    ) -> Self {
        Self {
            config,
            dispatcher,
            connect_client_usecase,
            get_sessions_usecase,
            get_session_detail_usecase,
        }
    }

    /// Bind to the configured address and serve until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address or
    /// if there's an error during server execution.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&bind_addr).await?;
        tracing::info!("Press Ctrl+C to shutdown gracefully");
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (events, receiver) = mpsc::unbounded_channel();
        let event_loop = spawn_event_loop(self.dispatcher, receiver, self.config.sweep_interval);

        let app_state = Arc::new(AppState {
            events,
            connect_client_usecase: self.connect_client_usecase,
            get_sessions_usecase: self.get_sessions_usecase,
            get_session_detail_usecase: self.get_session_detail_usecase,
        });
        let app = router(app_state, &self.config.static_dir);

        let local_addr = listener.local_addr()?;
        tracing::info!("Session server listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}/ws", local_addr);
        tracing::info!("Serving static files from {}", self.config.static_dir.display());

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        // The router (and its event sender) is gone; upgraded sockets may still hold one.
        if tokio::time::timeout(EVENT_LOOP_DRAIN_TIMEOUT, event_loop)
            .await
            .is_err()
        {
            tracing::warn!("Event loop did not stop within {:?}", EVENT_LOOP_DRAIN_TIMEOUT);
        }

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
