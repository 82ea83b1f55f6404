//! Tsunagari session server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tsunagari-server
//! cargo run --bin tsunagari-server -- --host 127.0.0.1 --port 3000 --static-dir public
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use tsunagari_server::{
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository},
    ui::{CommandDispatcher, Server, ServerConfig},
    usecase::{ConnectClientUseCase, GetSessionDetailUseCase, GetSessionsUseCase},
};
use tsunagari_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "tsunagari-server")]
#[command(about = "Real-time session server for the Tsunagari workshop", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Directory with the static front-end assets
    #[arg(long, env = "STATIC_DIR", default_value = "public")]
    static_dir: PathBuf,

    /// Seconds an empty session is kept before the sweep reclaims it
    #[arg(long, env = "SESSION_TTL_SECS", default_value = "3600")]
    session_ttl_secs: u64,

    /// Seconds between idle-session sweeps
    #[arg(long, env = "SWEEP_INTERVAL_SECS", default_value = "900")]
    sweep_interval_secs: u64,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    log_level: String,
}

impl From<&Args> for ServerConfig {
    fn from(args: &Args) -> Self {
        Self {
            host: args.host.clone(),
            port: args.port,
            static_dir: args.static_dir.clone(),
            session_ttl: Duration::from_secs(args.session_ttl_secs),
            sweep_interval: Duration::from_secs(args.sweep_interval_secs),
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ServerConfig::from(&args);

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases
    // 4. Dispatcher
    // 5. Server

    // 1. Create Repository (in-memory session store)
    let repository = Arc::new(InMemorySessionRepository::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create UseCases
    let clock = Arc::new(SystemClock);
    let connect_client_usecase = Arc::new(ConnectClientUseCase::new(message_pusher.clone()));
    let get_sessions_usecase = Arc::new(GetSessionsUseCase::new(repository.clone()));
    let get_session_detail_usecase = Arc::new(GetSessionDetailUseCase::new(repository.clone()));

    // 4. Create the dispatcher owned by the event loop
    let dispatcher = CommandDispatcher::new(
        repository,
        message_pusher,
        clock,
        config.session_ttl,
    );

    // 5. Create and run the server
    let server = Server::new(
        config,
        dispatcher,
        connect_client_usecase,
        get_sessions_usecase,
        get_session_detail_usecase,
    );
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
