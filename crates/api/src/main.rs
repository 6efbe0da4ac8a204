use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bridge_api::config::ServerConfig;
use bridge_api::router::build_app_router;
use bridge_api::state::AppState;
use bridge_cache::TemplateCache;
use bridge_core::config::BridgeConfig;
use bridge_engine::EngineSettings;
use bridge_pipeline::JobPipeline;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bridge_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let server_config = ServerConfig::from_env();
    let config = Arc::new(BridgeConfig::from_env());
    let engine = Arc::new(EngineSettings::from_env());

    config
        .ensure_dirs()
        .expect("Failed to create work directories");
    tracing::info!(
        work_dir = %config.work_dir.display(),
        cache_dir = %config.templates_dir().display(),
        default_template_host = %config.default_template_host,
        engine_root = %engine.root.display(),
        "Loaded bridge configuration",
    );

    // --- HTTP client (shared by the fetcher and the callback dispatcher) ---
    let http = reqwest::Client::new();

    // --- Template cache ---
    let cache = Arc::new(TemplateCache::new(
        config.templates_dir(),
        http.clone(),
        Duration::from_secs(config.fetch_timeout_secs),
    ));

    // --- Job pipeline ---
    let pipeline = Arc::new(JobPipeline::new(
        Arc::clone(&config),
        engine,
        cache,
        http,
    ));

    // --- App state ---
    let state = AppState {
        config: Arc::clone(&config),
        pipeline,
    };

    // --- Router ---
    let app = build_app_router(state, &server_config);

    // --- Start server ---
    let addr = SocketAddr::new(
        server_config.host.parse().expect("Invalid HOST address"),
        server_config.port,
    );
    tracing::info!(%addr, "Starting render bridge");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // In-flight render jobs are process-local and non-durable; they are
    // abandoned here along with their detached tasks.
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
