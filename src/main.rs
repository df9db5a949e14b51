use anyhow::Result;
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use floatchat::{
    api::{self, AppState},
    chat::ChatService,
    config::Config,
    data::DataService,
    db, llm,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env (ignore error if file absent — env vars may be set externally)
    let _ = dotenvy::dotenv();

    // Initialise tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // Load config
    let config = Config::from_env()?;

    // Connect to DB and run migrations
    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database ready");

    // Build the completion backend once; the pipeline only sees the trait.
    let backend = llm::from_config(&config)?;
    info!(mode = ?config.ai_mode, "Completion backend ready");

    let data = DataService::new(pool);
    let state = AppState {
        chat: ChatService::new(data.clone(), backend),
        data,
    };

    // Start HTTP server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
