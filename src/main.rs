//! rtsupport gateway - Binary Entry Point

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rtsupport::{
    config::{Args, GatewayConfig},
    create_router, AppState, MemoryStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_filter = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("rtsupport={},tower_http=info", log_filter).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config: GatewayConfig = args.into();
    let listen_addr = config.listen_addr();

    let store = Arc::new(MemoryStore::with_feed_capacity(config.feed_capacity));
    let state = Arc::new(AppState::new(store, config));
    let app = create_router(state);

    let listener = TcpListener::bind(&listen_addr).await?;
    tracing::info!("rtsupport gateway {} listening on {}", rtsupport::VERSION, listen_addr);
    tracing::info!("WebSocket endpoint at ws://{}/ws", listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
