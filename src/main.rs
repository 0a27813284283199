use anyhow::Result;
use rmcp::{transport::stdio, ServiceExt};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use xapblr_client::config::Config;
use xapblr_client::server::XapblrSearchServer;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    let default_filter = config.log_level.to_lowercase();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting xapblr client v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Configuration loaded: base_url={} render={} sort={}", config.base_url, config.render, config.sort);

    let server = XapblrSearchServer::new(config)?;
    let service = server.serve(stdio()).await?;

    tokio::select! {
        result = service.waiting() => {
            if let Err(e) = result {
                tracing::warn!("Service ended with error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("xapblr client stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
