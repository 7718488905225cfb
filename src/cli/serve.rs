//! Serve command - runs the warming scheduler until shutdown

use tokio::signal;
use tracing::{error, info};

use crate::Runtime;

pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap();
    let enabled = config.warming.enabled;
    let runtime = Runtime::from_config(config)?;

    if !enabled {
        info!("Warming disabled, waiting for shutdown");
        shutdown_signal().await;
        return Ok(());
    }

    let handle = runtime.scheduler().start();

    shutdown_signal().await;
    handle.shutdown().await;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
