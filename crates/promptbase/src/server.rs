use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::{info, warn};

use promptbase_core::Gateway;

use crate::api;
use crate::config::Settings;

/// Serve the page until Ctrl+C, then close the gateway.
pub async fn serve(settings: &Settings, gateway: Gateway, open_browser: bool) -> Result<()> {
    let gateway = Arc::new(gateway);

    let stored = gateway
        .prompts()
        .and_then(|store| store.count())
        .context("Failed to read prompt store")?;

    let router = api::create_router(gateway.clone()).context("Failed to load page template")?;

    let listener = tokio::net::TcpListener::bind(settings.addr)
        .await
        .with_context(|| format!("Failed to bind server to {}", settings.addr))?;

    let url = format!("http://{}", settings.addr);
    info!(addr = %settings.addr, prompts = stored, "promptbase listening");

    eprintln!();
    eprintln!("  {} {}", "->".bright_green(), format!("Open {}", url).bold());
    eprintln!("  {} Press {} to stop", "->".dimmed(), "Ctrl+C".bold());
    eprintln!();

    if open_browser {
        if let Err(e) = open::that(&url) {
            eprintln!("Failed to open browser: {} (open {} manually)", e, url);
        }
    }

    let result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    match Arc::try_unwrap(gateway) {
        Ok(gateway) => gateway.close().context("Failed to close prompt store")?,
        Err(_) => warn!("prompt store still in use at shutdown; leaving it to drop"),
    }

    result.context("Server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler, keep serving until the process is killed
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    eprintln!("\nShutting down...");
}
