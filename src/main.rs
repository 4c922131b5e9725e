//! Proposal Press API - proposal authoring service
//!
//! Proposals are edited as ordered sections, paginated for a print preview
//! and exported as PDF documents with configurable page setup, header,
//! footer and branding.

mod config;
mod error;
mod export;
mod models;
mod proposal;
mod routes;
mod state;

use crate::config::Settings;
use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("🚀 Starting Proposal Press...");

    // Load configuration
    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");
    info!(
        "   Export defaults: company '{}', date format '{}', compression {}",
        settings.export.company_name,
        settings.export.date_format,
        if settings.export.compress { "on" } else { "off" }
    );

    let state = Arc::new(AppState::new(settings.export.clone()));

    // Build the router
    let app = create_router(state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   ─── Proposals ───");
    info!("   GET    /api/proposal                  - List proposals");
    info!("   POST   /api/proposal/create           - Create a custom proposal");
    info!("   GET    /api/proposal/templates        - List templates");
    info!("   POST   /api/proposal/template         - Create from a template");
    info!("   GET    /api/proposal/{{id}}             - Get a proposal");
    info!("   PATCH  /api/proposal/{{id}}             - Rename a proposal");
    info!("   DELETE /api/proposal/{{id}}             - Delete a proposal");
    info!("");
    info!("   ─── Sections ───");
    info!("   PATCH  /api/proposal/{{id}}/sections    - Save all sections");
    info!("   POST   /api/proposal/{{id}}/sections    - Add a section");
    info!("   PATCH  /api/proposal/{{id}}/sections/{{sid}} - Edit a section");
    info!("   DELETE /api/proposal/{{id}}/sections/{{sid}} - Remove a section");
    info!("   POST   /api/proposal/{{id}}/sections/reorder - Move a section");
    info!("");
    info!("   ─── Preview & Export ───");
    info!("   GET    /api/proposal/{{id}}/pages       - Preview pagination");
    info!("   POST   /api/proposal/{{id}}/preview     - Render one preview page");
    info!("   POST   /api/proposal/{{id}}/export      - Download as PDF");
    info!("   POST   /api/export/pdf                - Export a posted proposal");
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,proposal_press=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
