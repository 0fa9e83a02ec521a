// Main entry point - Dependency injection, pollers and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::editor_service::EditorService;
use crate::application::live_counts_service::LiveCountsService;
use crate::application::poller::spawn_poll_loop;
use crate::application::zone_backend::ZoneBackend;
use crate::infrastructure::config::load_settings;
use crate::infrastructure::http_backend::HttpZoneBackend;
use crate::presentation::app_state::AppState;
use crate::presentation::router::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("zonewatch=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let settings = load_settings()?;

    // Create backend client (infrastructure layer)
    let repository: Arc<dyn ZoneBackend> = Arc::new(HttpZoneBackend::new(&settings.backend)?);
    tracing::info!("Using zone backend at {}", settings.backend.base_url);

    // Create services (application layer)
    let stream_url = settings.editor.stream_url.clone();
    let editor_service = EditorService::new(repository.clone(), stream_url.clone());
    let live_counts_service = LiveCountsService::new(repository.clone(), stream_url);
    let dashboard_service = DashboardService::new(repository, settings.dashboard.window);

    // Start pollers
    if live_counts_service.is_active() {
        let counts = live_counts_service.clone();
        spawn_poll_loop("editor counts", settings.editor.poll_interval(), move |seq| {
            let counts = counts.clone();
            async move {
                if let Err(e) = counts.poll(seq).await {
                    tracing::warn!("Counts poll {} failed: {:#}", seq, e);
                }
            }
        });
    } else {
        tracing::info!("No video stream configured; editor counts disabled");
    }

    let dashboard = dashboard_service.clone();
    spawn_poll_loop("dashboard", settings.dashboard.poll_interval(), move |seq| {
        let dashboard = dashboard.clone();
        async move {
            if let Err(e) = dashboard.poll(seq).await {
                tracing::warn!("Dashboard poll {} failed: {:#}", seq, e);
            }
        }
    });

    // Create application state
    let state = Arc::new(AppState {
        editor_service,
        live_counts_service,
        dashboard_service,
    });

    // Start server
    let addr: SocketAddr = settings
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid server.bind address {}", settings.server.bind))?;
    tracing::info!("Starting zonewatch on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router(state)).await?;

    Ok(())
}
