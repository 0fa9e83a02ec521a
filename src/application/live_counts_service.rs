// Live counts - Editor-side polling of per-zone counts
use crate::application::poller::Latest;
use crate::application::zone_backend::ZoneBackend;
use crate::infrastructure::html;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Rendered `zoneCounts` and `alertsPanel` contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountsPanels {
    pub zone_counts: String,
    pub alerts_panel: String,
}

#[derive(Debug, Default)]
struct PanelState {
    latest: Latest,
    panels: Option<CountsPanels>,
}

#[derive(Clone)]
pub struct LiveCountsService {
    repository: Arc<dyn ZoneBackend>,
    stream_url: Option<String>,
    state: Arc<RwLock<PanelState>>,
}

impl LiveCountsService {
    pub fn new(repository: Arc<dyn ZoneBackend>, stream_url: Option<String>) -> Self {
        Self {
            repository,
            stream_url,
            state: Arc::new(RwLock::new(PanelState::default())),
        }
    }

    /// Counts are only shown once a video stream is configured.
    pub fn is_active(&self) -> bool {
        self.stream_url.is_some()
    }

    /// Fetch one snapshot and re-render both panels. Responses older than the
    /// last rendered one are dropped.
    pub async fn poll(&self, seq: u64) -> anyhow::Result<()> {
        if !self.is_active() {
            return Ok(());
        }

        let snapshot = self.repository.editor_counts().await?;
        let panels = CountsPanels {
            zone_counts: html::zone_counts(&snapshot),
            alerts_panel: html::alerts_panel(&snapshot.alerts),
        };

        let mut state = self.state.write().await;
        if !state.latest.accept(seq) {
            tracing::debug!("Dropping stale counts response {}", seq);
            return Ok(());
        }
        tracing::debug!(
            "Counts updated: total={} zones={} alerts={}",
            snapshot.total,
            snapshot.zones.len(),
            snapshot.alerts.len()
        );
        state.panels = Some(panels);
        Ok(())
    }

    /// `None` when no stream is configured; `Some(None)` before the first poll.
    pub async fn panels(&self) -> Option<Option<CountsPanels>> {
        if !self.is_active() {
            return None;
        }
        Some(self.state.read().await.panels.clone())
    }
}
