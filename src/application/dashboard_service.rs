// Dashboard service - Live charts and alerts from polled counts
use crate::application::poller::Latest;
use crate::application::zone_backend::ZoneBackend;
use crate::domain::chart::{BarChart, LineChart, random_color};
use crate::domain::counts::ZoneReading;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Everything the dashboard page shows.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub zone_counts: Vec<String>,
    pub alerts: Vec<String>,
    pub bar_chart: BarChart,
    pub line_chart: LineChart,
}

impl DashboardView {
    pub fn new(window: usize) -> Self {
        Self {
            zone_counts: Vec::new(),
            alerts: Vec::new(),
            bar_chart: BarChart::default(),
            line_chart: LineChart::new(window),
        }
    }

    /// Render one snapshot. Lists and the bar chart are rebuilt from scratch;
    /// the line chart gains one time point.
    pub fn apply(
        &mut self,
        time_label: String,
        readings: &[ZoneReading],
        pick_color: impl FnMut() -> String,
    ) {
        self.zone_counts = readings
            .iter()
            .map(|z| format!("{}: {}", z.label, z.count))
            .collect();
        self.alerts = readings.iter().filter_map(ZoneReading::alert).collect();

        let (labels, counts): (Vec<String>, Vec<i64>) = readings
            .iter()
            .map(|z| (z.label.clone(), z.count))
            .unzip();
        self.bar_chart.replace(labels, counts);

        self.line_chart.record(time_label, readings, pick_color);
    }
}

struct DashboardState {
    latest: Latest,
    view: DashboardView,
}

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn ZoneBackend>,
    state: Arc<RwLock<DashboardState>>,
}

impl DashboardService {
    pub fn new(repository: Arc<dyn ZoneBackend>, window: usize) -> Self {
        Self {
            repository,
            state: Arc::new(RwLock::new(DashboardState {
                latest: Latest::default(),
                view: DashboardView::new(window),
            })),
        }
    }

    pub async fn poll(&self, seq: u64) -> anyhow::Result<()> {
        let readings = self.repository.dashboard_counts().await?;
        let time_label = chrono::Local::now().format("%H:%M:%S").to_string();

        let mut state = self.state.write().await;
        if !state.latest.accept(seq) {
            tracing::debug!("Dropping stale dashboard response {}", seq);
            return Ok(());
        }
        state.view.apply(time_label, &readings, random_color);

        let over = state.view.alerts.len();
        if over > 0 {
            tracing::debug!("{} of {} zones over threshold", over, readings.len());
        }
        Ok(())
    }

    pub async fn view(&self) -> DashboardView {
        self.state.read().await.view.clone()
    }
}
