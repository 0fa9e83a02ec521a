use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::time::Duration;

const CONFIG_FILE: &str = "config/zonewatch";
const ENV_PREFIX: &str = "ZONEWATCH";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    pub editor: EditorSettings,
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    /// Sent verbatim as the `Cookie` header, e.g. `session=...`.
    #[serde(default)]
    pub session_cookie: Option<String>,
    pub zones_path: String,
    pub editor_counts_path: String,
    pub dashboard_counts_path: String,
    pub request_timeout_ms: u64,
}

impl BackendSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EditorSettings {
    /// Live video shown under the drawing canvas. Counts are only polled
    /// when this is set.
    #[serde(default)]
    pub stream_url: Option<String>,
    pub poll_interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    pub poll_interval_ms: u64,
    pub window: usize,
}

impl EditorSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl DashboardSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn with_defaults() -> anyhow::Result<ConfigBuilder<DefaultState>> {
    Ok(Config::builder()
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("backend.base_url", "http://127.0.0.1:5000")?
        .set_default("backend.zones_path", "/zones")?
        .set_default("backend.editor_counts_path", "/zone_counts")?
        .set_default("backend.dashboard_counts_path", "/zone_counts")?
        .set_default("backend.request_timeout_ms", 10000)?
        .set_default("editor.poll_interval_ms", 3000)?
        .set_default("dashboard.poll_interval_ms", 2000)?
        .set_default("dashboard.window", 20)?)
}

fn finish(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Settings> {
    let settings: Settings = builder.build()?.try_deserialize()?;
    anyhow::ensure!(settings.backend.request_timeout_ms > 0, "backend.request_timeout_ms must be positive");
    anyhow::ensure!(settings.editor.poll_interval_ms > 0, "editor.poll_interval_ms must be positive");
    anyhow::ensure!(settings.dashboard.poll_interval_ms > 0, "dashboard.poll_interval_ms must be positive");
    anyhow::ensure!(settings.dashboard.window > 0, "dashboard.window must be positive");
    Ok(settings)
}

/// Defaults, then `config/zonewatch.*` if present, then `ZONEWATCH__*`
/// environment variables (e.g. `ZONEWATCH__BACKEND__BASE_URL`).
pub fn load_settings() -> anyhow::Result<Settings> {
    finish(
        with_defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__")),
    )
}
