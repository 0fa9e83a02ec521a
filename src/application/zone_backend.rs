// Backend trait for zone storage and counts
use crate::domain::counts::{EditorSnapshot, ZoneReading};
use crate::domain::zone::{NewZone, SavedZone};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const STATUS_SAVED: &str = "saved";
pub const STATUS_DELETED: &str = "deleted";

/// `{"status": ...}` reply to zone mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReply {
    pub status: String,
}

impl StatusReply {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }

    pub fn is(&self, status: &str) -> bool {
        self.status == status
    }
}

#[async_trait]
pub trait ZoneBackend: Send + Sync {
    /// Persist a new zone
    async fn create_zone(&self, zone: &NewZone) -> anyhow::Result<StatusReply>;

    /// Remove the most recently created zone; the backend decides which one
    async fn delete_last_zone(&self) -> anyhow::Result<StatusReply>;

    /// List saved zones
    async fn list_zones(&self) -> anyhow::Result<Vec<SavedZone>>;

    /// Counts in the editor's `{total, zones, alerts}` shape
    async fn editor_counts(&self) -> anyhow::Result<EditorSnapshot>;

    /// Counts in the dashboard's `[{label, count, threshold}]` shape
    async fn dashboard_counts(&self) -> anyhow::Result<Vec<ZoneReading>>;
}
