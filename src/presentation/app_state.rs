// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::editor_service::EditorService;
use crate::application::live_counts_service::LiveCountsService;

#[derive(Clone)]
pub struct AppState {
    pub editor_service: EditorService,
    pub live_counts_service: LiveCountsService,
    pub dashboard_service: DashboardService,
}
