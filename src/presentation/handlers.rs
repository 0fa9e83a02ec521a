// HTTP request handlers
use crate::application::dashboard_service::DashboardView;
use crate::application::editor_service::{CanvasSize, EditorView, NameForm, Notice, PointerEvent};
use crate::domain::zone::SavedZone;
use crate::presentation::app_state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use std::sync::Arc;

/// Reply to an editor action; `notice` is the message to show, if any.
#[derive(Debug, Serialize)]
pub struct ActionReply {
    pub notice: Option<String>,
}

impl From<Option<Notice>> for ActionReply {
    fn from(notice: Option<Notice>) -> Self {
        Self {
            notice: notice.map(|n| n.to_string()),
        }
    }
}

/// Contents of the `zoneCounts` and `alertsPanel` elements, `null` until the
/// first poll completes.
#[derive(Debug, Serialize)]
pub struct CountsReply {
    pub zone_counts: Option<String>,
    pub alerts_panel: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn editor_view(State(state): State<Arc<AppState>>) -> Json<EditorView> {
    Json(state.editor_service.view().await)
}

/// Match the overlay to the stream's displayed size
pub async fn resize_canvas(
    State(state): State<Arc<AppState>>,
    Json(size): Json<CanvasSize>,
) -> StatusCode {
    state.editor_service.resize(size).await;
    StatusCode::NO_CONTENT
}

pub async fn begin_draw(State(state): State<Arc<AppState>>) -> StatusCode {
    state.editor_service.begin_draw().await;
    StatusCode::NO_CONTENT
}

pub async fn pointer_down(
    State(state): State<Arc<AppState>>,
    Json(event): Json<PointerEvent>,
) -> StatusCode {
    state.editor_service.pointer_down(event).await;
    StatusCode::NO_CONTENT
}

pub async fn pointer_up(
    State(state): State<Arc<AppState>>,
    Json(event): Json<PointerEvent>,
) -> Json<ActionReply> {
    Json(state.editor_service.pointer_up(event).await.into())
}

/// Pre-filled values for the naming form
pub async fn name_form() -> Json<NameForm> {
    Json(NameForm::suggested())
}

pub async fn name_zone(
    State(state): State<Arc<AppState>>,
    Json(form): Json<NameForm>,
) -> Json<ActionReply> {
    Json(state.editor_service.name(&form).await.into())
}

pub async fn save_zone(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ActionReply>, StatusCode> {
    match state.editor_service.save().await {
        Ok(notice) => Ok(Json(Some(notice).into())),
        Err(e) => {
            tracing::error!("Error saving zone: {:#}", e);
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}

pub async fn delete_last_zone(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ActionReply>, StatusCode> {
    match state.editor_service.delete_last().await {
        Ok(notice) => Ok(Json(Some(notice).into())),
        Err(e) => {
            tracing::error!("Error deleting zone: {:#}", e);
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}

pub async fn list_zones(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SavedZone>>, StatusCode> {
    state.editor_service.list_zones().await.map(Json).map_err(|e| {
        tracing::error!("Error listing zones: {:#}", e);
        StatusCode::BAD_GATEWAY
    })
}

/// Rendered count panels; 404 when no video stream is configured
pub async fn editor_counts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CountsReply>, StatusCode> {
    let panels = state
        .live_counts_service
        .panels()
        .await
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(match panels {
        Some(p) => CountsReply {
            zone_counts: Some(p.zone_counts),
            alerts_panel: Some(p.alerts_panel),
        },
        None => CountsReply {
            zone_counts: None,
            alerts_panel: None,
        },
    }))
}

pub async fn dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    Json(state.dashboard_service.view().await)
}
