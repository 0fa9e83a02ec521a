// Route table for the editor and dashboard pages
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    begin_draw, dashboard, delete_last_zone, editor_counts, editor_view, health_check,
    list_zones, name_form, name_zone, pointer_down, pointer_up, resize_canvas, save_zone,
};
use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/editor", get(editor_view))
        .route("/editor/canvas", put(resize_canvas))
        .route("/editor/draw", post(begin_draw))
        .route("/editor/pointer/down", post(pointer_down))
        .route("/editor/pointer/up", post(pointer_up))
        .route("/editor/name", get(name_form).post(name_zone))
        .route("/editor/save", post(save_zone))
        .route("/editor/delete-last", post(delete_last_zone))
        .route("/editor/zones", get(list_zones))
        .route("/editor/counts", get(editor_counts))
        .route("/dashboard", get(dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
