// Zone editor - Draw, name, save and delete zones
use crate::application::zone_backend::{STATUS_DELETED, STATUS_SAVED, ZoneBackend};
use crate::domain::zone::{CanvasPoint, NewZone, SavedZone, StrokeRect, ZoneDraft};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const SUGGESTED_LABEL: &str = "Zone";
pub const SUGGESTED_THRESHOLD: &str = "5";

/// Message shown to the user after an editor action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    ZoneDrawn,
    DrawFirst,
    ZoneNamed(String),
    NameFirst,
    ZoneSaved(String),
    SaveFailed,
    LastZoneDeleted,
    NothingToDelete,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::ZoneDrawn => write!(f, "Zone drawn! Now click 'Name Zone'."),
            Notice::DrawFirst => write!(f, "Draw a zone first!"),
            Notice::ZoneNamed(label) => write!(f, "Zone named \"{}\". Now click 'Save Zone'.", label),
            Notice::NameFirst => write!(f, "Please draw and name the zone first!"),
            Notice::ZoneSaved(label) => write!(f, "Zone '{}' saved!", label),
            Notice::SaveFailed => write!(f, "Error saving zone."),
            Notice::LastZoneDeleted => write!(f, "Last zone deleted."),
            Notice::NothingToDelete => write!(f, "No zones to delete."),
        }
    }
}

/// Label and threshold submitted together from the naming form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NameForm {
    pub label: Option<String>,
    pub threshold: Option<String>,
}

impl NameForm {
    pub fn new(label: &str, threshold: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            threshold: Some(threshold.to_string()),
        }
    }

    /// Values pre-filled in the form.
    pub fn suggested() -> Self {
        Self::new(SUGGESTED_LABEL, SUGGESTED_THRESHOLD)
    }

    /// Trimmed label and whole-number threshold, or `None` if either field is
    /// unusable.
    fn validate(&self) -> Option<(String, u32)> {
        let label = self.label.as_deref().map(str::trim).filter(|l| !l.is_empty())?;
        let threshold = parse_threshold(self.threshold.as_deref()?)?;
        Some((label.to_string(), threshold))
    }
}

/// The whole text must be numeric; the threshold is its leading decimal
/// integer, which must be at least 1. `"5.9"` and `"1e3"` give 5 and 1.
fn parse_threshold(text: &str) -> Option<u32> {
    let text = text.trim();
    let value: f64 = text.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let digits = text.strip_prefix('+').unwrap_or(text);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok().filter(|&t| t >= 1)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

/// Pointer position as reported by the page: viewport coordinates plus the
/// canvas bounding-box origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub client_x: f64,
    pub client_y: f64,
    pub canvas_left: f64,
    pub canvas_top: f64,
}

impl PointerEvent {
    pub fn canvas_point(&self) -> CanvasPoint {
        CanvasPoint::from_viewport(self.client_x, self.client_y, self.canvas_left, self.canvas_top)
    }
}

/// Editor state: overlay canvas, gesture tracking and the single draft.
#[derive(Debug, Default)]
pub struct ZoneEditor {
    canvas: CanvasSize,
    armed: bool,
    drawing_from: Option<CanvasPoint>,
    stroke: Option<StrokeRect>,
    draft: Option<ZoneDraft>,
}

impl ZoneEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> Option<&ZoneDraft> {
        self.draft.as_ref()
    }

    pub fn stroke(&self) -> Option<&StrokeRect> {
        self.stroke.as_ref()
    }

    pub fn resize(&mut self, size: CanvasSize) {
        self.canvas = size;
    }

    pub fn begin_draw(&mut self) {
        self.armed = true;
    }

    /// Start a gesture. Ignored until draw mode is armed.
    pub fn pointer_down(&mut self, event: PointerEvent) -> bool {
        if !self.armed {
            return false;
        }
        self.drawing_from = Some(event.canvas_point());
        true
    }

    /// Finish a gesture, replacing the stroke and the draft.
    pub fn pointer_up(&mut self, event: PointerEvent) -> Option<Notice> {
        let start = self.drawing_from.take()?;
        let end = event.canvas_point();

        self.clear_overlay();
        self.stroke = Some(StrokeRect::between(start, end));
        self.draft = Some(ZoneDraft::from_corners(start, end));
        Some(Notice::ZoneDrawn)
    }

    /// Apply the naming form. `None` means the form was abandoned or invalid
    /// and nothing changed.
    pub fn name(&mut self, form: &NameForm) -> Option<Notice> {
        let Some(draft) = self.draft.as_mut() else {
            return Some(Notice::DrawFirst);
        };
        let (label, threshold) = form.validate()?;
        draft.name(label.clone(), threshold);
        Some(Notice::ZoneNamed(label))
    }

    /// Request body for saving the draft, or the notice explaining why there
    /// is nothing to save.
    pub fn save_request(&self) -> Result<NewZone, Notice> {
        self.draft
            .as_ref()
            .and_then(ZoneDraft::to_new_zone)
            .ok_or(Notice::NameFirst)
    }

    /// Apply the backend's verdict on `sent`. The draft and overlay are only
    /// cleared if the draft is still the one that was sent.
    pub fn complete_save(&mut self, sent: &NewZone, status: &str) -> Notice {
        if status != STATUS_SAVED {
            return Notice::SaveFailed;
        }
        let unchanged = self
            .draft
            .as_ref()
            .and_then(ZoneDraft::to_new_zone)
            .is_some_and(|current| current == *sent);
        if unchanged {
            self.draft = None;
            self.clear_overlay();
        }
        Notice::ZoneSaved(sent.label.clone())
    }

    fn clear_overlay(&mut self) {
        self.stroke = None;
    }

    pub fn view(&self, stream_url: Option<String>) -> EditorView {
        EditorView {
            stream_url,
            canvas: self.canvas,
            armed: self.armed,
            drawing: self.drawing_from.is_some(),
            stroke: self.stroke.clone(),
            draft: self.draft.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorView {
    pub stream_url: Option<String>,
    pub canvas: CanvasSize,
    pub armed: bool,
    pub drawing: bool,
    pub stroke: Option<StrokeRect>,
    pub draft: Option<ZoneDraft>,
}

#[derive(Clone)]
pub struct EditorService {
    repository: Arc<dyn ZoneBackend>,
    stream_url: Option<String>,
    editor: Arc<Mutex<ZoneEditor>>,
}

impl EditorService {
    pub fn new(repository: Arc<dyn ZoneBackend>, stream_url: Option<String>) -> Self {
        Self {
            repository,
            stream_url,
            editor: Arc::new(Mutex::new(ZoneEditor::new())),
        }
    }

    pub async fn view(&self) -> EditorView {
        self.editor.lock().await.view(self.stream_url.clone())
    }

    pub async fn resize(&self, size: CanvasSize) {
        self.editor.lock().await.resize(size);
    }

    pub async fn begin_draw(&self) {
        self.editor.lock().await.begin_draw();
        tracing::debug!("Draw mode armed");
    }

    pub async fn pointer_down(&self, event: PointerEvent) -> bool {
        self.editor.lock().await.pointer_down(event)
    }

    pub async fn pointer_up(&self, event: PointerEvent) -> Option<Notice> {
        let notice = self.editor.lock().await.pointer_up(event);
        if notice.is_some() {
            tracing::debug!("Zone drawn at ({}, {})", event.client_x, event.client_y);
        }
        notice
    }

    pub async fn name(&self, form: &NameForm) -> Option<Notice> {
        self.editor.lock().await.name(form)
    }

    /// Save the named draft. The editor is not locked while the request is
    /// in flight.
    pub async fn save(&self) -> anyhow::Result<Notice> {
        let zone = match self.editor.lock().await.save_request() {
            Ok(zone) => zone,
            Err(notice) => return Ok(notice),
        };

        let reply = self.repository.create_zone(&zone).await?;
        if !reply.is(STATUS_SAVED) {
            tracing::warn!("Backend rejected zone {} with status {}", zone.label, reply.status);
        } else {
            tracing::info!("Zone {} saved", zone.label);
        }
        Ok(self.editor.lock().await.complete_save(&zone, &reply.status))
    }

    pub async fn delete_last(&self) -> anyhow::Result<Notice> {
        let reply = self.repository.delete_last_zone().await?;
        tracing::info!("Delete last zone: {}", reply.status);
        Ok(if reply.is(STATUS_DELETED) {
            Notice::LastZoneDeleted
        } else {
            Notice::NothingToDelete
        })
    }

    pub async fn list_zones(&self) -> anyhow::Result<Vec<SavedZone>> {
        self.repository.list_zones().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::zone_backend::StatusReply;
    use crate::application::zone_backend::fake::FakeBackend;
    use crate::domain::counts::{EditorSnapshot, ZoneReading};
    use std::time::Duration;

    fn at(x: f64, y: f64) -> PointerEvent {
        PointerEvent {
            client_x: x + 10.0,
            client_y: y + 20.0,
            canvas_left: 10.0,
            canvas_top: 20.0,
        }
    }

    fn drawn_editor() -> ZoneEditor {
        let mut editor = ZoneEditor::new();
        editor.begin_draw();
        editor.pointer_down(at(10.4, 20.6));
        editor.pointer_up(at(110.5, 80.2));
        editor
    }

    #[test]
    fn test_gesture_ignored_until_armed() {
        let mut editor = ZoneEditor::new();
        assert!(!editor.pointer_down(at(1.0, 1.0)));
        assert_eq!(editor.pointer_up(at(5.0, 5.0)), None);
        assert!(editor.draft().is_none());
    }

    #[test]
    fn test_release_without_press_does_nothing() {
        let mut editor = ZoneEditor::new();
        editor.begin_draw();
        assert_eq!(editor.pointer_up(at(5.0, 5.0)), None);
        assert!(editor.stroke().is_none());
    }

    #[test]
    fn test_draw_stores_rounded_canvas_coordinates() {
        let editor = drawn_editor();
        assert_eq!(editor.draft().unwrap().coordinates, [[10, 21], [111, 80]]);
        let stroke = editor.stroke().unwrap();
        assert!((stroke.width - 100.1).abs() < 1e-9);
    }

    #[test]
    fn test_draw_up_left_keeps_drag_order() {
        let mut editor = ZoneEditor::new();
        editor.begin_draw();
        editor.pointer_down(at(200.0, 150.0));
        assert_eq!(editor.pointer_up(at(50.0, 40.0)), Some(Notice::ZoneDrawn));
        assert_eq!(editor.draft().unwrap().coordinates, [[200, 150], [50, 40]]);
        assert!(editor.stroke().unwrap().width < 0.0);
    }

    #[test]
    fn test_zero_size_rectangle_accepted() {
        let mut editor = ZoneEditor::new();
        editor.begin_draw();
        editor.pointer_down(at(30.0, 30.0));
        assert_eq!(editor.pointer_up(at(30.0, 30.0)), Some(Notice::ZoneDrawn));
        assert_eq!(editor.draft().unwrap().coordinates, [[30, 30], [30, 30]]);
    }

    #[test]
    fn test_redraw_overwrites_named_draft() {
        let mut editor = drawn_editor();
        editor.name(&NameForm::new("Door", "3"));
        editor.pointer_down(at(0.0, 0.0));
        editor.pointer_up(at(5.0, 5.0));
        let draft = editor.draft().unwrap();
        assert_eq!(draft.coordinates, [[0, 0], [5, 5]]);
        assert!(draft.label.is_none());
    }

    #[test]
    fn test_name_without_draft() {
        let mut editor = ZoneEditor::new();
        assert_eq!(editor.name(&NameForm::suggested()), Some(Notice::DrawFirst));
        assert!(editor.draft().is_none());
    }

    #[test]
    fn test_name_trims_label_and_parses_threshold() {
        let mut editor = drawn_editor();
        let notice = editor.name(&NameForm::new("  Entrance ", " 7 "));
        assert_eq!(notice, Some(Notice::ZoneNamed("Entrance".to_string())));
        assert_eq!(notice.unwrap().to_string(), "Zone named \"Entrance\". Now click 'Save Zone'.");
        let draft = editor.draft().unwrap();
        assert_eq!(draft.label.as_deref(), Some("Entrance"));
        assert_eq!(draft.threshold, Some(7));
    }

    #[test]
    fn test_name_aborts_on_invalid_input() {
        let mut editor = drawn_editor();
        let invalid = [
            NameForm::new("Door", "lots"),
            NameForm::new("Door", ""),
            NameForm::new("   ", "5"),
            NameForm::new("Door", "0"),
            NameForm::new("Door", "NaN"),
            NameForm {
                label: Some("Door".into()),
                threshold: None,
            },
            NameForm::default(),
        ];
        for form in &invalid {
            assert_eq!(editor.name(form), None, "{:?}", form);
        }
        let draft = editor.draft().unwrap();
        assert!(draft.label.is_none());
        assert!(draft.threshold.is_none());
    }

    #[test]
    fn test_fractional_threshold_truncates() {
        let mut editor = drawn_editor();
        editor.name(&NameForm::new("Door", "5.9"));
        assert_eq!(editor.draft().unwrap().threshold, Some(5));
    }

    #[test]
    fn test_threshold_takes_leading_integer() {
        assert_eq!(parse_threshold("1e3"), Some(1));
        assert_eq!(parse_threshold("+12"), Some(12));
        assert_eq!(parse_threshold(" 7 "), Some(7));
        assert_eq!(parse_threshold(".5"), None);
        assert_eq!(parse_threshold("-3"), None);
        assert_eq!(parse_threshold("12abc"), None);
    }

    #[test]
    fn test_save_result_ignored_for_replaced_draft() {
        let mut editor = drawn_editor();
        editor.name(&NameForm::new("Door", "4"));
        let sent = editor.save_request().unwrap();

        editor.pointer_down(at(0.0, 0.0));
        editor.pointer_up(at(5.0, 5.0));
        assert_eq!(editor.complete_save(&sent, "saved"), Notice::ZoneSaved("Door".to_string()));
        assert_eq!(editor.draft().unwrap().coordinates, [[0, 0], [5, 5]]);
        assert!(editor.stroke().is_some());
    }

    #[test]
    fn test_save_request_requires_named_draft() {
        assert_eq!(ZoneEditor::new().save_request(), Err(Notice::NameFirst));
        assert_eq!(drawn_editor().save_request(), Err(Notice::NameFirst));
    }

    #[tokio::test]
    async fn test_save_without_name_sends_nothing() {
        let backend = Arc::new(FakeBackend::default());
        let service = EditorService::new(backend.clone(), None);
        service.begin_draw().await;
        service.pointer_down(at(1.0, 1.0)).await;
        service.pointer_up(at(9.0, 9.0)).await;

        let notice = service.save().await.unwrap();
        assert_eq!(notice.to_string(), "Please draw and name the zone first!");
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_successful_save_clears_draft_and_overlay() {
        let backend = Arc::new(FakeBackend::default());
        let service = EditorService::new(backend.clone(), None);
        service.begin_draw().await;
        service.pointer_down(at(1.0, 2.0)).await;
        service.pointer_up(at(30.0, 40.0)).await;
        service.name(&NameForm::new("Door", "4")).await;

        let notice = service.save().await.unwrap();
        assert_eq!(notice, Notice::ZoneSaved("Door".to_string()));

        let view = service.view().await;
        assert!(view.draft.is_none());
        assert!(view.stroke.is_none());
        assert_eq!(
            backend.created.lock().unwrap()[0],
            NewZone {
                coordinates: [[1, 2], [30, 40]],
                label: "Door".to_string(),
                threshold: 4,
            }
        );
    }

    struct StalledBackend;

    #[async_trait::async_trait]
    impl ZoneBackend for StalledBackend {
        async fn create_zone(&self, _zone: &NewZone) -> anyhow::Result<StatusReply> {
            std::future::pending().await
        }

        async fn delete_last_zone(&self) -> anyhow::Result<StatusReply> {
            std::future::pending().await
        }

        async fn list_zones(&self) -> anyhow::Result<Vec<SavedZone>> {
            std::future::pending().await
        }

        async fn editor_counts(&self) -> anyhow::Result<EditorSnapshot> {
            std::future::pending().await
        }

        async fn dashboard_counts(&self) -> anyhow::Result<Vec<ZoneReading>> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_editor_responsive_while_save_in_flight() {
        let service = EditorService::new(Arc::new(StalledBackend), None);
        service.begin_draw().await;
        service.pointer_down(at(1.0, 2.0)).await;
        service.pointer_up(at(30.0, 40.0)).await;
        service.name(&NameForm::new("Door", "4")).await;

        let saving = service.clone();
        let pending = tokio::spawn(async move { saving.save().await });
        tokio::task::yield_now().await;

        let wait = Duration::from_secs(1);
        let view = tokio::time::timeout(wait, service.view()).await.unwrap();
        assert_eq!(view.draft.unwrap().label.as_deref(), Some("Door"));
        assert!(tokio::time::timeout(wait, service.pointer_down(at(3.0, 3.0))).await.unwrap());
        assert!(!pending.is_finished());
        pending.abort();
    }

    #[tokio::test]
    async fn test_rejected_save_keeps_draft() {
        let backend = Arc::new(FakeBackend::rejecting("error"));
        let service = EditorService::new(backend.clone(), None);
        service.begin_draw().await;
        service.pointer_down(at(1.0, 2.0)).await;
        service.pointer_up(at(30.0, 40.0)).await;
        service.name(&NameForm::new("Door", "4")).await;

        assert_eq!(service.save().await.unwrap(), Notice::SaveFailed);
        let view = service.view().await;
        assert_eq!(view.draft.unwrap().label.as_deref(), Some("Door"));
        assert!(view.stroke.is_some());
    }

    #[tokio::test]
    async fn test_delete_last_reports_status() {
        let backend = Arc::new(FakeBackend::default());
        let service = EditorService::new(backend.clone(), None);
        assert_eq!(service.delete_last().await.unwrap(), Notice::NothingToDelete);

        service.begin_draw().await;
        service.pointer_down(at(1.0, 2.0)).await;
        service.pointer_up(at(30.0, 40.0)).await;
        service.name(&NameForm::new("Door", "4")).await;
        service.save().await.unwrap();
        assert_eq!(service.list_zones().await.unwrap().len(), 1);

        assert_eq!(service.delete_last().await.unwrap().to_string(), "Last zone deleted.");
        assert!(service.list_zones().await.unwrap().is_empty());
    }
}
