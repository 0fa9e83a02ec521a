// Zone domain models
use serde::{Deserialize, Serialize};

/// Width in pixels of the rectangle stroked on the overlay.
pub const STROKE_WIDTH: u32 = 2;
pub const STROKE_COLOR: &str = "red";

/// A point in canvas-local pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl CanvasPoint {
    /// Translate viewport coordinates into the canvas's local space.
    pub fn from_viewport(client_x: f64, client_y: f64, canvas_left: f64, canvas_top: f64) -> Self {
        Self {
            x: client_x - canvas_left,
            y: client_y - canvas_top,
        }
    }

    /// Halves round toward positive infinity, so -2.5 becomes -2.
    fn rounded(&self) -> [i32; 2] {
        [round_half_up(self.x), round_half_up(self.y)]
    }
}

fn round_half_up(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

/// Rectangle currently stroked on the overlay. Width and height keep their
/// sign, so a drag up or left yields negative extents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrokeRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub line_width: u32,
    pub color: &'static str,
}

impl StrokeRect {
    pub fn between(start: CanvasPoint, end: CanvasPoint) -> Self {
        Self {
            x: start.x,
            y: start.y,
            width: end.x - start.x,
            height: end.y - start.y,
            line_width: STROKE_WIDTH,
            color: STROKE_COLOR,
        }
    }
}

/// The single in-progress zone held by the editor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneDraft {
    pub coordinates: [[i32; 2]; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u32>,
}

impl ZoneDraft {
    pub fn from_corners(start: CanvasPoint, end: CanvasPoint) -> Self {
        Self {
            coordinates: [start.rounded(), end.rounded()],
            label: None,
            threshold: None,
        }
    }

    pub fn name(&mut self, label: String, threshold: u32) {
        self.label = Some(label);
        self.threshold = Some(threshold);
    }

    /// Body for the create-zone request, available once the draft is named.
    pub fn to_new_zone(&self) -> Option<NewZone> {
        match (&self.label, self.threshold) {
            (Some(label), Some(threshold)) => Some(NewZone {
                coordinates: self.coordinates,
                label: label.clone(),
                threshold,
            }),
            _ => None,
        }
    }
}

/// Create-zone request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewZone {
    pub coordinates: [[i32; 2]; 2],
    pub label: String,
    pub threshold: u32,
}

/// A zone as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedZone {
    pub id: i64,
    pub label: String,
    pub coords: [[i32; 2]; 2],
    pub threshold: i64,
}
