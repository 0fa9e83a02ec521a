// Presentation layer - HTTP surface for the editor and dashboard pages
pub mod app_state;
pub mod handlers;
pub mod router;
