// Application layer - Editor and dashboard use cases
pub mod dashboard_service;
pub mod editor_service;
pub mod live_counts_service;
pub mod poller;
pub mod zone_backend;
