// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod html;
pub mod http_backend;
