// Library interface for mangadex_proxy
// This allows tests and the server binary to share the provider components

pub mod app_state;
pub mod chapters;
pub mod config;
pub mod error;
pub mod http_client;
pub mod models;
pub mod routes;
pub mod sources;
