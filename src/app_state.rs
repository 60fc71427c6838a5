//! Application state for the Actix-web server
//!
//! `AppState` is wrapped in `web::Data` and shared read-only by every handler.
//! Requests never coordinate through it; the pooled `reqwest::Client` inside
//! the MangaDex client is the only shared resource.

use crate::config::Config;
use crate::sources::mangadex::MangaDex;

pub struct AppState {
    /// MangaDex API client
    pub mangadex: MangaDex,
    /// Application configuration
    pub config: Config,
}

impl AppState {
    /// Build the upstream client from configuration
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let client = config.upstream.create_http_client()?;
        let mangadex = MangaDex::new(client, config.upstream.clone());
        Ok(Self { mangadex, config })
    }
}
