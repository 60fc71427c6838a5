use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// First port tried when binding
    #[serde(default = "default_port_start")]
    pub port_start: u16,

    /// Last port tried when binding (inclusive)
    #[serde(default = "default_port_end")]
    pub port_end: u16,

    /// Prefix the routes are mounted under, e.g. "/manga/mangadex"
    #[serde(default)]
    pub base_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    /// MangaDex API root
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Host serving cover images
    #[serde(default = "default_uploads_base_url")]
    pub uploads_base_url: String,

    /// Timeout for upstream requests in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Number of results requested per search
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    /// Number of chapters requested from a manga feed
    #[serde(default = "default_feed_limit")]
    pub feed_limit: u32,

    #[serde(default = "default_translated_languages")]
    pub translated_languages: Vec<String>,

    /// Serve compressed "data-saver" page images
    #[serde(default = "default_false")]
    pub data_saver: bool,

    /// Enable gzip/brotli compression
    #[serde(default = "default_true")]
    pub enable_compression: bool,
}

fn default_true() -> bool { true }
fn default_false() -> bool { false }
fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port_start() -> u16 { 8080 }
fn default_port_end() -> u16 { 8090 }
fn default_api_base_url() -> String { crate::sources::mangadex::BASE_URL.to_string() }
fn default_uploads_base_url() -> String { crate::sources::mangadex::UPLOADS_URL.to_string() }
fn default_timeout() -> u64 { 30 }
fn default_user_agent() -> String { concat!("mangadex-proxy/", env!("CARGO_PKG_VERSION")).to_string() }
fn default_search_limit() -> u32 { 10 }
fn default_feed_limit() -> u32 { 500 }
fn default_translated_languages() -> Vec<String> { vec!["en".to_string()] }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port_start: default_port_start(),
            port_end: default_port_end(),
            base_path: String::new(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            uploads_base_url: default_uploads_base_url(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            search_limit: default_search_limit(),
            feed_limit: default_feed_limit(),
            translated_languages: default_translated_languages(),
            data_saver: false,
            enable_compression: true,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(Path::new("config.toml"))
    }

    /// Read a config file, falling back to defaults when it is missing or invalid
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<Config>(&content) {
                    Ok(cfg) => return cfg,
                    Err(e) => log::warn!("Invalid {}, using defaults: {}", path.display(), e),
                },
                Err(e) => log::warn!("Failed to read {}, using defaults: {}", path.display(), e),
            }
        }
        Self::default()
    }
}

impl UpstreamConfig {
    /// Create the shared upstream HTTP client from this configuration
    pub fn create_http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        use crate::http_client::{build_client, HttpClientConfig};
        use std::time::Duration;

        let config = HttpClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone(),
            enable_gzip: self.enable_compression,
        };

        build_client(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.server.port_start, 8080);
        assert_eq!(cfg.server.port_end, 8090);
        assert_eq!(cfg.server.base_path, "");
        assert_eq!(cfg.upstream.api_base_url, "https://api.mangadex.org");
        assert_eq!(cfg.upstream.search_limit, 10);
        assert_eq!(cfg.upstream.feed_limit, 500);
        assert_eq!(cfg.upstream.translated_languages, vec!["en".to_string()]);
        assert!(!cfg.upstream.data_saver);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [server]
            base_path = "/manga/mangadex"

            [upstream]
            feed_limit = 100
            translated_languages = ["en", "fr"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.base_path, "/manga/mangadex");
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.upstream.feed_limit, 100);
        assert_eq!(cfg.upstream.search_limit, 10);
        assert_eq!(cfg.upstream.translated_languages.len(), 2);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let cfg = Config::load_from(Path::new("does-not-exist.toml"));
        assert_eq!(cfg.upstream.timeout_secs, 30);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let path = std::env::temp_dir().join("mangadex_proxy_invalid_config.toml");
        fs::write(&path, "server = [not valid").unwrap();
        let cfg = Config::load_from(&path);
        let _ = fs::remove_file(&path);
        assert_eq!(cfg.server.port_start, 8080);
    }

    #[test]
    fn test_create_http_client() {
        let cfg = UpstreamConfig::default();
        assert!(cfg.create_http_client().is_ok());
    }
}
