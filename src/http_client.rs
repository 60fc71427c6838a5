use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Settings for the shared upstream HTTP client
#[derive(Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub enable_gzip: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("mangadex-proxy/", env!("CARGO_PKG_VERSION")).to_string(),
            enable_gzip: true,
        }
    }
}

/// Build the client shared by every handler.
///
/// Requests are sent once; a failure surfaces to the caller as-is.
pub fn build_client(config: &HttpClientConfig) -> Result<Client, reqwest::Error> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );

    ClientBuilder::new()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .gzip(config.enable_gzip)
        .brotli(config.enable_gzip)
        .default_headers(headers)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = build_client(&HttpClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_without_compression() {
        let config = HttpClientConfig {
            timeout: Duration::from_secs(5),
            user_agent: "test-agent".to_string(),
            enable_gzip: false,
        };
        assert!(build_client(&config).is_ok());
    }
}
