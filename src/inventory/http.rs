//! HTTP inventory source
//!
//! Issues one blocking GET against the configured endpoint and parses the
//! body as a JSON array of host objects. Failures are returned as-is; there
//! is no retry or fallback.

use super::{build_inventory, parse_hosts, HostRecord, InventoryDocument, InventoryError, InventoryResult};
use crate::config::{InventoryConfig, DEFAULT_TIMEOUT_SECS};
use std::time::Duration;
use tracing::{debug, info};

/// Inventory source backed by an HTTP API
#[derive(Debug, Clone)]
pub struct HttpInventorySource {
    url: url::Url,
    timeout: Duration,
}

impl HttpInventorySource {
    /// Create a source for the given URL with the default timeout
    pub fn new(url: &str) -> InventoryResult<Self> {
        Ok(Self {
            url: Self::validate_url(url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Create a source from the `[inventory]` config section
    pub fn from_config(config: &InventoryConfig) -> InventoryResult<Self> {
        Ok(Self::new(&config.url)?.with_timeout(Duration::from_secs(config.timeout)))
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The endpoint this source reads from
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    fn validate_url(url: &str) -> InventoryResult<url::Url> {
        let invalid = |message: String| InventoryError::InvalidUrl {
            url: url.to_string(),
            message,
        };

        let parsed = url::Url::parse(url).map_err(|e| invalid(e.to_string()))?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(invalid(format!("unsupported scheme '{}'", other))),
        }
    }

    /// Fetch the host list
    pub fn fetch_hosts(&self) -> InventoryResult<Vec<HostRecord>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| InventoryError::Http(format!("Failed to create HTTP client: {}", e)))?;

        debug!(url = %self.url, "fetching inventory");

        let response = client.get(self.url.clone()).send().map_err(|e| {
            if e.is_timeout() {
                InventoryError::Http(format!(
                    "Request timed out after {} seconds",
                    self.timeout.as_secs()
                ))
            } else {
                InventoryError::Http(format!("HTTP request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(InventoryError::Status {
                url: self.url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .map_err(|e| InventoryError::Http(format!("Failed to read response body: {}", e)))?;

        let hosts = parse_hosts(&body)?;
        info!(count = hosts.len(), "fetched inventory hosts");

        Ok(hosts)
    }

    /// Fetch the host list and shape it as a dynamic inventory document
    pub fn inventory(&self) -> InventoryResult<InventoryDocument> {
        let hosts = self.fetch_hosts()?;
        Ok(build_inventory(&hosts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(HttpInventorySource::new("https://api.example.com/hosts").is_ok());
        assert!(HttpInventorySource::new("http://127.0.0.1:8080/hosts").is_ok());

        assert!(matches!(
            HttpInventorySource::new("ftp://example.com/hosts"),
            Err(InventoryError::InvalidUrl { .. })
        ));
        assert!(matches!(
            HttpInventorySource::new("not a url"),
            Err(InventoryError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_from_config() {
        let config = InventoryConfig {
            url: "https://cmdb.internal/hosts".to_string(),
            timeout: 3,
        };
        let source = HttpInventorySource::from_config(&config).unwrap();
        assert_eq!(source.url(), "https://cmdb.internal/hosts");
        assert_eq!(source.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_fetch_hosts_preserves_order() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/hosts")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"hostname": "c"}, {"hostname": "a"}, {"hostname": "b"}]"#)
            .create();

        let source = HttpInventorySource::new(&format!("{}/hosts", server.url())).unwrap();
        let document = source.inventory().unwrap();

        mock.assert();
        assert_eq!(document.hosts(), ["c", "a", "b"]);
    }

    #[test]
    fn test_fetch_hosts_error_status() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("GET", "/hosts").with_status(500).create();

        let source = HttpInventorySource::new(&format!("{}/hosts", server.url())).unwrap();
        let result = source.fetch_hosts();

        assert!(matches!(result, Err(InventoryError::Status { status: 500, .. })));
    }
}
