//! Instrument discovery over HTTP

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use crate::error::InventoryError;
use crate::types::InstrumentRecord;

/// Base of the per-instrument `config_version.txt`; the hostname is appended
pub const DEFAULT_CONFIG_VERSION_URL: &str = "https://control-svcs.isis.cclrc.ac.uk/git/?p=instconfigs/inst.git;a=blob_plain;f=configurations/config_version.txt;hb=refs/heads/";

/// Source of the instrument list and of each instrument's config version
#[async_trait]
pub trait InstrumentDiscovery: Send + Sync {
    /// Every known instrument
    async fn instruments(&self) -> Result<Vec<InstrumentRecord>, InventoryError>;

    /// Raw contents of the host's configuration version file
    async fn config_version(&self, hostname: &str) -> Result<String, InventoryError>;
}

/// Reads the instrument list as JSON and version files as plain text
#[derive(Debug, Clone)]
pub struct HttpDiscovery {
    client: Client,
    instlist_url: Url,
    config_version_url: String,
}

impl HttpDiscovery {
    /// Create a discovery client
    ///
    /// # Errors
    /// Returns `InventoryError::ConfigError` for an invalid list URL or when
    /// the HTTP client cannot be built
    pub fn new(
        instlist_url: &str,
        config_version_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, InventoryError> {
        let instlist_url = Url::parse(instlist_url)
            .map_err(|e| InventoryError::ConfigError(format!("instrument list URL: {e}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InventoryError::ConfigError(e.to_string()))?;

        Ok(Self {
            client,
            instlist_url,
            config_version_url: config_version_url.into(),
        })
    }

    /// URL of the version file on the host's configuration branch
    ///
    /// # Errors
    /// Returns `InventoryError::ConfigError` if the result is not a URL
    pub fn config_version_url_for(&self, hostname: &str) -> Result<Url, InventoryError> {
        Url::parse(&format!("{}{hostname}", self.config_version_url))
            .map_err(|e| InventoryError::ConfigError(format!("config version URL: {e}")))
    }

    async fn get_text(&self, url: Url) -> Result<String, InventoryError> {
        let failed = |message: String| InventoryError::RequestFailed {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failed(response.status().to_string()));
        }

        response.text().await.map_err(|e| failed(e.to_string()))
    }
}

/// Parse the published instrument list
///
/// # Errors
/// Returns `InventoryError::ParseError` if the body is not the expected JSON
pub fn parse_instrument_list(body: &str) -> Result<Vec<InstrumentRecord>, InventoryError> {
    serde_json::from_str(body).map_err(|e| InventoryError::ParseError(e.to_string()))
}

#[async_trait]
impl InstrumentDiscovery for HttpDiscovery {
    #[instrument(skip(self), fields(url = %self.instlist_url))]
    async fn instruments(&self) -> Result<Vec<InstrumentRecord>, InventoryError> {
        let body = self.get_text(self.instlist_url.clone()).await?;
        let instruments = parse_instrument_list(&body)?;
        debug!(count = instruments.len(), "fetched instrument list");
        Ok(instruments)
    }

    async fn config_version(&self, hostname: &str) -> Result<String, InventoryError> {
        let url = self.config_version_url_for(hostname)?;
        self.get_text(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instrument_list() {
        let body = r#"[
            {"name": "LARMOR", "hostName": "NDXLARMOR", "seci": false, "groups": ["SANS"]},
            {"name": "ALF", "hostName": "NDXALF", "seci": true},
            {"name": "DEMO", "hostName": "NDXDEMO"}
        ]"#;

        let instruments = parse_instrument_list(body).unwrap();

        assert_eq!(instruments.len(), 3);
        assert_eq!(instruments[0].host_name, "NDXLARMOR");
        assert!(instruments[1].seci);
        assert!(!instruments[2].seci);
    }

    #[test]
    fn test_parse_instrument_list_rejects_garbage() {
        assert!(matches!(
            parse_instrument_list("<html>"),
            Err(InventoryError::ParseError(_))
        ));
    }

    #[test]
    fn test_config_version_url() {
        let discovery = HttpDiscovery::new(
            "https://example.org/instlist.json",
            DEFAULT_CONFIG_VERSION_URL,
            Duration::from_secs(5),
        )
        .unwrap();

        let url = discovery.config_version_url_for("NDXLARMOR").unwrap();
        assert!(url.as_str().ends_with("hb=refs/heads/NDXLARMOR"));
    }

    #[test]
    fn test_invalid_list_url() {
        let result = HttpDiscovery::new("not a url", DEFAULT_CONFIG_VERSION_URL, Duration::from_secs(5));
        assert!(matches!(result, Err(InventoryError::ConfigError(_))));
    }
}
