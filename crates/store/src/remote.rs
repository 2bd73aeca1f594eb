//! Remote inventory store client.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use stocksnap_inventory::InventoryItem;

use crate::config::SyncConfig;
use crate::error::SyncError;

/// Remote copy of the inventory snapshot.
///
/// `fetch` returns the raw JSON so the caller can normalize older shapes.
#[async_trait]
pub trait RemoteInventory: Send + Sync {
    async fn fetch(&self, config: &SyncConfig) -> Result<JsonValue, SyncError>;
    async fn push(&self, config: &SyncConfig, items: &[InventoryItem]) -> Result<(), SyncError>;
}

/// HTTP remote: GET `server_url` to read, POST the full snapshot to write.
#[derive(Debug, Clone, Default)]
pub struct HttpRemote {
    client: reqwest::Client,
}

impl HttpRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn authorize(&self, req: reqwest::RequestBuilder, config: &SyncConfig) -> reqwest::RequestBuilder {
        match config.bearer_token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

#[async_trait]
impl RemoteInventory for HttpRemote {
    async fn fetch(&self, config: &SyncConfig) -> Result<JsonValue, SyncError> {
        if !config.is_active() {
            return Err(SyncError::Disabled);
        }

        let req = self
            .client
            .get(&config.server_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        let resp = self
            .authorize(req, config)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SyncError::Api(
                resp.status().as_u16(),
                resp.text().await.unwrap_or_default(),
            ));
        }

        resp.json().await.map_err(|e| SyncError::Parse(e.to_string()))
    }

    async fn push(&self, config: &SyncConfig, items: &[InventoryItem]) -> Result<(), SyncError> {
        if !config.is_active() {
            return Err(SyncError::Disabled);
        }

        let req = self.client.post(&config.server_url).json(items);
        let resp = self
            .authorize(req, config)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SyncError::Api(
                resp.status().as_u16(),
                resp.text().await.unwrap_or_default(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn inactive_config_never_touches_the_network() {
        let remote = HttpRemote::new();
        match remote.fetch(&SyncConfig::default()).await {
            Err(SyncError::Disabled) => {}
            other => panic!("Expected Disabled, got {other:?}"),
        }
        match remote.push(&SyncConfig::default(), &[]).await {
            Err(SyncError::Disabled) => {}
            other => panic!("Expected Disabled, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let config = SyncConfig::default()
            .with_overrides(Some("http://127.0.0.1:9/inventory".to_string()), None);
        match HttpRemote::new().fetch(&config).await {
            Err(SyncError::Network(_)) => {}
            other => panic!("Expected Network error, got {other:?}"),
        }
    }
}
