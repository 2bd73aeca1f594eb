//! Remote sync settings.

use serde::{Deserialize, Serialize};

/// Settings for the optional remote inventory store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncConfig {
    pub enabled: bool,
    /// Single endpoint: GET reads the snapshot, POST replaces it.
    pub server_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Periodically pull from the remote.
    pub auto_sync: bool,
}

impl SyncConfig {
    /// Enabled and pointing somewhere.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.server_url.trim().is_empty()
    }

    /// Bearer token to send, if any.
    pub fn bearer_token(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Apply overrides from the environment or command line. Supplying a
    /// server URL turns sync on.
    pub fn with_overrides(mut self, server_url: Option<String>, api_key: Option<String>) -> Self {
        if let Some(url) = server_url.filter(|u| !u.trim().is_empty()) {
            self.server_url = url;
            self.enabled = true;
        }
        if let Some(key) = api_key {
            self.api_key = Some(key);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_inactive() {
        let config = SyncConfig::default();
        assert!(!config.is_active());
        assert_eq!(config.bearer_token(), None);
    }

    #[test]
    fn enabled_without_url_is_inactive() {
        let config = SyncConfig {
            enabled: true,
            server_url: "  ".to_string(),
            ..SyncConfig::default()
        };
        assert!(!config.is_active());
    }

    #[test]
    fn reads_stored_camel_case_shape() {
        let config: SyncConfig = serde_json::from_str(
            r#"{"enabled": true, "serverUrl": "https://example.test/inv", "apiKey": "", "autoSync": true}"#,
        )
        .unwrap();
        assert!(config.is_active());
        assert!(config.auto_sync);
        // Blank keys are not sent.
        assert_eq!(config.bearer_token(), None);

        let partial: SyncConfig = serde_json::from_str(r#"{"enabled": true}"#).unwrap();
        assert_eq!(partial.server_url, "");
    }

    #[test]
    fn overrides_enable_sync() {
        let config = SyncConfig::default()
            .with_overrides(Some("https://example.test/inv".to_string()), Some("k".to_string()));
        assert!(config.is_active());
        assert_eq!(config.bearer_token(), Some("k"));

        let untouched = SyncConfig::default().with_overrides(Some(" ".to_string()), None);
        assert!(!untouched.is_active());
    }
}
