//! Connectivity tracking for the remote store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Connectivity state as of the last remote interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityState {
    /// No remote interaction yet, or sync is disabled.
    #[default]
    Unknown,
    /// Last remote call succeeded.
    Online,
    /// Last remote call failed; reads are served from the local cache.
    Offline,
}

/// Outcome of the most recent remote interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub state: ConnectivityState,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl SyncStatus {
    pub fn is_offline(&self) -> bool {
        self.state == ConnectivityState::Offline
    }

    pub(crate) fn set_online(&mut self) {
        self.state = ConnectivityState::Online;
        self.last_synced_at = Some(Utc::now());
        self.last_error = None;
    }

    pub(crate) fn set_offline(&mut self, error: impl Into<String>) {
        self.state = ConnectivityState::Offline;
        self.last_error = Some(error.into());
    }
}
