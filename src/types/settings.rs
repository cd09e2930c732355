use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::session::SnapshotLimits;

/// User-facing settings, owned by an external store and pushed in on change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub blocking_enabled: bool,
    pub notifications_enabled: bool,
    pub custom_domains: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            blocking_enabled: true,
            notifications_enabled: true,
            custom_domains: Vec::new(),
        }
    }
}

/// Engine tunables. Not user-editable at runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// EasyList mirrors, tried in order until one yields a non-empty list.
    pub easylist_mirrors: Vec<String>,
    /// Per-mirror fetch timeout in seconds.
    pub fetch_timeout_secs: u64,
    /// Bundled list file; `None` uses the list compiled into the crate.
    pub bundled_list_path: Option<PathBuf>,
    /// Snapshot bound for third-party, tracker and blocked lists.
    pub snapshot_request_limit: usize,
    /// Snapshot bound for fingerprint and hijack lists.
    pub snapshot_signal_limit: usize,
    /// Internal cap on each per-session log.
    pub retention_limit: usize,
    /// Cap on recorded supercookies per aggregation pass.
    pub supercookie_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            easylist_mirrors: Self::default_mirrors(),
            fetch_timeout_secs: 30,
            bundled_list_path: None,
            snapshot_request_limit: 100,
            snapshot_signal_limit: 20,
            retention_limit: 1000,
            supercookie_limit: 50,
        }
    }
}

impl EngineConfig {
    pub fn default_mirrors() -> Vec<String> {
        vec![
            "https://easylist.to/easylist/easylist.txt".to_string(),
            "https://cdn.jsdelivr.net/gh/easylist/easylist/easylist.txt".to_string(),
        ]
    }

    pub fn snapshot_limits(&self) -> SnapshotLimits {
        SnapshotLimits {
            requests: self.snapshot_request_limit,
            signals: self.snapshot_signal_limit,
        }
    }
}
