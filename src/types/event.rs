use serde::{Deserialize, Serialize};

use super::request::RequestDescriptor;
use super::session::{SessionId, StorageUpdate};
use super::settings::Settings;

/// A top-level or frame navigation has committed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NavigationCommitted {
    pub session_id: SessionId,
    pub url: String,
    #[serde(default = "default_true")]
    pub is_top_level: bool,
}

fn default_true() -> bool {
    true
}

/// A session's document finished loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NavigationCompleted {
    pub session_id: SessionId,
    pub url: String,
}

/// Events that only name a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRef {
    pub session_id: SessionId,
}

/// Storage usage reported by page instrumentation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageReport {
    pub session_id: SessionId,
    /// URL of the reporting page, used when the session is not yet known.
    #[serde(default)]
    pub page_url: Option<String>,
    #[serde(flatten)]
    pub update: StorageUpdate,
}

/// A fingerprinting API call reported by page instrumentation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FingerprintReport {
    pub session_id: SessionId,
    pub method: String,
    #[serde(default)]
    pub stack: Option<String>,
    #[serde(default)]
    pub page_url: Option<String>,
}

/// Request for a session snapshot; `None` targets the foreground session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DataQuery {
    #[serde(default)]
    pub session_id: Option<SessionId>,
}

/// Every inbound signal the engine understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Request(RequestDescriptor),
    NavigationCommitted(NavigationCommitted),
    NavigationCompleted(NavigationCompleted),
    SessionActivated(SessionRef),
    SessionTeardown(SessionRef),
    StorageSnapshot(StorageReport),
    Fingerprint(FingerprintReport),
    SettingsChanged(Settings),
    DataQuery(DataQuery),
    ListStats,
    Ping,
}

/// Kind of a best-effort user notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    BlockedTracker,
    HijackAlert,
}

/// A fire-and-forget notification request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: String,
    pub category: NotificationCategory,
    pub title: String,
    pub message: String,
}
