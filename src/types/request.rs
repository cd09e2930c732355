use serde::{Deserialize, Deserializer, Serialize};

use super::session::SessionId;

/// Resource type of an intercepted request, as reported by the host.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// The top-level document load of a session.
    MainFrame,
    SubFrame,
    Script,
    Stylesheet,
    Image,
    Font,
    Media,
    Xmlhttprequest,
    Ping,
    #[default]
    #[serde(other)]
    Other,
}

impl RequestKind {
    pub fn is_top_level(self) -> bool {
        matches!(self, RequestKind::MainFrame)
    }
}

/// One outgoing network request, as handed over by the interception layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestDescriptor {
    pub id: String,
    pub url: String,
    /// URL of the document that issued the request, when known.
    #[serde(default)]
    pub document_url: Option<String>,
    /// Origin that initiated the request, when known.
    #[serde(default)]
    pub initiator: Option<String>,
    #[serde(default)]
    pub kind: RequestKind,
    /// Milliseconds since the Unix epoch. Hosts may send fractional values;
    /// they are truncated to whole milliseconds.
    #[serde(deserialize_with = "whole_millis")]
    pub timestamp: i64,
    /// `None` for requests that do not belong to any session (service workers,
    /// background fetches).
    #[serde(default)]
    pub session_id: Option<SessionId>,
}

fn whole_millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value.trunc() as i64)
}

/// Verdict returned to the network-interception boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Allow,
    Block,
}

impl Decision {
    pub fn is_block(self) -> bool {
        matches!(self, Decision::Block)
    }
}

/// An immutable record of one classified sub-resource request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestObservation {
    pub id: String,
    pub url: String,
    pub host: String,
    /// Base domain of `host`, or `host` itself when no base domain resolves.
    pub domain: String,
    pub kind: RequestKind,
    pub tracker: bool,
    pub third_party: bool,
    pub timestamp: i64,
    pub blocked: bool,
}

/// First sighting of a tracker base domain within a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackerHit {
    pub domain: String,
    pub host: String,
    pub url: String,
    pub timestamp: i64,
}

impl From<&RequestObservation> for TrackerHit {
    fn from(obs: &RequestObservation) -> Self {
        Self {
            domain: obs.domain.clone(),
            host: obs.host.clone(),
            url: obs.url.clone(),
            timestamp: obs.timestamp,
        }
    }
}

/// A request URL that matched a known hijacking indicator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HijackAlert {
    pub reason: String,
    pub url: String,
    pub timestamp: i64,
}

/// A script-level fingerprinting call reported by page instrumentation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FingerprintObservation {
    pub method: String,
    #[serde(default)]
    pub stack: Option<String>,
    pub timestamp: i64,
}
