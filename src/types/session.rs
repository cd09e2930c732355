use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::cookie::{CookieAggregate, SyncSignal};
use super::request::{FingerprintObservation, HijackAlert, RequestObservation, TrackerHit};
use super::score::ScoreResult;

/// Opaque per-tab session identifier. Hosts may send it as a string or an integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawSessionId", into = "String")]
pub struct SessionId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSessionId {
    Number(i64),
    Text(String),
}

impl From<RawSessionId> for SessionId {
    fn from(raw: RawSessionId) -> Self {
        match raw {
            RawSessionId::Number(n) => SessionId(n.to_string()),
            RawSessionId::Text(s) => SessionId(s),
        }
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        SessionId(s.to_string())
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        SessionId(s)
    }
}

impl From<u64> for SessionId {
    fn from(n: u64) -> Self {
        SessionId(n.to_string())
    }
}

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Entry count and byte size of one web storage area.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StorageArea {
    #[serde(default)]
    pub entries: u64,
    #[serde(default)]
    pub size: u64,
}

/// Number of indexed databases, or a marker when the page could not enumerate them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum IndexedDbCount {
    Known(u64),
    Unknown(String),
}

impl Default for IndexedDbCount {
    fn default() -> Self {
        IndexedDbCount::Known(0)
    }
}

/// Client-side storage usage reported by page instrumentation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StorageSnapshot {
    pub local: StorageArea,
    pub session: StorageArea,
    pub indexed_db: IndexedDbCount,
}

impl StorageSnapshot {
    pub fn web_storage_entries(&self) -> u64 {
        self.local.entries.saturating_add(self.session.entries)
    }
}

/// A partial storage update; absent parts keep their previous value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StorageUpdate {
    #[serde(default)]
    pub local: Option<StorageArea>,
    #[serde(default)]
    pub session: Option<StorageArea>,
    #[serde(default, alias = "indexedDB", alias = "indexedStoreCount")]
    pub indexed_db: Option<IndexedDbCount>,
}

/// All mutable privacy state of one session.
///
/// Logs are append-only and capped at `retention` entries (oldest dropped).
/// The aggregates the score depends on are kept beside the logs so the cap
/// never changes a score.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    url: String,
    first_party_domain: String,
    third_party_requests: VecDeque<RequestObservation>,
    tracker_hits: Vec<TrackerHit>,
    blocked_requests: VecDeque<RequestObservation>,
    cookies: CookieAggregate,
    cookie_sync_signals: Vec<SyncSignal>,
    storage: StorageSnapshot,
    fingerprints: VecDeque<FingerprintObservation>,
    hijack_alerts: VecDeque<HijackAlert>,
    score: ScoreResult,
    last_updated: i64,

    third_party_domains: BTreeSet<String>,
    contacted_domains: BTreeSet<String>,
    blocked_tracker_count: usize,
    hijack_alert_count: usize,
    retention: usize,
}

impl SessionRecord {
    pub fn new(url: &str, first_party_domain: &str, retention: usize, now: i64) -> Self {
        Self {
            url: url.to_string(),
            first_party_domain: first_party_domain.to_string(),
            third_party_requests: VecDeque::new(),
            tracker_hits: Vec::new(),
            blocked_requests: VecDeque::new(),
            cookies: CookieAggregate::default(),
            cookie_sync_signals: Vec::new(),
            storage: StorageSnapshot::default(),
            fingerprints: VecDeque::new(),
            hijack_alerts: VecDeque::new(),
            score: ScoreResult::default(),
            last_updated: now,
            third_party_domains: BTreeSet::new(),
            contacted_domains: BTreeSet::new(),
            blocked_tracker_count: 0,
            hijack_alert_count: 0,
            retention: retention.max(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn first_party_domain(&self) -> &str {
        &self.first_party_domain
    }

    pub(crate) fn set_first_party_domain(&mut self, domain: &str) {
        self.first_party_domain = domain.to_string();
    }

    pub fn third_party_requests(&self) -> &VecDeque<RequestObservation> {
        &self.third_party_requests
    }

    pub fn tracker_hits(&self) -> &[TrackerHit] {
        &self.tracker_hits
    }

    pub fn blocked_requests(&self) -> &VecDeque<RequestObservation> {
        &self.blocked_requests
    }

    pub fn cookies(&self) -> &CookieAggregate {
        &self.cookies
    }

    pub fn cookie_sync_signals(&self) -> &[SyncSignal] {
        &self.cookie_sync_signals
    }

    pub fn storage(&self) -> &StorageSnapshot {
        &self.storage
    }

    pub fn fingerprints(&self) -> &VecDeque<FingerprintObservation> {
        &self.fingerprints
    }

    pub fn hijack_alerts(&self) -> &VecDeque<HijackAlert> {
        &self.hijack_alerts
    }

    pub fn score(&self) -> ScoreResult {
        self.score
    }

    pub fn last_updated(&self) -> i64 {
        self.last_updated
    }

    /// Distinct base domains of allowed third-party requests.
    pub fn third_party_domains(&self) -> &BTreeSet<String> {
        &self.third_party_domains
    }

    /// Every host and base domain seen in the third-party and blocked logs.
    pub fn contacted_domains(&self) -> &BTreeSet<String> {
        &self.contacted_domains
    }

    pub fn blocked_tracker_count(&self) -> usize {
        self.blocked_tracker_count
    }

    pub fn hijack_alert_count(&self) -> usize {
        self.hijack_alert_count
    }

    pub fn record_third_party(&mut self, obs: RequestObservation) {
        if !obs.blocked && !obs.domain.is_empty() {
            self.third_party_domains.insert(obs.domain.clone());
        }
        self.note_contacted(&obs);
        push_capped(&mut self.third_party_requests, obs, self.retention);
    }

    pub fn record_blocked(&mut self, obs: RequestObservation) {
        if obs.tracker {
            self.blocked_tracker_count += 1;
        }
        self.note_contacted(&obs);
        push_capped(&mut self.blocked_requests, obs, self.retention);
    }

    /// Adds a tracker hit unless one with the same base domain already exists.
    /// Returns true when the hit was new.
    pub fn note_tracker_hit(&mut self, obs: &RequestObservation) -> bool {
        if self.tracker_hits.iter().any(|hit| hit.domain == obs.domain) {
            return false;
        }
        self.tracker_hits.push(TrackerHit::from(obs));
        true
    }

    pub fn push_hijack_alert(&mut self, alert: HijackAlert) {
        self.hijack_alert_count += 1;
        push_capped(&mut self.hijack_alerts, alert, self.retention);
    }

    pub fn push_fingerprint(&mut self, observation: FingerprintObservation) {
        push_capped(&mut self.fingerprints, observation, self.retention);
    }

    pub fn apply_storage(&mut self, update: StorageUpdate) {
        if let Some(local) = update.local {
            self.storage.local = local;
        }
        if let Some(session) = update.session {
            self.storage.session = session;
        }
        if let Some(indexed_db) = update.indexed_db {
            self.storage.indexed_db = indexed_db;
        }
    }

    pub fn replace_cookies(&mut self, cookies: CookieAggregate, signals: Vec<SyncSignal>) {
        self.cookies = cookies;
        self.cookie_sync_signals = signals;
    }

    /// Recomputes the score from the current state and stamps the update time.
    pub fn touch(&mut self, now: i64) {
        self.score = crate::services::score_engine::evaluate(self);
        self.last_updated = now;
    }

    /// Bounded, serializable view of the record.
    pub fn snapshot(&self, limits: SnapshotLimits) -> SessionSnapshot {
        SessionSnapshot {
            url: self.url.clone(),
            first_party_domain: self.first_party_domain.clone(),
            third_party_requests: tail(&self.third_party_requests, limits.requests),
            tracker_hits: tail(&self.tracker_hits, limits.requests),
            blocked_requests: tail(&self.blocked_requests, limits.requests),
            cookies: self.cookies.clone(),
            cookie_sync_signals: self.cookie_sync_signals.clone(),
            storage: self.storage.clone(),
            fingerprints: tail(&self.fingerprints, limits.signals),
            hijack_alerts: tail(&self.hijack_alerts, limits.signals),
            score: self.score,
            last_updated: self.last_updated,
        }
    }

    fn note_contacted(&mut self, obs: &RequestObservation) {
        if !obs.domain.is_empty() {
            self.contacted_domains.insert(obs.domain.clone());
        }
        if !obs.host.is_empty() {
            self.contacted_domains.insert(obs.host.clone());
        }
    }
}

fn push_capped<T>(log: &mut VecDeque<T>, item: T, cap: usize) {
    while log.len() >= cap {
        log.pop_front();
    }
    log.push_back(item);
}

fn tail<'a, T, I>(items: I, n: usize) -> Vec<T>
where
    T: Clone + 'a,
    I: IntoIterator<Item = &'a T>,
    I::IntoIter: ExactSizeIterator,
{
    let iter = items.into_iter();
    let skip = iter.len().saturating_sub(n);
    iter.skip(skip).cloned().collect()
}

/// How many entries of each list a snapshot carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotLimits {
    /// Bound for third-party, tracker-hit and blocked lists.
    pub requests: usize,
    /// Bound for fingerprint and hijack-alert lists.
    pub signals: usize,
}

impl Default for SnapshotLimits {
    fn default() -> Self {
        Self {
            requests: 100,
            signals: 20,
        }
    }
}

/// Response body of a data query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSnapshot {
    pub url: String,
    pub first_party_domain: String,
    pub third_party_requests: Vec<RequestObservation>,
    pub tracker_hits: Vec<TrackerHit>,
    pub blocked_requests: Vec<RequestObservation>,
    pub cookies: CookieAggregate,
    pub cookie_sync_signals: Vec<SyncSignal>,
    pub storage: StorageSnapshot,
    pub fingerprints: Vec<FingerprintObservation>,
    pub hijack_alerts: Vec<HijackAlert>,
    pub score: ScoreResult,
    pub last_updated: i64,
}
