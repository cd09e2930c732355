//! Score Engine: a pure, deterministic mapping from session state to a 0-100 score.

use crate::types::score::{RiskLabel, ScoreResult};
use crate::types::session::SessionRecord;

/// The counts the score depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreInputs {
    /// Distinct base domains among allowed third-party requests.
    pub third_party_domains: usize,
    /// Blocked requests that were trackers.
    pub blocked_trackers: usize,
    pub total_cookies: usize,
    pub sync_signals: usize,
    /// Local plus session storage entries.
    pub storage_entries: u64,
    pub fingerprints: usize,
    pub hijack_alerts: usize,
}

impl ScoreInputs {
    pub fn from_record(record: &SessionRecord) -> Self {
        Self {
            third_party_domains: record.third_party_domains().len(),
            blocked_trackers: record.blocked_tracker_count(),
            total_cookies: record.cookies().total,
            sync_signals: record.cookie_sync_signals().len(),
            storage_entries: record.storage().web_storage_entries(),
            fingerprints: record.fingerprints().len(),
            hijack_alerts: record.hijack_alert_count(),
        }
    }
}

/// Scores a set of inputs.
pub fn score(inputs: &ScoreInputs) -> ScoreResult {
    let mut value: i64 = 100;

    value -= penalty(inputs.third_party_domains, 5, 40);
    value -= penalty(inputs.blocked_trackers, 4, 20);
    value -= penalty(inputs.total_cookies / 5, 5, 20);
    if inputs.sync_signals > 0 {
        value -= penalty(inputs.sync_signals, 5, 15);
    }
    if inputs.storage_entries > 0 {
        value -= 10;
    }
    if inputs.fingerprints > 0 {
        value -= 15;
    }
    value -= penalty(inputs.hijack_alerts, 5, 20);

    let value = value.clamp(0, 100) as u8;
    ScoreResult {
        value,
        label: RiskLabel::for_value(value),
    }
}

/// Scores a session record.
pub fn evaluate(record: &SessionRecord) -> ScoreResult {
    score(&ScoreInputs::from_record(record))
}

fn penalty(count: usize, weight: i64, cap: i64) -> i64 {
    let count = i64::try_from(count).unwrap_or(i64::MAX);
    count.saturating_mul(weight).min(cap)
}
