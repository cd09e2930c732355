//! Request Classifier.
//!
//! Turns one sub-resource request into an allow/block decision and records it
//! into the owning session. Runs entirely against in-memory state: the lookup
//! cache and the session record. Nothing here awaits.

use crate::services::domain::{base_domain_of_url, effective_domain, host_of};
use crate::services::tracker_lists::TrackerListManagerTrait;
use crate::types::request::{Decision, HijackAlert, RequestDescriptor, RequestObservation};
use crate::types::session::SessionRecord;
use crate::types::settings::Settings;

/// URL fragments associated with hijacking kits and keyloggers.
pub const HIJACK_KEYWORDS: &[&str] = &[
    "beef",
    "hook.js",
    "browser-hijack",
    "keylogger",
    "toolbar/installer",
    "extension-dll",
];

pub const HIJACK_REASON: &str = "Possible hijacking attempt detected from the URL pattern";

/// Outcome of classifying one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub decision: Decision,
    /// `None` when the request could not be resolved and nothing was recorded.
    pub observation: Option<RequestObservation>,
    /// The hijack alert raised by this request, if any.
    pub hijack: Option<HijackAlert>,
}

impl Verdict {
    fn allow_unrecorded() -> Self {
        Self {
            decision: Decision::Allow,
            observation: None,
            hijack: None,
        }
    }
}

/// Case-insensitive keyword scan of the full URL.
pub fn is_hijack_suspect(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }
    let lower = url.to_lowercase();
    HIJACK_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// Classifies a sub-resource request against `record`.
///
/// Top-level document loads are handled by the caller (they reset the record)
/// and must not be passed here.
pub fn classify<L>(
    record: &mut SessionRecord,
    request: &RequestDescriptor,
    lists: &L,
    settings: &Settings,
    now: i64,
) -> Verdict
where
    L: TrackerListManagerTrait + ?Sized,
{
    let host = host_of(&request.url);
    if host.is_empty() {
        return Verdict::allow_unrecorded();
    }
    let base_domain = effective_domain(&host);

    if record.first_party_domain().is_empty() {
        let page = request
            .document_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| {
                if record.url().is_empty() {
                    request.url.as_str()
                } else {
                    record.url()
                }
            })
            .to_string();
        record.set_first_party_domain(&base_domain_of_url(&page));
    }
    let first_party = record.first_party_domain();

    let third_party = !first_party.is_empty() && !base_domain.is_empty() && first_party != base_domain;
    let tracker = lists.matches(&host) || (!base_domain.is_empty() && lists.matches(&base_domain));
    let block = tracker && settings.blocking_enabled;

    let observation = RequestObservation {
        id: format!("{}-{}", request.id, request.timestamp),
        url: request.url.clone(),
        domain: if base_domain.is_empty() { host.clone() } else { base_domain },
        host,
        kind: request.kind,
        tracker,
        third_party,
        timestamp: request.timestamp,
        blocked: block,
    };

    if block {
        record.note_tracker_hit(&observation);
        record.record_blocked(observation.clone());
    } else {
        if tracker {
            record.note_tracker_hit(&observation);
        }
        if third_party {
            record.record_third_party(observation.clone());
        }
    }

    let hijack = if is_hijack_suspect(&request.url) {
        let alert = HijackAlert {
            reason: HIJACK_REASON.to_string(),
            url: request.url.clone(),
            timestamp: request.timestamp,
        };
        record.push_hijack_alert(alert.clone());
        Some(alert)
    } else {
        None
    };

    record.touch(now);

    Verdict {
        decision: if block { Decision::Block } else { Decision::Allow },
        observation: Some(observation),
        hijack,
    }
}
