//! Unit tests for the Request Classifier.

use std::collections::HashSet;

use rstest::rstest;

use privacy_sentinel::services::request_classifier::{classify, is_hijack_suspect, HIJACK_REASON};
use privacy_sentinel::services::tracker_lists::{TrackerListManager, TrackerListManagerTrait};
use privacy_sentinel::types::request::{Decision, RequestDescriptor, RequestKind};
use privacy_sentinel::types::session::SessionRecord;
use privacy_sentinel::types::settings::Settings;

fn lists(domains: &[&str]) -> TrackerListManager {
    let lists = TrackerListManager::new();
    lists.set_bundled(domains.iter().map(|d| d.to_string()).collect::<HashSet<_>>());
    lists
}

fn request(id: &str, url: &str, kind: RequestKind) -> RequestDescriptor {
    RequestDescriptor {
        id: id.to_string(),
        url: url.to_string(),
        document_url: None,
        initiator: None,
        kind,
        timestamp: 1_000,
        session_id: None,
    }
}

fn news_record() -> SessionRecord {
    SessionRecord::new("https://news.site/", "news.site", 1000, 0)
}

fn blocking(enabled: bool) -> Settings {
    Settings {
        blocking_enabled: enabled,
        ..Settings::default()
    }
}

#[test]
fn test_tracker_script_is_blocked() {
    let mut record = news_record();
    let lists = lists(&["doubleclick.net"]);
    let req = request("r1", "https://ad.doubleclick.net/x.js", RequestKind::Script);

    let verdict = classify(&mut record, &req, &lists, &blocking(true), 5);

    assert_eq!(verdict.decision, Decision::Block);
    let obs = verdict.observation.unwrap();
    assert!(obs.tracker);
    assert!(obs.third_party);
    assert!(obs.blocked);
    assert_eq!(obs.domain, "doubleclick.net");
    assert_eq!(obs.host, "ad.doubleclick.net");
    assert_eq!(obs.id, "r1-1000");

    assert_eq!(record.blocked_requests().len(), 1);
    assert!(record.third_party_requests().is_empty());
    assert_eq!(record.tracker_hits().len(), 1);
    assert_eq!(record.tracker_hits()[0].domain, "doubleclick.net");
    assert_eq!(record.blocked_tracker_count(), 1);
    assert_eq!(record.last_updated(), 5);
    assert_eq!(record.score().value, 96);
}

#[test]
fn test_tracker_allowed_when_blocking_disabled() {
    let mut record = news_record();
    let lists = lists(&["doubleclick.net"]);
    let req = request("r1", "https://ad.doubleclick.net/x.js", RequestKind::Script);

    let verdict = classify(&mut record, &req, &lists, &blocking(false), 5);

    assert_eq!(verdict.decision, Decision::Allow);
    assert!(verdict.observation.as_ref().unwrap().tracker);
    assert!(!verdict.observation.as_ref().unwrap().blocked);
    assert!(record.blocked_requests().is_empty());
    assert_eq!(record.third_party_requests().len(), 1);
    assert_eq!(record.tracker_hits().len(), 1);
    assert!(record.third_party_domains().contains("doubleclick.net"));
}

#[test]
fn test_first_party_request_records_nothing() {
    let mut record = news_record();
    let lists = lists(&["doubleclick.net"]);
    let req = request("r1", "https://cdn.news.site/app.js", RequestKind::Script);

    let verdict = classify(&mut record, &req, &lists, &blocking(true), 5);

    assert_eq!(verdict.decision, Decision::Allow);
    let obs = verdict.observation.unwrap();
    assert!(!obs.third_party);
    assert!(!obs.tracker);
    assert!(record.third_party_requests().is_empty());
    assert!(record.blocked_requests().is_empty());
    assert_eq!(record.score().value, 100);
}

#[test]
fn test_non_tracker_third_party_is_logged() {
    let mut record = news_record();
    let lists = lists(&[]);
    let req = request("r1", "https://fonts.cdn.com/font.woff", RequestKind::Font);

    classify(&mut record, &req, &lists, &blocking(true), 5);

    assert_eq!(record.third_party_requests().len(), 1);
    assert!(record.tracker_hits().is_empty());
    assert!(record.contacted_domains().contains("cdn.com"));
    assert!(record.contacted_domains().contains("fonts.cdn.com"));
}

#[test]
fn test_first_party_tracker_is_blocked_but_not_third_party() {
    let mut record = SessionRecord::new("https://tracker.net/", "tracker.net", 1000, 0);
    let lists = lists(&["tracker.net"]);
    let req = request("r1", "https://tracker.net/pixel.gif", RequestKind::Image);

    let verdict = classify(&mut record, &req, &lists, &blocking(true), 5);

    assert_eq!(verdict.decision, Decision::Block);
    assert!(!verdict.observation.unwrap().third_party);
    assert_eq!(record.blocked_requests().len(), 1);
}

#[test]
fn test_tracker_hits_dedupe_by_base_domain() {
    let mut record = news_record();
    let lists = lists(&["doubleclick.net"]);
    for (i, host) in ["a.doubleclick.net", "b.doubleclick.net", "doubleclick.net"].iter().enumerate() {
        let req = request(&i.to_string(), &format!("https://{}/x", host), RequestKind::Script);
        classify(&mut record, &req, &lists, &blocking(true), 5);
    }

    assert_eq!(record.tracker_hits().len(), 1);
    assert_eq!(record.tracker_hits()[0].host, "a.doubleclick.net");
    assert_eq!(record.blocked_requests().len(), 3);
    assert_eq!(record.blocked_tracker_count(), 3);
}

#[rstest]
#[case("not a url")]
#[case("")]
#[case("data:text/plain,hello")]
fn test_unparseable_url_is_allowed_without_recording(#[case] url: &str) {
    let mut record = news_record();
    let lists = lists(&["doubleclick.net"]);
    let req = request("r1", url, RequestKind::Other);

    let verdict = classify(&mut record, &req, &lists, &blocking(true), 5);

    assert_eq!(verdict.decision, Decision::Allow);
    assert!(verdict.observation.is_none());
    assert!(record.third_party_requests().is_empty());
    assert!(record.blocked_requests().is_empty());
    assert_eq!(record.last_updated(), 0, "record untouched");
}

#[test]
fn test_first_party_derived_from_document_url() {
    let mut record = SessionRecord::new("", "", 1000, 0);
    let lists = lists(&[]);
    let mut req = request("r1", "https://cdn.other.com/x.js", RequestKind::Script);
    req.document_url = Some("https://www.shop.co.uk/basket".to_string());

    let verdict = classify(&mut record, &req, &lists, &blocking(true), 5);

    assert_eq!(record.first_party_domain(), "shop.co.uk");
    assert!(verdict.observation.unwrap().third_party);
}

#[test]
fn test_first_party_falls_back_to_request_url() {
    let mut record = SessionRecord::new("", "", 1000, 0);
    let lists = lists(&[]);
    let req = request("r1", "https://cdn.other.com/x.js", RequestKind::Script);

    let verdict = classify(&mut record, &req, &lists, &blocking(true), 5);

    assert_eq!(record.first_party_domain(), "other.com");
    assert!(!verdict.observation.unwrap().third_party);
}

#[test]
fn test_hijack_keyword_raises_alert() {
    let mut record = news_record();
    let lists = lists(&[]);
    let req = request("r1", "https://evil.example/HOOK.JS", RequestKind::Script);

    let verdict = classify(&mut record, &req, &lists, &blocking(true), 5);

    assert_eq!(verdict.decision, Decision::Allow);
    let alert = verdict.hijack.unwrap();
    assert_eq!(alert.reason, HIJACK_REASON);
    assert_eq!(alert.url, "https://evil.example/HOOK.JS");
    assert_eq!(record.hijack_alerts().len(), 1);
    assert_eq!(record.hijack_alert_count(), 1);
    // One third-party domain (5) plus one hijack alert (5).
    assert_eq!(record.score().value, 90);
}

#[rstest]
#[case("https://x.com/beef/hook", true)]
#[case("https://x.com/toolbar/installer.exe", true)]
#[case("https://x.com/extension-dll", true)]
#[case("https://x.com/KeyLogger", true)]
#[case("https://browser-hijack.example/", true)]
#[case("https://x.com/toolbar/settings", false)]
#[case("https://x.com/hook.json", true)]
#[case("https://x.com/app.js", false)]
#[case("", false)]
fn test_hijack_suspect_keywords(#[case] url: &str, #[case] expected: bool) {
    assert_eq!(is_hijack_suspect(url), expected, "url={url:?}");
}

#[test]
fn test_retention_cap_does_not_change_score() {
    let mut capped = SessionRecord::new("https://news.site/", "news.site", 2, 0);
    let mut uncapped = SessionRecord::new("https://news.site/", "news.site", 1000, 0);
    let lists = lists(&[]);
    for i in 0..6 {
        let req = request(&i.to_string(), &format!("https://cdn{}.net/x", i), RequestKind::Image);
        classify(&mut capped, &req, &lists, &blocking(true), 5);
        classify(&mut uncapped, &req, &lists, &blocking(true), 5);
    }

    assert_eq!(capped.third_party_requests().len(), 2);
    assert_eq!(uncapped.third_party_requests().len(), 6);
    assert_eq!(capped.score(), uncapped.score());
    assert_eq!(capped.third_party_requests()[1].url, "https://cdn5.net/x");
}
