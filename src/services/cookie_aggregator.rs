//! Cookie Aggregator.
//!
//! Queries the host cookie store for every domain a session has touched and
//! folds the results into counts, supercookies and cookie-sync signals.
//! A failed per-domain query contributes no cookies; a pass never aborts.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{PoisonError, RwLock};

use futures::future::{join_all, BoxFuture};
use log::debug;

use crate::services::domain::{base_domain_of_cookie, host_of};
use crate::types::cookie::{Cookie, CookieAggregate, SuperCookie, SyncSignal};
use crate::types::errors::CookieQueryError;
use crate::types::session::SessionRecord;

const DAY_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;
const SUPERCOOKIE_MIN_LIFETIME_MS: f64 = 365.0 * DAY_MS;
/// Values this short are too weak to identify a user across sites.
const SYNC_MIN_VALUE_LEN: usize = 16;

/// Host-provided cookie lookup.
pub trait CookieStore: Send + Sync {
    fn get_all<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, Result<Vec<Cookie>, CookieQueryError>>;
}

/// Cookie jar pushed in by the host, answering lookups the way a browser does:
/// a query for `example.com` returns cookies for `example.com` and its subdomains.
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    cookies: RwLock<Vec<Cookie>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, cookies: Vec<Cookie>) {
        *self.cookies.write().unwrap_or_else(PoisonError::into_inner) = cookies;
    }

    fn matching(&self, domain: &str) -> Vec<Cookie> {
        let domain = domain.trim_start_matches('.').to_lowercase();
        let suffix = format!(".{}", domain);
        self.cookies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|cookie| {
                let cookie_domain = cookie.domain.trim_start_matches('.').to_lowercase();
                cookie_domain == domain || cookie_domain.ends_with(&suffix)
            })
            .cloned()
            .collect()
    }
}

impl CookieStore for MemoryCookieStore {
    fn get_all<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, Result<Vec<Cookie>, CookieQueryError>> {
        let cookies = self.matching(domain);
        Box::pin(async move { Ok(cookies) })
    }
}

/// Result of one aggregation pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CookieReport {
    pub aggregate: CookieAggregate,
    pub sync_signals: Vec<SyncSignal>,
}

/// First-party base domain and host plus every contacted domain and host.
pub fn domains_of_interest(record: &SessionRecord) -> BTreeSet<String> {
    let mut domains = BTreeSet::new();
    if !record.first_party_domain().is_empty() {
        domains.insert(record.first_party_domain().to_string());
    }
    let host = host_of(record.url());
    if !host.is_empty() {
        domains.insert(host);
    }
    domains.extend(record.contacted_domains().iter().cloned());
    domains
}

/// Queries every domain concurrently. Failures are logged and skipped.
pub async fn collect(store: &dyn CookieStore, domains: &BTreeSet<String>) -> Vec<Cookie> {
    let lookups = domains.iter().map(|domain| store.get_all(domain));
    join_all(lookups)
        .await
        .into_iter()
        .flat_map(|result| match result {
            Ok(cookies) => cookies,
            Err(e) => {
                debug!("{}", e);
                Vec::new()
            }
        })
        .collect()
}

/// Folds `cookies` into a report. `now_ms` is milliseconds since the Unix epoch.
pub fn aggregate(
    cookies: &[Cookie],
    first_party_domain: &str,
    now_ms: i64,
    supercookie_limit: usize,
) -> CookieReport {
    let mut aggregate = CookieAggregate::default();
    let mut sync_candidates: BTreeMap<(&str, &str), BTreeSet<String>> = BTreeMap::new();

    for cookie in cookies {
        aggregate.total += 1;
        let cookie_base = base_domain_of_cookie(&cookie.domain);
        if cookie_base == first_party_domain {
            aggregate.first_party += 1;
        } else {
            aggregate.third_party += 1;
        }

        if cookie.session {
            aggregate.session += 1;
        } else {
            aggregate.persistent += 1;
            if let Some(expires) = cookie.expiration_date {
                let lifetime_ms = expires * 1000.0 - now_ms as f64;
                if lifetime_ms > SUPERCOOKIE_MIN_LIFETIME_MS
                    && aggregate.super_cookies.len() < supercookie_limit
                {
                    aggregate.super_cookies.push(SuperCookie {
                        name: cookie.name.clone(),
                        domain: cookie.domain.clone(),
                        lifetime_days: (lifetime_ms / DAY_MS).round() as i64,
                    });
                }
            }
        }

        if cookie.value.chars().count() > SYNC_MIN_VALUE_LEN {
            let domain = if cookie_base.is_empty() {
                cookie.domain.clone()
            } else {
                cookie_base
            };
            sync_candidates
                .entry((cookie.name.as_str(), cookie.value.as_str()))
                .or_default()
                .insert(domain);
        }
    }

    let sync_signals = sync_candidates
        .into_iter()
        .filter(|(_, domains)| domains.len() > 1)
        .map(|((name, _), domains)| SyncSignal {
            cookie: name.to_string(),
            domains,
        })
        .collect();

    CookieReport {
        aggregate,
        sync_signals,
    }
}

/// Runs a full pass for `record`: gather domains, query, aggregate.
pub async fn run(
    store: &dyn CookieStore,
    record: &SessionRecord,
    now_ms: i64,
    supercookie_limit: usize,
) -> CookieReport {
    let domains = domains_of_interest(record);
    let cookies = collect(store, &domains).await;
    aggregate(&cookies, record.first_party_domain(), now_ms, supercookie_limit)
}
