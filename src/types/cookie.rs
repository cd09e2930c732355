use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A cookie as returned by the host cookie store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    /// Cookie domain attribute, possibly with a leading dot.
    pub domain: String,
    /// True for session-lifetime cookies.
    #[serde(default)]
    pub session: bool,
    /// Expiration as seconds since the Unix epoch, absent for session cookies.
    #[serde(default)]
    pub expiration_date: Option<f64>,
}

/// A persistent cookie living longer than a year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuperCookie {
    pub name: String,
    pub domain: String,
    pub lifetime_days: i64,
}

/// Cookie statistics for one session, replaced wholesale on every aggregation pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CookieAggregate {
    pub total: usize,
    pub first_party: usize,
    pub third_party: usize,
    pub session: usize,
    pub persistent: usize,
    pub super_cookies: Vec<SuperCookie>,
}

/// The same identifying (name, value) pair seen under several base domains.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncSignal {
    pub cookie: String,
    pub domains: BTreeSet<String>,
}
