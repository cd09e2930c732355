//! Tracker List Manager.
//!
//! Owns the bundled, remote and custom domain sets plus their merged lookup
//! cache. The cache is rebuilt synchronously on every set mutation and is
//! swapped under a write lock, so each lookup sees one consistent snapshot.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use log::{info, warn};
use serde::Deserialize;

use crate::services::easylist;
use crate::services::list_source::ListSource;
use crate::types::errors::{FetchError, ListError};

/// Tracker list compiled into the binary.
pub const DEFAULT_BUNDLED_LIST: &str = include_str!("../../data/tracker-list.json");

/// Trait defining tracker list operations.
pub trait TrackerListManagerTrait {
    fn matches(&self, host_or_domain: &str) -> bool;
    fn set_bundled(&self, domains: HashSet<String>);
    fn set_remote(&self, domains: HashSet<String>);
    fn set_custom(&self, domains: &[String]);
    fn stats(&self) -> ListStats;
}

/// Sizes of the individual sets, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct ListStats {
    pub bundled: usize,
    pub remote: usize,
    pub custom: usize,
    pub merged: usize,
}

#[derive(Default)]
struct Lists {
    bundled: HashSet<String>,
    remote: HashSet<String>,
    custom: HashSet<String>,
    cache: Arc<HashSet<String>>,
}

impl Lists {
    fn rebuild(&mut self) {
        let merged: HashSet<String> = self
            .bundled
            .iter()
            .chain(self.remote.iter())
            .chain(self.custom.iter())
            .cloned()
            .collect();
        self.cache = Arc::new(merged);
    }
}

#[derive(Deserialize)]
struct BundledList {
    #[serde(default)]
    domains: Vec<serde_json::Value>,
}

/// Thread-safe owner of the three tracker sets.
#[derive(Default)]
pub struct TrackerListManager {
    lists: RwLock<Lists>,
}

impl TrackerListManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current merged cache. Callers may hold it across many lookups.
    pub fn cache(&self) -> Arc<HashSet<String>> {
        self.lists
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .cache
            .clone()
    }

    /// Loads the bundled set from a `{"domains": [...]}` document.
    /// Non-string entries are ignored. Returns the number of domains loaded.
    pub fn load_bundled_from_str(&self, json: &str) -> Result<usize, ListError> {
        let parsed: BundledList =
            serde_json::from_str(json).map_err(|e| ListError::BundledLoad(e.to_string()))?;
        let domains: HashSet<String> = parsed
            .domains
            .iter()
            .filter_map(|entry| entry.as_str())
            .map(|entry| entry.trim().to_lowercase())
            .filter(|entry| !entry.is_empty())
            .collect();
        let count = domains.len();
        self.set_bundled(domains);
        Ok(count)
    }

    pub fn load_bundled_from_path(&self, path: &Path) -> Result<usize, ListError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ListError::BundledLoad(format!("{}: {}", path.display(), e)))?;
        self.load_bundled_from_str(&content)
    }

    /// Tries each mirror in order and installs the first non-empty parse.
    ///
    /// When every mirror fails the remote set keeps its previous contents.
    pub async fn refresh_remote(
        &self,
        source: &dyn ListSource,
        mirrors: &[String],
    ) -> Result<usize, ListError> {
        for url in mirrors {
            match Self::fetch_mirror(source, url).await {
                Ok(domains) => {
                    let count = domains.len();
                    self.set_remote(domains);
                    info!("EasyList loaded from {} ({} domains)", url, count);
                    return Ok(count);
                }
                Err(e) => warn!("Skipping EasyList mirror {}: {}", url, e),
            }
        }
        Err(ListError::AllMirrorsFailed(mirrors.len()))
    }

    async fn fetch_mirror(
        source: &dyn ListSource,
        url: &str,
    ) -> Result<HashSet<String>, FetchError> {
        let body = source.fetch(url).await?;
        let domains = easylist::parse(&body);
        if domains.is_empty() {
            return Err(FetchError::EmptyList(url.to_string()));
        }
        Ok(domains)
    }

    fn mutate(&self, f: impl FnOnce(&mut Lists)) {
        let mut lists = self.lists.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut lists);
        lists.rebuild();
    }
}

impl TrackerListManagerTrait for TrackerListManager {
    /// Exact match first, then every suffix down to two labels.
    fn matches(&self, host_or_domain: &str) -> bool {
        if host_or_domain.is_empty() {
            return false;
        }
        let cache = self.cache();
        let target = host_or_domain.to_lowercase();
        if cache.contains(&target) {
            return true;
        }
        let mut rest = target.as_str();
        while rest.split('.').count() > 2 {
            match rest.split_once('.') {
                Some((_, tail)) => rest = tail,
                None => break,
            }
            if cache.contains(rest) {
                return true;
            }
        }
        false
    }

    fn set_bundled(&self, domains: HashSet<String>) {
        self.mutate(|lists| lists.bundled = domains);
    }

    fn set_remote(&self, domains: HashSet<String>) {
        self.mutate(|lists| lists.remote = domains);
    }

    /// Lowercases and trims the user's entries, dropping empty ones.
    fn set_custom(&self, domains: &[String]) {
        let custom: HashSet<String> = domains
            .iter()
            .map(|d| d.trim().to_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        self.mutate(|lists| lists.custom = custom);
    }

    fn stats(&self) -> ListStats {
        let lists = self.lists.read().unwrap_or_else(PoisonError::into_inner);
        ListStats {
            bundled: lists.bundled.len(),
            remote: lists.remote.len(),
            custom: lists.custom.len(),
            merged: lists.cache.len(),
        }
    }
}
