//! Sentinel core.
//!
//! Central struct owning the tracker lists, the session store, the current
//! settings and the host collaborators. One method per inbound signal; the
//! event router maps decoded events onto these.

use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, error, info, warn};
use tokio::task::JoinHandle;

use crate::managers::session_manager::{now_millis, SessionManager, SessionManagerTrait};
use crate::services::cookie_aggregator::{self, CookieStore};
use crate::services::domain::is_web_url;
use crate::services::list_source::ListSource;
use crate::services::notifier::{self, Notifier};
use crate::services::request_classifier;
use crate::services::tracker_lists::{TrackerListManager, TrackerListManagerTrait, DEFAULT_BUNDLED_LIST};
use crate::types::errors::{ListError, QueryError};
use crate::types::event::{
    DataQuery, FingerprintReport, NavigationCommitted, NavigationCompleted, StorageReport,
};
use crate::types::request::{Decision, FingerprintObservation, RequestDescriptor};
use crate::types::session::{SessionId, SessionSnapshot};
use crate::types::settings::{EngineConfig, Settings};

/// Central engine struct.
pub struct Sentinel {
    config: EngineConfig,
    settings: RwLock<Arc<Settings>>,
    tracker_lists: Arc<TrackerListManager>,
    sessions: SessionManager,
    cookie_store: Arc<dyn CookieStore>,
    notifier: Arc<dyn Notifier>,
    foreground: RwLock<Option<SessionId>>,
}

impl Sentinel {
    /// Creates the engine with the given settings applied. Lists start empty;
    /// call `startup` to load them.
    pub fn new(
        config: EngineConfig,
        settings: Settings,
        cookie_store: Arc<dyn CookieStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let tracker_lists = Arc::new(TrackerListManager::new());
        tracker_lists.set_custom(&settings.custom_domains);
        let sessions = SessionManager::new(config.retention_limit);

        Self {
            config,
            settings: RwLock::new(Arc::new(settings)),
            tracker_lists,
            sessions,
            cookie_store,
            notifier,
            foreground: RwLock::new(None),
        }
    }

    /// Startup sequence: load the bundled list, then refresh the remote list in the background.
    pub fn startup(&self, source: Arc<dyn ListSource>) -> JoinHandle<Result<usize, ListError>> {
        self.load_bundled();
        self.spawn_remote_refresh(source)
    }

    /// Loads the bundled list. Failure leaves the set empty and is only logged.
    pub fn load_bundled(&self) {
        let result = match &self.config.bundled_list_path {
            Some(path) => self.tracker_lists.load_bundled_from_path(path),
            None => self.tracker_lists.load_bundled_from_str(DEFAULT_BUNDLED_LIST),
        };
        match result {
            Ok(count) => info!("Bundled tracker list loaded ({} domains)", count),
            Err(e) => error!("{}", e),
        }
    }

    /// Fetches the remote list without blocking classification.
    pub fn spawn_remote_refresh(
        &self,
        source: Arc<dyn ListSource>,
    ) -> JoinHandle<Result<usize, ListError>> {
        let lists = Arc::clone(&self.tracker_lists);
        let mirrors = self.config.easylist_mirrors.clone();
        tokio::spawn(async move {
            let result = lists.refresh_remote(source.as_ref(), &mirrors).await;
            if let Err(e) = &result {
                warn!("Remote tracker list unavailable: {}", e);
            }
            result
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn settings(&self) -> Arc<Settings> {
        Arc::clone(&self.settings.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn tracker_lists(&self) -> &TrackerListManager {
        &self.tracker_lists
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn foreground(&self) -> Option<SessionId> {
        self.foreground
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Decides one outgoing request. `None` means the request has no owning
    /// session and was ignored.
    pub fn classify(&self, request: &RequestDescriptor) -> Option<Decision> {
        let id = request.session_id.as_ref()?;

        if request.kind.is_top_level() {
            self.sessions.reset(id, &request.url);
            return Some(Decision::Allow);
        }

        let settings = self.settings();
        let fallback_url = request
            .document_url
            .as_deref()
            .or(request.initiator.as_deref())
            .unwrap_or(&request.url);

        let verdict = self.sessions.with_record_or_create(id, fallback_url, |record| {
            request_classifier::classify(
                record,
                request,
                self.tracker_lists.as_ref(),
                &settings,
                now_millis(),
            )
        });

        if settings.notifications_enabled {
            if let Some(obs) = verdict.observation.as_ref().filter(|obs| obs.blocked) {
                notifier::emit(self.notifier.as_ref(), notifier::blocked_tracker(&obs.domain));
            }
            if let Some(alert) = &verdict.hijack {
                notifier::emit(self.notifier.as_ref(), notifier::hijack_alert(&alert.url));
            }
        }

        Some(verdict.decision)
    }

    /// A committed top-level navigation replaces the session record.
    pub fn navigation_committed(&self, nav: &NavigationCommitted) {
        if nav.is_top_level {
            self.sessions.reset(&nav.session_id, &nav.url);
        }
    }

    /// A finished load triggers a cookie pass.
    pub async fn navigation_completed(&self, nav: &NavigationCompleted) -> bool {
        self.sessions.ensure(&nav.session_id, &nav.url);
        self.refresh_cookies(&nav.session_id).await
    }

    pub fn session_activated(&self, id: &SessionId) {
        *self.foreground.write().unwrap_or_else(PoisonError::into_inner) = Some(id.clone());
    }

    /// Discards all state for `id`. In-flight cookie passes for it become no-ops.
    pub fn teardown(&self, id: &SessionId) {
        self.sessions.destroy(id);
        let mut foreground = self.foreground.write().unwrap_or_else(PoisonError::into_inner);
        if foreground.as_ref() == Some(id) {
            *foreground = None;
        }
    }

    pub fn storage_snapshot(&self, report: StorageReport) {
        let fallback_url = report.page_url.as_deref().unwrap_or("");
        let update = report.update;
        self.sessions
            .with_record_or_create(&report.session_id, fallback_url, |record| {
                record.apply_storage(update);
                record.touch(now_millis());
            });
    }

    pub fn fingerprint(&self, report: FingerprintReport) {
        let fallback_url = report.page_url.as_deref().unwrap_or("");
        let now = now_millis();
        let observation = FingerprintObservation {
            method: report.method,
            stack: report.stack,
            timestamp: now,
        };
        self.sessions
            .with_record_or_create(&report.session_id, fallback_url, |record| {
                record.push_fingerprint(observation);
                record.touch(now);
            });
    }

    /// Installs new settings and rebuilds the custom tracker set. Session records are untouched.
    pub fn settings_changed(&self, settings: Settings) {
        self.tracker_lists.set_custom(&settings.custom_domains);
        info!(
            "Settings updated (blocking={}, notifications={}, {} custom domains)",
            settings.blocking_enabled,
            settings.notifications_enabled,
            settings.custom_domains.len()
        );
        *self.settings.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(settings);
    }

    /// Recomputes cookie statistics for `id`. Returns false when the session
    /// is not eligible or the record was replaced or dropped while cookies
    /// were being gathered.
    pub async fn refresh_cookies(&self, id: &SessionId) -> bool {
        let Some((epoch, record)) = self.sessions.get(id) else {
            return false;
        };
        if !is_web_url(record.url()) || record.first_party_domain().is_empty() {
            return false;
        }

        let report = cookie_aggregator::run(
            self.cookie_store.as_ref(),
            &record,
            now_millis(),
            self.config.supercookie_limit,
        )
        .await;

        let applied = self
            .sessions
            .apply_if_current(id, epoch, |record| {
                record.replace_cookies(report.aggregate, report.sync_signals);
                record.touch(now_millis());
            })
            .is_some();
        if !applied {
            debug!("Discarding cookie report for session {}: record replaced or torn down", id);
        }
        applied
    }

    /// Answers a data query with a bounded snapshot after a fresh cookie pass.
    pub async fn query(&self, query: &DataQuery) -> Result<SessionSnapshot, QueryError> {
        let id = query
            .session_id
            .clone()
            .or_else(|| self.foreground())
            .ok_or(QueryError::SessionNotFound)?;

        let (_, record) = self.sessions.get(&id).ok_or(QueryError::SessionNotFound)?;
        if !is_web_url(record.url()) {
            return Err(QueryError::UnsupportedUrl(record.url().to_string()));
        }

        self.refresh_cookies(&id).await;

        let (_, record) = self.sessions.get(&id).ok_or(QueryError::SessionNotFound)?;
        Ok(record.snapshot(self.config.snapshot_limits()))
    }
}
