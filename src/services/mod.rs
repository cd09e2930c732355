// Privacy Sentinel services
// Services provide the engine's logic: domain normalization, list parsing and
// matching, request classification, cookie analysis, scoring, settings and notifications.

pub mod cookie_aggregator;
pub mod domain;
pub mod easylist;
pub mod list_source;
pub mod notifier;
pub mod request_classifier;
pub mod score_engine;
pub mod settings_engine;
pub mod tracker_lists;
