//! Privacy Sentinel: per-session privacy risk engine.
//!
//! Classifies outgoing requests against tracker lists, aggregates cookies and
//! client-side storage signals, and scores each browsing session.
//!
//! This library crate exposes all modules for use by the RPC binary and integration tests.

pub mod app;
pub mod event_router;
pub mod managers;
pub mod platform;
pub mod services;
pub mod types;
