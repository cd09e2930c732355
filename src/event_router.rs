//! Event Router for the Privacy Sentinel JSON-RPC protocol.
//!
//! `parse_event` turns a method name and params object into the closed
//! `Event` type, rejecting unknown methods. `dispatch` matches every event
//! exhaustively onto the `Sentinel`. `handle_method` combines both and
//! encodes the outcome as JSON for the RPC binary.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::app::Sentinel;
use crate::services::tracker_lists::{ListStats, TrackerListManagerTrait};
use crate::types::errors::{QueryError, RouterError};
use crate::types::event::{DataQuery, Event};
use crate::types::request::Decision;
use crate::types::session::SessionSnapshot;
use crate::types::settings::Settings;

/// Result of dispatching one event.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Decision for a request; `ignored` when the request had no session.
    Decision { decision: Decision, ignored: bool },
    Snapshot(Box<SessionSnapshot>),
    Stats(ListStats),
    Ack,
    Pong,
}

fn params_as<T: DeserializeOwned>(method: &str, params: &Value) -> Result<T, RouterError> {
    serde_json::from_value(params.clone()).map_err(|e| RouterError::InvalidParams {
        method: method.to_string(),
        message: e.to_string(),
    })
}

/// Decodes a method call into an `Event`.
pub fn parse_event(method: &str, params: &Value) -> Result<Event, RouterError> {
    let event = match method {
        "request" => Event::Request(params_as(method, params)?),
        "navigation.committed" => Event::NavigationCommitted(params_as(method, params)?),
        "navigation.completed" => Event::NavigationCompleted(params_as(method, params)?),
        "session.activated" => Event::SessionActivated(params_as(method, params)?),
        "session.teardown" => Event::SessionTeardown(params_as(method, params)?),
        "storage.snapshot" => Event::StorageSnapshot(params_as(method, params)?),
        "fingerprint" => Event::Fingerprint(params_as(method, params)?),
        "settings.changed" => Event::SettingsChanged(params_as::<Settings>(method, params)?),
        "data.query" => {
            if params.is_null() {
                Event::DataQuery(DataQuery::default())
            } else {
                Event::DataQuery(params_as(method, params)?)
            }
        }
        "lists.stats" => Event::ListStats,
        "ping" => Event::Ping,
        other => return Err(RouterError::UnknownMethod(other.to_string())),
    };
    Ok(event)
}

/// Routes one event to the engine.
pub async fn dispatch(sentinel: &Sentinel, event: Event) -> Result<Outcome, QueryError> {
    match event {
        Event::Request(request) => {
            let outcome = match sentinel.classify(&request) {
                Some(decision) => Outcome::Decision {
                    decision,
                    ignored: false,
                },
                None => Outcome::Decision {
                    decision: Decision::Allow,
                    ignored: true,
                },
            };
            Ok(outcome)
        }
        Event::NavigationCommitted(nav) => {
            sentinel.navigation_committed(&nav);
            Ok(Outcome::Ack)
        }
        Event::NavigationCompleted(nav) => {
            sentinel.navigation_completed(&nav).await;
            Ok(Outcome::Ack)
        }
        Event::SessionActivated(session) => {
            sentinel.session_activated(&session.session_id);
            Ok(Outcome::Ack)
        }
        Event::SessionTeardown(session) => {
            sentinel.teardown(&session.session_id);
            Ok(Outcome::Ack)
        }
        Event::StorageSnapshot(report) => {
            sentinel.storage_snapshot(report);
            Ok(Outcome::Ack)
        }
        Event::Fingerprint(report) => {
            sentinel.fingerprint(report);
            Ok(Outcome::Ack)
        }
        Event::SettingsChanged(settings) => {
            sentinel.settings_changed(settings);
            Ok(Outcome::Ack)
        }
        Event::DataQuery(query) => {
            let snapshot = sentinel.query(&query).await?;
            Ok(Outcome::Snapshot(Box::new(snapshot)))
        }
        Event::ListStats => Ok(Outcome::Stats(sentinel.tracker_lists().stats())),
        Event::Ping => Ok(Outcome::Pong),
    }
}

/// JSON body for an outcome.
pub fn encode_outcome(outcome: &Outcome) -> Result<Value, QueryError> {
    let value = match outcome {
        Outcome::Decision { decision, ignored } => {
            json!({"decision": decision, "cancel": decision.is_block(), "ignored": ignored})
        }
        Outcome::Snapshot(snapshot) => {
            serde_json::to_value(snapshot).map_err(|e| QueryError::Unexpected(e.to_string()))?
        }
        Outcome::Stats(stats) => {
            serde_json::to_value(stats).map_err(|e| QueryError::Unexpected(e.to_string()))?
        }
        Outcome::Ack => json!({"ok": true}),
        Outcome::Pong => json!({"pong": true}),
    };
    Ok(value)
}

/// Decodes, dispatches and encodes one method call.
pub async fn handle_method(sentinel: &Sentinel, method: &str, params: &Value) -> Result<Value, RouterError> {
    let event = parse_event(method, params)?;
    let outcome = dispatch(sentinel, event).await?;
    Ok(encode_outcome(&outcome)?)
}
