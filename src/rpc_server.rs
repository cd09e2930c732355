//! Privacy Sentinel RPC Server: JSON-RPC over stdin/stdout for browser-host integration.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"request", "params":{"id":"r1","url":"...","kind":"script","timestamp":0,"session_id":"7"}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"...", "code":"..."}
//! Notifications are written as {"event":"notification", ...} lines.
//!
//! The host pushes its cookie jar with `cookies.set` ({"cookies":[...]}); cookie
//! aggregation reads from that jar.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use log::{error, warn};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};

use privacy_sentinel::app::Sentinel;
use privacy_sentinel::event_router::handle_method;
use privacy_sentinel::services::cookie_aggregator::MemoryCookieStore;
use privacy_sentinel::services::list_source::HttpListSource;
use privacy_sentinel::services::notifier::Notifier;
use privacy_sentinel::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use privacy_sentinel::types::cookie::Cookie;
use privacy_sentinel::types::errors::{NotifyError, RouterError};
use privacy_sentinel::types::event::Notification;

/// Writes notifications to stdout as protocol events.
struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let line = json!({"event": "notification", "notification": notification});
        write_line(&line).map_err(|e| NotifyError(e.to_string()))
    }
}

fn write_line(value: &Value) -> std::io::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", value)?;
    out.flush()
}

fn error_body(id: Value, err: &RouterError) -> Value {
    match err {
        RouterError::Query(q) => json!({"id": id, "error": err.to_string(), "code": q.code()}),
        _ => json!({"id": id, "error": err.to_string()}),
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let settings_engine = SettingsEngine::new(None);
    let settings = settings_engine.load().unwrap_or_else(|e| {
        error!("{}; using default settings", e);
        Default::default()
    });
    let config = settings_engine.load_engine_config().unwrap_or_else(|e| {
        error!("{}; using default engine config", e);
        Default::default()
    });

    let cookie_jar = Arc::new(MemoryCookieStore::new());
    let timeout = Duration::from_secs(config.fetch_timeout_secs);
    let sentinel = Sentinel::new(config, settings, cookie_jar.clone(), Arc::new(StdoutNotifier));

    match HttpListSource::new(timeout) {
        Ok(source) => {
            // Refresh runs in the background; requests are classified meanwhile.
            let _refresh = sentinel.startup(Arc::new(source));
        }
        Err(e) => {
            error!("HTTP client unavailable, remote list disabled: {}", e);
            sentinel.load_bundled();
        }
    }

    if let Err(e) = write_line(&json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")})) {
        error!("stdout closed: {}", e);
        return;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(l)) => l,
            Ok(None) => break,
            Err(e) => {
                error!("stdin read failed: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                let _ = write_line(&json!({"id": null, "error": format!("parse error: {}", e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = if method == "cookies.set" {
            let cookies = params.get("cookies").cloned().unwrap_or(json!([]));
            match serde_json::from_value::<Vec<Cookie>>(cookies) {
                Ok(cookies) => {
                    cookie_jar.replace(cookies);
                    json!({"id": id, "result": {"ok": true}})
                }
                Err(e) => json!({"id": id, "error": format!("invalid params for cookies.set: {}", e)}),
            }
        } else {
            match handle_method(&sentinel, method, &params).await {
                Ok(val) => json!({"id": id, "result": val}),
                Err(err) => {
                    if let RouterError::UnknownMethod(m) = &err {
                        warn!("Rejected unknown method {}", m);
                    }
                    error_body(id, &err)
                }
            }
        };

        if let Err(e) = write_line(&response) {
            error!("stdout closed: {}", e);
            break;
        }
    }
}
