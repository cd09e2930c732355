use privacy_sentinel::types::errors::*;

// === FetchError Tests ===

#[test]
fn fetch_error_display_variants() {
    assert_eq!(
        FetchError::Transport("connection refused".to_string()).to_string(),
        "Fetch transport error: connection refused"
    );
    assert_eq!(FetchError::Status(503).to_string(), "Fetch returned status 503");
    assert_eq!(
        FetchError::Timeout("30s".to_string()).to_string(),
        "Fetch timed out: 30s"
    );
    assert_eq!(
        FetchError::EmptyList("https://m/list.txt".to_string()).to_string(),
        "Fetched list is empty: https://m/list.txt"
    );
}

// === ListError Tests ===

#[test]
fn list_error_display_variants() {
    assert_eq!(
        ListError::BundledLoad("missing file".to_string()).to_string(),
        "Bundled tracker list failed to load: missing file"
    );
    assert_eq!(
        ListError::AllMirrorsFailed(3).to_string(),
        "All 3 remote mirrors failed"
    );
}

// === CookieQueryError / NotifyError Tests ===

#[test]
fn cookie_query_error_display() {
    let err = CookieQueryError {
        domain: "ads.net".to_string(),
        message: "store closed".to_string(),
    };
    assert_eq!(err.to_string(), "Cookie query failed for ads.net: store closed");
}

#[test]
fn notify_error_display() {
    let err = NotifyError("stdout closed".to_string());
    assert_eq!(err.to_string(), "Notification delivery failed: stdout closed");
}

// === QueryError Tests ===

#[test]
fn query_error_codes() {
    assert_eq!(QueryError::SessionNotFound.code(), "SESSION_NOT_FOUND");
    assert_eq!(
        QueryError::UnsupportedUrl("about:blank".to_string()).code(),
        "UNSUPPORTED_URL"
    );
    assert_eq!(QueryError::Unexpected("boom".to_string()).code(), "UNEXPECTED_ERROR");
}

#[test]
fn query_error_display_variants() {
    assert_eq!(QueryError::SessionNotFound.to_string(), "Session not found");
    assert_eq!(
        QueryError::UnsupportedUrl("chrome://settings".to_string()).to_string(),
        "Unsupported URL: chrome://settings"
    );
    assert_eq!(
        QueryError::Unexpected("encode".to_string()).to_string(),
        "Unexpected error: encode"
    );
}

// === RouterError Tests ===

#[test]
fn router_error_display_variants() {
    assert_eq!(
        RouterError::UnknownMethod("tab.create".to_string()).to_string(),
        "unknown method: tab.create"
    );
    let err = RouterError::InvalidParams {
        method: "request".to_string(),
        message: "missing field `url`".to_string(),
    };
    assert_eq!(err.to_string(), "invalid params for request: missing field `url`");
}

#[test]
fn router_error_wraps_query_error_transparently() {
    let err: RouterError = QueryError::SessionNotFound.into();
    assert_eq!(err.to_string(), "Session not found");
    assert!(matches!(err, RouterError::Query(QueryError::SessionNotFound)));
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::IoError("permission denied".to_string()).to_string(),
        "Settings I/O error: permission denied"
    );
    assert_eq!(
        SettingsError::SerializationError("invalid JSON".to_string()).to_string(),
        "Settings serialization error: invalid JSON"
    );
}

#[test]
fn errors_implement_error_trait() {
    let errors: Vec<Box<dyn std::error::Error>> = vec![
        Box::new(FetchError::Status(404)),
        Box::new(ListError::AllMirrorsFailed(1)),
        Box::new(QueryError::SessionNotFound),
        Box::new(RouterError::UnknownMethod("x".to_string())),
        Box::new(SettingsError::IoError("x".to_string())),
    ];
    for err in &errors {
        assert!(!err.to_string().is_empty());
    }
}
