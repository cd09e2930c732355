use thiserror::Error;

// === FetchError ===

/// Errors raised while downloading a remote block list from one mirror.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The mirror could not be reached or the body could not be read.
    #[error("Fetch transport error: {0}")]
    Transport(String),
    /// The mirror answered with a non-success status code.
    #[error("Fetch returned status {0}")]
    Status(u16),
    /// The mirror did not answer within the configured timeout.
    #[error("Fetch timed out: {0}")]
    Timeout(String),
    /// The mirror answered but the body contained no usable domains.
    #[error("Fetched list is empty: {0}")]
    EmptyList(String),
}

#[cfg(feature = "network")]
impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

// === ListError ===

/// Errors related to tracker list loading.
#[derive(Debug, Error)]
pub enum ListError {
    /// The bundled list could not be read or decoded.
    #[error("Bundled tracker list failed to load: {0}")]
    BundledLoad(String),
    /// Every configured mirror failed or produced an empty list.
    #[error("All {0} remote mirrors failed")]
    AllMirrorsFailed(usize),
}

// === CookieQueryError ===

/// A single-domain cookie lookup failed. Aggregation swallows it.
#[derive(Debug, Error)]
#[error("Cookie query failed for {domain}: {message}")]
pub struct CookieQueryError {
    pub domain: String,
    pub message: String,
}

// === NotifyError ===

/// A best-effort notification could not be delivered.
#[derive(Debug, Error)]
#[error("Notification delivery failed: {0}")]
pub struct NotifyError(pub String);

// === QueryError ===

/// Typed errors surfaced to the caller of a data query.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// No session id was given and no foreground session is known, or the
    /// session has no record.
    #[error("Session not found")]
    SessionNotFound,
    /// The session URL is missing, unparseable, or not http/https.
    #[error("Unsupported URL: {0}")]
    UnsupportedUrl(String),
    /// Any other internal fault on the query path.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl QueryError {
    /// Stable wire code reported to the host.
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::SessionNotFound => "SESSION_NOT_FOUND",
            QueryError::UnsupportedUrl(_) => "UNSUPPORTED_URL",
            QueryError::Unexpected(_) => "UNEXPECTED_ERROR",
        }
    }
}

// === RouterError ===

/// Errors related to decoding and dispatching inbound messages.
#[derive(Debug, Error)]
pub enum RouterError {
    /// The method name is not one of the known event kinds.
    #[error("unknown method: {0}")]
    UnknownMethod(String),
    /// The params object does not match the shape of the event.
    #[error("invalid params for {method}: {message}")]
    InvalidParams { method: String, message: String },
    /// The data query failed with a typed error.
    #[error(transparent)]
    Query(#[from] QueryError),
}

// === SettingsError ===

/// Errors related to configuration loading.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to read a configuration file.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// A configuration file exists but is not valid JSON of the right shape.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
}
