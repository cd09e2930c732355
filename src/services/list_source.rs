//! Remote list transport.
//!
//! Fetching goes through the `ListSource` trait so the tracker list manager can
//! be driven by an in-memory source in tests.

#[cfg(feature = "network")]
use std::time::Duration;

use futures::future::BoxFuture;

use crate::types::errors::FetchError;

/// Fetches the body of a remote list.
pub trait ListSource: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, FetchError>>;
}

/// `reqwest`-backed source with a per-request timeout.
#[cfg(feature = "network")]
pub struct HttpListSource {
    client: reqwest::Client,
}

#[cfg(feature = "network")]
impl HttpListSource {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("privacy-sentinel/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[cfg(feature = "network")]
impl ListSource for HttpListSource {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, FetchError>> {
        Box::pin(async move {
            let response = self
                .client
                .get(url)
                .header(reqwest::header::CACHE_CONTROL, "no-cache")
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }
            Ok(response.text().await?)
        })
    }
}
