use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Client;
use tracing::{debug, warn};

/// Size and MIME type of a media file, as reported by its server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaInfo {
    /// Zero when unknown.
    pub length: u64,
    /// Empty when unknown.
    pub mime_type: String,
}

/// Looks up enclosure metadata for a media URL.
///
/// Probing never fails: anything that goes wrong yields [`MediaInfo::default`].
#[async_trait]
pub trait MediaProbe: Send + Sync {
    async fn probe(&self, url: &str) -> MediaInfo;
}

/// Probes media with a `HEAD` request bounded by a timeout.
#[derive(Debug, Clone)]
pub struct HttpMediaProbe {
    client: Client,
    timeout: Duration,
}

impl HttpMediaProbe {
    #[must_use]
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl MediaProbe for HttpMediaProbe {
    async fn probe(&self, url: &str) -> MediaInfo {
        match tokio::time::timeout(self.timeout, self.client.head(url).send()).await {
            Ok(Ok(response)) if response.status().is_success() => {
                let info = media_info_from_headers(response.headers());
                debug!(url = %url, length = info.length, mime_type = %info.mime_type, "Probed media");
                info
            }
            Ok(Ok(response)) => {
                warn!(url = %url, status = %response.status(), "Media probe rejected");
                MediaInfo::default()
            }
            Ok(Err(e)) => {
                warn!(url = %url, error = %e, "Media probe failed");
                MediaInfo::default()
            }
            Err(_) => {
                warn!(url = %url, timeout = ?self.timeout, "Media probe timed out");
                MediaInfo::default()
            }
        }
    }
}

/// Read `Content-Length` and `Content-Type` straight from the headers.
///
/// The body size hint of a `HEAD` response is always zero, so the header has
/// to be parsed by hand.
#[must_use]
pub fn media_info_from_headers(headers: &HeaderMap) -> MediaInfo {
    let length = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0);
    let mime_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    MediaInfo { length, mime_type }
}
