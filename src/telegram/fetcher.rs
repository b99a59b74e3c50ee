use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::ChannelError;

/// Which page of a channel's history to load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageCursor {
    /// Load posts older than this id.
    pub before: Option<u64>,
    /// Load posts newer than this id.
    pub after: Option<u64>,
}

impl PageCursor {
    /// The most recent page.
    #[must_use]
    pub const fn latest() -> Self {
        Self {
            before: None,
            after: None,
        }
    }

    #[must_use]
    pub const fn before(id: u64) -> Self {
        Self {
            before: Some(id),
            after: None,
        }
    }

    #[must_use]
    pub const fn after(id: u64) -> Self {
        Self {
            before: None,
            after: Some(id),
        }
    }
}

/// Strip a leading `@` from a channel handle.
///
/// # Errors
///
/// Returns [`ChannelError::ChannelRequired`] if nothing is left.
pub fn normalize_handle(channel: &str) -> Result<&str, ChannelError> {
    let trimmed = channel.trim();
    let handle = trimmed.strip_prefix('@').unwrap_or(trimmed);
    if handle.is_empty() {
        return Err(ChannelError::ChannelRequired);
    }
    Ok(handle)
}

/// Source of raw channel preview pages.
///
/// Pages come back as HTML text; parsing happens synchronously afterwards
/// because parsed documents cannot be held across an await point.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Load one page of `channel` (a handle without `@`).
    async fn fetch_page(&self, channel: &str, cursor: PageCursor) -> Result<String, ChannelError>;
}

/// Fetches channel pages from Telegram over HTTP.
#[derive(Debug, Clone)]
pub struct ChannelFetcher {
    client: Client,
    base_url: Url,
}

impl ChannelFetcher {
    /// Create a fetcher for the given origin (normally `https://t.me`).
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL that can carry a path.
    pub fn new(client: Client, base_url: &str) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        Ok(Self { client, base_url })
    }

    /// Build `{base}/s/{channel}` with the cursor as query parameters.
    #[must_use]
    pub fn page_url(&self, channel: &str, cursor: PageCursor) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("s").push(channel);
        }
        if cursor.before.is_some() || cursor.after.is_some() {
            let mut query = url.query_pairs_mut();
            if let Some(before) = cursor.before {
                query.append_pair("before", &before.to_string());
            }
            if let Some(after) = cursor.after {
                query.append_pair("after", &after.to_string());
            }
        }
        url
    }
}

#[async_trait]
impl PageSource for ChannelFetcher {
    async fn fetch_page(&self, channel: &str, cursor: PageCursor) -> Result<String, ChannelError> {
        let channel = normalize_handle(channel)?;
        let url = self.page_url(channel, cursor);
        debug!(url = %url, "Fetching channel page");

        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(ChannelError::Fetch {
                channel: channel.to_string(),
                status: response.status().as_u16(),
            });
        }

        // Unknown handles are redirected to a generic landing page
        if response.url() != &url {
            debug!(requested = %url, landed = %response.url(), "Channel page redirected");
            return Err(ChannelError::UnknownChannel {
                channel: channel.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}
