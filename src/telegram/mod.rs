//! Telegram channel web preview: fetching, extraction and history backfill.
//!
//! The public preview at `https://t.me/s/<channel>` renders roughly twenty
//! posts per page. Older pages are reached with a `before=<post id>` cursor.

mod backfill;
mod error;
mod fetcher;
mod normalize;
mod parser;
mod selectors;

use chrono::{DateTime, Utc};

use crate::richtext::RichElement;

pub use backfill::get_channel_with_posts;
pub use error::ChannelError;
pub use fetcher::{normalize_handle, ChannelFetcher, PageCursor, PageSource};
pub use normalize::ensure_web_preview_link;
pub use parser::{
    extract_background_image, parse_channel_info, parse_channel_posts, parse_page, ChannelPage,
};

/// Channel-level metadata from the page header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelInfo {
    /// Channel handle without the leading `@`.
    pub id: String,
    pub title: String,
    /// Canonical web preview URL of the channel.
    pub link: String,
    pub description: String,
    /// Empty when the page has no logo.
    pub logo_url: String,
}

/// Kind of media attached to a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
    Audio,
}

/// A media attachment. Size and MIME type are probed when the feed is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    pub kind: MediaKind,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOption {
    pub text: String,
    /// Share of votes, 0 to 100.
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poll {
    pub title: Option<RichElement>,
    pub options: Vec<PollOption>,
}

/// The message a post replies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: Option<RichElement>,
    pub author: String,
    /// Link to the quoted message, in web preview form.
    pub link: String,
}

/// One post of a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Increases with recency; doubles as the pagination cursor.
    pub id: u64,
    pub link: String,
    pub date: DateTime<Utc>,
    pub text: Option<RichElement>,
    pub media: Vec<Media>,
    pub poll: Option<Poll>,
    pub reply: Option<Reply>,
}

/// Channel metadata with its posts ordered oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub info: ChannelInfo,
    pub posts: Vec<Post>,
}

impl Channel {
    /// Date of the newest post, if there is one.
    #[must_use]
    pub fn last_post_date(&self) -> Option<DateTime<Utc>> {
        self.posts.last().map(|post| post.date)
    }
}
