//! Extraction of channel metadata and posts from a preview page.
//!
//! Telegram's markup is outside our control, so extraction is permissive:
//! anything that does not look like a complete post is skipped and missing
//! fields become empty values.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::debug;

use super::normalize::ensure_web_preview_link;
use super::selectors;
use super::{ChannelInfo, Media, MediaKind, Poll, PollOption, Post, Reply};
use crate::constants::TELEGRAM_ORIGIN;
use crate::richtext::RichElement;

static BACKGROUND_IMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"background-image:\s*url\(\s*['"]?([^'")]+)['"]?\s*\)"#).expect("Invalid regex")
});

static LEADING_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)").expect("Invalid regex"));

/// Everything extracted from one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPage {
    pub info: ChannelInfo,
    /// Posts in page order.
    pub posts: Vec<Post>,
}

/// Parse a page of `channel` (handle without `@`).
#[must_use]
pub fn parse_page(channel: &str, html: &str) -> ChannelPage {
    let document = Html::parse_document(html);
    ChannelPage {
        info: parse_channel_info(channel, &document),
        posts: parse_channel_posts(&document),
    }
}

/// Read the channel header. Missing elements yield empty strings.
#[must_use]
pub fn parse_channel_info(channel: &str, document: &Html) -> ChannelInfo {
    let title = document
        .select(&selectors::CHANNEL_TITLE)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default();

    let description = document
        .select(&selectors::CHANNEL_DESCRIPTION)
        .next()
        .map(|el| joined_text(el, " "))
        .unwrap_or_default();

    let logo_url = document
        .select(&selectors::CHANNEL_LOGO)
        .next()
        .and_then(|el| el.value().attr("src"))
        .unwrap_or_default()
        .to_string();

    ChannelInfo {
        id: channel.to_string(),
        title,
        link: format!("{TELEGRAM_ORIGIN}/s/{channel}"),
        description,
        logo_url,
    }
}

/// Extract every renderable post on the page.
#[must_use]
pub fn parse_channel_posts(document: &Html) -> Vec<Post> {
    let wrappers: Vec<ElementRef<'_>> = document.select(&selectors::MESSAGE_WRAP).collect();

    // An empty history page holds a single "no messages found" placeholder
    if wrappers.len() == 1 && wrappers[0].select(&selectors::NO_MESSAGES).next().is_some() {
        return Vec::new();
    }

    wrappers.into_iter().filter_map(parse_post).collect()
}

fn parse_post(wrapper: ElementRef<'_>) -> Option<Post> {
    let container = wrapper.select(&selectors::MESSAGE).next()?;

    if container.select(&selectors::MESSAGE_NOT_SUPPORTED).next().is_some() {
        debug!("Skipping post with unsupported media");
        return None;
    }

    let Some(date_el) = container.select(&selectors::MESSAGE_DATE).next() else {
        debug!("Skipping post without a date");
        return None;
    };
    let date = date_el
        .value()
        .attr("datetime")
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|d| d.with_timezone(&Utc))?;

    let relative_ref = container.value().attr("data-post")?;
    let id = relative_ref
        .rsplit_once('/')
        .and_then(|(_, id)| id.parse::<u64>().ok())?;

    let text = container
        .select(&selectors::MESSAGE_TEXT)
        .next()
        .map(RichElement::from_element);

    Some(Post {
        id,
        link: format!("{TELEGRAM_ORIGIN}/s/{relative_ref}"),
        date,
        text,
        media: parse_post_media(container),
        poll: parse_post_poll(container),
        reply: parse_post_reply(container),
    })
}

fn parse_post_media(container: ElementRef<'_>) -> Vec<Media> {
    container
        .select(&selectors::MESSAGE_MEDIA)
        .filter_map(|el| {
            let value = el.value();
            let kind = match value.name() {
                "video" => MediaKind::Video,
                "audio" => MediaKind::Audio,
                _ => {
                    let url = extract_background_image(value.attr("style")?)?;
                    return Some(Media {
                        kind: MediaKind::Photo,
                        url,
                    });
                }
            };
            let url = value.attr("src").filter(|src| !src.is_empty())?;
            Some(Media {
                kind,
                url: url.to_string(),
            })
        })
        .collect()
}

/// Pull the URL out of an inline `background-image: url(...)` style.
#[must_use]
pub fn extract_background_image(style: &str) -> Option<String> {
    BACKGROUND_IMAGE
        .captures(style)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|url| !url.is_empty())
}

fn parse_post_poll(container: ElementRef<'_>) -> Option<Poll> {
    let poll = container.select(&selectors::POLL).next()?;

    let title = poll
        .select(&selectors::POLL_QUESTION)
        .next()
        .map(RichElement::from_element);

    let options = poll
        .select(&selectors::POLL_OPTION)
        .filter_map(|option| {
            let percent = option.select(&selectors::POLL_OPTION_PERCENT).next()?;
            let text = option.select(&selectors::POLL_OPTION_TEXT).next()?;
            Some(PollOption {
                text: text.text().collect(),
                percent: parse_percent(&percent.text().collect::<String>()),
            })
        })
        .collect();

    Some(Poll { title, options })
}

/// Leading integer of a percent label like `"42%"`, clamped to 100.
fn parse_percent(raw: &str) -> u8 {
    LEADING_INTEGER
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .map_or(0, |p| u8::try_from(p.min(100)).unwrap_or(100))
}

fn parse_post_reply(container: ElementRef<'_>) -> Option<Reply> {
    let reply = container.select(&selectors::REPLY).next()?;

    let text = reply
        .select(&selectors::REPLY_TEXT)
        .next()
        .map(RichElement::from_element);
    let author = reply
        .select(&selectors::REPLY_AUTHOR)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default();
    let link = reply
        .value()
        .attr("href")
        .map(ensure_web_preview_link)
        .unwrap_or_default();

    Some(Reply { text, author, link })
}

/// Trimmed, non-empty text nodes joined with `separator`.
fn joined_text(element: ElementRef<'_>, separator: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}
