//! Streaming RSS 2.0 serialization of a loaded channel.
//!
//! The channel header goes out first, then one `<item>` per post. An item is
//! only written once every media probe for that post has resolved, so the
//! sink never sees half an item. A failing write ends serialization at once.

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use super::probe::{MediaInfo, MediaProbe};
use super::sanitize::sanitized_children;
use super::snippets::{media_preview, poll_block, reply_block};
use super::title::derive_title;
use crate::constants::{DEFAULT_TITLE_MAX_LENGTH, FEED_GENERATOR};
use crate::richtext::render_html;
use crate::telegram::{Channel, Post};

/// Separator between the parts of an item description.
const SEPARATOR: &str = "<br />";

/// Per-request serialization settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedOptions {
    pub title_max_length: usize,
    /// Public base URL of this service, used as the channel `<link>`.
    pub site_url: String,
    /// URL of the feed itself, used in `atom:link rel="self"`.
    pub self_url: String,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            title_max_length: DEFAULT_TITLE_MAX_LENGTH,
            site_url: String::new(),
            self_url: String::new(),
        }
    }
}

/// Write the complete feed for `channel` to `sink`.
///
/// # Errors
///
/// Returns the first error reported by the sink; nothing more is written after it.
pub async fn write_feed<W, P>(
    channel: &Channel,
    sink: &mut W,
    probe: &P,
    options: &FeedOptions,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
    P: MediaProbe + ?Sized,
{
    sink.write_all(render_header(channel, options).as_bytes()).await?;

    for post in &channel.posts {
        let infos = join_all(post.media.iter().map(|media| probe.probe(&media.url))).await;
        let item = render_item(&channel.info.id, post, &infos, options.title_max_length);
        sink.write_all(item.as_bytes()).await?;
    }

    sink.write_all(b"</channel></rss>").await?;
    sink.flush().await?;

    debug!(channel = %channel.info.id, items = channel.posts.len(), "Feed written");
    Ok(())
}

/// Everything from the XML declaration up to the first item.
#[must_use]
pub fn render_header(channel: &Channel, options: &FeedOptions) -> String {
    let info = &channel.info;
    // An empty channel has no newest post to date the feed by
    let updated = http_date(&channel.last_post_date().unwrap_or_else(Utc::now));

    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(r#"<rss xmlns:atom="http://www.w3.org/2005/Atom" version="2.0">"#);
    out.push_str("<channel>");
    out.push_str(&format!("<title>{}</title>", cdata(&info.title)));
    out.push_str("<image>");
    out.push_str(&format!("<url>{}</url>", cdata(&info.logo_url)));
    out.push_str(&format!("<title>{}</title>", cdata(&info.title)));
    out.push_str(&format!("<link>{}</link>", cdata(&info.link)));
    out.push_str("</image>");
    out.push_str(&format!("<link>{}</link>", cdata(&options.site_url)));
    out.push_str(&format!(
        "<description>{}</description>",
        cdata(&info.description)
    ));
    out.push_str(&format!(
        "<generator>{}</generator>",
        xml_escape(FEED_GENERATOR)
    ));
    out.push_str(&format!(
        r#"<atom:link href="{}" rel="self" type="application/rss+xml" />"#,
        xml_escape(&options.self_url)
    ));
    out.push_str(&format!("<pubDate>{updated}</pubDate>"));
    out.push_str(&format!("<lastBuildDate>{updated}</lastBuildDate>"));
    out
}

/// One `<item>` element. `media_infos` lines up with `post.media`.
#[must_use]
pub fn render_item(
    channel_id: &str,
    post: &Post,
    media_infos: &[MediaInfo],
    title_max_length: usize,
) -> String {
    let mut title = String::new();
    let mut body = String::new();
    if let Some(text) = &post.text {
        let nodes = sanitized_children(text);
        body = render_html(&nodes);
        title = derive_title(&nodes, title_max_length);
    }

    let mut poll = String::new();
    if let Some(p) = &post.poll {
        if title.is_empty() {
            if let Some(question) = &p.title {
                title = derive_title(&sanitized_children(question), title_max_length);
            }
        }
        poll = poll_block(p).into_string();
    }

    let reply = post
        .reply
        .as_ref()
        .map(|r| reply_block(r).into_string())
        .unwrap_or_default();

    let previews = post
        .media
        .iter()
        .map(|m| media_preview(m).into_string())
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    let description = [previews, body, poll]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(SEPARATOR);

    let mut out = String::from("<item>");
    out.push_str(&format!("<title>{}</title>", cdata(&title)));
    out.push_str(&format!(
        "<description>{}</description>",
        cdata(&format!("{reply}{description}"))
    ));
    out.push_str(&format!("<link>{}</link>", cdata(&post.link)));
    out.push_str(&format!(
        "<guid>{}</guid>",
        xml_escape(&format!("t.me/s/{channel_id}/{}", post.id))
    ));
    out.push_str(&format!("<pubDate>{}</pubDate>", http_date(&post.date)));
    for (media, info) in post.media.iter().zip(media_infos) {
        out.push_str(&format!(
            r#"<enclosure url="{}" type="{}" length="{}" />"#,
            xml_escape(&media.url),
            xml_escape(&info.mime_type),
            info.length
        ));
    }
    out.push_str("</item>");
    out
}

/// Wrap text in a CDATA section, splitting any `]]>` it contains.
fn cdata(s: &str) -> String {
    format!("<![CDATA[{}]]>", s.replace("]]>", "]]]]><![CDATA[>"))
}

/// Escape XML special characters
fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
fn http_date(date: &DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::richtext::{RichElement, RichNode};
    use crate::telegram::{ChannelInfo, Media, MediaKind, Poll, PollOption};

    fn info() -> ChannelInfo {
        ChannelInfo {
            id: "test".to_string(),
            title: "Test Channel".to_string(),
            link: "https://t.me/s/test".to_string(),
            description: "About".to_string(),
            logo_url: "https://cdn.example.org/logo.jpg".to_string(),
        }
    }

    fn text_post(id: u64, html: RichElement) -> Post {
        Post {
            id,
            link: format!("https://t.me/s/test/{id}"),
            date: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            text: Some(html),
            media: Vec::new(),
            poll: None,
            reply: None,
        }
    }

    fn element(name: &str, attrs: &[(&str, &str)], children: Vec<RichNode>) -> RichElement {
        RichElement {
            name: name.to_string(),
            attrs: attrs
                .iter()
                .map(|(n, v)| ((*n).to_string(), (*v).to_string()))
                .collect(),
            children,
        }
    }

    fn text(s: &str) -> RichNode {
        RichNode::Text(s.to_string())
    }

    #[test]
    fn test_cdata_cannot_be_closed_early() {
        assert_eq!(cdata("a]]>b"), "<![CDATA[a]]]]><![CDATA[>b]]>");
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("<script>"), "&lt;script&gt;");
        assert_eq!(xml_escape("a & b"), "a &amp; b");
        assert_eq!(xml_escape("\"test\""), "&quot;test&quot;");
    }

    #[test]
    fn test_http_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();
        assert_eq!(http_date(&date), "Fri, 01 Mar 2024 09:05:07 GMT");
    }

    #[test]
    fn test_header_uses_last_post_date() {
        let channel = Channel {
            info: info(),
            posts: vec![text_post(1, element("div", &[], vec![text("Hi")]))],
        };
        let options = FeedOptions {
            site_url: "https://feeds.example.com".to_string(),
            self_url: "https://feeds.example.com/rss/test".to_string(),
            ..FeedOptions::default()
        };
        let header = render_header(&channel, &options);

        assert!(header.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss"));
        assert!(header.contains("<title><![CDATA[Test Channel]]></title>"));
        assert!(header.contains("<url><![CDATA[https://cdn.example.org/logo.jpg]]></url>"));
        assert!(header.contains("<link><![CDATA[https://feeds.example.com]]></link>"));
        assert!(header.contains(
            r#"<atom:link href="https://feeds.example.com/rss/test" rel="self" type="application/rss+xml" />"#
        ));
        assert!(header.contains("<pubDate>Fri, 01 Mar 2024 10:00:00 GMT</pubDate>"));
        assert!(header.contains("<lastBuildDate>Fri, 01 Mar 2024 10:00:00 GMT</lastBuildDate>"));
    }

    #[test]
    fn test_header_for_empty_channel_still_has_dates() {
        let channel = Channel {
            info: info(),
            posts: Vec::new(),
        };
        let header = render_header(&channel, &FeedOptions::default());
        assert!(header.contains("<pubDate>"));
        assert!(header.contains(" GMT</lastBuildDate>"));
    }

    #[test]
    fn test_item_sanitizes_body_and_derives_title() {
        let html = element(
            "div",
            &[("class", "tgme_widget_message_text")],
            vec![RichNode::Element(element(
                "div",
                &[("onclick", "x"), ("class", "y")],
                vec![
                    RichNode::Element(element("b", &[], vec![])),
                    text("Hello"),
                    RichNode::Element(element("br", &[], vec![])),
                    text("World"),
                ],
            ))],
        );
        let item = render_item("test", &text_post(7, html), &[], 100);

        assert!(item.contains("<title><![CDATA[Hello]]></title>"));
        assert!(item.contains("<description><![CDATA[<div>Hello<br />World</div>]]></description>"));
        assert!(item.contains("<link><![CDATA[https://t.me/s/test/7]]></link>"));
        assert!(item.contains("<guid>t.me/s/test/7</guid>"));
        assert!(item.contains("<pubDate>Fri, 01 Mar 2024 10:00:00 GMT</pubDate>"));
        assert!(!item.contains("onclick"));
    }

    #[test]
    fn test_item_with_media_poll_and_enclosures() {
        let mut post = text_post(3, element("div", &[], vec![]));
        post.text = None;
        post.media = vec![Media {
            kind: MediaKind::Photo,
            url: "https://cdn.example.org/p.jpg?a=1&b=2".to_string(),
        }];
        post.poll = Some(Poll {
            title: Some(element("div", &[], vec![text("Best language?")])),
            options: vec![PollOption {
                text: "Rust".to_string(),
                percent: 100,
            }],
        });
        let infos = vec![MediaInfo {
            length: 2048,
            mime_type: "image/jpeg".to_string(),
        }];
        let item = render_item("test", &post, &infos, 100);

        assert!(item.contains("<title><![CDATA[Best language?]]></title>"));
        assert!(item.contains("</a><br /><div><div>Best language?</div>"));
        assert!(item.contains(
            r#"<enclosure url="https://cdn.example.org/p.jpg?a=1&amp;b=2" type="image/jpeg" length="2048" />"#
        ));
    }

    #[test]
    fn test_unknown_media_info_gives_empty_enclosure() {
        let mut post = text_post(4, element("div", &[], vec![text("Clip")]));
        post.media = vec![Media {
            kind: MediaKind::Video,
            url: "https://cdn.example.org/v.mp4".to_string(),
        }];
        let item = render_item("test", &post, &[MediaInfo::default()], 100);

        assert!(item.contains(
            r#"<enclosure url="https://cdn.example.org/v.mp4" type="" length="0" />"#
        ));
    }
}
