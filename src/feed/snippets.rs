//! HTML fragments embedded in item descriptions.

use maud::{html, Markup, PreEscaped};

use super::sanitize::sanitized_children;
use crate::richtext::render_html;
use crate::telegram::{Media, MediaKind, Poll, Reply};

/// Inline preview for one media attachment.
#[must_use]
pub fn media_preview(media: &Media) -> Markup {
    match media.kind {
        MediaKind::Photo => html! {
            a href=(media.url) rel="noopener noreferrer nofollow" {
                img style="max-width:100%" src=(media.url);
            }
        },
        MediaKind::Video => html! {
            video style="max-width:100%" controls {
                source src=(media.url);
            }
        },
        MediaKind::Audio => html! {
            audio src=(media.url) style="max-width:100%" controls {}
        },
    }
}

/// Poll question followed by a table of percentages and options.
#[must_use]
pub fn poll_block(poll: &Poll) -> Markup {
    let title = poll
        .title
        .as_ref()
        .map(|t| render_html(&sanitized_children(t)))
        .unwrap_or_default();

    html! {
        div {
            div { (PreEscaped(title)) }
            table style="border-spacing: 1rem 0;" {
                tbody {
                    @for option in &poll.options {
                        tr {
                            td { (option.percent) "%" }
                            td { (option.text) }
                        }
                    }
                }
            }
        }
    }
}

/// Quote of the replied-to message, linking back to it.
#[must_use]
pub fn reply_block(reply: &Reply) -> Markup {
    let text = reply
        .text
        .as_ref()
        .map(|t| render_html(&sanitized_children(t)))
        .unwrap_or_default();

    html! {
        a href=(reply.link) rel="noopener noreferrer nofollow" {
            blockquote
                style="padding-left:6px;margin:0;border-left:3px solid #64b5ef;font-style:normal;"
                cite=(reply.link)
            {
                h4 style="font-weight:600;color:LinkText;margin:0;" { (reply.author) }
                p style="white-space:nowrap;text-overflow:ellipsis;overflow:hidden;margin:0;color:initial;" {
                    (PreEscaped(text))
                }
            }
        }
    }
}
