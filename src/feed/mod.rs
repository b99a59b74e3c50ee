//! RSS output: sanitizing post markup, deriving titles, probing media and
//! streaming the document.

mod probe;
mod sanitize;
mod snippets;
mod title;
mod writer;

pub use probe::{media_info_from_headers, HttpMediaProbe, MediaInfo, MediaProbe};
pub use sanitize::{sanitize, sanitized_children, ALLOWED_ATTRIBUTES};
pub use snippets::{media_preview, poll_block, reply_block};
pub use title::{derive_title, first_paragraph};
pub use writer::{render_header, render_item, write_feed, FeedOptions};
