use tracing::debug;

use super::fetcher::{normalize_handle, PageCursor, PageSource};
use super::parser::{parse_page, ChannelPage};
use super::{Channel, ChannelError, Post};

/// Load a channel and, when `count` is given, walk back through history until
/// `count` posts are collected or no older posts remain.
///
/// The result holds the most recent `min(count, available)` posts, oldest
/// first, without duplicates. A `count` of zero is treated as no count.
///
/// # Errors
///
/// Returns an error if the handle is empty or any page fails to load.
pub async fn get_channel_with_posts<S>(
    source: &S,
    channel: &str,
    count: Option<usize>,
) -> Result<Channel, ChannelError>
where
    S: PageSource + ?Sized,
{
    let handle = normalize_handle(channel)?;

    let html = source.fetch_page(handle, PageCursor::latest()).await?;
    let ChannelPage { info, mut posts } = parse_page(handle, &html);
    sort_posts(&mut posts);

    let Some(target) = count.filter(|c| *c > 0) else {
        return Ok(Channel { info, posts });
    };

    let mut pages = 1usize;
    while !posts.is_empty() && posts.len() < target {
        let oldest = posts[0].id;
        let html = source.fetch_page(handle, PageCursor::before(oldest)).await?;
        pages += 1;

        let mut older = parse_page(handle, &html).posts;
        // Anything at or after the cursor is already held
        older.retain(|post| post.id < oldest);
        if older.is_empty() {
            debug!(channel = %handle, pages, collected = posts.len(), "Channel history exhausted");
            break;
        }

        sort_posts(&mut older);
        older.append(&mut posts);
        posts = older;
    }

    if posts.len() > target {
        posts.drain(..posts.len() - target);
    }

    debug!(channel = %handle, pages, posts = posts.len(), "Channel loaded");
    Ok(Channel { info, posts })
}

fn sort_posts(posts: &mut Vec<Post>) {
    posts.sort_by_key(|post| post.id);
    posts.dedup_by_key(|post| post.id);
}
