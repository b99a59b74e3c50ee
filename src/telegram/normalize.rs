use url::Url;

use crate::constants::{TELEGRAM_HOST, WEB_PREVIEW_PREFIX};

/// Rewrite a `t.me/<channel>/<id>` short link to its `t.me/s/...` web preview form.
///
/// Links on other hosts, links already in preview form, and anything that does
/// not parse are returned unchanged.
#[must_use]
pub fn ensure_web_preview_link(link: &str) -> String {
    let Ok(mut url) = Url::parse(link) else {
        return link.to_string();
    };

    let is_telegram = url
        .host_str()
        .is_some_and(|host| host.eq_ignore_ascii_case(TELEGRAM_HOST));
    if is_telegram && !url.path().to_ascii_lowercase().starts_with(WEB_PREVIEW_PREFIX) {
        let path = format!("/s{}", url.path());
        url.set_path(&path);
        return url.to_string();
    }

    link.to_string()
}
