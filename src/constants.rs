//! Shared constants used across the application.

/// Canonical origin of Telegram's public web preview.
pub const TELEGRAM_ORIGIN: &str = "https://t.me";

/// Host of Telegram's short links (`t.me/<channel>/<id>`).
pub const TELEGRAM_HOST: &str = "t.me";

/// Path prefix of the web preview (`/s/<channel>`).
pub const WEB_PREVIEW_PREFIX: &str = "/s/";

/// User agent string used when fetching channel pages and probing media.
pub const FETCH_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Value of the feed's `<generator>` element.
pub const FEED_GENERATOR: &str = "Telegram to RSS (https://github.com/akopachov/telegram2rss)";

/// Title length used when a request does not specify one.
pub const DEFAULT_TITLE_MAX_LENGTH: usize = 100;

/// Upper bound for the `count` option.
pub const DEFAULT_MAX_POST_COUNT: usize = 50;
