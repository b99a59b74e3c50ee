//! Landing page describing how to subscribe to a channel.

use maud::{html, Markup, DOCTYPE};

use crate::config::Config;

/// Render the landing page.
///
/// Example links use the configured hosting URL when one is known and fall
/// back to a relative path otherwise.
#[must_use]
pub fn render_home(config: &Config) -> Markup {
    let example = config.feed_url("durov");

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="color-scheme" content="light dark";
                title { "Telegram Channel RSS" }
            }
            body {
                main {
                    h1 { "Telegram Channel RSS" }
                    p { "RSS feeds for public Telegram channels, built from their web preview." }
                    h2 { "Usage" }
                    pre { code { "GET /rss/{channel}?count=20&titleMaxLength=100" } }
                    ul {
                        li { code { "channel" } ": the channel handle, with or without a leading " code { "@" } }
                        li {
                            code { "count" } ": minimum number of posts, older pages are loaded as needed (at most "
                            (config.max_post_count) ")"
                        }
                        li {
                            code { "titleMaxLength" } ": approximate item title length (default "
                            (config.default_title_max_length) ")"
                        }
                    }
                    p { "Example: " a href=(example) { (example) } }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_mentions_limits_and_example() {
        let mut config = Config::for_testing();
        config.hosting_url = "https://rss.example.org/".to_string();
        config.max_post_count = 30;

        let page = render_home(&config).into_string();

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("(at most 30)"));
        assert!(page.contains(r#"href="https://rss.example.org/rss/durov""#));
    }
}
