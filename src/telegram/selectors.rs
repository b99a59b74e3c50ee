//! Selectors for the channel preview markup, compiled once per process.

use once_cell::sync::Lazy;
use scraper::Selector;

fn compile(css: &str) -> Selector {
    Selector::parse(css).expect("Invalid selector")
}

pub static CHANNEL_TITLE: Lazy<Selector> = Lazy::new(|| compile(".tgme_channel_info_header_title"));
pub static CHANNEL_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| compile(".tgme_channel_info_description"));
pub static CHANNEL_LOGO: Lazy<Selector> =
    Lazy::new(|| compile(".tgme_channel_info_header .tgme_page_photo_image img"));

pub static MESSAGE_WRAP: Lazy<Selector> = Lazy::new(|| compile(".tgme_widget_message_wrap"));
pub static NO_MESSAGES: Lazy<Selector> = Lazy::new(|| compile(".tme_no_messages_found"));
pub static MESSAGE: Lazy<Selector> = Lazy::new(|| compile(".tgme_widget_message"));
pub static MESSAGE_NOT_SUPPORTED: Lazy<Selector> = Lazy::new(|| {
    compile(".tgme_widget_message_bubble > .message_media_not_supported_wrap")
});
pub static MESSAGE_DATE: Lazy<Selector> = Lazy::new(|| compile(".tgme_widget_message_date .time"));
pub static MESSAGE_TEXT: Lazy<Selector> = Lazy::new(|| {
    compile(
        ".tgme_widget_message_bubble > .tgme_widget_message_text, \
         .tgme_widget_message_bubble > .media_supported_cont .tgme_widget_message_text",
    )
});
pub static MESSAGE_MEDIA: Lazy<Selector> = Lazy::new(|| {
    compile(
        ".tgme_widget_message_photo_wrap, \
         .tgme_widget_message_video_wrap video, \
         .tgme_widget_message_roundvideo_wrap video, \
         .tgme_widget_message_voice_player audio",
    )
});

pub static POLL: Lazy<Selector> = Lazy::new(|| compile(".tgme_widget_message_poll"));
pub static POLL_QUESTION: Lazy<Selector> =
    Lazy::new(|| compile(".tgme_widget_message_poll_question"));
pub static POLL_OPTION: Lazy<Selector> = Lazy::new(|| compile(".tgme_widget_message_poll_option"));
pub static POLL_OPTION_PERCENT: Lazy<Selector> =
    Lazy::new(|| compile(".tgme_widget_message_poll_option_percent"));
pub static POLL_OPTION_TEXT: Lazy<Selector> =
    Lazy::new(|| compile(".tgme_widget_message_poll_option_text"));

pub static REPLY: Lazy<Selector> =
    Lazy::new(|| compile(".tgme_widget_message_bubble > .tgme_widget_message_reply"));
pub static REPLY_TEXT: Lazy<Selector> =
    Lazy::new(|| compile(".tgme_widget_message_text, .tgme_widget_message_metatext"));
pub static REPLY_AUTHOR: Lazy<Selector> = Lazy::new(|| compile(".tgme_widget_message_author"));
