//! Telegram channel RSS library.
//!
//! Reads the public web preview of a Telegram channel, turns its posts into a
//! typed model, and streams them back out as an RSS 2.0 feed.

// Allow raw string hashes for safety - they're harmless and prevent issues if content changes
#![allow(clippy::needless_raw_string_hashes)]

pub mod config;
pub mod constants;
pub mod feed;
pub mod richtext;
pub mod telegram;
pub mod web;
