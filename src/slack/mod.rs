//! Slack-specific message formatting

pub mod message_builder;

pub use message_builder::{SECTION_TEXT_LIMIT, build_summary_payload, chunk_text};
