//! Block Kit payloads for the summary webhook.
//!
//! The envelope has three parts: a header, one or more mrkdwn sections with the
//! summary body, and a context line with the pending count and timestamp.

use serde_json::{Value, json};

use crate::core::models::SummaryMessage;

/// Slack's per-block character limit for section text.
pub const SECTION_TEXT_LIMIT: usize = 3_000;

pub const SUMMARY_HEADER: &str = "📋 Todo Summary";

/// Fallback notification text shown by clients that do not render blocks.
pub const NOTIFICATION_TEXT: &str = "*Todo Summary*";

/// Split `text` into pieces of at most `limit` characters, preferring line breaks.
#[must_use]
pub fn chunk_text(text: &str, limit: usize) -> Vec<String> {
    if limit == 0 {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();

        if current_len + line_len > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len > limit {
            // A single line longer than the limit is hard-split.
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(limit) {
                let piece: String = piece.iter().collect();
                if piece.chars().count() == limit {
                    chunks.push(piece);
                } else {
                    current_len = piece.chars().count();
                    current = piece;
                }
            }
            continue;
        }

        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Build the webhook payload for a summary.
#[must_use]
pub fn build_summary_payload(message: &SummaryMessage) -> Value {
    let mut blocks = vec![json!({
        "type": "header",
        "text": {
            "type": "plain_text",
            "text": SUMMARY_HEADER,
            "emoji": true
        }
    })];

    blocks.extend(
        chunk_text(&message.summary, SECTION_TEXT_LIMIT)
            .into_iter()
            .map(|chunk| {
                json!({
                    "type": "section",
                    "text": { "type": "mrkdwn", "text": chunk }
                })
            }),
    );

    blocks.push(json!({
        "type": "context",
        "elements": [
            {
                "type": "mrkdwn",
                "text": format!(
                    "*Pending Tasks:* {} | Generated on {}",
                    message.pending_count,
                    message.generated_at.format("%Y-%m-%d %H:%M UTC")
                )
            }
        ]
    }));

    json!({
        "text": NOTIFICATION_TEXT,
        "blocks": blocks
    })
}
