//! Prompt construction for chat-style summarization backends.

use crate::provider::{Message, Role};

const SYSTEM_PROMPT: &str = "You are a summarization engine. Summarize the text the user \
sends you. Reply with the summary only: no preamble, no headings, no commentary.";

/// Clamp raw length targets so `1 <= max` and `min <= max`.
pub fn normalize_bounds(min_length: usize, max_length: usize) -> (usize, usize) {
    let max = max_length.max(1);
    (min_length.min(max), max)
}

/// Token budget for a summary of at most `max_words` words.
/// Roughly 4 tokens per 3 words, plus headroom for punctuation.
pub fn token_budget(max_words: usize) -> u32 {
    let budget = max_words.saturating_mul(4) / 3 + 32;
    u32::try_from(budget).unwrap_or(u32::MAX)
}

/// Chat messages asking for a summary of `text` within the word bounds.
pub fn summarization_messages(text: &str, min_length: usize, max_length: usize) -> Vec<Message> {
    let (min, max) = normalize_bounds(min_length, max_length);
    let instruction = if min == max {
        format!("Summarize the following text in about {max} words.")
    } else {
        format!("Summarize the following text in {min} to {max} words.")
    };
    vec![
        Message {
            role: Role::System,
            content: SYSTEM_PROMPT.to_string(),
        },
        Message {
            role: Role::User,
            content: format!("{instruction}\n\n{text}"),
        },
    ]
}

/// Render messages as the `{"role", "content"}` objects both chat APIs take.
pub fn to_api_messages(messages: &[Message]) -> Vec<serde_json::Value> {
    messages
        .iter()
        .map(|m| {
            serde_json::json!({
                "role": m.role.as_str(),
                "content": m.content,
            })
        })
        .collect()
}

/// Strip wrapping whitespace and quotes some models add around the summary.
pub fn clean_summary(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_clamped() {
        assert_eq!(normalize_bounds(0, 0), (0, 1));
        assert_eq!(normalize_bounds(10, 5), (5, 5));
        assert_eq!(normalize_bounds(100, 200), (100, 200));
    }

    #[test]
    fn prompt_carries_range_and_text() {
        let msgs = summarization_messages("some long text", 100, 200);
        assert_eq!(msgs.len(), 2);
        assert!(matches!(msgs[0].role, Role::System));
        assert!(msgs[1].content.starts_with("Summarize the following text in 100 to 200 words."));
        assert!(msgs[1].content.ends_with("some long text"));
    }

    #[test]
    fn prompt_for_tiny_chunk_still_has_a_range() {
        let msgs = summarization_messages("word", 0, 0);
        assert!(msgs[1].content.contains("in 0 to 1 words"));
        let msgs = summarization_messages("word", 3, 3);
        assert!(msgs[1].content.contains("in about 3 words"));
    }

    #[test]
    fn api_messages_use_lowercase_roles() {
        let api = to_api_messages(&summarization_messages("x", 1, 2));
        assert_eq!(api[0]["role"], "system");
        assert_eq!(api[1]["role"], "user");
    }

    #[test]
    fn budget_grows_with_words() {
        assert_eq!(token_budget(0), 32);
        assert_eq!(token_budget(300), 432);
        assert_eq!(token_budget(usize::MAX), u32::MAX);
    }

    #[test]
    fn cleans_quotes_and_whitespace() {
        assert_eq!(clean_summary("  \"A summary.\"\n"), "A summary.");
        assert_eq!(clean_summary("Plain"), "Plain");
    }
}
