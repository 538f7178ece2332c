use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

use crate::error::{ApiError, Result};

/// One page as written by the text provider
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedPage {
    pub text: String,
    // Older prompts asked for "prompt"
    #[serde(default, alias = "prompt")]
    pub image_prompt: String,
}

fn bracketed_array() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[[\s\S]*\]").expect("static regex is valid"))
}

/// First stage: the greedy `[...]` span, first `[` through last `]`
pub fn extract_bracketed_array(reply: &str) -> Option<&str> {
    bracketed_array().find(reply).map(|m| m.as_str())
}

/// Second stage: parse a candidate as the page array
pub fn parse_page_array(candidate: &str) -> std::result::Result<Vec<ParsedPage>, serde_json::Error> {
    serde_json::from_str(candidate.trim())
}

/// Extract the page list from a free-text provider reply.
///
/// The bracketed span is tried first; only a reply with no `[...]` at all
/// falls back to parsing the whole body. There is no repair: any failure is
/// a [`ApiError::MalformedReply`] carrying the raw reply for the logs.
pub fn parse_story_reply(reply: &str) -> Result<Vec<ParsedPage>> {
    let candidate = extract_bracketed_array(reply).unwrap_or(reply);

    parse_page_array(candidate).map_err(|e| {
        tracing::warn!("Story reply is not a page array: {}", e);
        ApiError::MalformedReply(reply.to_string())
    })
}
