use serde::de::DeserializeOwned;

use super::prompts::NO_TRANSLATION_NEEDED;
use super::types::GatewayError;

pub fn is_sentinel(text: &str) -> bool {
    let text = text.trim();
    text == NO_TRANSLATION_NEEDED || text.trim_matches('"') == NO_TRANSLATION_NEEDED
}

/// Strip a Markdown code fence (```json ... ```) if the model wrapped its answer in one.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse a model answer into a fixed schema. Anything that does not match is a `Parse` error.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, GatewayError> {
    serde_json::from_str(strip_code_fence(text)).map_err(|e| {
        let preview: String = text.trim().chars().take(80).collect();
        GatewayError::Parse(format!("{} (response started with {:?})", e, preview))
    })
}
