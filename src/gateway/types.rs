use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no Gemini API key configured")]
    Config,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("model request failed: {0}")]
    Remote(String),
    #[error("unexpected model response: {0}")]
    Parse(String),
}

/// Text read off an image, with its translation.
/// `translation` is `None` when the text is already in the target language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    #[serde(default)]
    pub original_text: String,
    pub translation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterSafetyInfo {
    pub safe: bool,
    pub tips: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelSuggestions {
    pub activities: Vec<String>,
    pub safety_tips: Vec<String>,
    pub local_customs: Vec<String>,
    pub transportation_tips: Vec<String>,
}
