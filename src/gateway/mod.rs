//! Stateless request/response layer over a generative model.
//!
//! Every operation makes exactly one model call and either returns a typed
//! value or a `GatewayError`. Nothing is retried and nothing is cached.

pub mod parse;
pub mod prompts;
pub mod types;

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, error, info};

use crate::capture::CaptureFrame;
use crate::config::GeminiConfig;
use crate::llm::{GeminiModel, GenerateRequest, GenerativeModel, InlineImage};

pub use types::*;

pub struct InferenceGateway {
    model: Arc<dyn GenerativeModel>,
    api_key: Option<String>,
    text_model: String,
    vision_model: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractedText {
    #[serde(default)]
    original_text: String,
    /// Must be present; `null` is accepted but a missing key is a schema mismatch.
    #[serde(deserialize_with = "present_or_null")]
    translation: Option<String>,
}

fn present_or_null<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}

impl From<CaptureFrame> for InlineImage {
    fn from(frame: CaptureFrame) -> Self {
        InlineImage {
            mime_type: frame.mime_type,
            data: frame.data,
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), GatewayError> {
    if value.trim().is_empty() {
        return Err(GatewayError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}

impl InferenceGateway {
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        api_key: Option<String>,
        text_model: impl Into<String>,
        vision_model: impl Into<String>,
    ) -> Self {
        Self {
            model,
            api_key,
            text_model: text_model.into(),
            vision_model: vision_model.into(),
        }
    }

    /// Gateway backed by the Gemini REST API.
    pub fn from_config(config: &GeminiConfig) -> Self {
        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            error!("Missing Gemini API key. Set gemini_config.api_key or GEMINI_API_KEY.");
        }
        Self::new(
            Arc::new(GeminiModel::new(&config.base_url)),
            api_key,
            &config.text_model,
            &config.vision_model,
        )
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    async fn call(&self, request: GenerateRequest) -> Result<String, GatewayError> {
        let api_key = self.api_key.as_deref().ok_or(GatewayError::Config)?;
        self.model.generate(api_key, &request).await.map_err(|e| {
            error!(model = %request.model, "Model call failed: {:#}", e);
            GatewayError::Remote(e.to_string())
        })
    }

    /// Translate `text`. Returns `None` when it is already in `target_language`.
    pub async fn translate(&self, text: &str, target_language: &str) -> Result<Option<String>, GatewayError> {
        self.api_key.as_ref().ok_or(GatewayError::Config)?;
        require("text", text)?;
        require("target language", target_language)?;

        let answer = self
            .call(GenerateRequest::text(&self.text_model, prompts::translate(text, target_language)))
            .await?;

        if parse::is_sentinel(&answer) {
            debug!(%target_language, "No translation needed");
            return Ok(None);
        }
        let translation = answer.trim();
        if translation.is_empty() {
            return Err(GatewayError::Parse("empty translation".to_string()));
        }
        Ok(Some(translation.to_string()))
    }

    /// Read the text in an image and translate it.
    pub async fn extract_and_translate(
        &self,
        image: impl Into<InlineImage>,
        target_language: &str,
    ) -> Result<TranslationResult, GatewayError> {
        self.api_key.as_ref().ok_or(GatewayError::Config)?;
        require("target language", target_language)?;
        let image = image.into();
        if image.data.is_empty() {
            return Err(GatewayError::InvalidInput("image must not be empty".to_string()));
        }

        let request = GenerateRequest::text(&self.vision_model, prompts::extract_and_translate(target_language))
            .with_image(image);
        let answer = self.call(request).await?;

        if parse::is_sentinel(&answer) {
            return Ok(TranslationResult {
                original_text: String::new(),
                translation: None,
            });
        }

        let extracted: ExtractedText = parse::parse_json(&answer)?;
        let translation = extracted.translation.filter(|t| !parse::is_sentinel(t));
        info!(
            chars = extracted.original_text.chars().count(),
            translated = translation.is_some(),
            "Image text extracted"
        );
        Ok(TranslationResult {
            original_text: extracted.original_text,
            translation,
        })
    }

    pub async fn plan_trip(
        &self,
        location: &str,
        duration: &str,
        interests: &[String],
    ) -> Result<TravelSuggestions, GatewayError> {
        self.api_key.as_ref().ok_or(GatewayError::Config)?;
        require("location", location)?;
        require("duration", duration)?;

        let answer = self
            .call(GenerateRequest::text(
                &self.text_model,
                prompts::travel_plan(location, duration, interests),
            ))
            .await?;
        parse::parse_json(&answer)
    }

    pub async fn water_safety(&self, country: &str) -> Result<WaterSafetyInfo, GatewayError> {
        self.api_key.as_ref().ok_or(GatewayError::Config)?;
        require("country", country)?;

        let answer = self
            .call(GenerateRequest::text(&self.text_model, prompts::water_safety(country)))
            .await?;
        parse::parse_json(&answer)
    }

    /// Free-text review of an itinerary.
    pub async fn analyze_itinerary(&self, itinerary: &str) -> Result<String, GatewayError> {
        self.api_key.as_ref().ok_or(GatewayError::Config)?;
        require("itinerary", itinerary)?;

        let answer = self
            .call(GenerateRequest::text(&self.text_model, prompts::analyze_itinerary(itinerary)))
            .await?;
        let analysis = answer.trim();
        if analysis.is_empty() {
            return Err(GatewayError::Parse("empty itinerary analysis".to_string()));
        }
        Ok(analysis.to_string())
    }
}
