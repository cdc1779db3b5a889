use async_trait::async_trait;

/// Image sent inline with a prompt.
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// One prompt for one model call.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub image: Option<InlineImage>,
}

impl GenerateRequest {
    pub fn text(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: InlineImage) -> Self {
        self.image = Some(image);
        self
    }
}

/// Interface for a stateless generative model.
/// Each call is independent: no history, no system prompt kept between calls.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Run one prompt and return the full text of the answer
    async fn generate(&self, api_key: &str, request: &GenerateRequest) -> Result<String, anyhow::Error>;
}
