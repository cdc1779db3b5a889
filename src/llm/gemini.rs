use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::interface::{GenerateRequest, GenerativeModel};

/// Gemini `generateContent` REST client
pub struct GeminiModel {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text {
        text: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: Blob<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GeminiModel {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Initialized GeminiModel: base_url={}", base_url);
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl GenerativeModel for GeminiModel {
    async fn generate(&self, api_key: &str, request: &GenerateRequest) -> Result<String, anyhow::Error> {
        let mut parts = vec![RequestPart::Text { text: &request.prompt }];
        if let Some(image) = &request.image {
            parts.push(RequestPart::InlineData {
                inline_data: Blob {
                    mime_type: &image.mime_type,
                    data: STANDARD.encode(&image.data),
                },
            });
        }
        let body = GenerateContentRequest {
            contents: vec![RequestContent { role: "user", parts }],
        };

        debug!(model = %request.model, with_image = request.image.is_some(), "Calling Gemini");
        let response = self
            .client
            .post(self.endpoint(&request.model))
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(%status, "Gemini request failed");
            anyhow::bail!("Gemini API error ({}): {}", status, detail.trim());
        }

        let parsed: GenerateContentResponse = response.json().await?;
        if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
            anyhow::bail!("Gemini blocked the prompt: {}", reason);
        }

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("Gemini returned no candidates"))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            anyhow::bail!(
                "Gemini returned an empty answer (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            );
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::interface::InlineImage;
    use axum::extract::{Path, Query, State};
    use axum::routing::post;
    use axum::{http::StatusCode, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorded {
        calls: Arc<Mutex<Vec<(String, HashMap<String, String>, Value)>>>,
    }

    async fn start_mock(reply: (StatusCode, Value)) -> (String, Recorded) {
        let recorded = Recorded::default();
        let app = Router::new()
            .route(
                "/v1beta/models/:call",
                post(
                    move |State(rec): State<Recorded>,
                          Path(call): Path<String>,
                          Query(query): Query<HashMap<String, String>>,
                          Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            rec.calls.lock().unwrap().push((call, query, body));
                            (reply.0, Json(reply.1))
                        }
                    },
                ),
            )
            .with_state(recorded.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/v1beta/", addr), recorded)
    }

    fn answer(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        })
    }

    #[tokio::test]
    async fn sends_prompt_key_and_inline_image() {
        let (base_url, recorded) = start_mock((StatusCode::OK, answer("Hello"))).await;
        let model = GeminiModel::new(base_url);

        let request = GenerateRequest::text("gemini-1.5-flash", "Translate this").with_image(InlineImage {
            mime_type: "image/jpeg".to_string(),
            data: vec![1, 2, 3],
        });
        let text = model.generate("secret", &request).await.unwrap();
        assert_eq!(text, "Hello");

        let calls = recorded.calls.lock().unwrap();
        let (call, query, body) = &calls[0];
        assert_eq!(call, "gemini-1.5-flash:generateContent");
        assert_eq!(query.get("key").map(String::as_str), Some("secret"));
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Translate this");
        assert_eq!(body["contents"][0]["parts"][1]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(body["contents"][0]["parts"][1]["inlineData"]["data"], "AQID");
    }

    #[tokio::test]
    async fn concatenates_multiple_parts() {
        let reply = json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] } }]
        });
        let (base_url, _) = start_mock((StatusCode::OK, reply)).await;
        let text = GeminiModel::new(base_url)
            .generate("k", &GenerateRequest::text("m", "p"))
            .await
            .unwrap();
        assert_eq!(text, "{\"a\":1}");
    }

    #[tokio::test]
    async fn http_errors_are_reported() {
        let (base_url, _) = start_mock((
            StatusCode::FORBIDDEN,
            json!({ "error": { "message": "API key not valid" } }),
        ))
        .await;
        let err = GeminiModel::new(base_url)
            .generate("bad", &GenerateRequest::text("m", "p"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn blocked_and_empty_answers_are_errors() {
        let (base_url, _) = start_mock((
            StatusCode::OK,
            json!({ "promptFeedback": { "blockReason": "SAFETY" } }),
        ))
        .await;
        let err = GeminiModel::new(base_url)
            .generate("k", &GenerateRequest::text("m", "p"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("SAFETY"));

        let (base_url, _) = start_mock((StatusCode::OK, json!({ "candidates": [] }))).await;
        assert!(GeminiModel::new(base_url)
            .generate("k", &GenerateRequest::text("m", "p"))
            .await
            .is_err());
    }
}
