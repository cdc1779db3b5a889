use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::interface::{GenerateRequest, GenerativeModel};

/// A model that replays canned answers and records what it was asked.
#[derive(Default)]
pub struct MockModel {
    replies: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<(String, GenerateRequest)>>,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(response.into()));
        self
    }

    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Err(message.into()));
        self
    }

    pub fn calls(&self) -> Vec<(String, GenerateRequest)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeModel for MockModel {
    async fn generate(&self, api_key: &str, request: &GenerateRequest) -> Result<String, anyhow::Error> {
        self.calls
            .lock()
            .unwrap()
            .push((api_key.to_string(), request.clone()));
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Err(anyhow::anyhow!("MockModel: no response queued")),
        }
    }
}
