use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::error::{PagesmithError, Result};
use crate::models::{ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse};

pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[async_trait]
pub trait Transport: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        req: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;
}

pub struct GeminiTransport {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiTransport {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl Transport for GeminiTransport {
    async fn generate(
        &self,
        model: &str,
        req: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(req)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(|e| {
                PagesmithError::Internal(format!("Failed to parse Gemini API response: {e}"))
            });
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = match serde_json::from_str::<ApiErrorEnvelope>(&body) {
            Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
            _ => body,
        };

        Err(PagesmithError::Upstream {
            status: status.as_u16(),
            message,
        })
    }
}
