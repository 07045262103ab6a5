use async_trait::async_trait;
use std::sync::Arc;
use tracing::Instrument;

use crate::error::{PagesmithError, Result};
use crate::form::Submission;
use crate::prompt::{PromptOptions, build_request};
use crate::sanitize::strip_code_fences;
use crate::transport::Transport;

#[async_trait]
pub trait Generator: Send + Sync {
    /// Returns the generated HTML document for one submission
    async fn generate(&self, submission: &Submission) -> Result<String>;
}

pub struct GeminiGenerator {
    tx: Arc<dyn Transport>,
    model: String,
    options: PromptOptions,
}

impl GeminiGenerator {
    pub fn new(tx: Arc<dyn Transport>, model: String, options: PromptOptions) -> Self {
        Self { tx, model, options }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, submission: &Submission) -> Result<String> {
        let span = tracing::info_span!(
            "generate",
            request_id = %uuid::Uuid::new_v4(),
            model = %self.model
        );

        async move {
            tracing::info!(
                prompt_chars = submission.prompt.chars().count(),
                attachment_mime = submission.attachment.as_ref().map(|a| a.mime_type.as_str()),
                attachment_bytes = submission.attachment.as_ref().map(|a| a.size()),
                "Generating page with Gemini"
            );

            let request = build_request(submission, &self.options);
            let response = match self.tx.generate(&self.model, &request).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!("Gemini request failed: {}", e);
                    return Err(e);
                }
            };

            if let Some(reason) = response.block_reason() {
                tracing::error!(reason, "Gemini blocked the prompt");
                return Err(PagesmithError::Blocked(reason.to_string()));
            }

            let finish_reason = response.finish_reason();
            let Some(text) = response.text() else {
                tracing::error!(?finish_reason, "Gemini returned no text");
                return Err(PagesmithError::EmptyResponse);
            };
            if response.is_truncated() {
                tracing::warn!(
                    ?finish_reason,
                    text_chars = text.chars().count(),
                    "Gemini stopped early, page may be incomplete"
                );
            }

            let html = strip_code_fences(&text);
            if html.is_empty() {
                tracing::error!("Gemini returned only markdown fences");
                return Err(PagesmithError::EmptyResponse);
            }

            tracing::info!(html_chars = html.chars().count(), "Page generated");
            Ok(html)
        }
        .instrument(span)
        .await
    }
}
