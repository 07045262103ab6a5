use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::form::{PromptForm, Submission};
use crate::generator::{GeminiGenerator, Generator};
use crate::transport::{GeminiTransport, Transport};

/// Main service struct shared by the web UI and the CLI
#[derive(Clone)]
pub struct PagesmithService {
    generator: Arc<dyn Generator>,
    max_upload_bytes: usize,
}

impl PagesmithService {
    pub fn new(cfg: &Config) -> Result<Self> {
        let transport = Arc::new(GeminiTransport::new(
            cfg.gemini.api_key.clone(),
            cfg.gemini.base_url.clone(),
            cfg.get_request_timeout(),
        )?);

        let generator = GeminiGenerator::new(
            transport as Arc<dyn Transport>,
            cfg.gemini.model.clone(),
            cfg.prompt_options(),
        );
        tracing::info!(model = %generator.model(), "Service created");

        Ok(Self::with_generator(
            Arc::new(generator),
            cfg.upload.max_bytes,
        ))
    }

    pub fn with_generator(generator: Arc<dyn Generator>, max_upload_bytes: usize) -> Self {
        Self {
            generator,
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub async fn generate(&self, submission: &Submission) -> Result<String> {
        self.generator.generate(submission).await
    }

    /// Submits the form and generates a page; the form is marked as
    /// generating until the call returns
    pub async fn submit(&self, form: &mut PromptForm) -> Result<String> {
        let submission = form.submit()?;
        form.set_generating(true);
        let result = self.generate(&submission).await;
        form.set_generating(false);
        result
    }
}
