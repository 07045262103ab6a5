use crate::form::Submission;
use crate::models::{Content, GenerateContentRequest, GenerationConfig, Part};

pub const SYSTEM_INSTRUCTION: &str = r#"You are an expert front-end engineer and designer. You turn a user's request, and optionally an attached image or PDF, into a working web page.

Rules:
- Respond with exactly one complete HTML document, starting with <!DOCTYPE html> and ending with </html>.
- Put all CSS in a <style> element and all JavaScript in a <script> element inside that document. Do not reference local files.
- External resources are allowed only from public CDNs over https.
- The page must be responsive, accessible, and work when loaded from an iframe srcdoc.
- If an image is attached, treat it as a sketch, screenshot, or design reference and reproduce its layout and intent.
- If a PDF is attached, base the page on its content.
- Do not wrap the document in markdown code fences and do not add any explanation before or after it."#;

pub const PROMPT_TEMPLATE: &str =
    "Build a single-file web application (HTML, CSS and JavaScript in one document) for the following request.";

const ATTACHMENT_ONLY_REQUEST: &str =
    "No written request was given. Use the attached file as the complete description of what to build.";

const ATTACHMENT_NOTE: &str = "A file is attached; use it as a reference for the request.";

/// Generation settings taken from config
#[derive(Debug, Clone, Default)]
pub struct PromptOptions {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

pub fn build_user_text(submission: &Submission) -> String {
    let request = if submission.has_prompt() {
        submission.prompt.trim()
    } else {
        ATTACHMENT_ONLY_REQUEST
    };

    if submission.attachment.is_some() && submission.has_prompt() {
        format!("{PROMPT_TEMPLATE}\n\n{ATTACHMENT_NOTE}\n\nRequest:\n{request}")
    } else {
        format!("{PROMPT_TEMPLATE}\n\nRequest:\n{request}")
    }
}

pub fn build_request(submission: &Submission, options: &PromptOptions) -> GenerateContentRequest {
    let mut parts = vec![Part::text(build_user_text(submission))];
    if let Some(attachment) = &submission.attachment {
        parts.push(Part::InlineData {
            inline_data: attachment.to_inline_data(),
        });
    }

    let generation_config = GenerationConfig {
        temperature: options.temperature,
        max_output_tokens: options.max_output_tokens,
        response_mime_type: Some("text/plain".to_string()),
    };

    GenerateContentRequest {
        system_instruction: Some(Content::system(SYSTEM_INSTRUCTION)),
        contents: vec![Content::user(parts)],
        generation_config: Some(generation_config),
    }
}
