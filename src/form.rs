//! Input widget state: prompt text, an optional attachment, drag highlight and
//! the generating flag. The browser page enforces the same gating client-side.

use crate::attachment::Attachment;
use crate::error::{PagesmithError, Result};

/// Values collected by the form and handed to the generator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Submission {
    pub prompt: String,
    pub attachment: Option<Attachment>,
}

impl Submission {
    pub fn new(prompt: impl Into<String>, attachment: Option<Attachment>) -> Self {
        Self {
            prompt: prompt.into(),
            attachment,
        }
    }

    pub fn has_prompt(&self) -> bool {
        !self.prompt.trim().is_empty()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_prompt() && self.attachment.is_none()
    }
}

#[derive(Debug, Default)]
pub struct PromptForm {
    prompt: String,
    attachment: Option<Attachment>,
    dragging: bool,
    generating: bool,
}

impl PromptForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Replaces any previously attached file
    pub fn attach(&mut self, attachment: Attachment) {
        self.attachment = Some(attachment);
    }

    pub fn clear_attachment(&mut self) {
        self.attachment = None;
    }

    pub fn drag_enter(&mut self) {
        self.dragging = true;
    }

    pub fn drag_leave(&mut self) {
        self.dragging = false;
    }

    pub fn drop_file(&mut self, attachment: Attachment) {
        self.dragging = false;
        self.attach(attachment);
    }

    pub fn set_generating(&mut self, generating: bool) {
        self.generating = generating;
    }

    pub fn can_submit(&self) -> bool {
        (!self.prompt.trim().is_empty() || self.attachment.is_some()) && !self.generating
    }

    /// Takes the collected values and resets the form. Leaves the state
    /// untouched when submission is not allowed.
    pub fn submit(&mut self) -> Result<Submission> {
        if self.generating {
            return Err(PagesmithError::validation(
                "input",
                "a page is already being generated",
            ));
        }
        if !self.can_submit() {
            return Err(PagesmithError::validation(
                "input",
                "enter a prompt or attach a file",
            ));
        }

        self.dragging = false;
        Ok(Submission {
            prompt: std::mem::take(&mut self.prompt),
            attachment: self.attachment.take(),
        })
    }
}
