use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;

use crate::error::{PagesmithError, Result};
use crate::models::InlineData;

/// Types Gemini accepts as inline image or document parts
const SUPPORTED_MIME: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/webp",
    "image/heic",
    "image/heif",
    "application/pdf",
];

/// Extension table used when the browser (or the filesystem) gives no usable type
const EXTENSION_MIME: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("webp", "image/webp"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
    ("pdf", "application/pdf"),
];

/// A file the user attached, sent to Gemini as an inline part
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub file_name: Option<String>,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(
        file_name: Option<String>,
        declared_mime: Option<&str>,
        bytes: Vec<u8>,
        limit: usize,
    ) -> Result<Self> {
        if bytes.is_empty() {
            return Err(PagesmithError::validation("file", "attached file is empty"));
        }
        if bytes.len() > limit {
            return Err(PagesmithError::PayloadTooLarge {
                size: bytes.len(),
                limit,
            });
        }

        let mime_type = resolve_mime(file_name.as_deref(), declared_mime);
        if !is_supported(&mime_type) {
            return Err(PagesmithError::UnsupportedMedia { mime: mime_type });
        }

        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }

    pub fn from_path(path: &Path, limit: usize) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        Self::new(file_name, None, bytes, limit)
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn to_inline_data(&self) -> InlineData {
        InlineData {
            mime_type: self.mime_type.clone(),
            data: self.to_base64(),
        }
    }

    /// Data URL for the thumbnail preview; PDFs get none
    pub fn preview_data_url(&self) -> Option<String> {
        if self.is_image() {
            Some(format!("data:{};base64,{}", self.mime_type, self.to_base64()))
        } else {
            None
        }
    }
}

fn resolve_mime(file_name: Option<&str>, declared: Option<&str>) -> String {
    if let Some(declared) = declared {
        // Drop parameters such as "; charset=binary"
        let essence = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if !essence.is_empty() && essence != "application/octet-stream" {
            return essence;
        }
    }

    file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .and_then(|ext| {
            EXTENSION_MIME
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, mime)| (*mime).to_string())
        })
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

fn is_supported(mime: &str) -> bool {
    SUPPORTED_MIME.contains(&mime)
}
