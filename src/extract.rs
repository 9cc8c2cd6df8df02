//! Document format dispatch and text extraction.
//!
//! Formats are resolved once from the filename at the HTTP boundary into a
//! tagged variant; handlers never match on raw extension strings. Rich
//! formats (PDF, DOCX, OCR) sit behind the `DocumentExtractor` seam and are
//! rejected as unsupported until an extractor for them is wired in.

use std::path::Path;

use crate::core::errors::RagError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Markdown,
}

impl DocumentFormat {
    pub fn from_extension(extension: &str) -> Result<Self, RagError> {
        match extension.to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(Self::PlainText),
            "md" | "markdown" => Ok(Self::Markdown),
            other => Err(RagError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn from_filename(filename: &str) -> Result<Self, RagError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| RagError::UnsupportedFormat(filename.to_string()))?;
        Self::from_extension(extension)
    }
}

pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8], format: DocumentFormat) -> Result<String, RagError>;
}

/// Extractor for the text-native formats.
pub struct PlainTextExtractor;

impl DocumentExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8], format: DocumentFormat) -> Result<String, RagError> {
        match format {
            DocumentFormat::PlainText | DocumentFormat::Markdown => {
                String::from_utf8(bytes.to_vec())
                    .map_err(|err| RagError::Extraction(format!("invalid UTF-8: {err}")))
            }
        }
    }
}
