use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use axum::body::Bytes;
use tracing::{debug, warn};

use crate::analysis::error::ExtractionError;

pub const TEXT_PLAIN: &str = "text/plain";
pub const APPLICATION_PDF: &str = "application/pdf";

/// Converts an uploaded CV document into plain text.
///
/// Only `text/plain` and text-layer `application/pdf` are accepted. There is no
/// OCR: scanned PDFs yield whatever text layer they carry, possibly none.
pub fn extract_text(bytes: &[u8], content_type: Option<&str>) -> Result<String, ExtractionError> {
    let media_type = content_type.map(media_type).unwrap_or_default();

    match media_type.as_str() {
        TEXT_PLAIN => Ok(String::from_utf8(bytes.to_vec())?),
        APPLICATION_PDF => {
            let text = extract_pdf(bytes)?;
            debug!("Extracted {} chars from PDF ({} bytes)", text.len(), bytes.len());
            Ok(text)
        }
        "" => Err(ExtractionError::UnsupportedMediaType(
            "missing Content-Type".to_string(),
        )),
        other => Err(ExtractionError::UnsupportedMediaType(other.to_string())),
    }
}

/// Runs [`extract_text`] on the blocking pool.
///
/// PDF parsing is CPU-bound and the body may be several MiB.
pub async fn extract_document(
    body: Bytes,
    content_type: Option<String>,
) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || extract_text(&body, content_type.as_deref()))
        .await
        .map_err(|e| ExtractionError::Pdf(format!("extraction task failed: {e}")))?
}

/// pdf-extract panics on some well-formed documents (e.g. a font operator
/// with no `/Font` resource), so a panic is reported as a PDF error.
fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(result) => result.map_err(|e| ExtractionError::Pdf(e.to_string())),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!("PDF extraction panicked: {message}");
            Err(ExtractionError::Pdf(format!("unreadable PDF: {message}")))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// `"Text/Plain; charset=utf-8"` → `"text/plain"`.
fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Builds a single-page PDF with a valid xref table. The page content
    /// selects `/F1`; the page resources declare it only when `with_font`.
    pub(crate) fn single_page_pdf(with_font: bool) -> Vec<u8> {
        let content = "BT /F1 12 Tf 72 720 Td (Master python) Tj ET";
        let resources = if with_font {
            "<< /Font << /F1 5 0 R >> >>"
        } else {
            "<< >>"
        };
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources {resources} /Contents 4 0 R >>"
            ),
            format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }

        let xref = pdf.len();
        pdf.extend(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
        for offset in offsets {
            pdf.extend(format!("{offset:010} 00000 n \n").as_bytes());
        }
        pdf.extend(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
                objects.len() + 1
            )
            .as_bytes(),
        );
        pdf
    }
}
