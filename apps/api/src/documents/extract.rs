//! Text extraction from uploaded resumes (PDF and Word).
//!
//! CPU-bound: async callers go through `extract_upload`, which runs on the blocking pool.

use std::io::{Cursor, Read};

use anyhow::anyhow;
use bytes::Bytes;
use quick_xml::{events::Event, Reader as XmlReader};
use thiserror::Error;
use tracing::info;
use zip::ZipArchive;

use crate::analysis::normalizer::normalize;
use crate::errors::AppError;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const DOC_MIME: &str = "application/msword";
const OCTET_STREAM_MIME: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to extract text from PDF file: {0}")]
    Pdf(String),

    #[error("Failed to parse Word document. Please ensure it's a valid DOCX file: {0}")]
    Docx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    /// OOXML package; `application/msword` uploads are parsed the same way.
    Docx,
}

impl DocumentKind {
    /// Picks a parser from the declared MIME type. Generic `application/octet-stream`
    /// uploads are resolved by file extension.
    pub fn detect(mime_type: &str, file_name: &str) -> Result<Self, ExtractionError> {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            PDF_MIME => Ok(DocumentKind::Pdf),
            DOCX_MIME | DOC_MIME => Ok(DocumentKind::Docx),
            OCTET_STREAM_MIME | "" => {
                match extension(file_name).as_deref() {
                    Some("pdf") => Ok(DocumentKind::Pdf),
                    Some("docx") | Some("doc") => Ok(DocumentKind::Docx),
                    _ => Err(ExtractionError::UnsupportedFormat(format!(
                        "{OCTET_STREAM_MIME} ({file_name})"
                    ))),
                }
            }
            _ => Err(ExtractionError::UnsupportedFormat(essence)),
        }
    }
}

/// Extracts and normalizes text. The result may be empty (an image-only PDF, say);
/// callers decide whether that is acceptable.
pub fn extract_text(
    bytes: &[u8],
    mime_type: &str,
    file_name: &str,
) -> Result<String, ExtractionError> {
    let raw = match DocumentKind::detect(mime_type, file_name)? {
        DocumentKind::Pdf => extract_pdf_text(bytes)?,
        DocumentKind::Docx => extract_docx_text(bytes)?,
    };
    Ok(normalize(&raw))
}

/// A resume file as received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

/// Runs extraction on the blocking pool so PDF parsing never stalls the runtime.
pub async fn extract_upload(upload: UploadedDocument) -> Result<String, AppError> {
    let file_name = upload.file_name.clone();
    let text = tokio::task::spawn_blocking(move || {
        extract_text(&upload.bytes, &upload.mime_type, &upload.file_name)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow!("extraction task failed: {e}")))??;

    info!(
        file_name = %file_name,
        extracted_chars = text.chars().count(),
        "Resume text extracted"
    );
    Ok(text)
}

fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    // pdf-extract panics on some malformed inputs instead of returning an error
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ExtractionError::Pdf(e.to_string())),
        Err(_) => Err(ExtractionError::Pdf("unreadable PDF structure".to_string())),
    }
}

fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Docx(format!("not a DOCX archive: {e}")))?;

    let mut document = archive
        .by_name("word/document.xml")
        .map_err(|_| ExtractionError::Docx("missing word/document.xml".to_string()))?;

    let mut xml = String::new();
    document
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Docx(format!("failed to read document XML: {e}")))?;

    let mut reader = XmlReader::from_str(&xml);
    let mut buf = Vec::new();
    let mut output = String::new();
    let mut in_text_node = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text_node = true,
                b"w:tab" => output.push('\t'),
                b"w:br" => output.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:tab" => output.push('\t'),
                b"w:br" => output.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text_node {
                    let value = e
                        .unescape()
                        .map_err(|err| ExtractionError::Docx(err.to_string()))?;
                    output.push_str(&value);
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text_node = false,
                b"w:p" => output.push('\n'),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(ExtractionError::Docx(format!(
                    "failed to parse document XML: {err}"
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(output)
}

fn extension(file_name: &str) -> Option<String> {
    std::path::Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}
