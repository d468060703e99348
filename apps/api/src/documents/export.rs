//! Export of edited resume text as a downloadable document.

use std::io::Cursor;

use docx_rs::{Docx, Paragraph, Run};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use thiserror::Error;

const DEFAULT_FILE_STEM: &str = "improved_resume";
const HEADER_MAX_CHARS: usize = 50;
const HEADER_MARKERS: &[&str] = &["EXPERIENCE", "EDUCATION", "SKILLS", "SUMMARY", "CONTACT"];

/// Font sizes in half-points (docx) – 14pt headers, 12pt body.
const HEADER_HALF_POINTS: usize = 28;
const BODY_HALF_POINTS: usize = 24;

/// A4 portrait with 20 mm margins.
const PDF_PAGE_WIDTH_MM: f32 = 210.0;
const PDF_PAGE_HEIGHT_MM: f32 = 297.0;
const PDF_MARGIN_MM: f32 = 20.0;
const PDF_HEADER_PT: f32 = 14.0;
const PDF_BODY_PT: f32 = 11.0;
/// Baseline-to-baseline distance as a multiple of the font size.
const PDF_LINE_SPACING: f32 = 1.4;
const PT_TO_MM: f32 = 0.3528;
/// Helvetica at 11pt fits roughly this many characters in 170 mm.
const PDF_WRAP_CHARS: usize = 95;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to build DOCX: {0}")]
    Docx(String),

    #[error("Failed to build PDF: {0}")]
    Pdf(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Docx,
    Rtf,
    Txt,
}

impl ExportFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(ExportFormat::Pdf),
            "docx" => Some(ExportFormat::Docx),
            "rtf" => Some(ExportFormat::Rtf),
            "txt" => Some(ExportFormat::Txt),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Rtf => "rtf",
            ExportFormat::Txt => "txt",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => crate::documents::extract::PDF_MIME,
            ExportFormat::Docx => crate::documents::extract::DOCX_MIME,
            ExportFormat::Rtf => "application/rtf",
            ExportFormat::Txt => "text/plain; charset=utf-8",
        }
    }
}

pub fn render(resume_text: &str, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Pdf => render_pdf(resume_text),
        ExportFormat::Docx => render_docx(resume_text),
        ExportFormat::Rtf => Ok(render_rtf(resume_text).into_bytes()),
        ExportFormat::Txt => Ok(resume_text.as_bytes().to_vec()),
    }
}

/// Short lines that are all caps, or name a standard resume section, render as headers.
pub fn is_header_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.chars().count() >= HEADER_MAX_CHARS {
        return false;
    }
    let all_caps = trimmed.chars().any(char::is_alphabetic)
        && trimmed == trimmed.to_uppercase();
    all_caps || HEADER_MARKERS.iter().any(|marker| trimmed.contains(marker))
}

fn render_docx(resume_text: &str) -> Result<Vec<u8>, ExportError> {
    let mut docx = Docx::new();
    for line in resume_text.lines() {
        let paragraph = if line.trim().is_empty() {
            Paragraph::new().add_run(Run::new())
        } else if is_header_line(line) {
            Paragraph::new().add_run(Run::new().add_text(line).bold().size(HEADER_HALF_POINTS))
        } else {
            Paragraph::new().add_run(Run::new().add_text(line).size(BODY_HALF_POINTS))
        };
        docx = docx.add_paragraph(paragraph);
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| ExportError::Docx(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// One text line per PDF line (long lines wrap at word boundaries), new page on overflow.
fn render_pdf(resume_text: &str) -> Result<Vec<u8>, ExportError> {
    let (doc, page, layer) = PdfDocument::new(
        "Resume",
        Mm(PDF_PAGE_WIDTH_MM),
        Mm(PDF_PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let body_font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    let header_font = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    let mut current: PdfLayerReference = doc.get_page(page).get_layer(layer);
    let mut cursor_mm = PDF_PAGE_HEIGHT_MM - PDF_MARGIN_MM;

    for line in resume_text.lines() {
        let (font, size): (&IndirectFontRef, f32) = if is_header_line(line) {
            (&header_font, PDF_HEADER_PT)
        } else {
            (&body_font, PDF_BODY_PT)
        };
        let step_mm = size * PDF_LINE_SPACING * PT_TO_MM;

        let pieces = wrap_line(line.trim_end(), PDF_WRAP_CHARS);
        for piece in pieces {
            if cursor_mm - step_mm < PDF_MARGIN_MM {
                let (next_page, next_layer) =
                    doc.add_page(Mm(PDF_PAGE_WIDTH_MM), Mm(PDF_PAGE_HEIGHT_MM), "Layer 1");
                current = doc.get_page(next_page).get_layer(next_layer);
                cursor_mm = PDF_PAGE_HEIGHT_MM - PDF_MARGIN_MM;
            }
            cursor_mm -= step_mm;
            if !piece.is_empty() {
                current.use_text(piece, size, Mm(PDF_MARGIN_MM), Mm(cursor_mm), font);
            }
        }
    }

    doc.save_to_bytes()
        .map_err(|e| ExportError::Pdf(e.to_string()))
}

/// Splits on whitespace so no piece exceeds `max_chars` (a single longer word stays whole).
/// A blank line yields one empty piece so it still takes vertical space.
fn wrap_line(line: &str, max_chars: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || pieces.is_empty() {
        pieces.push(current);
    }
    pieces
}

fn render_rtf(resume_text: &str) -> String {
    let body: Vec<String> = resume_text
        .lines()
        .map(|line| {
            let escaped = escape_rtf(line);
            if is_header_line(line) {
                format!("\\b\\fs28 {escaped}\\b0\\fs24")
            } else {
                escaped
            }
        })
        .collect();

    format!(
        "{{\\rtf1\\ansi\\deff0{{\\fonttbl{{\\f0 Helvetica;}}}}\\f0\\fs24\n{}\n}}",
        body.join("\\par\n")
    )
}

fn escape_rtf(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            c if c.is_ascii() => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{}?", *unit as i16));
                }
            }
        }
    }
    out
}

/// Attachment name: sanitized, ASCII-only, with the format's extension.
pub fn download_file_name(requested: Option<&str>, format: ExportFormat) -> String {
    let sanitized: String = sanitize_filename::sanitize(requested.unwrap_or_default())
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '_' })
        .collect();
    let stem = sanitized.trim();
    let stem = stem
        .strip_suffix(&format!(".{}", format.extension()))
        .unwrap_or(stem)
        .trim();
    let stem = if stem.is_empty() { DEFAULT_FILE_STEM } else { stem };
    format!("{stem}.{}", format.extension())
}
