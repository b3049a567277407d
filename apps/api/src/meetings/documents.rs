//! Document text extraction for uploaded meeting notes.
//!
//! `DocumentTextExtractor` is the seam; `StandardDocumentExtractor` handles
//! PDF (pdf-extract), DOCX (docx-rs) and plain text.

use std::path::Path;

use thiserror::Error;

/// Longest first line still accepted as a title.
const MAX_TITLE_CHARS: usize = 80;

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Unsupported file type: {0}. Upload a PDF, DOCX or text file.")]
    Unsupported(String),

    #[error("Could not read the PDF: {0}")]
    Pdf(String),

    #[error("Could not read the DOCX file: {0}")]
    Docx(String),

    #[error("No readable text found in the uploaded file")]
    Empty,
}

/// Turns uploaded bytes into plain text.
/// Implementations are CPU-bound; callers run them off the async runtime.
pub trait DocumentTextExtractor: Send + Sync {
    fn extract_text(&self, kind: DocumentKind, bytes: &[u8]) -> Result<String, DocumentError>;
}

pub struct StandardDocumentExtractor;

impl DocumentTextExtractor for StandardDocumentExtractor {
    fn extract_text(&self, kind: DocumentKind, bytes: &[u8]) -> Result<String, DocumentError> {
        let text = match kind {
            DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| DocumentError::Pdf(e.to_string()))?,
            DocumentKind::Docx => extract_docx(bytes)?,
            DocumentKind::PlainText => String::from_utf8_lossy(bytes).into_owned(),
        };

        let text = normalize_whitespace(&text);
        if text.is_empty() {
            return Err(DocumentError::Empty);
        }
        Ok(text)
    }
}

/// Picks the extractor from the content type, falling back to the extension.
pub fn detect_kind(
    content_type: Option<&str>,
    filename: Option<&str>,
) -> Result<DocumentKind, DocumentError> {
    let content_type = content_type
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
        .unwrap_or_default();

    match content_type.as_str() {
        "application/pdf" => return Ok(DocumentKind::Pdf),
        DOCX_CONTENT_TYPE => return Ok(DocumentKind::Docx),
        ct if ct.starts_with("text/") => return Ok(DocumentKind::PlainText),
        _ => {}
    }

    let extension = filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => Ok(DocumentKind::Pdf),
        "docx" => Ok(DocumentKind::Docx),
        "txt" | "text" | "md" | "markdown" => Ok(DocumentKind::PlainText),
        "" => Err(DocumentError::Unsupported(if content_type.is_empty() {
            "unknown".to_string()
        } else {
            content_type
        })),
        other => Err(DocumentError::Unsupported(format!(".{other}"))),
    }
}

/// First non-empty line if it is short enough, otherwise the filename stem.
pub fn infer_title(text: &str, filename: Option<&str>) -> Option<String> {
    let first_line = text.lines().map(str::trim).find(|line| !line.is_empty());
    if let Some(line) = first_line {
        if line.chars().count() <= MAX_TITLE_CHARS {
            return Some(line.to_string());
        }
    }

    filename
        .and_then(|name| Path::new(name).file_stem())
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.replace(['_', '-'], " ").trim().to_string())
        .filter(|stem| !stem.is_empty())
}

/// CRLF to LF, trailing spaces trimmed, runs of blank lines collapsed to one.
pub fn normalize_whitespace(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<&str> = Vec::new();
    let mut blank_run = 0;

    for line in unified.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
            lines.push("");
        } else {
            blank_run = 0;
            lines.push(line);
        }
    }

    lines.join("\n").trim().to_string()
}

fn extract_docx(bytes: &[u8]) -> Result<String, DocumentError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| DocumentError::Docx(e.to_string()))?;

    let mut lines = Vec::new();
    for child in &docx.document.children {
        match child {
            docx_rs::DocumentChild::Paragraph(paragraph) => {
                let text = paragraph_text(paragraph);
                if !text.trim().is_empty() {
                    lines.push(text);
                }
            }
            docx_rs::DocumentChild::Table(table) => table_lines(table, &mut lines),
            _ => {}
        }
    }
    Ok(lines.join("\n"))
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut buffer = String::new();
    for child in &paragraph.children {
        paragraph_child_text(child, &mut buffer);
    }
    buffer
}

fn paragraph_child_text(child: &docx_rs::ParagraphChild, buffer: &mut String) {
    match child {
        docx_rs::ParagraphChild::Run(run) => run_text(run, buffer),
        docx_rs::ParagraphChild::Hyperlink(link) => {
            for link_child in &link.children {
                paragraph_child_text(link_child, buffer);
            }
        }
        _ => {}
    }
}

fn run_text(run: &docx_rs::Run, buffer: &mut String) {
    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(text) => buffer.push_str(&text.text),
            docx_rs::RunChild::Tab(_) => buffer.push('\t'),
            docx_rs::RunChild::Break(_) => buffer.push('\n'),
            _ => {}
        }
    }
}

/// One line per row, cells joined with " | ".
fn table_lines(table: &docx_rs::Table, lines: &mut Vec<String>) {
    for row in &table.rows {
        let docx_rs::TableChild::TableRow(row) = row;
        let mut cells = Vec::new();
        for cell in &row.cells {
            let docx_rs::TableRowChild::TableCell(cell) = cell;
            let text = cell
                .children
                .iter()
                .filter_map(|content| match content {
                    docx_rs::TableCellContent::Paragraph(paragraph) => {
                        Some(paragraph_text(paragraph))
                    }
                    _ => None,
                })
                .filter(|text| !text.trim().is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if !text.is_empty() {
                cells.push(text);
            }
        }
        if !cells.is_empty() {
            lines.push(cells.join(" | "));
        }
    }
}
