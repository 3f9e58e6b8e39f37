//! Text extraction from various file formats
//!
//! Every extractor yields a list of pages. Only PDFs have more than one.

use crate::error::{AtsScorerError, Result};
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;
use tokio::fs;

const PAGE_BREAK: char = '\u{000C}';

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<Vec<String>> {
        let bytes = fs::read(path).await?;
        extract_pdf_pages(bytes).await
    }
}

/// Parse PDF bytes off the async runtime. A parser panic on a malformed
/// document is reported like any other extraction failure.
pub async fn extract_pdf_pages(bytes: Vec<u8>) -> Result<Vec<String>> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| AtsScorerError::Extraction(format!("PDF extraction failed: {}", e)))?
        .map_err(|e| AtsScorerError::Extraction(format!("PDF extraction failed: {}", e)))?;

    Ok(split_pages(&text))
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<Vec<String>> {
        let content = fs::read_to_string(path).await?;
        Ok(vec![normalize_unicode(&content)])
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<Vec<String>> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(vec![normalize_unicode(&markdown_to_text(&markdown_content))])
    }
}

/// Render Markdown to plain text, one block per line.
pub fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::with_capacity(markdown.len());

    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak | Event::Rule => text.push('\n'),
            Event::End(
                Tag::Paragraph | Tag::Heading(..) | Tag::Item | Tag::CodeBlock(_) | Tag::TableRow | Tag::TableHead,
            ) => text.push('\n'),
            Event::End(Tag::TableCell) => text.push(' '),
            _ => {}
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split extracted PDF text on form feeds and tidy each page.
pub fn split_pages(text: &str) -> Vec<String> {
    let mut pages: Vec<String> = text
        .split(PAGE_BREAK)
        .map(|page| clean_page(&normalize_unicode(page)))
        .collect();

    // the extractor terminates the last page with a form feed
    if pages.len() > 1 && pages.last().is_some_and(|page| page.is_empty()) {
        pages.pop();
    }
    pages
}

/// Collapse runs of spaces and tabs, keeping line structure.
fn clean_page(page: &str) -> String {
    page.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Map typographic punctuation to ASCII so the extraction patterns see
/// one spelling.
pub fn normalize_unicode(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2026}' => '.',
            '\u{00A0}' => ' ',
            _ => c,
        })
        .collect()
}
