//! Input manager for handling different file types

use crate::error::{AtsScorerError, Result};
use crate::input::file_detector::FileType;
use crate::input::formatting::inspect_formatting;
use crate::input::text_extractor::{
    normalize_unicode, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Text pulled from one input, page by page.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDocument {
    pub text: String,
    pub pages: Vec<String>,
    pub file_type: FileType,
}

impl ExtractedDocument {
    fn from_pages(pages: Vec<String>, file_type: FileType) -> Self {
        Self {
            text: pages.join("\n"),
            pages,
            file_type,
        }
    }

    /// Wrap text supplied directly, e.g. a job description on the command line.
    pub fn from_text(text: &str) -> Self {
        Self::from_pages(vec![normalize_unicode(text)], FileType::Text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Formatting penalty in `[-20, 0]`. Inputs without layout score 0.
    pub fn formatting_penalty(&self) -> f64 {
        if self.file_type.has_layout() {
            inspect_formatting(&self.pages)
        } else {
            0.0
        }
    }
}

pub struct InputManager {
    cache: HashMap<PathBuf, ExtractedDocument>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn extract(&mut self, path: &Path) -> Result<ExtractedDocument> {
        if self.enable_cache {
            if let Some(cached) = self.cache.get(path) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        if !path.exists() {
            return Err(AtsScorerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_type = FileType::from_path(path);
        let pages = match file_type {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(AtsScorerError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        let document = ExtractedDocument::from_pages(pages, file_type);
        debug!(
            "Extracted {} page(s), {} words from {}",
            document.pages.len(),
            document.word_count(),
            path.display()
        );

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), document.clone());
        }

        Ok(document)
    }

    /// Convenience wrapper returning only the text
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        Ok(self.extract(path).await?.text)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
