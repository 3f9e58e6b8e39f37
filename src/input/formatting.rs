//! Layout inspection producing the formatting penalty

use crate::processing::scoring::MIN_FORMATTING_PENALTY;
use unicode_segmentation::UnicodeSegmentation;

const GRAPHICS_PENALTY: f64 = -10.0;
const SPARSE_PAGE_PENALTY: f64 = -5.0;
const MIN_WORDS_PER_PAGE: usize = 50;

/// Penalty in `[-20, 0]` for ATS-unfriendly pages.
///
/// A page that mentions images or tables costs 10 points, a page with fewer
/// than 50 words (typically a scanned or graphics-heavy page) costs 5.
pub fn inspect_formatting<S: AsRef<str>>(pages: &[S]) -> f64 {
    let penalty = pages
        .iter()
        .fold(0.0, |total, page| total + page_penalty(page.as_ref()));
    penalty.max(MIN_FORMATTING_PENALTY)
}

fn page_penalty(page: &str) -> f64 {
    let lowered = page.to_lowercase();
    let mut penalty = 0.0;
    if lowered.contains("image") || lowered.contains("table") {
        penalty += GRAPHICS_PENALTY;
    }
    if page.unicode_words().count() < MIN_WORDS_PER_PAGE {
        penalty += SPARSE_PAGE_PENALTY;
    }
    penalty
}
