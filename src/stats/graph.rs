//! Percent shares and fixed-width bar graphs.
//!
//! The bar length is derived from the whole-number graph percent, not from the
//! raw fraction, so bars move in steps of one percent of the width.

use crate::model::{AggregateResult, ExtStat};

pub const BAR_GLYPH: char = '=';

/// `part / whole`, or 0 when `whole` is 0.
pub fn share(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn ceil_ratio(part: u64, whole: u64, scale: u64) -> u64 {
    if whole == 0 {
        return 0;
    }
    let (part, whole, scale) = (part as u128, whole as u128, scale as u128);
    part.saturating_mul(scale).div_ceil(whole).min(scale) as u64
}

/// The share rounded up to a whole percent, 0 to 100.
pub fn graph_percent(part: u64, whole: u64) -> u32 {
    ceil_ratio(part, whole, 100) as u32
}

/// The share in hundredths of a percent, rounded up (5234 reads as 52.34%).
pub fn percent_hundredths(part: u64, whole: u64) -> u64 {
    ceil_ratio(part, whole, 10_000)
}

/// Number of filled positions in a bar of `width`: every position `i` (1-based)
/// with `i <= graph_percent / 100 * width`.
pub fn bar_fill(graph_percent: u32, width: usize) -> usize {
    (graph_percent.min(100) as usize * width) / 100
}

pub fn graph_line(graph_percent: u32, width: usize) -> String {
    let filled = bar_fill(graph_percent, width);
    let mut line = String::with_capacity(width);
    line.extend(std::iter::repeat(BAR_GLYPH).take(filled));
    line.extend(std::iter::repeat(' ').take(width - filled));
    line
}

fn finalize_ext(ext: &mut ExtStat, author_changed: u64, width: usize) {
    ext.percent = share(ext.changed, author_changed);
    ext.graph_percent = graph_percent(ext.changed, author_changed);
    ext.graph_line = graph_line(ext.graph_percent, width);

    let mut seen = std::collections::HashSet::new();
    ext.extensions.retain(|e| !e.is_empty() && seen.insert(e.clone()));
}

/// Fills in the derived fields, drops empty extension buckets and sorts
/// authors and extensions by changed lines, largest first. Sorting is stable.
pub fn finalize(result: &mut AggregateResult, width: usize) {
    let total = result.changed;

    for author in &mut result.authors {
        author.percent = share(author.changed, total);
        author.graph_percent = graph_percent(author.changed, total);
        author.graph_line = graph_line(author.graph_percent, width);

        let author_changed = author.changed;
        author.by_ext.retain(|e| e.changed > 0);
        for ext in &mut author.by_ext {
            finalize_ext(ext, author_changed, width);
        }
        author.by_ext.sort_by(|a, b| b.changed.cmp(&a.changed));
    }

    result.authors.sort_by(|a, b| b.changed.cmp(&a.changed));
}
