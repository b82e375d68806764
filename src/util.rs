use console::{pad_str, Alignment};
use std::path::Path;

/// Pads `text` with spaces up to `width` display columns. Longer text is kept whole.
pub fn pad_right(text: &str, width: usize) -> String {
    pad_str(text, width, Alignment::Left, None).into_owned()
}

pub fn format_hundredths(value: u64) -> String {
    format!("{}.{:02}", value / 100, value % 100)
}

pub fn join_paths<P: AsRef<Path>>(paths: &[P]) -> String {
    paths
        .iter()
        .map(|p| p.as_ref().display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn period_label(since: Option<&str>, until: Option<&str>) -> Option<String> {
    match (since, until) {
        (Some(since), Some(until)) => Some(format!("from {since} to {until}")),
        (Some(since), None) => Some(format!("since {since}")),
        (None, Some(until)) => Some(format!("until {until}")),
        (None, None) => None,
    }
}
