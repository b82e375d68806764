use super::split::CommitBlock;
use crate::config::ParseRules;
use crate::error::{GimmeError, Result};
use crate::model::{CommitRecord, FileChangeEntry, OTHER_EXT};

const AUTHOR_PREFIX: &str = "Author: ";
const MESSAGE_INDENT: &str = "    ";

/// The raw parts of a `<path> | <count> <+/- bar>` stat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatLine<'a> {
    pub path: &'a str,
    pub bar: &'a str,
}

impl StatLine<'_> {
    /// Every `+` is one insertion, every `-` one deletion. Git scales the bar
    /// for very large diffs, which is accepted as an approximation.
    pub fn counts(&self) -> (u64, u64) {
        let insertions = self.bar.bytes().filter(|&b| b == b'+').count() as u64;
        (insertions, self.bar.len() as u64 - insertions)
    }
}

/// Recognizes a stat line. Binary entries, mode-only changes and the
/// "N files changed" summary have no change bar and are rejected.
pub fn parse_stat_line(line: &str) -> Option<StatLine<'_>> {
    let (path, stat) = line.rsplit_once('|')?;
    let path = path.trim();
    if path.is_empty() {
        return None;
    }

    let mut parts = stat.split_whitespace();
    let count = parts.next()?;
    if !count.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let bar = parts.next()?;
    if !bar.bytes().all(|b| b == b'+' || b == b'-') {
        return None;
    }
    Some(StatLine { path, bar })
}

/// Name from the text after `Author: `: everything before the last ` <`, or
/// the whole line when it ends in a space and carries no email.
pub fn author_name(rest: &str) -> Option<&str> {
    let rest = rest.trim_end_matches('\r');
    let name = match rest.rfind(" <") {
        Some(idx) => &rest[..idx],
        None if rest.ends_with(' ') => rest.trim_end(),
        None => return None,
    };
    (!name.trim().is_empty()).then_some(name)
}

/// Last dotted segment of 2 to 5 word characters, as shown for the `other` bucket.
pub fn raw_extension(path: &str) -> Option<&str> {
    let (_, ext) = path.rsplit_once('.')?;
    let is_word = ext.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
    ((2..=5).contains(&ext.len()) && is_word).then_some(ext)
}

fn classify(stat: StatLine<'_>, rules: &ParseRules) -> FileChangeEntry {
    let (insertions, deletions) = stat.counts();
    let (extension, raw_extension) = match rules.tracked_extension(stat.path) {
        Some(ext) => (ext.to_string(), None),
        None => (
            OTHER_EXT.to_string(),
            raw_extension(stat.path).map(str::to_string),
        ),
    };

    FileChangeEntry {
        path: stat.path.to_string(),
        extension,
        raw_extension,
        insertions,
        deletions,
    }
}

/// Parses one commit block.
///
/// Returns `Ok(None)` when the (aliased) author is ignored, and a
/// [`GimmeError::MalformedCommit`] when the header has no usable author line.
/// A commit without stat lines is a record with no files.
pub fn parse_commit(block: &CommitBlock<'_>, rules: &ParseRules) -> Result<Option<CommitRecord>> {
    let mut lines = block.body.lines();
    let mut raw_author = None;
    let mut in_header = false;

    for line in lines.by_ref() {
        if line.trim().is_empty() {
            if in_header {
                break;
            }
            continue;
        }
        in_header = true;
        if raw_author.is_none() {
            raw_author = line.strip_prefix(AUTHOR_PREFIX).and_then(author_name);
        }
    }

    let raw_author = raw_author.ok_or_else(|| GimmeError::MalformedCommit {
        commit: block.id.to_string(),
        reason: "no parseable `Author:` line".to_string(),
    })?;

    let author = rules.canonical_author(raw_author);
    if rules.is_ignored_author(author) {
        return Ok(None);
    }

    let files = lines
        .filter(|line| !line.starts_with(MESSAGE_INDENT))
        .filter_map(parse_stat_line)
        .filter(|stat| {
            let ignored = rules.is_ignored_path(stat.path);
            if ignored {
                log::trace!("{}: ignoring {}", block.id, stat.path);
            }
            !ignored
        })
        .map(|stat| classify(stat, rules))
        .collect();

    Ok(Some(CommitRecord {
        id: block.id.to_string(),
        raw_author: raw_author.to_string(),
        author: author.to_string(),
        files,
    }))
}
