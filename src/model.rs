use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const SCHEMA_VERSION: u32 = 1;

/// Bucket name for files whose extension is not tracked.
pub const OTHER_EXT: &str = "other";

/// One `<path> | <n> <bar>` line of a commit's stat block, after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChangeEntry {
    pub path: String,
    /// Tracked extension (lower-cased) or [`OTHER_EXT`].
    pub extension: String,
    /// Literal extension token seen on an untracked file, if it had one.
    pub raw_extension: Option<String>,
    pub insertions: u64,
    pub deletions: u64,
}

impl FileChangeEntry {
    pub fn changed(&self) -> u64 {
        self.insertions + self.deletions
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub id: String,
    pub raw_author: String,
    pub author: String,
    pub files: Vec<FileChangeEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtStat {
    pub name: String,
    pub changed: u64,
    pub percent: f64,
    pub graph_percent: u32,
    pub graph_line: String,
    pub extensions: Vec<String>,
}

impl ExtStat {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            changed: 0,
            percent: 0.0,
            graph_percent: 0,
            graph_line: String::new(),
            extensions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorStat {
    pub name: String,
    pub commits: u64,
    pub changed: u64,
    pub insertions: u64,
    pub deletions: u64,
    pub percent: f64,
    pub graph_percent: u32,
    pub graph_line: String,
    pub by_ext: Vec<ExtStat>,
}

impl AuthorStat {
    /// Creates an empty record seeded with `other` followed by every tracked extension.
    pub fn new(name: impl Into<String>, tracked: &[String]) -> Self {
        let by_ext = std::iter::once(ExtStat::new(OTHER_EXT))
            .chain(tracked.iter().map(|ext| ExtStat::new(ext.as_str())))
            .collect();

        Self {
            name: name.into(),
            commits: 0,
            changed: 0,
            insertions: 0,
            deletions: 0,
            percent: 0.0,
            graph_percent: 0,
            graph_line: String::new(),
            by_ext,
        }
    }

    pub fn ext(&self, name: &str) -> Option<&ExtStat> {
        self.by_ext.iter().find(|e| e.name == name)
    }

    fn ext_mut(&mut self, name: &str) -> &mut ExtStat {
        let idx = match self.by_ext.iter().position(|e| e.name == name) {
            Some(idx) => idx,
            None => {
                self.by_ext.push(ExtStat::new(name));
                self.by_ext.len() - 1
            }
        };
        &mut self.by_ext[idx]
    }

    pub fn add_entry(&mut self, entry: &FileChangeEntry) {
        let changed = entry.changed();
        self.changed += changed;
        self.insertions += entry.insertions;
        self.deletions += entry.deletions;

        let ext = self.ext_mut(&entry.extension);
        ext.changed += changed;
        if let Some(raw) = &entry.raw_extension {
            ext.extensions.push(raw.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AggregateResult {
    pub changed: u64,
    pub authors: Vec<AuthorStat>,
    pub skipped_commits: usize,
}

impl AggregateResult {
    pub fn author(&self, name: &str) -> Option<&AuthorStat> {
        self.authors.iter().find(|a| a.name == name)
    }

    pub fn total_commits(&self) -> u64 {
        self.authors.iter().map(|a| a.commits).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repositories: Vec<PathBuf>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub changed: u64,
    pub skipped_commits: usize,
    pub authors: Vec<AuthorStat>,
}
