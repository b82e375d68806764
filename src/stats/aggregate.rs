use crate::model::{AggregateResult, AuthorStat, CommitRecord};
use std::collections::HashMap;

/// Running per-author totals. Authors are created on first sight and keep
/// first-seen order until the result is finalized.
pub struct Aggregator {
    tracked: Vec<String>,
    changed: u64,
    authors: Vec<AuthorStat>,
    index: HashMap<String, usize>,
    skipped: usize,
}

impl Aggregator {
    pub fn new(tracked: &[String]) -> Self {
        Self {
            tracked: tracked.to_vec(),
            changed: 0,
            authors: Vec::new(),
            index: HashMap::new(),
            skipped: 0,
        }
    }

    fn author_mut(&mut self, name: &str) -> &mut AuthorStat {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                self.authors.push(AuthorStat::new(name, &self.tracked));
                let idx = self.authors.len() - 1;
                self.index.insert(name.to_string(), idx);
                idx
            }
        };
        &mut self.authors[idx]
    }

    pub fn record(&mut self, commit: &CommitRecord) {
        let added: u64 = commit.files.iter().map(|f| f.changed()).sum();
        self.changed += added;

        let author = self.author_mut(&commit.author);
        author.commits += 1;
        for entry in &commit.files {
            author.add_entry(entry);
        }
    }

    pub fn skip_malformed(&mut self) {
        self.skipped += 1;
    }

    pub fn finish(self) -> AggregateResult {
        AggregateResult {
            changed: self.changed,
            authors: self.authors,
            skipped_commits: self.skipped,
        }
    }
}
