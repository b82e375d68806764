use super::aggregate::Aggregator;
use super::graph::finalize;
use super::markdown::{render_markdown, write_markdown};
use super::output::{output_console, output_json};
use super::parse::parse_commit;
use super::split::split_commits;
use crate::config::{ParseRules, RunConfig};
use crate::error::{GimmeError, Result};
use crate::git::fetch_log;
use crate::model::AggregateResult;
use anyhow::Context;
use log::{debug, info, warn};

pub fn exec(config: RunConfig, json: bool) -> anyhow::Result<()> {
    config.validate().context("Invalid configuration")?;
    let rules = ParseRules::from_config(&config).context("Failed to compile statistics rules")?;

    let log = fetch_log(&config).context("Failed to read git history")?;
    let result = collect_stats(&log, &rules, &config).context("Failed to aggregate commit statistics")?;
    info!(
        "{} authors, {} changed lines, {} malformed commits skipped",
        result.authors.len(),
        result.changed,
        result.skipped_commits
    );

    if json {
        output_json(&result, &config)?;
    } else {
        output_console(&result, &config)?;
    }

    if let Some(path) = config.append_to_md.path() {
        let text = render_markdown(&result, &config);
        write_markdown(&path, &text)
            .with_context(|| format!("Failed to write markdown report to {}", path.display()))?;
        if !json {
            println!("\nSaved to {}", path.display());
        }
    }

    Ok(())
}

/// Runs split, parse, aggregate and graph over raw `git log` text.
pub fn collect_stats(log: &str, rules: &ParseRules, config: &RunConfig) -> Result<AggregateResult> {
    let mut aggregator = Aggregator::new(&rules.extensions);

    for block in split_commits(log) {
        match parse_commit(&block, rules) {
            Ok(Some(record)) => aggregator.record(&record),
            Ok(None) => debug!("{}: author ignored", block.id),
            Err(err @ GimmeError::MalformedCommit { .. }) if config.skip_malformed => {
                warn!("Skipping {err}");
                aggregator.skip_malformed();
            }
            Err(err) => return Err(err),
        }
    }

    let mut result = aggregator.finish();
    finalize(&mut result, config.bar_size);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const A: &str = "1111111111111111111111111111111111111111";
    const B: &str = "2222222222222222222222222222222222222222";
    const C: &str = "3333333333333333333333333333333333333333";
    const D: &str = "4444444444444444444444444444444444444444";

    fn config() -> RunConfig {
        let mut config = RunConfig {
            stat_extensions: vec!["js".into(), "css".into()],
            stat_ignore: vec![r"^dist/".into()],
            bar_size: 10,
            ..RunConfig::default()
        };
        config.user_aliases.insert("Bob".into(), "Robert".into());
        config.ignore_users.insert("ci-bot".into());
        config
    }

    fn commit(id: &str, author: &str, stats: &[&str]) -> String {
        let mut text = format!("commit {id}\nAuthor: {author} <{author}@example.com>\n\n    change\n\n");
        for stat in stats {
            text.push_str(&format!(" {stat}\n"));
        }
        if !stats.is_empty() {
            text.push_str(&format!(" {} files changed\n", stats.len()));
        }
        text.push('\n');
        text
    }

    fn run(log: &str, config: &RunConfig) -> Result<AggregateResult> {
        let rules = ParseRules::from_config(config).unwrap();
        collect_stats(log, &rules, config)
    }

    #[test]
    fn single_author_single_file() {
        let log = [
            commit(A, "Alice", &["a.js | 5 +++--"]),
            commit(B, "Alice", &[]),
        ]
        .concat();
        let result = run(&log, &config()).unwrap();

        assert_eq!(result.changed, 5);
        let alice = result.author("Alice").unwrap();
        assert_eq!(alice.commits, 2);
        assert_eq!((alice.insertions, alice.deletions, alice.changed), (3, 2, 5));
        assert_eq!(alice.by_ext.len(), 1);
        assert_eq!(alice.by_ext[0].name, "js");
        assert_eq!(alice.by_ext[0].changed, 5);
        assert_eq!(alice.graph_line, "==========");
    }

    #[test]
    fn aliases_merge_into_one_author() {
        let log = [
            commit(A, "Bob", &["a.js | 1 +"]),
            commit(B, "Bob", &["b.css | 2 --"]),
            commit(C, "Robert", &["c.txt | 1 +"]),
        ]
        .concat();
        let result = run(&log, &config()).unwrap();

        assert_eq!(result.authors.len(), 1);
        let robert = result.author("Robert").unwrap();
        assert_eq!(robert.commits, 3);
        assert_eq!(robert.changed, 4);
        assert!(result.author("Bob").is_none());
    }

    #[test]
    fn ignored_author_and_paths_contribute_nothing() {
        let log = [
            commit(A, "ci-bot", &["a.js | 9 +++++++++"]),
            commit(B, "Alice", &["dist/bundle.js | 6 ++++++", "src/a.js | 2 +-"]),
        ]
        .concat();
        let result = run(&log, &config()).unwrap();

        assert!(result.author("ci-bot").is_none());
        assert_eq!(result.changed, 2);
        assert_eq!(result.author("Alice").unwrap().changed, 2);
    }

    #[test]
    fn commit_count_matches_headers_minus_ignored() {
        let log = [
            commit(A, "Alice", &["a.js | 1 +"]),
            commit(B, "ci-bot", &[]),
            commit(C, "Carol", &[]),
            commit(D, "Alice", &["x.md | 3 +++"]),
        ]
        .concat();
        let result = run(&log, &config()).unwrap();
        assert_eq!(result.total_commits(), 3);
    }

    #[test]
    fn totals_are_consistent_across_authors() {
        let log = [
            commit(A, "Alice", &["a.js | 4 ++--", "notes.txt | 3 +++", "Makefile | 1 -"]),
            commit(B, "Carol", &["b.css | 8 ++++++++", "c.yml | 2 ++"]),
            commit(C, "Alice", &["d.JS | 1 +"]),
        ]
        .concat();
        let result = run(&log, &config()).unwrap();

        assert_eq!(result.authors.iter().map(|a| a.changed).sum::<u64>(), result.changed);
        for author in &result.authors {
            assert_eq!(author.by_ext.iter().map(|e| e.changed).sum::<u64>(), author.changed);
            assert!((0.0..=1.0).contains(&author.percent));
            assert!(author.graph_line.chars().filter(|&c| c == '=').count() <= 10);
        }

        let names: Vec<_> = result.authors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Carol", "Alice"]);

        let alice = result.author("Alice").unwrap();
        let other = alice.ext("other").unwrap();
        assert_eq!(other.changed, 4);
        assert_eq!(other.extensions, ["txt"]);
    }

    #[test]
    fn no_changes_means_zero_percent() {
        let log = commit(A, "Alice", &[]);
        let result = run(&log, &config()).unwrap();
        assert_eq!(result.changed, 0);
        assert_eq!(result.authors[0].percent, 0.0);
        assert_eq!(result.authors[0].graph_percent, 0);
    }

    #[test]
    fn malformed_commit_aborts_by_default() {
        let log = format!("commit {A}\nDate: today\n\n    oops\n\n{}", commit(B, "Alice", &[]));
        let err = run(&log, &config()).unwrap_err();
        assert!(matches!(err, GimmeError::MalformedCommit { ref commit, .. } if commit == A));
    }

    #[test]
    fn malformed_commit_can_be_skipped() {
        let log = format!("commit {A}\nDate: today\n\n    oops\n\n{}", commit(B, "Alice", &["a.js | 1 +"]));
        let config = RunConfig {
            skip_malformed: true,
            ..config()
        };
        let result = run(&log, &config).unwrap();
        assert_eq!(result.skipped_commits, 1);
        assert_eq!(result.total_commits(), 1);
        assert_eq!(result.changed, 1);
    }

    #[test]
    fn empty_log_is_an_empty_report() {
        let result = run("", &config()).unwrap();
        assert_eq!(result.changed, 0);
        assert!(result.authors.is_empty());
    }

    #[test]
    fn trailing_bare_header_is_dropped() {
        let log = format!("commit {A}\nAuthor: Alice <a@x>\n\n    m\n\n a.js | 1 +\ncommit {B}");
        let result = run(&log, &RunConfig::default()).unwrap();

        assert_eq!(result.total_commits(), 1);
        assert_eq!(result.changed, 1);
        assert_eq!(result.skipped_commits, 0);
        assert_eq!(result.authors[0].name, "Alice");
    }
}
