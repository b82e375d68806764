use crate::config::RunConfig;
use crate::error::{GimmeError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use std::path::Path;
use std::process::Command;

/// Arguments for `git log`: non-merge commits, short headers, per-file stat.
pub fn log_args(since: Option<&str>, until: Option<&str>) -> Vec<String> {
    let mut args: Vec<String> = [
        "log",
        "--no-merges",
        "--pretty=short",
        "--stat",
        "--no-color",
        "--no-decorate",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    if let Some(since) = since {
        args.push(format!("--since={since}"));
    }
    if let Some(until) = until {
        args.push(format!("--until={until}"));
    }
    args
}

/// Runs `git log` inside `repo` and returns its stdout.
pub fn fetch_repository_log(repo: &Path, since: Option<&str>, until: Option<&str>) -> Result<String> {
    if !repo.is_dir() {
        return Err(GimmeError::Repository(format!(
            "{} is not a directory",
            repo.display()
        )));
    }

    let args = log_args(since, until);
    debug!("Running git {} in {}", args.join(" "), repo.display());

    let output = Command::new("git")
        .args(&args)
        .current_dir(repo)
        .output()
        .map_err(|e| GimmeError::Git(format!("Failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GimmeError::Git(format!(
            "git log failed in {} ({}): {}",
            repo.display(),
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Fetches every configured repository in order and concatenates the output.
pub fn fetch_log(config: &RunConfig) -> Result<String> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );

    let mut text = String::new();
    for repo in &config.repositories {
        pb.set_message(format!("Reading history of {}...", repo.display()));
        pb.tick();

        let chunk = match fetch_repository_log(repo, config.since.as_deref(), config.until.as_deref()) {
            Ok(chunk) => chunk,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        };
        debug!("{}: {} bytes of log output", repo.display(), chunk.len());

        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&chunk);
    }

    pb.finish_and_clear();
    Ok(text)
}
