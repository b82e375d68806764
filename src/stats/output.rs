use super::graph::percent_hundredths;
use crate::config::RunConfig;
use crate::model::{AggregateResult, ReportOutput, SCHEMA_VERSION};
use crate::util::{format_hundredths, join_paths, pad_right, period_label};
use anyhow::Result;
use chrono::Utc;
use console::style;

pub const TABLE_HEADERS: [&str; 5] = ["Author", "Commits", "Insertions", "Deletions", "% of changes"];

/// Summary rows in display order; the last column is the share ceiled to two decimals.
pub fn table_rows(result: &AggregateResult) -> Vec<[String; 5]> {
    result
        .authors
        .iter()
        .map(|a| {
            [
                a.name.clone(),
                a.commits.to_string(),
                a.insertions.to_string(),
                a.deletions.to_string(),
                format_hundredths(percent_hundredths(a.changed, result.changed)),
            ]
        })
        .collect()
}

pub fn render_table(result: &AggregateResult) -> String {
    let rows = table_rows(result);
    let mut widths = TABLE_HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(console::measure_text_width(cell));
        }
    }

    let header: Vec<String> = TABLE_HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| style(pad_right(h, w)).bold().to_string())
        .collect();

    let mut lines = vec![
        header.join("  "),
        "─".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)),
    ];
    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, w))| {
                if i == 0 {
                    pad_right(cell, w)
                } else {
                    format!("{cell:>w$}")
                }
            })
            .collect();
        lines.push(cells.join("  "));
    }
    lines.join("\n")
}

pub fn render_console(result: &AggregateResult, config: &RunConfig) -> String {
    let mut lines = vec![
        style("Code changes by author").bold().to_string(),
        format!("Repositories: {}", join_paths(&config.repositories)),
    ];
    if let Some(period) = period_label(config.since.as_deref(), config.until.as_deref()) {
        lines.push(format!("Period: {period}"));
    }
    if result.skipped_commits > 0 {
        lines.push(
            style(format!("Skipped {} malformed commit(s)", result.skipped_commits))
                .yellow()
                .to_string(),
        );
    }

    if result.authors.is_empty() {
        lines.push(String::new());
        lines.push("No commits to report".to_string());
        return lines.join("\n");
    }

    lines.push(format!(
        "Commits: {}, changed lines: {}",
        style(result.total_commits()).cyan(),
        style(result.changed).cyan()
    ));

    if config.table {
        lines.push(String::new());
        lines.push(render_table(result));
    }

    for author in &result.authors {
        lines.push(String::new());
        lines.push(format!(
            "{}[{}] {:>3}%",
            style(pad_right(&author.name, config.lmargin)).bold(),
            style(&author.graph_line).green(),
            author.graph_percent
        ));
        for ext in &author.by_ext {
            let detail = if ext.extensions.is_empty() {
                String::new()
            } else {
                format!(" ({})", ext.extensions.join(", "))
            };
            lines.push(format!(
                "{}[{}] {:>3}%{}",
                style(pad_right(&format!("  {}", ext.name), config.lmargin)).dim(),
                style(&ext.graph_line).blue(),
                ext.graph_percent,
                detail
            ));
        }
    }

    lines.join("\n")
}

pub fn report_output(result: &AggregateResult, config: &RunConfig) -> ReportOutput {
    ReportOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repositories: config.repositories.clone(),
        since: config.since.clone(),
        until: config.until.clone(),
        changed: result.changed,
        skipped_commits: result.skipped_commits,
        authors: result.authors.clone(),
    }
}

pub fn output_json(result: &AggregateResult, config: &RunConfig) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&report_output(result, config))?);
    Ok(())
}

pub fn output_console(result: &AggregateResult, config: &RunConfig) -> Result<()> {
    println!("{}", render_console(result, config));
    Ok(())
}
