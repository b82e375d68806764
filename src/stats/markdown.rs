use super::output::{table_rows, TABLE_HEADERS};
use crate::config::RunConfig;
use crate::error::Result;
use crate::model::AggregateResult;
use crate::util::{pad_right, period_label};
use std::path::Path;

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

pub fn render_markdown(result: &AggregateResult, config: &RunConfig) -> String {
    let mut lines = vec!["# Code changes by author".to_string(), String::new()];

    let repos: Vec<String> = config
        .repositories
        .iter()
        .map(|p| format!("`{}`", p.display()))
        .collect();
    lines.push(format!("Repositories: {}", repos.join(", ")));
    if let Some(period) = period_label(config.since.as_deref(), config.until.as_deref()) {
        lines.push(String::new());
        lines.push(format!("Period: {period}"));
    }

    if result.authors.is_empty() {
        lines.push(String::new());
        lines.push("No commits to report.".to_string());
        lines.push(String::new());
        return lines.join("\n");
    }

    lines.push(String::new());
    lines.push(format!("| {} |", TABLE_HEADERS.join(" | ")));
    lines.push("| --- | ---: | ---: | ---: | ---: |".to_string());
    for row in table_rows(result) {
        let cells: Vec<String> = row.iter().map(|c| escape_cell(c)).collect();
        lines.push(format!("| {} |", cells.join(" | ")));
    }

    for author in &result.authors {
        lines.push(String::new());
        lines.push(format!("## {}", author.name));
        lines.push(String::new());
        lines.push("```".to_string());
        lines.push(format!(
            "{}[{}] {:>3}%",
            pad_right("total", config.lmargin),
            author.graph_line,
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
                pad_right(&ext.name, config.lmargin),
                ext.graph_line,
                ext.graph_percent,
                detail
            ));
        }
        lines.push("```".to_string());
    }

    lines.push(String::new());
    lines.join("\n")
}

/// Replaces the file at `path` with `text`.
pub fn write_markdown(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text)?;
    log::info!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}
