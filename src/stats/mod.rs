pub mod aggregate;
pub mod exec;
pub mod graph;
pub mod markdown;
pub mod output;
pub mod parse;
pub mod split;

pub use aggregate::Aggregator;
pub use exec::{collect_stats, exec};
pub use graph::finalize;
pub use markdown::{render_markdown, write_markdown};
pub use output::{output_console, output_json, render_console};
pub use parse::parse_commit;
pub use split::{split_commits, CommitBlock};
