use crate::config::{MarkdownTarget, RunConfig, DEFAULT_CONFIG_FILE};
use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gimme")]
#[command(about = "Per-author change statistics from git history")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[clap(flatten)]
    pub report: ReportArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Clone, Default)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Path to the JSON config file (default: ./gimme.config.json)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase log verbosity (-v, -vv, -vvv)")]
    pub verbose: u8,
}

#[derive(Args, Clone, Default)]
pub struct ReportArgs {
    #[arg(long = "repo", help = "Repository to analyze (repeatable, replaces configured list)")]
    pub repos: Vec<PathBuf>,

    #[arg(long, help = "Only commits more recent than this date (passed to git)")]
    pub since: Option<String>,

    #[arg(long, help = "Only commits older than this date (passed to git)")]
    pub until: Option<String>,

    #[arg(long, help = "Width of the bar graphs in characters")]
    pub bar_size: Option<usize>,

    #[arg(long, help = "Width of the name column")]
    pub lmargin: Option<usize>,

    #[arg(long, help = "Do not print the summary table")]
    pub no_table: bool,

    #[arg(
        long,
        value_name = "PATH",
        require_equals = true,
        help = "Write a markdown report: --md for Readme.md, --md=PATH for another file"
    )]
    pub md: Option<Option<PathBuf>>,

    #[arg(long, help = "Skip commits without a parseable author instead of failing")]
    pub skip_malformed: bool,

    #[arg(long, help = "Output as JSON")]
    pub json: bool,
}

impl ReportArgs {
    /// Command-line values take precedence over the config file.
    pub fn apply(&self, mut config: RunConfig) -> RunConfig {
        if !self.repos.is_empty() {
            config.repositories = self.repos.clone();
        }
        if self.since.is_some() {
            config.since = self.since.clone();
        }
        if self.until.is_some() {
            config.until = self.until.clone();
        }
        if let Some(bar_size) = self.bar_size {
            config.bar_size = bar_size;
        }
        if let Some(lmargin) = self.lmargin {
            config.lmargin = lmargin;
        }
        if self.no_table {
            config.table = false;
        }
        match &self.md {
            Some(Some(path)) => config.append_to_md = MarkdownTarget::Path(path.clone()),
            Some(None) => config.append_to_md = MarkdownTarget::Toggle(true),
            None => {}
        }
        if self.skip_malformed {
            config.skip_malformed = true;
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config file to the working directory
    Init {
        #[arg(long, help = "Overwrite an existing config file")]
        force: bool,
    },
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logging")
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        init_logging(self.common.verbose)?;

        match self.command {
            Some(Commands::Init { force }) => {
                let path = self
                    .common
                    .config
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
                RunConfig::write_default(&path, force)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                println!("Config file created at {}", path.display());
                Ok(())
            }
            None => {
                let config = RunConfig::load(self.common.config.as_deref())
                    .context("Failed to load configuration")?;
                let config = self.report.apply(config);
                crate::stats::exec(config, self.report.json)
            }
        }
    }
}
