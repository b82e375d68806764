use anyhow::Result;
use clap::Parser;
use gimme::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.execute()
}
