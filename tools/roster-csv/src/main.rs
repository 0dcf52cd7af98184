use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use roster_csv::{convert, TeamInfo};

#[derive(Parser)]
#[command(name = "roster-csv")]
#[command(about = "Convert a semicolon-separated class list into a roster YAML file")]
struct Cli {
    /// Name of the team the users are put in
    #[arg(long)]
    name: String,

    /// Team description
    #[arg(long, default_value = "")]
    description: String,

    /// Class list (CSV with Name, Vorname and E-Mail columns)
    source: PathBuf,

    /// Roster file to write
    target: PathBuf,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let source = File::open(&cli.source).with_context(|| format!("failed to open {}", cli.source.display()))?;
    let team = TeamInfo {
        name: cli.name,
        description: cli.description,
    };
    let roster = convert(source, &team).with_context(|| format!("failed to convert {}", cli.source.display()))?;

    std::fs::write(&cli.target, roster.to_yaml()?)
        .with_context(|| format!("failed to write {}", cli.target.display()))?;
    tracing::info!(
        users = roster.membership_count(),
        target = %cli.target.display(),
        "roster written"
    );
    Ok(())
}
