//! hakoniwa binary.
//!
//! Usage:
//!   # Run a script file
//!   hakoniwa setup.fs
//!
//!   # Read commands from stdin, JSON output, stop at first failure
//!   echo "mkdir -p /a/b" | hakoniwa --json --strict
//!
//!   # Default owner/modes from a RON config
//!   hakoniwa --config fs.ron setup.fs

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use hakoniwa_cli::Shell;
use hakoniwa_vfs::{FsConfig, MemoryFs};

/// Run filesystem scripts against an in-memory tree.
#[derive(Parser, Debug)]
#[command(name = "hakoniwa")]
#[command(about = "Run filesystem scripts against an in-memory tree")]
struct Args {
    /// Script file; reads stdin when omitted
    script: Option<PathBuf>,

    /// RON file with default uid/gid and modes
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print stat, ls and tree results as JSON
    #[arg(long)]
    json: bool,

    /// Stop at the first failing command and exit non-zero
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<ExitCode> {
    // Logs go to stderr; stdout carries command output
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => FsConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => FsConfig::default(),
    };

    let script = match &args.script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading script from stdin")?;
            buf
        }
    };

    let mut shell = Shell::new(MemoryFs::with_config(config), args.json);
    let mut stdout = io::stdout().lock();
    let summary = shell.run_script(&script, args.strict, &mut stdout)?;

    tracing::info!(
        commands = summary.commands,
        failed = summary.failed,
        nodes = shell.fs().node_count(),
        "script finished"
    );

    if args.strict && summary.failed > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
