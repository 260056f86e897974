// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

mod script;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nsfs_core::{Namespace, NamespaceConfig};
use nsfs_logging::CliLoggingArgs;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use script::{DEMO_SCRIPT, OutputFormat, ScriptRunner};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Drive an in-memory NSFS namespace from a command script"
)]
struct Cli {
    /// Namespace configuration file (TOML)
    #[arg(long, global = true, env = "NSFS_CONFIG")]
    config: Option<PathBuf>,

    /// Format of command output
    #[arg(long, value_enum, global = true, default_value = "plaintext")]
    output: OutputFormat,

    #[command(flatten)]
    logging: CliLoggingArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay the built-in walk-through
    Demo,
    /// Execute a command script (use '-' for stdin)
    Run { script: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.logging.clone().init("nsfs")?;

    let config = match &cli.config {
        Some(path) => NamespaceConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => NamespaceConfig::default(),
    };
    tracing::debug!(?config, "namespace configuration");

    let script = match &cli.command {
        Command::Demo => DEMO_SCRIPT.to_string(),
        Command::Run { script } => read_script(script)?,
    };

    let stdout = io::stdout();
    let mut runner = ScriptRunner::new(Namespace::with_config(config), stdout.lock(), cli.output);
    let summary = runner.run_script(&script).context("failed to write output")?;
    tracing::info!(
        executed = summary.executed,
        failed = summary.failed,
        "script finished"
    );
    tracing::debug!(stats = ?runner.namespace().stats(), "final namespace");
    Ok(())
}

fn read_script(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("failed to read script from stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read script {:?}", path))
    }
}
