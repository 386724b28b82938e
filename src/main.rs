//! Command-line entry point.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Canonical formatter for Tekton Task and Pipeline YAML resources.
#[derive(Debug, Parser)]
#[command(name = "tekfmt", version, about)]
struct Cli {
    /// List files whose formatting differs from tekfmt's
    #[arg(short = 'l', long = "list")]
    list: bool,

    /// Write result to (source) file instead of stdout
    #[arg(short = 'w', long = "write")]
    write: bool,

    /// Files to format; reads standard input when none are given
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(cli: &Cli) -> Result<()> {
    if cli.paths.is_empty() {
        if cli.write {
            bail!("cannot use -w with standard input");
        }
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("cannot read standard input")?;
        let output = tekfmt::format_str(&input)?;
        io::stdout()
            .write_all(output.as_bytes())
            .context("cannot write to standard output")?;
        return Ok(());
    }

    for path in &cli.paths {
        format_file(cli, path)?;
    }
    Ok(())
}

fn format_file(cli: &Cli, path: &PathBuf) -> Result<()> {
    let input =
        fs::read(path).with_context(|| format!("cannot read file {}", path.display()))?;
    let output = tekfmt::format_bytes(&input)
        .with_context(|| format!("cannot format {}", path.display()))?;

    // Files are rewritten only when the canonical form actually differs.
    if output.as_bytes() == input.as_slice() {
        return Ok(());
    }

    if cli.list {
        println!("{}", path.display());
    }

    if cli.write {
        let permissions = fs::metadata(path)
            .with_context(|| format!("cannot stat file {}", path.display()))?
            .permissions();
        fs::write(path, &output)
            .with_context(|| format!("cannot write file {}", path.display()))?;
        fs::set_permissions(path, permissions)
            .with_context(|| format!("cannot restore permissions on {}", path.display()))?;
    }

    Ok(())
}
