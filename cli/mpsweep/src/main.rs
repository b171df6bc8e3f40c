//! mpsweep: batch synthesis of multiported RAM designs over a parameter grid.

mod manifest;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use mpsweep_core::ParameterSet;
use mpsweep_driver::{ProcessRunner, Sweep, ToolchainConfig};

use manifest::SweepManifest;

const AFTER_HELP: &str = "\
Each list is separated by commas or any of ()[]{}<>, e.g. 4,8,16 or (REG,XOR).
Every combination of the six lists is synthesized once, in this nesting order
(outermost first): depth, width, write ports, read ports, architecture, bypass.

Architectures: REG, XOR, LVTREG, LVTBIN, LVT1HT
Bypass modes:  NON, WAW, RAW, RDW

Example:
  mpsweep LVTBIN,LVT1HT NON,RAW 1024,2048 32 2,3 4

Results are appended to syn.res; tool logs and reports go under
log/<run>/<bypass>/.";

#[derive(Parser, Debug)]
#[command(
    name = "mpsweep",
    version,
    about = "Synthesize multiported RAM designs over every combination of parameter lists",
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Architecture list (REG, XOR, LVTREG, LVTBIN, LVT1HT)
    architecture: String,
    /// Bypass list (NON, WAW, RAW, RDW)
    bypass: String,
    /// Memory depth list, in lines
    depth: String,
    /// Data width list, in bits
    width: String,
    /// Write port count list
    write_ports: String,
    /// Read port count list
    read_ports: String,
    /// Manifest to use instead of searching for sweep.toml
    #[arg(long, value_name = "PATH")]
    manifest: Option<PathBuf>,
    /// Validate and list the runs without invoking any tool
    #[arg(long)]
    dry_run: bool,
    /// Keep build-system directories after the sweep
    #[arg(long)]
    keep_build_dirs: bool,
}

impl Cli {
    fn lists(&self) -> [&str; 6] {
        [
            &self.architecture,
            &self.bypass,
            &self.depth,
            &self.width,
            &self.write_ports,
            &self.read_ports,
        ]
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let (cli, params) = match parse_command_line(std::env::args_os()) {
        Ok(parsed) => parsed,
        Err(Rejected::Informational(e)) => e.exit(),
        Err(Rejected::Usage(message)) => {
            eprintln!("error: {message}\n");
            let _ = Cli::command().print_long_help();
            process::exit(1);
        }
    };

    if let Err(e) = run(&cli, &params) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Why the command line was not accepted.
#[derive(Debug)]
enum Rejected {
    /// `--help` or `--version`, printed by clap itself.
    Informational(clap::Error),
    /// Wrong argument count or an invalid list token.
    Usage(String),
}

/// Parse and validate the command line before anything touches the workspace.
fn parse_command_line<I, T>(args: I) -> Result<(Cli, ParameterSet), Rejected>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).map_err(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Rejected::Informational(e),
        _ => Rejected::Usage(clap_message(&e)),
    })?;
    let params =
        ParameterSet::from_args(cli.lists()).map_err(|e| Rejected::Usage(e.to_string()))?;
    Ok((cli, params))
}

/// The first paragraph of a clap error, without its `error: ` prefix.
fn clap_message(e: &clap::Error) -> String {
    let text = e.to_string();
    let first = text.split("\n\n").next().unwrap_or_default();
    first.trim_start_matches("error: ").trim_end().to_string()
}

fn run(cli: &Cli, params: &ParameterSet) -> anyhow::Result<()> {
    if cli.dry_run {
        for combination in params.combinations() {
            println!("[{}] {}", combination.progress(), combination.run_name());
        }
        return Ok(());
    }

    let cwd = std::env::current_dir()?;
    let config = load_config(&cwd, cli.manifest.as_deref())?;
    tracing::debug!(
        workdir = %config.workdir.display(),
        project = %config.project,
        "configuration loaded"
    );

    let mut sweep = Sweep::new(config, ProcessRunner::default())
        .keep_build_artifacts(cli.keep_build_dirs);
    let summary = sweep.run(params).context("sweep aborted")?;

    println!(
        "{} of {} runs fully populated, {} with stage failures; results in {}",
        summary.complete,
        summary.attempted,
        summary.with_stage_failures,
        summary.result_file.display()
    );
    Ok(())
}

/// Configuration from an explicit manifest, a discovered `sweep.toml`, or
/// built-in defaults rooted at `cwd`.
fn load_config(cwd: &Path, explicit: Option<&Path>) -> anyhow::Result<ToolchainConfig> {
    if let Some(path) = explicit {
        let manifest = SweepManifest::load(path)?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => cwd.to_path_buf(),
        };
        return Ok(manifest.into_config(&dir));
    }
    Ok(match SweepManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => manifest.into_config(&dir),
        None => ToolchainConfig::new(cwd),
    })
}
