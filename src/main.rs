//! Cheddar lint CLI
//!
//! Entry point for the `cheddar-lint` command-line tool.

use cheddar_lint::config::EffectiveConfig;
use cheddar_lint::report::{ExitCode, HashAction, HumanReport};
use cheddar_lint::{LintError, LintResult, Linter};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cheddar-lint")]
#[command(about = "Schema validation and lineage verification for Cheddar artifacts", version)]
struct Cli {
    /// Path to lint config file (default: .cheddar/lint.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute, verify or update an artifact's lineage hash
    Hash {
        /// Artifact file
        path: PathBuf,

        /// Write the computed hash into the file
        #[arg(long, short = 'u', conflicts_with = "verify")]
        update: bool,

        /// Check the stored hash against the computed one
        #[arg(long)]
        verify: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Validate artifacts against their JSON schemas
    Validate {
        /// Artifact file or directory
        path: PathBuf,

        /// Explicit schema file (detected from the artifact otherwise)
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Descend into subdirectories
        #[arg(long, short = 'r')]
        recursive: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Verify lineage chain integrity across artifacts
    Verify {
        /// Artifact files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Descend into subdirectories
        #[arg(long, short = 'r')]
        recursive: bool,

        /// Skip own-hash checks (for batches with placeholder hashes)
        #[arg(long)]
        skip_hash: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Run schema validation and chain verification together
    Check {
        /// Artifact files or directories
        paths: Vec<PathBuf>,

        /// Descend into subdirectories
        #[arg(long, short = 'r')]
        recursive: bool,

        /// Check the configured sample artifacts instead of paths
        #[arg(long)]
        examples: bool,

        /// Skip lineage chain verification
        #[arg(long)]
        skip_chain: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    fn recursive(&self) -> bool {
        match self {
            Commands::Hash { .. } => false,
            Commands::Validate { recursive, .. }
            | Commands::Verify { recursive, .. }
            | Commands::Check { recursive, .. } => *recursive,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            let code = e.exit_code();
            if code == ExitCode::Internal {
                eprintln!("Internal error: {}", e);
            } else {
                eprintln!("Error: {}", e);
            }
            code
        }
    };
    process::exit(code.as_i32());
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: Cli) -> LintResult<ExitCode> {
    // -r only ever switches recursion on; the config file may already have
    let overrides = cli.command.recursive().then(|| json!({"recursive": true}));
    let effective = EffectiveConfig::build(cli.config.as_deref(), overrides)?;
    for source in &effective.sources {
        debug!(origin = ?source.origin, path = ?source.path, digest = ?source.digest, "config layer");
    }
    let linter = Linter::new(effective.config);

    match cli.command {
        Commands::Hash {
            path,
            update,
            verify,
            json,
        } => {
            let action = if update {
                HashAction::Update
            } else if verify {
                HashAction::Verify
            } else {
                HashAction::Compute
            };
            let outcome = linter.hash_file(&path, action)?;
            emit(&outcome, json)?;
            Ok(outcome.exit_code())
        }

        Commands::Validate {
            path, schema, json, ..
        } => {
            let results = linter.validate_paths(&[path], schema.as_deref())?;
            if results.is_empty() {
                println!("No artifacts found to validate.");
                return Ok(ExitCode::Success);
            }
            emit(results.as_slice(), json)?;
            Ok(ExitCode::from_passed(results.iter().all(|r| r.passed)))
        }

        Commands::Verify {
            paths,
            skip_hash,
            json,
            ..
        } => {
            let report = linter.verify_paths(&paths, skip_hash)?;
            if report.artifacts_checked == 0 && report.errors.is_empty() {
                println!("No artifacts found to verify.");
                return Ok(ExitCode::Success);
            }
            emit(&report, json)?;
            Ok(ExitCode::from_passed(report.passed))
        }

        Commands::Check {
            paths,
            examples,
            skip_chain,
            json,
            ..
        } => {
            let paths = if examples {
                vec![linter.examples_dir()?]
            } else if paths.is_empty() {
                return Err(LintError::NoPaths);
            } else {
                paths
            };

            let report = linter.check_paths(&paths, skip_chain)?;
            let files = report
                .checks
                .validate_artifact
                .as_ref()
                .map_or(0, |c| c.files_checked);
            let artifacts = report
                .checks
                .verify_lineage
                .as_ref()
                .map_or(0, |c| c.artifacts_checked);
            if files == 0 && artifacts == 0 && report.passed {
                println!("No artifacts found to check.");
                return Ok(ExitCode::Success);
            }
            emit(&report, json)?;
            Ok(report.exit_code())
        }
    }
}

fn emit<T: HumanReport + Serialize + ?Sized>(report: &T, json: bool) -> LintResult<()> {
    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_human());
    }
    Ok(())
}
