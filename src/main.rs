use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use upkeep_job::{canonical_pipeline, validate_keeper_spec};

/// Upkeep - validation and materialization of on-chain upkeep jobs
#[derive(Parser)]
#[command(name = "upkeep")]
#[command(version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Validate a TOML job spec file and print the bound job
  Validate {
    /// Path to the job spec file
    spec_file: PathBuf,
  },

  /// Print the canonical pipeline template
  Template,

  /// Print the default parameter set for a chain
  Defaults {
    /// Numeric chain identifier
    chain_id: u64,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  match cli.command {
    Some(Commands::Validate { spec_file }) => validate(spec_file)?,
    Some(Commands::Template) => template()?,
    Some(Commands::Defaults { chain_id }) => defaults(chain_id)?,
    None => {
      println!("upkeep - use --help to see available commands");
    }
  }

  Ok(())
}

fn validate(spec_file: PathBuf) -> Result<()> {
  let raw = std::fs::read_to_string(&spec_file)
    .with_context(|| format!("failed to read job spec: {}", spec_file.display()))?;

  let job = validate_keeper_spec(&raw).context("job spec rejected")?;

  eprintln!("Bound job {}", job.external_job_id);
  println!("{}", serde_json::to_string_pretty(&job)?);
  Ok(())
}

fn template() -> Result<()> {
  let pipeline = canonical_pipeline();
  println!("{}", serde_json::to_string_pretty(&*pipeline)?);
  Ok(())
}

fn defaults(chain_id: u64) -> Result<()> {
  match upkeep_chains::chain_defaults(chain_id) {
    Some(defaults) => {
      print!("{}", defaults.export());
      Ok(())
    }
    None => bail!("unsupported chain id: {chain_id}"),
  }
}
