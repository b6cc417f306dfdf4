//! keel - build orchestration for native package graphs.

mod cmd;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{BuildArgs, StatusArgs};

/// keel - build a resolved package graph, rebuilding only what changed
#[derive(Parser)]
#[command(name = "keel")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build a task and everything it depends on
  Build(BuildArgs),

  /// Show which tasks a build would rebuild, without building
  Status(StatusArgs),
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  // Initialize logging; RUST_LOG wins over --verbose
  let default_level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Build(args) => cmd::cmd_build(args),
    Commands::Status(args) => cmd::cmd_status(args, cli.verbose),
  }
}
