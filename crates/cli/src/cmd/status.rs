//! Status command implementation.
//!
//! Runs the rebuild decision for every task reachable from the root and
//! reports what a `keel build` with default policies would do.

use anyhow::{Context, Result};
use clap::Args;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use keel_lib::build::{BuildDecision, BuildOnlyMode, BuildReason, Classification, ForceMode, classify, decide};
use keel_lib::task::SourceType;
use keel_lib::{Config, TaskGraph, TaskId};

use super::GraphArgs;
use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success, symbols};

#[derive(Debug, Args)]
pub struct StatusArgs {
  #[command(flatten)]
  pub graph: GraphArgs,

  /// Output format
  #[arg(long, value_enum, default_value = "text")]
  pub output: OutputFormat,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskStatus {
  id: TaskId,
  name: String,
  version: String,
  source_type: SourceType,
  build_only: bool,
  needs_build: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  reason: Option<String>,
}

pub fn cmd_status(args: StatusArgs, verbose: bool) -> Result<()> {
  let (graph, root, config) = args.graph.load()?;

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let statuses = rt.block_on(collect(&graph, &root, &config))?;

  if args.output.is_json() {
    return print_json(&statuses);
  }

  let pending = statuses.iter().filter(|s| s.needs_build).count();
  for status in &statuses {
    if !status.needs_build && !verbose {
      continue;
    }
    print_task(status);
  }

  if pending == 0 {
    print_success(&format!("{} is up to date", root));
  } else {
    print_info(&format!("{} of {} task(s) need building", pending, statuses.len()));
  }
  print_stat("Store", &config.store_path.display().to_string());
  print_stat("Local store", &config.local_store_path.display().to_string());

  Ok(())
}

async fn collect(graph: &TaskGraph, root: &TaskId, config: &Config) -> Result<Vec<TaskStatus>> {
  let mut statuses = Vec::new();

  for task in graph.post_order(root)? {
    let classification = classify(task, root, ForceMode::default(), BuildOnlyMode::default());
    let decision = match classification {
      Classification::Force { .. } => BuildDecision::Build(BuildReason::Forced),
      Classification::Decide { .. } => decide(task, config).await,
    };

    statuses.push(TaskStatus {
      id: task.id.clone(),
      name: task.package.name.clone(),
      version: task.package.version.clone(),
      source_type: task.source_type(),
      build_only: classification.build_only(),
      needs_build: decision.needs_build(),
      reason: match decision {
        BuildDecision::Build(reason) => Some(reason.to_string()),
        BuildDecision::Skip => None,
      },
    });
  }

  Ok(statuses)
}

fn print_task(status: &TaskStatus) {
  let label = format!("{}@{}", status.name, status.version);
  match &status.reason {
    Some(reason) => println!(
      "  {} {} {}",
      symbols::BUILD.if_supports_color(Stream::Stdout, |s| s.yellow()),
      label,
      format!("({})", reason).if_supports_color(Stream::Stdout, |s| s.dimmed())
    ),
    None => println!(
      "  {} {} {}",
      symbols::UP_TO_DATE.if_supports_color(Stream::Stdout, |s| s.green()),
      label,
      "(up to date)".if_supports_color(Stream::Stdout, |s| s.dimmed())
    ),
  }
}
