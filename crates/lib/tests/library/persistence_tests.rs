//! Rebuild decisions across consecutive runs, driven by what the previous
//! run left on disk.

use keel_lib::build::ForceMode;
use keel_lib::execute::{ExecuteConfig, build};
use keel_lib::TaskId;

use super::common::*;

fn options() -> ExecuteConfig {
  ExecuteConfig {
    concurrency: 2,
    force: ForceMode::No,
    quiet: true,
    ..Default::default()
  }
}

#[tokio::test]
async fn second_run_skips_everything_but_the_root() {
  let env = TestEnv::new();
  let linked = development("linked", &[]);
  env.touch_source(&linked, "src/lib.ml", 1_000);
  let graph = graph([immutable("zlib", &[]), linked, root("app", &["zlib", "linked"])]);
  let app = TaskId::from("app");

  let first = FakeBuilder::new();
  build(&graph, &app, &first, &env.config, &options()).await.unwrap();
  assert_eq!(first.started().len(), 3);

  let second = FakeBuilder::new();
  let summary = build(&graph, &app, &second, &env.config, &options()).await.unwrap();

  assert_eq!(second.started(), vec!["app"]);
  assert_eq!(summary.skipped.len(), 2);
}

#[tokio::test]
async fn touched_development_source_triggers_rebuild() {
  let env = TestEnv::new();
  let linked = development("linked", &[]);
  env.touch_source(&linked, "src/lib.ml", 1_000);
  let graph = graph([linked.clone(), root("app", &["linked"])]);
  let app = TaskId::from("app");

  build(&graph, &app, &FakeBuilder::new(), &env.config, &options())
    .await
    .unwrap();

  env.touch_source(&linked, "src/lib.ml", 2_000);
  let builder = FakeBuilder::new();
  build(&graph, &app, &builder, &env.config, &options()).await.unwrap();

  assert_eq!(builder.started(), vec!["linked", "app"]);
}

#[tokio::test]
async fn changes_under_pruned_directories_are_ignored() {
  let env = TestEnv::new();
  let linked = development("linked", &[]);
  env.touch_source(&linked, "src/lib.ml", 1_000);
  let graph = graph([linked.clone(), root("app", &["linked"])]);
  let app = TaskId::from("app");

  build(&graph, &app, &FakeBuilder::new(), &env.config, &options())
    .await
    .unwrap();

  env.touch_source(&linked, "node_modules/dep/index.js", 5_000);
  env.touch_source(&linked, "_build/default/lib.cmx", 5_000);
  let builder = FakeBuilder::new();
  build(&graph, &app, &builder, &env.config, &options()).await.unwrap();

  assert_eq!(builder.start_count("linked"), 0);
}

#[tokio::test]
async fn deleted_build_info_triggers_rebuild() {
  let env = TestEnv::new();
  let linked = development("linked", &[]);
  env.touch_source(&linked, "src/lib.ml", 1_000);
  let graph = graph([linked.clone(), root("app", &["linked"])]);
  let app = TaskId::from("app");

  build(&graph, &app, &FakeBuilder::new(), &env.config, &options())
    .await
    .unwrap();

  std::fs::remove_file(env.config.resolve(&linked.paths.build_info)).unwrap();
  let builder = FakeBuilder::new();
  build(&graph, &app, &builder, &env.config, &options()).await.unwrap();

  assert_eq!(builder.start_count("linked"), 1);
}
