use predicates::prelude::*;

use super::common::*;

#[test]
fn builds_dependency_then_root() {
  let env = TestEnv::new();

  env
    .build_cmd(RECORDING_BUILDER)
    .assert()
    .success()
    .stdout(predicate::str::contains("Built app"));

  let builds = env.builds();
  assert_eq!(builds.len(), 2, "{builds:?}");
  assert!(builds[0].starts_with(r#""id":"zlib-1.2.11""#));
  assert!(!builds[0].contains("--build-only"));
  assert!(builds[0].contains("--store-path"));
  assert!(builds[1].starts_with(r#""id":"app""#));
  assert!(builds[1].contains("--build-only"));
  assert!(builds[1].contains("--force"));
}

#[test]
fn installed_dependency_is_not_rebuilt() {
  let env = TestEnv::new();
  env.install("zlib-1.2.11");

  env.build_cmd(RECORDING_BUILDER).assert().success();

  let builds = env.builds();
  assert_eq!(builds.len(), 1, "{builds:?}");
  assert!(builds[0].starts_with(r#""id":"app""#));
}

#[test]
fn force_all_rebuilds_installed_dependency() {
  let env = TestEnv::new();
  env.install("zlib-1.2.11");

  env
    .build_cmd(RECORDING_BUILDER)
    .args(["--force", "all"])
    .assert()
    .success();

  assert_eq!(env.builds().len(), 2);
}

#[test]
fn deps_only_leaves_root_alone() {
  let env = TestEnv::new();

  env
    .build_cmd(RECORDING_BUILDER)
    .arg("--deps-only")
    .assert()
    .success()
    .stdout(predicate::str::contains("Dependencies of app ready"));

  let builds = env.builds();
  assert_eq!(builds.len(), 1, "{builds:?}");
  assert!(builds[0].starts_with(r#""id":"zlib-1.2.11""#));
}

#[test]
fn quiet_is_passed_to_builder() {
  let env = TestEnv::new();

  env
    .build_cmd(RECORDING_BUILDER)
    .args(["--quiet", "-j", "1"])
    .assert()
    .success();

  assert!(env.builds().iter().all(|line| line.contains("--quiet")));
}

#[test]
fn failing_builder_names_the_package() {
  let env = TestEnv::new();

  env
    .build_cmd("exit 3\n")
    .assert()
    .failure()
    .stderr(predicate::str::contains("building zlib@1.2.11"))
    .stderr(predicate::str::contains("exit code Some(3)"));
}

#[test]
fn builder_stderr_can_go_to_a_file() {
  let env = TestEnv::new();
  let log = env.temp.path().join("stderr.log");

  env
    .build_cmd("echo 'cc: fatal error' >&2\nexit 1\n")
    .arg("--stderr")
    .arg(&log)
    .assert()
    .failure();

  assert!(std::fs::read_to_string(&log).unwrap().contains("cc: fatal error"));
}

#[test]
fn missing_builder_program_fails() {
  let env = TestEnv::new();

  env
    .keel_cmd()
    .arg("build")
    .arg(fixture_path("graph.json"))
    .arg("--builder")
    .arg(env.temp.path().join("no-such-builder"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("failed to spawn"));
}
