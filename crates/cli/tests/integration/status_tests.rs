use predicates::prelude::*;

use super::common::*;

#[test]
fn fresh_store_needs_everything() {
  let env = TestEnv::new();

  env
    .keel_cmd()
    .arg("status")
    .arg(fixture_path("graph.json"))
    .assert()
    .success()
    .stdout(predicate::str::contains("zlib@1.2.11 (not installed)"))
    .stdout(predicate::str::contains("app@0.1.0 (forced)"))
    .stdout(predicate::str::contains("2 of 2 task(s) need building"));

  assert!(env.builds().is_empty());
}

#[test]
fn json_output_reports_each_decision() {
  let env = TestEnv::new();
  env.install("zlib-1.2.11");

  let output = env
    .keel_cmd()
    .arg("status")
    .arg(fixture_path("graph.json"))
    .args(["--output", "json"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let statuses: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let statuses = statuses.as_array().unwrap();
  assert_eq!(statuses.len(), 2);

  assert_eq!(statuses[0]["id"], "zlib-1.2.11");
  assert_eq!(statuses[0]["needsBuild"], false);
  assert_eq!(statuses[0]["sourceType"], "immutable");
  assert!(statuses[0].get("reason").is_none());

  assert_eq!(statuses[1]["id"], "app");
  assert_eq!(statuses[1]["needsBuild"], true);
  assert_eq!(statuses[1]["buildOnly"], true);
  assert_eq!(statuses[1]["reason"], "forced");
}

#[test]
fn explicit_root_limits_the_report() {
  let env = TestEnv::new();

  env
    .keel_cmd()
    .arg("status")
    .arg(fixture_path("graph.json"))
    .args(["--root", "zlib-1.2.11"])
    .assert()
    .success()
    .stdout(predicate::str::contains("1 of 1 task(s) need building"))
    .stdout(predicate::str::contains("app@0.1.0").not());
}

#[test]
fn unknown_root_fails() {
  let env = TestEnv::new();

  env
    .keel_cmd()
    .arg("status")
    .arg(fixture_path("graph.json"))
    .args(["--root", "openssl-3.0.0"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("openssl-3.0.0 not found"));
}
