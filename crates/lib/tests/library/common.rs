//! Shared helpers for library integration tests.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};

use keel_lib::build::mtime::max_source_mod_time;
use keel_lib::build::{BuildInfo, BuildOptions, Builder};
use keel_lib::execute::BuildError;
use keel_lib::task::{ConfigPath, SourceType};
use keel_lib::{Config, Task, TaskGraph};
use tempfile::TempDir;

/// Set a file's mtime to `secs` seconds after the Unix epoch, creating it if needed.
pub fn set_mtime(path: &Path, secs: u64) {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }
  if !path.exists() {
    std::fs::write(path, "").unwrap();
  }
  let file = std::fs::File::options().write(true).open(path).unwrap();
  file.set_modified(UNIX_EPOCH + Duration::from_secs(secs)).unwrap();
}

/// Isolated store and project directories.
pub struct TestEnv {
  _temp: TempDir,
  pub config: Config,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("project");
    let config = Config::new(temp.path().join("store"), project.join("_keel").join("store"), &project);
    Self { _temp: temp, config }
  }

  pub fn install(&self, task: &Task) {
    std::fs::create_dir_all(self.config.resolve(&task.paths.install)).unwrap();
  }

  pub fn touch_source(&self, task: &Task, relative: &str, secs: u64) {
    set_mtime(&self.config.resolve(&task.paths.source).join(relative), secs);
  }
}

pub fn immutable(id: &str, deps: &[&str]) -> Task {
  Task::new(id, id, "1.0.0", SourceType::Immutable, ConfigPath::store(format!("s/{}", id)))
    .with_dependencies(deps.iter().copied())
}

pub fn development(id: &str, deps: &[&str]) -> Task {
  Task::new(id, id, "dev", SourceType::Development, ConfigPath::project(format!("packages/{}", id)))
    .with_dependencies(deps.iter().copied())
}

pub fn root(id: &str, deps: &[&str]) -> Task {
  Task::new(id, id, "0.1.0", SourceType::Root, ConfigPath::project("")).with_dependencies(deps.iter().copied())
}

pub fn graph(tasks: impl IntoIterator<Item = Task>) -> TaskGraph {
  TaskGraph::new(tasks).unwrap()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
  Start(String),
  Finish(String),
}

/// A builder that behaves like the real one on disk.
///
/// On success it creates the install directory and writes BuildInfo with the
/// current source watermark. It tracks how many builds overlap.
pub struct FakeBuilder {
  pub events: RefCell<Vec<Event>>,
  pub options: RefCell<Vec<(String, BuildOptions)>>,
  running: Cell<usize>,
  pub max_running: Cell<usize>,
  failing: HashSet<String>,
  delay: Duration,
}

impl FakeBuilder {
  pub fn new() -> Self {
    Self {
      events: RefCell::new(Vec::new()),
      options: RefCell::new(Vec::new()),
      running: Cell::new(0),
      max_running: Cell::new(0),
      failing: HashSet::new(),
      delay: Duration::from_millis(5),
    }
  }

  pub fn failing(mut self, id: &str) -> Self {
    self.failing.insert(id.to_string());
    self
  }

  pub fn delay(mut self, delay: Duration) -> Self {
    self.delay = delay;
    self
  }

  /// Task ids in the order their builds started.
  pub fn started(&self) -> Vec<String> {
    self
      .events
      .borrow()
      .iter()
      .filter_map(|e| match e {
        Event::Start(id) => Some(id.clone()),
        Event::Finish(_) => None,
      })
      .collect()
  }

  pub fn start_count(&self, id: &str) -> usize {
    self.started().iter().filter(|s| s.as_str() == id).count()
  }

  pub fn position(&self, event: &Event) -> usize {
    self.events.borrow().iter().position(|e| e == event).unwrap()
  }

  pub fn options_for(&self, id: &str) -> BuildOptions {
    self
      .options
      .borrow()
      .iter()
      .find(|(built, _)| built == id)
      .map(|(_, o)| o.clone())
      .unwrap()
  }
}

impl Builder for FakeBuilder {
  async fn build(&self, options: &BuildOptions, config: &Config, task: &Task) -> Result<(), BuildError> {
    let id = task.id.to_string();
    self.events.borrow_mut().push(Event::Start(id.clone()));
    self.options.borrow_mut().push((id.clone(), options.clone()));
    self.running.set(self.running.get() + 1);
    self.max_running.set(self.max_running.get().max(self.running.get()));

    tokio::time::sleep(self.delay).await;

    self.running.set(self.running.get() - 1);
    self.events.borrow_mut().push(Event::Finish(id.clone()));

    if self.failing.contains(&id) {
      return Err(BuildError::CmdFailed {
        cmd: format!("fake-builder {}", id),
        code: Some(1),
      });
    }

    let info = BuildInfo {
      source_mod_time: max_source_mod_time(&config.resolve(&task.paths.source)).await,
      time_spent: Some(self.delay.as_secs_f64()),
    };
    let info_path = config.resolve(&task.paths.build_info);
    if let Some(parent) = info_path.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&info_path, serde_json::to_vec(&info).unwrap()).await?;
    tokio::fs::create_dir_all(config.resolve(&task.paths.install)).await?;
    Ok(())
  }
}
