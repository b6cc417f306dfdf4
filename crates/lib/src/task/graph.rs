//! Task graph for build dependency management.
//!
//! Tasks are stored in an arena indexed by [`TaskId`]. Edges point from a
//! dependency to its dependent, so walking incoming edges from a task visits
//! everything it needs built first.

use std::collections::HashMap;
use std::path::Path;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, DfsPostOrder, Reversed};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{Task, TaskId};

/// Errors raised while loading or querying a task graph.
#[derive(Debug, Error)]
pub enum GraphError {
  #[error("failed to read graph file {path}: {message}")]
  Read { path: String, message: String },

  #[error("failed to parse graph: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("duplicate task: {0}")]
  DuplicateTask(TaskId),

  #[error("task {task} depends on unknown task {dependency}")]
  UnknownDependency { task: TaskId, dependency: TaskId },

  #[error("dependency cycle detected")]
  CycleDetected,

  #[error("task not found: {0}")]
  TaskNotFound(TaskId),
}

/// On-disk form of a task graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphFile {
  /// Default traversal root, overridable by the caller.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub root: Option<TaskId>,
  pub tasks: Vec<Task>,
}

/// An arena of tasks with dependency edges.
///
/// The graph is validated on construction: ids are unique, every dependency
/// names a task in the graph, and there are no cycles.
pub struct TaskGraph {
  graph: DiGraph<Task, ()>,
  nodes: HashMap<TaskId, NodeIndex>,
  root: Option<TaskId>,
}

impl TaskGraph {
  pub fn new(tasks: impl IntoIterator<Item = Task>) -> Result<Self, GraphError> {
    let mut graph = DiGraph::new();
    let mut nodes = HashMap::new();

    // First pass: one node per task
    for task in tasks {
      let id = task.id.clone();
      if nodes.contains_key(&id) {
        return Err(GraphError::DuplicateTask(id));
      }
      let idx = graph.add_node(task);
      nodes.insert(id, idx);
    }

    // Second pass: edge from dependency to dependent
    let mut edges = Vec::new();
    for (id, &idx) in &nodes {
      for dep in &graph[idx].dependencies {
        let dep_idx = nodes.get(dep).ok_or_else(|| GraphError::UnknownDependency {
          task: id.clone(),
          dependency: dep.clone(),
        })?;
        edges.push((*dep_idx, idx));
      }
    }
    for (from, to) in edges {
      graph.add_edge(from, to, ());
    }

    toposort(&graph, None).map_err(|_| GraphError::CycleDetected)?;

    Ok(Self { graph, nodes, root: None })
  }

  pub fn from_file(path: &Path) -> Result<Self, GraphError> {
    let content = std::fs::read_to_string(path).map_err(|e| GraphError::Read {
      path: path.display().to_string(),
      message: e.to_string(),
    })?;
    Self::from_json(&content)
  }

  pub fn from_json(content: &str) -> Result<Self, GraphError> {
    let file: GraphFile = serde_json::from_str(content)?;
    let root = file.root;
    let graph = Self::new(file.tasks)?;
    if let Some(ref id) = root
      && !graph.contains(id)
    {
      return Err(GraphError::TaskNotFound(id.clone()));
    }
    Ok(Self { root, ..graph })
  }

  /// The default root recorded in the graph file, if any.
  pub fn default_root(&self) -> Option<&TaskId> {
    self.root.as_ref()
  }

  pub fn get(&self, id: &TaskId) -> Option<&Task> {
    self.nodes.get(id).map(|&idx| &self.graph[idx])
  }

  pub fn contains(&self, id: &TaskId) -> bool {
    self.nodes.contains_key(id)
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Direct dependencies of a task, in declaration order.
  pub fn dependencies<'a>(&'a self, task: &'a Task) -> impl Iterator<Item = &'a Task> + 'a {
    task.dependencies.iter().filter_map(|id| self.get(id))
  }

  /// Every task the given task transitively depends on, excluding itself.
  pub fn all_dependencies(&self, id: &TaskId) -> Vec<&Task> {
    let Some(&start) = self.nodes.get(id) else {
      return Vec::new();
    };

    let reversed = Reversed(&self.graph);
    let mut dfs = Dfs::new(reversed, start);
    let mut deps = Vec::new();
    while let Some(idx) = dfs.next(reversed) {
      if idx != start {
        deps.push(&self.graph[idx]);
      }
    }
    deps
  }

  /// Tasks reachable from `root`, dependencies before dependents, root last.
  pub fn post_order(&self, root: &TaskId) -> Result<Vec<&Task>, GraphError> {
    let &start = self.nodes.get(root).ok_or_else(|| GraphError::TaskNotFound(root.clone()))?;

    let reversed = Reversed(&self.graph);
    let mut dfs = DfsPostOrder::new(reversed, start);
    let mut order = Vec::new();
    while let Some(idx) = dfs.next(reversed) {
      order.push(&self.graph[idx]);
    }
    Ok(order)
  }
}
