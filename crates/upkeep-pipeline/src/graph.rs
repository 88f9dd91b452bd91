use std::collections::{HashMap, HashSet};

/// Graph structure for traversal and analysis.
///
/// Entry and terminal points are listed in task declaration order so error
/// reporting and iteration stay deterministic.
#[derive(Debug, Clone)]
pub struct Graph {
  /// Adjacency list: task name -> downstream task names.
  adjacency: HashMap<String, Vec<String>>,
  /// Reverse adjacency: task name -> upstream task names.
  reverse_adjacency: HashMap<String, Vec<String>>,
  /// Tasks with no incoming edges.
  entry_points: Vec<String>,
  /// Tasks with no outgoing edges.
  terminal_points: Vec<String>,
}

impl Graph {
  /// Build a graph from declaration-ordered task names and edges.
  pub fn new(names: &[String], edges: &[(String, String)]) -> Self {
    let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
    let mut reverse_adjacency: HashMap<String, Vec<String>> = HashMap::new();

    for name in names {
      adjacency.entry(name.clone()).or_default();
      reverse_adjacency.entry(name.clone()).or_default();
    }

    for (from, to) in edges {
      adjacency.entry(from.clone()).or_default().push(to.clone());
      reverse_adjacency
        .entry(to.clone())
        .or_default()
        .push(from.clone());
    }

    let entry_points: Vec<String> = names
      .iter()
      .filter(|n| reverse_adjacency.get(*n).is_none_or(|v| v.is_empty()))
      .cloned()
      .collect();

    let terminal_points: Vec<String> = names
      .iter()
      .filter(|n| adjacency.get(*n).is_none_or(|v| v.is_empty()))
      .cloned()
      .collect();

    Self {
      adjacency,
      reverse_adjacency,
      entry_points,
      terminal_points,
    }
  }

  /// Tasks with no incoming edges.
  pub fn entry_points(&self) -> &[String] {
    &self.entry_points
  }

  /// Tasks with no outgoing edges.
  pub fn terminal_points(&self) -> &[String] {
    &self.terminal_points
  }

  /// Downstream tasks for a given task.
  pub fn downstream(&self, name: &str) -> &[String] {
    self
      .adjacency
      .get(name)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Upstream tasks for a given task.
  pub fn upstream(&self, name: &str) -> &[String] {
    self
      .reverse_adjacency
      .get(name)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Every task reachable from `name` by walking edges backwards, i.e. the
  /// tasks guaranteed to have completed before `name` runs.
  pub fn transitive_upstream(&self, name: &str) -> HashSet<String> {
    let mut seen = HashSet::new();
    let mut stack: Vec<&str> = self.upstream(name).iter().map(String::as_str).collect();
    while let Some(current) = stack.pop() {
      if seen.insert(current.to_string()) {
        stack.extend(self.upstream(current).iter().map(String::as_str));
      }
    }
    seen
  }
}
