use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::graph::Graph;
use crate::node::{AttrValue, Reference, TaskKind, TaskNode};
use crate::parse::{self, Decl, RawTask};

/// A validated task graph.
///
/// Tasks and edges keep their declaration order, so two parses of the same
/// source compare equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
  pub nodes: Vec<TaskNode>,
  pub edges: Vec<(String, String)>,
}

impl Pipeline {
  /// Parse DSL text into a validated pipeline.
  ///
  /// Beyond the grammar, this enforces the structural invariants: unique
  /// task names, edges over declared tasks, acyclicity, a single entry
  /// task, and every `$(task...)` reference naming a transitive
  /// predecessor of the task that declares it.
  pub fn parse(source: &str) -> Result<Pipeline, PipelineError> {
    let mut nodes: Vec<TaskNode> = Vec::new();
    let mut edges: Vec<(String, String)> = Vec::new();

    for decl in parse::parse_document(source)? {
      match decl {
        Decl::Task(raw) => nodes.push(build_node(raw)?),
        Decl::Edges(chain) => {
          for pair in chain.windows(2) {
            edges.push((pair[0].clone(), pair[1].clone()));
          }
        }
      }
    }

    let pipeline = Pipeline { nodes, edges };
    pipeline.validate()?;
    Ok(pipeline)
  }

  /// Build the graph structure for traversal.
  pub fn graph(&self) -> Graph {
    Graph::new(&self.task_names(), &self.edges)
  }

  /// Get a task by name.
  pub fn node(&self, name: &str) -> Option<&TaskNode> {
    self.nodes.iter().find(|n| n.name == name)
  }

  fn task_names(&self) -> Vec<String> {
    self.nodes.iter().map(|n| n.name.clone()).collect()
  }

  fn validate(&self) -> Result<(), PipelineError> {
    let mut names = HashSet::new();
    for node in &self.nodes {
      if !names.insert(node.name.clone()) {
        return Err(PipelineError::DuplicateTask(node.name.clone()));
      }
    }

    for (from, to) in &self.edges {
      for end in [from, to] {
        if !names.contains(end) {
          return Err(PipelineError::UnknownEdgeTask(end.clone()));
        }
      }
    }

    self.detect_cycle()?;

    let graph = self.graph();
    match graph.entry_points() {
      [] => return Err(PipelineError::NoEntryTask),
      [_] => {}
      many => return Err(PipelineError::MultipleEntryTasks(many.to_vec())),
    }

    // Interpolation may only read tasks that are guaranteed to have
    // completed, i.e. transitive predecessors.
    for node in &self.nodes {
      let upstream = graph.transitive_upstream(&node.name);
      for reference in node.references()? {
        if let Reference::Task { name, .. } = reference {
          if !upstream.contains(&name) {
            return Err(PipelineError::UnreachableReference {
              task: node.name.clone(),
              target: name,
            });
          }
        }
      }
    }

    Ok(())
  }

  /// Check for cycles using DFS coloring.
  fn detect_cycle(&self) -> Result<(), PipelineError> {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for node in &self.nodes {
      adjacency.insert(node.name.as_str(), Vec::new());
    }
    for (from, to) in &self.edges {
      if let Some(neighbors) = adjacency.get_mut(from.as_str()) {
        neighbors.push(to.as_str());
      }
    }

    // 0 = unvisited, 1 = in progress, 2 = done
    let mut color: HashMap<&str, u8> = self
      .nodes
      .iter()
      .map(|n| (n.name.as_str(), 0u8))
      .collect();

    fn dfs<'a>(
      node: &'a str,
      adjacency: &HashMap<&'a str, Vec<&'a str>>,
      color: &mut HashMap<&'a str, u8>,
    ) -> Option<&'a str> {
      color.insert(node, 1);

      if let Some(neighbors) = adjacency.get(node) {
        for &next in neighbors {
          match color.get(next) {
            Some(1) => return Some(next), // back edge
            Some(0) => {
              if let Some(hit) = dfs(next, adjacency, color) {
                return Some(hit);
              }
            }
            _ => {}
          }
        }
      }

      color.insert(node, 2);
      None
    }

    for node in &self.nodes {
      if color.get(node.name.as_str()) == Some(&0) {
        if let Some(hit) = dfs(node.name.as_str(), &adjacency, &mut color) {
          return Err(PipelineError::Cycle(hit.to_string()));
        }
      }
    }

    Ok(())
  }
}

fn build_node(raw: RawTask) -> Result<TaskNode, PipelineError> {
  let mut kind = None;
  let mut fail_early = false;
  let mut attrs = Vec::new();

  for (name, value) in raw.attrs {
    match name.as_str() {
      "type" => {
        let tag = match &value {
          AttrValue::Str(s) => s.clone(),
          AttrValue::Bool(b) => b.to_string(),
          AttrValue::Int(i) => i.to_string(),
        };
        kind = Some(TaskKind::from_tag(&tag).ok_or_else(|| PipelineError::UnknownKind {
          name: raw.name.clone(),
          kind: tag,
        })?);
      }
      "failEarly" => fail_early = value.as_bool().unwrap_or(false),
      _ => attrs.push((name, value)),
    }
  }

  let kind = kind.ok_or_else(|| PipelineError::MissingKind(raw.name.clone()))?;
  Ok(TaskNode {
    name: raw.name,
    kind,
    attrs,
    fail_early,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  const CHAIN: &str = r#"
    enc    [type=encode_call abi="check(uint256 id)" data="{\"id\":$(jobSpec.upkeepID)}"]
    call   [type=remote_call failEarly=true data="$(enc)"]
    dec    [type=decode_result abi="bool ok"]
    gate   [type=conditional_gate failEarly=true data="$(dec.ok)"]
    submit [type=submit_transaction minConfirmations=0 data="$(enc)"]

    enc -> call -> dec -> gate -> submit
  "#;

  #[test]
  fn parses_a_linear_pipeline() {
    let pipeline = Pipeline::parse(CHAIN).unwrap();
    assert_eq!(pipeline.nodes.len(), 5);
    assert_eq!(pipeline.edges.len(), 4);

    let call = pipeline.node("call").unwrap();
    assert_eq!(call.kind, TaskKind::RemoteCall);
    assert!(call.fail_early);
    assert!(!pipeline.node("enc").unwrap().fail_early);

    let graph = pipeline.graph();
    assert_eq!(graph.entry_points(), &["enc".to_string()]);
    assert_eq!(graph.terminal_points(), &["submit".to_string()]);
  }

  #[test]
  fn parse_is_idempotent() {
    let first = Pipeline::parse(CHAIN).unwrap();
    let second = Pipeline::parse(CHAIN).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn rejects_duplicate_task_names() {
    let err = Pipeline::parse(
      "a [type=encode_call]\na [type=encode_call]\na -> a",
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::DuplicateTask(name) if name == "a"));
  }

  #[test]
  fn rejects_edges_to_undeclared_tasks() {
    let err = Pipeline::parse("a [type=encode_call]\na -> ghost").unwrap_err();
    assert!(matches!(err, PipelineError::UnknownEdgeTask(name) if name == "ghost"));
  }

  #[test]
  fn rejects_cycles() {
    let err = Pipeline::parse(
      "a [type=encode_call]\nb [type=remote_call data=\"$(a)\"]\na -> b\nb -> a",
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::Cycle(_)));
  }

  #[test]
  fn rejects_multiple_entry_tasks() {
    let err = Pipeline::parse(
      "a [type=encode_call]\nb [type=encode_call]\nc [type=remote_call]\na -> c\nb -> c",
    )
    .unwrap_err();
    let PipelineError::MultipleEntryTasks(entries) = err else {
      panic!("expected multiple entry tasks error");
    };
    assert_eq!(entries, vec!["a".to_string(), "b".to_string()]);
  }

  #[test]
  fn rejects_reference_to_downstream_task() {
    // `a` peeks at `b`, which runs after it.
    let err = Pipeline::parse(
      "a [type=encode_call data=\"$(b)\"]\nb [type=remote_call]\na -> b",
    )
    .unwrap_err();
    assert!(matches!(
      err,
      PipelineError::UnreachableReference { task, target } if task == "a" && target == "b"
    ));
  }

  #[test]
  fn rejects_reference_to_sibling_not_upstream() {
    let err = Pipeline::parse(
      "a [type=encode_call]\nb [type=remote_call]\nc [type=decode_result data=\"$(b)\"]\na -> b\na -> c",
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::UnreachableReference { .. }));
  }

  #[test]
  fn input_references_need_no_edge() {
    let pipeline =
      Pipeline::parse("a [type=encode_call data=\"$(jobSpec.upkeepID)\"]").unwrap();
    assert_eq!(pipeline.nodes.len(), 1);
  }

  #[test]
  fn rejects_task_without_type() {
    let err = Pipeline::parse("a [failEarly=true]").unwrap_err();
    assert!(matches!(err, PipelineError::MissingKind(name) if name == "a"));
  }

  #[test]
  fn rejects_unknown_task_type() {
    let err = Pipeline::parse("a [type=teleport]").unwrap_err();
    assert!(matches!(
      err,
      PipelineError::UnknownKind { kind, .. } if kind == "teleport"
    ));
  }

  #[test]
  fn rejects_empty_document() {
    let err = Pipeline::parse("").unwrap_err();
    assert!(matches!(err, PipelineError::NoEntryTask));
  }

  #[test]
  fn type_and_fail_early_are_lifted_out_of_attrs() {
    let pipeline = Pipeline::parse("a [type=remote_call failEarly=true gas=\"100\"]").unwrap();
    let node = pipeline.node("a").unwrap();
    assert!(node.attr("type").is_none());
    assert!(node.attr("failEarly").is_none());
    assert!(node.attr("gas").is_some());
  }
}
