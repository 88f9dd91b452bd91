use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("syntax error near {0:?}")]
  Syntax(String),

  #[error("task {0} has no type attribute")]
  MissingKind(String),

  #[error("unknown task type {kind:?} on task {name}")]
  UnknownKind { name: String, kind: String },

  #[error("duplicate task name: {0}")]
  DuplicateTask(String),

  #[error("edge references unknown task: {0}")]
  UnknownEdgeTask(String),

  #[error("cycle detected through task {0}")]
  Cycle(String),

  #[error("pipeline has no entry task (every task has a predecessor)")]
  NoEntryTask,

  #[error("pipeline has multiple entry tasks: {}", .0.join(", "))]
  MultipleEntryTasks(Vec<String>),

  #[error("malformed interpolation {text:?} in task {task}")]
  MalformedReference { task: String, text: String },

  #[error("task {task} references {target}, which is not upstream of it")]
  UnreachableReference { task: String, target: String },
}
