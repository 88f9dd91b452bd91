use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Namespace for interpolation references that resolve against the bound
/// job rather than another task's output, e.g. `$(jobSpec.upkeepID)`.
pub const INPUT_NAMESPACE: &str = "jobSpec";

/// The step kinds a pipeline task may declare.
///
/// These are declarative contracts for the executor; nothing in this crate
/// runs them. `encode_call` serializes a call signature and argument map
/// into call data, `remote_call` performs a read-only contract call,
/// `decode_result` parses call output against a typed signature,
/// `conditional_gate` aborts the run when its boolean input is false, and
/// `submit_transaction` hands off a state-changing transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
  EncodeCall,
  RemoteCall,
  DecodeResult,
  ConditionalGate,
  SubmitTransaction,
}

impl TaskKind {
  /// The tag used for this kind in DSL `type=` attributes.
  pub fn tag(&self) -> &'static str {
    match self {
      TaskKind::EncodeCall => "encode_call",
      TaskKind::RemoteCall => "remote_call",
      TaskKind::DecodeResult => "decode_result",
      TaskKind::ConditionalGate => "conditional_gate",
      TaskKind::SubmitTransaction => "submit_transaction",
    }
  }

  pub fn from_tag(tag: &str) -> Option<TaskKind> {
    match tag {
      "encode_call" => Some(TaskKind::EncodeCall),
      "remote_call" => Some(TaskKind::RemoteCall),
      "decode_result" => Some(TaskKind::DecodeResult),
      "conditional_gate" => Some(TaskKind::ConditionalGate),
      "submit_transaction" => Some(TaskKind::SubmitTransaction),
      _ => None,
    }
  }
}

/// An attribute value as written in the DSL.
///
/// String values may embed interpolation references (`$(task.field)`); the
/// raw text is preserved verbatim and resolved by the executor at run time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
  Bool(bool),
  Int(i64),
  Str(String),
}

impl AttrValue {
  pub fn as_str(&self) -> Option<&str> {
    match self {
      AttrValue::Str(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      AttrValue::Bool(b) => Some(*b),
      _ => None,
    }
  }

  /// Extract every `$(...)` reference embedded in this value.
  ///
  /// Non-string values carry no references. `task` is only used to name the
  /// offender in errors.
  pub fn references(&self, task: &str) -> Result<Vec<Reference>, PipelineError> {
    let AttrValue::Str(text) = self else {
      return Ok(Vec::new());
    };

    let mut refs = Vec::new();
    let mut rest = text.as_str();
    while let Some(start) = rest.find("$(") {
      let inner = &rest[start + 2..];
      let Some(end) = inner.find(')') else {
        return Err(PipelineError::MalformedReference {
          task: task.to_string(),
          text: rest[start..].to_string(),
        });
      };
      refs.push(Reference::parse(&inner[..end]).ok_or_else(|| {
        PipelineError::MalformedReference {
          task: task.to_string(),
          text: rest[start..start + 2 + end + 1].to_string(),
        }
      })?);
      rest = &inner[end + 1..];
    }
    Ok(refs)
  }
}

/// One parsed interpolation reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
  /// `$(jobSpec.field)`, resolving against the bound job spec.
  Input { field: String },
  /// `$(task)` or `$(task.field)`, resolving against an upstream task's
  /// output.
  Task { name: String, field: Option<String> },
}

impl Reference {
  fn parse(path: &str) -> Option<Reference> {
    let (head, field) = match path.split_once('.') {
      None => (path, None),
      Some((head, rest)) => (head, Some(rest)),
    };
    if !is_ident(head) {
      return None;
    }
    if let Some(rest) = field {
      if !rest.split('.').all(is_ident) {
        return None;
      }
    }
    if head == INPUT_NAMESPACE {
      // A bare $(jobSpec) is meaningless; an input ref must name a field.
      Some(Reference::Input {
        field: field?.to_string(),
      })
    } else {
      Some(Reference::Task {
        name: head.to_string(),
        field: field.map(str::to_string),
      })
    }
  }
}

fn is_ident(s: &str) -> bool {
  let mut chars = s.chars();
  match chars.next() {
    Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
    _ => return false,
  }
  chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// One typed step of a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskNode {
  pub name: String,
  pub kind: TaskKind,
  /// Remaining attributes in declaration order. `type` and `failEarly` are
  /// lifted out into `kind` and `fail_early`.
  pub attrs: Vec<(String, AttrValue)>,
  /// When set, any error at this task aborts the whole graph evaluation
  /// and is surfaced to the caller.
  pub fail_early: bool,
}

impl TaskNode {
  pub fn attr(&self, name: &str) -> Option<&AttrValue> {
    self
      .attrs
      .iter()
      .find(|(n, _)| n == name)
      .map(|(_, v)| v)
  }

  /// All interpolation references declared by this task's attributes.
  pub fn references(&self) -> Result<Vec<Reference>, PipelineError> {
    let mut refs = Vec::new();
    for (_, value) in &self.attrs {
      refs.extend(value.references(&self.name)?);
    }
    Ok(refs)
  }
}
