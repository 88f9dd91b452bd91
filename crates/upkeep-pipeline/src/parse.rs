//! Parser for the pipeline DSL.
//!
//! The grammar is deliberately small and must stay stable: stored templates
//! depend on it:
//!
//! ```text
//! pipeline  := ( task_decl | edge_decl )*
//! task_decl := ident '[' ( ident '=' value )* ']'
//! value     := '"' escaped-chars '"' | true | false | integer | ident
//! edge_decl := ident ( '->' ident )+
//! ```
//!
//! Quoted values may escape `\"`, `\\`, `\n` and `\t` so a JSON object
//! literal can be embedded in an attribute. Interpolation references
//! (`$(task.field)`) are plain text at this level; they are extracted and
//! checked by pipeline validation, not by the grammar.

use nom::{
  IResult,
  branch::alt,
  bytes::complete::{escaped_transform, tag},
  character::complete::{alpha1, alphanumeric1, char, digit1, multispace0, none_of},
  combinator::{all_consuming, map, map_res, opt, recognize, value, verify},
  multi::{many0, separated_list1},
  sequence::{delimited, pair, preceded, terminated},
};

use crate::error::PipelineError;
use crate::node::AttrValue;

/// A task declaration before type/flag extraction.
#[derive(Debug)]
pub(crate) struct RawTask {
  pub name: String,
  pub attrs: Vec<(String, AttrValue)>,
}

#[derive(Debug)]
pub(crate) enum Decl {
  Task(RawTask),
  /// One `a -> b -> c` chain; each adjacent pair is an edge.
  Edges(Vec<String>),
}

pub(crate) fn parse_document(input: &str) -> Result<Vec<Decl>, PipelineError> {
  match all_consuming(document)(input) {
    Ok((_, decls)) => Ok(decls),
    Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(syntax_error(e.input)),
    Err(nom::Err::Incomplete(_)) => Err(PipelineError::Syntax("incomplete input".to_string())),
  }
}

fn syntax_error(rest: &str) -> PipelineError {
  let snippet: String = rest.trim_start().chars().take(40).collect();
  PipelineError::Syntax(snippet)
}

fn document(input: &str) -> IResult<&str, Vec<Decl>> {
  terminated(many0(preceded(multispace0, decl)), multispace0)(input)
}

fn decl(input: &str) -> IResult<&str, Decl> {
  // Both forms start with an identifier; a task declaration is committed to
  // by its opening bracket.
  alt((map(task_decl, Decl::Task), map(edge_decl, Decl::Edges)))(input)
}

fn ident(input: &str) -> IResult<&str, &str> {
  recognize(pair(
    alt((alpha1, tag("_"))),
    many0(alt((alphanumeric1, tag("_")))),
  ))(input)
}

fn task_decl(input: &str) -> IResult<&str, RawTask> {
  let (input, name) = ident(input)?;
  let (input, _) = multispace0(input)?;
  let (input, attrs) = delimited(
    char('['),
    many0(preceded(multispace0, attr)),
    preceded(multispace0, char(']')),
  )(input)?;
  Ok((
    input,
    RawTask {
      name: name.to_string(),
      attrs,
    },
  ))
}

fn attr(input: &str) -> IResult<&str, (String, AttrValue)> {
  let (input, name) = ident(input)?;
  let (input, _) = delimited(multispace0, char('='), multispace0)(input)?;
  let (input, value) = attr_value(input)?;
  Ok((input, (name.to_string(), value)))
}

fn attr_value(input: &str) -> IResult<&str, AttrValue> {
  alt((map(quoted, AttrValue::Str), bare_value))(input)
}

fn bare_value(input: &str) -> IResult<&str, AttrValue> {
  alt((
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
      s.parse().map(AttrValue::Int)
    }),
    map(ident, |s: &str| match s {
      "true" => AttrValue::Bool(true),
      "false" => AttrValue::Bool(false),
      _ => AttrValue::Str(s.to_string()),
    }),
  ))(input)
}

fn quoted(input: &str) -> IResult<&str, String> {
  delimited(
    char('"'),
    map(
      opt(escaped_transform(
        none_of("\\\""),
        '\\',
        alt((
          value("\"", char('"')),
          value("\\", char('\\')),
          value("\n", char('n')),
          value("\t", char('t')),
        )),
      )),
      |body: Option<String>| body.unwrap_or_default(),
    ),
    char('"'),
  )(input)
}

fn edge_decl(input: &str) -> IResult<&str, Vec<String>> {
  verify(
    separated_list1(
      delimited(multispace0, tag("->"), multispace0),
      map(ident, str::to_string),
    ),
    |chain: &Vec<String>| chain.len() >= 2,
  )(input)
}
