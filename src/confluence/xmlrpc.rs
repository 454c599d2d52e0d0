//! Minimal XML-RPC wire model and codec.
//!
//! Only the slice of XML-RPC the Confluence remote API actually exchanges is
//! supported: string, int, boolean, struct, array, and dateTime values, one
//! method call per request, and fault responses. Requests are written with a
//! small escaping serializer; responses are parsed with roxmltree.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use thiserror::Error;

/// An XML-RPC value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  String(String),
  Int(i64),
  Bool(bool),
  /// `dateTime.iso8601` payload, kept verbatim so opaque page fields
  /// round-trip untouched.
  DateTime(String),
  Struct(BTreeMap<String, Value>),
  Array(Vec<Value>),
}

impl Value {
  /// Convenience constructor for string values.
  pub fn string(s: impl Into<String>) -> Value {
    Value::String(s.into())
  }

  /// View this value as a string slice, if it is one.
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::String(s) => Some(s),
      _ => None,
    }
  }

  fn write_xml(&self, out: &mut String) {
    out.push_str("<value>");
    match self {
      Value::String(s) => {
        out.push_str("<string>");
        escape_into(s, out);
        out.push_str("</string>");
      }
      Value::Int(n) => {
        let _ = write!(out, "<int>{n}</int>");
      }
      Value::Bool(b) => {
        let _ = write!(out, "<boolean>{}</boolean>", if *b { 1 } else { 0 });
      }
      Value::DateTime(s) => {
        out.push_str("<dateTime.iso8601>");
        escape_into(s, out);
        out.push_str("</dateTime.iso8601>");
      }
      Value::Struct(members) => {
        out.push_str("<struct>");
        for (name, value) in members {
          out.push_str("<member><name>");
          escape_into(name, out);
          out.push_str("</name>");
          value.write_xml(out);
          out.push_str("</member>");
        }
        out.push_str("</struct>");
      }
      Value::Array(items) => {
        out.push_str("<array><data>");
        for item in items {
          item.write_xml(out);
        }
        out.push_str("</data></array>");
      }
    }
    out.push_str("</value>");
  }
}

/// A fault returned by the server in place of a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("server fault {code}: {message}")]
pub struct Fault {
  pub code: i64,
  pub message: String,
}

/// A decoded method response: either a result value or a fault.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
  Success(Value),
  Fault(Fault),
}

/// A response that could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
  #[error("XML parse error: {0}")]
  Xml(#[from] roxmltree::Error),
  #[error("malformed XML-RPC response: {0}")]
  Malformed(String),
}

/// Serialize a method call into a request body.
pub fn encode_request(method: &str, params: &[Value]) -> String {
  let mut out = String::from("<?xml version=\"1.0\"?>\n<methodCall><methodName>");
  escape_into(method, &mut out);
  out.push_str("</methodName><params>");
  for param in params {
    out.push_str("<param>");
    param.write_xml(&mut out);
    out.push_str("</param>");
  }
  out.push_str("</params></methodCall>");
  out
}

/// Parse a method response body into a result value or fault.
pub fn decode_response(xml: &str) -> Result<Response, DecodeError> {
  let doc = roxmltree::Document::parse(xml)?;
  let root = doc.root_element();
  if root.tag_name().name() != "methodResponse" {
    return Err(DecodeError::Malformed(format!(
      "expected methodResponse, found {}",
      root.tag_name().name()
    )));
  }

  if let Some(fault) = element_child(root, "fault") {
    let value = element_child(fault, "value")
      .ok_or_else(|| DecodeError::Malformed("fault without value".to_string()))?;
    return Ok(Response::Fault(parse_fault(parse_value(value)?)));
  }

  let value = element_child(root, "params")
    .and_then(|params| element_child(params, "param"))
    .and_then(|param| element_child(param, "value"))
    .ok_or_else(|| DecodeError::Malformed("response without params".to_string()))?;
  Ok(Response::Success(parse_value(value)?))
}

fn parse_fault(value: Value) -> Fault {
  let mut members = match value {
    Value::Struct(members) => members,
    other => {
      return Fault {
        code: 0,
        message: format!("{other:?}"),
      };
    }
  };
  let code = match members.remove("faultCode") {
    Some(Value::Int(code)) => code,
    Some(Value::String(s)) => s.parse().unwrap_or(0),
    _ => 0,
  };
  let message = match members.remove("faultString") {
    Some(Value::String(s)) => s,
    Some(other) => format!("{other:?}"),
    None => "unknown fault".to_string(),
  };
  Fault { code, message }
}

fn parse_value(node: roxmltree::Node) -> Result<Value, DecodeError> {
  let typed = node.children().find(|child| child.is_element());
  let Some(typed) = typed else {
    // A bare <value> with no type element is a string per the XML-RPC spec.
    return Ok(Value::String(text_of(node)));
  };

  match typed.tag_name().name() {
    "string" => Ok(Value::String(text_of(typed))),
    "int" | "i4" => {
      let text = text_of(typed);
      text
        .trim()
        .parse()
        .map(Value::Int)
        .map_err(|_| DecodeError::Malformed(format!("invalid int value '{text}'")))
    }
    "boolean" => Ok(Value::Bool(text_of(typed).trim() == "1")),
    "dateTime.iso8601" => Ok(Value::DateTime(text_of(typed))),
    "struct" => {
      let mut members = BTreeMap::new();
      for member in typed.children().filter(|child| child.has_tag_name("member")) {
        let name = element_child(member, "name")
          .map(text_of)
          .ok_or_else(|| DecodeError::Malformed("struct member without name".to_string()))?;
        let value = element_child(member, "value")
          .ok_or_else(|| DecodeError::Malformed(format!("struct member '{name}' without value")))?;
        members.insert(name, parse_value(value)?);
      }
      Ok(Value::Struct(members))
    }
    "array" => {
      let data = element_child(typed, "data")
        .ok_or_else(|| DecodeError::Malformed("array without data".to_string()))?;
      let mut items = Vec::new();
      for value in data.children().filter(|child| child.has_tag_name("value")) {
        items.push(parse_value(value)?);
      }
      Ok(Value::Array(items))
    }
    other => Err(DecodeError::Malformed(format!("unsupported value type '{other}'"))),
  }
}

/// Concatenated text content of a node's direct text children. Entity
/// references can split the text into several nodes.
fn text_of(node: roxmltree::Node) -> String {
  node
    .children()
    .filter(|child| child.is_text())
    .filter_map(|child| child.text())
    .collect()
}

fn element_child<'a, 'input>(
  node: roxmltree::Node<'a, 'input>,
  name: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
  node.children().find(|child| child.has_tag_name(name))
}

fn escape_into(text: &str, out: &mut String) {
  for c in text.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      other => out.push(other),
    }
  }
}
