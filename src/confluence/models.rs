//! Page records exchanged with the Confluence remote API.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};

use super::xmlrpc::Value;

/// The two legacy remote API variants.
///
/// They expose the same operations under different method prefixes; v2 works
/// on storage format and therefore requires converting wiki markup before
/// upload, v1 accepts wiki markup directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
  V1,
  V2,
}

impl ApiVersion {
  /// The method prefix used on the wire, e.g. `confluence2.getPage`.
  pub fn method_prefix(self) -> &'static str {
    match self {
      ApiVersion::V1 => "confluence1",
      ApiVersion::V2 => "confluence2",
    }
  }
}

/// A full page record as returned by `getPage`.
///
/// Only the fields this tool reads or overwrites are broken out; everything
/// else the server sent (version, audit timestamps, url, permissions, ...)
/// is carried in `extra` and written back untouched on update, which is what
/// lets the server do its own version handling.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
  pub id: String,
  pub space: String,
  pub title: String,
  pub content: String,
  pub parent_id: String,
  pub extra: BTreeMap<String, Value>,
}

impl Page {
  /// Decode a page record from a response value.
  pub fn from_value(value: Value) -> Result<Page> {
    let mut members = match value {
      Value::Struct(members) => members,
      other => bail!("page record is not a struct: {other:?}"),
    };

    let id = take_string(&mut members, "id").context("page record has no id")?;
    let space = take_string(&mut members, "space").unwrap_or_default();
    let title = take_string(&mut members, "title").unwrap_or_default();
    let content = take_string(&mut members, "content").unwrap_or_default();
    let parent_id = take_string(&mut members, "parentId").unwrap_or_default();

    Ok(Page {
      id,
      space,
      title,
      content,
      parent_id,
      extra: members,
    })
  }

  /// Encode this record for `updatePage`, merging the overwritten fields
  /// back over the opaque ones.
  pub fn to_value(&self) -> Value {
    let mut members = self.extra.clone();
    members.insert("id".to_string(), Value::string(&self.id));
    members.insert("space".to_string(), Value::string(&self.space));
    members.insert("title".to_string(), Value::string(&self.title));
    members.insert("content".to_string(), Value::string(&self.content));
    members.insert("parentId".to_string(), Value::string(&self.parent_id));
    Value::Struct(members)
  }
}

/// The minimal record `storePage` needs to create a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPage {
  pub space: String,
  pub title: String,
  pub content: String,
  pub parent_id: String,
}

impl NewPage {
  pub fn to_value(&self) -> Value {
    let mut members = BTreeMap::new();
    members.insert("space".to_string(), Value::string(&self.space));
    members.insert("title".to_string(), Value::string(&self.title));
    members.insert("content".to_string(), Value::string(&self.content));
    members.insert("parentId".to_string(), Value::string(&self.parent_id));
    Value::Struct(members)
  }
}

/// Options passed alongside an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOptions {
  /// Suppress prominent change notifications for this edit.
  pub minor_edit: bool,
  pub version_comment: String,
}

impl UpdateOptions {
  pub fn to_value(&self) -> Value {
    let mut members = BTreeMap::new();
    members.insert("minorEdit".to_string(), Value::Bool(self.minor_edit));
    members.insert("versionComment".to_string(), Value::string(&self.version_comment));
    Value::Struct(members)
  }
}

/// Outcome of looking a page up by space and title.
///
/// The remote API signals a missing page with a fault; surfacing the miss as
/// a value keeps the create-vs-update decision out of the error path.
#[derive(Debug, Clone, PartialEq)]
pub enum PageLookup {
  Found(Page),
  Missing,
}

/// Remove a member and coerce it to a string. Numeric ids are stringified,
/// matching how the program treats every id it touches.
fn take_string(members: &mut BTreeMap<String, Value>, key: &str) -> Option<String> {
  match members.remove(key)? {
    Value::String(s) => Some(s),
    Value::Int(n) => Some(n.to_string()),
    other => {
      // Put unexpected shapes back so they round-trip instead of vanishing.
      members.insert(key.to_string(), other);
      None
    }
  }
}
