//! Raw command-line token parsing.
//!
//! The grammar here is looser than a conventional flag parser: any token
//! starting with `-` names an option, `name=value` assigns a single value,
//! and bare tokens attach to the most recently named option so that
//! `--files a.txt b.txt c.txt` accumulates a list. Option names are accepted
//! without restriction at this layer; the configuration layer decides which
//! names are legal.

use std::collections::HashMap;

/// A parsed option value.
///
/// An option takes one of three shapes depending on how it appeared on the
/// command line. The merging rule is: a second value always produces a
/// `List`, and a `Flag` hit by a bare token is discarded in favor of the
/// list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
  /// `--name=value`
  Scalar(String),
  /// Bare `--name` with no value.
  Flag(bool),
  /// Bare tokens following `--name`, in arrival order.
  List(Vec<String>),
}

impl ArgValue {
  /// Fold one more bare token into this value.
  fn push(self, token: &str) -> ArgValue {
    match self {
      // A flag followed by bare tokens becomes list-valued; the boolean is
      // not kept.
      ArgValue::Flag(_) => ArgValue::List(vec![token.to_string()]),
      ArgValue::Scalar(existing) => ArgValue::List(vec![existing, token.to_string()]),
      ArgValue::List(mut items) => {
        items.push(token.to_string());
        ArgValue::List(items)
      }
    }
  }
}

/// Option values keyed by name, as parsed from the raw token list.
#[derive(Debug, Default)]
pub struct RawArgs {
  values: HashMap<String, ArgValue>,
}

impl RawArgs {
  /// Parse a raw token list (excluding the program name).
  pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Self {
    let mut values: HashMap<String, ArgValue> = HashMap::new();
    let mut current = String::new();

    for token in tokens {
      let token = token.as_ref();
      // The dash test applies to the part before any `=`, and dashes are
      // stripped from the name only, never from the value.
      let name_part = token.split_once('=').map_or(token, |(name, _)| name);
      if name_part.starts_with('-') {
        let name = name_part.trim_matches('-').to_string();
        let value = match token.split_once('=') {
          Some((_, value)) => ArgValue::Scalar(value.to_string()),
          None => ArgValue::Flag(true),
        };
        values.insert(name.clone(), value);
        current = name;
      } else {
        let folded = match values.remove(&current) {
          Some(existing) => existing.push(token),
          None => ArgValue::List(vec![token.to_string()]),
        };
        values.insert(current.clone(), folded);
      }
    }

    Self { values }
  }

  /// Look up a parsed option by name (without dashes).
  pub fn get(&self, name: &str) -> Option<&ArgValue> {
    self.values.get(name)
  }

  /// Iterate over all parsed option names.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.values.keys().map(String::as_str)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(tokens: &[&str]) -> RawArgs {
    RawArgs::parse(tokens)
  }

  #[test]
  fn test_equals_form_yields_scalar() {
    let args = parse(&["--username=alice"]);
    assert_eq!(args.get("username"), Some(&ArgValue::Scalar("alice".to_string())));
  }

  #[test]
  fn test_bare_flag_yields_boolean() {
    let args = parse(&["--force"]);
    assert_eq!(args.get("force"), Some(&ArgValue::Flag(true)));
  }

  #[test]
  fn test_short_flag_strips_single_dash() {
    let args = parse(&["-v"]);
    assert_eq!(args.get("v"), Some(&ArgValue::Flag(true)));
  }

  #[test]
  fn test_flag_followed_by_tokens_yields_ordered_list() {
    let args = parse(&["--files", "a.txt", "b.txt", "c.txt"]);
    assert_eq!(
      args.get("files"),
      Some(&ArgValue::List(vec![
        "a.txt".to_string(),
        "b.txt".to_string(),
        "c.txt".to_string()
      ]))
    );
  }

  #[test]
  fn test_flag_upgraded_to_list_discards_boolean() {
    let args = parse(&["--files", "only.txt"]);
    assert_eq!(args.get("files"), Some(&ArgValue::List(vec!["only.txt".to_string()])));
  }

  #[test]
  fn test_scalar_followed_by_token_becomes_two_element_list() {
    let args = parse(&["--files=a.txt", "b.txt"]);
    assert_eq!(
      args.get("files"),
      Some(&ArgValue::List(vec!["a.txt".to_string(), "b.txt".to_string()]))
    );
  }

  #[test]
  fn test_later_option_takes_over_bare_tokens() {
    let args = parse(&["--files", "a.txt", "--space=DOCS", "--force"]);
    assert_eq!(args.get("files"), Some(&ArgValue::List(vec!["a.txt".to_string()])));
    assert_eq!(args.get("space"), Some(&ArgValue::Scalar("DOCS".to_string())));
    assert_eq!(args.get("force"), Some(&ArgValue::Flag(true)));
  }

  #[test]
  fn test_leading_tokens_without_option_collect_under_empty_name() {
    let args = parse(&["stray.txt"]);
    assert_eq!(args.get(""), Some(&ArgValue::List(vec!["stray.txt".to_string()])));
  }

  #[test]
  fn test_unknown_names_are_accepted_at_this_layer() {
    let args = parse(&["--frobnicate=9"]);
    assert_eq!(args.get("frobnicate"), Some(&ArgValue::Scalar("9".to_string())));
    assert_eq!(args.names().count(), 1);
  }

  #[test]
  fn test_value_keeps_dashes_and_later_equals() {
    let args = parse(&["--server=http://example.com/rpc/xmlrpc?mode=rpc-v2"]);
    assert_eq!(
      args.get("server"),
      Some(&ArgValue::Scalar("http://example.com/rpc/xmlrpc?mode=rpc-v2".to_string()))
    );
  }

  #[test]
  fn test_empty_value_after_equals() {
    let args = parse(&["--password="]);
    assert_eq!(args.get("password"), Some(&ArgValue::Scalar(String::new())));
  }
}
