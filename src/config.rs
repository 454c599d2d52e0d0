//! Typed run configuration built from the raw argument map.
//!
//! Defaults live on the struct; parsed arguments override or extend them.
//! Unknown option names are rejected here rather than silently absorbed, so
//! a typo fails fast instead of publishing with a half-applied setting.

use std::str::FromStr;

use thiserror::Error;

use crate::args::{ArgValue, RawArgs};
use crate::color::ColorOption;

/// Option names the configuration layer accepts.
const KNOWN_OPTIONS: &[&str] = &[
  "username", "password", "server", "space", "parent", "files", "force", "v", "debug", "color", "timeout", "h", "help",
];

/// Run configuration for a single invocation.
#[derive(Debug, Clone)]
pub struct Config {
  /// XML-RPC endpoint URL; must contain `xmlrpc`.
  pub server: String,
  /// Key of the Confluence space pages are published into.
  pub space: String,
  /// Title of the pre-existing page all published pages are nested under.
  pub parent: String,
  pub username: String,
  pub password: String,
  /// Local files to publish, processed in order.
  pub files: Vec<String>,
  /// Update pages even when the normalized content is unchanged.
  pub force: bool,
  /// Print per-file status and the final summary.
  pub verbose: bool,
  /// Perform all comparisons but suppress remote create/update calls.
  pub debug: bool,
  pub color: ColorOption,
  /// HTTP request timeout in seconds.
  pub timeout: u64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      server: "http://wiki.example.internal/wiki/rpc/xmlrpc".to_string(),
      space: "DOCS".to_string(),
      parent: "API Documentation".to_string(),
      username: String::new(),
      password: String::new(),
      files: Vec::new(),
      force: false,
      verbose: false,
      debug: false,
      color: ColorOption::Auto,
      timeout: 30,
    }
  }
}

/// A configuration failure, carrying the process exit code it maps to.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("Please specify a username and a password.")]
  MissingCredentials,
  #[error("Please specify a Confluence space to use.")]
  MissingSpace,
  #[error("Please specify a Confluence XMLRPC URL.")]
  InvalidServer,
  #[error("Please pass in some files to work on. Remember, names are significant!")]
  NoFiles,
  #[error("unknown option --{0}")]
  UnknownOption(String),
  #[error("option --{name} expects {expected}")]
  BadValue { name: String, expected: &'static str },
}

impl ConfigError {
  /// The process exit code this error maps to.
  pub fn exit_code(&self) -> i32 {
    match self {
      ConfigError::MissingCredentials => 1,
      ConfigError::MissingSpace => 5,
      ConfigError::InvalidServer | ConfigError::NoFiles => 3,
      ConfigError::UnknownOption(_) | ConfigError::BadValue { .. } => 2,
    }
  }
}

impl Config {
  /// Build a configuration from raw command-line tokens (excluding the
  /// program name), merging them over the defaults.
  pub fn from_args<S: AsRef<str>>(tokens: &[S]) -> Result<Self, ConfigError> {
    let args = RawArgs::parse(tokens);

    for name in args.names() {
      if !KNOWN_OPTIONS.contains(&name) {
        return Err(ConfigError::UnknownOption(name.to_string()));
      }
    }

    let mut config = Config::default();
    if let Some(value) = args.get("username") {
      config.username = string_value("username", value)?;
    }
    if let Some(value) = args.get("password") {
      config.password = string_value("password", value)?;
    }
    if let Some(value) = args.get("server") {
      config.server = string_value("server", value)?;
    }
    if let Some(value) = args.get("space") {
      config.space = string_value("space", value)?;
    }
    if let Some(value) = args.get("parent") {
      config.parent = string_value("parent", value)?;
    }
    if let Some(value) = args.get("files") {
      config.files = list_value("files", value)?;
    }
    if let Some(value) = args.get("force") {
      config.force = flag_value("force", value)?;
    }
    if let Some(value) = args.get("v") {
      config.verbose = flag_value("v", value)?;
    }
    if let Some(value) = args.get("debug") {
      config.debug = flag_value("debug", value)?;
    }
    if let Some(value) = args.get("color") {
      let raw = string_value("color", value)?;
      config.color = ColorOption::from_str(&raw).map_err(|_| ConfigError::BadValue {
        name: "color".to_string(),
        expected: "one of auto, always, never",
      })?;
    }
    if let Some(value) = args.get("timeout") {
      let raw = string_value("timeout", value)?;
      config.timeout = raw.parse().map_err(|_| ConfigError::BadValue {
        name: "timeout".to_string(),
        expected: "a whole number of seconds",
      })?;
    }

    Ok(config)
  }

  /// Check required fields, in the order the original tool checked them.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.username.is_empty() || self.password.is_empty() {
      return Err(ConfigError::MissingCredentials);
    }
    if self.space.is_empty() {
      return Err(ConfigError::MissingSpace);
    }
    if self.server.is_empty() || !self.server.contains("xmlrpc") {
      return Err(ConfigError::InvalidServer);
    }
    if self.files.is_empty() {
      return Err(ConfigError::NoFiles);
    }
    Ok(())
  }
}

/// Accept a scalar, or a single-element list (`--opt value` instead of
/// `--opt=value`).
fn string_value(name: &str, value: &ArgValue) -> Result<String, ConfigError> {
  match value {
    ArgValue::Scalar(s) => Ok(s.clone()),
    ArgValue::List(items) if items.len() == 1 => Ok(items[0].clone()),
    _ => Err(ConfigError::BadValue {
      name: name.to_string(),
      expected: "a single value",
    }),
  }
}

fn list_value(name: &str, value: &ArgValue) -> Result<Vec<String>, ConfigError> {
  match value {
    ArgValue::Scalar(s) => Ok(vec![s.clone()]),
    ArgValue::List(items) => Ok(items.clone()),
    ArgValue::Flag(_) => Err(ConfigError::BadValue {
      name: name.to_string(),
      expected: "one or more values",
    }),
  }
}

fn flag_value(name: &str, value: &ArgValue) -> Result<bool, ConfigError> {
  match value {
    ArgValue::Flag(b) => Ok(*b),
    _ => Err(ConfigError::BadValue {
      name: name.to_string(),
      expected: "no value",
    }),
  }
}

/// Usage text printed for `-h`/`--help`.
pub fn usage() -> String {
  "\
Usage: confluence-push --username=USERNAME --password=PASSWORD
                       [--server=http://example.com/rpc/xmlrpc]
                       [--space=KEY] [--parent=TITLE]
                       --files filename [filename2 [...]]
                       [--force] [--debug] [-v]
                       [--color=auto|always|never] [--timeout=SECONDS]

Publishes each file as a Confluence page titled after the file's base name,
nested under the parent page. Pages whose content is unchanged are skipped
unless --force is given. --debug performs every comparison but writes nothing
to the server.
"
  .to_string()
}
