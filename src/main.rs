//! confluence-push - Publish local wiki markup files to Confluence
//!
//! This is the main entry point for the CLI application.

use std::process;

use confluence_push::color::ColorScheme;
use confluence_push::config::{self, Config};
use confluence_push::confluence::{Session, XmlRpcClient};
use confluence_push::publish::Publisher;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[tokio::main]
async fn main() {
  let argv: Vec<String> = std::env::args().skip(1).collect();

  if argv.iter().any(|arg| arg == "-h" || arg == "--help") {
    print!("{}", config::usage());
    return;
  }

  let config = match Config::from_args(&argv) {
    Ok(config) => config,
    Err(e) => {
      eprintln!("{e}");
      eprintln!("Try 'confluence-push --help'.");
      process::exit(e.exit_code());
    }
  };

  init_tracing(&config);

  // Create color scheme based on user preference
  let colors = ColorScheme::new(config.color);

  if let Err(e) = config.validate() {
    eprintln!("{}", colors.error(&e));
    process::exit(e.exit_code());
  }

  let rpc = match XmlRpcClient::new(&config.server, config.timeout) {
    Ok(client) => client,
    Err(e) => {
      eprintln!("{}", colors.error("Please specify a Confluence XMLRPC URL."));
      eprintln!("  {e:#}");
      process::exit(3);
    }
  };

  // Dry-run mode still logs in and fetches pages; only the writes are
  // suppressed further down.
  let session = match Session::establish(&rpc, &config.username, &config.password).await {
    Ok(session) => session,
    Err(e) => {
      eprintln!("{}", colors.error("Could not log into Confluence!"));
      eprintln!("  {e:#}");
      process::exit(4);
    }
  };

  let publisher = Publisher::new(&rpc, &session, &config, &colors);
  let processed = match publisher.publish_all().await {
    Ok(processed) => processed,
    Err(e) => {
      eprintln!("{}", colors.error(format!("{e:#}")));
      process::exit(1);
    }
  };

  if config.verbose {
    processed.report(&colors);
  }
}

fn init_tracing(config: &Config) {
  let level = if config.verbose {
    LevelFilter::INFO
  } else {
    LevelFilter::WARN
  };

  let env_filter = EnvFilter::builder()
    .with_default_directive(level.into())
    .from_env_lossy();

  let _ = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .try_init();
}
