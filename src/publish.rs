//! Page publishing: the per-file create/update/skip decision.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::color::ColorScheme;
use crate::config::Config;
use crate::confluence::{ConfluenceRpc, NewPage, PageLookup, Session, UpdateOptions};
use crate::normalize;

/// Version comment attached to every update.
const VERSION_COMMENT: &str = "Automatic API Documentation";

/// Counts of what happened to the processed files, reported at the end.
///
/// `unchanged` is carried for the summary but no code path advances it; the
/// skip branch only prints.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Processed {
  pub unchanged: u64,
  pub updated: u64,
  pub created: u64,
}

impl Processed {
  /// Print the summary block, one counter per line, in fixed order.
  pub fn report(&self, colors: &ColorScheme) {
    for (name, count) in self.entries() {
      println!("{}  {}", name, colors.number(count));
    }
  }

  fn entries(&self) -> [(&'static str, u64); 3] {
    [
      ("unchanged", self.unchanged),
      ("updated", self.updated),
      ("created", self.created),
    ]
  }
}

/// Publishes the configured files against an established session.
pub struct Publisher<'a> {
  rpc: &'a dyn ConfluenceRpc,
  session: &'a Session,
  config: &'a Config,
  colors: &'a ColorScheme,
}

impl<'a> Publisher<'a> {
  pub fn new(rpc: &'a dyn ConfluenceRpc, session: &'a Session, config: &'a Config, colors: &'a ColorScheme) -> Self {
    Self {
      rpc,
      session,
      config,
      colors,
    }
  }

  /// Publish every configured file, in order.
  ///
  /// Per-file failures are reported and skipped; only an unresolvable parent
  /// page aborts the run, since nothing could be filed under it.
  pub async fn publish_all(&self) -> Result<Processed> {
    let session = self.session;
    let parent = match self
      .rpc
      .get_page(session.api, &session.token, &self.config.space, &self.config.parent)
      .await
      .context("Failed to resolve the parent page")?
    {
      PageLookup::Found(page) => page,
      PageLookup::Missing => bail!(
        "Parent page '{}' does not exist in space '{}'",
        self.config.parent,
        self.config.space
      ),
    };

    if self.config.verbose {
      println!("{}", self.colors.info("Updating Confluence"));
      if self.config.debug {
        println!("{}", self.colors.warning("DEBUG: no remote changes will be made"));
      }
    }

    let mut processed = Processed::default();
    for filename in &self.config.files {
      if let Err(err) = self.publish_file(filename, &parent.id, &mut processed).await {
        eprintln!(
          "{} {}",
          self.colors.error("✗"),
          self.colors.error(format!("Skipping {filename}: {err:#}"))
        );
      }
    }

    Ok(processed)
  }

  /// Ensure one file's page exists remotely with up-to-date content.
  async fn publish_file(&self, filename: &str, parent_id: &str, processed: &mut Processed) -> Result<()> {
    let session = self.session;
    let title = page_title(filename);

    let wiki = fs::read_to_string(filename).with_context(|| format!("Failed to read {filename}"))?;

    let content = if session.requires_conversion() {
      self
        .rpc
        .convert_wiki_to_storage(session.api, &session.token, &wiki)
        .await
        .context("Failed to convert wiki markup to storage format")?
    } else {
      wiki
    };

    let lookup = self
      .rpc
      .get_page(session.api, &session.token, &self.config.space, &title)
      .await
      .with_context(|| format!("Failed to look up page '{title}'"))?;

    match lookup {
      PageLookup::Found(oldpage) => {
        let mut page = oldpage.clone();
        page.content = content;
        page.title = title.clone();
        page.parent_id = parent_id.to_string();

        // The storage round-trip leaves cosmetic differences; scrub both
        // sides before deciding whether anything really changed.
        let oldcontent = normalize::normalize_remote(&oldpage.content);
        let newcontent = normalize::normalize_candidate(&page.content);

        if oldcontent != newcontent || self.config.force {
          processed.updated += 1;
          if !self.config.debug {
            let options = UpdateOptions {
              minor_edit: true,
              version_comment: VERSION_COMMENT.to_string(),
            };
            self
              .rpc
              .update_page(session.api, &session.token, &page, &options)
              .await
              .with_context(|| format!("Failed to update page '{title}'"))?;
          }
          if self.config.verbose {
            println!("{title} updated");
          }
        } else if self.config.verbose {
          println!("{title} did not change.");
        }
      }
      PageLookup::Missing => {
        let newpage = NewPage {
          space: self.config.space.clone(),
          title: title.clone(),
          content,
          parent_id: parent_id.to_string(),
        };
        if !self.config.debug
          && let Err(err) = self.rpc.store_page(session.api, &session.token, &newpage).await
        {
          eprintln!(
            "{} {}",
            self.colors.error("✗"),
            self.colors.error(format!("Couldn't store the page: {err:#}"))
          );
          return Ok(());
        }
        processed.created += 1;
        if self.config.verbose {
          println!("{title} created");
        }
      }
    }

    Ok(())
  }
}

/// Page title for a file: its base name, directory components stripped.
fn page_title(filename: &str) -> String {
  Path::new(filename)
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_else(|| filename.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_page_title_strips_directories() {
    assert_eq!(page_title("confluence/client.js"), "client.js");
    assert_eq!(page_title("client.js"), "client.js");
    assert_eq!(page_title("a/b/c/page.txt"), "page.txt");
  }

  #[test]
  fn test_summary_order_is_fixed() {
    let processed = Processed {
      unchanged: 0,
      updated: 2,
      created: 1,
    };
    let names: Vec<&str> = processed.entries().iter().map(|(name, _)| *name).collect();
    assert_eq!(names, vec!["unchanged", "updated", "created"]);
  }
}
