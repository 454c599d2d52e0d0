//! Trait definitions for interacting with the Confluence remote API.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{ApiVersion, NewPage, Page, PageLookup, UpdateOptions};

/// Trait for Confluence remote API operations (enables testing with fake
/// implementations).
///
/// Every operation takes the API variant explicitly; which variant is in use
/// is decided once at login and carried by the session.
#[async_trait]
pub trait ConfluenceRpc: Send + Sync {
  /// Authenticate and obtain a session token.
  async fn login(&self, api: ApiVersion, username: &str, password: &str) -> Result<String>;

  /// Look up a page by space key and title.
  ///
  /// # Returns
  /// `PageLookup::Found` with the full record, or `PageLookup::Missing` when
  /// the server reports no such page. Transport failures are errors.
  async fn get_page(&self, api: ApiVersion, token: &str, space: &str, title: &str) -> Result<PageLookup>;

  /// Create a new page from a minimal record.
  async fn store_page(&self, api: ApiVersion, token: &str, page: &NewPage) -> Result<Page>;

  /// Write back a modified copy of an existing page.
  async fn update_page(&self, api: ApiVersion, token: &str, page: &Page, options: &UpdateOptions) -> Result<Page>;

  /// Convert wiki markup to the server's storage format (v2 only).
  async fn convert_wiki_to_storage(&self, api: ApiVersion, token: &str, markup: &str) -> Result<String>;
}
