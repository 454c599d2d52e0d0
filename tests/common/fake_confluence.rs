//! Fake Confluence RPC client for testing
//!
//! This module provides a stub implementation of the remote API that works
//! against an in-memory page store without making any network requests. It
//! also journals every call so tests can assert which write operations were
//! (or were not) issued.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use confluence_push::confluence::xmlrpc::Value;
use confluence_push::confluence::{ApiVersion, ConfluenceRpc, NewPage, Page, PageLookup, UpdateOptions};

/// One remote operation, as recorded in the call journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
  Login(ApiVersion),
  GetPage(String),
  Convert,
  StorePage(String),
  UpdatePage(String),
}

/// A fake remote API backed by an in-memory page store.
pub struct FakeConfluenceRpc {
  pages: Mutex<HashMap<(String, String), Page>>,
  calls: Mutex<Vec<Call>>,
  next_id: Mutex<u64>,
  v2_token: Option<String>,
  v1_token: Option<String>,
  fail_store: bool,
}

impl FakeConfluenceRpc {
  /// Create a fake where both API variants accept any credentials.
  pub fn new() -> Self {
    Self::with_tokens(Some("v2-token"), Some("v1-token"))
  }

  /// Create a fake with explicit login outcomes per variant; `None` makes
  /// that variant's login fail.
  pub fn with_tokens(v2: Option<&str>, v1: Option<&str>) -> Self {
    Self {
      pages: Mutex::new(HashMap::new()),
      calls: Mutex::new(Vec::new()),
      next_id: Mutex::new(100),
      v2_token: v2.map(str::to_string),
      v1_token: v1.map(str::to_string),
      fail_store: false,
    }
  }

  /// Create a fake where only the v1 API exists.
  pub fn v1_only() -> Self {
    Self::with_tokens(None, Some("v1-token"))
  }

  /// Make every `storePage` call fail.
  pub fn set_fail_store(&mut self, fail: bool) {
    self.fail_store = fail;
  }

  /// Seed a page into the store; returns its assigned id.
  pub fn add_page(&self, space: &str, title: &str, content: &str) -> String {
    let id = self.assign_id();
    let mut extra = BTreeMap::new();
    extra.insert("version".to_string(), Value::Int(1));
    let page = Page {
      id: id.clone(),
      space: space.to_string(),
      title: title.to_string(),
      content: content.to_string(),
      parent_id: String::new(),
      extra,
    };
    self.pages.lock().unwrap().insert(key(space, title), page);
    id
  }

  /// Fetch a page from the store without touching the journal.
  pub fn page(&self, space: &str, title: &str) -> Option<Page> {
    self.pages.lock().unwrap().get(&key(space, title)).cloned()
  }

  /// Snapshot of the call journal.
  pub fn calls(&self) -> Vec<Call> {
    self.calls.lock().unwrap().clone()
  }

  /// Whether any write operation was journaled.
  pub fn wrote_anything(&self) -> bool {
    self
      .calls()
      .iter()
      .any(|call| matches!(call, Call::StorePage(_) | Call::UpdatePage(_)))
  }

  fn record(&self, call: Call) {
    self.calls.lock().unwrap().push(call);
  }

  fn assign_id(&self) -> String {
    let mut next_id = self.next_id.lock().unwrap();
    let id = *next_id;
    *next_id += 1;
    id.to_string()
  }
}

impl Default for FakeConfluenceRpc {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl ConfluenceRpc for FakeConfluenceRpc {
  async fn login(&self, api: ApiVersion, _username: &str, _password: &str) -> Result<String> {
    self.record(Call::Login(api));
    let token = match api {
      ApiVersion::V2 => &self.v2_token,
      ApiVersion::V1 => &self.v1_token,
    };
    token
      .clone()
      .ok_or_else(|| anyhow!("No such handler: {}.login", api.method_prefix()))
  }

  async fn get_page(&self, _api: ApiVersion, _token: &str, space: &str, title: &str) -> Result<PageLookup> {
    self.record(Call::GetPage(title.to_string()));
    Ok(match self.pages.lock().unwrap().get(&key(space, title)) {
      Some(page) => PageLookup::Found(page.clone()),
      None => PageLookup::Missing,
    })
  }

  async fn store_page(&self, _api: ApiVersion, _token: &str, page: &NewPage) -> Result<Page> {
    self.record(Call::StorePage(page.title.clone()));
    if self.fail_store {
      return Err(anyhow!("server fault 0: You're not allowed to add that page"));
    }
    let stored = Page {
      id: self.assign_id(),
      space: page.space.clone(),
      title: page.title.clone(),
      content: page.content.clone(),
      parent_id: page.parent_id.clone(),
      extra: BTreeMap::new(),
    };
    self
      .pages
      .lock()
      .unwrap()
      .insert(key(&page.space, &page.title), stored.clone());
    Ok(stored)
  }

  async fn update_page(&self, _api: ApiVersion, _token: &str, page: &Page, _options: &UpdateOptions) -> Result<Page> {
    self.record(Call::UpdatePage(page.title.clone()));
    self
      .pages
      .lock()
      .unwrap()
      .insert(key(&page.space, &page.title), page.clone());
    Ok(page.clone())
  }

  async fn convert_wiki_to_storage(&self, _api: ApiVersion, _token: &str, markup: &str) -> Result<String> {
    self.record(Call::Convert);
    // The fake converter is the identity; artifact handling is covered by
    // the normalization tests.
    Ok(markup.to_string())
  }
}

fn key(space: &str, title: &str) -> (String, String) {
  (space.to_string(), title.to_string())
}
