//! HTTP client implementation for talking to the Confluence XML-RPC API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use url::Url;

use super::api::ConfluenceRpc;
use super::models::{ApiVersion, NewPage, Page, PageLookup, UpdateOptions};
use super::xmlrpc::{self, Response, Value};

/// Confluence XML-RPC client.
///
/// Every remote operation is a single `text/xml` POST to the one endpoint;
/// the method name selects the API variant and operation.
#[derive(Clone)]
pub struct XmlRpcClient {
  endpoint: String,
  client: reqwest::Client,
}

impl XmlRpcClient {
  /// Create a new client for an XML-RPC endpoint.
  ///
  /// # Arguments
  /// * `endpoint` - Full endpoint URL (e.g., http://wiki.example.com/rpc/xmlrpc)
  /// * `timeout_secs` - Request timeout in seconds
  ///
  /// # Errors
  /// Returns an error if the endpoint is not a parseable URL or if the
  /// underlying `reqwest::Client` cannot be built.
  pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self> {
    let endpoint = endpoint.into();

    Url::parse(&endpoint).with_context(|| format!("Invalid XML-RPC endpoint URL: {endpoint}"))?;

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(timeout_secs))
      .user_agent(format!(
        "confluence-push/{} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("TARGET")
      ))
      .build()
      .context("Failed to create HTTP client")?;

    Ok(Self { endpoint, client })
  }

  /// Perform one method call and decode the response.
  ///
  /// Transport and HTTP-level failures are errors; a well-formed fault comes
  /// back as `Response::Fault` so callers can decide what a fault means for
  /// their operation.
  async fn call(&self, method: &str, params: &[Value]) -> Result<Response> {
    let body = xmlrpc::encode_request(method, params);

    tracing::debug!(%method, "calling remote API");

    let response = self
      .client
      .post(&self.endpoint)
      .header("Content-Type", "text/xml")
      .body(body)
      .send()
      .await
      .with_context(|| format!("Failed to send {method} request"))?;

    if !response.status().is_success() {
      let status = response.status();
      let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| String::from("(no error details)"));
      return Err(anyhow!("Confluence server returned error {status}: {error_text}"));
    }

    let text = response
      .text()
      .await
      .with_context(|| format!("Failed to read {method} response body"))?;

    xmlrpc::decode_response(&text).with_context(|| format!("Failed to decode {method} response"))
  }

  /// Unwrap a response, turning a fault into an error.
  fn expect_success(method: &str, response: Response) -> Result<Value> {
    match response {
      Response::Success(value) => Ok(value),
      Response::Fault(fault) => Err(anyhow!(fault).context(format!("{method} failed"))),
    }
  }
}

#[async_trait]
impl ConfluenceRpc for XmlRpcClient {
  async fn login(&self, api: ApiVersion, username: &str, password: &str) -> Result<String> {
    let method = format!("{}.login", api.method_prefix());
    let response = self
      .call(&method, &[Value::string(username), Value::string(password)])
      .await?;
    let value = Self::expect_success(&method, response)?;
    value
      .as_str()
      .map(str::to_string)
      .ok_or_else(|| anyhow!("login returned a non-string token: {value:?}"))
  }

  async fn get_page(&self, api: ApiVersion, token: &str, space: &str, title: &str) -> Result<PageLookup> {
    let method = format!("{}.getPage", api.method_prefix());
    let response = self
      .call(&method, &[Value::string(token), Value::string(space), Value::string(title)])
      .await?;
    match response {
      Response::Success(value) => {
        let page = Page::from_value(value).context("Failed to decode page record")?;
        Ok(PageLookup::Found(page))
      }
      Response::Fault(fault) => {
        // The API reports a missing page as a fault; it does not distinguish
        // "does not exist" from "not allowed to view".
        tracing::debug!(space, title, %fault, "page lookup returned a fault");
        Ok(PageLookup::Missing)
      }
    }
  }

  async fn store_page(&self, api: ApiVersion, token: &str, page: &NewPage) -> Result<Page> {
    let method = format!("{}.storePage", api.method_prefix());
    let response = self.call(&method, &[Value::string(token), page.to_value()]).await?;
    let value = Self::expect_success(&method, response)?;
    Page::from_value(value).context("Failed to decode stored page record")
  }

  async fn update_page(&self, api: ApiVersion, token: &str, page: &Page, options: &UpdateOptions) -> Result<Page> {
    let method = format!("{}.updatePage", api.method_prefix());
    let response = self
      .call(&method, &[Value::string(token), page.to_value(), options.to_value()])
      .await?;
    let value = Self::expect_success(&method, response)?;
    Page::from_value(value).context("Failed to decode updated page record")
  }

  async fn convert_wiki_to_storage(&self, api: ApiVersion, token: &str, markup: &str) -> Result<String> {
    let method = format!("{}.convertWikiToStorageFormat", api.method_prefix());
    let response = self.call(&method, &[Value::string(token), Value::string(markup)]).await?;
    let value = Self::expect_success(&method, response)?;
    value
      .as_str()
      .map(str::to_string)
      .ok_or_else(|| anyhow!("conversion returned a non-string value: {value:?}"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_client_new_accepts_endpoint_url() {
    let client = XmlRpcClient::new("http://wiki.example.com/rpc/xmlrpc", 30);
    assert!(client.is_ok());
    assert_eq!(client.unwrap().endpoint, "http://wiki.example.com/rpc/xmlrpc");
  }

  #[test]
  fn test_client_new_rejects_unparseable_url() {
    let client = XmlRpcClient::new("not a url", 30);
    assert!(client.is_err());
  }

  #[test]
  fn test_expect_success_maps_fault_to_error() {
    let fault = xmlrpc::Fault {
      code: 0,
      message: "no such page".to_string(),
    };
    let err = XmlRpcClient::expect_success("confluence2.storePage", Response::Fault(fault)).unwrap_err();
    assert!(format!("{err:#}").contains("no such page"));
    assert!(format!("{err:#}").contains("storePage failed"));
  }
}
