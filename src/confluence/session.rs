//! Login and API-variant detection.

use anyhow::{Context, Result, bail};

use super::api::ConfluenceRpc;
use super::models::ApiVersion;

/// An authenticated session against one API variant.
///
/// Created once at startup and used for every subsequent call. Dry-run mode
/// still establishes a session; it only suppresses the write operations.
#[derive(Debug, Clone)]
pub struct Session {
  pub api: ApiVersion,
  pub token: String,
}

impl Session {
  /// Log in, preferring the v2 API and falling back to v1.
  ///
  /// Any v2 failure triggers the fallback, whether the server rejected the
  /// version, the credentials, or the connection itself; a server that is
  /// down simply fails the v1 attempt as well.
  pub async fn establish(rpc: &dyn ConfluenceRpc, username: &str, password: &str) -> Result<Session> {
    let (api, token) = match rpc.login(ApiVersion::V2, username, password).await {
      Ok(token) => (ApiVersion::V2, token),
      Err(err) => {
        tracing::debug!("v2 login failed, falling back to v1: {err:#}");
        let token = rpc
          .login(ApiVersion::V1, username, password)
          .await
          .context("both v2 and v1 logins failed")?;
        (ApiVersion::V1, token)
      }
    };

    if token.is_empty() {
      bail!("login succeeded but returned an empty token");
    }

    tracing::info!(api = api.method_prefix(), "logged in");

    Ok(Session { api, token })
  }

  /// Whether wiki markup must be converted to storage format before upload.
  /// The v2 API works on storage format; v1 accepts wiki markup as-is.
  pub fn requires_conversion(&self) -> bool {
    matches!(self.api, ApiVersion::V2)
  }
}
