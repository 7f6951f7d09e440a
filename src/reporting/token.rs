use crate::config::ResolvedConfig;
use crate::errors::{AppError, AppResult};
use crate::models::Identity;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info};
use url::Url;

/// Bearer token returned by the identity endpoint.
///
/// Never cached: every submission acquires a fresh one.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    token_type: Option<String>,
    expires_in: Option<u64>,
}

/// Builds `{login_base}/{tenant}/oauth2/v2.0/token`.
pub fn token_url(login_base_url: &str, tenant_id: &str) -> AppResult<Url> {
    let raw = format!(
        "{}/{}/oauth2/v2.0/token",
        login_base_url.trim_end_matches('/'),
        tenant_id
    );
    Ok(Url::parse(&raw)?)
}

/// Exchanges the application's client credentials for a bearer token.
///
/// Posts a form-encoded `client_credentials` grant scoped to the reporting API
/// (`config.scope`) and extracts `access_token` from the JSON reply.
///
/// # Errors
///
/// - `NetworkError` if the request cannot be sent or the connection drops
/// - `TokenError` if the endpoint answers with a non-success status (the body is included),
///   the body is not JSON, or `access_token` is absent or empty
pub async fn acquire_token(
    client: &reqwest::Client,
    identity: &Identity,
    config: &ResolvedConfig,
) -> AppResult<AccessToken> {
    let url = token_url(&config.login_base_url, &identity.tenant_id)?;
    info!(tenant_id = %identity.tenant_id, "Requesting OAuth token");

    let response = client
        .post(url)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", identity.app_id.as_str()),
            ("client_secret", identity.app_secret.as_str()),
            ("scope", config.scope.as_str()),
        ])
        .send()
        .await
        .map_err(|e| AppError::NetworkError(format!("Token request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = super::error_body(response).await;
        return Err(AppError::TokenError(format!(
            "HTTP {}: {body}",
            status.as_u16()
        )));
    }

    let payload: TokenResponse = response
        .json()
        .await
        .map_err(|e| AppError::TokenError(format!("Unreadable token response: {e}")))?;

    debug!(
        token_type = payload.token_type.as_deref().unwrap_or("unknown"),
        expires_in = payload.expires_in.unwrap_or_default(),
        "Token response received"
    );

    match payload.access_token {
        Some(token) if !token.is_empty() => Ok(AccessToken(token)),
        _ => Err(AppError::TokenError(
            "response did not contain an access_token".to_string(),
        )),
    }
}
