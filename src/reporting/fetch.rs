use super::token::AccessToken;
use crate::errors::{AppError, AppResult};
use reqwest::StatusCode;
use tracing::{debug, info};
use url::Url;

/// Issues the single report GET and returns the body bytes unmodified.
///
/// Only `200 OK` counts as success. Any other status, including other 2xx codes,
/// becomes [`AppError::ApiError`] carrying the raw response text so the caller can show
/// exactly what the service said.
///
/// # Errors
///
/// - `NetworkError` if the request cannot be sent or the body cannot be read
/// - `ApiError` for any non-200 status
pub async fn fetch_report(
    client: &reqwest::Client,
    url: &Url,
    token: &AccessToken,
) -> AppResult<Vec<u8>> {
    info!(endpoint = url.path(), "Requesting report");

    let response = client
        .get(url.clone())
        .bearer_auth(token.secret())
        .send()
        .await
        .map_err(|e| AppError::NetworkError(format!("Report request failed: {e}")))?;

    let status = response.status();
    if status != StatusCode::OK {
        let body = super::error_body(response).await;
        return Err(AppError::ApiError {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::NetworkError(format!("Failed to read report body: {e}")))?;
    debug!(bytes = bytes.len(), "Report body received");

    Ok(bytes.to_vec())
}
