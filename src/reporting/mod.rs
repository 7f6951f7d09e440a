//! Talking to the identity and reporting endpoints.
//!
//! This module exchanges client credentials for a bearer token, builds the OData filter
//! for the requested date window and report type, and fetches the raw report body.
//! The main entry points are [`acquire_token`], [`report_url`] and [`fetch_report`].

mod fetch;
mod filter;
mod token;

// Re-export public API
pub use fetch::fetch_report;
pub use filter::{build_filter, report_url};
pub use token::{acquire_token, token_url, AccessToken};

use crate::config::ResolvedConfig;
use crate::errors::AppResult;

/// Builds the HTTP client shared by both calls of a submission.
pub fn build_client(config: &ResolvedConfig) -> AppResult<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()?;
    Ok(client)
}

/// Reads an error response body, describing the read failure instead when there is none.
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(body) => body,
        Err(e) => format!("<unreadable body: {e}>"),
    }
}
