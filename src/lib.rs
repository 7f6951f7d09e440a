//! mtrace-cli library
//!
//! This crate provides the core functionality for the `mtrace-cli` binary.
//! Keep the crate root minimal; implementation and tests live in their modules.
//!
//! ## Overview
//!
//! - [`request`] - Raw form values and their validation into an immutable [`models::ReportRequest`]
//! - [`reporting`] - OAuth client-credentials exchange, OData filter construction, report fetch
//! - [`persist`] - Writing the raw report body to a timestamped file and revealing it
//! - [`submission`] - The whole flow on a worker task, reporting progress over a channel
//! - [`cli`] - Command-line interface feeding the submission flow
//! - [`config`] - Endpoint/output settings and TOML request files
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```no_run
//! use mtrace_cli::config::ResolvedConfig;
//! use mtrace_cli::request::ReportForm;
//! use mtrace_cli::submission::{join_submission, spawn_submission};
//!
//! # async fn example() -> mtrace_cli::errors::AppResult<()> {
//! let form = ReportForm {
//!     app_id: Some("11111111-2222-3333-4444-555555555555".into()),
//!     tenant_id: Some("contoso.onmicrosoft.com".into()),
//!     app_secret: Some("secret".into()),
//!     start: Some("2024-05-01".into()),
//!     end: Some("2024-05-02".into()),
//!     save_path: Some("reports".into()),
//!     ..Default::default()
//! };
//! let request = form.into_request()?;
//!
//! let (handle, mut events) = spawn_submission(request, ResolvedConfig::default());
//! while let Some(event) = events.recv().await {
//!     println!("{}", event.status_text());
//! }
//! let artifact = join_submission(handle).await?;
//! println!("Saved {}", artifact.path.display());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod persist;
pub mod reporting;
pub mod request;
pub mod submission;
pub mod ui;
pub mod utils;
