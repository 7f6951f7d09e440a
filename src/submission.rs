//! One report submission: token, fetch, save.
//!
//! [`execute`] is the whole flow as a plain async function over an immutable
//! [`ReportRequest`]; it touches no terminal state. [`spawn_submission`] runs it on a
//! worker task and hands back a channel of [`SubmissionEvent`]s plus the task handle, so the
//! interactive layer can keep its status line moving and collect the result when the
//! worker finishes.

use crate::config::ResolvedConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{ReportArtifact, ReportRequest};
use crate::persist::write_report;
use crate::reporting::{acquire_token, build_client, fetch_report, report_url};
use chrono::Local;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

/// Progress notifications emitted by the worker, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionEvent {
    AcquiringToken,
    FetchingReport,
    WritingReport,
}

impl SubmissionEvent {
    /// Text for the status line.
    pub fn status_text(&self) -> &'static str {
        match self {
            Self::AcquiringToken => "Requesting OAuth token...",
            Self::FetchingReport => "Downloading report...",
            Self::WritingReport => "Saving report...",
        }
    }
}

/// Runs a submission end to end.
///
/// The sequence is fixed: acquire a token, build the report URL for the request's type,
/// fetch, then write the body under `request.save_path`. The first failure ends the
/// submission; nothing is retried. A token failure means no report request is issued, and
/// a report failure means no file is written.
///
/// Events are best-effort: a dropped receiver does not stop the flow.
pub async fn execute(
    client: &reqwest::Client,
    request: &ReportRequest,
    config: &ResolvedConfig,
    events: &mpsc::UnboundedSender<SubmissionEvent>,
) -> AppResult<ReportArtifact> {
    // Built before any network call so a bad base URL fails fast
    let url = report_url(request, &config.reporting_base_url)?;

    let _ = events.send(SubmissionEvent::AcquiringToken);
    let token = acquire_token(client, &request.identity, config).await?;

    let _ = events.send(SubmissionEvent::FetchingReport);
    let body = fetch_report(client, &url, &token).await?;

    let _ = events.send(SubmissionEvent::WritingReport);
    let captured_at = Local::now().naive_local();
    let artifact = write_report(&request.save_path, &config.file_prefix, captured_at, &body).await?;

    info!(
        report_type = request.report_type.display_name(),
        file_path = %artifact.path.display(),
        "Submission completed"
    );

    Ok(artifact)
}

/// Starts [`execute`] on a worker task.
///
/// The request and config are moved into the task; the caller keeps no shared state with
/// it. The event channel closes when the worker finishes, successfully or not.
pub fn spawn_submission(
    request: ReportRequest,
    config: ResolvedConfig,
) -> (
    JoinHandle<AppResult<ReportArtifact>>,
    mpsc::UnboundedReceiver<SubmissionEvent>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(async move {
        let client = build_client(&config)?;
        execute(&client, &request, &config, &tx).await
    });
    (handle, rx)
}

/// Awaits a worker handle, folding a panicked or cancelled task into [`AppError::Unexpected`].
pub async fn join_submission(
    handle: JoinHandle<AppResult<ReportArtifact>>,
) -> AppResult<ReportArtifact> {
    match handle.await {
        Ok(result) => result,
        Err(e) => Err(AppError::Unexpected(format!("worker task failed: {e}"))),
    }
}
