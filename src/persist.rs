use crate::constants::{REPORT_EXTENSION, TIMESTAMP_FORMAT};
use crate::errors::{AppError, AppResult};
use crate::models::ReportArtifact;
use chrono::NaiveDateTime;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use tokio::fs;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

/// Upper bound on `_N` suffixes tried when timestamped names collide.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Returns `{prefix}_{yyyyMMdd_HHmmss}.xml`, or `{prefix}_{yyyyMMdd_HHmmss}_{n}.xml`
/// when `collision` is non-zero.
pub fn report_filename(prefix: &str, captured_at: &NaiveDateTime, collision: u32) -> String {
    let stamp = captured_at.format(TIMESTAMP_FORMAT);
    if collision == 0 {
        format!("{prefix}_{stamp}.{REPORT_EXTENSION}")
    } else {
        format!("{prefix}_{stamp}_{collision}.{REPORT_EXTENSION}")
    }
}

/// Writes the raw report body into `save_dir`.
///
/// # Behavior
///
/// - **Directory creation**: `save_dir` and any missing parents are created first.
/// - **No overwrite**: the file is opened with `create_new`. If a report captured in the
///   same second already exists, `_1`, `_2`, ... is appended to the timestamp until a free
///   name is found, so consecutive submissions always produce distinct files.
/// - **Verbatim**: `body` is written as-is; nothing is parsed or re-encoded.
///
/// # Errors
///
/// Returns `IoError` if the directory cannot be created, no free name is found, or the
/// write or flush fails. A file left half-written by a failed write or flush is removed
/// (best-effort).
pub async fn write_report(
    save_dir: &Path,
    prefix: &str,
    captured_at: NaiveDateTime,
    body: &[u8],
) -> AppResult<ReportArtifact> {
    fs::create_dir_all(save_dir).await.map_err(|e| {
        AppError::IoError(format!(
            "Failed to create directory {}: {e}",
            save_dir.display()
        ))
    })?;

    let (path, file) = create_unique(save_dir, prefix, &captured_at).await?;
    save_body(&path, file, body).await?;

    info!(
        file_path = %path.display(),
        bytes = body.len(),
        "Report saved"
    );

    Ok(ReportArtifact {
        path,
        bytes_written: body.len() as u64,
    })
}

/// Writes and flushes `body` through `writer`, removing `path` if either step fails.
async fn save_body<W>(path: &Path, mut writer: W, body: &[u8]) -> AppResult<()>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        writer.write_all(body).await?;
        writer.flush().await
    }
    .await;
    drop(writer);

    if let Err(e) = written {
        if let Err(remove_err) = fs::remove_file(path).await {
            warn!(
                file_path = %path.display(),
                error = %remove_err,
                "Failed to remove partially written report"
            );
        }
        return Err(AppError::IoError(format!(
            "Failed to write report {}: {e}",
            path.display()
        )));
    }
    Ok(())
}

async fn create_unique(
    save_dir: &Path,
    prefix: &str,
    captured_at: &NaiveDateTime,
) -> AppResult<(PathBuf, fs::File)> {
    for collision in 0..MAX_NAME_ATTEMPTS {
        let path = save_dir.join(report_filename(prefix, captured_at, collision));
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(file_path = %path.display(), "Report name taken, trying next suffix");
                continue;
            }
            Err(e) => {
                return Err(AppError::IoError(format!(
                    "Failed to create report file {}: {e}",
                    path.display()
                )))
            }
        }
    }

    Err(AppError::IoError(format!(
        "No free report name in {} after {MAX_NAME_ATTEMPTS} attempts",
        save_dir.display()
    )))
}

/// Opens the OS file browser on the folder containing `path`.
///
/// On Windows the file itself is selected (`explorer /select,`), on macOS it is revealed
/// in Finder (`open -R`), elsewhere the containing folder is opened with `xdg-open`.
/// The browser is spawned and not waited for.
pub fn reveal_in_file_browser(path: &Path) -> AppResult<()> {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut command = reveal_command(&absolute);
    command
        .spawn()
        .map_err(|e| AppError::IoError(format!("Failed to open file browser: {e}")))?;
    Ok(())
}

/// `explorer` only honours `/select,` when the switch itself is unquoted, so the path is
/// quoted on its own and passed through untouched.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
fn select_argument(path: &Path) -> String {
    format!("/select,\"{}\"", path.display())
}

#[cfg(target_os = "windows")]
fn reveal_command(path: &Path) -> Command {
    use std::os::windows::process::CommandExt;

    let mut command = Command::new("explorer");
    command.raw_arg(select_argument(path));
    command
}

#[cfg(target_os = "macos")]
fn reveal_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg("-R").arg(path);
    command
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn reveal_command(path: &Path) -> Command {
    let dir = path.parent().unwrap_or(path);
    let mut command = Command::new("xdg-open");
    command.arg(dir);
    command
}
