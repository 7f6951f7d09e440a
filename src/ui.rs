use crate::constants::STATUS_PROCESSING;
use crate::errors::{AppError, AppResult};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Creates the status line shown while a submission runs.
///
/// The spinner ticks on its own so the terminal stays live while the worker waits on the
/// network. Callers update it with `set_message` and must clear it with `finish_and_clear`
/// whatever the outcome.
///
/// # Example
///
/// ```no_run
/// use mtrace_cli::ui;
///
/// # fn main() -> Result<(), mtrace_cli::errors::AppError> {
/// let spinner = ui::create_status_spinner()?;
/// spinner.set_message("Requesting OAuth token...");
/// spinner.finish_and_clear();
/// # Ok(())
/// # }
/// ```
pub fn create_status_spinner() -> AppResult<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.red} [{elapsed_precise}] {msg}")
            .map_err(|e| AppError::IoError(format!("Failed to create status template: {e}")))?,
    );
    spinner.set_message(STATUS_PROCESSING);
    spinner.enable_steady_tick(Duration::from_millis(120));
    Ok(spinner)
}
