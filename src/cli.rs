use crate::config::{ResolvedConfig, ResolvedConfigFile};
use crate::constants::{APP_SECRET_ENV, DEFAULT_SAVE_DIR};
use crate::errors::{AppError, AppResult};
use crate::models::{ReportArtifact, ReportType};
use crate::persist::reveal_in_file_browser;
use crate::request::{date_window_warnings, ReportForm};
use crate::submission::{join_submission, spawn_submission};
use crate::ui;
use crate::utils::{format_duration, format_size};
use chrono::Local;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

/// Builds the command-line interface.
///
/// Two subcommands feed the same submission flow:
/// - `fetch`: every form value given as a flag
/// - `toml`: form values and endpoint/output overrides read from a TOML file
pub fn build_command() -> Command<'static> {
    Command::new("mtrace-cli")
        .version(APP_VERSION)
        .about(APP_ABOUT)
        .subcommand(
            Command::new("fetch")
                .about("Fetch a message trace report and save it as XML")
                .after_help("The secret can also be supplied through MTRACE_APP_SECRET.\nExample:\n  mtrace-cli fetch -a <app-id> -T contoso.onmicrosoft.com -s 2024-05-01 -e 2024-05-02 -o reports")
                .arg(
                    Arg::new("app_id")
                        .short('a')
                        .long("app-id")
                        .help("Application (client) ID of the app registration")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("tenant_id")
                        .short('T')
                        .long("tenant-id")
                        .help("Directory (tenant) ID or verified domain")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("app_secret")
                        .short('k')
                        .long("app-secret")
                        .help("Client secret (prefer MTRACE_APP_SECRET)")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("start")
                        .short('s')
                        .long("start")
                        .help("First day of the window (YYYY-MM-DD)")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("end")
                        .short('e')
                        .long("end")
                        .help("Last day of the window (YYYY-MM-DD)")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("type")
                        .short('t')
                        .long("type")
                        .help("Report type: 'trace' (mt) or 'detail' (mtd)")
                        .default_value("trace")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("sender")
                        .long("sender")
                        .help("Sender address (detail only)")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("recipient")
                        .long("recipient")
                        .help("Recipient address (detail only)")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("trace_id")
                        .long("trace-id")
                        .help("Message trace ID (detail only)")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("out")
                        .short('o')
                        .long("out")
                        .help("Folder to save the report into (created if missing)")
                        .default_value(DEFAULT_SAVE_DIR)
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("timeout")
                        .long("timeout")
                        .help("Per-request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("no_reveal")
                        .long("no-reveal")
                        .help("Do not open the folder after saving")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("toml")
                .about("Fetch a report described by a TOML file")
                .arg(
                    Arg::new("config")
                        .help("Path to the TOML request file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

/// Parses command-line arguments and runs one submission.
///
/// # Returns
///
/// Returns `Ok(())` once the report is saved (and revealed, unless disabled). Returns an
/// error if a required field is missing, either HTTP call fails, or the file cannot be
/// written.
pub async fn cli() -> AppResult<()> {
    let cmd = build_command();
    let mut cmd_for_help = cmd.clone();
    let matches = cmd.get_matches();

    match matches.subcommand() {
        Some(("fetch", sub)) => {
            let form = form_from_matches(sub);
            let mut config = ResolvedConfig::default();
            if let Some(&timeout) = sub.get_one::<u64>("timeout") {
                config.request_timeout_secs = timeout;
            }
            if sub.get_flag("no_reveal") {
                config.reveal = false;
            }
            config.validate()?;

            run_workflow(form, &config).await?;
        }
        Some(("toml", sub)) => {
            let config_path = sub
                .get_one::<PathBuf>("config")
                .ok_or_else(|| AppError::InvalidInput("config path is required".into()))?;

            let file_config = ResolvedConfigFile::from_toml_file(config_path)?;
            run_workflow(file_config.to_form(), &file_config.resolved).await?;
        }
        _ => {
            cmd_for_help
                .print_help()
                .map_err(|e| AppError::IoError(format!("Failed to print help: {e}")))?;
        }
    }

    Ok(())
}

/// Reads the `fetch` flags into a form. The secret falls back to `MTRACE_APP_SECRET`.
pub fn form_from_matches(sub: &ArgMatches) -> ReportForm {
    let text = |id: &str| sub.get_one::<String>(id).cloned();
    ReportForm {
        app_id: text("app_id"),
        tenant_id: text("tenant_id"),
        app_secret: text("app_secret").or_else(|| std::env::var(APP_SECRET_ENV).ok()),
        start: text("start"),
        end: text("end"),
        report_type: sub
            .get_one::<String>("type")
            .map(|t| ReportType::from(t.as_str()))
            .unwrap_or_default(),
        sender_address: text("sender"),
        recipient_address: text("recipient"),
        message_trace_id: text("trace_id"),
        save_path: text("out"),
    }
}

/// Validates the form, runs the worker, and drives the status line until it finishes.
///
/// Validation happens here, before the worker starts, so a missing field never reaches the
/// network. The status line is cleared on every path out of the worker.
pub async fn run_workflow(form: ReportForm, config: &ResolvedConfig) -> AppResult<ReportArtifact> {
    let request = form.into_request()?;

    for warning in date_window_warnings(&request.range, Local::now().date_naive()) {
        warn!(warning = %warning, "Date range may be rejected by the service");
    }

    info!(
        report_type = request.report_type.display_name(),
        start = %request.range.start,
        end = %request.range.end,
        save_path = %request.save_path.display(),
        "Starting submission"
    );

    let started = Instant::now();
    let spinner = ui::create_status_spinner()?;
    let (handle, mut events) = spawn_submission(request, config.clone());

    while let Some(event) = events.recv().await {
        spinner.set_message(event.status_text());
    }
    let outcome = join_submission(handle).await;
    spinner.finish_and_clear();

    let artifact = outcome?;
    info!(
        elapsed = %format_duration(started.elapsed()),
        size = %format_size(artifact.bytes_written),
        "Processing complete"
    );
    println!("Report saved to {}", artifact.path.display());

    if config.reveal {
        if let Err(e) = reveal_in_file_browser(&artifact.path) {
            warn!(error = %e, "Could not open the report folder");
        }
    }

    Ok(artifact)
}
