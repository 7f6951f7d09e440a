use crate::constants::{
    APP_SECRET_ENV, DEFAULT_FILE_PREFIX, DEFAULT_SAVE_DIR, LOGIN_BASE_URL, REPORTING_BASE_URL,
    REPORTING_SCOPE,
};
use crate::errors::{AppError, AppResult};
use crate::models::ReportType;
use crate::request::ReportForm;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Resolved configuration with all values filled in (no Options).
///
/// This struct carries the service endpoints and output defaults and can be deserialized
/// by the TOML loader. All fields have concrete values, making it safe to access directly
/// without unwrapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolvedConfig {
    // Endpoints
    /// Identity authority; the tenant and `/oauth2/v2.0/token` are appended
    pub login_base_url: String,
    /// Reporting service root; the report endpoint name is joined onto it
    pub reporting_base_url: String,
    /// OAuth scope requested in the client-credentials grant
    pub scope: String,
    /// Per-request timeout in seconds for both HTTP calls
    pub request_timeout_secs: u64,

    // Output
    /// Filename prefix placed before the capture timestamp
    pub file_prefix: String,
    /// Whether to open the containing folder after a successful save
    pub reveal: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            login_base_url: LOGIN_BASE_URL.to_string(),
            reporting_base_url: REPORTING_BASE_URL.to_string(),
            scope: REPORTING_SCOPE.to_string(),
            request_timeout_secs: 120,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            reveal: true,
        }
    }
}

impl ResolvedConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Rejects values that would make every submission fail.
    pub fn validate(&self) -> AppResult<()> {
        if self.request_timeout_secs == 0 {
            return Err(AppError::InvalidInput(
                "Request timeout must be greater than 0".into(),
            ));
        }
        if self.file_prefix.trim().is_empty() {
            return Err(AppError::InvalidInput("File prefix must not be empty".into()));
        }
        Ok(())
    }
}

/// A report request described in a TOML file.
///
/// Deserializes the form values and optional endpoint/output overrides. The parser rejects
/// unknown keys to catch typos. `app_secret` may be omitted, in which case
/// `MTRACE_APP_SECRET` is read from the environment.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolvedConfigFile {
    pub app_id: String,
    pub tenant_id: String,
    #[serde(default)]
    pub app_secret: Option<String>,
    /// Start date in `YYYY-MM-DD` format
    pub start: String,
    /// End date in `YYYY-MM-DD` format
    pub end: String,
    /// Report type: `"trace"`, `"mt"`, `"message-trace"`, `"detail"`, `"mtd"` or `"message-trace-detail"`
    #[serde(rename = "type", default = "default_report_type")]
    pub report_type: String,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub trace_id: Option<String>,
    /// Folder the report is written into (created when absent)
    #[serde(default = "default_save_path")]
    pub save_path: String,
    /// Flattened resolved configuration with endpoint and output defaults
    #[serde(flatten)]
    pub resolved: ResolvedConfig,
}

impl ResolvedConfigFile {
    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the file cannot be read, and `InvalidInput` if the TOML is
    /// malformed, required fields are missing, unknown keys are present, or the resolved
    /// settings fail [`ResolvedConfig::validate`].
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::IoError(format!("Failed to read config {}: {e}", path.display()))
        })?;
        let config: ResolvedConfigFile = toml::from_str(&contents)
            .map_err(|e| AppError::InvalidInput(format!("Failed to parse config: {e}")))?;

        config.resolved.validate()?;

        Ok(config)
    }

    /// Converts the file contents into the same form the command-line flags produce.
    pub fn to_form(&self) -> ReportForm {
        ReportForm {
            app_id: Some(self.app_id.clone()),
            tenant_id: Some(self.tenant_id.clone()),
            app_secret: self
                .app_secret
                .clone()
                .or_else(|| std::env::var(APP_SECRET_ENV).ok()),
            start: Some(self.start.clone()),
            end: Some(self.end.clone()),
            report_type: ReportType::from(self.report_type.as_str()),
            sender_address: self.sender.clone(),
            recipient_address: self.recipient.clone(),
            message_trace_id: self.trace_id.clone(),
            save_path: Some(self.save_path.clone()),
        }
    }
}

fn default_report_type() -> String {
    "trace".to_string()
}

fn default_save_path() -> String {
    DEFAULT_SAVE_DIR.to_string()
}
