use crate::constants::*;
use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;

/// Which reporting endpoint a submission targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportType {
    #[default]
    MessageTrace,
    MessageTraceDetail,
}

impl ReportType {
    /// Returns a human-readable name for the report type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MessageTrace => "Message Trace",
            Self::MessageTraceDetail => "Message Trace Detail",
        }
    }

    /// Returns the endpoint name relative to the reporting service base.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::MessageTrace => MESSAGE_TRACE_ENDPOINT,
            Self::MessageTraceDetail => MESSAGE_TRACE_DETAIL_ENDPOINT,
        }
    }

    pub fn requires_detail_filters(&self) -> bool {
        matches!(self, Self::MessageTraceDetail)
    }
}

impl From<&str> for ReportType {
    fn from(value: &str) -> Self {
        // Trim whitespace and compare case-insensitively
        let lower = value.trim().to_lowercase();

        if MESSAGE_TRACE_DETAIL_ALIASES.contains(&lower.as_str()) {
            Self::MessageTraceDetail
        } else if MESSAGE_TRACE_ALIASES.contains(&lower.as_str()) {
            Self::MessageTrace
        } else {
            // Default silently to MessageTrace; callers can decide to log if needed.
            Self::MessageTrace
        }
    }
}

/// Client-credentials identity of the registered application.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub app_id: String,
    pub tenant_id: String,
    pub app_secret: String,
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("app_id", &self.app_id)
            .field("tenant_id", &self.tenant_id)
            .field("app_secret", &"<redacted>")
            .finish()
    }
}

/// Inclusive calendar-day window. The service sees `start` at 00:00:00Z and `end` at 23:59:59Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Exact-match constraints only sent in detail mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFilters {
    pub sender_address: String,
    pub recipient_address: String,
    pub message_trace_id: String,
}

/// A validated, immutable snapshot of the form taken at submission time.
///
/// `detail` is `Some` exactly when `report_type` is [`ReportType::MessageTraceDetail`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub identity: Identity,
    pub range: DateRange,
    pub report_type: ReportType,
    pub detail: Option<DetailFilters>,
    pub save_path: PathBuf,
}

/// The file written for a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    pub path: PathBuf,
    pub bytes_written: u64,
}
