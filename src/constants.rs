// Service endpoints
pub const LOGIN_BASE_URL: &str = "https://login.microsoftonline.com";
pub const REPORTING_BASE_URL: &str =
    "https://reports.office365.com/ecp/reportingwebservice/reporting.svc/";
pub const REPORTING_SCOPE: &str = "https://outlook.office365.com/.default";

// Reporting endpoint names, relative to the reporting base
pub const MESSAGE_TRACE_ENDPOINT: &str = "MessageTrace";
pub const MESSAGE_TRACE_DETAIL_ENDPOINT: &str = "MessageTraceDetail";

// Output
pub const DEFAULT_FILE_PREFIX: &str = "MessageTraceReport";
pub const DEFAULT_SAVE_DIR: &str = "ReportingWebServices-logs";
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
pub const REPORT_EXTENSION: &str = "xml";

// Input
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const APP_SECRET_ENV: &str = "MTRACE_APP_SECRET";

// Report type aliases
pub const MESSAGE_TRACE_ALIASES: &[&str] = &["mt", "trace", "message-trace"];
pub const MESSAGE_TRACE_DETAIL_ALIASES: &[&str] = &["mtd", "detail", "message-trace-detail"];

// Status line
pub const STATUS_PROCESSING: &str = "Processing... Please wait.";
