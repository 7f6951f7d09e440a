use crate::constants::DATE_FORMAT;
use crate::errors::AppResult;
use crate::models::{DateRange, ReportRequest};
use url::Url;

/// Builds the OData `$filter` expression for a request.
///
/// The date window always spans whole days: `start` at `00:00:00Z`, `end` at `23:59:59Z`.
/// In detail mode the trace id, recipient and sender equality clauses come first.
/// User values are inserted verbatim; embedded quotes are not escaped.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use mtrace_cli::models::{DateRange, Identity, ReportRequest, ReportType};
/// use mtrace_cli::reporting::build_filter;
///
/// let request = ReportRequest {
///     identity: Identity {
///         app_id: "app".into(),
///         tenant_id: "tenant".into(),
///         app_secret: "secret".into(),
///     },
///     range: DateRange {
///         start: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
///         end: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
///     },
///     report_type: ReportType::MessageTrace,
///     detail: None,
///     save_path: "out".into(),
/// };
///
/// assert_eq!(
///     build_filter(&request),
///     "StartDate eq datetime'2024-05-01T00:00:00Z' and EndDate eq datetime'2024-05-02T23:59:59Z'"
/// );
/// ```
pub fn build_filter(request: &ReportRequest) -> String {
    let window = date_window_clause(&request.range);
    match &request.detail {
        Some(detail) => format!(
            "MessageTraceId eq guid'{}' and RecipientAddress eq '{}' and SenderAddress eq '{}' and {window}",
            detail.message_trace_id, detail.recipient_address, detail.sender_address
        ),
        None => window,
    }
}

fn date_window_clause(range: &DateRange) -> String {
    format!(
        "StartDate eq datetime'{}T00:00:00Z' and EndDate eq datetime'{}T23:59:59Z'",
        range.start.format(DATE_FORMAT),
        range.end.format(DATE_FORMAT)
    )
}

/// Resolves the full report URL: the report type's endpoint joined onto the reporting
/// base, with the filter as the `$filter` query parameter.
pub fn report_url(request: &ReportRequest, reporting_base_url: &str) -> AppResult<Url> {
    let base = if reporting_base_url.ends_with('/') {
        Url::parse(reporting_base_url)?
    } else {
        Url::parse(&format!("{reporting_base_url}/"))?
    };
    let mut url = base.join(request.report_type.endpoint())?;
    url.query_pairs_mut()
        .append_pair("$filter", &build_filter(request));
    Ok(url)
}
