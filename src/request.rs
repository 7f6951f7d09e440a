use crate::constants::DATE_FORMAT;
use crate::errors::{AppError, AppResult};
use crate::models::{DateRange, DetailFilters, Identity, ReportRequest, ReportType};
use chrono::{Duration, NaiveDate};
use std::path::PathBuf;

/// Days before today a start date may reach without a warning.
const START_WINDOW_DAYS: i64 = 10;
/// Days after today an end date may reach without a warning.
const END_WINDOW_DAYS: i64 = 10;

/// Raw form state as entered by the user, before any checks.
///
/// Every field is optional text so the same struct can be filled from command-line
/// flags or a TOML file. Call [`ReportForm::into_request`] to obtain a [`ReportRequest`].
#[derive(Debug, Clone, Default)]
pub struct ReportForm {
    pub app_id: Option<String>,
    pub tenant_id: Option<String>,
    pub app_secret: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub report_type: ReportType,
    pub sender_address: Option<String>,
    pub recipient_address: Option<String>,
    pub message_trace_id: Option<String>,
    pub save_path: Option<String>,
}

impl ReportForm {
    /// Validates presence of the required fields and freezes the form into a request.
    ///
    /// Checks run in the order the form presents them: identity, dates, save path,
    /// then (detail mode only) sender, recipient and trace id. The first group with a
    /// blank field fails with [`AppError::MissingField`] naming every blank field in it.
    /// In trace mode the detail fields are ignored even if populated.
    ///
    /// # Errors
    ///
    /// - `MissingField` if a required value is absent or whitespace-only
    /// - `InvalidInput` if a date is not `YYYY-MM-DD`
    pub fn into_request(self) -> AppResult<ReportRequest> {
        let app_id = present(&self.app_id);
        let tenant_id = present(&self.tenant_id);
        let app_secret = present(&self.app_secret);
        require_all(&[
            ("App ID", app_id.is_some()),
            ("Tenant ID", tenant_id.is_some()),
            ("App Secret", app_secret.is_some()),
        ])?;

        let start = present(&self.start);
        let end = present(&self.end);
        require_all(&[("Start Date", start.is_some()), ("End Date", end.is_some())])?;

        let save_path = present(&self.save_path);
        require_all(&[("Save Path", save_path.is_some())])?;

        let detail = if self.report_type.requires_detail_filters() {
            let sender = present(&self.sender_address);
            let recipient = present(&self.recipient_address);
            let trace_id = present(&self.message_trace_id);
            require_all(&[
                ("Sender Address", sender.is_some()),
                ("Recipient Address", recipient.is_some()),
                ("Message Trace ID", trace_id.is_some()),
            ])?;
            Some(DetailFilters {
                sender_address: sender.unwrap_or_default(),
                recipient_address: recipient.unwrap_or_default(),
                message_trace_id: trace_id.unwrap_or_default(),
            })
        } else {
            None
        };

        let range = DateRange {
            start: parse_date("Start Date", start.as_deref().unwrap_or_default())?,
            end: parse_date("End Date", end.as_deref().unwrap_or_default())?,
        };

        Ok(ReportRequest {
            identity: Identity {
                app_id: app_id.unwrap_or_default(),
                tenant_id: tenant_id.unwrap_or_default(),
                app_secret: app_secret.unwrap_or_default(),
            },
            range,
            report_type: self.report_type,
            detail,
            save_path: PathBuf::from(save_path.unwrap_or_default()),
        })
    }
}

/// Returns advisory notes for a date range the service is likely to reject.
///
/// Nothing here blocks a submission; callers log the notes as warnings.
pub fn date_window_warnings(range: &DateRange, today: NaiveDate) -> Vec<String> {
    let mut warnings = Vec::new();
    if range.start > range.end {
        warnings.push(format!(
            "Start Date {} is after End Date {}",
            range.start, range.end
        ));
    }
    if range.start < today - Duration::days(START_WINDOW_DAYS) {
        warnings.push(format!(
            "Start Date {} is more than {START_WINDOW_DAYS} days in the past",
            range.start
        ));
    }
    if range.start > today {
        warnings.push(format!("Start Date {} is in the future", range.start));
    }
    if range.end > today + Duration::days(END_WINDOW_DAYS) {
        warnings.push(format!(
            "End Date {} is more than {END_WINDOW_DAYS} days in the future",
            range.end
        ));
    }
    warnings
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(field: &str, value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        AppError::InvalidInput(format!("{field} must be YYYY-MM-DD, got: {value} ({e})"))
    })
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn require_all(fields: &[(&str, bool)]) -> AppResult<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, ok)| !ok)
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::MissingField(missing.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace_form() -> ReportForm {
        ReportForm {
            app_id: Some("app-id".to_string()),
            tenant_id: Some("contoso.onmicrosoft.com".to_string()),
            app_secret: Some("secret".to_string()),
            start: Some("2024-05-01".to_string()),
            end: Some("2024-05-03".to_string()),
            report_type: ReportType::MessageTrace,
            save_path: Some("out".to_string()),
            ..Default::default()
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn valid_trace_form_builds_request() {
        let request = trace_form().into_request().unwrap();
        assert_eq!(request.identity.app_id, "app-id");
        assert_eq!(request.range.start, date("2024-05-01"));
        assert_eq!(request.range.end, date("2024-05-03"));
        assert_eq!(request.report_type, ReportType::MessageTrace);
        assert!(request.detail.is_none());
        assert_eq!(request.save_path, PathBuf::from("out"));
    }

    #[test]
    fn values_are_trimmed() {
        let mut form = trace_form();
        form.app_id = Some("  app-id \t".to_string());
        form.start = Some(" 2024-05-01 ".to_string());
        let request = form.into_request().unwrap();
        assert_eq!(request.identity.app_id, "app-id");
        assert_eq!(request.range.start, date("2024-05-01"));
    }

    #[test]
    fn missing_identity_lists_every_blank_field() {
        let mut form = trace_form();
        form.app_id = None;
        form.app_secret = Some("   ".to_string());
        match form.into_request() {
            Err(AppError::MissingField(msg)) => {
                assert!(msg.contains("App ID"));
                assert!(msg.contains("App Secret"));
                assert!(!msg.contains("Tenant ID"));
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn missing_dates_error() {
        let mut form = trace_form();
        form.end = Some(String::new());
        match form.into_request() {
            Err(AppError::MissingField(msg)) => assert_eq!(msg, "End Date"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn missing_save_path_error() {
        let mut form = trace_form();
        form.save_path = None;
        assert!(matches!(
            form.into_request(),
            Err(AppError::MissingField(msg)) if msg == "Save Path"
        ));
    }

    #[test]
    fn malformed_date_is_invalid_input() {
        let mut form = trace_form();
        form.start = Some("05/01/2024".to_string());
        assert!(matches!(
            form.into_request(),
            Err(AppError::InvalidInput(msg)) if msg.contains("Start Date")
        ));
    }

    #[test]
    fn detail_mode_requires_all_filters() {
        let mut form = trace_form();
        form.report_type = ReportType::MessageTraceDetail;
        form.sender_address = Some("a@contoso.com".to_string());
        match form.into_request() {
            Err(AppError::MissingField(msg)) => {
                assert!(msg.contains("Recipient Address"));
                assert!(msg.contains("Message Trace ID"));
                assert!(!msg.contains("Sender Address"));
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn detail_mode_carries_filters() {
        let mut form = trace_form();
        form.report_type = ReportType::MessageTraceDetail;
        form.sender_address = Some("a@contoso.com".to_string());
        form.recipient_address = Some("b@fabrikam.com".to_string());
        form.message_trace_id = Some("0b6b7c5e-0000-4000-8000-000000000001".to_string());
        let request = form.into_request().unwrap();
        let detail = request.detail.unwrap();
        assert_eq!(detail.sender_address, "a@contoso.com");
        assert_eq!(detail.recipient_address, "b@fabrikam.com");
    }

    #[test]
    fn trace_mode_ignores_populated_detail_fields() {
        let mut form = trace_form();
        form.sender_address = Some("a@contoso.com".to_string());
        form.message_trace_id = Some("id".to_string());
        let request = form.into_request().unwrap();
        assert!(request.detail.is_none());
    }

    #[test]
    fn date_window_warnings_flag_out_of_range_dates() {
        let today = date("2024-05-20");
        let range = DateRange {
            start: date("2024-05-01"),
            end: date("2024-06-15"),
        };
        let warnings = date_window_warnings(&range, today);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("in the past"));
        assert!(warnings[1].contains("in the future"));
    }

    #[test]
    fn date_window_warnings_flag_inverted_range() {
        let today = date("2024-05-20");
        let range = DateRange {
            start: date("2024-05-19"),
            end: date("2024-05-15"),
        };
        let warnings = date_window_warnings(&range, today);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("after End Date"));
    }

    #[test]
    fn date_window_warnings_empty_for_recent_range() {
        let today = date("2024-05-20");
        let range = DateRange {
            start: date("2024-05-15"),
            end: date("2024-05-20"),
        };
        assert!(date_window_warnings(&range, today).is_empty());
    }
}
