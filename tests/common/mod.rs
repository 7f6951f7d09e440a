//! Common test utilities for integration tests

use mtrace_cli::config::ResolvedConfig;
use mtrace_cli::models::{DateRange, DetailFilters, Identity, ReportRequest, ReportType};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// A request as seen by the stub server.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct RecordedRequest {
    pub method: String,
    /// Path plus query, exactly as sent
    pub target: String,
    /// Header names lowercased
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

#[allow(dead_code)]
impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }

    /// Decoded query parameters
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let query = self.target.split_once('?').map(|(_, q)| q).unwrap_or("");
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    /// Decoded form-encoded body
    pub fn form_pairs(&self) -> Vec<(String, String)> {
        url::form_urlencoded::parse(&self.body).into_owned().collect()
    }
}

/// A canned response.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// Content-Length announced when it differs from the body sent
    pub declared_len: Option<usize>,
}

#[allow(dead_code)]
impl StubResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
            declared_len: None,
        }
    }

    pub fn xml(status: u16, body: &[u8]) -> Self {
        Self {
            status,
            content_type: "application/atom+xml",
            body: body.to_vec(),
            declared_len: None,
        }
    }

    /// Announces more bytes than it sends, then closes the connection.
    pub fn truncated(status: u16, body: &[u8]) -> Self {
        Self {
            declared_len: Some(body.len() + 64),
            ..Self::xml(status, body)
        }
    }

    pub fn token(token: &str) -> Self {
        Self::json(
            200,
            &format!(r#"{{"token_type":"Bearer","expires_in":3599,"access_token":"{token}"}}"#),
        )
    }
}

/// In-process HTTP/1.1 server standing in for both the identity and reporting endpoints.
///
/// Requests whose path ends in `/oauth2/v2.0/token` get the token response, everything else
/// gets the report response. Each connection serves one request and is closed.
pub struct StubServer {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[allow(dead_code)]
impl StubServer {
    pub async fn start(token: StubResponse, report: StubResponse) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let recorded = recorded.clone();
                let token = token.clone();
                let report = report.clone();
                tokio::spawn(async move {
                    serve_one(stream, recorded, token, report).await;
                });
            }
        });

        Self { addr, requests }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Config pointing both endpoints at this server, with revealing disabled.
    pub fn config(&self) -> ResolvedConfig {
        ResolvedConfig {
            login_base_url: format!("http://{}", self.addr),
            reporting_base_url: format!("http://{}/reporting.svc/", self.addr),
            request_timeout_secs: 10,
            reveal: false,
            ..Default::default()
        }
    }
}

async fn serve_one(
    stream: TcpStream,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
    token: StubResponse,
    report: StubResponse,
) {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).await.unwrap_or(0) == 0 {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_lowercase(), value.trim().to_string()));
        }
    }

    let content_length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0u8; content_length];
    if content_length > 0 && reader.read_exact(&mut body).await.is_err() {
        return;
    }

    let response = if target
        .split('?')
        .next()
        .unwrap_or_default()
        .ends_with("/oauth2/v2.0/token")
    {
        token
    } else {
        report
    };

    recorded.lock().unwrap().push(RecordedRequest {
        method,
        target,
        headers,
        body,
    });

    let head = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        response.content_type,
        response.declared_len.unwrap_or(response.body.len())
    );
    let stream = reader.get_mut();
    let _ = stream.write_all(head.as_bytes()).await;
    let _ = stream.write_all(&response.body).await;
    let _ = stream.shutdown().await;
}

/// Returns an address nothing is listening on.
#[allow(dead_code)]
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// A valid request saving into `save_path`.
#[allow(dead_code)]
pub fn trace_request(save_path: &Path) -> ReportRequest {
    ReportRequest {
        identity: Identity {
            app_id: "11111111-2222-3333-4444-555555555555".to_string(),
            tenant_id: "contoso.onmicrosoft.com".to_string(),
            app_secret: "s3cr3t".to_string(),
        },
        range: DateRange {
            start: chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            end: chrono::NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
        },
        report_type: ReportType::MessageTrace,
        detail: None,
        save_path: save_path.to_path_buf(),
    }
}

#[allow(dead_code)]
pub fn detail_request(save_path: &Path) -> ReportRequest {
    ReportRequest {
        report_type: ReportType::MessageTraceDetail,
        detail: Some(DetailFilters {
            sender_address: "alice@contoso.com".to_string(),
            recipient_address: "bob@fabrikam.com".to_string(),
            message_trace_id: "0b6b7c5e-0000-4000-8000-000000000001".to_string(),
        }),
        ..trace_request(save_path)
    }
}

/// Lists the files directly inside `dir`, sorted; empty when `dir` does not exist.
#[allow(dead_code)]
pub fn files_in(dir: &Path) -> Vec<std::path::PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    files
}

/// Sample report body
#[allow(dead_code)]
pub const SAMPLE_REPORT: &[u8] = br#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <content type="application/xml">
      <m:properties xmlns:m="http://schemas.microsoft.com/ado/2007/08/dataservices/metadata">
        <d:MessageTraceId xmlns:d="http://schemas.microsoft.com/ado/2007/08/dataservices">0b6b7c5e-0000-4000-8000-000000000001</d:MessageTraceId>
        <d:Status xmlns:d="http://schemas.microsoft.com/ado/2007/08/dataservices">Delivered</d:Status>
      </m:properties>
    </content>
  </entry>
</feed>"#;
