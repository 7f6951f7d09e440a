use std::fmt;

#[derive(Debug)]
pub enum AppError {
    /// One or more required form fields are empty
    MissingField(String),
    /// Transport failure talking to the identity or reporting endpoint
    NetworkError(String),
    /// Identity endpoint refused the grant or returned no token
    TokenError(String),
    /// Reporting endpoint answered with a non-200 status
    ApiError { status: u16, body: String },
    /// Invalid URL format
    UrlError(String),
    /// Invalid input format
    InvalidInput(String),
    /// IO operation failed
    IoError(String),
    /// Anything the categories above do not cover (e.g. the worker task died)
    Unexpected(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MissingField(msg) => write!(f, "Missing required field: {msg}"),
            AppError::NetworkError(msg) => write!(f, "Request error: {msg}"),
            AppError::TokenError(msg) => write!(f, "Failed to retrieve OAuth token: {msg}"),
            AppError::ApiError { status, body } => {
                write!(f, "API call failed (HTTP {status}): {body}")
            }
            AppError::UrlError(msg) => write!(f, "Invalid URL: {msg}"),
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            AppError::IoError(msg) => write!(f, "IO error: {msg}"),
            AppError::Unexpected(msg) => write!(f, "An unexpected error occurred: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

// Conversion implementations for common errors
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::NetworkError(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::UrlError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

// Custom type alias for Results in this application
pub type AppResult<T> = Result<T, AppError>;
