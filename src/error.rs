use thiserror::Error;

use crate::schema::LogicalField;

/// Fatal: the season table cannot be mapped onto the logical fields.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error(
        "required columns not found: {} (resolved: {}; headers found: {})",
        join_fields(.missing),
        join_resolved(.resolved),
        join_headers(.found)
    )]
    MissingColumns {
        missing: Vec<LogicalField>,
        resolved: Vec<(LogicalField, String)>,
        found: Vec<String>,
    },
}

#[derive(Error, Debug)]
pub enum SleeperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GET {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("JSON deserialization failed for {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl SleeperError {
    /// Transport failures and server errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            SleeperError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            SleeperError::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}

fn join_fields(fields: &[LogicalField]) -> String {
    fields
        .iter()
        .map(LogicalField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_headers(headers: &[String]) -> String {
    headers
        .iter()
        .map(|h| format!("{:?}", h))
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_resolved(resolved: &[(LogicalField, String)]) -> String {
    if resolved.is_empty() {
        return "none".to_string();
    }
    resolved
        .iter()
        .map(|(field, header)| format!("{}={:?}", field, header))
        .collect::<Vec<_>>()
        .join(", ")
}
