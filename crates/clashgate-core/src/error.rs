use std::fmt::{Display, Formatter};
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// Closed classification of failed API calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    Unauthorized,
    NotFound,
    RateLimited,
    ServerError,
    /// Unclassified failures: unexpected status, malformed JSON, transport errors.
    Api,
}

impl ApiErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::Api => "api_error",
        }
    }
}

impl Display for ApiErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified API failure with the request context needed for diagnosis.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    kind: ApiErrorKind,
    message: String,
    status: Option<u16>,
    method: Option<String>,
    url: Option<String>,
    payload: Option<Value>,
    retry_after: Option<Duration>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            method: None,
            url: None,
            payload: None,
            retry_after: None,
        }
    }

    pub fn unauthorized(status: u16) -> Self {
        Self::new(ApiErrorKind::Unauthorized, "Unauthorized").with_status(status)
    }

    pub fn not_found() -> Self {
        Self::new(ApiErrorKind::NotFound, "Not found").with_status(404)
    }

    pub fn rate_limited(retry_after: Option<Duration>) -> Self {
        Self {
            retry_after,
            ..Self::new(ApiErrorKind::RateLimited, "Rate limited").with_status(429)
        }
    }

    pub fn server_error(status: u16) -> Self {
        Self::new(ApiErrorKind::ServerError, "Server error").with_status(status)
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Api, message)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_request(mut self, method: impl Into<String>, url: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self.url = Some(url.into());
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub const fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Response body as JSON when it parsed, else as a JSON string of the raw text.
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Server wait hint; only ever set on [`ApiErrorKind::RateLimited`].
    pub const fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)?;
        if let Some(status) = self.status {
            write!(f, " | status={status}")?;
        }
        if let (Some(method), Some(url)) = (&self.method, &self.url) {
            write!(f, " | {method} {url}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Input and payload validation errors raised outside the HTTP taxonomy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("tag cannot be empty")]
    EmptyTag,
    #[error("limit must be positive, got {value}")]
    NonPositiveLimit { value: i64 },
    #[error("path segment '{field}' cannot be empty")]
    EmptySegment { field: &'static str },
    #[error("timestamp must match YYYYMMDDTHHMMSS.mmmZ: '{value}'")]
    InvalidTimestamp { value: String },
    #[error("payload does not match {record}: {reason}")]
    Payload { record: &'static str, reason: String },
}

/// Invalid client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("token is required")]
    MissingToken,
    #[error("base url cannot be empty")]
    EmptyBaseUrl,
    #[error("environment variable {name} has invalid value '{value}'")]
    InvalidEnv { name: &'static str, value: String },
    #[error("failed to build http transport: {0}")]
    Transport(String),
}

/// Top-level error type for client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status_and_request_but_not_payload() {
        let error = ApiError::server_error(503)
            .with_request("GET", "https://api.example.test/v1/clans/%23ABC")
            .with_payload(Value::String(String::from("secret body")));

        let rendered = error.to_string();
        assert_eq!(
            rendered,
            "Server error | status=503 | GET https://api.example.test/v1/clans/%23ABC"
        );
        assert!(!rendered.contains("secret body"));
    }

    #[test]
    fn only_rate_limited_carries_retry_after() {
        let limited = ApiError::rate_limited(Some(Duration::from_secs(12)));
        assert_eq!(limited.kind(), ApiErrorKind::RateLimited);
        assert_eq!(limited.status(), Some(429));
        assert_eq!(limited.retry_after(), Some(Duration::from_secs(12)));

        assert_eq!(ApiError::not_found().retry_after(), None);
    }

    #[test]
    fn client_error_exposes_api_error() {
        let error = ClientError::from(ApiError::unauthorized(403));
        assert_eq!(error.as_api().map(ApiError::kind), Some(ApiErrorKind::Unauthorized));
        assert!(ClientError::from(ValidationError::EmptyTag).as_api().is_none());
    }
}
