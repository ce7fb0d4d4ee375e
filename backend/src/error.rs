use crate::source::SourceError;
use actix_web::http::header::{CacheControl, CacheDirective};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

/// Errors that end a request at the HTTP boundary.
///
/// Every variant renders as `{ "error": "..." }` with caching disabled.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),

    #[error("invalid range: {0:?}")]
    InvalidRange(String),

    #[error("session {0} not found")]
    SessionNotFound(String),

    #[error("indicator {0:?} is not in the catalog")]
    UnknownIndicator(String),

    #[error("unsupported event: {0}")]
    UnsupportedEvent(&'static str),

    #[error(transparent)]
    Source(SourceError),
}

impl From<SourceError> for ProxyError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::MissingConfig(key) => ProxyError::MissingConfig(key),
            SourceError::InvalidRange(range) => ProxyError::InvalidRange(range),
            other => ProxyError::Source(other),
        }
    }
}

impl ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::InvalidRange(_) | ProxyError::UnsupportedEvent(_) => StatusCode::BAD_REQUEST,
            ProxyError::SessionNotFound(_) | ProxyError::UnknownIndicator(_) => StatusCode::NOT_FOUND,
            ProxyError::MissingConfig(_) | ProxyError::Source(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(CacheControl(vec![CacheDirective::NoStore]))
            .json(json!({ "error": self.to_string() }))
    }
}
