//! Error types for the note-store and exchange-rate clients.
//!
//! # Design
//! Two layers. `ApiError` describes why a single round trip failed (status
//! code, undecodable body, transport trouble). `Error` is what the public
//! operations return: it wraps an `ApiError` together with the operation
//! that was attempted, or reports a configuration problem detected before
//! any request was sent, or a bulk operation that stopped part way.
//!
//! `NotFound` and `Unauthorized` get dedicated variants because callers
//! frequently distinguish "the resource does not exist" and "the token was
//! rejected" from "the server returned an unexpected status."

use thiserror::Error;

/// Failures raised by a `Transport` before an HTTP response was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The caller cancelled the request before it was dispatched.
    #[error("request cancelled")]
    Cancelled,

    /// Connection, TLS, or protocol failure.
    #[error("transport failure: {0}")]
    Io(String),
}

/// Why a single remote call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server returned 404: the requested resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned 401: the token was rejected.
    #[error("authentication rejected")]
    Unauthorized,

    /// The server returned a non-2xx status not covered above.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The service answered 2xx but reported a failure in the payload.
    #[error("service error: {0}")]
    ServiceError(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// A requested currency was missing from the rate response.
    #[error("unknown currency code {0}")]
    UnknownCurrency(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors returned by `NoteStoreClient` and `ExchangeRateClient`.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing configuration; no request was issued.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A remote call failed. `subject` names what the call was about
    /// (note id, notebook id, base currency) when there is one.
    #[error("{operation}{} failed: {cause}", subject_suffix(.subject))]
    RemoteCall {
        operation: &'static str,
        subject: Option<String>,
        cause: ApiError,
    },

    /// A bulk delete aborted after `succeeded` deletions; `failed_at` is the
    /// id of the note whose deletion failed.
    #[error("bulk delete stopped at note {failed_at} after {succeeded} deletions: {cause}")]
    PartialFailure {
        succeeded: usize,
        failed_at: String,
        cause: ApiError,
    },
}

impl Error {
    pub(crate) fn remote(operation: &'static str, cause: ApiError) -> Self {
        Error::RemoteCall {
            operation,
            subject: None,
            cause,
        }
    }

    pub(crate) fn remote_for(
        operation: &'static str,
        subject: impl Into<String>,
        cause: ApiError,
    ) -> Self {
        Error::RemoteCall {
            operation,
            subject: Some(subject.into()),
            cause,
        }
    }

    /// The round-trip failure behind this error, if any.
    pub fn cause(&self) -> Option<&ApiError> {
        match self {
            Error::Configuration(_) => None,
            Error::RemoteCall { cause, .. } | Error::PartialFailure { cause, .. } => Some(cause),
        }
    }
}

fn subject_suffix(subject: &Option<String>) -> String {
    match subject {
        Some(s) => format!(" ({s})"),
        None => String::new(),
    }
}
