//! Connection-error classification.
//!
//! A closed allowlist: an error is connection-related only if it matches one of
//! the rules below. Anything else is a business error and is never retried.

use crate::database::{ClientError, ClientErrorCode, ClientErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionErrorClass {
    /// Transient connection failure, eligible for retry with reconnect
    Connection,
    /// Validation, not-found, constraint and every other failure
    Business,
}

impl ConnectionErrorClass {
    pub fn is_retryable(self) -> bool {
        matches!(self, ConnectionErrorClass::Connection)
    }
}

/// Classify a client error.
///
/// Connection-related when any of:
/// - `code` is `P1001` (cannot reach server) or `P1002` (timed out)
/// - `message` contains "Can't reach database server"
/// - `kind` is `Closed`
pub fn classify(error: &ClientError) -> ConnectionErrorClass {
    let known_code = error
        .code
        .as_deref()
        .is_some_and(ClientErrorCode::is_connection_failure);
    let unreachable = error.message.contains(ClientErrorCode::UNREACHABLE_MESSAGE);
    let closed = error.kind == Some(ClientErrorKind::Closed);

    if known_code || unreachable || closed {
        ConnectionErrorClass::Connection
    } else {
        ConnectionErrorClass::Business
    }
}

pub fn is_connection_error(error: &ClientError) -> bool {
    classify(error).is_retryable()
}
