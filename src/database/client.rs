//! Persistence client capability and its typed error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error_codes::ClientErrorCode;

/// Coarse category reported by the persistence client alongside an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientErrorKind {
    /// The connection handle is closed or was never opened
    Closed,
    /// Transport-level failure that is not a known connection code
    Io,
    /// Error reported by the database server itself
    Database,
    /// The query matched no rows
    NotFound,
    Other,
}

impl fmt::Display for ClientErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClientErrorKind::Closed => "Closed",
            ClientErrorKind::Io => "Io",
            ClientErrorKind::Database => "Database",
            ClientErrorKind::NotFound => "NotFound",
            ClientErrorKind::Other => "Other",
        };
        f.write_str(name)
    }
}

/// Typed error raised by the persistence client.
///
/// `code` and `kind` are what the retry classifier inspects; `message` is shown
/// to callers unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: Option<String>,
    pub kind: Option<ClientErrorKind>,
    pub message: String,
}

impl ClientError {
    /// Plain error with neither code nor kind, e.g. a validation failure
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            kind: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_kind(mut self, kind: ClientErrorKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn closed(message: impl Into<String>) -> Self {
        Self::new(message).with_kind(ClientErrorKind::Closed)
    }

    pub fn cannot_reach_server(server: &str) -> Self {
        Self::new(format!(
            "{} at `{server}`. Please make sure your database server is running.",
            ClientErrorCode::UNREACHABLE_MESSAGE
        ))
        .with_code(ClientErrorCode::CANNOT_REACH_SERVER)
    }

    pub fn connection_timed_out(server: &str) -> Self {
        Self::new(format!(
            "Database server at `{server}` was reached but timed out."
        ))
        .with_code(ClientErrorCode::CONNECTION_TIMED_OUT)
    }
}

/// Connection lifecycle of the underlying persistence client.
///
/// Queries themselves are issued by application code through the concrete
/// client (see [`super::PgClient::pool`]); the core only needs to open, close
/// and probe the shared handle.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    async fn connect(&self) -> Result<(), ClientError>;

    async fn disconnect(&self) -> Result<(), ClientError>;

    /// Trivial round-trip query
    async fn ping(&self) -> Result<(), ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_the_raw_message() {
        let error = ClientError::new("Unique constraint failed on the fields: (`email`)")
            .with_code("P2002");
        assert_eq!(
            error.to_string(),
            "Unique constraint failed on the fields: (`email`)"
        );
    }

    #[test]
    fn test_connection_constructors() {
        let unreachable = ClientError::cannot_reach_server("localhost:5432");
        assert_eq!(unreachable.code.as_deref(), Some("P1001"));
        assert!(unreachable.message.contains("Can't reach database server"));
        assert!(unreachable.message.contains("localhost:5432"));

        let timed_out = ClientError::connection_timed_out("localhost:5432");
        assert_eq!(timed_out.code.as_deref(), Some("P1002"));

        let closed = ClientError::closed("connection closed");
        assert_eq!(closed.kind, Some(ClientErrorKind::Closed));
        assert!(closed.code.is_none());
    }
}
