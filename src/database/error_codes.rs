//! Persistence Client Error Codes
//!
//! Constants for the error codes the persistence client attaches to connection
//! failures. These are the only codes the retry classifier treats as transient;
//! every other code (including PostgreSQL SQLSTATE values) is a business error.
//!
//! ## Usage
//!
//! ```rust
//! use quest_core::database::ClientErrorCode;
//!
//! assert!(ClientErrorCode::is_connection_failure("P1001"));
//! assert!(!ClientErrorCode::is_connection_failure("23505"));
//! ```

/// Connection-failure error codes emitted by the persistence client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientErrorCode;

impl ClientErrorCode {
    /// Can't reach database server - Code P1001
    ///
    /// The server refused the connection, reset it, or is not listening.
    pub const CANNOT_REACH_SERVER: &'static str = "P1001";

    /// Database server reached but timed out - Code P1002
    ///
    /// A connection could not be obtained within the configured timeout.
    pub const CONNECTION_TIMED_OUT: &'static str = "P1002";

    /// Message fragment carried by every unreachable-server error
    pub const UNREACHABLE_MESSAGE: &'static str = "Can't reach database server";

    #[inline]
    pub fn is_cannot_reach_server(code: &str) -> bool {
        code == Self::CANNOT_REACH_SERVER
    }

    #[inline]
    pub fn is_connection_timed_out(code: &str) -> bool {
        code == Self::CONNECTION_TIMED_OUT
    }

    /// Check if the code is one of the two known connection-failure codes
    #[inline]
    pub fn is_connection_failure(code: &str) -> bool {
        Self::is_cannot_reach_server(code) || Self::is_connection_timed_out(code)
    }
}
