//! # Database Module
//!
//! The persistence client capability consumed by the data-access core:
//! a connect / disconnect / ping lifecycle plus a typed error carrying the
//! `code` and `kind` fields the retry classifier reads.

pub mod client;
pub mod error_codes;
pub mod postgres;

pub use client::{ClientError, ClientErrorKind, DatabaseClient};
pub use error_codes::ClientErrorCode;
pub use postgres::PgClient;
