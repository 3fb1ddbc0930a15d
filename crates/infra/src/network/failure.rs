use std::io;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Transport-level failure family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NetworkFailure {
    /// The device has no usable network.
    #[error("no network connection: {message}")]
    NoConnection { message: String },

    #[error("dns lookup failed for {host}")]
    DnsLookup { host: String },

    #[error("connection refused or reset: {message}")]
    ConnectionRefused { message: String },

    #[error("request timed out")]
    Timeout {
        #[serde(default)]
        after: Option<Duration>,
    },

    #[error("tls handshake failed: {message}")]
    Tls { message: String },

    /// The server answered with a non-success status.
    #[error("http status {status}")]
    HttpStatus {
        status: u16,
        #[serde(default)]
        body: Option<String>,
    },

    /// The body could not be parsed as the expected payload.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// Transport failure the client could not classify.
    #[error("transport error ({class}): {message}")]
    Unclassified { class: String, message: String },
}

impl NetworkFailure {
    pub fn status(status: u16) -> Self {
        NetworkFailure::HttpStatus { status, body: None }
    }

    pub fn timeout(after: Duration) -> Self {
        NetworkFailure::Timeout { after: Some(after) }
    }
}

impl From<io::Error> for NetworkFailure {
    fn from(err: io::Error) -> Self {
        let message = err.to_string();
        match err.kind() {
            io::ErrorKind::NotConnected
            | io::ErrorKind::NetworkUnreachable
            | io::ErrorKind::NetworkDown
            | io::ErrorKind::HostUnreachable
            | io::ErrorKind::AddrNotAvailable => NetworkFailure::NoConnection { message },
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => NetworkFailure::ConnectionRefused { message },
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
                NetworkFailure::Timeout { after: None }
            }
            io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
                NetworkFailure::InvalidResponse { message }
            }
            // io::ErrorKind is non-exhaustive.
            other => NetworkFailure::Unclassified {
                class: format!("{other:?}"),
                message,
            },
        }
    }
}
