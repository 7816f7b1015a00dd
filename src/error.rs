use std::time::Duration;

use thiserror::Error;

use crate::session::DeviceType;

/// Rejected user input. Raised before any command line is built, so the
/// device never sees a value outside its allowed set or range.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: {value:?} is not one of [{allowed}]")]
    NotInSet {
        field: &'static str,
        value: String,
        allowed: String,
    },
    #[error("{field}: {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
    #[error("missing required value: {0}")]
    Missing(&'static str),
    #[error("{field}: malformed value {value:?} ({reason})")]
    Malformed {
        field: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum AnritsuError {
    #[error("could not connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("connection failed: {0}")]
    Connection(#[source] std::io::Error),
    #[error("connection closed by the analyzer")]
    ConnectionClosed,
    #[error("session is not connected")]
    NotConnected,

    #[error("no reply to {command:?} before timeout; invalid message or lost connection")]
    Timeout { command: String },
    #[error("command {command:?} expected {sent:?} but the analyzer has {device:?}")]
    Command {
        command: String,
        sent: String,
        device: String,
    },
    #[error("query {query:?} expected {sent:?} but the analyzer has {device:?}")]
    Query {
        query: String,
        sent: String,
        device: String,
    },
    #[error("{feature} is not supported on {device}")]
    Unsupported {
        feature: String,
        device: DeviceType,
    },
    #[error("malformed reply {reply:?} to {query:?}")]
    MalformedReply { query: String, reply: String },
    #[error("port {port} still transmitting after {waited:?}")]
    WaitExpired { port: String, waited: Duration },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl AnritsuError {
    /// Connection-level failures. The session cannot be used after one of
    /// these and must be recreated.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Connect { .. } | Self::Connection(_) | Self::ConnectionClosed | Self::NotConnected
        )
    }
}

pub type Result<T, E = AnritsuError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_classification() {
        assert!(AnritsuError::ConnectionClosed.is_fatal());
        assert!(
            AnritsuError::Connection(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
                .is_fatal()
        );
        assert!(
            !AnritsuError::Timeout {
                command: ":PORT:ID?\n".into()
            }
            .is_fatal()
        );
        assert!(!AnritsuError::from(ValidationError::Missing("jump_to_id")).is_fatal());
    }

    #[test]
    fn messages_escape_line_endings() {
        let err = AnritsuError::Query {
            query: ":TSTReam:TABLe:ID?\n".into(),
            sent: "1\n".into(),
            device: "2\n".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\\n"));
        assert!(!msg.contains('\n'));
    }
}
