// src/core/errors.rs

//! Defines the primary error type for the entire client library.

use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all possible failures within the client.
/// Using `thiserror` allows for clean error definitions and automatic `From` trait implementations.
#[derive(Error, Debug)]
pub enum CitrineError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    /// The stream does not yet contain a complete reply. This is internal to
    /// the decoder loop and never escapes a transport call.
    #[error("Incomplete data in stream")]
    IncompleteData,

    #[error("Operation timed out")]
    Timeout,

    #[error("Connection reset by server")]
    ConnectionReset,

    #[error("Not connected")]
    NotConnected,

    #[error("Already connected")]
    AlreadyConnected,

    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    #[error("Wrong number of arguments for '{0}' command")]
    WrongArgumentCount(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The server returned a `-` reply. The message carries the server's own
    /// text, with a leading `ERR ` prefix already stripped.
    #[error("Server error: {0}")]
    Server(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Raw commands are not available on a sharded connection")]
    RawCommandUnsupported,

    /// A reply was requested but no command is in flight on the connection.
    #[error("No pending reply on this connection")]
    NoPendingReply,

    /// A reply did not have the shape the caller asked for.
    #[error("Unexpected response shape")]
    UnexpectedResponse,

    /// Aggregate failure of a pipeline block, carrying the first underlying cause.
    #[error("Pipeline failed: {0}")]
    Pipeline(#[source] Box<CitrineError>),
}

impl CitrineError {
    /// True for failures after which the byte stream can no longer be assumed
    /// aligned with the protocol. The transport drops its socket before
    /// surfacing one of these; the caller must reconnect explicitly.
    pub fn invalidates_connection(&self) -> bool {
        matches!(
            self,
            CitrineError::Io(_)
                | CitrineError::Timeout
                | CitrineError::ConnectionReset
                | CitrineError::MalformedResponse(_)
                | CitrineError::IncompleteData
        )
    }
}

// Manual implementation of Clone because `std::io::Error` is not cloneable.
// We wrap it in an Arc to allow for cheap, shared cloning.
impl Clone for CitrineError {
    fn clone(&self) -> Self {
        match self {
            CitrineError::Io(e) => CitrineError::Io(Arc::clone(e)),
            CitrineError::IncompleteData => CitrineError::IncompleteData,
            CitrineError::Timeout => CitrineError::Timeout,
            CitrineError::ConnectionReset => CitrineError::ConnectionReset,
            CitrineError::NotConnected => CitrineError::NotConnected,
            CitrineError::AlreadyConnected => CitrineError::AlreadyConnected,
            CitrineError::UnknownCommand(s) => CitrineError::UnknownCommand(s.clone()),
            CitrineError::WrongArgumentCount(s) => CitrineError::WrongArgumentCount(s.clone()),
            CitrineError::InvalidArgument(s) => CitrineError::InvalidArgument(s.clone()),
            CitrineError::Server(s) => CitrineError::Server(s.clone()),
            CitrineError::MalformedResponse(s) => CitrineError::MalformedResponse(s.clone()),
            CitrineError::RawCommandUnsupported => CitrineError::RawCommandUnsupported,
            CitrineError::NoPendingReply => CitrineError::NoPendingReply,
            CitrineError::UnexpectedResponse => CitrineError::UnexpectedResponse,
            CitrineError::Pipeline(e) => CitrineError::Pipeline(e.clone()),
        }
    }
}

impl PartialEq for CitrineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CitrineError::Io(e1), CitrineError::Io(e2)) => e1.to_string() == e2.to_string(),
            (CitrineError::UnknownCommand(s1), CitrineError::UnknownCommand(s2)) => s1 == s2,
            (CitrineError::WrongArgumentCount(s1), CitrineError::WrongArgumentCount(s2)) => {
                s1 == s2
            }
            (CitrineError::InvalidArgument(s1), CitrineError::InvalidArgument(s2)) => s1 == s2,
            (CitrineError::Server(s1), CitrineError::Server(s2)) => s1 == s2,
            (CitrineError::MalformedResponse(s1), CitrineError::MalformedResponse(s2)) => s1 == s2,
            (CitrineError::Pipeline(e1), CitrineError::Pipeline(e2)) => e1 == e2,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for CitrineError {
    fn from(e: std::io::Error) -> Self {
        CitrineError::Io(Arc::new(e))
    }
}

impl From<std::str::Utf8Error> for CitrineError {
    fn from(_: std::str::Utf8Error) -> Self {
        CitrineError::MalformedResponse("invalid UTF-8 in reply".into())
    }
}

impl From<std::string::FromUtf8Error> for CitrineError {
    fn from(_: std::string::FromUtf8Error) -> Self {
        CitrineError::MalformedResponse("invalid UTF-8 in reply".into())
    }
}
