//! Error types for samvfd.
//!
//! All fallible operations across the library return [`Result<T>`], which
//! uses [`Error`] as the error type. Argument validation, transport-layer,
//! and connection errors are all captured here.

/// The error type for all samvfd operations.
///
/// Validation variants ([`InvalidParameter`](Error::InvalidParameter),
/// [`InvalidPosition`](Error::InvalidPosition)) are always raised before any
/// byte is written. Transport variants are raised after the fact.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An argument was outside its enumerated legal set (unknown mode code,
    /// glyph slot out of range, wrong glyph pattern length).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The composite position `row * 20 + col` falls outside the display.
    #[error("invalid position: col={col}, row={row}")]
    InvalidPosition { col: i32, row: i32 },

    /// The transport accepted fewer bytes than were handed to it.
    ///
    /// The bytes that did go out are not retried; the caller decides whether
    /// to re-issue the operation.
    #[error("short write: {written} of {expected} bytes accepted")]
    TransportShortWrite { expected: usize, written: usize },

    /// The port could not be opened.
    #[error("connection error: {0}")]
    Connection(String),

    /// No connection to the display is open.
    #[error("not connected")]
    NotConnected,

    /// The connection to the display was lost unexpectedly.
    #[error("connection lost")]
    ConnectionLost,

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<std::convert::Infallible> for Error {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_invalid_parameter() {
        let e = Error::InvalidParameter("unknown dim level 0x41".into());
        assert_eq!(e.to_string(), "invalid parameter: unknown dim level 0x41");
    }

    #[test]
    fn error_display_invalid_position() {
        let e = Error::InvalidPosition { col: 0, row: 2 };
        assert_eq!(e.to_string(), "invalid position: col=0, row=2");
    }

    #[test]
    fn error_display_short_write() {
        let e = Error::TransportShortWrite {
            expected: 5,
            written: 3,
        };
        assert_eq!(e.to_string(), "short write: 3 of 5 bytes accepted");
    }

    #[test]
    fn error_display_connection() {
        let e = Error::Connection("/dev/ttyUSB0: no such file".into());
        assert_eq!(e.to_string(), "connection error: /dev/ttyUSB0: no such file");
    }

    #[test]
    fn error_display_not_connected() {
        assert_eq!(Error::NotConnected.to_string(), "not connected");
    }

    #[test]
    fn error_display_connection_lost() {
        assert_eq!(Error::ConnectionLost.to_string(), "connection lost");
    }

    #[test]
    fn error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broken");
        let e: Error = io_err.into();
        assert!(matches!(e, Error::Io(_)));
        assert!(e.to_string().contains("pipe broken"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<Error>();
    }
}
