//! Error types for curvewire-client.

use thiserror::Error;

/// Failure to decode a frame from a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Fewer bytes are available than a field needs.
    #[error("truncated buffer: needed {needed} bytes, {available} available")]
    TruncatedBuffer { needed: usize, available: usize },

    /// The length prefix disagrees with the actual frame size.
    #[error("length mismatch: frame declares {declared} bytes but has {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    /// The point section is not a whole number of (x, y) pairs.
    #[error("trailing garbage: {remaining} bytes after the last point pair")]
    TrailingGarbage { remaining: usize },

    /// Declared length is too small to hold a length prefix and a name terminator.
    #[error("frame too short: declared length {declared}")]
    FrameTooShort { declared: u32 },

    /// Declared length exceeds the configured maximum.
    #[error("frame too large: declared length {declared} exceeds maximum {max}")]
    FrameTooLarge { declared: u32, max: u32 },

    /// Request frame names a command this protocol does not define.
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),
}

impl DecodeError {
    /// True for errors that only mean "wait for more bytes".
    #[inline]
    pub fn is_truncated(&self) -> bool {
        matches!(self, DecodeError::TruncatedBuffer { .. })
    }
}

/// Main error type for all client operations.
#[derive(Debug, Error)]
pub enum CurvewireError {
    /// I/O error during pipe/socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error while loading configuration.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A received frame could not be decoded.
    #[error("Protocol error: {0}")]
    Decode(#[from] DecodeError),

    /// Caller-supplied request parameters failed validation.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// A request is already awaiting its response.
    #[error("A request is already in flight")]
    RequestInFlight,

    /// Operation needs a connection that has been closed.
    #[error("Not connected")]
    NotConnected,

    /// Server closed the connection.
    #[error("Connection closed")]
    ConnectionClosed,

    /// No response within the configured timeout.
    #[error("Timed out waiting for response")]
    Timeout,
}

/// Result type alias using CurvewireError.
pub type Result<T> = std::result::Result<T, CurvewireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_messages() {
        let err = DecodeError::LengthMismatch {
            declared: 100,
            actual: 80,
        };
        assert_eq!(
            err.to_string(),
            "length mismatch: frame declares 100 bytes but has 80"
        );

        let err = DecodeError::TrailingGarbage { remaining: 5 };
        assert!(err.to_string().contains("5 bytes"));
    }

    #[test]
    fn test_is_truncated() {
        assert!(DecodeError::TruncatedBuffer {
            needed: 4,
            available: 2
        }
        .is_truncated());
        assert!(!DecodeError::TrailingGarbage { remaining: 1 }.is_truncated());
    }

    #[test]
    fn test_decode_error_converts() {
        let err: CurvewireError = DecodeError::TrailingGarbage { remaining: 3 }.into();
        assert!(matches!(
            err,
            CurvewireError::Decode(DecodeError::TrailingGarbage { remaining: 3 })
        ));
        assert!(err.to_string().starts_with("Protocol error"));
    }
}
