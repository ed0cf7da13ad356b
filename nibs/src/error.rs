//! Error types for reading nibbles.

use core::fmt;
use std::io;
use std::sync::Arc;

/// The error type for all reading operations.
#[derive(Debug, Clone)]
pub enum NibbleError {
    /// The requested width is not in the range `1..=max`.
    InvalidWidth {
        /// The width that was requested.
        width: u32,
        /// The largest width the operation accepts.
        max: u32,
    },
    /// The end of the stream has not been discovered yet, so the number of
    /// remaining bits is not known.
    StreamUnknown,
    /// Every bit of the stream has been consumed.
    Exhausted,
    /// More bits were requested than are left in the stream.
    UnexpectedEof {
        /// The number of bits that were requested.
        requested: u32,
        /// The number of bits that are left.
        remaining: u64,
    },
    /// The byte source failed.
    ///
    /// The failure is permanent: it is returned again each time the reader is
    /// asked for bits after the ones produced before the failure.
    Io(Arc<io::Error>),
}

impl NibbleError {
    /// Whether this error signals the end of the stream, as opposed to a
    /// caller mistake or a failing source.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::Exhausted | Self::UnexpectedEof { .. })
    }
}

impl fmt::Display for NibbleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWidth { width, max } => {
                write!(f, "invalid nibble width {width} (must be 1-{max} bits inclusive)")
            }
            Self::StreamUnknown => write!(f, "end of stream not yet known"),
            Self::Exhausted => write!(f, "end of stream"),
            Self::UnexpectedEof {
                requested,
                remaining,
            } => write!(
                f,
                "unexpected end of stream ({requested} bits requested, {remaining} left)"
            ),
            Self::Io(e) => write!(f, "failed to read from source: {e}"),
        }
    }
}

impl core::error::Error for NibbleError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for NibbleError {
    fn from(e: io::Error) -> Self {
        Self::Io(Arc::new(e))
    }
}

impl From<NibbleError> for io::Error {
    fn from(e: NibbleError) -> Self {
        let kind = match &e {
            NibbleError::InvalidWidth { .. } => io::ErrorKind::InvalidInput,
            NibbleError::StreamUnknown => io::ErrorKind::Other,
            NibbleError::Exhausted | NibbleError::UnexpectedEof { .. } => {
                io::ErrorKind::UnexpectedEof
            }
            NibbleError::Io(inner) => inner.kind(),
        };

        Self::new(kind, e)
    }
}

/// Result type for reading operations.
pub type Result<T> = core::result::Result<T, NibbleError>;

macro_rules! bail {
    ($err:expr) => {
        return Err($err.into())
    };
}

pub(crate) use bail;
