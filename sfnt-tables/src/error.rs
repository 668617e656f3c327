//! Errors that occur while building tables

use sfnt_data::{ReadError, WriteError};

/// An error that occurred while building a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The source data of a builder could not be read.
    Read(ReadError),
    /// The builder could not be written.
    Write(WriteError),
    /// The builder reported that it cannot be serialized in its current state.
    NotReady,
    /// A builder wrote a different number of bytes than it promised.
    SizeMismatch { expected: usize, actual: usize },
}

impl From<ReadError> for Error {
    fn from(src: ReadError) -> Error {
        Error::Read(src)
    }
}

impl From<WriteError> for Error {
    fn from(src: WriteError) -> Error {
        Error::Write(src)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Read(err) => write!(f, "Failed to read table: {err}"),
            Error::Write(err) => write!(f, "Failed to write table: {err}"),
            Error::NotReady => write!(f, "Table is not ready to be serialized"),
            Error::SizeMismatch { expected, actual } => write!(
                f,
                "Table was sized to {expected} bytes but wrote {actual} bytes"
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Read(err) => Some(err),
            Error::Write(err) => Some(err),
            _ => None,
        }
    }
}
