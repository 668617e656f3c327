//! Errors raised while reading or writing table data

/// An error that occurs when reading font data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// An index, offset or length fell outside the current bounds.
    OutOfBounds,
    // i64 is flexible enough to store any value we might encounter
    InvalidFormat(i64),
    InvalidArrayLen,
    MalformedData(&'static str),
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::OutOfBounds => write!(f, "An offset was out of bounds"),
            ReadError::InvalidFormat(x) => write!(f, "Invalid format '{x}'"),
            ReadError::InvalidArrayLen => {
                write!(f, "Specified array length does not fit in the data")
            }
            ReadError::MalformedData(msg) => write!(f, "Malformed data: '{msg}'"),
        }
    }
}

impl std::error::Error for ReadError {}

/// An error that occurs when writing font data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// A write fell outside the bounds of the target, or past the capacity
    /// of a fixed-size store.
    OutOfBounds,
    /// An offset was too large for the width of its field.
    OffsetOverflow { offset: usize, width: usize },
    /// A list held more items than its count field can represent.
    CountOverflow(usize),
    /// A builder was serialized without first being sized.
    NotSized,
    /// Source data could not be read while writing.
    Read(ReadError),
}

impl From<ReadError> for WriteError {
    fn from(src: ReadError) -> WriteError {
        WriteError::Read(src)
    }
}

impl std::fmt::Display for WriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteError::OutOfBounds => write!(f, "A write was out of bounds"),
            WriteError::OffsetOverflow { offset, width } => {
                write!(f, "Offset {offset} does not fit in {width} bytes")
            }
            WriteError::CountOverflow(count) => {
                write!(f, "Count {count} does not fit in a u16")
            }
            WriteError::NotSized => write!(f, "Builder must be sized before it is serialized"),
            WriteError::Read(err) => write!(f, "Failed to read source data: {err}"),
        }
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WriteError::Read(err) => Some(err),
            _ => None,
        }
    }
}
