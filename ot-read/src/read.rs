//! Parsing and error types.

use crate::table_data::TableData;

/// A table that can be parsed from raw big-endian bytes.
///
/// Implementations validate everything the rest of the system relies on
/// up front: version fields, counts, and every declared offset. A
/// successful read yields a view whose accessors are pure reads that can
/// miss (returning `None`) but never fail on malformed data.
pub trait TableRead<'a>: Sized {
    /// Validate `data` and construct the table view.
    fn read(data: TableData<'a>) -> Result<Self, ReadError>;
}

/// An error that occurs when reading font data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// A read or a declared offset was past the end of the table.
    OutOfBounds,
    /// A version or format field had an unsupported value.
    // i64 is flexible enough to store any value we might encounter
    InvalidFormat(i64),
    /// A declared array length was not a multiple of the item size.
    InvalidArrayLen,
    /// A required table was present but contained no bytes.
    BlankTable,
    /// A structural invariant the format requires did not hold.
    MalformedData(&'static str),
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::OutOfBounds => write!(f, "An offset was out of bounds"),
            ReadError::InvalidFormat(x) => write!(f, "Invalid format '{x}'"),
            ReadError::InvalidArrayLen => {
                write!(f, "Specified array length not a multiple of item size")
            }
            ReadError::BlankTable => write!(f, "The table contains no bytes"),
            ReadError::MalformedData(msg) => write!(f, "Malformed data: '{msg}'"),
        }
    }
}

impl std::error::Error for ReadError {}
