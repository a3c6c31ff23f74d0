//! Raw table bytes and the cursor used to validate them.

use std::ops::{Bound, Range, RangeBounds};

use types::ReadScalar;

use crate::array::ScalarArray;
use crate::read::ReadError;

/// A reference to raw binary table data.
///
/// This is a wrapper around a byte slice that provides bounds-checked
/// reads of big-endian values; every parser in this crate works through
/// one. Views are cheap to copy and never own their bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct TableData<'a> {
    bytes: &'a [u8],
}

/// A cursor for validating bytes during parsing.
///
/// Table constructors walk their header with one of these, then call
/// [`finish`](Cursor::finish) to confirm the walk stayed in bounds.
pub(crate) struct Cursor<'a> {
    pos: usize,
    data: TableData<'a>,
}

impl<'a> TableData<'a> {
    /// Create a new `TableData` borrowing these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        TableData { bytes }
    }

    /// The length of the data, in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The view from `pos` to the end, or `None` if `pos` is out of bounds.
    pub fn split_off(&self, pos: usize) -> Option<TableData<'a>> {
        self.bytes.get(pos..).map(|bytes| TableData { bytes })
    }

    /// A subrange of the view, or `None` if the range is out of bounds.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<TableData<'a>> {
        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        self.bytes.get(bounds).map(|bytes| TableData { bytes })
    }

    /// Read a scalar value out of the buffer at `offset`.
    pub fn read_at<T: ReadScalar>(&self, offset: usize) -> Result<T, ReadError> {
        self.bytes
            .get(offset..offset + T::RAW_BYTE_LEN)
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Interpret the bytes in `range` as an array of scalar values.
    pub fn read_array<T: ReadScalar>(
        &self,
        range: Range<usize>,
    ) -> Result<ScalarArray<'a, T>, ReadError> {
        let bytes = self.bytes.get(range).ok_or(ReadError::OutOfBounds)?;
        ScalarArray::new(bytes)
    }

    /// Read a 16-bit offset at `pos` and return the view it points at.
    pub fn resolve_offset16(&self, pos: usize) -> Result<TableData<'a>, ReadError> {
        let offset: u16 = self.read_at(pos)?;
        self.split_off(offset as usize).ok_or(ReadError::OutOfBounds)
    }

    /// Read a 32-bit offset at `pos` and return the view it points at.
    pub fn resolve_offset32(&self, pos: usize) -> Result<TableData<'a>, ReadError> {
        let offset: u32 = self.read_at(pos)?;
        self.split_off(offset as usize).ok_or(ReadError::OutOfBounds)
    }

    /// Confirm that `offset` does not exceed the length of the data.
    pub fn check_in_bounds(&self, offset: usize) -> Result<(), ReadError> {
        self.bytes
            .get(..offset)
            .ok_or(ReadError::OutOfBounds)
            .map(|_| ())
    }

    pub(crate) fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }

    pub(crate) fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> From<&'a [u8]> for TableData<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        TableData::new(bytes)
    }
}

impl<'a> Cursor<'a> {
    pub(crate) fn advance<T: ReadScalar>(&mut self) {
        self.pos += T::RAW_BYTE_LEN
    }

    pub(crate) fn advance_by(&mut self, n_bytes: usize) {
        self.pos += n_bytes;
    }

    pub(crate) fn read<T: ReadScalar>(&mut self) -> Result<T, ReadError> {
        let temp = self.data.read_at(self.pos);
        self.pos += T::RAW_BYTE_LEN;
        temp
    }

    pub(crate) fn read_array<T: ReadScalar>(
        &mut self,
        len: usize,
    ) -> Result<ScalarArray<'a, T>, ReadError> {
        let len = len * T::RAW_BYTE_LEN;
        let temp = self.data.read_array(self.pos..self.pos + len);
        self.pos += len;
        temp
    }

    // used when handling fields with an implicit length, which must be at
    // the end of a table.
    pub(crate) fn remaining_bytes(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn finish(self) -> Result<(), ReadError> {
        self.data.check_in_bounds(self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_at_bounds() {
        let data = TableData::new(&[0, 1, 0, 2, 0]);
        assert_eq!(data.read_at::<u16>(0), Ok(1));
        assert_eq!(data.read_at::<u16>(2), Ok(2));
        assert_eq!(data.read_at::<u16>(4), Err(ReadError::OutOfBounds));
    }

    #[test]
    fn split_off_bounds() {
        let data = TableData::new(&[0; 8]);
        // A split at the very end yields an empty view; one byte past fails.
        assert_eq!(data.split_off(8).map(|data| data.len()), Some(0));
        assert!(data.split_off(9).is_none());
    }

    #[test]
    fn cursor_walk() {
        let data = TableData::new(&[0, 5, 0, 0, 0, 7]);
        let mut cursor = data.cursor();
        assert_eq!(cursor.read::<u16>(), Ok(5));
        assert_eq!(cursor.read::<u32>(), Ok(7));
        assert!(cursor.finish().is_ok());

        let mut cursor = data.cursor();
        cursor.advance_by(7);
        assert_eq!(cursor.finish(), Err(ReadError::OutOfBounds));
    }
}
