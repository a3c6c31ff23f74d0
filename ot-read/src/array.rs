//! Arrays of big-endian scalar values decoded on access.

use std::marker::PhantomData;

use types::ReadScalar;

use crate::read::ReadError;

/// A bounds-checked slice of big-endian values.
///
/// Elements are decoded one at a time as they are read; nothing is copied
/// up front. Construction checks that the byte length is a whole number
/// of elements, so the accessors can only miss, never fail.
#[derive(Debug, Clone, Copy)]
pub struct ScalarArray<'a, T> {
    bytes: &'a [u8],
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T: ReadScalar> ScalarArray<'a, T> {
    pub(crate) fn new(bytes: &'a [u8]) -> Result<Self, ReadError> {
        if bytes.len() % T::RAW_BYTE_LEN != 0 {
            return Err(ReadError::InvalidArrayLen);
        }
        Ok(ScalarArray {
            bytes,
            _marker: PhantomData,
        })
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        self.bytes.len() / T::RAW_BYTE_LEN
    }

    /// `true` if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The element at `index`, or `None` if `index` is out of range.
    pub fn get(&self, index: usize) -> Option<T> {
        let start = index.checked_mul(T::RAW_BYTE_LEN)?;
        self.bytes.get(start..).and_then(T::read)
    }

    /// Iterate the elements in order.
    pub fn iter(&self) -> impl Iterator<Item = T> + 'a {
        let bytes = self.bytes;
        (0..self.len()).filter_map(move |i| bytes.get(i * T::RAW_BYTE_LEN..).and_then(T::read))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_elements_only() {
        assert!(ScalarArray::<u16>::new(&[0, 1, 0]).is_err());
        let array = ScalarArray::<u16>::new(&[0, 1, 0, 2]).unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array.get(1), Some(2));
        assert_eq!(array.get(2), None);
        assert_eq!(array.iter().collect::<Vec<_>>(), vec![1, 2]);
    }
}
