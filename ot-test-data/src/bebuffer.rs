//! small utilities for building binary test data

use ot_types::Scalar;

/// A convenience type for generating a buffer of big-endian bytes.
#[derive(Debug, Clone, Default)]
pub struct BeBuffer(Vec<u8>);

impl BeBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    /// The current length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the buffer contains zero bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return a reference to the contents of the buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Write any scalar to this buffer.
    pub fn push(mut self, item: impl Scalar) -> Self {
        self.0.extend(item.to_raw().as_ref());
        self
    }

    /// Write multiple scalars into the buffer.
    pub fn extend<T: Scalar>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        for item in iter {
            self.0.extend(item.to_raw().as_ref());
        }
        self
    }
}

impl std::ops::Deref for BeBuffer {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Write one `be_buffer!` item into `$buf`.
#[macro_export]
macro_rules! be_buffer_add {
    ($buf:ident, [$($item:expr),* $(,)?]) => {
        $buf.extend([$($item),*])
    };
    ($buf:ident, $item:expr) => {
        $buf.push($item)
    };
}

/// Build a [`BeBuffer`](crate::bebuffer::BeBuffer) from a list of items.
///
/// Items are plain scalars, with two wrinkles: `[a, b, c]` appends a
/// whole array, and compound expressions need parentheses around them.
#[macro_export]
macro_rules! be_buffer {
    ($($item:tt),* $(,)?) => {{
        let buf = $crate::bebuffer::BeBuffer::new();
        $(let buf = $crate::be_buffer_add!(buf, $item);)*
        buf
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_extend() {
        let buf = BeBuffer::new().push(1u16).extend([2u16, 3]).push(-1i8);
        assert_eq!(&*buf, &[0, 1, 0, 2, 0, 3, 0xff]);
    }

    #[test]
    fn buffer_macro() {
        let buf = be_buffer! {
            1u16,                       // a scalar
            [2u16, 3],                  // an array
            (ot_types::Tag::new(b"abcd")) // a compound expression
        };
        assert_eq!(&*buf, &[0, 1, 0, 2, 0, 3, b'a', b'b', b'c', b'd']);
    }
}
