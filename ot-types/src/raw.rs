//! Traits for converting types to and from raw big-endian bytes.

/// A type that has a big-endian byte representation.
///
/// You do not generally need to implement this trait yourself; use the
/// `newtype_scalar` macro for simple wrapper types.
pub trait Scalar: Sized {
    /// The raw byte representation of this type.
    type Raw: Copy + AsRef<[u8]>;

    /// Create an instance of this type from raw big-endian bytes.
    fn from_raw(raw: Self::Raw) -> Self;

    /// Encode this type as raw big-endian bytes.
    fn to_raw(self) -> Self::Raw;
}

/// A scalar that can be read from a byte slice.
///
/// This is implemented for all [`Scalar`] types whose raw form is a byte
/// array, which is to say all of them.
pub trait ReadScalar: Sized {
    /// The number of bytes required to encode this type.
    const RAW_BYTE_LEN: usize;

    /// Read an instance of this type from the front of `bytes`.
    ///
    /// Returns `None` if `bytes` is too short; extra bytes are ignored.
    fn read(bytes: &[u8]) -> Option<Self>;
}

impl<const N: usize, T: Scalar<Raw = [u8; N]>> ReadScalar for T {
    const RAW_BYTE_LEN: usize = N;

    #[inline]
    fn read(bytes: &[u8]) -> Option<Self> {
        bytes
            .get(..N)
            .and_then(|bytes| bytes.try_into().ok())
            .map(Self::from_raw)
    }
}

/// Implement [`Scalar`] for a single-field wrapper around another scalar.
#[macro_export]
macro_rules! newtype_scalar {
    ($name:ident, $raw:ty) => {
        impl $crate::Scalar for $name {
            type Raw = $raw;
            fn to_raw(self) -> $raw {
                $crate::Scalar::to_raw(self.0)
            }

            fn from_raw(raw: $raw) -> Self {
                Self($crate::Scalar::from_raw(raw))
            }
        }
    };
}

macro_rules! int_scalar {
    ($ty:ty, $raw:ty) => {
        impl crate::raw::Scalar for $ty {
            type Raw = $raw;
            fn to_raw(self) -> $raw {
                self.to_be_bytes()
            }

            fn from_raw(raw: $raw) -> $ty {
                Self::from_be_bytes(raw)
            }
        }
    };
}

int_scalar!(u8, [u8; 1]);
int_scalar!(i8, [u8; 1]);
int_scalar!(u16, [u8; 2]);
int_scalar!(i16, [u8; 2]);
int_scalar!(u32, [u8; 4]);
int_scalar!(i32, [u8; 4]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_prefix() {
        let bytes = [0xde, 0xad, 0xbe, 0xef];
        assert_eq!(u16::read(&bytes), Some(0xdead));
        assert_eq!(u32::read(&bytes), Some(0xdeadbeef));
        assert_eq!(u32::read(&bytes[1..]), None);
    }

    #[test]
    fn round_trip() {
        assert_eq!(i16::from_raw((-5i16).to_raw()), -5);
        assert_eq!(<u32 as ReadScalar>::RAW_BYTE_LEN, 4);
    }
}
