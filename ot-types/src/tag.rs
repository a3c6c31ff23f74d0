//! Four-byte table and feature identifiers.

use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

/// An OpenType tag.
///
/// A tag is a 4-byte array where each byte is in the printable ASCII range
/// `(0x20..=0x7E)`. Tags identify tables, scripts, language systems and
/// features.
///
/// We do not strictly enforce the constraint during parsing, as invalid tags
/// exist in real fonts and need to be representable; use [`Tag::new_checked`]
/// when constructing a tag from untrusted input.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Tag([u8; 4]);

impl Tag {
    /// Construct a `Tag` from raw bytes.
    ///
    /// This does not perform any validation; use [`Tag::new_checked`] for a
    /// constructor that validates input.
    pub const fn new(src: &[u8; 4]) -> Tag {
        Tag(*src)
    }

    /// Attempt to create a `Tag` from raw bytes.
    ///
    /// The slice must contain between 1 and 4 bytes, each in the printable
    /// ascii range (`0x20..=0x7E`), with no non-space byte after the first
    /// space. Input shorter than four bytes is padded with spaces.
    pub const fn new_checked(src: &[u8]) -> Result<Self, InvalidTag> {
        if src.is_empty() || src.len() > 4 {
            return Err(InvalidTag::InvalidLength(src.len()));
        }
        let mut raw = [0x20; 4];
        let mut i = 0;
        let mut seen_space = false;
        while i < src.len() {
            let byte = match src[i] {
                byte @ 0x20 if i == 0 => return Err(InvalidTag::InvalidByte { pos: i, byte }),
                byte @ 0..=0x1F | byte @ 0x7f.. => {
                    return Err(InvalidTag::InvalidByte { pos: i, byte })
                }
                byte @ 0x21..=0x7e if seen_space => {
                    return Err(InvalidTag::InvalidByte { pos: i, byte })
                }
                byte => byte,
            };

            seen_space |= byte == 0x20;

            raw[i] = byte;
            i += 1;
        }
        Ok(Tag(raw))
    }

    /// Create a tag from raw big-endian bytes, without validation.
    pub const fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Return the memory representation of this tag.
    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0
    }
}

/// An error for bytes that do not describe a valid tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvalidTag {
    /// The input was empty or longer than four bytes.
    InvalidLength(usize),
    /// A byte outside the printable ascii range, or a non-space byte after
    /// a space.
    InvalidByte {
        /// The position of the offending byte.
        pos: usize,
        /// The offending byte.
        byte: u8,
    },
}

impl crate::Scalar for Tag {
    type Raw = [u8; 4];

    fn from_raw(raw: Self::Raw) -> Self {
        Tag(raw)
    }

    fn to_raw(self) -> Self::Raw {
        self.0
    }
}

impl FromStr for Tag {
    type Err = InvalidTag;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Tag::new_checked(src.as_bytes())
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut bytes = self.0;
        // Replace unprintable bytes so a bad tag cannot mangle log output.
        for byte in bytes.iter_mut() {
            if !byte.is_ascii_graphic() && *byte != b' ' {
                *byte = b'?';
            }
        }
        Display::fmt(
            std::str::from_utf8(&bytes).map_err(|_| std::fmt::Error)?,
            f,
        )
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{self}\"")
    }
}

impl Display for InvalidTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidTag::InvalidByte { pos, byte } => {
                write!(f, "invalid byte 0x{byte:02X} at position {pos}")
            }
            InvalidTag::InvalidLength(len) => write!(f, "invalid length ({len})"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidTag {}

impl PartialEq<&[u8; 4]> for Tag {
    fn eq(&self, other: &&[u8; 4]) -> bool {
        &self.0 == *other
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test() {
        assert!(Tag::new_checked(b"head").is_ok());
        assert!(Tag::new_checked(b"yolo!").is_err());
        assert_eq!(Tag::new_checked(b"BE"), Ok(Tag::new(b"BE  ")));
    }

    #[test]
    fn spaces() {
        assert!(Tag::new_checked(b" BE").is_err());
        assert!(Tag::new_checked(b"B E").is_err());
        assert!(Tag::new_checked(b"BE E").is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Tag::new(b"cmap").to_string(), "cmap");
        assert_eq!(Tag::from_be_bytes([0x02, b'o', b'k', 0x7f]).to_string(), "?ok?");
    }

    #[test]
    fn parsing() {
        assert_eq!("GSUB".parse(), Ok(Tag::new(b"GSUB")));
        assert_eq!(Tag::new(b"liga"), "liga");
        assert_eq!(Tag::new(b"liga"), b"liga");
    }
}
