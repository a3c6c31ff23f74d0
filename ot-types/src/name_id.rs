//! Identifiers for entries in the name table.

/// An identifier for an entry in the name table.
///
/// Several tables refer to localized strings by carrying one of these;
/// this crate does not parse the name table itself, so the identifier is
/// surfaced as-is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameId(u16);

impl NameId {
    /// Create a new identifier from a raw value.
    pub const fn new(raw: u16) -> Self {
        NameId(raw)
    }

    /// The identifier as a u16.
    pub const fn to_u16(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for NameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

crate::newtype_scalar!(NameId, [u8; 2]);
