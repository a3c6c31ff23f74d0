//! Table version fields.

/// A packed 32-bit value with major and minor version numbers.
///
/// This is a legacy encoding used by a handful of tables, `post` among
/// them: the major version lives in the high 16 bits and the minor
/// version in the top nibble of the low 16 bits.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version16Dot16(u32);

impl Version16Dot16 {
    /// Version 1.0.
    pub const VERSION_1_0: Version16Dot16 = Version16Dot16::new(1, 0);

    /// Version 2.0.
    pub const VERSION_2_0: Version16Dot16 = Version16Dot16::new(2, 0);

    /// Version 2.5.
    pub const VERSION_2_5: Version16Dot16 = Version16Dot16::new(2, 5);

    /// Version 3.0.
    pub const VERSION_3_0: Version16Dot16 = Version16Dot16::new(3, 0);

    /// Create a new version with the provided major and minor parts.
    ///
    /// The minor version must be in the range 0..=9.
    ///
    /// # Panics
    ///
    /// Panics if `minor > 9`.
    pub const fn new(major: u16, minor: u16) -> Self {
        assert!(minor < 10, "minor version must be in the range [0, 9)");
        let version = (major as u32) << 16 | (minor as u32) << 12;
        Version16Dot16(version)
    }

    /// Return the separate major & minor version numbers.
    pub const fn to_major_minor(self) -> (u16, u16) {
        let major = (self.0 >> 16) as u16;
        let minor = ((self.0 & 0xFFFF) >> 12) as u16;
        (major, minor)
    }

    /// The raw packed value.
    pub const fn to_bits(self) -> u32 {
        self.0
    }
}

impl std::fmt::Debug for Version16Dot16 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Version16Dot16({:08x})", self.0)
    }
}

impl std::fmt::Display for Version16Dot16 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (major, minor) = self.to_major_minor();
        write!(f, "{major}.{minor}")
    }
}

crate::newtype_scalar!(Version16Dot16, [u8; 4]);

/// A version encoded as two contiguous 16-bit numbers.
///
/// This is the encoding used by the layout tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MajorMinor {
    /// The major version number.
    pub major: u16,
    /// The minor version number.
    pub minor: u16,
}

impl MajorMinor {
    /// Version 1.0.
    pub const VERSION_1_0: MajorMinor = MajorMinor::new(1, 0);

    /// Version 1.1.
    pub const VERSION_1_1: MajorMinor = MajorMinor::new(1, 1);

    /// Create a new version with major and minor parts.
    pub const fn new(major: u16, minor: u16) -> Self {
        MajorMinor { major, minor }
    }
}

impl crate::Scalar for MajorMinor {
    type Raw = [u8; 4];

    fn from_raw(raw: Self::Raw) -> Self {
        let major = u16::from_be_bytes([raw[0], raw[1]]);
        let minor = u16::from_be_bytes([raw[2], raw[3]]);
        MajorMinor { major, minor }
    }

    fn to_raw(self) -> Self::Raw {
        let [a, b] = self.major.to_be_bytes();
        let [c, d] = self.minor.to_be_bytes();
        [a, b, c, d]
    }
}

impl std::fmt::Display for MajorMinor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
