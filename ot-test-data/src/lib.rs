//! test data shared between the workspace crates.

pub mod bebuffer;
pub mod cmap;
pub mod fvar;
pub mod gpos;
pub mod gsub;
pub mod layout;
pub mod post;

/// The glyph ids of the small imaginary font the fixtures describe.
///
/// Every table module maps the same seven glyphs so fixtures can be
/// combined into one coherent font.
pub mod glyphs {
    pub const F: u16 = 1;
    pub const I: u16 = 2;
    pub const FI: u16 = 3;
    pub const FFI: u16 = 4;
    pub const L: u16 = 5;
    pub const A: u16 = 6;
    pub const V: u16 = 7;
}
