//! cmap tables mapping the shared glyph set

use crate::bebuffer::BeBuffer;
use crate::{be_buffer, glyphs};

/// A format 4 subtable under a Windows BMP record.
///
/// Maps `f`, `i`, `l`, `A` and `V` to the shared glyph ids, one segment
/// per character.
pub fn basic() -> BeBuffer {
    be_buffer! {
        0u16,                   // version
        1u16,                   // numTables
        3u16, 1u16, 12u32,      // windows BMP record

        // format 4 subtable
        4u16,                   // format
        64u16,                  // length
        0u16,                   // language
        12u16,                  // segCountX2, 6 segments
        8u16,                   // searchRange
        2u16,                   // entrySelector
        4u16,                   // rangeShift
        [0x41u16, 0x56, 0x66, 0x69, 0x6C, 0xFFFF], // endCode
        0u16,                   // reservedPad
        [0x41u16, 0x56, 0x66, 0x69, 0x6C, 0xFFFF], // startCode
        [-59i16, -79, -101, -103, -103, 1],        // idDelta
        [0u16, 0, 0, 0, 0, 0]   // idRangeOffset
    }
}

/// A format 12 subtable alongside a format 4 one.
///
/// The full repertoire record carries the BMP mappings from [`basic`]
/// plus four supplementary-plane codepoints starting at U+1D400.
pub fn format12() -> BeBuffer {
    let header = be_buffer! {
        0u16,                   // version
        2u16,                   // numTables
        3u16, 1u16, 20u32,      // windows BMP record
        3u16, 10u16, 84u32      // windows full repertoire record
    };
    let subtable = be_buffer! {
        12u16,                  // format
        0u16,                   // reserved
        40u32,                  // length
        0u32,                   // language
        2u32,                   // numGroups
        // 'f' keeps its BMP mapping
        [0x66u32, 0x66, glyphs::F as u32],
        // four mathematical letters mapped to glyphs 100..=103
        [0x1D400u32, 0x1D403, 100]
    };
    header
        // the format 4 subtable, minus the cmap header
        .extend(basic()[12..].iter().copied())
        .extend(subtable.iter().copied())
}

/// A format 0 subtable under a Unicode platform record.
pub fn format0() -> BeBuffer {
    let mut glyph_ids = [0u8; 256];
    glyph_ids[b'f' as usize] = glyphs::F as u8;
    glyph_ids[b'i' as usize] = glyphs::I as u8;
    glyph_ids[b'l' as usize] = glyphs::L as u8;
    glyph_ids[b'A' as usize] = glyphs::A as u8;
    glyph_ids[b'V' as usize] = glyphs::V as u8;
    let buf = be_buffer! {
        0u16,                   // version
        1u16,                   // numTables
        0u16, 3u16, 12u32,      // unicode BMP record

        0u16,                   // format
        262u16,                 // length
        0u16                    // language
    };
    buf.extend(glyph_ids)
}

/// A table whose only record points past the end of the data.
pub fn truncated_record() -> BeBuffer {
    be_buffer! {
        0u16,                   // version
        1u16,                   // numTables
        3u16, 1u16, 999u32      // record pointing nowhere
    }
}
