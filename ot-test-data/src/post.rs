//! post tables naming glyphs

use crate::be_buffer;
use crate::bebuffer::BeBuffer;

#[rustfmt::skip]
pub static SIMPLE: &[u8] = &[
    0x00, 0x02, 0x00, 0x00, // version 2.0
    0x00, 0x00, 0x00, 0x00, // italic angle
    0xFF, 0x9C,             // underlinePosition -100
    0x00, 0x30,             // underlineThickness 48
    0x00, 0x00, 0x00, 0x00, // fixedpitch
    0x00, 0x00, 0x00, 0x00, // min/max mem:
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x0A,             // numGlyphs 10
                            // glyph name index:
    0x00, 0x00,             // glyph 0 -> name 0 ('.notdef')
    0x00, 0x00,             // glyph 1 -> name 0 again
    0x00, 0x03,             // glyph 2 -> name 3 ('space')
    0x00, 0x04,             // glyph 3 -> name 4 ('exclam')
    0x00, 0x05,             // glyph 4 -> name 5 ('quotedbl')
    0x00, 0x07,             // glyph 5 -> name 7 ('dollar')
    0x00, 0x08,             // glyph 6 -> name 8 ('percent')
    0x01, 0x02,             // glyph 7 -> name 258, the first custom one
    0x01, 0x03,             // glyph 8 -> name 259
    0x01, 0x04,             // glyph 9 -> name 260
    0x05, 0x61, 0x6C, 0x70, 0x68, 0x61, // 5, a l p h a
    0x04, 0x62, 0x65, 0x74, 0x61,       // 4, b e t a
    0x05, 0x67, 0x61, 0x6D, 0x6D, 0x61, // 5, g a m m a
];

/// A version 1.0 table carrying only the standard Macintosh names.
pub fn version_1() -> BeBuffer {
    header(0x00010000)
}

/// A version 3.0 table, which names nothing.
pub fn version_3() -> BeBuffer {
    header(0x00030000)
}

/// A table with the unsupported version 2.5.
pub fn version_2_5() -> BeBuffer {
    header(0x00025000)
}

fn header(version: u32) -> BeBuffer {
    be_buffer! {
        (version),          // version
        0u32,               // italic angle
        (-100i16),          // underline position
        48i16,              // underline thickness
        0u32,               // fixed pitch
        [0u32, 0, 0, 0]     // min/max memory usage
    }
}

/// A version 2.0 table naming the shared glyph set.
pub fn ligature_names() -> BeBuffer {
    let mut buf = header(0x00020000)
        .push(8u16) // numGlyphs
        .extend([0u16, 258, 259, 260, 261, 262, 263, 264]);
    for name in ["f", "i", "fi", "ffi", "l", "A", "V"] {
        buf = buf.push(name.len() as u8).extend(name.bytes());
    }
    buf
}
