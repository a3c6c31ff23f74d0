//! GSUB tables substituting within the shared glyph set

use crate::bebuffer::BeBuffer;
use crate::{be_buffer, glyphs, layout};

/// A ligature lookup under `latn`/`liga` substituting `f f i` -> `ffi`
/// and `f i` -> `fi`.
pub fn ligatures() -> BeBuffer {
    ligatures_with_script(*b"latn")
}

/// The [`ligatures`] table registered under a different script tag.
pub fn ligatures_with_script(script: [u8; 4]) -> BeBuffer {
    let lookup = be_buffer! {
        4u16,               // lookup type: ligature
        0u16,               // lookup flag
        1u16,               // subtable count
        8u16                // subtable offset
    };
    layout::single_lookup_header(script, *b"liga")
        .extend(lookup.iter().copied())
        .extend(ligature_subst().iter().copied())
}

/// The [`ligatures`] lookup wrapped in an extension lookup.
pub fn extension_ligatures() -> BeBuffer {
    let lookup = be_buffer! {
        7u16,               // lookup type: extension
        0u16,               // lookup flag
        1u16,               // subtable count
        8u16,               // subtable offset
        // extension wrapper
        1u16,               // format
        4u16,               // wrapped lookup type
        8u32                // wrapped subtable offset
    };
    layout::single_lookup_header(*b"latn", *b"liga")
        .extend(lookup.iter().copied())
        .extend(ligature_subst().iter().copied())
}

/// A single substitution lookup under `latn`/`smcp` with a format 2
/// subtable mapping glyphs 1 and 2, then a format 1 one shifting
/// glyph 7 by 100.
pub fn singles() -> BeBuffer {
    let rest = be_buffer! {
        1u16,               // lookup type: single
        0u16,               // lookup flag
        2u16,               // subtable count
        [10u16, 28],        // subtable offsets
        // format 2: explicit substitutes
        2u16,               // subst format
        10u16,              // coverage offset
        2u16,               // glyph count
        [glyphs::L, glyphs::A], // substitutes
        // its coverage: f and i
        1u16, 2u16, [glyphs::F, glyphs::I],
        // format 1: delta
        1u16,               // subst format
        6u16,               // coverage offset
        100i16,             // glyph id delta
        // its coverage: v
        1u16, 1u16, (glyphs::V)
    };
    layout::single_lookup_header(*b"latn", *b"smcp").extend(rest.iter().copied())
}

/// A ligature substitution subtable with internal offsets only, shared
/// by the plain and extension fixtures.
fn ligature_subst() -> BeBuffer {
    be_buffer! {
        1u16,               // subst format
        28u16,              // coverage offset
        1u16,               // ligature set count
        8u16,               // ligature set offset
        // the ligature set for f
        2u16,               // ligature count
        [6u16, 14],         // ligature offsets
        // f + f + i -> ffi
        (glyphs::FFI), 3u16, [glyphs::F, glyphs::I],
        // f + i -> fi
        (glyphs::FI), 2u16, (glyphs::I),
        // coverage: f
        1u16, 1u16, (glyphs::F)
    }
}
