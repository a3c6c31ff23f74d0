//! GPOS tables kerning the shared glyph set

use crate::bebuffer::BeBuffer;
use crate::{be_buffer, glyphs, layout};

/// A pair positioning lookup under `latn`/`kern` with a format 1
/// subtable kerning `A L` by -40 and `A V` by -80.
pub fn pair_format1() -> BeBuffer {
    let lookup = be_buffer! {
        2u16,               // lookup type: pair positioning
        0u16,               // lookup flag
        1u16,               // subtable count
        8u16                // subtable offset
    };
    layout::single_lookup_header(*b"latn", *b"kern")
        .extend(lookup.iter().copied())
        .extend(pair_subst_format1().iter().copied())
}

/// A class-based format 2 subtable kerning `A V` by -80.
pub fn pair_format2() -> BeBuffer {
    let rest = be_buffer! {
        2u16,               // lookup type: pair positioning
        0u16,               // lookup flag
        1u16,               // subtable count
        8u16,               // subtable offset
        // pair positioning format 2
        2u16,               // pos format
        40u16,              // coverage offset
        0x0004u16,          // value format 1: x advance
        0u16,               // value format 2
        24u16,              // class def 1 offset
        32u16,              // class def 2 offset
        2u16,               // class 1 count
        2u16,               // class 2 count
        [0i16, 0, 0, -80],  // the class pair value matrix
        // class def 1: A in class 1
        1u16, (glyphs::A), 1u16, 1u16,
        // class def 2: V in class 1
        1u16, (glyphs::V), 1u16, 1u16,
        // coverage: A
        1u16, 1u16, (glyphs::A)
    };
    layout::single_lookup_header(*b"latn", *b"kern").extend(rest.iter().copied())
}

/// The [`pair_format1`] lookup wrapped in an extension lookup.
pub fn extension_pairs() -> BeBuffer {
    let lookup = be_buffer! {
        9u16,               // lookup type: extension
        0u16,               // lookup flag
        1u16,               // subtable count
        8u16,               // subtable offset
        // extension wrapper
        1u16,               // format
        2u16,               // wrapped lookup type
        8u32                // wrapped subtable offset
    };
    layout::single_lookup_header(*b"latn", *b"kern")
        .extend(lookup.iter().copied())
        .extend(pair_subst_format1().iter().copied())
}

/// A pair positioning format 1 subtable with internal offsets only.
fn pair_subst_format1() -> BeBuffer {
    be_buffer! {
        1u16,               // pos format
        22u16,              // coverage offset
        0x0004u16,          // value format 1: x advance
        0u16,               // value format 2
        1u16,               // pair set count
        12u16,              // pair set offset
        // the pair set for A
        2u16,               // pair value count
        (glyphs::L), (-40i16),
        (glyphs::V), (-80i16),
        // coverage: A
        1u16, 1u16, (glyphs::A)
    }
}
