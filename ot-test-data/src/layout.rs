//! the common front matter of GSUB and GPOS fixtures

use ot_types::Tag;

use crate::be_buffer;
use crate::bebuffer::BeBuffer;

/// A layout table header whose one script and one feature select the
/// single lookup at index 0.
///
/// The lookup list sits at offset 44 with its lookup at offset 48; the
/// caller appends the lookup table and its subtables.
pub fn single_lookup_header(script: [u8; 4], feature: [u8; 4]) -> BeBuffer {
    be_buffer! {
        1u16, 0u16,         // version 1.0
        10u16,              // script list offset
        30u16,              // feature list offset
        44u16,              // lookup list offset
        // script list
        1u16,               // script count
        (Tag::new(&script)),
        8u16,               // script offset
        // the script
        4u16,               // default lang sys offset
        0u16,               // lang sys count
        // default lang sys
        0u16,               // lookup order, reserved
        0xFFFFu16,          // no required feature
        1u16,               // feature index count
        0u16,               // feature index
        // feature list
        1u16,               // feature count
        (Tag::new(&feature)),
        8u16,               // feature offset
        // the feature
        0u16,               // feature params
        1u16,               // lookup index count
        0u16,               // lookup index
        // lookup list
        1u16,               // lookup count
        4u16                // lookup offset
    }
}
