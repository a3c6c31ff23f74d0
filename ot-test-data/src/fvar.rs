//! fvar tables describing a weight axis

use ot_types::{Fixed, Tag};

use crate::be_buffer;
use crate::bebuffer::BeBuffer;

/// A single `wght` axis from 100 to 900, default 400, with nine named
/// instances at each weight and name ids rising from 258.
pub fn wght() -> BeBuffer {
    let mut buf = be_buffer! {
        1u16, 0u16,         // version 1.0
        16u16,              // axes array offset
        2u16,               // reserved
        1u16,               // axis count
        20u16,              // axis record size
        9u16,               // instance count
        8u16,               // instance record size
        // the weight axis
        (Tag::new(b"wght")),
        (Fixed::from_f64(100.0)),
        (Fixed::from_f64(400.0)),
        (Fixed::from_f64(900.0)),
        0u16,               // flags
        257u16              // axis name id
    };
    for i in 0..9u16 {
        buf = buf
            .push(258 + i) // subfamily name id
            .push(0u16) // flags
            .push(Fixed::from_f64(100.0 * (i + 1) as f64));
    }
    buf
}

/// A header declaring no axes at all.
pub fn no_axes() -> BeBuffer {
    be_buffer! {
        1u16, 0u16,         // version 1.0
        16u16,              // axes array offset
        2u16,               // reserved
        0u16,               // axis count
        20u16,              // axis record size
        0u16,               // instance count
        4u16                // instance record size
    }
}
