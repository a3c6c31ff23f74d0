//! Common [scalar data types][data types] used in OpenType tables
//!
//! [data types]: https://docs.microsoft.com/en-us/typography/opentype/spec/otff#data-types

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(all(not(feature = "std"), not(test)))]
#[macro_use]
extern crate core as std;

mod fixed;
mod glyph_id;
mod name_id;
mod raw;
mod tag;
mod version;

pub use fixed::Fixed;
pub use glyph_id::GlyphId;
pub use name_id::NameId;
pub use raw::{ReadScalar, Scalar};
pub use tag::{InvalidTag, Tag};
pub use version::{MajorMinor, Version16Dot16};
