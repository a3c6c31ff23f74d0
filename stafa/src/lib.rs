//! Synthesis of legacy 8-bit encodings from OpenType layout rules.
//!
//! Stafa takes an encoding template naming up to 256 glyphs and a
//! font's `cmap`, `GSUB`, `GPOS` and `post` tables, applies the font's
//! substitution rules to the template's code assignments, reduces the
//! resulting ligatures to the pairwise form legacy consumers can
//! express, and reports pair kerning between the final codes.
//!
//! The crate never touches files: callers hand in template text and
//! raw table bytes (located however they like) and get a table of code
//! to glyph assignments plus ligature and kern lists back. Table
//! parsing lives in [`ot-read`](read), re-exported here as `read`.
//!
//! The usual entry points are [`DvipsEncoding::parse`], [`Font::new`]
//! and [`synthesize()`].

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Expose our underlying parser crate.
pub extern crate ot_read as read;

pub mod dvips;
pub mod encoding;
pub mod font;
pub mod synthesize;

mod error;
mod names;

pub use dvips::{DvipsEncoding, LigKern, LigOp, Suppression, TemplateDiagnostic};
pub use encoding::{Code, Glyph, GsubEncoding, LigatureRecord};
pub use error::EncodeError;
pub use font::{Diagnostic, Font, TableSet};
pub use names::glyphname_unicode;
pub use synthesize::{synthesize, CodeKern, LayoutQuery, Synthesis, SynthesisOptions};
