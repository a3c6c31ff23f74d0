//! Reading OpenType tables
//!
//! This crate provides memory-safe, allocation-light parsing of the small
//! set of font tables needed to synthesize legacy 8-bit encodings: the
//! character map, the substitution and positioning rules, the variation
//! axes and the glyph names.
//!
//! Parsers follow a validate-at-construction discipline: [`TableRead::read`]
//! checks every offset, count and stride a table declares, and either
//! returns a view whose accessors cannot fail on malformed data or fails
//! with a typed [`ReadError`] and no partially valid object. The underlying
//! bytes are borrowed, never copied.
//!
//! This crate does no I/O and knows nothing about font containers; callers
//! extract each table's byte range themselves and wrap it in a
//! [`TableData`].

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Public re-export of the ot-types crate.
pub extern crate ot_types as types;

mod array;
mod read;
mod table_data;

pub mod tables;

pub use array::ScalarArray;
pub use read::{ReadError, TableRead};
pub use table_data::TableData;
