//! The OpenType tables this crate understands.

pub mod cmap;
pub mod fvar;
pub mod gpos;
pub mod gsub;
pub mod layout;
pub mod post;
