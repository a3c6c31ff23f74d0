//! Errors reported by the synthesis layer.

use thiserror::Error;

/// An error raised while building or reducing an encoding.
///
/// Missing glyphs, unusable lookups and unreadable optional tables are
/// not errors; they degrade the result and are logged. The variants here
/// are the conditions no caller should silently lose.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// More codes must survive than the table size allows.
    ///
    /// The table is left untouched when this is reported; the caller
    /// decides whether to retry with a larger limit.
    #[error("encoding needs {needed} codes but only {limit} fit")]
    Overflow {
        /// The number of codes that cannot be evicted.
        needed: usize,
        /// The size limit the table was asked to fit.
        limit: usize,
    },

    /// The encoding template was structurally unusable.
    #[error("unusable encoding template: {0}")]
    Template(&'static str),
}
