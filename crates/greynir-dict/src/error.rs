use std::path::PathBuf;

/// Errors raised while opening or building a compressed dictionary file.
///
/// Once a [`crate::Dict`] is successfully mapped, lookups cannot fail
/// (§4.1): any malformed byte sequence is caught here, at open time.
#[derive(thiserror::Error, Debug)]
pub enum DictError {
    #[error("could not open dictionary file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dictionary file {path:?} has bad magic (expected {expected:?}, found {found:?})")]
    BadMagic {
        path: PathBuf,
        expected: [u8; 16],
        found: [u8; 16],
    },

    #[error("dictionary file {path:?} is truncated or malformed: {reason}")]
    Truncated { path: PathBuf, reason: String },

    #[error("alphabet of {count} bytes is too large to index in 7 bits (max 127)")]
    AlphabetOverflow { count: usize },

    #[error("word form contains a character outside Latin-1: {form:?}")]
    NotLatin1 { form: String },
}
