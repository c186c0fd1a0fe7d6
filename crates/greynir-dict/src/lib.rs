//! The compressed morphological dictionary (§4.1): a memory-mapped
//! radix trie mapping Latin-1 word forms to BÍN-style
//! `(stem, word_class, subclass, inflection_tag)` readings.
//!
//! The trie and its on-disk layout are an implementation detail of
//! [`builder::build`] (used offline, to produce the `.bin` file) and
//! [`Dict::open`] (used at parse time, to map it read-only); callers
//! outside this crate only need [`Dict`], [`DictReading`], and
//! [`DictError`].
//!
//! ```no_run
//! use greynir_dict::Dict;
//!
//! let dict = Dict::open("icelandic.bin").unwrap();
//! for reading in dict.lookup("kettir").unwrap() {
//!     println!("{} {} {}", reading.stem, reading.word_class, reading.inflection);
//! }
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod builder;
mod error;
mod layout;
mod reader;
mod trie;

pub use builder::DictEntry;
pub use error::DictError;
pub use reader::{Dict, DictReading};
