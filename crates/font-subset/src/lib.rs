//! TrueType font parsing and subsetting.
//!
//! This crate parses TrueType (`sfnt`) faces — including faces bundled in a TrueType
//! Collection (`ttcf`) — into a structured [`Font`], exposes the metadata and glyph
//! metrics needed to lay out text, and can produce a minimal, re-subsetted TrueType
//! byte stream containing only the glyphs a given set of characters transitively need.
//!
//! OpenType/CFF outlines, hinting execution, glyph rendering, and WOFF/WOFF2
//! (de)compression are outside the scope of this crate.
#![cfg_attr(not(feature = "std"), no_std)]

mod alloc {
    #[cfg(not(feature = "std"))]
    extern crate alloc as std;

    pub(crate) use std::{
        collections::{BTreeMap, BTreeSet},
        string::String,
        vec,
        vec::Vec,
    };
}

mod errors;
mod font;
mod subset;
#[cfg(test)]
mod tests;
mod write;

pub use crate::{
    errors::{MapError, ParseError, ParseErrorKind, SubsetError},
    font::{Font, FontCollection, MacStyle, TableTag},
    subset::FontSubset,
};
