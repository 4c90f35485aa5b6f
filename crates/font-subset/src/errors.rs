//! Error types returned by this crate.

use core::{fmt, ops};

use crate::TableTag;

/// Kind of a font [`ParseError`].
#[derive(Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// Unexpected end of the font data.
    UnexpectedEof,
    /// Unexpected `sfnt` or `ttcf` version / magic.
    UnexpectedFontVersion,
    /// Missing required font table (e.g., `head`).
    MissingTable,
    /// No supported subtable in the `cmap` table.
    NoSupportedCmap,
    /// Range inferred from the table data is out of bounds.
    RangeOutOfBounds {
        /// Inferred range.
        range: ops::Range<usize>,
        /// Length of the indexed data.
        len: usize,
    },
    /// Unexpected version of a table.
    UnexpectedTableVersion {
        /// Actual table version.
        version: u32,
    },
    /// Unexpected table length.
    UnexpectedTableLen {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
    /// Unexpected table format (e.g., for a `cmap` subtable).
    UnexpectedTableFormat {
        /// Actual format.
        format: u16,
    },
    /// Glyph index / `loca` range inferred from `glyf` data is out of bounds.
    MissingGlyph {
        /// Requested glyph index.
        glyph_idx: u16,
    },
}

/// Errors that can occur when parsing a TrueType [`Font`](crate::Font) or
/// [`FontCollection`](crate::FontCollection).
#[derive(Debug)]
#[non_exhaustive]
pub struct ParseError {
    pub(crate) kind: ParseErrorKind,
    pub(crate) offset: usize,
    pub(crate) table: Option<TableTag>,
}

impl ParseError {
    pub(crate) fn missing_table(tag: TableTag) -> Self {
        Self {
            kind: ParseErrorKind::MissingTable,
            offset: 0,
            table: Some(tag),
        }
    }

    /// Gets the error kind.
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// Gets the table this error relates to, if known.
    pub fn table(&self) -> Option<TableTag> {
        self.table
    }

    /// Gets the byte offset in the font (or table) data at which the error was detected.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(table) = self.table {
            write!(formatter, "error parsing `{table}` table at offset {}: ", self.offset)?;
        } else {
            write!(formatter, "error parsing font data at offset {}: ", self.offset)?;
        }
        match &self.kind {
            ParseErrorKind::UnexpectedEof => formatter.write_str("unexpected end of data"),
            ParseErrorKind::UnexpectedFontVersion => {
                formatter.write_str("unexpected font version / magic number")
            }
            ParseErrorKind::MissingTable => formatter.write_str("missing required table"),
            ParseErrorKind::NoSupportedCmap => {
                formatter.write_str("no supported `cmap` subtable found")
            }
            ParseErrorKind::RangeOutOfBounds { range, len } => {
                write!(formatter, "range {range:?} is out of bounds for data of length {len}")
            }
            ParseErrorKind::UnexpectedTableVersion { version } => {
                write!(formatter, "unexpected table version {version:#x}")
            }
            ParseErrorKind::UnexpectedTableLen { expected, actual } => {
                write!(formatter, "unexpected table length: expected {expected}, got {actual}")
            }
            ParseErrorKind::UnexpectedTableFormat { format } => {
                write!(formatter, "unexpected subtable format {format}")
            }
            ParseErrorKind::MissingGlyph { glyph_idx } => {
                write!(formatter, "glyph {glyph_idx} is out of range")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

/// Errors that can occur when mapping a character to a glyph via `char_to_glyph`.
#[derive(Debug)]
#[non_exhaustive]
pub enum MapError {
    /// Character code point does not fit the range supported by the active `cmap` subtable.
    CharTooLarge,
    /// `idRangeOffset`-based lookup pointed outside of `glyphIdArray`.
    InvalidOffset,
}

impl fmt::Display for MapError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CharTooLarge => formatter.write_str("character code point is too large for the active cmap subtable"),
            Self::InvalidOffset => formatter.write_str("idRangeOffset lookup pointed outside of glyphIdArray"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MapError {}

impl From<MapError> for ParseError {
    fn from(err: MapError) -> Self {
        Self {
            kind: match err {
                MapError::CharTooLarge => ParseErrorKind::UnexpectedTableFormat { format: 0 },
                MapError::InvalidOffset => ParseErrorKind::RangeOutOfBounds { range: 0..0, len: 0 },
            },
            offset: 0,
            table: None,
        }
    }
}

/// Errors that can occur while subsetting a [`Font`](crate::Font).
#[derive(Debug)]
#[non_exhaustive]
pub enum SubsetError {
    /// Parsing the parent font or one of its glyphs failed.
    Parse(ParseError),
    /// A compound glyph's components form a cycle, which is not valid TrueType data.
    CyclicCompound {
        /// The glyph index at which the cycle was detected.
        glyph_idx: u16,
    },
}

impl fmt::Display for SubsetError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(formatter, "{err}"),
            Self::CyclicCompound { glyph_idx } => {
                write!(formatter, "compound glyph {glyph_idx} refers back to itself transitively")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SubsetError {}

impl From<ParseError> for SubsetError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}
