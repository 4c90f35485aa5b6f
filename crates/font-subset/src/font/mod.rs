//! TrueType parsing logic.

use core::{fmt, ops};

pub(crate) use self::{
    cmap::CmapTable,
    glyph::{Glyph, GlyphComponent, GlyphComponentArgs, GlyphWithMetrics, TransformData},
    kern::KernTable,
    name::NameTable,
};
pub use self::collection::FontCollection;
use crate::{
    alloc::{BTreeSet, String, Vec},
    errors::{MapError, ParseError, ParseErrorKind, SubsetError},
};

mod cmap;
mod collection;
mod glyph;
mod kern;
mod name;

/// A 4-byte TrueType table tag (e.g. `cmap`, `head`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableTag(pub(crate) [u8; 4]);

impl TableTag {
    pub(crate) const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Returns the raw 4 bytes of this tag.
    #[must_use]
    pub fn as_bytes(self) -> [u8; 4] {
        self.0
    }
}

impl fmt::Debug for TableTag {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "TableTag({self})")
    }
}

impl fmt::Display for TableTag {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.0 {
            if byte.is_ascii_graphic() || byte == b' ' {
                write!(formatter, "{}", byte as char)?;
            } else {
                write!(formatter, "\\x{byte:02x}")?;
            }
        }
        Ok(())
    }
}

/// A length-scoped, checked big-endian byte cursor used to decode every TrueType table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cursor<'a> {
    pub(crate) bytes: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn err(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            offset: self.offset,
            table: None,
        }
    }

    pub(crate) fn skip(&mut self, n: usize) -> Result<(), ParseError> {
        if self.bytes.len() < n {
            return Err(self.err(ParseErrorKind::UnexpectedEof));
        }
        self.bytes = &self.bytes[n..];
        self.offset += n;
        Ok(())
    }

    pub(crate) fn read_byte_array<const N: usize>(&mut self) -> Result<[u8; N], ParseError> {
        if self.bytes.len() < N {
            return Err(self.err(ParseErrorKind::UnexpectedEof));
        }
        let (head, tail) = self.bytes.split_at(N);
        self.bytes = tail;
        self.offset += N;
        Ok(head.try_into().unwrap())
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16, ParseError> {
        self.read_byte_array::<2>().map(u16::from_be_bytes)
    }

    pub(crate) fn read_i16(&mut self) -> Result<i16, ParseError> {
        self.read_byte_array::<2>().map(i16::from_be_bytes)
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32, ParseError> {
        self.read_byte_array::<4>().map(u32::from_be_bytes)
    }

    pub(crate) fn read_u16_checked<T>(
        &mut self,
        check: impl FnOnce(u16) -> Result<T, ParseErrorKind>,
    ) -> Result<T, ParseError> {
        let offset = self.offset;
        let value = self.read_u16()?;
        check(value).map_err(|kind| ParseError {
            kind,
            offset,
            table: None,
        })
    }

    pub(crate) fn read_u32_checked<T>(
        &mut self,
        check: impl FnOnce(u32) -> Result<T, ParseErrorKind>,
    ) -> Result<T, ParseError> {
        let offset = self.offset;
        let value = self.read_u32()?;
        check(value).map_err(|kind| ParseError {
            kind,
            offset,
            table: None,
        })
    }

    /// Splits off the next `n` bytes as a sub-cursor, advancing past them.
    pub(crate) fn split_at(&mut self, n: usize) -> Result<Cursor<'a>, ParseError> {
        if self.bytes.len() < n {
            return Err(self.err(ParseErrorKind::UnexpectedEof));
        }
        let (head, tail) = self.bytes.split_at(n);
        let sub = Cursor {
            bytes: head,
            offset: self.offset,
        };
        self.bytes = tail;
        self.offset += n;
        Ok(sub)
    }

    /// Shrinks this cursor to `range`, relative to its current position.
    pub(crate) fn range(self, range: ops::Range<usize>) -> Result<Cursor<'a>, ParseError> {
        let len = self.bytes.len();
        let bytes = self.bytes.get(range.clone()).ok_or_else(|| {
            self.err(ParseErrorKind::RangeOutOfBounds {
                range: range.clone(),
                len,
            })
        })?;
        Ok(Cursor {
            bytes,
            offset: self.offset + range.start,
        })
    }
}

/// Bits of the `head` table's `macStyle` field, per the canonical OpenType bit assignment.
///
/// (The font family this crate's tables were originally modeled on has a known decoder bug
/// that reads bit 0 for both `bold` and `italic`; this type uses the correct, distinct bits.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MacStyle {
    /// Bit 0.
    pub bold: bool,
    /// Bit 1.
    pub italic: bool,
    /// Bit 2.
    pub underline: bool,
    /// Bit 3.
    pub outline: bool,
    /// Bit 4.
    pub shadow: bool,
    /// Bit 5.
    pub condensed: bool,
    /// Bit 6.
    pub extended: bool,
}

impl MacStyle {
    fn from_bits(bits: u16) -> Self {
        Self {
            bold: bits & (1 << 0) != 0,
            italic: bits & (1 << 1) != 0,
            underline: bits & (1 << 2) != 0,
            outline: bits & (1 << 3) != 0,
            shadow: bits & (1 << 4) != 0,
            condensed: bits & (1 << 5) != 0,
            extended: bits & (1 << 6) != 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct HheaTable<'a> {
    pub(crate) raw: &'a [u8],
    pub(crate) number_of_h_metrics: u16,
    pub(crate) ascender: i16,
    pub(crate) descender: i16,
    pub(crate) line_gap: i16,
}

impl<'a> HheaTable<'a> {
    pub(crate) const EXPECTED_LEN: usize = 36;

    fn parse(bytes: &'a [u8]) -> Result<Self, ParseError> {
        if bytes.len() != Self::EXPECTED_LEN {
            return Err(ParseError {
                kind: ParseErrorKind::UnexpectedTableLen {
                    expected: Self::EXPECTED_LEN,
                    actual: bytes.len(),
                },
                offset: 0,
                table: Some(Font::HHEA_TAG),
            });
        }
        let read_i16 = |at: usize| i16::from_be_bytes([bytes[at], bytes[at + 1]]);
        let read_u16 = |at: usize| u16::from_be_bytes([bytes[at], bytes[at + 1]]);
        Ok(Self {
            raw: bytes,
            ascender: read_i16(4),
            descender: read_i16(6),
            line_gap: read_i16(8),
            number_of_h_metrics: read_u16(Self::EXPECTED_LEN - 2),
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct HmtxTable<'a> {
    raw: &'a [u8],
    number_of_h_metrics: u16,
}

impl HmtxTable<'_> {
    fn advance_and_lsb(&self, glyph_idx: u16) -> Result<(u16, i16), ParseError> {
        let at = |offset: usize, len: usize| {
            self.raw
                .get(offset..offset + len)
                .ok_or_else(|| ParseError {
                    kind: ParseErrorKind::UnexpectedEof,
                    offset,
                    table: Some(Font::HMTX_TAG),
                })
        };
        if glyph_idx < self.number_of_h_metrics {
            let offset = usize::from(glyph_idx) * 4;
            let bytes = at(offset, 4)?;
            let advance = u16::from_be_bytes([bytes[0], bytes[1]]);
            let lsb = i16::from_be_bytes([bytes[2], bytes[3]]);
            Ok((advance, lsb))
        } else {
            let advance_offset = usize::from(self.number_of_h_metrics - 1) * 4;
            let advance_bytes = at(advance_offset, 2)?;
            let advance = u16::from_be_bytes([advance_bytes[0], advance_bytes[1]]);

            let lsb_offset = usize::from(self.number_of_h_metrics) * 4
                + usize::from(glyph_idx - self.number_of_h_metrics) * 2;
            let lsb_bytes = at(lsb_offset, 2)?;
            let lsb = i16::from_be_bytes([lsb_bytes[0], lsb_bytes[1]]);
            Ok((advance, lsb))
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum LocaFormat {
    Short,
    Long,
}

impl LocaFormat {
    const fn bytes_per_offset(self) -> usize {
        match self {
            Self::Short => 2,
            Self::Long => 4,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct LocaTable<'a> {
    format: LocaFormat,
    bytes: &'a [u8],
}

impl<'a> LocaTable<'a> {
    fn new(format: LocaFormat, glyph_count: u16, bytes: &'a [u8]) -> Result<Self, ParseError> {
        let expected_len = format.bytes_per_offset() * (usize::from(glyph_count) + 1);
        if bytes.len() != expected_len {
            Err(ParseError {
                kind: ParseErrorKind::UnexpectedTableLen {
                    expected: expected_len,
                    actual: bytes.len(),
                },
                offset: 0,
                table: Some(Font::LOCA_TAG),
            })
        } else {
            Ok(Self { format, bytes })
        }
    }

    fn glyph_range(&self, glyph_idx: u16) -> Result<ops::Range<usize>, ParseError> {
        let glyph_idx = usize::from(glyph_idx);
        let mut cursor = Cursor::new(self.bytes);
        Ok(match self.format {
            LocaFormat::Short => {
                cursor.skip(glyph_idx * 2)?;
                let start = usize::from(cursor.read_u16()?) * 2;
                let end = usize::from(cursor.read_u16()?) * 2;
                start..end
            }
            LocaFormat::Long => {
                cursor.skip(glyph_idx * 4)?;
                let start = cursor.read_u32()? as usize;
                let end = cursor.read_u32()? as usize;
                start..end
            }
        })
    }
}

/// A single parsed TrueType face.
///
/// Borrows from the byte slice it was parsed from; holds no file handle or other OS resource.
#[derive(Debug, Clone)]
pub struct Font<'a> {
    pub(crate) cmap: CmapTable<'a>,
    pub(crate) head: &'a [u8],
    pub(crate) hhea: HheaTable<'a>,
    pub(crate) hmtx: HmtxTable<'a>,
    pub(crate) maxp: &'a [u8],
    pub(crate) name: NameTable<'a>,
    pub(crate) name_bytes: &'a [u8],
    pub(crate) os2: &'a [u8],
    pub(crate) post: &'a [u8],
    pub(crate) loca: LocaTable<'a>,
    pub(crate) glyf: &'a [u8],
    pub(crate) kern: Option<KernTable>,
    pub(crate) cvt: Option<&'a [u8]>,
    pub(crate) fpgm: Option<&'a [u8]>,
    pub(crate) prep: Option<&'a [u8]>,
    pub(crate) gasp: Option<&'a [u8]>,
}

impl<'a> Font<'a> {
    pub(crate) const SNFT_VERSION: u32 = 0x_0001_0000;
    pub(crate) const CMAP_TAG: TableTag = TableTag::new(*b"cmap");
    pub(crate) const HEAD_TAG: TableTag = TableTag::new(*b"head");
    pub(crate) const HHEA_TAG: TableTag = TableTag::new(*b"hhea");
    pub(crate) const HMTX_TAG: TableTag = TableTag::new(*b"hmtx");
    pub(crate) const MAXP_TAG: TableTag = TableTag::new(*b"maxp");
    pub(crate) const NAME_TAG: TableTag = TableTag::new(*b"name");
    pub(crate) const OS2_TAG: TableTag = TableTag::new(*b"OS/2");
    pub(crate) const POST_TAG: TableTag = TableTag::new(*b"post");
    pub(crate) const LOCA_TAG: TableTag = TableTag::new(*b"loca");
    pub(crate) const GLYF_TAG: TableTag = TableTag::new(*b"glyf");
    pub(crate) const KERN_TAG: TableTag = TableTag::new(*b"kern");
    pub(crate) const CVT_TAG: TableTag = TableTag::new(*b"cvt ");
    pub(crate) const FPGM_TAG: TableTag = TableTag::new(*b"fpgm");
    pub(crate) const PREP_TAG: TableTag = TableTag::new(*b"prep");
    pub(crate) const GASP_TAG: TableTag = TableTag::new(*b"gasp");

    /// Offset of `checksumAdjustment` within the `head` table.
    pub(crate) const HEAD_CHECKSUM_OFFSET: usize = 8;
    /// Value the whole-file checksum must equal once `checksumAdjustment` is patched in.
    pub(crate) const SFNT_CHECKSUM: u32 = 0xB1B0_AFBA;

    /// Parses a single face starting at the beginning of `bytes`.
    ///
    /// For TrueType Collections, use [`FontCollection::new`] instead.
    pub fn new(bytes: &'a [u8]) -> Result<Self, ParseError> {
        Self::parse_at(bytes, 0)
    }

    pub(crate) fn parse_at(font_bytes: &'a [u8], base_offset: usize) -> Result<Self, ParseError> {
        let face_bytes = font_bytes
            .get(base_offset..)
            .ok_or(ParseError {
                kind: ParseErrorKind::UnexpectedEof,
                offset: base_offset,
                table: None,
            })?;
        let mut cursor = Cursor::new(face_bytes);
        let snft_version = cursor.read_u32()?;
        if snft_version != Self::SNFT_VERSION {
            return Err(cursor.err(ParseErrorKind::UnexpectedFontVersion));
        }
        let table_count = cursor.read_u16()?;
        cursor.skip(6)?; // searchRange, entrySelector, rangeShift

        let mut tables: Vec<(TableTag, &'a [u8])> = Vec::with_capacity(usize::from(table_count));
        for _ in 0..table_count {
            let tag = TableTag::new(cursor.read_byte_array::<4>()?);
            cursor.skip(4)?; // per-table checksum, verified only by the caller if desired
            let offset = cursor.read_u32()? as usize;
            let len = cursor.read_u32()? as usize;
            let table_bytes = face_bytes
                .get(offset..offset + len)
                .ok_or_else(|| ParseError {
                    kind: ParseErrorKind::UnexpectedEof,
                    offset,
                    table: Some(tag),
                })?;
            tables.push((tag, table_bytes));
        }

        let find = |tag: TableTag| tables.iter().find(|&&(t, _)| t == tag).map(|&(_, b)| b);

        let head = find(Self::HEAD_TAG).ok_or(ParseError::missing_table(Self::HEAD_TAG))?;
        let loca_format = Self::parse_loca_format(head)?;
        let maxp = find(Self::MAXP_TAG).ok_or(ParseError::missing_table(Self::MAXP_TAG))?;
        let glyph_count = Self::parse_glyph_count(maxp)?;
        let loca_bytes = find(Self::LOCA_TAG).ok_or(ParseError::missing_table(Self::LOCA_TAG))?;
        let loca = LocaTable::new(loca_format, glyph_count, loca_bytes)?;
        let hhea_bytes = find(Self::HHEA_TAG).ok_or(ParseError::missing_table(Self::HHEA_TAG))?;
        let hhea = HheaTable::parse(hhea_bytes)?;
        let hmtx = HmtxTable {
            raw: find(Self::HMTX_TAG).ok_or(ParseError::missing_table(Self::HMTX_TAG))?,
            number_of_h_metrics: hhea.number_of_h_metrics,
        };
        let cmap_bytes = find(Self::CMAP_TAG).ok_or(ParseError::missing_table(Self::CMAP_TAG))?;
        let cmap = CmapTable::parse(Cursor::new(cmap_bytes))?;
        let name_table_bytes = find(Self::NAME_TAG).ok_or(ParseError::missing_table(Self::NAME_TAG))?;
        let name = NameTable::parse(Cursor::new(name_table_bytes))?;
        let kern = match find(Self::KERN_TAG) {
            Some(bytes) => KernTable::parse(Cursor::new(bytes))?,
            None => None,
        };

        Ok(Self {
            cmap,
            head,
            hhea,
            hmtx,
            maxp,
            name,
            name_bytes: name_table_bytes,
            os2: find(Self::OS2_TAG).ok_or(ParseError::missing_table(Self::OS2_TAG))?,
            post: Self::parse_post(find(Self::POST_TAG).ok_or(ParseError::missing_table(Self::POST_TAG))?)?,
            loca,
            glyf: find(Self::GLYF_TAG).ok_or(ParseError::missing_table(Self::GLYF_TAG))?,
            kern,
            cvt: find(Self::CVT_TAG),
            fpgm: find(Self::FPGM_TAG),
            prep: find(Self::PREP_TAG),
            gasp: find(Self::GASP_TAG),
        })
    }

    fn parse_loca_format(head: &[u8]) -> Result<LocaFormat, ParseError> {
        let mut cursor = Cursor::new(head);
        let version = cursor.read_u32()?;
        if version != 0x_0001_0000 {
            return Err(ParseError {
                kind: ParseErrorKind::UnexpectedTableVersion { version },
                offset: 0,
                table: Some(Self::HEAD_TAG),
            });
        }
        cursor.skip(46)?; // fontRevision..fontDirectionHint (indexToLocFormat is at byte offset 50)
        let raw_format = cursor.read_u16()?;
        match raw_format {
            0 => Ok(LocaFormat::Short),
            1 => Ok(LocaFormat::Long),
            _ => Err(ParseError {
                kind: ParseErrorKind::UnexpectedTableFormat { format: raw_format },
                offset: cursor.offset,
                table: Some(Self::HEAD_TAG),
            }),
        }
    }

    fn parse_glyph_count(maxp: &[u8]) -> Result<u16, ParseError> {
        let mut cursor = Cursor::new(maxp);
        let version = cursor.read_u32()?;
        if version != 0x_0000_5000 && version != 0x_0001_0000 {
            return Err(ParseError {
                kind: ParseErrorKind::UnexpectedTableVersion { version },
                offset: 0,
                table: Some(Self::MAXP_TAG),
            });
        }
        cursor.read_u16()
    }

    /// Validates the fixed 32-byte `post` header (version..isFixedPitch) is fully present;
    /// any glyph-name data beyond it is ignored.
    fn parse_post(post: &'a [u8]) -> Result<&'a [u8], ParseError> {
        const MIN_LEN: usize = 32;
        if post.len() < MIN_LEN {
            return Err(ParseError {
                kind: ParseErrorKind::UnexpectedTableLen {
                    expected: MIN_LEN,
                    actual: post.len(),
                },
                offset: 0,
                table: Some(Self::POST_TAG),
            });
        }
        Ok(post)
    }

    /// Maps a character to a glyph index using the active `cmap` subtable; `0` if unmapped.
    pub fn char_to_glyph(&self, ch: char) -> Result<u16, MapError> {
        self.cmap.map_char(ch)
    }

    pub(crate) fn glyph(&self, glyph_idx: u16) -> Result<GlyphWithMetrics<'a>, ParseError> {
        let range = self.loca.glyph_range(glyph_idx)?;
        let raw = self.glyf.get(range).ok_or(ParseError {
            kind: ParseErrorKind::MissingGlyph { glyph_idx },
            offset: 0,
            table: Some(Self::GLYF_TAG),
        })?;
        let inner = Glyph::new(Cursor::new(raw))?;
        let (advance, lsb) = self.hmtx.advance_and_lsb(glyph_idx)?;
        Ok(GlyphWithMetrics {
            inner,
            advance,
            lsb,
        })
    }

    /// Computes the transitive closure of glyph indices a compound glyph depends on,
    /// including `glyph_idx` itself. Detects cycles rather than recursing indefinitely.
    pub fn glyph_components(&self, glyph_idx: u16) -> Result<BTreeSet<u16>, SubsetError> {
        let mut required = BTreeSet::new();
        let mut visiting = BTreeSet::new();
        self.collect_components(glyph_idx, &mut required, &mut visiting)?;
        Ok(required)
    }

    fn collect_components(
        &self,
        glyph_idx: u16,
        required: &mut BTreeSet<u16>,
        visiting: &mut BTreeSet<u16>,
    ) -> Result<(), SubsetError> {
        if required.contains(&glyph_idx) {
            return Ok(());
        }
        if !visiting.insert(glyph_idx) {
            return Err(SubsetError::CyclicCompound { glyph_idx });
        }
        let glyph = self.glyph(glyph_idx)?;
        if let Glyph::Composite { components, .. } = &glyph.inner {
            for component in components {
                self.collect_components(component.glyph_idx, required, visiting)?;
            }
        }
        visiting.remove(&glyph_idx);
        required.insert(glyph_idx);
        Ok(())
    }

    fn head_u16(&self, offset: usize) -> u16 {
        u16::from_be_bytes([self.head[offset], self.head[offset + 1]])
    }

    fn head_i16(&self, offset: usize) -> i16 {
        i16::from_be_bytes([self.head[offset], self.head[offset + 1]])
    }

    /// `unitsPerEm` from the `head` table.
    #[must_use]
    pub fn units_per_em(&self) -> u16 {
        self.head_u16(18)
    }

    /// The font's bounding box (`xMin, yMin, xMax, yMax`), scaled to a 1000-unit em square.
    #[must_use]
    pub fn bounding_box(&self) -> [i32; 4] {
        let units_per_em = i32::from(self.units_per_em().max(1));
        let scale = |value: i16| i32::from(value) * 1000 / units_per_em;
        [
            scale(self.head_i16(36)),
            scale(self.head_i16(38)),
            scale(self.head_i16(40)),
            scale(self.head_i16(42)),
        ]
    }

    /// `macStyle` bits from the `head` table, with the canonical (corrected) bit assignment.
    #[must_use]
    pub fn mac_style(&self) -> MacStyle {
        MacStyle::from_bits(self.head_u16(44))
    }

    /// `fontRevision` from the `head` table, decoded via the historical hex-as-decimal
    /// "fixed version" convention (see [`fixed_version`]).
    #[must_use]
    pub fn font_revision(&self) -> f32 {
        let raw = u32::from_be_bytes([self.head[4], self.head[5], self.head[6], self.head[7]]);
        fixed_version(raw)
    }

    /// `ascender`, `descender`, `lineGap` from the `hhea` table.
    #[must_use]
    pub fn ascender(&self) -> i16 {
        self.hhea.ascender
    }

    /// See [`Font::ascender`].
    #[must_use]
    pub fn descender(&self) -> i16 {
        self.hhea.descender
    }

    /// See [`Font::ascender`].
    #[must_use]
    pub fn line_gap(&self) -> i16 {
        self.hhea.line_gap
    }

    fn os2_u16(&self, offset: usize) -> Option<u16> {
        self.os2
            .get(offset..offset + 2)
            .map(|b| u16::from_be_bytes([b[0], b[1]]))
    }

    fn os2_i16(&self, offset: usize) -> Option<i16> {
        self.os2
            .get(offset..offset + 2)
            .map(|b| i16::from_be_bytes([b[0], b[1]]))
    }

    /// `usWeightClass` from `OS/2`.
    #[must_use]
    pub fn weight_class(&self) -> u16 {
        self.os2_u16(4).unwrap_or(400)
    }

    /// `sTypoLineGap` from `OS/2`.
    #[must_use]
    pub fn typo_line_gap(&self) -> i16 {
        self.os2_i16(72).unwrap_or(0)
    }

    /// `usWinAscent` from `OS/2`.
    #[must_use]
    pub fn win_ascent(&self) -> u16 {
        self.os2_u16(74).unwrap_or(0)
    }

    /// `usWinDescent` from `OS/2`.
    #[must_use]
    pub fn win_descent(&self) -> u16 {
        self.os2_u16(76).unwrap_or(0)
    }

    /// `sCapHeight` from `OS/2`, if the table is version 2 or later (0 for older/truncated tables).
    #[must_use]
    pub fn cap_height(&self) -> i16 {
        self.os2_i16(88).unwrap_or(0)
    }

    fn post_i32(&self, offset: usize) -> Option<i32> {
        self.post
            .get(offset..offset + 4)
            .map(|b| i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn post_i16(&self, offset: usize) -> Option<i16> {
        self.post
            .get(offset..offset + 2)
            .map(|b| i16::from_be_bytes([b[0], b[1]]))
    }

    /// `italicAngle` from `post`, as a 16.16 fixed-point value (0 for a short/missing table).
    #[must_use]
    pub fn italic_angle(&self) -> f32 {
        self.post_i32(4).unwrap_or(0) as f32 / 65536.0
    }

    /// Whether the font is italic (non-zero `italicAngle`).
    #[must_use]
    pub fn italic(&self) -> bool {
        self.post_i32(4).unwrap_or(0) != 0
    }

    /// `underlinePosition` from `post` (0 for a short/missing table).
    #[must_use]
    pub fn underline_position(&self) -> i16 {
        self.post_i16(8).unwrap_or(0)
    }

    /// `underlineThickness` from `post` (0 for a short/missing table).
    #[must_use]
    pub fn underline_thickness(&self) -> i16 {
        self.post_i16(10).unwrap_or(0)
    }

    /// `isFixedPitch` from `post`.
    #[must_use]
    pub fn is_fixed_pitch(&self) -> bool {
        self.post.get(12..16).is_some_and(|b| b != [0, 0, 0, 0])
    }

    /// The approximate stem width implied by `usWeightClass`: `50 + round((weight/65)^2)`.
    #[must_use]
    pub fn stemv(&self) -> u32 {
        let weight = f64::from(self.weight_class());
        50 + libm_round((weight / 65.0).powi(2)) as u32
    }

    /// The font family name (`name` id 1, platform `(1, 0)` preferred).
    #[must_use]
    pub fn font_family(&self) -> Option<String> {
        self.name.get(1)
    }

    /// The PostScript name (`name` id 6).
    #[must_use]
    pub fn postscript_name(&self) -> Option<String> {
        self.name.get(6)
    }

    /// Looks up glyph metrics (advance width, left side bearing) for `glyph_idx`.
    pub fn glyph_metrics(&self, glyph_idx: u16) -> Result<(u16, i16), ParseError> {
        self.hmtx.advance_and_lsb(glyph_idx)
    }

    /// The kerning adjustment between a pair of glyphs, if any.
    #[must_use]
    pub fn kern_pair(&self, left: u16, right: u16) -> i16 {
        self.kern
            .as_ref()
            .and_then(|kern| kern.get(left, right))
            .unwrap_or(0)
    }

    /// Produces a subset of this font containing only the glyphs transitively required to
    /// render `code_points` (plus `.notdef`), and the kerning pairs between them.
    pub fn subset(&self, code_points: &BTreeSet<char>) -> Result<crate::FontSubset<'a>, SubsetError> {
        crate::FontSubset::new(self.clone(), code_points)
    }

    /// The advance width of `string`, in font units: the sum of each character's glyph advance,
    /// minus the first glyph's left side bearing, plus pairwise kerning adjustments.
    pub fn string_width(&self, string: &str) -> Result<i64, ParseError> {
        let mut total = 0_i64;
        let mut prev_glyph = None;
        for (i, ch) in string.chars().enumerate() {
            let glyph_idx = self.char_to_glyph(ch).unwrap_or(0);
            let (advance, lsb) = self.glyph_metrics(glyph_idx)?;
            total += i64::from(advance);
            if i == 0 {
                total -= i64::from(lsb);
            }
            if let Some(prev) = prev_glyph {
                total += i64::from(self.kern_pair(prev, glyph_idx));
            }
            prev_glyph = Some(glyph_idx);
        }
        Ok(total)
    }
}

/// Interprets a 16.16 "fixed" version field the way historical TrueType tools report it: each
/// 16-bit half is read as four hex digits, then those digits are read again as decimal — e.g.
/// `0x0010_5000` is major `10`, minor `5000`, i.e. `10.5`. Valid version fields only ever use
/// digits `0..=9` per nibble; this matches the on-wire convention bit-exactly for those.
pub(crate) fn fixed_version(value: u32) -> f32 {
    let nibble = |shift: u32| (value >> shift) & 0xF;
    let digits = |hi_shift: u32| {
        nibble(hi_shift) * 1000 + nibble(hi_shift - 4) * 100 + nibble(hi_shift - 8) * 10 + nibble(hi_shift - 12)
    };
    digits(28) as f32 + digits(12) as f32 / 10000.0
}

/// `round()` without pulling in `std::f64::round` (unavailable under `no_std`).
fn libm_round(value: f64) -> f64 {
    if value >= 0.0 {
        (value + 0.5).trunc()
    } else {
        (value - 0.5).trunc()
    }
}

pub(crate) fn write_u16(writer: &mut Vec<u8>, value: u16) {
    writer.extend_from_slice(&value.to_be_bytes());
}

pub(crate) fn write_i16(writer: &mut Vec<u8>, value: i16) {
    writer.extend_from_slice(&value.to_be_bytes());
}

pub(crate) fn write_u32(writer: &mut Vec<u8>, value: u32) {
    writer.extend_from_slice(&value.to_be_bytes());
}

/// `(search_range, entry_selector)` per the binary-search-parameters convention shared by the
/// `cmap`, `kern` and table-directory headers: `search_range` is the largest power of two
/// `<= n` (in entry units, not bytes), and `entry_selector = log2(search_range)`.
pub(crate) fn binary_search_parameters(n: u16) -> (u16, u16) {
    let mut search_range = 1_u16;
    let mut entry_selector = 0_u16;
    while search_range.saturating_mul(2) <= n {
        search_range *= 2;
        entry_selector += 1;
    }
    (search_range, entry_selector)
}
