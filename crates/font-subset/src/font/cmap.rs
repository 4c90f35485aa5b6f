//! `cmap` table processing.

use super::Cursor;
use crate::{
    alloc::Vec,
    errors::{MapError, ParseErrorKind},
    ParseError,
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct SegmentWithDelta {
    pub(crate) start_code: u16,
    pub(crate) end_code: u16,
    pub(crate) id_delta: u16,
    pub(crate) id_range_offset: u16,
}

/// Segment mapping to delta values (format 4) subtable of the `cmap` table.
#[derive(Debug, Clone)]
pub(crate) struct SegmentDeltas<'a> {
    pub(crate) segments: Vec<SegmentWithDelta>,
    pub(crate) glyph_id_array: &'a [u8],
}

impl<'a> SegmentDeltas<'a> {
    fn parse(mut cursor: Cursor<'a>) -> Result<Self, ParseError> {
        cursor.read_u16_checked(|format| {
            if format != 4 {
                return Err(ParseErrorKind::UnexpectedTableFormat { format });
            }
            Ok(())
        })?;

        let remaining_len = cursor.read_u16_checked(|subtable_len| {
            Ok(subtable_len
                .checked_sub(4)
                .ok_or(ParseErrorKind::UnexpectedEof)? as usize)
        })?;
        cursor = cursor.range(0..remaining_len)?;

        cursor.skip(2)?; // language
        let segment_count = cursor.read_u16()? / 2;
        cursor.skip(6)?; // searchRange, entrySelector, rangeShift

        let vec_len = 2 * usize::from(segment_count);
        let mut end_codes = cursor.split_at(vec_len)?;
        cursor.skip(2)?; // reserved padding
        let mut start_codes = cursor.split_at(vec_len)?;
        let mut id_deltas = cursor.split_at(vec_len)?;
        let mut id_range_offsets = cursor.split_at(vec_len)?;

        let segments = (0..segment_count).map(|_| {
            Ok(SegmentWithDelta {
                start_code: start_codes.read_u16()?,
                end_code: end_codes.read_u16()?,
                id_delta: id_deltas.read_u16()?,
                id_range_offset: id_range_offsets.read_u16()?,
            })
        });

        Ok(Self {
            segments: segments.collect::<Result<_, ParseError>>()?,
            glyph_id_array: cursor.bytes,
        })
    }

    fn map_char(&self, c: char) -> Result<u16, MapError> {
        let c = u16::try_from(c as u32).map_err(|_| MapError::CharTooLarge)?;

        let segment_idx = self
            .segments
            .binary_search_by_key(&c, |segment| segment.end_code)
            .unwrap_or_else(|pos| pos);
        let Some(segment) = self.segments.get(segment_idx) else {
            return Ok(0);
        };
        if segment.start_code > c {
            return Ok(0); // missing glyph
        }

        if segment.id_range_offset == 0 {
            Ok(segment.id_delta.wrapping_add(c))
        } else {
            // Offset is counted from the location of this segment's `idRangeOffset` entry.
            let mut byte_offset = 2 * segment_idx;
            byte_offset += usize::from(segment.id_range_offset);
            byte_offset += 2 * usize::from(c - segment.start_code);

            // A correctly-computed offset always lands past the parallel arrays, i.e.
            // strictly inside `glyphIdArray`. (A prior implementation this crate's tables
            // were modeled on had an inverted bounds check here; this is the corrected form.)
            if byte_offset < 2 * self.segments.len() {
                return Err(MapError::InvalidOffset);
            }
            byte_offset -= 2 * self.segments.len();
            let glyph_id_bytes = self
                .glyph_id_array
                .get(byte_offset..byte_offset + 2)
                .ok_or(MapError::InvalidOffset)?;
            let glyph_id = u16::from_be_bytes(glyph_id_bytes.try_into().unwrap());
            if glyph_id == 0 {
                return Ok(0);
            }
            Ok(segment.id_delta.wrapping_add(glyph_id))
        }
    }
}

/// Dense, direct code-point-to-glyph mapping (format 6) subtable of the `cmap` table.
#[derive(Debug, Clone)]
pub(crate) struct DenseMap<'a> {
    first_code: u16,
    glyph_ids: &'a [u8],
}

impl<'a> DenseMap<'a> {
    fn parse(mut cursor: Cursor<'a>) -> Result<Self, ParseError> {
        cursor.read_u16_checked(|format| {
            if format != 6 {
                return Err(ParseErrorKind::UnexpectedTableFormat { format });
            }
            Ok(())
        })?;
        cursor.skip(2)?; // length
        cursor.skip(2)?; // language
        let first_code = cursor.read_u16()?;
        let entry_count = cursor.read_u16()?;
        let glyph_ids = cursor.split_at(2 * usize::from(entry_count))?;
        Ok(Self {
            first_code,
            glyph_ids: glyph_ids.bytes,
        })
    }

    fn map_char(&self, ch: char) -> Result<u16, MapError> {
        let c = u16::try_from(ch as u32).map_err(|_| MapError::CharTooLarge)?;
        let Some(index) = c.checked_sub(self.first_code) else {
            return Ok(0);
        };
        let byte_offset = usize::from(index) * 2;
        let Some(bytes) = self.glyph_ids.get(byte_offset..byte_offset + 2) else {
            return Ok(0); // past `entryCount`: missing glyph
        };
        Ok(u16::from_be_bytes(bytes.try_into().unwrap()))
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SequentialMapGroup {
    pub(crate) start_char_code: u32,
    pub(crate) end_char_code: u32,
    pub(crate) start_glyph_id: u32,
}

impl SequentialMapGroup {
    pub(crate) fn map_unchecked(&self, ch: char) -> u32 {
        u32::from(ch) - self.start_char_code + self.start_glyph_id
    }
}

/// Segmented coverage (format 12) subtable of the `cmap` table.
///
/// Not required by the data model this crate targets (which only calls for formats 4 and 6),
/// but kept since the teacher codebase this crate is derived from implements it and it shares
/// all its plumbing with the required subtable formats.
#[derive(Debug, Default, Clone)]
pub(crate) struct SegmentedCoverage {
    pub(crate) groups: Vec<SequentialMapGroup>,
}

impl SegmentedCoverage {
    fn parse(mut cursor: Cursor<'_>) -> Result<Self, ParseError> {
        cursor.read_u16_checked(|format| {
            if format != 12 {
                return Err(ParseErrorKind::UnexpectedTableFormat { format });
            }
            Ok(())
        })?;
        cursor.skip(2)?; // reserved

        let remaining_len = cursor.read_u32_checked(|subtable_len| {
            Ok(subtable_len
                .checked_sub(8)
                .ok_or(ParseErrorKind::UnexpectedEof)? as usize)
        })?;
        cursor = cursor.range(0..remaining_len)?;

        cursor.skip(4)?; // language
        let num_groups = cursor.read_u32()?;
        let groups = (0..num_groups).map(|_| {
            Ok(SequentialMapGroup {
                start_char_code: cursor.read_u32()?,
                end_char_code: cursor.read_u32()?,
                start_glyph_id: cursor.read_u32()?,
            })
        });

        Ok(Self {
            groups: groups.collect::<Result<_, ParseError>>()?,
        })
    }

    fn map_char(&self, ch: char) -> u16 {
        let ch = u32::from(ch);
        let group_idx = self
            .groups
            .binary_search_by_key(&ch, |group| group.end_char_code)
            .unwrap_or_else(|pos| pos);
        let Some(group) = self.groups.get(group_idx) else {
            return 0;
        };
        if group.start_char_code > ch {
            return 0;
        }
        let glyph_id = ch - group.start_char_code + group.start_glyph_id;
        u16::try_from(glyph_id).unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub(crate) enum CmapTable<'a> {
    Deltas(SegmentDeltas<'a>),
    Dense(DenseMap<'a>),
    Coverage(SegmentedCoverage),
}

impl<'a> CmapTable<'a> {
    pub(crate) const UNICODE_PLATFORM: u16 = 0;
    const WINDOWS_PLATFORM: u16 = 3;

    /// Preference list for selecting the active subtable: `(0,4)`, `(0,3)`, `(3,1)`.
    pub(crate) fn parse(mut cursor: Cursor<'a>) -> Result<Self, ParseError> {
        let table_cursor = cursor;
        cursor.read_u16_checked(|version| {
            if version != 0 {
                return Err(ParseErrorKind::UnexpectedTableVersion {
                    version: version.into(),
                });
            }
            Ok(())
        })?;

        let num_tables = cursor.read_u16()?;
        let mut candidates: Vec<(u16, u16, u32)> = Vec::with_capacity(usize::from(num_tables));
        for _ in 0..num_tables {
            let platform_id = cursor.read_u16()?;
            let encoding_id = cursor.read_u16()?;
            let offset = cursor.read_u32()?;
            candidates.push((platform_id, encoding_id, offset));
        }

        // preference order: (0,4), (0,3), (3,1), else first with any decodable format
        let preference = [
            (Self::UNICODE_PLATFORM, 4),
            (Self::UNICODE_PLATFORM, 3),
            (Self::WINDOWS_PLATFORM, 1),
        ];
        let mut chosen = None;
        for &(plat, enc) in &preference {
            if let Some(&(_, _, offset)) = candidates.iter().find(|&&(p, e, _)| p == plat && e == enc) {
                chosen = Some(offset);
                break;
            }
        }
        let chosen = match chosen {
            Some(offset) => offset,
            None => candidates
                .first()
                .map(|&(_, _, offset)| offset)
                .ok_or_else(|| cursor.err(ParseErrorKind::NoSupportedCmap))?,
        };

        let mut subtable = table_cursor;
        subtable.skip(chosen as usize)?;
        let format_cursor = subtable;
        let mut format_peek = format_cursor;
        let format = format_peek.read_u16()?;
        match format {
            4 => Ok(Self::Deltas(SegmentDeltas::parse(subtable)?)),
            6 => Ok(Self::Dense(DenseMap::parse(subtable)?)),
            12 => Ok(Self::Coverage(SegmentedCoverage::parse(subtable)?)),
            other => Err(subtable.err(ParseErrorKind::UnexpectedTableFormat { format: other })),
        }
    }

    pub(crate) fn map_char(&self, ch: char) -> Result<u16, MapError> {
        match self {
            Self::Deltas(deltas) => deltas.map_char(ch),
            Self::Dense(dense) => dense.map_char(ch),
            Self::Coverage(coverage) => Ok(coverage.map_char(ch)),
        }
    }

    /// Builds a minimal format-4 `cmap` table from a `char`-sorted `(char, new_glyph_idx)` map,
    /// as produced by the subsetter. Consecutive, identically-offset pairs are merged into a
    /// single segment, mirroring the `Range` aggregator used elsewhere in this crate.
    pub(crate) fn from_map(map: &[(char, u16)]) -> CmapTable<'static> {
        let mut segments: Vec<SegmentWithDelta> = Vec::new();
        for &(ch, glyph) in map {
            let code = ch as u32 as u16; // the subsetter only ever maps BMP characters
            let extends_last = segments.last().is_some_and(|segment: &SegmentWithDelta| {
                segment.end_code == code.wrapping_sub(1)
                    && glyph == segment.id_delta.wrapping_add(code)
            });
            if extends_last {
                segments.last_mut().unwrap().end_code = code;
            } else {
                segments.push(SegmentWithDelta {
                    start_code: code,
                    end_code: code,
                    id_delta: glyph.wrapping_sub(code),
                    id_range_offset: 0,
                });
            }
        }
        // Sentinel segment required by the format-4 subtable layout.
        segments.push(SegmentWithDelta {
            start_code: 0xFFFF,
            end_code: 0xFFFF,
            id_delta: 0,
            id_range_offset: 0,
        });

        CmapTable::Deltas(SegmentDeltas {
            segments,
            glyph_id_array: &[],
        })
    }

    pub(crate) fn write(&self, writer: &mut Vec<u8>) {
        super::write_u16(writer, 0); // table version
        super::write_u16(writer, 1); // numTables
        super::write_u16(writer, Self::WINDOWS_PLATFORM);
        super::write_u16(writer, 1); // encodingID: Unicode BMP
        super::write_u32(writer, 12); // offset of the single subtable that follows

        match self {
            Self::Deltas(deltas) => deltas.write(writer),
            Self::Dense(_) | Self::Coverage(_) => {
                unreachable!("the subsetter only ever writes a format-4 cmap via `from_map`")
            }
        }
    }
}

impl SegmentDeltas<'_> {
    fn write(&self, writer: &mut Vec<u8>) {
        let segment_count = self.segments.len() as u16;
        let subtable_len = 16 + 8 * self.segments.len() + self.glyph_id_array.len();

        super::write_u16(writer, 4); // subtable format
        super::write_u16(writer, subtable_len as u16);
        super::write_u16(writer, 0); // language

        super::write_u16(writer, 2 * segment_count);
        let (units, entry_selector) = super::binary_search_parameters(segment_count);
        super::write_u16(writer, units * 2);
        super::write_u16(writer, entry_selector);
        super::write_u16(writer, 2 * segment_count - units * 2);

        for segment in &self.segments {
            super::write_u16(writer, segment.end_code);
        }
        super::write_u16(writer, 0); // reserved padding
        for segment in &self.segments {
            super::write_u16(writer, segment.start_code);
        }
        for segment in &self.segments {
            super::write_u16(writer, segment.id_delta);
        }
        for segment in &self.segments {
            super::write_u16(writer, segment.id_range_offset);
        }
        writer.extend_from_slice(self.glyph_id_array);
    }
}
