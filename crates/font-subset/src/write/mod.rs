//! Logic for serializing a [`FontSubset`] back into a TrueType byte stream.

use core::iter;

use crate::{
    alloc::{vec, Vec},
    font::{
        binary_search_parameters, write_i16, write_u16, write_u32, CmapTable, Glyph,
        GlyphComponent, GlyphComponentArgs, GlyphWithMetrics, HheaTable, HmtxTable, LocaFormat,
        LocaTable, TableTag, TransformData,
    },
    Font, FontSubset,
};

impl FontSubset<'_> {
    /// Serializes this subset as a standalone TrueType byte stream.
    #[must_use]
    pub fn to_truetype(&self) -> Vec<u8> {
        let cmap = CmapTable::from_map(&self.char_map);

        let mut builder = FontWriter::default();
        builder.write_table(Font::CMAP_TAG, |writer| cmap.write(writer));
        if let Some(cvt) = self.font.cvt {
            builder.write_raw_table(Font::CVT_TAG, cvt);
        }
        if let Some(fpgm) = self.font.fpgm {
            builder.write_raw_table(Font::FPGM_TAG, fpgm);
        }
        if let Some(gasp) = self.font.gasp {
            builder.write_raw_table(Font::GASP_TAG, gasp);
        }

        let number_of_h_metrics = builder.write_table(Font::HMTX_TAG, |writer| {
            HmtxTable::write_for_glyphs(&self.glyphs, writer)
        });
        let mut hhea = self.font.hhea;
        hhea.number_of_h_metrics = number_of_h_metrics;
        builder.write_table(Font::HHEA_TAG, |writer| hhea.write(writer));

        let maxp = self.font.maxp;
        builder.write_table(Font::MAXP_TAG, |writer| {
            // Patch the glyph count (u16 at bytes 4..6); leave every other byte intact.
            writer.extend_from_slice(&maxp[..4]);
            write_u16(writer, self.glyphs.len() as u16);
            writer.extend_from_slice(&maxp[6..]);
        });

        // TODO: reduce the `name` table to just the records actually referenced?
        builder.write_raw_table(Font::NAME_TAG, self.font.name_bytes);
        builder.write_raw_table(Font::OS2_TAG, self.font.os2);

        let post = self.font.post;
        builder.write_table(Font::POST_TAG, |writer| {
            // Version 3.0: no glyph-name table, just the fixed 28-byte header.
            write_u32(writer, 0x_0003_0000);
            writer.extend_from_slice(&post[4..32]);
        });

        if let Some(prep) = self.font.prep {
            builder.write_raw_table(Font::PREP_TAG, prep);
        }

        if !self.kern_pairs.is_empty() {
            builder.write_table(Font::KERN_TAG, |writer| {
                write_kern_table(&self.kern_pairs, writer);
            });
        }

        let locations = builder.write_table(Font::GLYF_TAG, |writer| {
            let mut locations = vec![0];
            let initial_offset = writer.len();
            for glyph in &self.glyphs {
                glyph.inner.write(writer);
                locations.push(writer.len() - initial_offset);
            }
            locations
        });

        let loca_format =
            builder.write_table(Font::LOCA_TAG, |writer| LocaTable::write(&locations, writer));
        builder.write_table(Font::HEAD_TAG, |writer| {
            write_head_table(self.font.head, loca_format, writer);
        });

        builder.into_truetype()
    }
}

fn write_head_table(original: &[u8], loca_format: LocaFormat, writer: &mut Vec<u8>) {
    const LOCA_FORMAT_OFFSET: usize = 50;

    writer.extend_from_slice(&original[..Font::HEAD_CHECKSUM_OFFSET]);
    write_u32(writer, 0); // Zero the checksum; the whole-file adjustment patches it later.
    writer.extend_from_slice(&original[Font::HEAD_CHECKSUM_OFFSET + 4..LOCA_FORMAT_OFFSET]);
    write_u16(
        writer,
        match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        },
    );
    writer.extend_from_slice(&original[LOCA_FORMAT_OFFSET + 2..]);
}

/// Rebuilds a format-0, horizontal `kern` table from subsetted `(left, right, delta)` triples.
///
/// Has no counterpart in the teacher codebase this crate is otherwise modeled on; grounded in
/// the original Python implementation's subtable layout instead.
fn write_kern_table(pairs: &[(u16, u16, i16)], writer: &mut Vec<u8>) {
    const PAIR_SIZE: u16 = 6;

    write_u16(writer, 0); // version
    write_u16(writer, 1); // nTables

    let subtable_len = 14 + usize::from(PAIR_SIZE) * pairs.len();
    write_u16(writer, 0); // subtable version
    write_u16(writer, subtable_len as u16);
    write_u16(writer, 1); // coverage: format 0, horizontal

    let n_pairs = pairs.len() as u16;
    write_u16(writer, n_pairs);
    let (units, entry_selector) = binary_search_parameters(n_pairs);
    let search_range = units * PAIR_SIZE;
    write_u16(writer, search_range);
    write_u16(writer, entry_selector);
    write_u16(writer, n_pairs * PAIR_SIZE - search_range);

    for &(left, right, delta) in pairs {
        write_u16(writer, left);
        write_u16(writer, right);
        write_i16(writer, delta);
    }
}

impl HmtxTable<'_> {
    fn write_for_glyphs(glyphs: &[GlyphWithMetrics<'_>], writer: &mut Vec<u8>) -> u16 {
        let mut number_of_h_metrics = glyphs.len();
        while number_of_h_metrics > 1 {
            let prev = &glyphs[number_of_h_metrics - 2];
            let current = &glyphs[number_of_h_metrics - 1];
            if prev.advance != current.advance {
                break;
            }
            number_of_h_metrics -= 1;
        }

        for (i, glyph) in glyphs.iter().enumerate() {
            if i < number_of_h_metrics {
                write_u16(writer, glyph.advance);
                write_i16(writer, glyph.lsb);
            } else {
                write_i16(writer, glyph.lsb);
            }
        }

        number_of_h_metrics as u16
    }
}

impl HheaTable<'_> {
    fn write(&self, writer: &mut Vec<u8>) {
        writer.extend_from_slice(&self.raw[..Self::EXPECTED_LEN - 2]);
        write_u16(writer, self.number_of_h_metrics);
    }
}

impl LocaTable<'_> {
    /// Subsets always emit the 16-bit (Short) `loca` form, matching the glyph-rewrite rule that
    /// `head.indexToLocFormat` is unconditionally forced to 0.
    fn write(locations: &[usize], writer: &mut Vec<u8>) -> LocaFormat {
        for &loc in locations {
            write_u16(writer, (loc / 2) as u16);
        }
        LocaFormat::Short
    }
}

#[derive(Debug)]
struct TableRecord {
    tag: TableTag,
    checksum: u32,
    offset: u32,
    length: u32,
}

impl TableRecord {
    const BYTE_LEN: usize = 16;

    fn write(&self, writer: &mut Vec<u8>) {
        writer.extend_from_slice(&self.tag.as_bytes());
        write_u32(writer, self.checksum);
        write_u32(writer, self.offset);
        write_u32(writer, self.length);
    }
}

/// Accumulates table bytes and builds the final directory + whole-file checksum patch.
#[derive(Debug, Default)]
struct FontWriter {
    tables: Vec<TableRecord>,
    table_heap: Vec<u8>,
}

impl FontWriter {
    fn write_table<T>(&mut self, tag: TableTag, with: impl FnOnce(&mut Vec<u8>) -> T) -> T {
        let offset = self.table_heap.len();
        debug_assert_eq!(offset % 4, 0, "unaligned offset: {offset}");

        let output = with(&mut self.table_heap);
        let length = self.table_heap.len() - offset;
        let padding = (4 - length % 4) % 4;
        self.table_heap.extend(iter::repeat_n(0_u8, padding));

        let table_checksum = checksum(&self.table_heap[offset..offset + length + padding]);
        self.tables.push(TableRecord {
            tag,
            checksum: table_checksum,
            offset: offset as u32,
            length: length as u32,
        });
        output
    }

    fn write_raw_table(&mut self, tag: TableTag, content: &[u8]) {
        self.write_table(tag, |buffer| buffer.extend_from_slice(content));
    }

    fn into_truetype(mut self) -> Vec<u8> {
        let mut buffer = vec![];
        write_u32(&mut buffer, Font::SNFT_VERSION);

        let table_count = self.tables.len() as u16;
        write_u16(&mut buffer, table_count);
        let (units, entry_selector) = binary_search_parameters(table_count);
        let search_range = units * TableRecord::BYTE_LEN as u16;
        write_u16(&mut buffer, search_range);
        write_u16(&mut buffer, entry_selector);
        write_u16(&mut buffer, TableRecord::BYTE_LEN as u16 * table_count - search_range);

        let heap_offset = (buffer.len() + self.tables.len() * TableRecord::BYTE_LEN) as u32;
        self.tables.sort_unstable_by_key(|record| record.tag);
        for record in &mut self.tables {
            record.offset += heap_offset;
            record.write(&mut buffer);
        }

        buffer.extend(self.table_heap);

        let whole_checksum = Font::SFNT_CHECKSUM.wrapping_sub(checksum(&buffer));
        let head_table = self
            .tables
            .iter()
            .find(|record| record.tag == Font::HEAD_TAG)
            .expect("head table is always written");
        let checksum_offset = head_table.offset as usize + Font::HEAD_CHECKSUM_OFFSET;
        buffer[checksum_offset..checksum_offset + 4].copy_from_slice(&whole_checksum.to_be_bytes());

        buffer
    }
}

/// Sums `bytes` as big-endian `u32` words (wrapping), zero-padding to a multiple of 4 first.
///
/// This is the `ttf_checksum` binary primitive: both the per-table checksums in the directory
/// and the whole-file `checksumAdjustment` patch are computed with it.
pub(crate) fn checksum(bytes: &[u8]) -> u32 {
    let mut sum = 0_u32;
    let mut chunks = bytes.chunks_exact(4);
    for chunk in &mut chunks {
        sum = sum.wrapping_add(u32::from_be_bytes(chunk.try_into().unwrap()));
    }
    let remainder = chunks.remainder();
    if !remainder.is_empty() {
        let mut padded = [0_u8; 4];
        padded[..remainder.len()].copy_from_slice(remainder);
        sum = sum.wrapping_add(u32::from_be_bytes(padded));
    }
    sum
}

impl Glyph<'_> {
    fn write(&self, writer: &mut Vec<u8>) {
        match self {
            Self::Empty => {}
            Self::Simple(bytes) => writer.extend_from_slice(bytes),
            Self::Composite {
                header,
                components,
                instructions,
            } => {
                write_i16(writer, -1); // numberOfContours
                writer.extend_from_slice(header);
                for component in components {
                    component.write(writer);
                }
                writer.extend_from_slice(instructions);
            }
        }
    }
}

impl GlyphComponent {
    fn write(&self, writer: &mut Vec<u8>) {
        write_u16(writer, self.flags);
        write_u16(writer, self.glyph_idx);
        match self.args {
            GlyphComponentArgs::U16(args) => write_u16(writer, args),
            GlyphComponentArgs::U32(args) => write_u32(writer, args),
        }
        match self.transform {
            TransformData::None => {}
            TransformData::Scale(val) => write_u16(writer, val),
            TransformData::TwoScales([x, y]) => {
                write_u16(writer, x);
                write_u16(writer, y);
            }
            TransformData::Affine([xx, xy, yx, yy]) => {
                write_u16(writer, xx);
                write_u16(writer, xy);
                write_u16(writer, yx);
                write_u16(writer, yy);
            }
        }
    }
}
