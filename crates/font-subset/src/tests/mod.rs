//! Hand-built synthetic TTF fixtures.
//!
//! The pack has no real font files to read from, so every fixture here is assembled byte by
//! byte rather than loaded via `include_bytes!`. Fixtures are kept minimal: just enough of each
//! table for the relevant table decoder's documented contract.

use std::collections::BTreeSet;

use test_casing::test_casing;

use crate::{
    font::{binary_search_parameters, fixed_version},
    write::checksum,
    Font, FontCollection, MacStyle, ParseErrorKind, SubsetError,
};

fn be16(value: u16) -> [u8; 2] {
    value.to_be_bytes()
}

fn be32(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}

/// Accumulates named tables and assembles them into a minimal single-face `sfnt`.
///
/// Unlike the production writer, table order here is whatever insertion order the test gave;
/// the parser never requires directory ordering on *input*, only on subset *output*.
#[derive(Default)]
struct TestFontBuilder {
    tables: Vec<([u8; 4], Vec<u8>)>,
}

impl TestFontBuilder {
    fn table(mut self, tag: &[u8; 4], bytes: Vec<u8>) -> Self {
        self.tables.push((*tag, bytes));
        self
    }

    fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&be32(0x_0001_0000));
        out.extend_from_slice(&be16(self.tables.len() as u16));
        out.extend_from_slice(&[0; 6]); // searchRange, entrySelector, rangeShift: unchecked by the parser

        let header_len = 12 + 16 * self.tables.len();
        let mut heap = Vec::new();
        let mut directory = Vec::new();
        for (tag, bytes) in &self.tables {
            let offset = header_len + heap.len();
            directory.extend_from_slice(tag);
            directory.extend_from_slice(&be32(0)); // per-table checksum: ignored by the parser
            directory.extend_from_slice(&be32(offset as u32));
            directory.extend_from_slice(&be32(bytes.len() as u32));
            heap.extend_from_slice(bytes);
            while heap.len() % 4 != 0 {
                heap.push(0);
            }
        }

        out.extend_from_slice(&directory);
        out.extend_from_slice(&heap);
        out
    }
}

fn head_table(mac_style: u16, index_to_loc_format: u16) -> Vec<u8> {
    let mut t = Vec::new();
    t.extend_from_slice(&be32(0x_0001_0000)); // version
    t.extend_from_slice(&be32(0x_0001_0000)); // fontRevision: 1.0
    t.extend_from_slice(&be32(0)); // checksumAdjustment
    t.extend_from_slice(&be32(0x5F0F_3CF5)); // magicNumber
    t.extend_from_slice(&be16(0)); // flags
    t.extend_from_slice(&be16(1000)); // unitsPerEm
    t.extend_from_slice(&[0; 8]); // created
    t.extend_from_slice(&[0; 8]); // modified
    t.extend_from_slice(&(-10_i16).to_be_bytes()); // xMin
    t.extend_from_slice(&(-20_i16).to_be_bytes()); // yMin
    t.extend_from_slice(&(1000_i16).to_be_bytes()); // xMax
    t.extend_from_slice(&(900_i16).to_be_bytes()); // yMax
    t.extend_from_slice(&be16(mac_style));
    t.extend_from_slice(&be16(9)); // lowestRecPPEM
    t.extend_from_slice(&(2_i16).to_be_bytes()); // fontDirectionHint
    t.extend_from_slice(&be16(index_to_loc_format));
    t.extend_from_slice(&be16(0)); // glyphDataFormat
    assert_eq!(t.len(), 54);
    t
}

fn hhea_table(number_of_h_metrics: u16) -> Vec<u8> {
    let mut t = Vec::new();
    t.extend_from_slice(&be32(0x_0001_0000));
    t.extend_from_slice(&(800_i16).to_be_bytes()); // ascender
    t.extend_from_slice(&(-200_i16).to_be_bytes()); // descender
    t.extend_from_slice(&(100_i16).to_be_bytes()); // lineGap
    t.extend_from_slice(&be16(1000)); // advanceWidthMax
    t.extend_from_slice(&[0; 6]); // minLsb, minRsb, xMaxExtent
    t.extend_from_slice(&[0; 6]); // caretSlopeRise, caretSlopeRun, caretOffset
    t.extend_from_slice(&[0; 8]); // reserved x4
    t.extend_from_slice(&be16(0)); // metricDataFormat
    t.extend_from_slice(&be16(number_of_h_metrics));
    assert_eq!(t.len(), 36);
    t
}

fn maxp_table(num_glyphs: u16) -> Vec<u8> {
    let mut t = Vec::new();
    t.extend_from_slice(&be32(0x_0000_5000)); // version 0.5: header-only maxp
    t.extend_from_slice(&be16(num_glyphs));
    t
}

fn hmtx_table(metrics: &[(u16, i16)]) -> Vec<u8> {
    let mut t = Vec::new();
    for &(advance, lsb) in metrics {
        t.extend_from_slice(&be16(advance));
        t.extend_from_slice(&lsb.to_be_bytes());
    }
    t
}

fn loca_table_short(lengths: &[usize]) -> Vec<u8> {
    let mut offsets = vec![0_usize];
    for &len in lengths {
        offsets.push(offsets.last().unwrap() + len);
    }

    let mut t = Vec::new();
    for offset in offsets {
        assert_eq!(offset % 2, 0, "short loca format requires word-aligned glyph lengths");
        t.extend_from_slice(&be16((offset / 2) as u16));
    }
    t
}

/// A minimal simple glyph: one contour, one point, no instructions. Padded to an even length,
/// like real `glyf` entries, so `loca_table_short` offsets stay exact.
fn simple_glyph() -> Vec<u8> {
    let mut t = Vec::new();
    t.extend_from_slice(&(1_i16).to_be_bytes()); // numberOfContours
    t.extend_from_slice(&be16(0)); // endPtsOfContours[0]
    t.extend_from_slice(&be16(0)); // instructionLength
    t.push(0x01); // flags[0]: on-curve, no repeat
    t.push(10); // x delta
    t.push(10); // y delta
    t.push(0); // padding
    t
}

/// A composite glyph referencing `component_glyph` twice via `MORE_COMPONENTS`/terminator flags.
fn composite_glyph(component_glyph: u16) -> Vec<u8> {
    const MORE_COMPONENTS: u16 = 0x0020;
    let mut t = Vec::new();
    t.extend_from_slice(&(-1_i16).to_be_bytes()); // numberOfContours: composite
    t.extend_from_slice(&[0; 8]); // xMin, yMin, xMax, yMax
    // First component: ARGS are bytes (no WORDS flag), MORE_COMPONENTS set.
    t.extend_from_slice(&be16(MORE_COMPONENTS));
    t.extend_from_slice(&be16(component_glyph));
    t.extend_from_slice(&be16(0)); // packed (dx, dy) args
                                    // Second (final) component.
    t.extend_from_slice(&be16(0));
    t.extend_from_slice(&be16(component_glyph));
    t.extend_from_slice(&be16(0));
    t
}

fn cmap_format4(mappings: &[(u16, u16)]) -> Vec<u8> {
    let mut segments: Vec<(u16, u16, u16, u16)> = mappings
        .iter()
        .map(|&(code, glyph)| (code, code, glyph.wrapping_sub(code), 0))
        .collect();
    segments.push((0xFFFF, 0xFFFF, 1, 0)); // mandatory sentinel segment
    let segment_count = segments.len() as u16;

    let mut body = Vec::new();
    body.extend_from_slice(&be16(2 * segment_count));
    let (units, entry_selector) = binary_search_parameters(segment_count);
    body.extend_from_slice(&be16(units * 2));
    body.extend_from_slice(&be16(entry_selector));
    body.extend_from_slice(&be16(2 * segment_count - units * 2));
    for &(_, end, _, _) in &segments {
        body.extend_from_slice(&be16(end));
    }
    body.extend_from_slice(&be16(0)); // reserved pad
    for &(start, _, _, _) in &segments {
        body.extend_from_slice(&be16(start));
    }
    for &(_, _, delta, _) in &segments {
        body.extend_from_slice(&be16(delta));
    }
    for &(_, _, _, range_offset) in &segments {
        body.extend_from_slice(&be16(range_offset));
    }

    let mut subtable = Vec::new();
    subtable.extend_from_slice(&be16(4)); // format
    subtable.extend_from_slice(&be16((body.len() + 6) as u16)); // length
    subtable.extend_from_slice(&be16(0)); // language
    subtable.extend_from_slice(&body);

    let mut t = Vec::new();
    t.extend_from_slice(&be16(0)); // cmap table version
    t.extend_from_slice(&be16(1)); // numTables
    t.extend_from_slice(&be16(3)); // platformID: Windows
    t.extend_from_slice(&be16(1)); // encodingID: Unicode BMP
    t.extend_from_slice(&be32(12)); // offset to subtable
    t.extend_from_slice(&subtable);
    t
}

fn name_table(family: &str) -> Vec<u8> {
    name_table_with_platform(family, 1, 0)
}

fn name_table_with_platform(family: &str, platform_id: u16, encoding_id: u16) -> Vec<u8> {
    let mut t = Vec::new();
    t.extend_from_slice(&be16(0)); // format
    t.extend_from_slice(&be16(1)); // count
    t.extend_from_slice(&be16(18)); // stringOffset: 6 + 1 * 12
    t.extend_from_slice(&be16(platform_id));
    t.extend_from_slice(&be16(encoding_id));
    t.extend_from_slice(&be16(0)); // languageID
    t.extend_from_slice(&be16(1)); // nameID: font family
    t.extend_from_slice(&be16(family.len() as u16));
    t.extend_from_slice(&be16(0)); // offset within storage
    t.extend_from_slice(family.as_bytes());
    t
}

fn os2_table(weight_class: u16, typo_line_gap: i16, win_ascent: u16, win_descent: u16) -> Vec<u8> {
    let mut t = vec![0_u8; 78];
    t[4..6].copy_from_slice(&be16(weight_class));
    t[72..74].copy_from_slice(&typo_line_gap.to_be_bytes());
    t[74..76].copy_from_slice(&be16(win_ascent));
    t[76..78].copy_from_slice(&be16(win_descent));
    t
}

fn post_table(italic_angle: i32) -> Vec<u8> {
    let mut t = vec![0_u8; 32];
    t[0..4].copy_from_slice(&be32(0x_0003_0000)); // version 3.0: no glyph names
    t[4..8].copy_from_slice(&italic_angle.to_be_bytes());
    t
}

fn kern_table(pairs: &[(u16, u16, i16)]) -> Vec<u8> {
    kern_table_with_coverage(pairs, 0x0001)
}

fn kern_table_with_coverage(pairs: &[(u16, u16, i16)], coverage: u16) -> Vec<u8> {
    let n_pairs = pairs.len() as u16;
    let (units, _) = binary_search_parameters(n_pairs);
    let search_range = units * 6;

    let mut subtable_body = Vec::new();
    subtable_body.extend_from_slice(&be16(n_pairs));
    subtable_body.extend_from_slice(&be16(search_range));
    subtable_body.extend_from_slice(&be16(0)); // entrySelector (unchecked by the parser)
    subtable_body.extend_from_slice(&be16(n_pairs * 6 - search_range));
    for &(left, right, delta) in pairs {
        subtable_body.extend_from_slice(&be16(left));
        subtable_body.extend_from_slice(&be16(right));
        subtable_body.extend_from_slice(&delta.to_be_bytes());
    }

    let mut t = Vec::new();
    t.extend_from_slice(&be16(0)); // kern table version
    t.extend_from_slice(&be16(1)); // nTables
    t.extend_from_slice(&be16(0)); // subtable version
    t.extend_from_slice(&be16((6 + subtable_body.len()) as u16)); // subtable length
    t.extend_from_slice(&be16(coverage));
    t.extend_from_slice(&subtable_body);
    t
}

/// Builds a small font with glyphs `[.notdef, 'A', composite of 'A' x2]`, a `cmap` mapping
/// `'A' -> 1` and `'B' -> 2`, and one kerning pair between them.
fn sample_font() -> Vec<u8> {
    let notdef = Vec::new();
    let glyph_a = simple_glyph();
    let glyph_composite = composite_glyph(1);
    let glyf = [notdef.clone(), glyph_a.clone(), glyph_composite.clone()].concat();
    let loca = loca_table_short(&[notdef.len(), glyph_a.len(), glyph_composite.len()]);

    TestFontBuilder::default()
        .table(b"head", head_table(0b0000011, 0)) // bold + italic
        .table(b"hhea", hhea_table(3))
        .table(b"maxp", maxp_table(3))
        .table(b"hmtx", hmtx_table(&[(600, 0), (500, 1), (900, 0)]))
        .table(b"cmap", cmap_format4(&[(u16::from(b'A'), 1), (u16::from(b'B'), 2)]))
        .table(b"loca", loca)
        .table(b"glyf", glyf)
        .table(b"name", name_table("Test"))
        .table(b"OS/2", os2_table(400, 100, 850, 210))
        .table(b"post", post_table(0))
        .table(b"kern", kern_table(&[(1, 2, -50)]))
        .table(b"fpgm", vec![0xDE, 0xAD, 0xBE, 0xEF])
        .build()
}

/// Builds a font whose two non-`.notdef` glyphs are mutually self-referential composites.
fn cyclic_font() -> Vec<u8> {
    let notdef = Vec::new();
    let glyph_a = composite_glyph(2); // refers to glyph 2
    let glyph_b = composite_glyph(1); // refers to glyph 1: a cycle
    let glyf = [notdef.clone(), glyph_a.clone(), glyph_b.clone()].concat();
    let loca = loca_table_short(&[notdef.len(), glyph_a.len(), glyph_b.len()]);

    TestFontBuilder::default()
        .table(b"head", head_table(0, 0))
        .table(b"hhea", hhea_table(3))
        .table(b"maxp", maxp_table(3))
        .table(b"hmtx", hmtx_table(&[(600, 0), (500, 0), (500, 0)]))
        .table(b"cmap", cmap_format4(&[(u16::from(b'A'), 1)]))
        .table(b"loca", loca)
        .table(b"glyf", glyf)
        .table(b"name", name_table("Cyclic"))
        .table(b"OS/2", os2_table(400, 0, 0, 0))
        .table(b"post", post_table(0))
        .build()
}

/// Builds a font with 6 glyphs (`.notdef` plus 5 simple glyphs) whose `cmap` deliberately maps
/// characters out of original-glyph-id order: `'A' -> 5`, `'B' -> 2`.
fn scattered_glyph_ids_font() -> Vec<u8> {
    let notdef = Vec::new();
    let glyphs: Vec<Vec<u8>> = (0..5).map(|_| simple_glyph()).collect();
    let lengths: Vec<usize> = std::iter::once(notdef.len()).chain(glyphs.iter().map(Vec::len)).collect();
    let glyf = std::iter::once(notdef).chain(glyphs).flatten().collect::<Vec<u8>>();
    let loca = loca_table_short(&lengths);

    TestFontBuilder::default()
        .table(b"head", head_table(0, 0))
        .table(b"hhea", hhea_table(6))
        .table(b"maxp", maxp_table(6))
        .table(b"hmtx", hmtx_table(&[(600, 0), (100, 0), (200, 0), (300, 0), (400, 0), (500, 0)]))
        .table(b"cmap", cmap_format4(&[(u16::from(b'A'), 5), (u16::from(b'B'), 2)]))
        .table(b"loca", loca)
        .table(b"glyf", glyf)
        .table(b"name", name_table("Scattered"))
        .table(b"OS/2", os2_table(400, 0, 0, 0))
        .table(b"post", post_table(0))
        .build()
}

#[test]
fn fixed_version_matches_historical_hex_as_decimal_convention() {
    assert_eq!(fixed_version(0x_0001_0000), 1.0);
    assert_eq!(fixed_version(0x_0003_5000), 3.5);
    assert_eq!(fixed_version(0x_0010_5000), 10.5);
}

#[test]
fn checksum_matches_reference_vectors() {
    let first_12: Vec<u8> = (0_u32..3).flat_map(u32::to_be_bytes).collect();
    assert_eq!(checksum(&first_12), 66);

    let words: Vec<u8> = (1..=12_u32).map(|i| i * 1000).flat_map(u32::to_be_bytes).collect();
    assert_eq!(checksum(&words), 78_000);
}

#[test]
fn checksum_ignores_trailing_zero_padding() {
    let bytes = [1_u8, 2, 3];
    let base = checksum(&bytes);
    for k in 0..4 {
        let mut padded = bytes.to_vec();
        padded.extend(std::iter::repeat(0).take(k));
        assert_eq!(checksum(&padded), base);
    }
}

#[test_casing(2, [(39_u16, (32_u16, 5_u16)), (10, (8, 3))])]
fn binary_search_parameters_matches_reference_vectors(case: (u16, (u16, u16))) {
    let (n, expected) = case;
    assert_eq!(binary_search_parameters(n), expected);
}

#[test]
fn parses_head_metadata() {
    let font = Font::new(&sample_font()).unwrap();
    assert_eq!(font.units_per_em(), 1000);
    assert_eq!(
        font.mac_style(),
        MacStyle { bold: true, italic: true, ..MacStyle::default() }
    );
    assert_eq!(font.font_revision(), 1.0);
    assert_eq!(font.bounding_box(), [-10, -20, 1000, 900]);
}

#[test]
fn maps_characters_via_cmap_format_4() {
    let font = Font::new(&sample_font()).unwrap();
    assert_eq!(font.char_to_glyph('A').unwrap(), 1);
    assert_eq!(font.char_to_glyph('B').unwrap(), 2);
    assert_eq!(font.char_to_glyph('Z').unwrap(), 0); // unmapped
}

#[test]
fn resolves_name_and_os2_and_post_metadata() {
    let font = Font::new(&sample_font()).unwrap();
    assert_eq!(font.font_family().as_deref(), Some("Test"));
    assert_eq!(font.postscript_name(), None); // no name id 6 in the fixture
    assert_eq!(font.weight_class(), 400);
    assert_eq!(font.typo_line_gap(), 100);
    assert_eq!(font.win_ascent(), 850);
    assert_eq!(font.win_descent(), 210);
    assert_eq!(font.cap_height(), 0); // version-0 OS/2: truncated, defaults to 0
    assert!(!font.italic());
}

#[test]
fn computes_transitive_glyph_components() {
    let font = Font::new(&sample_font()).unwrap();
    let components = font.glyph_components(2).unwrap();
    assert_eq!(components, BTreeSet::from([1, 2]));
}

#[test]
fn rejects_cyclic_compound_glyphs() {
    let font = Font::new(&cyclic_font()).unwrap();
    let err = font.glyph_components(1).unwrap_err();
    assert!(matches!(err, SubsetError::CyclicCompound { glyph_idx: 1 }));
}

#[test]
fn kern_pair_lookup_reflects_parsed_subtable() {
    let font = Font::new(&sample_font()).unwrap();
    assert_eq!(font.kern_pair(1, 2), -50);
    assert_eq!(font.kern_pair(2, 1), 0);
}

#[test]
fn kern_subtable_with_non_identity_coverage_is_skipped() {
    // coverage=0x0003 sets the horizontal bit but isn't the literal value 1 the format
    // requires (format byte 0, horizontal, *not* minimum/cross-stream) -- must be rejected,
    // not accepted via a bitmask decomposition.
    let notdef = Vec::new();
    let glyph_a = simple_glyph();
    let glyph_b = simple_glyph();
    let glyf = [notdef.clone(), glyph_a.clone(), glyph_b.clone()].concat();
    let loca = loca_table_short(&[notdef.len(), glyph_a.len(), glyph_b.len()]);

    let bytes = TestFontBuilder::default()
        .table(b"head", head_table(0, 0))
        .table(b"hhea", hhea_table(3))
        .table(b"maxp", maxp_table(3))
        .table(b"hmtx", hmtx_table(&[(600, 0), (500, 0), (500, 0)]))
        .table(b"cmap", cmap_format4(&[(u16::from(b'A'), 1), (u16::from(b'B'), 2)]))
        .table(b"loca", loca)
        .table(b"glyf", glyf)
        .table(b"name", name_table("BadCoverage"))
        .table(b"OS/2", os2_table(400, 0, 0, 0))
        .table(b"post", post_table(0))
        .table(b"kern", kern_table_with_coverage(&[(1, 2, -50)], 0x0003))
        .build();

    let font = Font::new(&bytes).unwrap();
    assert_eq!(font.kern_pair(1, 2), 0);
}

#[test]
fn subset_closure_includes_composite_dependencies() {
    let font = Font::new(&sample_font()).unwrap();
    let chars = BTreeSet::from(['A', 'B']);
    let subset = font.subset(&chars).unwrap();

    assert!(subset.skipped_chars().is_empty());
    assert_eq!(subset.glyph_count(), 3); // .notdef, 'A', composite of 'A'
}

#[test]
fn name_record_with_unrecognized_platform_falls_back_to_raw_bytes() {
    // (platform=3, encoding=0) is Windows Symbol, covered by neither the (1,0) nor (3,1)/(0,*)
    // decode branches; the record must still surface its bytes rather than being discarded.
    let notdef = Vec::new();
    let loca = loca_table_short(&[notdef.len()]);
    let bytes = TestFontBuilder::default()
        .table(b"head", head_table(0, 0))
        .table(b"hhea", hhea_table(1))
        .table(b"maxp", maxp_table(1))
        .table(b"hmtx", hmtx_table(&[(600, 0)]))
        .table(b"cmap", cmap_format4(&[]))
        .table(b"loca", loca)
        .table(b"glyf", notdef)
        .table(b"name", name_table_with_platform("Symbolic", 3, 0))
        .table(b"OS/2", os2_table(400, 0, 0, 0))
        .table(b"post", post_table(0))
        .build();

    let font = Font::new(&bytes).unwrap();
    assert_eq!(font.font_family().as_deref(), Some("Symbolic"));
}

#[test]
fn subset_renumbers_glyphs_by_ascending_original_id_not_discovery_order() {
    // 'A' is processed first (ascending codepoint order) but maps to the *larger* original
    // glyph id; renumbering must still follow sorted original ids, so old 2 -> new 1 and
    // old 5 -> new 2, not the reverse that discovery order would produce.
    let font = Font::new(&scattered_glyph_ids_font()).unwrap();
    let chars = BTreeSet::from(['A', 'B']);
    let subset = font.subset(&chars).unwrap();
    let output = subset.to_truetype();

    let reparsed = Font::new(&output).unwrap();
    assert_eq!(reparsed.char_to_glyph('B').unwrap(), 1);
    assert_eq!(reparsed.char_to_glyph('A').unwrap(), 2);
}

#[test]
fn subset_skips_unmapped_characters_without_erroring() {
    let font = Font::new(&sample_font()).unwrap();
    let chars = BTreeSet::from(['A', 'Z']);
    let subset = font.subset(&chars).unwrap();

    assert_eq!(subset.skipped_chars(), &['Z']);
    assert_eq!(subset.glyph_count(), 2); // .notdef, 'A'
}

#[test]
fn subset_output_is_a_valid_checksummed_sfnt() {
    let font = Font::new(&sample_font()).unwrap();
    let chars = BTreeSet::from(['A', 'B']);
    let subset = font.subset(&chars).unwrap();
    let output = subset.to_truetype();

    assert_eq!(checksum(&output), 0x_B1B0_AFBA);

    // The output must itself parse, and the subsetted glyphs must stay reachable.
    let reparsed = Font::new(&output).unwrap();
    assert_eq!(reparsed.char_to_glyph('A').unwrap(), 1);
    assert_eq!(reparsed.char_to_glyph('B').unwrap(), 2);
    assert_eq!(reparsed.kern_pair(1, 2), -50);
}

#[test]
fn subset_output_directory_is_sorted_ascending_and_copies_fpgm_verbatim() {
    let font = Font::new(&sample_font()).unwrap();
    let chars = BTreeSet::from(['A', 'B']);
    let output = font.subset(&chars).unwrap().to_truetype();

    let table_count = u16::from_be_bytes([output[4], output[5]]) as usize;
    let mut tags = Vec::with_capacity(table_count);
    let mut fpgm_bytes = None;
    for i in 0..table_count {
        let record = &output[12 + i * 16..12 + (i + 1) * 16];
        let tag = [record[0], record[1], record[2], record[3]];
        let offset = u32::from_be_bytes([record[8], record[9], record[10], record[11]]) as usize;
        let length = u32::from_be_bytes([record[12], record[13], record[14], record[15]]) as usize;
        if &tag == b"fpgm" {
            fpgm_bytes = Some(output[offset..offset + length].to_vec());
        }
        tags.push(tag);
    }

    let mut sorted_tags = tags.clone();
    sorted_tags.sort_unstable();
    assert_eq!(tags, sorted_tags, "directory tags must be strictly ascending");
    assert_eq!(fpgm_bytes.as_deref(), Some(&[0xDE, 0xAD, 0xBE, 0xEF][..]));
}

#[test]
fn font_collection_wraps_a_bare_face_as_a_single_entry() {
    let bytes = sample_font();
    let collection = FontCollection::new(&bytes).unwrap();
    assert_eq!(collection.faces().len(), 1);
    assert_eq!(collection.faces()[0].char_to_glyph('A').unwrap(), 1);
}

#[test]
fn short_post_table_is_rejected_at_parse_time_instead_of_panicking() {
    // A `post` table shorter than the fixed 32-byte header must be rejected at parse time,
    // not accepted and later panic on `italic_angle()`/subsetting.
    let notdef = Vec::new();
    let loca = loca_table_short(&[notdef.len()]);
    let bytes = TestFontBuilder::default()
        .table(b"head", head_table(0, 0))
        .table(b"hhea", hhea_table(1))
        .table(b"maxp", maxp_table(1))
        .table(b"hmtx", hmtx_table(&[(600, 0)]))
        .table(b"cmap", cmap_format4(&[]))
        .table(b"loca", loca)
        .table(b"glyf", notdef)
        .table(b"name", name_table("Short"))
        .table(b"OS/2", os2_table(400, 0, 0, 0))
        .table(b"post", vec![0_u8; 10])
        .build();

    let err = Font::new(&bytes).unwrap_err();
    assert!(matches!(err.kind(), ParseErrorKind::UnexpectedTableLen { expected: 32, actual: 10 }));
}

#[test]
fn font_collection_rejects_bad_ttc_version() {
    let mut bytes = b"ttcf".to_vec();
    bytes.extend_from_slice(&be32(0x_0003_0000)); // unsupported version
    bytes.extend_from_slice(&be32(0));
    let err = FontCollection::new(&bytes).unwrap_err();
    assert!(matches!(err.kind(), ParseErrorKind::UnexpectedFontVersion));
}

#[test]
fn missing_required_table_is_reported_by_tag() {
    let bytes = TestFontBuilder::default()
        .table(b"hhea", hhea_table(1))
        .build();
    let err = Font::new(&bytes).unwrap_err();
    assert!(matches!(err.kind(), ParseErrorKind::MissingTable));
}
