use crate::{
    alloc::{vec, BTreeMap, BTreeSet, Vec},
    font::{Font, Glyph, GlyphWithMetrics},
    SubsetError,
};

/// Subset of a [`Font`] produced by removing all glyphs and kerning pairs unreachable from a
/// caller-supplied set of characters.
#[derive(Debug)]
pub struct FontSubset<'a> {
    pub(crate) font: Font<'a>,
    pub(crate) char_map: Vec<(char, u16)>,
    pub(crate) old_to_new_glyph_idx: BTreeMap<u16, u16>,
    pub(crate) glyphs: Vec<GlyphWithMetrics<'a>>,
    pub(crate) kern_pairs: Vec<(u16, u16, i16)>,
    skipped_chars: Vec<char>,
}

impl<'a> FontSubset<'a> {
    pub(crate) fn new(font: Font<'a>, distinct_chars: &BTreeSet<char>) -> Result<Self, SubsetError> {
        // The 0th glyph (`.notdef`) is always required.
        let mut required: BTreeSet<u16> = BTreeSet::from([0]);
        let mut char_old_idx = Vec::new();
        let mut skipped_chars = Vec::new();

        for &ch in distinct_chars {
            match font.char_to_glyph(ch) {
                Ok(old_idx) if old_idx != 0 => {
                    required.extend(font.glyph_components(old_idx)?);
                    char_old_idx.push((ch, old_idx));
                }
                Ok(_) => {
                    log::warn!("character {ch:?} has no mapped glyph in the parent font, skipping");
                    skipped_chars.push(ch);
                }
                Err(err) => {
                    log::warn!("character {ch:?} could not be mapped: {err}, skipping");
                    skipped_chars.push(ch);
                }
            }
        }

        // Dedupe and sort by original glyph id: `required` is a `BTreeSet<u16>`, so iterating it
        // in order assigns new ids `0, 1, 2, …` by ascending original glyph id, `.notdef` first.
        let mut old_to_new_glyph_idx = BTreeMap::new();
        let mut glyphs = Vec::with_capacity(required.len());
        for &old_idx in &required {
            let new_idx = u16::try_from(glyphs.len()).expect("too many glyphs in subset");
            old_to_new_glyph_idx.insert(old_idx, new_idx);
            glyphs.push(font.glyph(old_idx)?);
        }
        for glyph in &mut glyphs {
            if let Glyph::Composite { components, .. } = &mut glyph.inner {
                for component in components {
                    component.glyph_idx = old_to_new_glyph_idx[&component.glyph_idx];
                }
            }
        }

        // `char_old_idx` stays ascending by `ch` since `distinct_chars` is a `BTreeSet<char>`;
        // the output `cmap`'s range aggregation (see `write`) depends on that ordering.
        let char_map = char_old_idx
            .into_iter()
            .map(|(ch, old_idx)| (ch, old_to_new_glyph_idx[&old_idx]))
            .collect();

        let mut this = Self {
            font,
            char_map,
            old_to_new_glyph_idx,
            glyphs,
            kern_pairs: vec![],
            skipped_chars,
        };
        this.build_kern_pairs();
        Ok(this)
    }

    fn build_kern_pairs(&mut self) {
        let Some(kern) = &self.font.kern else {
            return;
        };
        for (left, right, delta) in kern.pairs() {
            if let (Some(&new_left), Some(&new_right)) = (
                self.old_to_new_glyph_idx.get(&left),
                self.old_to_new_glyph_idx.get(&right),
            ) {
                self.kern_pairs.push((new_left, new_right, delta));
            }
        }
    }

    /// Characters from the input set that had no mapped glyph in the parent font and were
    /// therefore excluded from the subset.
    #[must_use]
    pub fn skipped_chars(&self) -> &[char] {
        &self.skipped_chars
    }

    /// Number of glyphs (including `.notdef`) retained in the subset.
    #[must_use]
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}
