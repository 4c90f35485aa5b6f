//! `kern` table processing.
//!
//! Only format-0, horizontal (`coverage == 1`), version-0 subtables are decoded; other kinds
//! are skipped (and logged) rather than rejected, per the table's documented degrade-gracefully
//! contract.

use super::Cursor;
use crate::{alloc::BTreeMap, ParseError};

/// Decoded `(left_glyph, right_glyph) -> delta` kerning pairs, aggregated across all supported
/// subtables in a `kern` table.
#[derive(Debug, Default, Clone)]
pub(crate) struct KernTable {
    pairs: BTreeMap<(u16, u16), i16>,
}

impl KernTable {
    pub(crate) fn parse(mut cursor: Cursor<'_>) -> Result<Option<Self>, ParseError> {
        cursor.read_u16_checked(|version| {
            if version != 0 {
                return Err(crate::errors::ParseErrorKind::UnexpectedTableVersion {
                    version: version.into(),
                });
            }
            Ok(())
        })?;
        let num_subtables = cursor.read_u16()?;

        let mut pairs = BTreeMap::new();
        for _ in 0..num_subtables {
            let sub_version = cursor.read_u16()?;
            let length = cursor.read_u16()?;
            let coverage = cursor.read_u16()?;
            let body_len = usize::from(length).saturating_sub(6);
            let mut body = cursor.split_at(body_len.min(cursor.bytes.len()))?;

            if sub_version != 0 || coverage != 1 {
                log::warn!(
                    "skipping unsupported kern subtable (version={sub_version}, coverage={coverage:#06x})"
                );
                continue;
            }

            let n_pairs = body.read_u16()?;
            body.skip(6)?; // searchRange, entrySelector, rangeShift
            for _ in 0..n_pairs {
                let left = body.read_u16()?;
                let right = body.read_u16()?;
                let delta = body.read_i16()?;
                pairs.insert((left, right), delta);
            }
        }

        if pairs.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Self { pairs }))
        }
    }

    pub(crate) fn get(&self, left: u16, right: u16) -> Option<i16> {
        self.pairs.get(&(left, right)).copied()
    }

    pub(crate) fn pairs(&self) -> impl Iterator<Item = (u16, u16, i16)> + '_ {
        self.pairs.iter().map(|(&(l, r), &d)| (l, r, d))
    }
}
