//! TrueType Collection (`ttcf`) container handling.

use super::{Cursor, Font};
use crate::{
    alloc::{vec, Vec},
    ParseError, ParseErrorKind,
};

const TTC_TAG: [u8; 4] = *b"ttcf";

/// A TrueType file, which may contain a single face or a collection (`ttcf`) of several.
#[derive(Debug)]
pub struct FontCollection<'a> {
    faces: Vec<Font<'a>>,
}

impl<'a> FontCollection<'a> {
    /// Parses `bytes` as either a bare TrueType face or a TrueType Collection, producing one
    /// [`Font`] per face.
    pub fn new(bytes: &'a [u8]) -> Result<Self, ParseError> {
        let mut cursor = Cursor::new(bytes);
        let tag = cursor.read_byte_array::<4>()?;

        let faces = if tag == TTC_TAG {
            let version = cursor.read_u32()?;
            if version != 0x_0001_0000 && version != 0x_0002_0000 {
                return Err(cursor.err(ParseErrorKind::UnexpectedFontVersion));
            }
            let num_fonts = cursor.read_u32()?;
            let mut offsets = Vec::with_capacity(num_fonts as usize);
            for _ in 0..num_fonts {
                offsets.push(cursor.read_u32()? as usize);
            }
            // version 2 additionally carries a DSIG reference; not needed for parsing faces
            // and not validated here (signature validation is out of scope).

            offsets
                .into_iter()
                .map(|offset| Font::parse_at(bytes, offset))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            vec![Font::parse_at(bytes, 0)?]
        };

        Ok(Self { faces })
    }

    /// The faces contained in this file, in directory order.
    #[must_use]
    pub fn faces(&self) -> &[Font<'a>] {
        &self.faces
    }
}
