//! `name` table processing.

use super::Cursor;
use crate::{
    alloc::{String, Vec},
    ParseError,
};

#[derive(Debug, Clone, Copy)]
struct NameRecord {
    platform_id: u16,
    encoding_id: u16,
    name_id: u16,
    offset: u16,
    length: u16,
}

/// Decoded `name` table: a list of name records plus the raw string storage they index into.
#[derive(Debug, Clone)]
pub(crate) struct NameTable<'a> {
    records: Vec<NameRecord>,
    storage: &'a [u8],
}

impl<'a> NameTable<'a> {
    pub(crate) fn parse(mut cursor: Cursor<'a>) -> Result<Self, ParseError> {
        let table_bytes = cursor.bytes;
        cursor.skip(2)?; // format (0 or 1; both share the same record layout)
        let count = cursor.read_u16()?;
        let string_offset = cursor.read_u16()?;

        let mut records = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            let platform_id = cursor.read_u16()?;
            let encoding_id = cursor.read_u16()?;
            cursor.skip(2)?; // languageID
            let name_id = cursor.read_u16()?;
            let length = cursor.read_u16()?;
            let offset = cursor.read_u16()?;
            records.push(NameRecord {
                platform_id,
                encoding_id,
                name_id,
                offset,
                length,
            });
        }

        let storage = table_bytes.get(usize::from(string_offset)..).unwrap_or(&[]);
        Ok(Self {
            records,
            storage,
        })
    }

    fn decode(&self, record: &NameRecord) -> Option<String> {
        let bytes = self
            .storage
            .get(usize::from(record.offset)..usize::from(record.offset) + usize::from(record.length))?;
        match (record.platform_id, record.encoding_id) {
            (1, 0) => Some(bytes.iter().map(|&b| b as char).collect()),
            (3, 1) | (0, _) => {
                let units = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
                char::decode_utf16(units)
                    .map(|result| result.unwrap_or(char::REPLACEMENT_CHARACTER))
                    .collect::<String>()
                    .into()
            }
            // Other platform/encoding combinations (e.g. (3,0) Windows Symbol): preserve the raw
            // bytes rather than discarding the record, one char per byte as for (1,0).
            _ => Some(bytes.iter().map(|&b| b as char).collect()),
        }
    }

    /// Looks up a name record by `name_id`, preferring the `(platform=1, encoding=0)` record.
    pub(crate) fn get(&self, name_id: u16) -> Option<String> {
        let preferred = self
            .records
            .iter()
            .find(|r| r.name_id == name_id && r.platform_id == 1 && r.encoding_id == 0);
        let record = preferred.or_else(|| self.records.iter().find(|r| r.name_id == name_id))?;
        self.decode(record)
    }
}
