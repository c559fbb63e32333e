//! The `language.dat` writer.
//!
//! Body: three 16-bit totals, the four 16-bit section sizes, the 16-bit
//! offset table, then every classic string XOR-masked with 0xA5 and
//! NUL-terminated. Files with `[ExtraNG]` entries get their own NG trailer
//! with a single extra-strings chunk.

use ngsc_types::{cp1252, LangSection, LanguageTable};

use crate::error::ContainerError;
use crate::words::{bytes_to_words, frame_chunk, seal_trailer, CHUNK_EXTRA_STRINGS};

/// String obfuscation mask.
pub const STRING_MASK: u8 = 0xA5;

/// Serialize one language table.
pub fn write_language_dat(table: &LanguageTable) -> Result<Vec<u8>, ContainerError> {
    if table.total() > 0xFFFF {
        return Err(ContainerError::LanguageTooLarge {
            what: "string count",
        });
    }

    let mut out = Vec::new();
    out.extend_from_slice(&(table.total() as u16).to_le_bytes());
    out.extend_from_slice(&(table.count(LangSection::Psx) as u16).to_le_bytes());
    out.extend_from_slice(&(table.count(LangSection::Pc) as u16).to_le_bytes());
    for size in table.section_sizes {
        out.extend_from_slice(&size.to_le_bytes());
    }
    for offset in &table.offsets {
        out.extend_from_slice(&offset.to_le_bytes());
    }
    for string in table.strings() {
        for byte in cp1252::encode(&string.text) {
            out.push(byte ^ STRING_MASK);
        }
        out.push(0);
    }

    if !table.extra.is_empty() {
        out.extend(extra_trailer(table));
    }
    Ok(out)
}

/// The extra-strings trailer: one chunk holding the count of extras, then
/// `index, word-count, packed text` per entry. Text bytes are XOR-masked,
/// but NUL bytes (terminator and padding) stay unencrypted.
fn extra_trailer(table: &LanguageTable) -> Vec<u8> {
    let mut payload: Vec<u16> = vec![table.extra.len() as u16];
    for (index, text) in &table.extra {
        let mut bytes: Vec<u8> = cp1252::encode(text)
            .into_iter()
            .map(|b| if b == 0 { 0 } else { b ^ STRING_MASK })
            .collect();
        bytes.push(0);
        if bytes.len() % 2 != 0 {
            bytes.push(0);
        }
        payload.push(*index);
        payload.push((bytes.len() / 2) as u16);
        payload.extend(bytes_to_words(&bytes));
    }
    seal_trailer(&frame_chunk(CHUNK_EXTRA_STRINGS, &payload))
}
