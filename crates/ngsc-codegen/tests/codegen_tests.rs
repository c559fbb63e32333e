//! Integration tests across the code generation stages.
//!
//! Walks complete NG trailers chunk by chunk, verifies the security chunk
//! against its checksum and verification bytes, and checks the DWORD size
//! escape in context.

use rand::rngs::StdRng;
use rand::SeedableRng;

use ngsc_codegen::container::{build_trailer, NgStreams};
use ngsc_codegen::security::{
    scramble_security, VERIFY_LEVEL_COUNT, VERIFY_NG_SETTINGS, VERIFY_OPTIONS,
};
use ngsc_codegen::words::{
    CHUNK_IMPORT_FILE, CHUNK_LEVEL, CHUNK_OPTIONS, CHUNK_SECURITY,
};
use ngsc_types::{ImportRecord, ScriptModel, Section, SectionKind, SourcePos};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn model_with_imports() -> ScriptModel {
    let mut m = ScriptModel::default();
    m.options_flags = 0x0006;
    m.ng_options.flags = 0x0011;
    for (i, kind) in [SectionKind::Title, SectionKind::Level, SectionKind::Level]
        .into_iter()
        .enumerate()
    {
        let mut s = Section::new(kind, SourcePos::new("SCRIPT.TXT", i as u32 * 10 + 1));
        s.path = format!("DATA\\lvl{i}");
        m.sections.push(s);
    }
    m.imports.push(ImportRecord {
        id: 1,
        mode: 0,
        file_type: 2,
        file_number: 9,
        name: "patch9.bin".into(),
        data: vec![0x11; 10],
        pos: SourcePos::new("SCRIPT.TXT", 3),
    });
    m
}

fn streams() -> NgStreams {
    NgStreams {
        options: vec![0x0401, 0x0002],
        levels: vec![vec![], vec![0x0901, 0x0005], vec![]],
    }
}

/// Split a sealed trailer into `(tag, words-including-length-header)` pairs.
fn walk_chunks(trailer: &[u8]) -> Vec<(u16, Vec<u16>)> {
    assert_eq!(&trailer[..2], &[0x4E, 0x47]);
    let words: Vec<u16> = trailer[2..trailer.len() - 8]
        .chunks(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    let mut chunks = Vec::new();
    let mut at = 0usize;
    while at < words.len() && words[at] != 0 {
        let (count, tag) = if words[at] & 0x8000 != 0 {
            let count = (u32::from(words[at] & 0x7FFF) << 16 | u32::from(words[at + 1])) as usize;
            (count, words[at + 2])
        } else {
            (words[at] as usize, words[at + 1])
        };
        chunks.push((tag, words[at..at + count].to_vec()));
        at += count;
    }
    assert_eq!(&words[at..], &[0, 0], "two zero words close the chunks");
    chunks
}

fn sealed_trailer(seed: u64) -> Vec<u8> {
    let model = model_with_imports();
    build_trailer(&model, &streams(), &mut StdRng::seed_from_u64(seed)).unwrap()
}

// ─────────────────────────────────────────────────────────────────────
// Chunk sequence and self-description
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_chunk_order_is_fixed() {
    let tags: Vec<u16> = walk_chunks(&sealed_trailer(5)).into_iter().map(|(t, _)| t).collect();
    assert_eq!(
        tags,
        vec![
            CHUNK_OPTIONS,
            CHUNK_SECURITY,
            CHUNK_LEVEL,
            CHUNK_LEVEL,
            CHUNK_LEVEL,
            CHUNK_IMPORT_FILE
        ]
    );
}

#[test]
fn test_chunk_counts_are_self_describing() {
    // P3: walk_chunks only terminates cleanly when every leading count
    // covers its chunk exactly; verify the counts against the slices too.
    for (tag, words) in walk_chunks(&sealed_trailer(6)) {
        if words[0] & 0x8000 != 0 {
            let count = (u32::from(words[0] & 0x7FFF) << 16 | u32::from(words[1])) as usize;
            assert_eq!(count, words.len(), "escaped chunk {tag:#06X}");
        } else {
            assert_eq!(words[0] as usize, words.len(), "chunk {tag:#06X}");
        }
    }
}

#[test]
fn test_options_chunk_flags_record() {
    let chunks = walk_chunks(&sealed_trailer(7));
    let (_, words) = &chunks[0];
    // [count, tag, commands…, FlagsOption, flags, 0]
    assert_eq!(&words[2..4], &[0x0401, 0x0002]);
    assert_eq!(words[words.len() - 3], (200 << 8) | 1);
    assert_eq!(words[words.len() - 2], 0x0011);
    assert_eq!(words[words.len() - 1], 0);
}

#[test]
fn test_level_chunks_follow_section_order() {
    let chunks = walk_chunks(&sealed_trailer(8));
    // Section 1 carries the only level commands.
    let (_, empty) = &chunks[2];
    let (_, with_words) = &chunks[3];
    assert_eq!(empty.len(), 5); // count, tag, FlagsLevel, flags, 0
    assert_eq!(&with_words[2..4], &[0x0901, 0x0005]);
    assert_eq!(with_words[4], (201 << 8) | 1);
}

#[test]
fn test_import_chunk_uses_dword_escape() {
    let chunks = walk_chunks(&sealed_trailer(9));
    let (tag, words) = chunks.last().unwrap();
    assert_eq!(*tag, CHUNK_IMPORT_FILE);
    assert!(words[0] & 0x8000 != 0);
    // id, mode, type, file number right after the tag.
    assert_eq!(&words[3..7], &[1, 0, 2, 9]);
    // 40 words of name, then the 2-word size (10 bytes), then 5 data words.
    assert_eq!(&words[47..49], &[10, 0]);
    assert_eq!(words.len(), 3 + 4 + 40 + 2 + 5);
}

// ─────────────────────────────────────────────────────────────────────
// Security chunk (scenario: checksum + verification bytes)
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_security_chunk_verification_bytes() {
    let chunks = walk_chunks(&sealed_trailer(10));
    let (tag, words) = &chunks[1];
    assert_eq!(*tag, CHUNK_SECURITY);

    // Unpack the payload words back into bytes and undo the XOR scramble.
    let mut bytes: Vec<u8> = words[2..]
        .iter()
        .flat_map(|w| w.to_le_bytes())
        .collect();
    scramble_security(&mut bytes);

    // The embedded verification bytes reappear at their fixed positions.
    assert_eq!(bytes[VERIFY_LEVEL_COUNT], 2, "level count");
    assert_eq!(bytes[VERIFY_OPTIONS], 0x06, "options flags low byte");
    assert_eq!(bytes[VERIFY_NG_SETTINGS], 0x11, "NG settings low byte");

    // Byte 0 is the pre-scramble checksum of bytes 1..n.
    let checksum = bytes[1..].iter().fold(0u8, |sum, b| sum.wrapping_add(*b));
    assert_eq!(bytes[0], checksum);
}

#[test]
fn test_trailer_deterministic_per_seed() {
    assert_eq!(sealed_trailer(11), sealed_trailer(11));
    assert_ne!(sealed_trailer(11), sealed_trailer(12));
}
