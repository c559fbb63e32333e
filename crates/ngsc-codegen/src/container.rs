//! The `script.dat` container: classic body, offset tables, and the NG
//! trailer.
//!
//! The body layout is fixed and little-endian throughout. The trailer is
//! appended unconditionally, even for scripts without a single NG command;
//! header protection, when enabled on the model, scrambles the first 64
//! bytes of the finished file as the last step.

use rand::Rng;

use ngsc_types::schema::{TAG_FLAGS_LEVEL, TAG_FLAGS_OPTION};
use ngsc_types::{cp1252, ImportRecord, ScriptModel, SectionKind};

use crate::error::ContainerError;
use crate::security::{build_security_block, scramble_header};
use crate::words::{
    bytes_to_words, frame_chunk, frame_chunk_dword, seal_trailer, CHUNK_IMPORT_FILE, CHUNK_LEVEL,
    CHUNK_OPTIONS, CHUNK_SECURITY,
};

/// The compiled NG word streams, one entry in `levels` per model section.
pub struct NgStreams {
    pub options: Vec<u16>,
    pub levels: Vec<Vec<u16>>,
}

/// Assemble the complete `script.dat`: body, NG trailer, optional header
/// scrambling. `payloads` holds one classic byte stream per model section.
pub fn write_script_dat<R: Rng>(
    model: &ScriptModel,
    payloads: &[Vec<u8>],
    ng: &NgStreams,
    rng: &mut R,
) -> Result<Vec<u8>, ContainerError> {
    let mut out = write_body(model, payloads)?;
    out.extend(build_trailer(model, ng, rng)?);
    if model.protect_header {
        scramble_header(&mut out);
    }
    Ok(out)
}

/// The classic body: header fields, extension blocks, offset tables,
/// section payloads and language names.
pub fn write_body(model: &ScriptModel, payloads: &[Vec<u8>]) -> Result<Vec<u8>, ContainerError> {
    let level_paths: Vec<Vec<u8>> = model
        .sections
        .iter()
        .filter(|s| s.kind == SectionKind::Level)
        .map(|s| {
            let mut bytes = cp1252::encode(&s.path);
            bytes.push(0);
            bytes
        })
        .collect();
    let path_total: usize = level_paths.iter().map(Vec::len).sum();
    if path_total > 0xFFFF {
        return Err(ContainerError::AggregateTooLarge {
            what: "level paths",
        });
    }
    let payload_total: usize = payloads.iter().map(Vec::len).sum();
    if payload_total > 0xFFFF {
        return Err(ContainerError::AggregateTooLarge {
            what: "section payloads",
        });
    }
    if model.sections.len() > 0xFF {
        return Err(ContainerError::AggregateTooLarge { what: "sections" });
    }

    let mut out = Vec::new();
    out.extend_from_slice(&model.options_flags.to_le_bytes());
    out.extend_from_slice(&model.input_timeout.to_le_bytes());
    out.push(model.security);
    out.push(model.sections.len() as u8);
    out.extend_from_slice(&(model.level_count() as u16).to_le_bytes());
    out.extend_from_slice(&(path_total as u16).to_le_bytes());
    out.extend_from_slice(&(payload_total as u16).to_le_bytes());
    out.extend_from_slice(&extension_block(&model.psx_extensions)?);
    out.extend_from_slice(&extension_block(&model.pc_extensions)?);

    let mut offset = 0u16;
    for path in &level_paths {
        out.extend_from_slice(&offset.to_le_bytes());
        offset += path.len() as u16;
    }
    for path in &level_paths {
        out.extend_from_slice(path);
    }

    let mut offset = 0u16;
    for payload in payloads {
        out.extend_from_slice(&offset.to_le_bytes());
        offset += payload.len() as u16;
    }
    for payload in payloads {
        out.extend_from_slice(payload);
    }

    for name in &model.language_files {
        out.extend_from_slice(&cp1252::encode(&dat_basename(name)));
        out.push(0);
    }
    Ok(out)
}

/// The NG trailer: Options chunk, security chunk, one Level chunk per
/// section, ImportFile chunks, sealed with the `NG`/`NGLE` framing.
pub fn build_trailer<R: Rng>(
    model: &ScriptModel,
    ng: &NgStreams,
    rng: &mut R,
) -> Result<Vec<u8>, ContainerError> {
    let mut chunks: Vec<u16> = Vec::new();

    let mut payload = ng.options.clone();
    payload.push(u16::from(TAG_FLAGS_OPTION) << 8 | 1);
    payload.push(model.ng_options.flags);
    payload.push(0);
    chunks.extend(frame_chunk(CHUNK_OPTIONS, &payload));

    let security = build_security_block(
        rng,
        model.level_count() as u8,
        model.options_flags as u8,
        model.ng_options.flags as u8,
    );
    chunks.extend(frame_chunk(CHUNK_SECURITY, &bytes_to_words(&security)));

    for (index, level_words) in ng.levels.iter().enumerate() {
        let mut payload = level_words.clone();
        payload.push(u16::from(TAG_FLAGS_LEVEL) << 8 | 1);
        payload.push(model.sections[index].ng.flags);
        payload.push(0);
        if payload.len() + 2 > 0x7FFF {
            return Err(ContainerError::LevelChunkTooLarge { section: index });
        }
        chunks.extend(frame_chunk(CHUNK_LEVEL, &payload));
    }

    for import in &model.imports {
        chunks.extend(import_chunk(import)?);
    }

    log::debug!(
        "NG trailer: {} chunk words, {} import(s)",
        chunks.len(),
        model.imports.len()
    );
    Ok(seal_trailer(&chunks))
}

/// One ImportFile chunk, always framed with the DWORD size escape.
fn import_chunk(import: &ImportRecord) -> Result<Vec<u16>, ContainerError> {
    let name_bytes = cp1252::encode(&import.name);
    if name_bytes.len() > 79 {
        return Err(ContainerError::ImportNameTooLong {
            name: import.name.clone(),
        });
    }
    let mut file_name = vec![0u8; 80];
    file_name[..name_bytes.len()].copy_from_slice(&name_bytes);

    let mut payload = vec![
        import.id,
        import.mode,
        import.file_type,
        import.file_number,
    ];
    payload.extend(bytes_to_words(&file_name));
    let size = import.data.len() as u32;
    payload.push((size & 0xFFFF) as u16);
    payload.push((size >> 16) as u16);
    payload.extend(bytes_to_words(&import.data));
    Ok(frame_chunk_dword(CHUNK_IMPORT_FILE, &payload))
}

fn extension_block(extensions: &[String]) -> Result<[u8; 20], ContainerError> {
    let mut block = [0u8; 20];
    let mut at = 0usize;
    for ext in extensions {
        let bytes = cp1252::encode(ext);
        if at + bytes.len() + 1 > block.len() {
            return Err(ContainerError::ExtensionsTooLong);
        }
        block[at..at + bytes.len()].copy_from_slice(&bytes);
        at += bytes.len() + 1;
    }
    Ok(block)
}

/// Language output basename: stem uppercased, extension forced to `.DAT`.
pub fn dat_basename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let stem = base.split('.').next().unwrap_or(base);
    format!("{}.DAT", stem.to_ascii_uppercase())
}
