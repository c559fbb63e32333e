//! NG command compilation: tagged 16-bit word streams.
//!
//! Every command emits a header word `(tag << 8) | payload_word_count`
//! followed by its payload, encoded argument by argument from the schema.
//! The compiler also enforces occurrence caps and performs the
//! TriggerGroup → TriggerGroupWord downgrade.

use std::collections::HashMap;

use ngsc_types::schema::{ITEM_SLOT_MAX, TAG_TRIGGER_GROUP};
use ngsc_types::{
    DiagnosticKind, DiagnosticSink, NgArgKind, NgCommand, NgCommandGroup, NgSchema, NgValue,
    NumberVal, SchemaCatalog, SourcePos,
};

use crate::words::{pack_byte_array, pack_nybble_array};

/// The NG command compiler. One instance lives for the whole run: Options
/// occurrence counters persist while level counters reset at every
/// section boundary.
pub struct NgCompiler<'a> {
    catalog: &'a SchemaCatalog,
    level_counts: HashMap<String, u32>,
    options_counts: HashMap<String, u32>,
}

impl<'a> NgCompiler<'a> {
    pub fn new(catalog: &'a SchemaCatalog) -> Self {
        Self {
            catalog,
            level_counts: HashMap::new(),
            options_counts: HashMap::new(),
        }
    }

    /// Reset the level-scoped occurrence counters. Called at the start of
    /// every `[Level]`/`[Title]` section.
    pub fn begin_section(&mut self) {
        self.level_counts.clear();
    }

    /// Compile one command group into its word stream. Commands that fail
    /// a check contribute no words.
    pub fn compile_group(
        &mut self,
        group: &NgCommandGroup,
        options: bool,
        sink: &mut DiagnosticSink,
    ) -> Vec<u16> {
        let mut words = Vec::new();
        for command in &group.commands {
            if let Some(compiled) = self.compile_command(command, options, sink) {
                words.extend(compiled);
            }
        }
        words
    }

    fn compile_command(
        &mut self,
        cmd: &NgCommand,
        options: bool,
        sink: &mut DiagnosticSink,
    ) -> Option<Vec<u16>> {
        let Some(schema) = self.catalog.get(&cmd.name) else {
            sink.fatal(
                DiagnosticKind::Internal,
                cmd.pos.clone(),
                format!("no schema for parsed command `{}`", cmd.name),
            );
            return None;
        };

        let counts = if options {
            &mut self.options_counts
        } else {
            &mut self.level_counts
        };
        let count = counts.entry(cmd.name.clone()).or_insert(0);
        *count += 1;
        if schema.max_occurrences >= 0 && *count > schema.max_occurrences as u32 {
            sink.fatal(
                DiagnosticKind::Occurrence,
                cmd.pos.clone(),
                format!(
                    "`{}` used more than {} time(s)",
                    cmd.name, schema.max_occurrences
                ),
            );
            return None;
        }

        if schema.tag == TAG_TRIGGER_GROUP && downgrade_eligible(cmd) {
            return self.encode_downgraded(cmd, sink);
        }
        self.encode_command(schema, cmd, sink)
    }

    fn encode_command(
        &self,
        schema: &NgSchema,
        cmd: &NgCommand,
        sink: &mut DiagnosticSink,
    ) -> Option<Vec<u16>> {
        if schema.args.len() != cmd.args.len() {
            sink.fatal(
                DiagnosticKind::Internal,
                cmd.pos.clone(),
                format!("argument shape mismatch for `{}`", cmd.name),
            );
            return None;
        }

        let mut payload: Vec<u16> = Vec::new();
        for (index, (kind, value)) in schema.args.iter().zip(&cmd.args).enumerate() {
            match (kind, value) {
                (NgArgKind::Word, NgValue::Number(n)) => {
                    payload.push(word_value(n.value, -32768, 65535, cmd, index, sink)?);
                }
                (NgArgKind::Integer, NgValue::Number(n)) => {
                    payload.push(word_value(n.value, -32768, 32767, cmd, index, sink)?);
                }
                (NgArgKind::ItemSlot, NgValue::Number(n)) => {
                    payload.push(word_value(n.value, 0, ITEM_SLOT_MAX, cmd, index, sink)?);
                }
                (NgArgKind::Import, NgValue::Number(n)) => {
                    payload.push(word_value(n.value, 0, 65535, cmd, index, sink)?);
                }
                (NgArgKind::Long, NgValue::Number(n)) => {
                    let (low, high) = long_words(schema.name, index, n, cmd, sink)?;
                    payload.push(low);
                    payload.push(high);
                }
                (NgArgKind::String, NgValue::StringIndex(i)) => payload.push(*i),
                (NgArgKind::Array, NgValue::Array(elems)) => {
                    for (j, e) in elems.iter().enumerate() {
                        payload.push(word_value(e.value, -32768, 65535, cmd, index + j, sink)?);
                    }
                }
                (NgArgKind::ArrayByte, NgValue::Array(elems)) => {
                    let mut bytes = Vec::with_capacity(elems.len());
                    for (j, e) in elems.iter().enumerate() {
                        bytes.push(word_value(e.value, 0, 255, cmd, index + j, sink)? as u8);
                    }
                    payload.extend(pack_byte_array(&bytes));
                }
                (NgArgKind::ArrayNybble, NgValue::Array(elems)) => {
                    let mut nybbles = Vec::with_capacity(elems.len());
                    for (j, e) in elems.iter().enumerate() {
                        nybbles.push(word_value(e.value, 0, 15, cmd, index + j, sink)? as u8);
                    }
                    payload.extend(pack_nybble_array(&nybbles));
                }
                (NgArgKind::ArrayLong, NgValue::Array(elems)) => {
                    for e in elems {
                        let (low, high) = long_words(schema.name, usize::MAX, e, cmd, sink)?;
                        payload.push(low);
                        payload.push(high);
                    }
                }
                _ => {
                    sink.fatal(
                        DiagnosticKind::Internal,
                        cmd.pos.clone(),
                        format!("argument {index} of `{}` has the wrong kind", cmd.name),
                    );
                    return None;
                }
            }
        }

        finish(schema.tag, payload, &cmd.pos, &cmd.name, sink)
    }

    /// Re-encode an eligible TriggerGroup under the TriggerGroupWord schema
    /// with word-sized payload elements.
    fn encode_downgraded(&self, cmd: &NgCommand, sink: &mut DiagnosticSink) -> Option<Vec<u16>> {
        let word_schema = self.catalog.trigger_group_word();
        let mut payload: Vec<u16> = Vec::new();
        for value in &cmd.args {
            match value {
                NgValue::Number(n) => payload.push(n.value as u16),
                NgValue::Array(elems) => {
                    payload.extend(elems.iter().map(|e| e.value as u16));
                }
                _ => {
                    sink.fatal(
                        DiagnosticKind::Internal,
                        cmd.pos.clone(),
                        "unexpected TriggerGroup argument shape",
                    );
                    return None;
                }
            }
        }
        finish(word_schema.tag, payload, &cmd.pos, &cmd.name, sink)
    }
}

/// True when every Long and every array element of a TriggerGroup has its
/// high 16 bits all zero or all one.
fn downgrade_eligible(cmd: &NgCommand) -> bool {
    cmd.args.iter().skip(1).all(|value| match value {
        NgValue::Number(n) => fits_word(n.value),
        NgValue::Array(elems) => elems.iter().all(|e| fits_word(e.value)),
        _ => false,
    })
}

fn fits_word(value: i64) -> bool {
    if !(-0x8000_0000..=0xFFFF_FFFF).contains(&value) {
        return false;
    }
    let high = (value as u32) & 0xFFFF_0000;
    high == 0 || high == 0xFFFF_0000
}

fn finish(
    tag: u8,
    payload: Vec<u16>,
    pos: &SourcePos,
    name: &str,
    sink: &mut DiagnosticSink,
) -> Option<Vec<u16>> {
    if payload.len() > 0xFF {
        sink.fatal(
            DiagnosticKind::Range,
            pos.clone(),
            format!("`{name}` payload of {} words does not fit its header", payload.len()),
        );
        return None;
    }
    let mut words = Vec::with_capacity(payload.len() + 1);
    words.push(u16::from(tag) << 8 | payload.len() as u16);
    words.extend(payload);
    Some(words)
}

fn word_value(
    value: i64,
    min: i64,
    max: i64,
    cmd: &NgCommand,
    index: usize,
    sink: &mut DiagnosticSink,
) -> Option<u16> {
    if (min..=max).contains(&value) {
        Some(value as u16)
    } else {
        sink.fatal(
            DiagnosticKind::Range,
            cmd.pos.clone(),
            format!(
                "argument {} of `{}` is {} (allowed {min}..={max})",
                index + 1,
                cmd.name,
                value
            ),
        );
        None
    }
}

/// Split a Long into (low, high) words, packing the plugin id into the
/// high word for AssignSlot argument 1 and Customize/Parameters argument 0.
fn long_words(
    schema_name: &str,
    index: usize,
    n: &NumberVal,
    cmd: &NgCommand,
    sink: &mut DiagnosticSink,
) -> Option<(u16, u16)> {
    if !(-0x8000_0000..=0xFFFF_FFFF).contains(&n.value) {
        sink.fatal(
            DiagnosticKind::Range,
            cmd.pos.clone(),
            format!("argument of `{}` is {} (does not fit 32 bits)", cmd.name, n.value),
        );
        return None;
    }
    let raw = n.value as u32;
    let packs_plugin = matches!(
        (schema_name, index),
        ("AssignSlot", 1) | ("Customize", 0) | ("Parameters", 0)
    );
    let high = if packs_plugin && n.plugin != 0 {
        n.plugin
    } else {
        (raw >> 16) as u16
    };
    Some((raw as u16, high))
}
