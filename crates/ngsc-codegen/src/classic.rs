//! Classic section compilation: the byte-tag dialect of `[Level]` /
//! `[Title]` blocks.
//!
//! Directives are stable-sorted into the canonical emit order, encoded per
//! the fixed tag table, and closed with the section record and the 0x83
//! terminator. Flag-only directives contribute bits to the 16-bit section
//! flags instead of bytes.

use ngsc_parser::SymbolTable;
use ngsc_types::model::level_flags;
use ngsc_types::{
    resolve_string_ref, DiagnosticKind, DiagnosticSink, LanguageTable, RawDirective, Section,
    SectionKind, SourcePos, StringRef,
};

/// Canonical emit order (index × 1000 is the base sort key).
const EMIT_ORDER: &[&str] = &[
    "FMV",
    "CUT",
    "RESIDENTCUT",
    "LAYER1",
    "LAYER2",
    "UVROTATE",
    "LEGEND",
    "LENSFLARE",
    "MIRROR",
    "FOG",
    "ANIMATINGMIP",
    "LOADCAMERA",
    "RESETHUB",
    "KEY",
    "PUZZLE",
    "PICKUP",
    "EXAMINE",
    "KEYCOMBO",
    "PUZZLECOMBO",
    "PICKUPCOMBO",
];

/// Sort key of directives outside the emit-order table.
const KEY_UNKNOWN: u32 = 9999;

/// The classic section compiler.
pub struct ClassicCompiler<'a> {
    symbols: &'a SymbolTable,
    language: Option<&'a LanguageTable>,
}

impl<'a> ClassicCompiler<'a> {
    pub fn new(symbols: &'a SymbolTable, language: Option<&'a LanguageTable>) -> Self {
        Self { symbols, language }
    }

    /// Compile one section into its byte payload. `index` is the section's
    /// position in the model.
    pub fn compile_section(
        &self,
        section: &Section,
        index: u8,
        sink: &mut DiagnosticSink,
    ) -> Vec<u8> {
        let mut ordered: Vec<&RawDirective> = section.directives.iter().collect();
        ordered.sort_by_key(|d| self.sort_key(d));

        let mut bytes = Vec::new();
        let mut flags: u16 = 0;
        let mut load_cameras = 0usize;
        for directive in ordered {
            self.emit(directive, &mut bytes, &mut flags, &mut load_cameras, sink);
        }

        if section.kind == SectionKind::Level && load_cameras != 1 {
            sink.fatal(
                DiagnosticKind::Parse,
                section.pos.clone(),
                format!(
                    "a [Level] section must contain exactly one LoadCamera= (found {load_cameras})"
                ),
            );
        }

        bytes.push(section.kind.tag());
        if section.kind == SectionKind::Level {
            bytes.push(self.name_index(section, sink));
        }
        bytes.extend_from_slice(&flags.to_le_bytes());
        bytes.push(index);
        bytes.push(section.cd);
        bytes.push(0x83);
        bytes
    }

    /// The display-name string index byte of a Level record. A missing
    /// `Name=` or a failed lookup is fatal.
    fn name_index(&self, section: &Section, sink: &mut DiagnosticSink) -> u8 {
        let Some(name) = &section.name_ref else {
            sink.fatal(
                DiagnosticKind::Parse,
                section.pos.clone(),
                "a [Level] section must contain a Name= directive",
            );
            return 0;
        };
        match resolve_string_ref(name, self.language) {
            StringRef::Index(i) if i <= 0xFF => i as u8,
            StringRef::Index(i) => {
                sink.fatal(
                    DiagnosticKind::Range,
                    section.pos.clone(),
                    format!("name string index {i} does not fit in one byte"),
                );
                0
            }
            StringRef::Missing => {
                sink.fatal(
                    DiagnosticKind::Reference,
                    section.pos.clone(),
                    format!("level name `{name}` not found in the language table"),
                );
                0
            }
        }
    }

    fn emit(
        &self,
        d: &RawDirective,
        bytes: &mut Vec<u8>,
        flags: &mut u16,
        load_cameras: &mut usize,
        sink: &mut DiagnosticSink,
    ) {
        match d.name().to_ascii_uppercase().as_str() {
            "FMV" => {
                if let (Some(index), Some(trigger)) = (
                    self.num(d, 0, 0, 0x7F, sink),
                    self.num(d, 1, 0, 1, sink),
                ) {
                    bytes.push(0x80);
                    bytes.push(index as u8 | ((trigger as u8) << 7));
                }
            }
            "CUT" => {
                if let Some(cut) = self.num(d, 0, 0, 31, sink) {
                    bytes.extend_from_slice(&[0x84, cut as u8]);
                }
            }
            "RESIDENTCUT" => {
                if let (Some(slot), Some(cut)) =
                    (self.num(d, 0, 1, 4, sink), self.num(d, 1, 0, 255, sink))
                {
                    bytes.extend_from_slice(&[0x85 + slot as u8 - 1, cut as u8]);
                }
            }
            "LAYER1" => self.layer(d, 0x89, level_flags::LAYER1, bytes, flags, sink),
            "LAYER2" => self.layer(d, 0x8A, level_flags::LAYER2, bytes, flags, sink),
            "UVROTATE" => {
                if let Some(v) = self.num(d, 0, -128, 127, sink) {
                    bytes.extend_from_slice(&[0x8B, v as i8 as u8]);
                }
            }
            "LEGEND" => {
                let index = match d.args.first() {
                    Some(arg) => self.string_word(arg, &d.pos, sink),
                    None => {
                        self.wrong_args(d, sink);
                        return;
                    }
                };
                if index <= 0xFF {
                    bytes.extend_from_slice(&[0x8C, index as u8]);
                } else {
                    sink.fatal(
                        DiagnosticKind::Range,
                        d.pos.clone(),
                        format!("Legend string index {index} does not fit in one byte"),
                    );
                }
            }
            "LENSFLARE" => {
                let coords = (
                    self.num(d, 0, -0x0080_0000, 0x007F_FFFF, sink),
                    self.num(d, 1, -0x0080_0000, 0x007F_FFFF, sink),
                    self.num(d, 2, -0x0080_0000, 0x007F_FFFF, sink),
                );
                let color = (
                    self.num(d, 3, 0, 255, sink),
                    self.num(d, 4, 0, 255, sink),
                    self.num(d, 5, 0, 255, sink),
                );
                if let ((Some(x), Some(y), Some(z)), (Some(r), Some(g), Some(b))) = (coords, color)
                {
                    bytes.push(0x8D);
                    for v in [x, y, z] {
                        bytes.extend_from_slice(&((v / 256) as i16).to_le_bytes());
                    }
                    bytes.extend_from_slice(&[r as u8, g as u8, b as u8]);
                    *flags |= level_flags::LENS_FLARE;
                }
            }
            "MIRROR" => {
                if let (Some(room), Some(surface)) = (
                    self.num(d, 0, 0, 255, sink),
                    self.num(d, 1, -0x8000_0000, 0xFFFF_FFFF, sink),
                ) {
                    bytes.push(0x8E);
                    bytes.push(room as u8);
                    bytes.extend_from_slice(&(surface as u32).to_le_bytes());
                    *flags |= level_flags::MIRROR;
                }
            }
            "FOG" => {
                if let (Some(r), Some(g), Some(b)) = (
                    self.num(d, 0, 0, 255, sink),
                    self.num(d, 1, 0, 255, sink),
                    self.num(d, 2, 0, 255, sink),
                ) {
                    bytes.extend_from_slice(&[0x8F, r as u8, g as u8, b as u8]);
                }
            }
            "ANIMATINGMIP" => {
                if let (Some(slot), Some(distance)) =
                    (self.num(d, 0, 1, 16, sink), self.num(d, 1, 0, 15, sink))
                {
                    bytes.extend_from_slice(&[0x90, (distance * 16 + slot - 1) as u8]);
                }
            }
            "LOADCAMERA" => {
                let mut values = [0i64; 6];
                let mut ok = true;
                for (i, v) in values.iter_mut().enumerate() {
                    match self.num(d, i, -0x8000_0000, 0x7FFF_FFFF, sink) {
                        Some(n) => *v = n,
                        None => ok = false,
                    }
                }
                let room = self.num(d, 6, 0, 255, sink);
                if let (true, Some(room)) = (ok, room) {
                    bytes.push(0x91);
                    for v in values {
                        bytes.extend_from_slice(&(v as i32).to_le_bytes());
                    }
                    bytes.push(room as u8);
                    *load_cameras += 1;
                }
            }
            "RESETHUB" => {
                if let Some(v) = self.num(d, 0, 0, 255, sink) {
                    bytes.extend_from_slice(&[0x92, v as u8]);
                }
            }
            "KEY" => self.inventory(d, 0x93, 12, bytes, sink),
            "PUZZLE" => self.inventory(d, 0x9F, 12, bytes, sink),
            "PICKUP" => self.inventory(d, 0xAB, 4, bytes, sink),
            "EXAMINE" => self.inventory(d, 0xAF, 3, bytes, sink),
            "KEYCOMBO" => self.combo(d, 0xB2, 8, bytes, sink),
            "PUZZLECOMBO" => self.combo(d, 0xC2, 8, bytes, sink),
            "PICKUPCOMBO" => self.combo(d, 0xD2, 4, bytes, sink),
            "YOUNGLARA" => self.flag(d, level_flags::YOUNG_LARA, flags, sink),
            "WEATHER" => self.flag(d, level_flags::WEATHER, flags, sink),
            "HORIZON" => self.flag(d, level_flags::HORIZON, flags, sink),
            "STARFIELD" => self.flag(d, level_flags::STAR_FIELD, flags, sink),
            "LIGHTNING" => self.flag(d, level_flags::LIGHTNING, flags, sink),
            "TRAIN" => self.flag(d, level_flags::TRAIN, flags, sink),
            "PULSE" => self.flag(d, level_flags::PULSE, flags, sink),
            "COLADDHORIZON" => self.flag(d, level_flags::COL_ADD_HORIZON, flags, sink),
            "REMOVEAMULET" => self.flag(d, level_flags::REMOVE_AMULET, flags, sink),
            "NOLEVEL" => self.flag(d, level_flags::NO_LEVEL, flags, sink),
            "TIMER" => self.flag(d, level_flags::TIMER, flags, sink),
            _ => {
                sink.warning(
                    DiagnosticKind::Parse,
                    d.pos.clone(),
                    format!("unknown command `{}` ignored", d.command),
                );
            }
        }
    }

    fn layer(
        &self,
        d: &RawDirective,
        tag: u8,
        flag: u16,
        bytes: &mut Vec<u8>,
        flags: &mut u16,
        sink: &mut DiagnosticSink,
    ) {
        let rgb = (
            self.num(d, 0, 0, 255, sink),
            self.num(d, 1, 0, 255, sink),
            self.num(d, 2, 0, 255, sink),
        );
        let speed = self.num(d, 3, -128, 127, sink);
        if let ((Some(r), Some(g), Some(b)), Some(speed)) = (rgb, speed) {
            bytes.extend_from_slice(&[tag, r as u8, g as u8, b as u8, speed as i8 as u8]);
            *flags |= flag;
        }
    }

    /// `Key=`/`Puzzle=`/`Pickup=`/`Examine=`: `item, name, h1..h6`.
    fn inventory(
        &self,
        d: &RawDirective,
        base: u8,
        max_item: i64,
        bytes: &mut Vec<u8>,
        sink: &mut DiagnosticSink,
    ) {
        let Some(item) = self.num(d, 0, 1, max_item, sink) else {
            return;
        };
        let Some(name) = d.args.get(1) else {
            self.wrong_args(d, sink);
            return;
        };
        let Some(words) = self.six_words(d, 2, sink) else {
            return;
        };
        bytes.push(base + item as u8 - 1);
        bytes.extend_from_slice(&self.string_word(name, &d.pos, sink).to_le_bytes());
        for w in words {
            bytes.extend_from_slice(&w.to_le_bytes());
        }
    }

    /// Combo variants: `item, piece, name, h1..h6`.
    fn combo(
        &self,
        d: &RawDirective,
        base: u8,
        max_item: i64,
        bytes: &mut Vec<u8>,
        sink: &mut DiagnosticSink,
    ) {
        let item = self.num(d, 0, 1, max_item, sink);
        let piece = self.num(d, 1, 1, 2, sink);
        let (Some(item), Some(piece)) = (item, piece) else {
            return;
        };
        let Some(name) = d.args.get(2) else {
            self.wrong_args(d, sink);
            return;
        };
        let Some(words) = self.six_words(d, 3, sink) else {
            return;
        };
        bytes.push(base + 2 * (item as u8 - 1) + piece as u8 - 1);
        bytes.extend_from_slice(&self.string_word(name, &d.pos, sink).to_le_bytes());
        for w in words {
            bytes.extend_from_slice(&w.to_le_bytes());
        }
    }

    fn six_words(
        &self,
        d: &RawDirective,
        start: usize,
        sink: &mut DiagnosticSink,
    ) -> Option<[u16; 6]> {
        let mut out = [0u16; 6];
        let mut ok = true;
        for (i, w) in out.iter_mut().enumerate() {
            match self.num(d, start + i, -32768, 65535, sink) {
                Some(v) => *w = v as u16,
                None => ok = false,
            }
        }
        ok.then_some(out)
    }

    fn flag(&self, d: &RawDirective, bit: u16, flags: &mut u16, sink: &mut DiagnosticSink) {
        match d.args.as_slice() {
            [arg] if arg.eq_ignore_ascii_case("ENABLED") => *flags |= bit,
            [arg] if arg.eq_ignore_ascii_case("DISABLED") => *flags &= !bit,
            _ => sink.fatal(
                DiagnosticKind::Parse,
                d.pos.clone(),
                format!("{} expects a single ENABLED or DISABLED argument", d.command),
            ),
        }
    }

    /// A string reference emitted as a 16-bit index; a miss warns and
    /// substitutes 0.
    fn string_word(&self, arg: &str, pos: &SourcePos, sink: &mut DiagnosticSink) -> u16 {
        match resolve_string_ref(arg, self.language) {
            StringRef::Index(i) => i,
            StringRef::Missing => {
                sink.warning(
                    DiagnosticKind::Reference,
                    pos.clone(),
                    format!("string `{arg}` not found in the language table"),
                );
                0
            }
        }
    }

    /// Numeric classic argument: `$hex`, `&Hhex`, decimal, or a defined
    /// name. Range violations are fatal.
    fn num(
        &self,
        d: &RawDirective,
        index: usize,
        min: i64,
        max: i64,
        sink: &mut DiagnosticSink,
    ) -> Option<i64> {
        let Some(arg) = d.args.get(index) else {
            self.wrong_args(d, sink);
            return None;
        };
        let value = self.classic_number(arg, &d.pos, sink)?;
        if (min..=max).contains(&value) {
            Some(value)
        } else {
            sink.fatal(
                DiagnosticKind::Range,
                d.pos.clone(),
                format!(
                    "argument {} of {} is {value} (allowed {min}..={max})",
                    index + 1,
                    d.command
                ),
            );
            None
        }
    }

    fn classic_number(&self, arg: &str, pos: &SourcePos, sink: &mut DiagnosticSink) -> Option<i64> {
        let text = arg.trim_matches(' ');
        if let Some(hex) = text.strip_prefix('$') {
            return match u32::from_str_radix(hex, 16) {
                Ok(v) => Some(i64::from(v)),
                Err(_) => {
                    self.bad_number(text, pos, sink);
                    None
                }
            };
        }
        if text.len() > 2 && text[..2].eq_ignore_ascii_case("&h") {
            return match u32::from_str_radix(&text[2..], 16) {
                Ok(v) => Some(i64::from(v)),
                Err(_) => {
                    self.bad_number(text, pos, sink);
                    None
                }
            };
        }
        if let Ok(v) = text.parse::<i64>() {
            return Some(v);
        }
        if !text.is_empty()
            && text
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return match self.symbols.lookup(text, &pos.file) {
                Some((v, _)) => Some(i64::from(v)),
                None => {
                    sink.fatal(
                        DiagnosticKind::Reference,
                        pos.clone(),
                        format!("unknown symbol `{text}`"),
                    );
                    None
                }
            };
        }
        self.bad_number(text, pos, sink);
        None
    }

    fn bad_number(&self, text: &str, pos: &SourcePos, sink: &mut DiagnosticSink) {
        sink.fatal(
            DiagnosticKind::Parse,
            pos.clone(),
            format!("cannot read number `{text}`"),
        );
    }

    fn wrong_args(&self, d: &RawDirective, sink: &mut DiagnosticSink) {
        sink.fatal(
            DiagnosticKind::Parse,
            d.pos.clone(),
            format!("wrong argument count for {}", d.command),
        );
    }

    /// Sort key: `1000 × emit-order index`, plus `item × 10` for inventory
    /// directives and the piece number for combos. Unknown commands sort
    /// last. Item and piece numbers go through the same resolution as the
    /// encoders (literal forms or a defined name); the encoder reports any
    /// failure, so an unresolvable argument just keys as 0 here.
    fn sort_key(&self, d: &RawDirective) -> u32 {
        let upper = d.name().to_ascii_uppercase();
        let Some(order) = EMIT_ORDER.iter().position(|n| *n == upper) else {
            return KEY_UNKNOWN;
        };
        let mut key = order as u32 * 1000;
        let item = |i: usize| -> u32 {
            d.args
                .get(i)
                .and_then(|a| self.quiet_number(a, &d.pos.file))
                .filter(|v| (0..=64).contains(v))
                .unwrap_or(0) as u32
        };
        match upper.as_str() {
            "KEY" | "PUZZLE" | "PICKUP" | "EXAMINE" => key += item(0) * 10,
            "KEYCOMBO" | "PUZZLECOMBO" | "PICKUPCOMBO" => key += item(0) * 10 + item(1),
            _ => {}
        }
        key
    }

    /// [`Self::classic_number`] without diagnostics, for sort-key use.
    fn quiet_number(&self, arg: &str, file: &str) -> Option<i64> {
        let text = arg.trim_matches(' ');
        if let Some(hex) = text.strip_prefix('$') {
            return u32::from_str_radix(hex, 16).ok().map(i64::from);
        }
        if text.len() > 2 && text[..2].eq_ignore_ascii_case("&h") {
            return u32::from_str_radix(&text[2..], 16).ok().map(i64::from);
        }
        if let Ok(v) = text.parse::<i64>() {
            return Some(v);
        }
        self.symbols.lookup(text, file).map(|(v, _)| i64::from(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngsc_types::{LangSection, LangString, SourcePos};

    fn pos(line: u32) -> SourcePos {
        SourcePos::new("SCRIPT.TXT", line)
    }

    fn directive(line: u32, command: &str, args: &[&str]) -> RawDirective {
        RawDirective {
            command: format!("{command}="),
            args: args.iter().map(|s| s.to_string()).collect(),
            pos: pos(line),
        }
    }

    fn language() -> LanguageTable {
        let mut t = LanguageTable::new();
        t.push(LangSection::Strings, LangString::plain("Title"));
        t.push(LangSection::Strings, LangString::plain("The Tomb"));
        t.push(LangSection::Strings, LangString::plain("Crowbar"));
        t
    }

    fn compile(section: &Section) -> (Vec<u8>, DiagnosticSink) {
        let symbols = SymbolTable::new();
        let lang = language();
        let compiler = ClassicCompiler::new(&symbols, Some(&lang));
        let mut sink = DiagnosticSink::new();
        let bytes = compiler.compile_section(section, 0, &mut sink);
        (bytes, sink)
    }

    fn level_with(directives: Vec<RawDirective>) -> Section {
        let mut s = Section::new(SectionKind::Level, pos(1));
        s.name_ref = Some("The Tomb".into());
        s.cd = 108;
        s.directives = directives;
        s.directives.push(directive(
            99,
            "LoadCamera",
            &["0", "0", "0", "0", "0", "0", "0"],
        ));
        s
    }

    #[test]
    fn test_fmv_trigger_encoding() {
        let (bytes, sink) = compile(&level_with(vec![directive(2, "FMV", &["3", "1"])]));
        assert!(!sink.has_fatal());
        assert_eq!(&bytes[..2], &[0x80, 0x83]);
    }

    #[test]
    fn test_animating_mip_packing() {
        let (bytes, sink) = compile(&level_with(vec![directive(2, "AnimatingMIP", &["5", "2"])]));
        assert!(!sink.has_fatal());
        assert_eq!(&bytes[..2], &[0x90, 0x24]);
    }

    #[test]
    fn test_level_record_layout() {
        let (bytes, sink) = compile(&level_with(vec![]));
        assert!(!sink.has_fatal());
        // LoadCamera (26 bytes), then 0x81, name index, flags, index, CD, 0x83.
        let record = &bytes[bytes.len() - 7..];
        assert_eq!(record, &[0x81, 1, 0, 0, 0, 108, 0x83]);
        assert_eq!(bytes[0], 0x91);
    }

    #[test]
    fn test_title_record_has_no_name_byte() {
        let mut s = Section::new(SectionKind::Title, pos(1));
        s.directives = vec![directive(
            2,
            "LoadCamera",
            &["0", "0", "0", "0", "0", "0", "0"],
        )];
        let (bytes, sink) = compile(&s);
        assert!(!sink.has_fatal());
        let record = &bytes[bytes.len() - 6..];
        assert_eq!(record, &[0x82, 0, 0, 0, 0, 0x83]);
    }

    #[test]
    fn test_missing_load_camera_is_fatal() {
        let mut s = Section::new(SectionKind::Level, pos(1));
        s.name_ref = Some("The Tomb".into());
        let (_, sink) = compile(&s);
        assert!(sink.has_fatal());
    }

    #[test]
    fn test_missing_name_is_fatal() {
        let mut s = level_with(vec![]);
        s.name_ref = None;
        let (_, sink) = compile(&s);
        assert!(sink.has_fatal());
    }

    #[test]
    fn test_unknown_name_is_fatal() {
        let mut s = level_with(vec![]);
        s.name_ref = Some("Nonexistent".into());
        let (_, sink) = compile(&s);
        assert!(sink.has_fatal());
        assert_eq!(sink.diagnostics[0].kind, DiagnosticKind::Reference);
    }

    #[test]
    fn test_emit_order_is_canonical() {
        // Declared out of order: LoadCamera last, FMV after Cut.
        let (bytes, sink) = compile(&level_with(vec![
            directive(3, "Cut", &["4"]),
            directive(4, "FMV", &["1", "0"]),
        ]));
        assert!(!sink.has_fatal());
        // FMV (0x80) must come before Cut (0x84) despite source order.
        assert_eq!(bytes[0], 0x80);
        assert_eq!(bytes[2], 0x84);
    }

    #[test]
    fn test_inventory_sorted_by_item_number() {
        let (bytes, sink) = compile(&level_with(vec![
            directive(2, "Puzzle", &["2", "Crowbar", "0", "0", "0", "0", "0", "2"]),
            directive(3, "Puzzle", &["1", "Crowbar", "0", "0", "0", "0", "0", "1"]),
        ]));
        assert!(!sink.has_fatal());
        // LoadCamera first (0x91), then Puzzle1 (0x9F), then Puzzle2 (0xA0).
        assert_eq!(bytes[0], 0x91);
        let p1 = 26;
        assert_eq!(bytes[p1], 0x9F);
        assert_eq!(bytes[p1 + 15], 0xA0);
    }

    #[test]
    fn test_symbolic_item_number_keeps_emit_order() {
        // A #define'd item number must drive the sort key exactly like a
        // literal one, not default to 0.
        let mut symbols = SymbolTable::new();
        symbols.define_user("SCRIPT.TXT", "CROWBAR_ITEM", 1);
        let lang = language();
        let compiler = ClassicCompiler::new(&symbols, Some(&lang));
        let mut sink = DiagnosticSink::new();

        let mut s = Section::new(SectionKind::Level, pos(1));
        s.name_ref = Some("The Tomb".into());
        s.directives = vec![
            directive(2, "Puzzle", &["2", "Crowbar", "0", "0", "0", "0", "0", "2"]),
            directive(3, "Puzzle", &["CROWBAR_ITEM", "Crowbar", "0", "0", "0", "0", "0", "1"]),
            directive(9, "LoadCamera", &["0", "0", "0", "0", "0", "0", "0"]),
        ];
        let bytes = compiler.compile_section(&s, 0, &mut sink);
        assert!(!sink.has_fatal(), "{:?}", sink.diagnostics);
        // Puzzle item 1 (symbolic) must precede Puzzle item 2.
        assert_eq!(bytes[26], 0x9F);
        assert_eq!(bytes[26 + 15], 0xA0);
    }

    #[test]
    fn test_combo_tag_arithmetic() {
        let (bytes, _) = compile(&level_with(vec![directive(
            2,
            "PuzzleCombo",
            &["3", "2", "Crowbar", "0", "0", "0", "0", "0", "0"],
        )]));
        // Base 0xC2 + 2×(3−1) + 2−1 = 0xC7, after LoadCamera.
        assert_eq!(bytes[26], 0xC7);
        assert_eq!(&bytes[27..29], &[2, 0]);
    }

    #[test]
    fn test_flag_directive_sets_bits_only() {
        let (bytes, sink) = compile(&level_with(vec![
            directive(2, "YoungLara", &["ENABLED"]),
            directive(3, "Horizon", &["ENABLED"]),
        ]));
        assert!(!sink.has_fatal());
        // Only LoadCamera bytes + record: flag directives add nothing.
        assert_eq!(bytes.len(), 26 + 7);
        let flags = u16::from_le_bytes([bytes[bytes.len() - 5], bytes[bytes.len() - 4]]);
        assert_eq!(
            flags,
            level_flags::YOUNG_LARA | level_flags::HORIZON
        );
    }

    #[test]
    fn test_string_reference_forms() {
        let (bytes, sink) = compile(&level_with(vec![directive(
            2,
            "Key",
            &["1", "!5", "0", "0", "0", "0", "0", "0"],
        )]));
        assert!(!sink.has_fatal());
        assert_eq!(bytes[26], 0x93);
        assert_eq!(u16::from_le_bytes([bytes[27], bytes[28]]), 0x8005);
    }

    #[test]
    fn test_unknown_string_warns_and_emits_zero() {
        let (bytes, sink) = compile(&level_with(vec![directive(
            2,
            "Key",
            &["1", "No Such Item", "0", "0", "0", "0", "0", "0"],
        )]));
        assert!(!sink.has_fatal());
        assert_eq!(sink.warning_count(), 1);
        assert_eq!(u16::from_le_bytes([bytes[27], bytes[28]]), 0);
    }

    #[test]
    fn test_cut_range_is_fatal() {
        let (_, sink) = compile(&level_with(vec![directive(2, "Cut", &["32"])]));
        assert!(sink.has_fatal());
        assert_eq!(sink.diagnostics[0].kind, DiagnosticKind::Range);
    }

    #[test]
    fn test_hex_and_symbol_arguments() {
        let mut symbols = SymbolTable::new();
        symbols.define_user("SCRIPT.TXT", "MY_CUT", 7);
        let lang = language();
        let compiler = ClassicCompiler::new(&symbols, Some(&lang));
        let mut sink = DiagnosticSink::new();
        let mut s = Section::new(SectionKind::Title, pos(1));
        s.directives = vec![
            directive(2, "Cut", &["$1F"]),
            directive(3, "Cut", &["&H0A"]),
            directive(4, "Cut", &["MY_CUT"]),
        ];
        let bytes = compiler.compile_section(&s, 0, &mut sink);
        assert!(!sink.has_fatal());
        assert_eq!(&bytes[..6], &[0x84, 0x1F, 0x84, 0x0A, 0x84, 0x07]);
    }
}
