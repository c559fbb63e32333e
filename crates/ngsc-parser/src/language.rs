//! Language-file parsing.
//!
//! A language file holds four sections: `[Strings]`, `[PSX Strings]`,
//! `[PC Strings]` and `[ExtraNG]` (alias spellings accepted). Classic
//! section lines are string literals with escape handling and an optional
//! `tag:` prefix; `[ExtraNG]` lines are `index: text` pairs.

use ngsc_lexer::Normalizer;
use ngsc_types::{
    DiagnosticKind, DiagnosticSink, LangSection, LangString, LanguageTable, SourcePos,
};

/// Parse one language file into a [`LanguageTable`].
pub fn parse_language(file_name: &str, text: &str, sink: &mut DiagnosticSink) -> LanguageTable {
    let mut table = LanguageTable::new();
    let mut section: Option<LangSection> = None;

    for line in Normalizer::new(text, true) {
        let pos = SourcePos::new(file_name, line.line);
        if line.text.starts_with('[') {
            match section_for(&line.text) {
                Some(s) => section = Some(s),
                None => {
                    sink.fatal(
                        DiagnosticKind::Parse,
                        pos,
                        format!("unknown language section `{}`", line.text),
                    );
                    section = None;
                }
            }
            continue;
        }
        match section {
            None => {
                sink.warning(
                    DiagnosticKind::Parse,
                    pos,
                    "string before any section header is ignored",
                );
            }
            Some(LangSection::ExtraNg) => parse_extra(&line.text, pos, &mut table, sink),
            Some(s) => {
                let (tag, raw) = split_special_tag(&line.text);
                table.push(
                    s,
                    LangString {
                        text: unescape(raw),
                        tag: tag.map(str::to_string),
                    },
                );
            }
        }
    }
    table
}

fn section_for(header: &str) -> Option<LangSection> {
    let key = header
        .trim_start_matches('[')
        .trim_end_matches(']')
        .replace([' ', '_'], "")
        .to_ascii_uppercase();
    match key.as_str() {
        "STRINGS" => Some(LangSection::Strings),
        "PSXSTRINGS" => Some(LangSection::Psx),
        "PCSTRINGS" => Some(LangSection::Pc),
        "EXTRANG" => Some(LangSection::ExtraNg),
        _ => None,
    }
}

/// `index: text` entry of `[ExtraNG]`. Special tags are disabled here; the
/// colon always separates the numeric index.
fn parse_extra(text: &str, pos: SourcePos, table: &mut LanguageTable, sink: &mut DiagnosticSink) {
    let Some(colon) = text.find(':') else {
        sink.fatal(
            DiagnosticKind::Parse,
            pos,
            format!("`[ExtraNG]` entry `{text}` is missing its `index:` prefix"),
        );
        return;
    };
    let index = match text[..colon].trim().parse::<u16>() {
        Ok(i) if i < 0x8000 => i,
        _ => {
            sink.fatal(
                DiagnosticKind::Parse,
                pos,
                format!("bad `[ExtraNG]` index `{}`", &text[..colon]),
            );
            return;
        }
    };
    table.push_extra(index, unescape(text[colon + 1..].trim_start_matches(' ')));
}

/// Strip a leading `tag:` token (no whitespace before the colon). Returns
/// `(tag, remainder)`.
fn split_special_tag(text: &str) -> (Option<&str>, &str) {
    if let Some(colon) = text.find(':') {
        let head = &text[..colon];
        if !head.is_empty() && !head.contains(char::is_whitespace) {
            return (Some(head), text[colon + 1..].trim_start_matches(' '));
        }
    }
    (None, text)
}

/// Convert `\n`, `\t`, `\\` and `\xNN` escapes. Unrecognized escapes are
/// kept literally.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('x') => {
                let hi = chars.peek().copied().and_then(|c| c.to_digit(16));
                let hi = match hi {
                    Some(h) => {
                        chars.next();
                        h
                    }
                    None => {
                        out.push_str("\\x");
                        continue;
                    }
                };
                match chars.peek().copied().and_then(|c| c.to_digit(16)) {
                    Some(lo) => {
                        chars.next();
                        out.push(
                            ngsc_types::cp1252::decode(&[(hi * 16 + lo) as u8])
                                .chars()
                                .next()
                                .unwrap_or('?'),
                        );
                    }
                    None => {
                        out.push_str("\\x");
                        out.push(char::from_digit(hi, 16).unwrap_or('?'));
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
