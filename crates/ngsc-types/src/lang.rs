//! Language tables: the parsed form of one localization file.

use crate::cp1252;

/// The four string partitions of a language file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LangSection {
    Strings,
    Psx,
    Pc,
    ExtraNg,
}

impl LangSection {
    /// Slot in the four-entry section sizes array.
    pub fn index(self) -> usize {
        match self {
            Self::Strings => 0,
            Self::Psx => 1,
            Self::Pc => 2,
            Self::ExtraNg => 3,
        }
    }
}

/// One string with its optional special tag (a `tag:` prefix stripped by the
/// language parser; disabled in `[ExtraNG]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LangString {
    pub text: String,
    pub tag: Option<String>,
}

impl LangString {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: None,
        }
    }
}

#[derive(Debug, Clone)]
struct LangEntry {
    section: LangSection,
    string: LangString,
}

/// The parsed content of one language file.
///
/// Strings of the three classic sections are kept in file insertion order
/// (which is what the offset table and the string lookup index run over);
/// `[ExtraNG]` entries are keyed by their declared index and live only in
/// the NG trailer of the compiled file.
#[derive(Debug, Clone, Default)]
pub struct LanguageTable {
    entries: Vec<LangEntry>,
    /// `[ExtraNG]` entries as `(declared index, text)` in insertion order.
    pub extra: Vec<(u16, String)>,
    /// Cumulative encoded byte size per section (string bytes + 1 NUL each).
    pub section_sizes: [u16; 4],
    /// Offset of each classic string within the string data block, in
    /// insertion order. `offsets[i + 1] = offsets[i] + bytelen(i) + 1`.
    pub offsets: Vec<u16>,
    next_offset: u16,
}

impl LanguageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a string to one of the three classic sections.
    pub fn push(&mut self, section: LangSection, string: LangString) {
        debug_assert!(section != LangSection::ExtraNg);
        let size = cp1252::byte_len(&string.text) as u16 + 1;
        self.offsets.push(self.next_offset);
        self.next_offset += size;
        self.section_sizes[section.index()] += size;
        self.entries.push(LangEntry { section, string });
    }

    /// Append an `[ExtraNG]` entry.
    pub fn push_extra(&mut self, index: u16, text: String) {
        self.section_sizes[LangSection::ExtraNg.index()] += cp1252::byte_len(&text) as u16 + 1;
        self.extra.push((index, text));
    }

    /// All classic strings in insertion order.
    pub fn strings(&self) -> impl Iterator<Item = &LangString> {
        self.entries.iter().map(|e| &e.string)
    }

    /// Number of classic strings.
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    /// Number of strings in one section.
    pub fn count(&self, section: LangSection) -> usize {
        match section {
            LangSection::ExtraNg => self.extra.len(),
            _ => self
                .entries
                .iter()
                .filter(|e| e.section == section)
                .count(),
        }
    }

    /// Look up a string by text: classic strings first (global insertion
    /// index), then extra-NG entries (`0x8000 + declared index`).
    /// Comparison is case-insensitive.
    pub fn find(&self, text: &str) -> Option<u16> {
        if let Some(i) = self
            .entries
            .iter()
            .position(|e| e.string.text.eq_ignore_ascii_case(text))
        {
            return Some(i as u16);
        }
        self.extra
            .iter()
            .find(|(_, t)| t.eq_ignore_ascii_case(text))
            .map(|(i, _)| 0x8000 + i)
    }
}

/// Outcome of resolving a string-reference argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringRef {
    /// A usable table index (possibly `0x8000 | n` for extra-NG strings).
    Index(u16),
    /// The lookup missed; the emitter substitutes 0 and decides whether
    /// that is a warning or fatal.
    Missing,
}

impl StringRef {
    /// The index to emit, substituting 0 on a miss.
    pub fn index_or_zero(self) -> u16 {
        match self {
            Self::Index(i) => i,
            Self::Missing => 0,
        }
    }
}

/// Resolve a string-reference argument.
///
/// `#n` is a literal decimal index, `!n` an extra-NG reference encoded as
/// `0x8000 | n`, `&hex` a raw hex index; anything else is looked up in the
/// table. With no table loaded the eager result is index 0 (legal while
/// parsing `[Options]` before the first language load).
pub fn resolve_string_ref(arg: &str, table: Option<&LanguageTable>) -> StringRef {
    if let Some(rest) = arg.strip_prefix('#') {
        if let Ok(n) = rest.trim().parse::<u16>() {
            return StringRef::Index(n);
        }
    }
    if let Some(rest) = arg.strip_prefix('!') {
        if let Ok(n) = rest.trim().parse::<u16>() {
            return StringRef::Index(0x8000 | n);
        }
    }
    if let Some(rest) = arg.strip_prefix('&') {
        if let Ok(n) = u16::from_str_radix(rest.trim(), 16) {
            return StringRef::Index(n);
        }
    }
    match table {
        Some(table) => match table.find(arg) {
            Some(i) => StringRef::Index(i),
            None => StringRef::Missing,
        },
        None => StringRef::Index(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LanguageTable {
        let mut t = LanguageTable::new();
        t.push(LangSection::Strings, LangString::plain("Load Game"));
        t.push(LangSection::Strings, LangString::plain("Save Game"));
        t.push(LangSection::Psx, LangString::plain("Memory card"));
        t.push(LangSection::Pc, LangString::plain("Keyboard"));
        t.push_extra(4, "Burning Torch".to_string());
        t
    }

    #[test]
    fn test_offsets_are_cumulative() {
        let t = sample();
        // "Load Game" = 9 bytes + NUL.
        assert_eq!(t.offsets, vec![0, 10, 20, 32]);
        assert_eq!(t.section_sizes[0], 20);
        assert_eq!(t.section_sizes[1], 12);
        assert_eq!(t.section_sizes[2], 9);
        assert_eq!(t.section_sizes[3], 14);
    }

    #[test]
    fn test_offset_invariant() {
        let t = sample();
        for i in 0..t.total() - 1 {
            let len = cp1252::byte_len(&t.strings().nth(i).unwrap().text) as u16 + 1;
            assert_eq!(t.offsets[i + 1], t.offsets[i] + len);
        }
    }

    #[test]
    fn test_find_classic_then_extra() {
        let t = sample();
        assert_eq!(t.find("Save Game"), Some(1));
        assert_eq!(t.find("save game"), Some(1));
        assert_eq!(t.find("Memory card"), Some(2));
        assert_eq!(t.find("Burning Torch"), Some(0x8004));
        assert_eq!(t.find("Nope"), None);
    }

    #[test]
    fn test_resolve_literal_forms() {
        let t = sample();
        assert_eq!(resolve_string_ref("#12", Some(&t)), StringRef::Index(12));
        assert_eq!(
            resolve_string_ref("!3", Some(&t)),
            StringRef::Index(0x8003)
        );
        assert_eq!(
            resolve_string_ref("&1F", Some(&t)),
            StringRef::Index(0x1F)
        );
    }

    #[test]
    fn test_resolve_lookup_and_miss() {
        let t = sample();
        assert_eq!(
            resolve_string_ref("Keyboard", Some(&t)),
            StringRef::Index(3)
        );
        assert_eq!(resolve_string_ref("Missing", Some(&t)), StringRef::Missing);
        assert_eq!(resolve_string_ref("Missing", None), StringRef::Index(0));
        assert_eq!(StringRef::Missing.index_or_zero(), 0);
    }

    #[test]
    fn test_counts() {
        let t = sample();
        assert_eq!(t.total(), 4);
        assert_eq!(t.count(LangSection::Strings), 2);
        assert_eq!(t.count(LangSection::Psx), 1);
        assert_eq!(t.count(LangSection::Pc), 1);
        assert_eq!(t.count(LangSection::ExtraNg), 1);
    }
}
