//! Readers for the external constant catalogs.
//!
//! Two input shapes are consumed through this narrow interface: the
//! scripter constants file (`NAME = value` lines) and the engine header's
//! C enums (slot and static lists). Both produce plain name→value maps for
//! the symbol resolver; names are stored uppercased.

use std::collections::HashMap;

/// Parse a numeric literal in the evaluator's syntax: decimal, `$hex`,
/// `0xhex`, or `#hex`.
pub fn parse_literal(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix('$') {
        return u32::from_str_radix(hex, 16).ok().map(i64::from);
    }
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return u32::from_str_radix(hex, 16).ok().map(i64::from);
    }
    if let Some(hex) = text.strip_prefix('#') {
        return u32::from_str_radix(hex, 16).ok().map(i64::from);
    }
    text.parse::<i64>().ok()
}

/// Parse `NAME = value` lines (the scripter constants format and the plugin
/// descriptor format). `;` starts a comment; malformed lines are skipped.
pub fn parse_constants_text(text: &str) -> HashMap<String, i32> {
    let mut out = HashMap::new();
    for raw in text.lines() {
        let line = match raw.find(';') {
            Some(i) => &raw[..i],
            None => raw,
        }
        .trim();
        if line.is_empty() || line.starts_with('[') {
            continue;
        }
        let Some(eq) = line.find('=') else { continue };
        let name = line[..eq].trim();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            continue;
        }
        if let Some(value) = parse_literal(&line[eq + 1..]) {
            out.insert(name.to_ascii_uppercase(), value as i32);
        }
    }
    out
}

/// Scrape enum entries out of a C header (the slot and static lists of
/// `Objects.h`). Entries are `NAME,` with an optional `= n` reset; the
/// running counter assigns ids. `#define NAME n` lines are picked up too.
pub fn parse_enum_header(text: &str) -> HashMap<String, i32> {
    let mut out = HashMap::new();
    let mut next = 0i32;
    for raw in text.lines() {
        let line = match raw.find("//") {
            Some(i) => &raw[..i],
            None => raw,
        }
        .trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix("#define") {
            let mut parts = rest.split_whitespace();
            if let (Some(name), Some(value)) = (parts.next(), parts.next()) {
                if let Some(v) = parse_literal(value) {
                    out.insert(name.to_ascii_uppercase(), v as i32);
                }
            }
            continue;
        }
        // One enum entry per line: `NAME,` or `NAME = n,`.
        let entry = line.trim_end_matches(',').trim();
        let (name, explicit) = match entry.find('=') {
            Some(eq) => (entry[..eq].trim(), parse_literal(&entry[eq + 1..])),
            None => (entry, None),
        };
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
            || name.chars().next().is_some_and(|c| c.is_ascii_digit())
        {
            continue;
        }
        if let Some(v) = explicit {
            next = v as i32;
        }
        out.insert(name.to_ascii_uppercase(), next);
        next += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal_forms() {
        assert_eq!(parse_literal("42"), Some(42));
        assert_eq!(parse_literal("-7"), Some(-7));
        assert_eq!(parse_literal("$1F"), Some(0x1F));
        assert_eq!(parse_literal("0x20"), Some(0x20));
        assert_eq!(parse_literal("#FF"), Some(0xFF));
        assert_eq!(parse_literal("bogus"), None);
    }

    #[test]
    fn test_constants_text() {
        let map = parse_constants_text(
            "; engine constants\n\
             CUST_DISABLE_SCREAMING = $10 ; comment\n\
             FT_SIZE_HALF = 4\n\
             not a line\n\
             [Header]\n",
        );
        assert_eq!(map.get("CUST_DISABLE_SCREAMING"), Some(&0x10));
        assert_eq!(map.get("FT_SIZE_HALF"), Some(&4));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_enum_header_counter_and_resets() {
        let map = parse_enum_header(
            "LARA, // player\n\
             PISTOLS_ANIM,\n\
             SHOTGUN_ANIM = 10,\n\
             UZI_ANIM,\n\
             #define NUM_OBJECTS 465\n",
        );
        assert_eq!(map.get("LARA"), Some(&0));
        assert_eq!(map.get("PISTOLS_ANIM"), Some(&1));
        assert_eq!(map.get("SHOTGUN_ANIM"), Some(&10));
        assert_eq!(map.get("UZI_ANIM"), Some(&11));
        assert_eq!(map.get("NUM_OBJECTS"), Some(&465));
    }
}
