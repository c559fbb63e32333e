//! Logical-line normalization.
//!
//! A logical line is one directive after comment stripping and
//! continuation joining. Blank results are skipped; the line number of a
//! joined line is the number of the physical line it started on.

use ngsc_types::cp1252;

/// One normalized line with its 1-based physical start line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    pub text: String,
    pub line: u32,
}

/// Iterator of [`LogicalLine`]s over one source file.
pub struct Normalizer {
    lines: Vec<String>,
    /// Index of the next physical line to consume.
    next: usize,
    /// Language files keep `;` inside a leading `tag:` token.
    tag_aware: bool,
}

impl Normalizer {
    /// Normalize already-decoded text.
    pub fn new(text: &str, tag_aware: bool) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
            next: 0,
            tag_aware,
        }
    }

    /// Decode raw bytes as Windows-1252 and normalize.
    pub fn from_cp1252(bytes: &[u8], tag_aware: bool) -> Self {
        Self::new(&cp1252::decode(bytes), tag_aware)
    }

    /// Trim, strip the comment, trim again.
    fn clean(&self, raw: &str) -> String {
        strip_comment(raw.trim_matches(' '), self.tag_aware)
            .trim_matches(' ')
            .to_string()
    }
}

impl Iterator for Normalizer {
    type Item = LogicalLine;

    fn next(&mut self) -> Option<LogicalLine> {
        while self.next < self.lines.len() {
            let start = self.next;
            self.next += 1;
            let mut text = self.clean(&self.lines[start]);
            if text.is_empty() {
                continue;
            }

            // Join continuation lines: a trailing `>` glues the next
            // physical line on with a single space.
            while text.ends_with('>') {
                text.pop();
                while text.ends_with(' ') {
                    text.pop();
                }
                let continuation = match self.lines.get(self.next).cloned() {
                    Some(raw) => {
                        self.next += 1;
                        self.clean(&raw)
                    }
                    None => String::new(),
                };
                if !continuation.is_empty() {
                    text.push(' ');
                    text.push_str(&continuation);
                }
            }

            return Some(LogicalLine {
                text,
                line: start as u32 + 1,
            });
        }
        None
    }
}

/// Drop everything from the first `;` onward.
///
/// When `tag_aware`, a leading `tag:` token (no whitespace before the
/// colon) shields any `;` inside it; the comment then starts at the first
/// `;` after the colon.
fn strip_comment(s: &str, tag_aware: bool) -> &str {
    if tag_aware {
        if let Some(colon) = s.find(':') {
            if !s[..colon].contains(char::is_whitespace) {
                return match s[colon..].find(';') {
                    Some(rel) => &s[..colon + rel],
                    None => s,
                };
            }
        }
    }
    match s.find(';') {
        Some(i) => &s[..i],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all(text: &str) -> Vec<LogicalLine> {
        Normalizer::new(text, false).collect()
    }

    #[test]
    fn test_blank_and_comment_lines_skipped() {
        let lines = all("\n; full comment\n   \nFMV= 3, 1\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "FMV= 3, 1");
        assert_eq!(lines[0].line, 4);
    }

    #[test]
    fn test_trailing_comment_stripped() {
        let lines = all("Cut= 5 ; intro cutscene");
        assert_eq!(lines[0].text, "Cut= 5");
    }

    #[test]
    fn test_continuation_joined_with_single_space() {
        let lines = all("TriggerGroup= 1, >\n    2, 3\nCut= 1");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "TriggerGroup= 1, 2, 3");
        assert_eq!(lines[0].line, 1);
        assert_eq!(lines[1].line, 3);
    }

    #[test]
    fn test_continuation_after_comment() {
        // The `>` counts only when it survives comment stripping.
        let lines = all("Cut= 5 ; trailing > comment\nFMV= 1, 0");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Cut= 5");
    }

    #[test]
    fn test_chained_continuations() {
        let lines = all("A= 1, > ; one\n2, >\n3");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "A= 1, 2, 3");
    }

    #[test]
    fn test_continuation_at_eof() {
        let lines = all("A= 1, >");
        assert_eq!(lines[0].text, "A= 1,");
    }

    #[test]
    fn test_tag_aware_comment() {
        assert_eq!(strip_comment("red;bold: Hello ; note", true), "red;bold: Hello ");
        assert_eq!(strip_comment("red;bold: Hello ; note", false), "red");
        assert_eq!(strip_comment("Hello ; note", true), "Hello ");
        assert_eq!(strip_comment("a b: x ; note", true), "a b: x ");
    }

    #[test]
    fn test_cp1252_input() {
        let lines: Vec<LogicalLine> =
            Normalizer::from_cp1252(&[b'N', b'a', b'm', b'e', b'=', b' ', 0xE9], false).collect();
        assert_eq!(lines[0].text, "Name= \u{e9}");
    }
}
