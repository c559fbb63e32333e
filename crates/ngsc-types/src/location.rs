use serde::{Deserialize, Serialize};
use std::fmt;

/// Source position of a logical line.
///
/// Line numbers are 1-based and per-file: the include stack keeps one
/// running counter per open file, so a diagnostic always points into the
/// file it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourcePos {
    /// Source file name (as opened, without directory).
    pub file: String,
    /// 1-based logical line number. Continuation lines keep the number of
    /// the line they started on.
    pub line: u32,
}

impl SourcePos {
    /// Create a new position.
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let pos = SourcePos::new("SCRIPT.TXT", 42);
        assert_eq!(format!("{pos}"), "SCRIPT.TXT:42");
    }
}
