use crate::SourcePos;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity.
///
/// Fatal entries set the abort flag consumed at phase boundaries; warnings
/// never stop the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Fatal,
    Warning,
}

/// Diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// Unknown section, missing `=`, malformed `#define`, bad language index.
    Parse,
    /// Argument outside its documented bounds.
    Range,
    /// Unknown NG command, wrong argument count or kind.
    Schema,
    /// Unknown symbol or string.
    Reference,
    /// NG schema occurrence cap exceeded.
    Occurrence,
    /// Missing file or unreadable encoding.
    Resource,
    /// Unreachable cases.
    Internal,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "parse"),
            Self::Range => write!(f, "range"),
            Self::Schema => write!(f, "schema"),
            Self::Reference => write!(f, "reference"),
            Self::Occurrence => write!(f, "occurrence"),
            Self::Resource => write!(f, "resource"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// One collected diagnostic with its source context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    #[serde(flatten)]
    pub pos: SourcePos,
}

impl Diagnostic {
    /// Create a fatal diagnostic.
    pub fn fatal(kind: DiagnosticKind, pos: SourcePos, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Fatal,
            message: message.into(),
            pos,
        }
    }

    /// Create a warning.
    pub fn warning(kind: DiagnosticKind, pos: SourcePos, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            message: message.into(),
            pos,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Fatal => "error",
            Severity::Warning => "warning",
        };
        write!(
            f,
            "{}: {} [{}]: {}",
            self.pos, severity, self.kind, self.message
        )
    }
}

impl std::error::Error for Diagnostic {}

/// Append-only diagnostic collector shared by every compiler stage.
///
/// Insertion order is preserved; [`DiagnosticSink::display_order`] lists
/// fatal entries first while keeping insertion order within each severity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosticSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Append a fatal diagnostic.
    pub fn fatal(&mut self, kind: DiagnosticKind, pos: SourcePos, message: impl Into<String>) {
        self.push(Diagnostic::fatal(kind, pos, message));
    }

    /// Append a warning.
    pub fn warning(&mut self, kind: DiagnosticKind, pos: SourcePos, message: impl Into<String>) {
        self.push(Diagnostic::warning(kind, pos, message));
    }

    /// True if any fatal diagnostic was collected. Consulted at phase
    /// boundaries to abort the pipeline.
    pub fn has_fatal(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Fatal)
    }

    /// Number of fatal entries.
    pub fn fatal_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Fatal)
            .count()
    }

    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.fatal_count()
    }

    /// Diagnostics in display order: fatal first, insertion order preserved
    /// within each severity.
    pub fn display_order(&self) -> Vec<&Diagnostic> {
        let mut out: Vec<&Diagnostic> = self
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Fatal)
            .collect();
        out.extend(
            self.diagnostics
                .iter()
                .filter(|d| d.severity == Severity::Warning),
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: u32) -> SourcePos {
        SourcePos::new("SCRIPT.TXT", line)
    }

    #[test]
    fn test_has_fatal() {
        let mut sink = DiagnosticSink::new();
        assert!(!sink.has_fatal());
        sink.warning(DiagnosticKind::Reference, pos(1), "unknown string");
        assert!(!sink.has_fatal());
        sink.fatal(DiagnosticKind::Parse, pos(2), "unknown section");
        assert!(sink.has_fatal());
        assert_eq!(sink.fatal_count(), 1);
        assert_eq!(sink.warning_count(), 1);
    }

    #[test]
    fn test_display_order_fatal_first() {
        let mut sink = DiagnosticSink::new();
        sink.warning(DiagnosticKind::Reference, pos(1), "w1");
        sink.fatal(DiagnosticKind::Range, pos(2), "f1");
        sink.warning(DiagnosticKind::Schema, pos(3), "w2");
        sink.fatal(DiagnosticKind::Occurrence, pos(4), "f2");

        let order: Vec<&str> = sink
            .display_order()
            .iter()
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(order, vec!["f1", "f2", "w1", "w2"]);
    }

    #[test]
    fn test_display_format() {
        let d = Diagnostic::fatal(DiagnosticKind::Range, pos(7), "Cut index 99 out of range");
        assert_eq!(
            format!("{d}"),
            "SCRIPT.TXT:7: error [range]: Cut index 99 out of range"
        );
    }

    #[test]
    fn test_json_serialization() {
        let mut sink = DiagnosticSink::new();
        sink.fatal(DiagnosticKind::Schema, pos(3), "unknown NG command");
        let json = serde_json::to_string(&sink).unwrap();
        assert!(json.contains("\"kind\":\"schema\""));
        assert!(json.contains("\"severity\":\"fatal\""));
        assert!(json.contains("\"line\":3"));

        let back: DiagnosticSink = serde_json::from_str(&json).unwrap();
        assert_eq!(back.diagnostics.len(), 1);
        assert!(back.has_fatal());
    }
}
