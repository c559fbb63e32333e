//! Shared types for the NGSC compiler.
//!
//! This crate defines the script data model, source positions, the
//! diagnostic collector, the NG command schema catalog, language tables,
//! and the byte-stream input abstraction used across all compiler stages.

pub mod cp1252;
mod diag;
mod lang;
mod location;
pub mod model;
mod provider;
pub mod schema;

pub use diag::{Diagnostic, DiagnosticKind, DiagnosticSink, Severity};
pub use lang::{resolve_string_ref, LangSection, LangString, LanguageTable, StringRef};
pub use location::SourcePos;
pub use model::{
    ImportRecord, NgCommand, NgCommandGroup, NgValue, NumberVal, RawDirective, ScriptModel,
    Section, SectionKind,
};
pub use provider::{MemorySource, SourceProvider};
pub use schema::{NgArgKind, NgSchema, SchemaCatalog};
