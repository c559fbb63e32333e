//! NGSC compiler: orchestrates the full compilation pipeline.
//!
//! ```text
//! SCRIPT.TXT → Parser → (Language Parser per file) →
//!     Classic Compiler → NG Compiler → Container Writer →
//!         script.dat + <LANG>.DAT
//! ```
//!
//! All file access goes through [`ngsc_types::SourceProvider`]; the only
//! entropy source (the security chunk) is seeded deterministically from
//! the input unless a seed is given, so identical inputs produce identical
//! bytes.

mod pipeline;

pub use ngsc_parser::PluginSource;
pub use pipeline::{compile, CompileConfig, CompileOutput};
