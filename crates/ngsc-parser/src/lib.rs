//! NGSC directive parser.
//!
//! The driver walks the include stack of the main script, recognizes
//! section headers, and accumulates a [`ngsc_types::ScriptModel`]. The
//! supporting modules provide the layered symbol resolver, the additive
//! expression evaluator, the external constants-catalog readers, plugin
//! descriptor handling, and the language-file parser.

mod catalog;
mod eval;
mod language;
mod parser;
mod plugins;
mod symbols;

pub use catalog::{parse_constants_text, parse_enum_header, parse_literal};
pub use eval::{evaluate, EvalError, Evaluated};
pub use language::parse_language;
pub use parser::{ParseResult, ScriptParser};
pub use plugins::{PluginDescriptor, PluginSource};
pub use symbols::SymbolTable;
