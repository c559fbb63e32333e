//! NGSC code generation.
//!
//! Orchestrated by `ngsc-compiler`, this crate turns a parsed
//! [`ngsc_types::ScriptModel`] into the two binary artifacts:
//! 1. classic section byte streams (`classic`)
//! 2. NG command word streams (`ng`)
//! 3. the `script.dat` container with its NG trailer (`container`)
//! 4. `language.dat` payloads with their extra-string trailer (`langfile`)
//!
//! Framing primitives are pure functions over byte/word vectors (`words`,
//! `security`) so every chunk is unit-testable in isolation.

pub mod classic;
pub mod container;
mod error;
pub mod langfile;
pub mod ng;
pub mod security;
pub mod words;

pub use classic::ClassicCompiler;
pub use container::{write_script_dat, NgStreams};
pub use error::ContainerError;
pub use langfile::write_language_dat;
pub use ng::NgCompiler;
