//! NGSC lexer — turns raw directive-script text into logical lines.
//!
//! Features:
//! - Windows-1252 input (decoded via `ngsc-types::cp1252`)
//! - `;` comments stripped, with the `tag:` prefix rule for language files
//! - `>` continuation lines joined with a single space
//! - `=`-split into `(command, args)` with quote-aware comma splitting

mod line;
mod split;

pub use line::{LogicalLine, Normalizer};
pub use split::{split_args, split_directive, strip_quotes};
