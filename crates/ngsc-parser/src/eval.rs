//! Additive expression evaluation.
//!
//! `+` is the outer separator and `-` the inner subtractor, evaluated
//! strictly left to right: `a + b - c + d` is `((a + b) - c) + d`. Terms
//! are decimal literals, `$hex`, `0xhex`, `#hex`, the `IGNORE` sentinel
//! (−1), or names resolved through the symbol table.

use crate::catalog::parse_literal;
use crate::symbols::SymbolTable;
use thiserror::Error;

/// Evaluation failure. Both variants are hard errors for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("cannot evaluate term `{0}`")]
    BadTerm(String),
    #[error("unknown symbol `{0}`")]
    UnknownSymbol(String),
}

/// Result of evaluating one expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluated {
    pub value: i64,
    /// Plugin id of the last name resolved through a plugin layer, 0 when
    /// none was.
    pub plugin: u16,
}

/// Evaluate an additive expression against the symbol table, with user
/// defines scoped to `current_file`.
pub fn evaluate(
    expr: &str,
    symbols: &SymbolTable,
    current_file: &str,
) -> Result<Evaluated, EvalError> {
    let mut plugin = 0u16;
    let mut sum = 0i64;
    for term in expr.split('+') {
        let mut subterms = term.split('-');
        // A leading `-` leaves an empty first subterm, read as zero.
        let first = subterms.next().unwrap_or("");
        let mut value = if first.trim().is_empty() && term.contains('-') {
            0
        } else {
            atom(first, symbols, current_file, &mut plugin)?
        };
        for sub in subterms {
            value -= atom(sub, symbols, current_file, &mut plugin)?;
        }
        sum += value;
    }
    Ok(Evaluated {
        value: sum,
        plugin,
    })
}

fn atom(
    text: &str,
    symbols: &SymbolTable,
    current_file: &str,
    plugin: &mut u16,
) -> Result<i64, EvalError> {
    let text = text.trim_matches(' ');
    if text.is_empty() {
        return Err(EvalError::BadTerm(text.into()));
    }
    if text.eq_ignore_ascii_case("IGNORE") {
        return Ok(-1);
    }
    if let Some(v) = parse_literal(text) {
        return Ok(v);
    }
    if text
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        match symbols.lookup(text, current_file) {
            Some((value, id)) => {
                if id != 0 {
                    *plugin = id;
                }
                return Ok(i64::from(value));
            }
            None => return Err(EvalError::UnknownSymbol(text.into())),
        }
    }
    Err(EvalError::BadTerm(text.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn symbols() -> SymbolTable {
        let mut t = SymbolTable::new();
        t.set_engine_constants(HashMap::from([
            ("FT_SIZE_HALF".into(), 4),
            ("FT_BOTTOM".into(), 0x100),
        ]));
        t.add_plugin_layer("plugin_x", HashMap::from([("PLUG_VAL".into(), 0x20)]));
        t.bind_plugin_id("plugin_x", 2);
        t
    }

    fn eval(expr: &str) -> Evaluated {
        evaluate(expr, &symbols(), "s.txt").unwrap()
    }

    #[test]
    fn test_left_to_right_sum() {
        assert_eq!(eval("1 + 2 - 3 + 4").value, 4);
    }

    #[test]
    fn test_literal_forms() {
        assert_eq!(eval("$10").value, 16);
        assert_eq!(eval("0x10").value, 16);
        assert_eq!(eval("#10").value, 16);
        assert_eq!(eval("10").value, 10);
    }

    #[test]
    fn test_ignore_sentinel() {
        assert_eq!(eval("IGNORE").value, -1);
        assert_eq!(eval("ignore").value, -1);
    }

    #[test]
    fn test_leading_negative() {
        assert_eq!(eval("-5").value, -5);
        assert_eq!(eval("-5 + 8").value, 3);
    }

    #[test]
    fn test_names_combine_with_literals() {
        assert_eq!(eval("FT_SIZE_HALF + FT_BOTTOM").value, 0x104);
        assert_eq!(eval("FT_BOTTOM - 1").value, 0xFF);
    }

    #[test]
    fn test_plugin_id_remembered() {
        let r = eval("FT_SIZE_HALF + PLUG_VAL");
        assert_eq!(r.value, 0x24);
        assert_eq!(r.plugin, 2);
        assert_eq!(eval("FT_SIZE_HALF").plugin, 0);
    }

    #[test]
    fn test_unknown_symbol_is_hard_error() {
        assert_eq!(
            evaluate("NOPE", &symbols(), "s.txt"),
            Err(EvalError::UnknownSymbol("NOPE".into()))
        );
    }

    #[test]
    fn test_garbage_term_is_hard_error() {
        assert!(matches!(
            evaluate("1 + !!", &symbols(), "s.txt"),
            Err(EvalError::BadTerm(_))
        ));
    }
}
