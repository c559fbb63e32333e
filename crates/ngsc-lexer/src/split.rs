//! Directive splitting: `command=` extraction and quote-aware argument
//! separation.

/// Split a logical line at its first `=`.
///
/// Returns the command token *including* the `=` and the comma-split
/// argument list. `None` when the line has no `=`.
pub fn split_directive(text: &str) -> Option<(String, Vec<String>)> {
    let eq = text.find('=')?;
    let command = format!("{}=", text[..eq].trim_matches(' '));
    Some((command, split_args(&text[eq + 1..])))
}

/// Comma-split an argument suffix; commas inside paired `"…"` do not split.
/// Each argument is trimmed of outer spaces. An all-blank suffix yields an
/// empty list.
pub fn split_args(suffix: &str) -> Vec<String> {
    if suffix.trim_matches(' ').is_empty() {
        return Vec::new();
    }
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in suffix.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => {
                args.push(current.trim_matches(' ').to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    args.push(current.trim_matches(' ').to_string());
    args
}

/// Strip one pair of enclosing double quotes, if present.
///
/// Only applied when an argument is consumed as a string-typed NG argument.
pub fn strip_quotes(arg: &str) -> &str {
    arg.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(arg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_directive_keeps_equals() {
        let (cmd, args) = split_directive("FMV= 3, 1").unwrap();
        assert_eq!(cmd, "FMV=");
        assert_eq!(args, vec!["3", "1"]);
    }

    #[test]
    fn test_split_directive_space_before_equals() {
        let (cmd, args) = split_directive("Name = The Tomb").unwrap();
        assert_eq!(cmd, "Name=");
        assert_eq!(args, vec!["The Tomb"]);
    }

    #[test]
    fn test_missing_equals() {
        assert!(split_directive("[Level]").is_none());
    }

    #[test]
    fn test_no_args() {
        let (cmd, args) = split_directive("ResetHUB=").unwrap();
        assert_eq!(cmd, "ResetHUB=");
        assert!(args.is_empty());
    }

    #[test]
    fn test_quoted_comma_does_not_split() {
        let args = split_args(r#" 1, "Hello, world", 2 "#);
        assert_eq!(args, vec!["1", r#""Hello, world""#, "2"]);
    }

    #[test]
    fn test_empty_inner_args_kept() {
        assert_eq!(split_args("1,,2"), vec!["1", "", "2"]);
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes(r#""Hello, world""#), "Hello, world");
        assert_eq!(strip_quotes("plain"), "plain");
        assert_eq!(strip_quotes("\"unbalanced"), "\"unbalanced");
    }
}
