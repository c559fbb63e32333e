//! Lexer integration tests over realistic script snippets.

use ngsc_lexer::{split_directive, Normalizer};

const SNIPPET: &str = "\
;------------------------------
; Tomb project gameflow
;------------------------------
[Level]
Name= The Lost Valley        ; display name
Legend= Explore the valley
TriggerGroup= 1, >           ; multi-line group
    $2000, 64, 1, >
    $2000, 65, 1
LoadCamera= 88722,-258083,98550,88520,-262250,99055,10
";

#[test]
fn test_snippet_normalizes_to_five_lines() {
    let lines: Vec<_> = Normalizer::new(SNIPPET, false).collect();
    let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "[Level]",
            "Name= The Lost Valley",
            "Legend= Explore the valley",
            "TriggerGroup= 1, $2000, 64, 1, $2000, 65, 1",
            "LoadCamera= 88722,-258083,98550,88520,-262250,99055,10",
        ]
    );
    // Joined line keeps its start line; the next directive keeps its own.
    assert_eq!(lines[3].line, 7);
    assert_eq!(lines[4].line, 10);
}

#[test]
fn test_directive_split_over_joined_line() {
    let lines: Vec<_> = Normalizer::new(SNIPPET, false).collect();
    let (cmd, args) = split_directive(&lines[3].text).unwrap();
    assert_eq!(cmd, "TriggerGroup=");
    assert_eq!(args, vec!["1", "$2000", "64", "1", "$2000", "65", "1"]);
}

#[test]
fn test_negative_arguments_survive_splitting() {
    let (_, args) = split_directive("LoadCamera= 88722,-258083,98550,88520,-262250,99055,10").unwrap();
    assert_eq!(args[1], "-258083");
    assert_eq!(args.len(), 7);
}

#[test]
fn test_quoted_title_with_comma() {
    let (cmd, args) = split_directive(r#"WindowTitle= "Tomb, Revisited""#).unwrap();
    assert_eq!(cmd, "WindowTitle=");
    assert_eq!(args, vec![r#""Tomb, Revisited""#]);
}

#[test]
fn test_crlf_input() {
    let lines: Vec<_> = Normalizer::new("Cut= 1\r\nCut= 2\r\n", false).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].text, "Cut= 1");
    assert_eq!(lines[1].text, "Cut= 2");
}
