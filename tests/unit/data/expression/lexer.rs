use super::*;

fn kinds(src: &str) -> Vec<TokenKind> {
    lex(src).unwrap().into_iter().map(|t| t.kind).collect()
}

#[test]
fn lexes_operators_and_literals() {
    assert_eq!(
        kinds("a.b[2] >= 1.5 || !x | f('s')"),
        vec![
            TokenKind::Ident("a".into()),
            TokenKind::Dot,
            TokenKind::Ident("b".into()),
            TokenKind::LBracket,
            TokenKind::Number(2.0),
            TokenKind::RBracket,
            TokenKind::Ge,
            TokenKind::Number(1.5),
            TokenKind::OrOr,
            TokenKind::Bang,
            TokenKind::Ident("x".into()),
            TokenKind::Pipe,
            TokenKind::Ident("f".into()),
            TokenKind::LParen,
            TokenKind::Str("s".into()),
            TokenKind::RParen,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn string_escapes() {
    assert_eq!(kinds(r"'It\'s'")[0], TokenKind::Str("It's".into()));
    assert_eq!(kinds(r#""a\\b""#)[0], TokenKind::Str(r"a\b".into()));
    assert_eq!(kinds(r"'\n'")[0], TokenKind::Str(r"\n".into()));
}

#[test]
fn reports_offsets() {
    let err = lex("1 + 'open").unwrap_err();
    assert_eq!(err.offset, 4);
    let err = lex("a # b").unwrap_err();
    assert_eq!(err.offset, 2);
}
