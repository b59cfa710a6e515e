use mini2c::error::{Diagnostics, ErrorKind};
use mini2c::lexer::{lex, TokenKind};
use mini2c::typechecker::BuiltinType;

fn kinds(source: &str) -> Vec<TokenKind> {
    let mut diagnostics = Diagnostics::new();
    let tokens = lex(source, &mut diagnostics);
    assert!(
        !diagnostics.has_errors(),
        "lexing {:?} should not error",
        source
    );
    tokens.into_iter().map(|token| token.kind).collect()
}

#[test]
fn test_minus_disambiguation() {
    let mut diagnostics = Diagnostics::new();
    let tokens = lex("- -> --", &mut diagnostics);

    assert!(!diagnostics.has_errors());
    let token_kinds: Vec<TokenKind> = tokens.iter().map(|token| token.kind).collect();
    let lexemes: Vec<&str> = tokens.iter().map(|token| token.lexeme.as_str()).collect();
    assert_eq!(
        token_kinds,
        vec![TokenKind::Minus, TokenKind::Arrow, TokenKind::MinusMinus]
    );
    assert_eq!(lexemes, vec!["-", "->", "--"]);
}

#[test]
fn test_equal_less_plus_compounds() {
    assert_eq!(
        kinds("= == < <= + +="),
        vec![
            TokenKind::Equal,
            TokenKind::EqualEqual,
            TokenKind::Less,
            TokenKind::LessEqual,
            TokenKind::Plus,
            TokenKind::PlusEqual,
        ]
    );
}

#[test]
fn test_punctuation() {
    assert_eq!(
        kinds("( ) { } ; , *"),
        vec![
            TokenKind::LeftParen,
            TokenKind::RightParen,
            TokenKind::LeftBrace,
            TokenKind::RightBrace,
            TokenKind::Semicolon,
            TokenKind::Comma,
            TokenKind::Star,
        ]
    );
}

#[test]
fn test_identifier_vs_keyword() {
    let mut diagnostics = Diagnostics::new();
    let tokens = lex("mut foo_bar mutation", &mut diagnostics);

    assert!(!diagnostics.has_errors());
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].kind, TokenKind::Mut);
    assert_eq!(tokens[0].lexeme, "mut");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].lexeme, "foo_bar");
    // Longest match: 'mutation' is one identifier, not 'mut' + 'ation'.
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].lexeme, "mutation");
}

#[test]
fn test_builtin_type_keywords() {
    let source = "u8 i8 u16 i16 u32 i32 u64 i64 f32 f64 char";
    let mut diagnostics = Diagnostics::new();
    let tokens = lex(source, &mut diagnostics);

    assert!(!diagnostics.has_errors());
    assert_eq!(tokens.len(), 11);
    for token in &tokens {
        assert!(
            token.kind.is_builtin_type(),
            "{:?} should be a builtin type keyword",
            token.lexeme
        );
        assert!(
            BuiltinType::from_token(token.kind).is_some(),
            "{:?} should resolve to a builtin type",
            token.lexeme
        );
    }
}

#[test]
fn test_keyword_table_never_maps_to_eof() {
    let keywords = [
        "fn", "if", "else", "return", "while", "for", "struct", "mut", "u8", "i8", "u16", "i16",
        "u32", "i32", "u64", "i64", "f32", "f64", "char",
    ];
    for keyword in keywords {
        let kind = TokenKind::keyword(keyword);
        assert!(kind.is_some(), "{:?} should be in the keyword table", keyword);
        assert_ne!(kind, Some(TokenKind::EndOfFile));
        assert_ne!(kind, Some(TokenKind::Identifier));
    }

    assert_eq!(TokenKind::keyword("foo"), None);
    assert_eq!(TokenKind::keyword("Mut"), None, "keyword table is case-sensitive");
}

#[test]
fn test_empty_source() {
    let mut diagnostics = Diagnostics::new();
    let tokens = lex("", &mut diagnostics);
    assert!(tokens.is_empty());
    assert!(!diagnostics.has_errors());
}

#[test]
fn test_whitespace_only_source() {
    let mut diagnostics = Diagnostics::new();
    let tokens = lex(" \t\r\n  \n", &mut diagnostics);
    assert!(tokens.is_empty());
    assert!(!diagnostics.has_errors());
}

#[test]
fn test_bare_minus_at_end_of_input() {
    assert_eq!(kinds("-"), vec![TokenKind::Minus]);
    assert_eq!(kinds("a -"), vec![TokenKind::Identifier, TokenKind::Minus]);
}

#[test]
fn test_unrecognized_character_reports_and_terminates() {
    let mut diagnostics = Diagnostics::new();
    let tokens = lex("@", &mut diagnostics);

    assert!(tokens.is_empty());
    assert!(diagnostics.has_errors());
    assert_eq!(diagnostics.len(), 1);

    let diagnostic = diagnostics.iter().next().unwrap();
    assert_eq!(diagnostic.kind, ErrorKind::Lex);
    assert!(diagnostic.message.contains('@'));
    assert_eq!(diagnostic.position.start, 0);
    assert_eq!(diagnostic.position.end, 1);
}

#[test]
fn test_lexing_stops_at_first_error() {
    let mut diagnostics = Diagnostics::new();
    let tokens = lex("abc @ def", &mut diagnostics);

    // The prefix before the bad character survives; nothing after it does.
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].lexeme, "abc");
    assert!(diagnostics.has_errors());
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn test_terminates_on_junk_input() {
    for junk in ["@@@@@", "###", "\u{00e9}\u{00e9}", "$", "`~"] {
        let mut diagnostics = Diagnostics::new();
        let _ = lex(junk, &mut diagnostics);
        assert!(diagnostics.has_errors(), "{:?} should report a lex error", junk);
    }
}

#[test]
fn test_positions_cover_consumed_ranges() {
    let mut diagnostics = Diagnostics::new();
    let tokens = lex("- -> --", &mut diagnostics);

    assert!(!diagnostics.has_errors());
    let positions: Vec<(usize, usize)> = tokens
        .iter()
        .map(|token| (token.position.start, token.position.end))
        .collect();
    assert_eq!(positions, vec![(0, 1), (2, 4), (5, 7)]);
}

#[test]
fn test_positions_are_monotonic() {
    let source = "fn main() -> i32 {\n    mut i32 x = 1;\n    x += 2;\n    return x;\n}\n";
    let mut diagnostics = Diagnostics::new();
    let tokens = lex(source, &mut diagnostics);

    assert!(!diagnostics.has_errors());
    assert!(!tokens.is_empty());
    for pair in tokens.windows(2) {
        assert!(
            pair[0].position.end <= pair[1].position.start,
            "token {:?} overlaps {:?}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn test_adjacent_tokens_without_whitespace() {
    assert_eq!(
        kinds("x<=y"),
        vec![TokenKind::Identifier, TokenKind::LessEqual, TokenKind::Identifier]
    );
    assert_eq!(
        kinds("i--"),
        vec![TokenKind::Identifier, TokenKind::MinusMinus]
    );
    assert_eq!(
        kinds("f(x)"),
        vec![
            TokenKind::Identifier,
            TokenKind::LeftParen,
            TokenKind::Identifier,
            TokenKind::RightParen,
        ]
    );
}
