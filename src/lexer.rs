use std::fmt;

use crate::cursor::Cursor;
use crate::error::{Diagnostics, ErrorKind};
use crate::position::Position;

/// All token variants produced by the lexer. The set is closed: the
/// punctuation listed here, the keywords, identifiers, and the
/// end-of-file sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Single-character tokens
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Semicolon,
    Comma,
    Star,
    Minus,
    Plus,
    Equal,
    Less,

    // Compound operators
    Arrow,      // ->
    MinusMinus, // --
    EqualEqual, // ==
    PlusEqual,  // +=
    LessEqual,  // <=

    // Keywords
    Fn,
    If,
    Else,
    Return,
    While,
    For,
    Struct,
    Mut,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
    Char,

    Identifier,
    EndOfFile,
}

impl TokenKind {
    /// Looks up a lexeme in the keyword table. The table is closed and
    /// case-sensitive; anything absent from it is an identifier.
    pub fn keyword(lexeme: &str) -> Option<TokenKind> {
        let kind = match lexeme {
            "fn" => TokenKind::Fn,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "return" => TokenKind::Return,
            "while" => TokenKind::While,
            "for" => TokenKind::For,
            "struct" => TokenKind::Struct,
            "mut" => TokenKind::Mut,
            "u8" => TokenKind::U8,
            "i8" => TokenKind::I8,
            "u16" => TokenKind::U16,
            "i16" => TokenKind::I16,
            "u32" => TokenKind::U32,
            "i32" => TokenKind::I32,
            "u64" => TokenKind::U64,
            "i64" => TokenKind::I64,
            "f32" => TokenKind::F32,
            "f64" => TokenKind::F64,
            "char" => TokenKind::Char,
            _ => return None,
        };
        Some(kind)
    }

    /// Whether this keyword names a builtin type.
    pub fn is_builtin_type(self) -> bool {
        matches!(
            self,
            TokenKind::U8
                | TokenKind::I8
                | TokenKind::U16
                | TokenKind::I16
                | TokenKind::U32
                | TokenKind::I32
                | TokenKind::U64
                | TokenKind::I64
                | TokenKind::F32
                | TokenKind::F64
                | TokenKind::Char
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spelling = match self {
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Star => "*",
            TokenKind::Minus => "-",
            TokenKind::Plus => "+",
            TokenKind::Equal => "=",
            TokenKind::Less => "<",
            TokenKind::Arrow => "->",
            TokenKind::MinusMinus => "--",
            TokenKind::EqualEqual => "==",
            TokenKind::PlusEqual => "+=",
            TokenKind::LessEqual => "<=",
            TokenKind::Fn => "fn",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Return => "return",
            TokenKind::While => "while",
            TokenKind::For => "for",
            TokenKind::Struct => "struct",
            TokenKind::Mut => "mut",
            TokenKind::U8 => "u8",
            TokenKind::I8 => "i8",
            TokenKind::U16 => "u16",
            TokenKind::I16 => "i16",
            TokenKind::U32 => "u32",
            TokenKind::I32 => "i32",
            TokenKind::U64 => "u64",
            TokenKind::I64 => "i64",
            TokenKind::F32 => "f32",
            TokenKind::F64 => "f64",
            TokenKind::Char => "char",
            TokenKind::Identifier => "identifier",
            TokenKind::EndOfFile => "eof",
        };
        f.write_str(spelling)
    }
}

/// A lexed token: kind, source lexeme and byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }

    /// The no-token sentinel, emitted when the lexer has nothing
    /// meaningful left (end of input, or quiescing after an error).
    /// `lex` filters it out; callers never treat it as data.
    pub fn end_of_file() -> Self {
        Self::new(TokenKind::EndOfFile, "", Position::default())
    }

    pub fn matches(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// Tokenizes `source`, reporting everything unrecognizable through the
/// sink. Lexing stops as soon as the sink holds an error; the tokens
/// produced up to that point are returned.
pub fn lex(source: &str, diagnostics: &mut Diagnostics) -> Vec<Token> {
    let mut lexer = Lexer {
        cursor: Cursor::new(source.as_bytes()),
        diagnostics,
    };

    let mut tokens = Vec::new();
    while !lexer.cursor.eof() && !lexer.diagnostics.has_errors() {
        let token = lexer.next_token();
        if !token.matches(TokenKind::EndOfFile) {
            tokens.push(token);
        }
    }

    tokens
}

struct Lexer<'src, 'd> {
    cursor: Cursor<'src, u8>,
    diagnostics: &'d mut Diagnostics,
}

impl Lexer<'_, '_> {
    fn next_token(&mut self) -> Token {
        if self.diagnostics.has_errors() {
            return Token::end_of_file();
        }

        self.skip_whitespace();

        let Some(&byte) = self.cursor.peek() else {
            return Token::end_of_file();
        };

        match byte {
            b'(' => self.lex_single(TokenKind::LeftParen),
            b')' => self.lex_single(TokenKind::RightParen),
            b'{' => self.lex_single(TokenKind::LeftBrace),
            b'}' => self.lex_single(TokenKind::RightBrace),
            b';' => self.lex_single(TokenKind::Semicolon),
            b',' => self.lex_single(TokenKind::Comma),
            b'*' => self.lex_single(TokenKind::Star),
            b'-' => self.lex_minus(),
            b'=' => self.lex_compound(b'=', TokenKind::EqualEqual, TokenKind::Equal),
            b'+' => self.lex_compound(b'=', TokenKind::PlusEqual, TokenKind::Plus),
            b'<' => self.lex_compound(b'=', TokenKind::LessEqual, TokenKind::Less),
            _ => self.lex_keyword_or_identifier(),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&byte) = self.cursor.peek() {
            match byte {
                b' ' | b'\t' | b'\r' | b'\n' => self.cursor.advance(1),
                _ => break,
            }
        }
    }

    fn lex_single(&mut self, kind: TokenKind) -> Token {
        let start = self.cursor.position();
        self.cursor.advance(1);
        Token::new(kind, kind.to_string(), Position::new(start, self.cursor.position()))
    }

    /// `-` is the one three-way dispatch: `->`, `--`, or bare minus.
    fn lex_minus(&mut self) -> Token {
        let start = self.cursor.position();

        let kind = match self.cursor.peek_ahead(1) {
            Some(b'>') => {
                self.cursor.advance(2);
                TokenKind::Arrow
            }
            Some(b'-') => {
                self.cursor.advance(2);
                TokenKind::MinusMinus
            }
            _ => {
                self.cursor.advance(1);
                TokenKind::Minus
            }
        };

        Token::new(kind, kind.to_string(), Position::new(start, self.cursor.position()))
    }

    /// Two-character operator when the next byte is `follow`, otherwise
    /// the single-character fallback.
    fn lex_compound(&mut self, follow: u8, compound: TokenKind, single: TokenKind) -> Token {
        let start = self.cursor.position();

        let kind = if self.cursor.peek_ahead(1) == Some(&follow) {
            self.cursor.advance(2);
            compound
        } else {
            self.cursor.advance(1);
            single
        };

        Token::new(kind, kind.to_string(), Position::new(start, self.cursor.position()))
    }

    fn lex_keyword_or_identifier(&mut self) -> Token {
        let start = self.cursor.position();

        let mut lexeme = String::new();
        while let Some(&byte) = self.cursor.peek() {
            if byte.is_ascii_alphanumeric() || byte == b'_' {
                lexeme.push(byte as char);
                self.cursor.advance(1);
            } else {
                break;
            }
        }

        // A zero-length run means the dispatch fell through on a byte no
        // token can start with; consume it so lexing always terminates.
        if lexeme.is_empty() {
            let byte = *self.cursor.peek().unwrap_or(&b' ');
            self.diagnostics.report(
                ErrorKind::Lex,
                Position::new(start, start + 1),
                format!("unrecognized character {:?}", byte as char),
            );
            self.cursor.advance(1);
            return Token::end_of_file();
        }

        let position = Position::new(start, self.cursor.position());
        match TokenKind::keyword(&lexeme) {
            Some(kind) => Token::new(kind, lexeme, position),
            None => Token::new(TokenKind::Identifier, lexeme, position),
        }
    }
}
