use std::iter::Peekable;
use std::str::Chars;

use crate::reader::SyntaxError;
use crate::syntax_error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Number,
    Symbol,
}

/// 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub pos: Position,
}

fn is_symbol_char(c: char) -> bool { c.is_ascii_alphanumeric() || "_+-*/\\=<>!&%^".contains(c) }

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    pos: Position,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Lexer<'a> {
        Lexer {
            chars: src.chars().peekable(),
            pos: Position { line: 1, column: 1 },
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else {
            self.pos.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.bump();
        }
    }

    fn take_while(&mut self, text: &mut String, pred: impl Fn(char) -> bool) {
        while let Some(&c) = self.chars.peek() {
            if !pred(c) {
                break;
            }
            text.push(c);
            self.bump();
        }
    }

    // /-?[0-9]+(\.[0-9]*)?/ ; None when the input here is not a number.
    fn number(&mut self) -> Option<String> {
        let mut ahead = self.chars.clone();
        let negative = ahead.peek() == Some(&'-');
        if negative {
            ahead.next();
        }
        if !ahead.peek().is_some_and(|c| c.is_ascii_digit()) {
            return None;
        }

        let mut text = String::new();
        if negative {
            text.push('-');
            self.bump();
        }
        self.take_while(&mut text, |c| c.is_ascii_digit());
        if self.chars.peek() == Some(&'.') {
            text.push('.');
            self.bump();
            self.take_while(&mut text, |c| c.is_ascii_digit());
        }
        Some(text)
    }

    fn next_token(&mut self) -> Result<Option<Token>, SyntaxError> {
        self.skip_whitespace();
        let pos = self.pos;
        let c = match self.chars.peek() {
            Some(&c) => c,
            None => return Ok(None),
        };

        let delimiter = match c {
            '(' => Some(TokenKind::OpenParen),
            ')' => Some(TokenKind::CloseParen),
            '{' => Some(TokenKind::OpenBrace),
            '}' => Some(TokenKind::CloseBrace),
            _ => None,
        };
        if let Some(kind) = delimiter {
            self.bump();
            return Ok(Some(Token { kind, text: c.to_string(), pos }));
        }

        if let Some(text) = self.number() {
            return Ok(Some(Token {
                kind: TokenKind::Number,
                text,
                pos,
            }));
        }

        if is_symbol_char(c) {
            let mut text = String::new();
            self.take_while(&mut text, is_symbol_char);
            return Ok(Some(Token {
                kind: TokenKind::Symbol,
                text,
                pos,
            }));
        }

        syntax_error!(pos, "unexpected {:?}, expected number, symbol, '(' or '{{'", c)
    }
}

pub fn tokenize(src: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut lexer = Lexer::new(src);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}
