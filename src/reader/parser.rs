use std::fmt;

use crate::reader::lexer::{Token, TokenKind};
use crate::reader::SyntaxError;
use crate::syntax_error;

/// A generic parse-tree node.
///
/// `tag` names the grammar rule(s) that produced the node, joined by `|` (`expr|number|regex`); the root is tagged
/// `>`. Leaves carry their literal text in `contents`, interior nodes carry `children` in source order.
#[derive(Clone, PartialEq)]
pub struct Ast {
    pub tag: String,
    pub contents: String,
    pub children: Vec<Ast>,
}

impl Ast {
    fn leaf(tag: &str, contents: &str) -> Ast {
        Ast {
            tag: tag.to_string(),
            contents: contents.to_string(),
            children: Vec::new(),
        }
    }

    fn node(tag: &str, children: Vec<Ast>) -> Ast {
        Ast {
            tag: tag.to_string(),
            contents: String::new(),
            children,
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}{}", "", self.tag, indent = depth * 2)?;
        if !self.contents.is_empty() {
            write!(f, " '{}'", self.contents)?;
        }
        writeln!(f)?;
        self.children.iter().try_for_each(|child| child.write_indented(f, depth + 1))
    }
}

// Same layout as mpc's ast printer, handy in trace logs.
impl fmt::Debug for Ast {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { self.write_indented(f, 0) }
}

struct Parser<'a> {
    tokens: &'a [Token],
    cursor: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> { self.tokens.get(self.cursor) }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.cursor)?;
        self.cursor += 1;
        Some(token)
    }

    /// expr : <number> | <symbol> | <sexpr> | <qexpr>
    fn expr(&mut self, token: &'a Token) -> Result<Ast, SyntaxError> {
        match token.kind {
            TokenKind::Number => Ok(Ast::leaf("expr|number|regex", &token.text)),
            TokenKind::Symbol => Ok(Ast::leaf("expr|symbol|regex", &token.text)),
            TokenKind::OpenParen => self.list("expr|sexpr|>", token, TokenKind::CloseParen),
            TokenKind::OpenBrace => self.list("expr|qexpr|>", token, TokenKind::CloseBrace),
            TokenKind::CloseParen | TokenKind::CloseBrace => {
                syntax_error!(token.pos, "unexpected '{}', expected number, symbol, '(' or '{{'", token.text)
            }
        }
    }

    /// sexpr : '(' <expr>* ')' ; qexpr : '{' <expr>* '}'
    fn list(&mut self, tag: &str, open: &Token, close: TokenKind) -> Result<Ast, SyntaxError> {
        let mut children = vec![Ast::leaf("char", &open.text)];
        loop {
            match self.peek() {
                None => syntax_error!(open.pos, "unclosed '{}'", open.text),
                Some(token) if token.kind == close => {
                    self.cursor += 1;
                    children.push(Ast::leaf("char", &token.text));
                    return Ok(Ast::node(tag, children));
                }
                Some(token) if matches!(token.kind, TokenKind::CloseParen | TokenKind::CloseBrace) => {
                    syntax_error!(token.pos, "unexpected '{}', '{}' opened at {}:{} is not closed", token.text, open.text, open.pos.line, open.pos.column)
                }
                Some(token) => {
                    self.cursor += 1;
                    children.push(self.expr(token)?);
                }
            }
        }
    }
}

/// cumunisp : /^/ <expr>* /$/
pub fn parse(tokens: &[Token]) -> Result<Ast, SyntaxError> {
    let mut parser = Parser { tokens, cursor: 0 };
    let mut children = vec![Ast::leaf("regex", "")];
    while let Some(token) = parser.advance() {
        children.push(parser.expr(token)?);
    }
    children.push(Ast::leaf("regex", ""));
    Ok(Ast::node(">", children))
}

/// Depth of delimiters still open at the end of `tokens`; positive while input is incomplete.
pub fn open_depth(tokens: &[Token]) -> isize {
    tokens.iter().fold(0, |depth, token| match token.kind {
        TokenKind::OpenParen | TokenKind::OpenBrace => depth + 1,
        TokenKind::CloseParen | TokenKind::CloseBrace => depth - 1,
        _ => depth,
    })
}
