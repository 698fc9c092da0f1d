pub mod lexer;
pub mod parser;
pub mod read;

use std::fmt;

/// Input that does not match the grammar. Reported before anything is evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "<stdin>:{}:{}: error: {}", self.line, self.column, self.message) }
}

impl std::error::Error for SyntaxError {}

#[macro_export]
macro_rules! syntax_error {
    ($pos:expr, $($arg:tt)*) => (
        return Err($crate::reader::SyntaxError { message: format!($($arg)*), line: $pos.line, column: $pos.column })
    )
}
