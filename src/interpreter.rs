pub mod builtin;
pub mod env;
pub mod error;
pub mod eval;
pub mod value;


use tracing::debug;

use crate::interpreter::env::Env;
use crate::interpreter::value::Value;
use crate::reader::parser::{self, Ast};
use crate::reader::{lexer, read, SyntaxError};

pub fn parse_code(src: &str) -> Result<Ast, SyntaxError> {
    let tokens = lexer::tokenize(src)?;
    parser::parse(&tokens)
}

/// One interpreter session: the environment every input line is evaluated in.
pub struct Interpreter {
    env: Env,
}

impl Default for Interpreter {
    fn default() -> Self { Interpreter::new() }
}

impl Interpreter {
    pub fn new() -> Interpreter { Interpreter { env: Env::with_builtins() } }

    /// Parses, reads and evaluates one line of input. Only syntax errors are `Err`; evaluation failures come back
    /// as `Value::Error`.
    pub fn execute(&mut self, input: &str) -> Result<Value, SyntaxError> {
        let ast = parse_code(input)?;
        debug!("parsed / {:?}", ast);
        Ok(eval::eval(&mut self.env, read::read(&ast)))
    }

    pub fn env(&self) -> &Env { &self.env }
}
