use std::fmt;

use serde::{Deserialize, Serialize};

use crate::interpreter::value::ValueType;

/// How many arguments a builtin accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Arity::Exactly(n) => write!(f, "{}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

/// A recoverable evaluation failure. Carried through evaluation as `Value::Error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RuntimeError {
    InvalidNumber,
    UnboundSymbol { name: String },
    ArityMismatch { func: String, got: usize, expected: Arity },
    TypeMismatch { func: String, index: usize, got: ValueType, expected: ValueType },
    EmptyList { func: String, index: usize },
    DivisionByZero,
    NotAFunction,
    DefinitionCountMismatch { symbols: usize, values: usize },
    UnknownOperator { name: String },
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RuntimeError::InvalidNumber => write!(f, "Invalid number!"),
            RuntimeError::UnboundSymbol { ref name } => write!(f, "Unbound symbol! '{}'", name),
            RuntimeError::ArityMismatch { ref func, got, expected } => {
                write!(f, "Function '{}' passed incorrect number of arguments. Got: {}, Expected: {}!", func, got, expected)
            }
            RuntimeError::TypeMismatch { ref func, index, got, expected } => {
                write!(f, "Function '{}' passed incorrect type for argument {}. Got: {}, Expected: {}!", func, index, got, expected)
            }
            RuntimeError::EmptyList { ref func, index } => write!(f, "Function '{}' passed {{}} for argument {}!", func, index),
            RuntimeError::DivisionByZero => write!(f, "Division by zero!"),
            RuntimeError::NotAFunction => write!(f, "First element is not a function!"),
            RuntimeError::DefinitionCountMismatch { symbols, values } => write!(
                f,
                "Function 'def' cannot define incorrect number of values to symbols! Got: {}, Expected: {}",
                values, symbols
            ),
            RuntimeError::UnknownOperator { ref name } => write!(f, "Unknown operator '{}'", name),
        }
    }
}

impl std::error::Error for RuntimeError {}

#[macro_export]
macro_rules! runtime_error {
    ($err:expr) => {
        return Err($err)
    };
}

/// Fails the enclosing builtin unless `$cond` holds.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            $crate::runtime_error!($err)
        }
    };
}
