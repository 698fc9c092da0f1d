use std::fmt;

use serde::{Deserialize, Serialize};

use crate::interpreter::builtin::Builtin;
use crate::interpreter::error::RuntimeError;
use crate::runtime_error;

#[derive(PartialEq, Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Number(f64),
    Symbol(String),
    Error(RuntimeError),

    SExpr(Vec<Value>),
    QExpr(Vec<Value>),

    Function(Builtin),
}

/// The variant of a `Value`, as named in error messages.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Serialize, Deserialize)]
pub enum ValueType {
    Number,
    Symbol,
    Error,
    SExpr,
    QExpr,
    Function,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            ValueType::Number => "Number",
            ValueType::Symbol => "Symbol",
            ValueType::Error => "Error",
            ValueType::SExpr => "S-Expression",
            ValueType::QExpr => "Q-Expression",
            ValueType::Function => "Function",
        };
        f.write_str(name)
    }
}

impl Value {
    pub fn symbol(name: &str) -> Value { Value::Symbol(name.to_string()) }

    pub fn value_type(&self) -> ValueType {
        match *self {
            Value::Number(_) => ValueType::Number,
            Value::Symbol(_) => ValueType::Symbol,
            Value::Error(_) => ValueType::Error,
            Value::SExpr(_) => ValueType::SExpr,
            Value::QExpr(_) => ValueType::QExpr,
            Value::Function(_) => ValueType::Function,
        }
    }

    pub fn is_error(&self) -> bool { matches!(self, Value::Error(_)) }

    /// Unwraps a Q-Expression argument of builtin `func` at position `index`.
    pub fn into_qexpr(self, func: &str, index: usize) -> Result<Vec<Value>, RuntimeError> {
        match self {
            Value::QExpr(cells) => Ok(cells),
            other => runtime_error!(mismatch(func, index, &other, ValueType::QExpr)),
        }
    }

    pub fn into_number(self, func: &str, index: usize) -> Result<f64, RuntimeError> {
        match self {
            Value::Number(n) => Ok(n),
            other => runtime_error!(mismatch(func, index, &other, ValueType::Number)),
        }
    }

    pub fn into_symbol(self, func: &str, index: usize) -> Result<String, RuntimeError> {
        match self {
            Value::Symbol(s) => Ok(s),
            other => runtime_error!(mismatch(func, index, &other, ValueType::Symbol)),
        }
    }
}

fn mismatch(func: &str, index: usize, got: &Value, expected: ValueType) -> RuntimeError {
    RuntimeError::TypeMismatch {
        func: func.to_string(),
        index,
        got: got.value_type(),
        expected,
    }
}

fn write_cells(f: &mut fmt::Formatter, cells: &[Value], open: char, close: char) -> fmt::Result {
    write!(f, "{}", open)?;
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", cell)?;
    }
    write!(f, "{}", close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Symbol(ref s) => write!(f, "{}", s),
            Value::Error(ref e) => write!(f, "Error: {}", e),
            Value::SExpr(ref cells) => write_cells(f, cells, '(', ')'),
            Value::QExpr(ref cells) => write_cells(f, cells, '{', '}'),
            Value::Function(_) => write!(f, "<function>"),
        }
    }
}

#[cfg(test)]
mod test_value {
    use super::*;
    use crate::interpreter::builtin::Operator;

    #[test]
    fn test_print_atoms() {
        assert_eq!(Value::Number(6.0).to_string(), "6");
        assert_eq!(Value::Number(0.5).to_string(), "0.5");
        assert_eq!(Value::Number(-3.0).to_string(), "-3");
        assert_eq!(Value::symbol("foo").to_string(), "foo");
        assert_eq!(Value::Error(RuntimeError::DivisionByZero).to_string(), "Error: Division by zero!");
        assert_eq!(Value::Function(Builtin::Op(Operator::Add)).to_string(), "<function>");
    }

    #[test]
    fn test_print_lists() {
        let inner = Value::SExpr(vec![Value::symbol("+"), Value::Number(1.0), Value::Number(2.0)]);
        let list = Value::QExpr(vec![Value::Number(1.0), inner, Value::QExpr(vec![])]);
        assert_eq!(list.to_string(), "{1 (+ 1 2) {}}");
        assert_eq!(Value::SExpr(vec![]).to_string(), "()");
    }

    #[test]
    fn test_into_qexpr_mismatch() {
        let err = Value::Number(1.0).into_qexpr("head", 0).unwrap_err();
        assert_eq!(
            err,
            RuntimeError::TypeMismatch {
                func: "head".into(),
                index: 0,
                got: ValueType::Number,
                expected: ValueType::QExpr,
            }
        );
    }

    #[test]
    fn test_json() {
        let list = Value::QExpr(vec![Value::Number(1.0), Value::symbol("x"), Value::Function(Builtin::Head)]);
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(
            json,
            r#"{"type":"QExpr","value":[{"type":"Number","value":1.0},{"type":"Symbol","value":"x"},{"type":"Function","value":"head"}]}"#
        );
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn test_json_unknown_builtin() {
        let result: Result<Value, _> = serde_json::from_str(r#"{"type":"Function","value":"frobnicate"}"#);
        assert!(result.unwrap_err().to_string().contains("Unknown operator 'frobnicate'"));
    }
}
