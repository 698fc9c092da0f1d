use std::fmt;

use phf::phf_ordered_map;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::interpreter::env::Env;
use crate::interpreter::error::{Arity, RuntimeError};
use crate::interpreter::eval::eval;
use crate::interpreter::value::Value;
use crate::{ensure, runtime_error};

/// A native procedure. Identified only by the operation it performs.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(into = "String")]
#[serde(try_from = "String")]
pub enum Builtin {
    List,
    Head,
    Tail,
    Eval,
    Join,
    Cons,
    Len,
    Init,
    Def,
    Op(Operator),
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Min,
    Max,
}

// Registration order of the bootstrap environment.
pub static BUILTINS: phf::OrderedMap<&'static str, Builtin> = phf_ordered_map! {
    "list" => Builtin::List,
    "head" => Builtin::Head,
    "tail" => Builtin::Tail,
    "eval" => Builtin::Eval,
    "join" => Builtin::Join,
    "cons" => Builtin::Cons,
    "init" => Builtin::Init,
    "len" => Builtin::Len,

    "+" => Builtin::Op(Operator::Add),
    "add" => Builtin::Op(Operator::Add),
    "-" => Builtin::Op(Operator::Sub),
    "sub" => Builtin::Op(Operator::Sub),
    "*" => Builtin::Op(Operator::Mul),
    "mul" => Builtin::Op(Operator::Mul),
    "/" => Builtin::Op(Operator::Div),
    "div" => Builtin::Op(Operator::Div),
    "%" => Builtin::Op(Operator::Rem),
    "rem" => Builtin::Op(Operator::Rem),
    "^" => Builtin::Op(Operator::Pow),
    "pow" => Builtin::Op(Operator::Pow),
    "min" => Builtin::Op(Operator::Min),
    "max" => Builtin::Op(Operator::Max),

    "def" => Builtin::Def,
};

impl Builtin {
    pub fn lookup(name: &str) -> Result<Builtin, RuntimeError> {
        BUILTINS.get(name).copied().ok_or_else(|| RuntimeError::UnknownOperator { name: name.to_string() })
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::List => "list",
            Builtin::Head => "head",
            Builtin::Tail => "tail",
            Builtin::Eval => "eval",
            Builtin::Join => "join",
            Builtin::Cons => "cons",
            Builtin::Len => "len",
            Builtin::Init => "init",
            Builtin::Def => "def",
            Builtin::Op(op) => op.name(),
        }
    }

    /// Invokes the builtin on its (owned) arguments. Failures come back as `Value::Error`.
    pub fn apply(self, env: &mut Env, args: Vec<Value>) -> Value {
        debug!("apply / {} to {} argument(s)", self, args.len());
        let result = match self {
            Builtin::List => Ok(Value::QExpr(args)),
            Builtin::Head => builtin_head(args),
            Builtin::Tail => builtin_tail(args),
            Builtin::Eval => builtin_eval(env, args),
            Builtin::Join => builtin_join(args),
            Builtin::Cons => builtin_cons(args),
            Builtin::Len => builtin_len(args),
            Builtin::Init => builtin_init(args),
            Builtin::Def => builtin_def(env, args),
            Builtin::Op(op) => builtin_op(op, args),
        };
        result.unwrap_or_else(Value::Error)
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str(self.name()) }
}

impl From<Builtin> for String {
    fn from(builtin: Builtin) -> String { builtin.name().to_string() }
}

impl TryFrom<String> for Builtin {
    type Error = RuntimeError;

    fn try_from(name: String) -> Result<Builtin, RuntimeError> { Builtin::lookup(&name) }
}

impl Operator {
    pub fn name(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Rem => "%",
            Operator::Pow => "^",
            Operator::Min => "min",
            Operator::Max => "max",
        }
    }

    fn arity(self) -> Arity {
        match self {
            Operator::Min | Operator::Max => Arity::AtLeast(2),
            _ => Arity::AtLeast(1),
        }
    }

    fn combine(self, x: f64, y: f64) -> Result<f64, RuntimeError> {
        match self {
            Operator::Add => Ok(x + y),
            Operator::Sub => Ok(x - y),
            Operator::Mul => Ok(x * y),
            Operator::Div | Operator::Rem if y == 0.0 => runtime_error!(RuntimeError::DivisionByZero),
            Operator::Div => Ok(x / y),
            Operator::Rem => Ok(x % y),
            Operator::Pow => Ok(x.powf(y)),
            Operator::Min => Ok(x.min(y)),
            Operator::Max => Ok(x.max(y)),
        }
    }
}

fn arity_error(func: &str, got: usize, expected: Arity) -> RuntimeError {
    RuntimeError::ArityMismatch {
        func: func.to_string(),
        got,
        expected,
    }
}

fn check_arity(func: &str, args: &[Value], expected: Arity) -> Result<(), RuntimeError> {
    ensure!(expected.accepts(args.len()), arity_error(func, args.len(), expected));
    Ok(())
}

/// (x) -> x
fn into_single(func: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
    let got = args.len();
    let mut iter = args.into_iter();
    match (iter.next(), iter.next()) {
        (Some(x), None) => Ok(x),
        _ => runtime_error!(arity_error(func, got, Arity::Exactly(1))),
    }
}

/// (x y) -> (x, y)
fn into_pair(func: &str, args: Vec<Value>) -> Result<(Value, Value), RuntimeError> {
    let got = args.len();
    let mut iter = args.into_iter();
    match (iter.next(), iter.next(), iter.next()) {
        (Some(x), Some(y), None) => Ok((x, y)),
        _ => runtime_error!(arity_error(func, got, Arity::Exactly(2))),
    }
}

/// The single non-empty Q-Expression argument of `func`.
fn non_empty_qexpr(func: &str, args: Vec<Value>) -> Result<Vec<Value>, RuntimeError> {
    let cells = into_single(func, args)?.into_qexpr(func, 0)?;
    ensure!(!cells.is_empty(), RuntimeError::EmptyList { func: func.to_string(), index: 0 });
    Ok(cells)
}

fn builtin_head(args: Vec<Value>) -> Result<Value, RuntimeError> {
    let mut cells = non_empty_qexpr("head", args)?;
    cells.truncate(1);
    Ok(Value::QExpr(cells))
}

fn builtin_tail(args: Vec<Value>) -> Result<Value, RuntimeError> {
    let mut cells = non_empty_qexpr("tail", args)?;
    cells.remove(0);
    Ok(Value::QExpr(cells))
}

fn builtin_init(args: Vec<Value>) -> Result<Value, RuntimeError> {
    let mut cells = non_empty_qexpr("init", args)?;
    cells.pop();
    Ok(Value::QExpr(cells))
}

fn builtin_eval(env: &mut Env, args: Vec<Value>) -> Result<Value, RuntimeError> {
    let cells = into_single("eval", args)?.into_qexpr("eval", 0)?;
    Ok(eval(env, Value::SExpr(cells)))
}

fn builtin_join(args: Vec<Value>) -> Result<Value, RuntimeError> {
    let lists = args
        .into_iter()
        .enumerate()
        .map(|(i, arg)| arg.into_qexpr("join", i))
        .collect::<Result<Vec<Vec<Value>>, RuntimeError>>()?;
    Ok(Value::QExpr(lists.into_iter().flatten().collect()))
}

fn builtin_cons(args: Vec<Value>) -> Result<Value, RuntimeError> {
    let (head, list) = into_pair("cons", args)?;
    let mut cells = list.into_qexpr("cons", 1)?;
    cells.insert(0, head);
    Ok(Value::QExpr(cells))
}

fn builtin_len(args: Vec<Value>) -> Result<Value, RuntimeError> {
    let cells = into_single("len", args)?.into_qexpr("len", 0)?;
    Ok(Value::Number(cells.len() as f64))
}

/// (def {a b} 1 2)
///
/// Every check runs before the first binding, so a failed `def` leaves the environment untouched.
fn builtin_def(env: &mut Env, mut args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity("def", &args, Arity::AtLeast(1))?;
    let symbols = args.remove(0).into_qexpr("def", 0)?;
    let names = symbols
        .into_iter()
        .enumerate()
        .map(|(i, sym)| sym.into_symbol("def", i))
        .collect::<Result<Vec<String>, RuntimeError>>()?;

    ensure!(
        names.len() == args.len(),
        RuntimeError::DefinitionCountMismatch {
            symbols: names.len(),
            values: args.len(),
        }
    );

    for (name, value) in names.into_iter().zip(args) {
        info!("def / {} = {}", name, value);
        env.put(name, value);
    }
    Ok(Value::SExpr(vec![]))
}

/// Left fold of `op` over numeric arguments; `(- x)` negates.
fn builtin_op(op: Operator, args: Vec<Value>) -> Result<Value, RuntimeError> {
    let name = op.name();
    check_arity(name, &args, op.arity())?;
    let nums = args
        .into_iter()
        .enumerate()
        .map(|(i, arg)| arg.into_number(name, i))
        .collect::<Result<Vec<f64>, RuntimeError>>()?;

    let mut iter = nums.into_iter();
    let first = match iter.next() {
        Some(x) => x,
        None => runtime_error!(arity_error(name, 0, op.arity())),
    };
    if op == Operator::Sub && iter.len() == 0 {
        return Ok(Value::Number(-first));
    }
    iter.try_fold(first, |x, y| op.combine(x, y)).map(Value::Number)
}

#[cfg(test)]
mod test_builtin {
    use super::*;
    use crate::interpreter::value::ValueType;

    fn num(n: f64) -> Value { Value::Number(n) }

    fn nums(ns: &[f64]) -> Vec<Value> { ns.iter().copied().map(Value::Number).collect() }

    fn qexpr(ns: &[f64]) -> Value { Value::QExpr(nums(ns)) }

    fn apply(builtin: Builtin, args: Vec<Value>) -> Value { builtin.apply(&mut Env::new(), args) }

    #[test]
    fn test_lookup_aliases() {
        assert_eq!(Builtin::lookup("+").unwrap(), Builtin::Op(Operator::Add));
        assert_eq!(Builtin::lookup("add").unwrap(), Builtin::Op(Operator::Add));
        assert_eq!(Builtin::lookup("rem").unwrap(), Builtin::Op(Operator::Rem));
        assert_eq!(Builtin::lookup("%").unwrap(), Builtin::Op(Operator::Rem));
        assert_eq!(Builtin::lookup("ADD").unwrap_err(), RuntimeError::UnknownOperator { name: "ADD".into() });
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(apply(Builtin::Op(Operator::Add), nums(&[1.0, 2.0, 3.0])), num(6.0));
        assert_eq!(apply(Builtin::Op(Operator::Sub), nums(&[10.0, 2.0, 3.0])), num(5.0));
        assert_eq!(apply(Builtin::Op(Operator::Sub), nums(&[4.0])), num(-4.0));
        assert_eq!(apply(Builtin::Op(Operator::Mul), nums(&[2.0, 3.0, 4.0])), num(24.0));
        assert_eq!(apply(Builtin::Op(Operator::Div), nums(&[10.0, 4.0])), num(2.5));
        assert_eq!(apply(Builtin::Op(Operator::Rem), nums(&[10.0, 3.0])), num(1.0));
        assert_eq!(apply(Builtin::Op(Operator::Pow), nums(&[2.0, 10.0])), num(1024.0));
        assert_eq!(apply(Builtin::Op(Operator::Min), nums(&[3.0, 1.0, 2.0])), num(1.0));
        assert_eq!(apply(Builtin::Op(Operator::Max), nums(&[3.0, 1.0, 2.0])), num(3.0));
        // a single operand folds to itself
        assert_eq!(apply(Builtin::Op(Operator::Add), nums(&[7.0])), num(7.0));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(apply(Builtin::Op(Operator::Div), nums(&[10.0, 0.0])), Value::Error(RuntimeError::DivisionByZero));
        assert_eq!(apply(Builtin::Op(Operator::Div), nums(&[10.0, 0.0, 5.0])), Value::Error(RuntimeError::DivisionByZero));
        assert_eq!(apply(Builtin::Op(Operator::Rem), nums(&[10.0, 0.0])), Value::Error(RuntimeError::DivisionByZero));
    }

    #[test]
    fn test_arithmetic_errors() {
        assert_eq!(
            apply(Builtin::Op(Operator::Add), vec![num(1.0), Value::QExpr(vec![])]),
            Value::Error(RuntimeError::TypeMismatch {
                func: "+".into(),
                index: 1,
                got: ValueType::QExpr,
                expected: ValueType::Number,
            })
        );
        assert_eq!(
            apply(Builtin::Op(Operator::Max), nums(&[1.0])),
            Value::Error(RuntimeError::ArityMismatch {
                func: "max".into(),
                got: 1,
                expected: Arity::AtLeast(2),
            })
        );
        assert_eq!(
            apply(Builtin::Op(Operator::Mul), vec![]),
            Value::Error(RuntimeError::ArityMismatch {
                func: "*".into(),
                got: 0,
                expected: Arity::AtLeast(1),
            })
        );
    }

    #[test]
    fn test_list_ops() {
        assert_eq!(apply(Builtin::List, nums(&[1.0, 2.0])), qexpr(&[1.0, 2.0]));
        assert_eq!(apply(Builtin::Head, vec![qexpr(&[1.0, 2.0, 3.0])]), qexpr(&[1.0]));
        assert_eq!(apply(Builtin::Tail, vec![qexpr(&[1.0, 2.0, 3.0])]), qexpr(&[2.0, 3.0]));
        assert_eq!(apply(Builtin::Init, vec![qexpr(&[1.0, 2.0, 3.0])]), qexpr(&[1.0, 2.0]));
        assert_eq!(apply(Builtin::Len, vec![qexpr(&[1.0, 2.0, 3.0])]), num(3.0));
        assert_eq!(apply(Builtin::Cons, vec![num(0.0), qexpr(&[1.0])]), qexpr(&[0.0, 1.0]));
        assert_eq!(apply(Builtin::Join, vec![qexpr(&[1.0, 2.0]), qexpr(&[]), qexpr(&[3.0])]), qexpr(&[1.0, 2.0, 3.0]));
        assert_eq!(apply(Builtin::Join, vec![]), qexpr(&[]));
    }

    #[test]
    fn test_list_errors() {
        assert_eq!(
            apply(Builtin::Head, vec![qexpr(&[])]),
            Value::Error(RuntimeError::EmptyList { func: "head".into(), index: 0 })
        );
        assert_eq!(
            apply(Builtin::Tail, vec![qexpr(&[1.0]), qexpr(&[2.0])]),
            Value::Error(RuntimeError::ArityMismatch {
                func: "tail".into(),
                got: 2,
                expected: Arity::Exactly(1),
            })
        );
        assert_eq!(
            apply(Builtin::Cons, vec![num(1.0), num(2.0)]),
            Value::Error(RuntimeError::TypeMismatch {
                func: "cons".into(),
                index: 1,
                got: ValueType::Number,
                expected: ValueType::QExpr,
            })
        );
        assert_eq!(
            apply(Builtin::Join, vec![qexpr(&[1.0]), num(2.0)]),
            Value::Error(RuntimeError::TypeMismatch {
                func: "join".into(),
                index: 1,
                got: ValueType::Number,
                expected: ValueType::QExpr,
            })
        );
    }

    #[test]
    fn test_def_binds() {
        let mut env = Env::new();
        let result = Builtin::Def.apply(&mut env, vec![Value::QExpr(vec![Value::symbol("a"), Value::symbol("b")]), num(1.0), num(2.0)]);
        assert_eq!(result, Value::SExpr(vec![]));
        assert_eq!(env.get("a").unwrap(), num(1.0));
        assert_eq!(env.get("b").unwrap(), num(2.0));
    }

    #[test]
    fn test_def_checks_before_binding() {
        let mut env = Env::new();
        let result = Builtin::Def.apply(&mut env, vec![Value::QExpr(vec![Value::symbol("a"), num(1.0)]), num(1.0), num(2.0)]);
        assert!(matches!(result, Value::Error(RuntimeError::TypeMismatch { index: 1, .. })));
        assert!(env.is_empty());

        let result = Builtin::Def.apply(&mut env, vec![Value::QExpr(vec![Value::symbol("a"), Value::symbol("b")]), num(1.0)]);
        assert_eq!(result, Value::Error(RuntimeError::DefinitionCountMismatch { symbols: 2, values: 1 }));
        assert!(env.is_empty());
    }
}
