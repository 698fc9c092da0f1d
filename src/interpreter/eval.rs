use tracing::trace;

use crate::interpreter::env::Env;
use crate::interpreter::error::RuntimeError;
use crate::interpreter::value::Value;

/// Reduces `val` to normal form under `env`.
///
/// Symbols are looked up, S-Expressions are applied, everything else (including Q-Expressions) evaluates to itself.
pub fn eval(env: &mut Env, val: Value) -> Value {
    match val {
        Value::Symbol(name) => env.get(&name).unwrap_or_else(Value::Error),
        Value::SExpr(cells) => eval_sexpr(env, cells),
        _ => val,
    }
}

fn eval_sexpr(env: &mut Env, cells: Vec<Value>) -> Value {
    let mut cells: Vec<Value> = cells.into_iter().map(|cell| eval(env, cell)).collect();

    // first error wins, scanning left to right
    if let Some(i) = cells.iter().position(Value::is_error) {
        return cells.swap_remove(i);
    }

    match cells.len() {
        0 => Value::SExpr(cells),
        1 => cells.remove(0),
        _ => {
            let args = cells.split_off(1);
            match cells.remove(0) {
                Value::Function(builtin) => {
                    trace!("reduce / ({} ...{})", builtin, args.len());
                    builtin.apply(env, args)
                }
                _ => Value::Error(RuntimeError::NotAFunction),
            }
        }
    }
}
