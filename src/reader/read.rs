use tracing::trace;

use crate::interpreter::error::RuntimeError;
use crate::interpreter::value::Value;
use crate::reader::parser::Ast;

const DELIMITERS: [&str; 4] = ["(", ")", "{", "}"];

fn read_number(contents: &str) -> Value {
    match contents.parse::<f64>() {
        Ok(n) if n.is_finite() => Value::Number(n),
        _ => Value::Error(RuntimeError::InvalidNumber),
    }
}

fn is_skipped(node: &Ast) -> bool { DELIMITERS.contains(&node.contents.as_str()) || node.tag == "regex" }

/// Converts a parse tree into the value it denotes.
///
/// The root node and `sexpr` nodes become S-Expressions, `qexpr` nodes Q-Expressions. Delimiter tokens and the
/// `regex` anchors around the root are dropped.
pub fn read(node: &Ast) -> Value {
    if node.tag.contains("number") {
        return read_number(&node.contents);
    }
    if node.tag.contains("symbol") {
        return Value::symbol(&node.contents);
    }

    let cells = node.children.iter().filter(|child| !is_skipped(child)).map(read).collect();
    let val = if node.tag.contains("qexpr") { Value::QExpr(cells) } else { Value::SExpr(cells) };
    trace!("read / {} => {}", node.tag, val);
    val
}

#[cfg(test)]
mod test_read {
    use super::*;
    use crate::reader::lexer::tokenize;
    use crate::reader::parser::parse;

    fn read_str(src: &str) -> Value { read(&parse(&tokenize(src).unwrap()).unwrap()) }

    fn leaf(tag: &str, contents: &str) -> Ast {
        Ast {
            tag: tag.into(),
            contents: contents.into(),
            children: vec![],
        }
    }

    #[test]
    fn test_read_program() {
        assert_eq!(
            read_str("+ 1 -2.5"),
            Value::SExpr(vec![Value::symbol("+"), Value::Number(1.0), Value::Number(-2.5)])
        );
    }

    #[test]
    fn test_read_nested() {
        assert_eq!(
            read_str("(head {1 (x)})"),
            Value::SExpr(vec![Value::SExpr(vec![
                Value::symbol("head"),
                Value::QExpr(vec![Value::Number(1.0), Value::SExpr(vec![Value::symbol("x")])]),
            ])])
        );
    }

    #[test]
    fn test_read_empty() {
        assert_eq!(read_str(""), Value::SExpr(vec![]));
        assert_eq!(read_str("{}"), Value::SExpr(vec![Value::QExpr(vec![])]));
    }

    #[test]
    fn test_invalid_number() {
        let huge = "9".repeat(400);
        assert_eq!(read_str(&huge), Value::SExpr(vec![Value::Error(RuntimeError::InvalidNumber)]));
        assert_eq!(read(&leaf("expr|number|regex", "1.2.3")), Value::Error(RuntimeError::InvalidNumber));
    }

    #[test]
    fn test_skips_delimiters_and_anchors() {
        let node = Ast {
            tag: "expr|qexpr|>".into(),
            contents: String::new(),
            children: vec![leaf("char", "{"), leaf("regex", ""), leaf("expr|symbol|regex", "a"), leaf("char", "}")],
        };
        assert_eq!(read(&node), Value::QExpr(vec![Value::symbol("a")]));
    }
}
