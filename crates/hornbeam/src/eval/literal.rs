//! Literal evaluation

use super::unsupported;
use crate::ast::{LiteralValue, Node};
use crate::{EvalError, Value};

/// Evaluate a literal node to its primitive.
///
/// `value` is `None` for `null`. Regular expression and bigint literals
/// have no runtime representation here.
pub fn eval_literal(
    node: &Node,
    value: Option<&LiteralValue>,
    exotic: bool,
) -> Result<Value, EvalError> {
    if exotic {
        return Err(unsupported(node));
    }

    match value {
        None => Ok(Value::Null),
        Some(LiteralValue::Bool(b)) => Ok(Value::Bool(*b)),
        Some(LiteralValue::Number(n)) => Ok(Value::Number(*n)),
        Some(LiteralValue::String(s)) => Ok(Value::string(s)),
        Some(LiteralValue::Other(_)) => Err(unsupported(node)),
    }
}
