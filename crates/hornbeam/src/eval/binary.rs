//! Binary and logical operator evaluation

use std::cmp::Ordering;

use super::field::has_property;
use super::Evaluate;
use crate::ast::{BinaryOperator, LogicalOperator, Node};
use crate::value::{
    compare, loose_equals, strict_equals, to_int32, to_primitive, to_property_key, to_uint32,
};
use crate::{EvalContext, EvalError, Scope, Value};

// ═══════════════════════════════════════════════════════════════════════
// Binary Expressions
// ═══════════════════════════════════════════════════════════════════════

/// Evaluate `left op right`. Both operands are evaluated, left first.
pub fn eval_binary(
    operator: BinaryOperator,
    left: &Node,
    right: &Node,
    node: &Node,
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let left_val = left.eval(scope, ctx)?;
    let right_val = right.eval(scope, ctx)?;
    apply_binary(operator, &left_val, &right_val).map_err(|err| err.with_span(node.span))
}

/// Apply a binary operator to two evaluated operands.
///
/// Shared with compound assignment (`a += b` combines with `+`).
pub fn apply_binary(
    operator: BinaryOperator,
    left: &Value,
    right: &Value,
) -> Result<Value, EvalError> {
    let result = match operator {
        // Equality
        BinaryOperator::LooseEq => Value::Bool(loose_equals(left, right)),
        BinaryOperator::LooseNe => Value::Bool(!loose_equals(left, right)),
        BinaryOperator::StrictEq => Value::Bool(strict_equals(left, right)),
        BinaryOperator::StrictNe => Value::Bool(!strict_equals(left, right)),

        // Relational
        BinaryOperator::Lt => Value::Bool(compare(left, right) == Some(Ordering::Less)),
        BinaryOperator::Le => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOperator::Gt => Value::Bool(compare(left, right) == Some(Ordering::Greater)),
        BinaryOperator::Ge => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        )),

        // Arithmetic
        BinaryOperator::Add => add(left, right),
        BinaryOperator::Sub => Value::Number(left.to_number() - right.to_number()),
        BinaryOperator::Mul => Value::Number(left.to_number() * right.to_number()),
        BinaryOperator::Div => Value::Number(left.to_number() / right.to_number()),
        BinaryOperator::Rem => Value::Number(left.to_number() % right.to_number()),
        BinaryOperator::Exp => Value::Number(power(left.to_number(), right.to_number())),

        // Bitwise and shifts on 32-bit integers
        BinaryOperator::BitAnd => int32(to_int32(left.to_number()) & to_int32(right.to_number())),
        BinaryOperator::BitOr => int32(to_int32(left.to_number()) | to_int32(right.to_number())),
        BinaryOperator::BitXor => int32(to_int32(left.to_number()) ^ to_int32(right.to_number())),
        BinaryOperator::Shl => {
            int32(to_int32(left.to_number()).wrapping_shl(shift_count(right)))
        }
        BinaryOperator::Shr => {
            int32(to_int32(left.to_number()).wrapping_shr(shift_count(right)))
        }
        BinaryOperator::UShr => Value::Number(f64::from(
            to_uint32(left.to_number()).wrapping_shr(shift_count(right)),
        )),

        // Membership
        BinaryOperator::In => Value::Bool(has_property(right, &to_property_key(left))?),
        BinaryOperator::InstanceOf => Value::Bool(instance_of(left, right)?),
    };
    Ok(result)
}

fn int32(n: i32) -> Value {
    Value::Number(f64::from(n))
}

fn shift_count(value: &Value) -> u32 {
    to_uint32(value.to_number()) & 0x1f
}

/// `+`: concatenation when either primitive operand is a string,
/// numeric addition otherwise.
fn add(left: &Value, right: &Value) -> Value {
    let left = to_primitive(left);
    let right = to_primitive(right);
    match (&left, &right) {
        (Value::String(_), _) | (_, Value::String(_)) => {
            Value::string(format!("{}{}", left, right))
        }
        _ => Value::Number(left.to_number() + right.to_number()),
    }
}

/// `**`, with `(±1) ** ±Infinity` being `NaN` unlike `f64::powf`.
fn power(base: f64, exponent: f64) -> f64 {
    if base.abs() == 1.0 && exponent.is_infinite() {
        return f64::NAN;
    }
    base.powf(exponent)
}

/// `value instanceof constructor`: whether the constructor's `prototype`
/// object appears in the value's prototype chain.
///
/// # Errors
///
/// Returns `TypeError` if `constructor` is not callable or has no
/// `prototype` object.
pub fn instance_of(value: &Value, constructor: &Value) -> Result<bool, EvalError> {
    let prototype = match constructor {
        Value::Function(func) => func.prototype().ok_or_else(|| {
            EvalError::type_error(format!(
                "Function has non-object prototype in instanceof check ({})",
                func.display_name()
            ))
        })?,
        Value::Builtin(_) => return Ok(false),
        other => {
            return Err(EvalError::type_error(format!(
                "Right-hand side of 'instanceof' is not callable ({})",
                crate::error::type_name(other)
            )))
        }
    };

    Ok(match value {
        Value::Object(object) => object.inherits_from(&prototype),
        _ => false,
    })
}

// ═══════════════════════════════════════════════════════════════════════
// Logical Expressions
// ═══════════════════════════════════════════════════════════════════════

/// Evaluate `&&`, `||` or `??`, short-circuiting. The result is the
/// operand that decided the outcome, not a boolean.
pub fn eval_logical(
    operator: LogicalOperator,
    left: &Node,
    right: &Node,
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let left_val = left.eval(scope, ctx)?;

    let short_circuits = match operator {
        LogicalOperator::And => !left_val.to_boolean(),
        LogicalOperator::Or => left_val.to_boolean(),
        LogicalOperator::Nullish => !left_val.is_nullish(),
    };

    if short_circuits {
        Ok(left_val)
    } else {
        right.eval(scope, ctx)
    }
}
