//! Object literal evaluation

use super::{unsupported, Evaluate};
use crate::ast::{Node, NodeKind, PropertyKind};
use crate::value::{to_property_key, ObjectRef};
use crate::{EvalContext, EvalError, Scope, Value};

/// Evaluate an object literal. Properties are defined in source order, so
/// a repeated key keeps its first position and its last value.
///
/// # Errors
///
/// Returns `UnsupportedSyntax` for accessor properties (`get`/`set`) and
/// anything that is not a plain property (e.g. spread).
pub fn eval_object(
    properties: &[Node],
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let object = ObjectRef::new();

    for property in properties {
        let NodeKind::Property {
            key,
            value,
            kind,
            computed,
            ..
        } = &property.kind
        else {
            return Err(unsupported(property));
        };

        if *kind != PropertyKind::Init {
            return Err(unsupported(property));
        }

        let key = property_key(key, *computed, scope, ctx)?;
        let value = value.eval(scope, ctx)?;
        object.set(key, value);
    }

    Ok(Value::Object(object))
}

/// Static keys are identifiers or literals; computed keys are evaluated.
fn property_key(
    key: &Node,
    computed: bool,
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<String, EvalError> {
    match &key.kind {
        NodeKind::Identifier { name } if !computed => Ok(name.clone()),
        NodeKind::Literal { .. } => Ok(to_property_key(&key.eval(scope, ctx)?)),
        _ if computed => Ok(to_property_key(&key.eval(scope, ctx)?)),
        _ => Err(unsupported(key)),
    }
}
