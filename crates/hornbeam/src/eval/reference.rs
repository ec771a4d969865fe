//! Assignment targets
//!
//! Assignment, compound assignment, update and `delete` need the location
//! an expression denotes rather than its value. [`resolve_reference`]
//! yields that location without reading it.

use super::field::{get_property, set_property};
use super::{unsupported, Evaluate};
use crate::ast::{Node, NodeKind, Span};
use crate::value::to_property_key;
use crate::{EvalContext, EvalError, Scope, Value};

/// A resolved assignment target.
#[derive(Debug, Clone)]
pub enum Reference {
    /// A variable, resolved through the scope chain on access
    Binding {
        /// Variable name
        name: String,
        /// Where it was referenced
        span: Span,
    },

    /// A property of an already-evaluated base value
    Property {
        /// The object (or array, function...) holding the property
        base: Value,
        /// The property key
        key: String,
    },
}

impl Reference {
    /// Read the current value at this location.
    pub fn get_value(&self, scope: &Scope) -> Result<Value, EvalError> {
        match self {
            Reference::Binding { name, span } => scope
                .get(name)
                .map_err(|err| EvalError::from(err).with_span(*span)),
            Reference::Property { base, key } => get_property(base, key),
        }
    }

    /// Write `value` to this location.
    pub fn put_value(&self, value: Value, scope: &Scope) -> Result<(), EvalError> {
        match self {
            Reference::Binding { name, span } => scope
                .set(name, value)
                .map_err(|err| EvalError::from(err).with_span(*span)),
            Reference::Property { base, key } => set_property(base, key, value),
        }
    }
}

/// Resolve `target` to a location: identifiers to bindings, member
/// expressions to `(object, key)` pairs. The property itself is not read.
pub fn resolve_reference(
    target: &Node,
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<Reference, EvalError> {
    match &target.kind {
        NodeKind::Identifier { name } => Ok(Reference::Binding {
            name: name.clone(),
            span: target.span,
        }),
        NodeKind::MemberExpression {
            object,
            property,
            computed,
        } => {
            let base = object.eval(scope, ctx)?;
            let key = member_key(property, *computed, scope, ctx)?;
            Ok(Reference::Property { base, key })
        }
        _ => Err(unsupported(target)),
    }
}

/// The key of a member expression: the identifier name for `a.b`, the
/// evaluated and stringified expression for `a[expr]`.
pub fn member_key(
    property: &Node,
    computed: bool,
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<String, EvalError> {
    if computed {
        let key = property.eval(scope, ctx)?;
        Ok(to_property_key(&key))
    } else {
        property
            .as_identifier()
            .map(str::to_owned)
            .ok_or_else(|| unsupported(property))
    }
}
