//! Member expression evaluation and property access

use super::reference::member_key;
use super::Evaluate;
use crate::ast::Node;
use crate::error::type_name;
use crate::value::to_uint32;
use crate::{EvalContext, EvalError, Scope, Value};

/// Evaluate `object.property` or `object[property]`.
///
/// # Errors
///
/// Returns `TypeError` when the base is `undefined` or `null`.
pub fn eval_member(
    object: &Node,
    property: &Node,
    computed: bool,
    node: &Node,
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let base = object.eval(scope, ctx)?;
    let key = member_key(property, computed, scope, ctx)?;
    get_property(&base, &key).map_err(|err| err.with_span(node.span))
}

/// Parse a canonical array index (`"0"`, `"12"`, not `"01"` or `"1.0"`).
fn array_index(key: &str) -> Option<usize> {
    let index: usize = key.parse().ok()?;
    (index.to_string() == key).then_some(index)
}

/// The UTF-16 code unit at `index` as a one-unit string.
fn string_unit(s: &str, index: usize) -> Option<Value> {
    let unit = s.encode_utf16().nth(index)?;
    Some(Value::string(String::from_utf16_lossy(&[unit])))
}

// ═══════════════════════════════════════════════════════════════════════
// Property Access
// ═══════════════════════════════════════════════════════════════════════

/// Read `base[key]`.
///
/// Objects consult their prototype chain; arrays and strings expose
/// `length` and indices; functions expose their own properties plus
/// `name` and `length`. Missing properties read as `undefined`.
pub fn get_property(base: &Value, key: &str) -> Result<Value, EvalError> {
    match base {
        Value::Undefined | Value::Null => Err(EvalError::type_error(format!(
            "Cannot read properties of {} (reading '{}')",
            base, key
        ))),
        Value::Object(object) => Ok(object.get(key)),
        Value::Array(items) => Ok(if key == "length" {
            Value::Number(items.len() as f64)
        } else {
            array_index(key)
                .and_then(|index| items.get(index))
                .unwrap_or_default()
        }),
        Value::String(s) => Ok(if key == "length" {
            Value::Number(s.encode_utf16().count() as f64)
        } else {
            array_index(key)
                .and_then(|index| string_unit(s, index))
                .unwrap_or_default()
        }),
        Value::Function(func) => Ok(match func.properties.lookup(key) {
            Some(value) => value,
            None => match key {
                "name" => Value::string(func.name.as_deref().unwrap_or_default()),
                "length" => Value::Number(func.params.len() as f64),
                _ => Value::Undefined,
            },
        }),
        Value::Builtin(builtin) => Ok(match key {
            "name" => Value::string(&builtin.name),
            _ => Value::Undefined,
        }),
        Value::Bool(_) | Value::Number(_) => Ok(Value::Undefined),
    }
}

/// Write `base[key] = value`.
///
/// Writes to primitives are silently dropped.
pub fn set_property(base: &Value, key: &str, value: Value) -> Result<(), EvalError> {
    match base {
        Value::Undefined | Value::Null => Err(EvalError::type_error(format!(
            "Cannot set properties of {} (setting '{}')",
            base, key
        ))),
        Value::Object(object) => {
            object.set(key, value);
            Ok(())
        }
        Value::Array(items) => {
            if key == "length" {
                let len = value.to_number();
                if len < 0.0 || len.fract() != 0.0 || len != f64::from(to_uint32(len)) {
                    return Err(EvalError::range_error(format!(
                        "Invalid array length {}",
                        value
                    )));
                }
                items.truncate_or_extend(len as usize)?;
            } else if let Some(index) = array_index(key) {
                items.set(index, value)?;
            }
            Ok(())
        }
        Value::Function(func) => {
            func.properties.set(key, value);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// `delete base[key]`: removes an own object or function property; an
/// array slot becomes `undefined`. Always `true` for existing bases.
pub fn delete_property(base: &Value, key: &str) -> Result<bool, EvalError> {
    match base {
        Value::Undefined | Value::Null => Err(EvalError::type_error(format!(
            "Cannot convert {} to object",
            base
        ))),
        Value::Object(object) => {
            object.remove(key);
            Ok(true)
        }
        Value::Array(items) => {
            if let Some(index) = array_index(key).filter(|index| *index < items.len()) {
                items.set(index, Value::Undefined)?;
            }
            Ok(true)
        }
        Value::Function(func) => {
            func.properties.remove(key);
            Ok(true)
        }
        _ => Ok(true),
    }
}

/// `key in base`: own or inherited property.
///
/// # Errors
///
/// Returns `TypeError` when `base` is a primitive.
pub fn has_property(base: &Value, key: &str) -> Result<bool, EvalError> {
    match base {
        Value::Object(object) => Ok(object.has_property(key)),
        Value::Array(items) => Ok(key == "length"
            || array_index(key).map_or(false, |index| index < items.len())),
        Value::Function(func) => {
            Ok(func.properties.has_property(key) || matches!(key, "name" | "length"))
        }
        Value::Builtin(_) => Ok(key == "name"),
        primitive => Err(EvalError::type_error(format!(
            "Cannot use 'in' operator to search for '{}' in {} {}",
            key,
            type_name(primitive),
            primitive
        ))),
    }
}

/// Keys visited by `for-in`: object keys in insertion order, array and
/// string indices, a function's own properties except `prototype`.
/// Everything else enumerates nothing.
pub fn own_enumerable_keys(value: &Value) -> Vec<String> {
    match value {
        Value::Object(object) => object.keys(),
        Value::Array(items) => (0..items.len()).map(|i| i.to_string()).collect(),
        Value::String(s) => (0..s.encode_utf16().count()).map(|i| i.to_string()).collect(),
        Value::Function(func) => func
            .properties
            .keys()
            .into_iter()
            .filter(|key| key != "prototype")
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ObjectRef;

    #[test]
    fn test_array_properties() {
        let arr = Value::array(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(get_property(&arr, "length").unwrap(), Value::Number(2.0));
        assert_eq!(get_property(&arr, "1").unwrap(), Value::from("b"));
        assert_eq!(get_property(&arr, "01").unwrap(), Value::Undefined);
        assert_eq!(get_property(&arr, "5").unwrap(), Value::Undefined);

        set_property(&arr, "3", Value::from("d")).unwrap();
        assert_eq!(get_property(&arr, "length").unwrap(), Value::Number(4.0));

        set_property(&arr, "length", Value::Number(1.0)).unwrap();
        assert_eq!(own_enumerable_keys(&arr), vec!["0".to_string()]);
        assert!(matches!(
            set_property(&arr, "length", Value::Number(-1.0)),
            Err(EvalError::RangeError { .. })
        ));
    }

    #[test]
    fn test_huge_array_writes_raise_range_error() {
        let arr = Value::array(vec![]);
        assert!(matches!(
            set_property(&arr, "4294967294", Value::Number(1.0)),
            Err(EvalError::RangeError { ref message, .. }) if message == "Invalid array length 4294967295"
        ));
        assert!(matches!(
            set_property(&arr, "length", Value::Number(4_294_967_295.0)),
            Err(EvalError::RangeError { .. })
        ));
        assert_eq!(get_property(&arr, "length").unwrap(), Value::Number(0.0));
    }

    #[test]
    fn test_string_properties() {
        let s = Value::from("héllo");
        assert_eq!(get_property(&s, "length").unwrap(), Value::Number(5.0));
        assert_eq!(get_property(&s, "1").unwrap(), Value::from("é"));
    }

    #[test]
    fn test_nullish_base() {
        assert!(matches!(
            get_property(&Value::Undefined, "x"),
            Err(EvalError::TypeError { ref message, .. })
                if message == "Cannot read properties of undefined (reading 'x')"
        ));
        assert!(set_property(&Value::Null, "x", Value::Null).is_err());
        assert!(delete_property(&Value::Null, "x").is_err());
    }

    #[test]
    fn test_delete() {
        let obj = ObjectRef::from_pairs([("a", Value::Number(1.0))]);
        let value = Value::Object(obj.clone());
        assert!(delete_property(&value, "a").unwrap());
        assert!(!obj.has_own("a"));

        let arr = Value::array(vec![Value::Number(1.0)]);
        delete_property(&arr, "0").unwrap();
        assert_eq!(get_property(&arr, "0").unwrap(), Value::Undefined);
        assert_eq!(get_property(&arr, "length").unwrap(), Value::Number(1.0));
    }

    #[test]
    fn test_in_operator_targets() {
        let proto = ObjectRef::from_pairs([("inherited", Value::Null)]);
        let obj = Value::Object(ObjectRef::with_prototype(Some(proto)));
        assert!(has_property(&obj, "inherited").unwrap());
        assert!(!has_property(&obj, "other").unwrap());
        assert!(has_property(&Value::array(vec![Value::Null]), "0").unwrap());
        assert!(has_property(&Value::from("str"), "length").is_err());
    }

    #[test]
    fn test_primitive_writes_are_ignored() {
        assert!(set_property(&Value::Number(1.0), "x", Value::Null).is_ok());
        assert_eq!(get_property(&Value::Number(1.0), "x").unwrap(), Value::Undefined);
    }
}
