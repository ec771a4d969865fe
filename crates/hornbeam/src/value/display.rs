//! Display and Debug implementations for Value
//!
//! `Display` is the language's string conversion (what `"" + v` produces).
//! `Debug` is an inspect form for diagnostics and `console.log`.

use std::fmt;

use super::*;

/// Nesting depth past which `Debug` abbreviates containers.
const INSPECT_DEPTH: usize = 2;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&number_to_string(*n)),
            Value::String(s) => f.write_str(s),
            Value::Object(_) => write!(f, "[object Object]"),
            Value::Array(items) => join(items, f, &mut Vec::new()),
            Value::Function(func) => match &func.source {
                Some(source) => f.write_str(source),
                None => write!(f, "function {}() {{ ... }}", func.display_name()),
            },
            Value::Builtin(builtin) => {
                write!(f, "function {}() {{ [native code] }}", builtin.name)
            }
        }
    }
}

/// Comma-join an array's elements, `undefined` and `null` as empty.
///
/// `joining` holds the arrays whose join is in progress; meeting one of
/// them again renders it as the empty string.
fn join(items: &ArrayRef, f: &mut fmt::Formatter<'_>, joining: &mut Vec<ArrayRef>) -> fmt::Result {
    if joining.iter().any(|outer| outer.ptr_eq(items)) {
        return Ok(());
    }
    joining.push(items.clone());
    for (i, item) in items.to_vec().iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        match item {
            Value::Undefined | Value::Null => {}
            Value::Array(nested) => join(nested, f, joining)?,
            other => write!(f, "{}", other)?,
        }
    }
    joining.pop();
    Ok(())
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        inspect(self, f, 0)
    }
}

fn inspect(value: &Value, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    match value {
        Value::String(s) => write!(f, "'{}'", s.replace('\'', "\\'")),

        Value::Array(items) => {
            if items.is_empty() {
                return write!(f, "[]");
            }
            if depth > INSPECT_DEPTH {
                return write!(f, "[Array]");
            }
            write!(f, "[ ")?;
            for (i, item) in items.to_vec().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                inspect(item, f, depth + 1)?;
            }
            write!(f, " ]")
        }

        Value::Object(object) => {
            if object.is_empty() {
                return write!(f, "{{}}");
            }
            if depth > INSPECT_DEPTH {
                return write!(f, "[Object]");
            }
            write!(f, "{{ ")?;
            for (i, (key, item)) in object.entries().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: ", key)?;
                inspect(item, f, depth + 1)?;
            }
            write!(f, " }}")
        }

        Value::Function(func) => match &func.name {
            Some(name) => write!(f, "[Function: {}]", name),
            None => write!(f, "[Function (anonymous)]"),
        },
        Value::Builtin(builtin) => write!(f, "[Function: {}]", builtin.name),

        primitive => write!(f, "{}", primitive),
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        inspect(&Value::Object(self.clone()), f, 0)
    }
}

impl fmt::Debug for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        inspect(&Value::Array(self.clone()), f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_primitives() {
        assert_eq!(Value::Undefined.to_string(), "undefined");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(-0.0).to_string(), "0");
        assert_eq!(Value::Number(0.5).to_string(), "0.5");
        assert_eq!(Value::from("hi").to_string(), "hi");
    }

    #[test]
    fn test_display_array_joins() {
        let arr = Value::from(vec![
            Value::Number(1.0),
            Value::Null,
            Value::from(vec![Value::Number(2.0), Value::Number(3.0)]),
        ]);
        assert_eq!(arr.to_string(), "1,,2,3");
    }

    #[test]
    fn test_display_self_referencing_array() {
        let arr = ArrayRef::new(vec![Value::Number(1.0)]);
        arr.push(Value::Array(arr.clone()));
        arr.push(Value::Number(2.0));
        assert_eq!(Value::Array(arr.clone()).to_string(), "1,,2");

        let outer = ArrayRef::new(vec![Value::Array(arr.clone()), Value::from("x")]);
        assert_eq!(Value::Array(outer).to_string(), "1,,2,x");
    }

    #[test]
    fn test_display_object() {
        assert_eq!(Value::Object(ObjectRef::new()).to_string(), "[object Object]");
    }

    #[test]
    fn test_debug_inspect() {
        let obj = ObjectRef::from_pairs([
            ("a", Value::Number(1.0)),
            ("b", Value::from("x")),
            ("c", Value::array(vec![])),
        ]);
        assert_eq!(format!("{:?}", Value::Object(obj)), "{ a: 1, b: 'x', c: [] }");
    }

    #[test]
    fn test_debug_depth_limit() {
        let deep = Value::from(vec![Value::from(vec![Value::from(vec![Value::from(
            vec![Value::from(vec![Value::Number(1.0)])],
        )])])]);
        assert_eq!(format!("{:?}", deep), "[ [ [ [Array] ] ] ]");
    }
}
