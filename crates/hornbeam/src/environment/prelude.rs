//! Standard prelude with built-in bindings

use std::rc::Rc;

use super::{DeclarationKind, Scope};
use crate::value::{BuiltinFn, ObjectRef, Value};

impl Scope {
    /// Create a root scope preloaded with the standard built-ins.
    pub fn with_prelude() -> Self {
        let scope = Self::new();
        scope.load_prelude();
        scope
    }

    /// Load the standard prelude into this scope.
    pub fn load_prelude(&self) {
        // Global constants
        self.declare(DeclarationKind::Const, "undefined", Value::Undefined);
        self.declare(DeclarationKind::Const, "NaN", Value::Number(f64::NAN));
        self.declare(
            DeclarationKind::Const,
            "Infinity",
            Value::Number(f64::INFINITY),
        );

        // Printing
        let print = BuiltinFn::new("print", builtin_print);
        self.declare(DeclarationKind::Const, "print", Value::Builtin(print));

        let console = ObjectRef::new();
        console.set("log", Value::Builtin(BuiltinFn::new("log", builtin_print)));
        self.declare(DeclarationKind::Const, "console", Value::Object(console));
    }
}

impl BuiltinFn {
    /// Wrap a native function.
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&[Value]) -> Result<Value, String> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Rc::new(func),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Function Implementations
// ═══════════════════════════════════════════════════════════════════════

/// Render arguments the way `console.log` does: space separated, strings
/// bare, everything else in inspect form.
pub(crate) fn format_args(args: &[Value]) -> String {
    args.iter()
        .map(|arg| match arg {
            Value::String(s) => s.to_string(),
            other => format!("{:?}", other),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn builtin_print(args: &[Value]) -> Result<Value, String> {
    println!("{}", format_args(args));
    Ok(Value::Undefined)
}
