//! Callable value types: closures and builtins

use std::fmt;
use std::rc::Rc;

use super::{ObjectRef, Value};
use crate::ast;
use crate::environment::Scope;

/// Type alias for builtin function pointers to reduce complexity
pub type BuiltinFnPtr = Rc<dyn Fn(&[Value]) -> Result<Value, String>>;

/// A user-defined function closed over its defining scope.
///
/// Stores the AST directly for interpretation.
pub struct FunctionValue {
    /// Declared name, if any
    pub name: Option<String>,

    /// Parameter names, bound positionally
    pub params: Vec<String>,

    /// The function node (shared with the syntax tree)
    pub definition: Rc<ast::Function>,

    /// Scope the function was created in (strong: keeps it alive)
    pub scope: Scope,

    /// Arrow functions keep the receiver of their defining scope
    pub is_arrow: bool,

    /// Printable source excerpt
    pub source: Option<String>,

    /// Own properties, including `prototype` for constructible functions
    pub properties: ObjectRef,
}

impl FunctionValue {
    /// The `prototype` object used by `new` and `instanceof`, if any.
    pub fn prototype(&self) -> Option<ObjectRef> {
        match self.properties.get_own("prototype") {
            Some(Value::Object(prototype)) => Some(prototype),
            _ => None,
        }
    }

    /// Name for diagnostics.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("anonymous")
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("is_arrow", &self.is_arrow)
            .finish_non_exhaustive()
    }
}

/// A built-in native function.
///
/// These are Rust functions exposed to the interpreter.
#[derive(Clone)]
pub struct BuiltinFn {
    /// Function name (for display/debugging)
    pub name: String,

    /// The actual function pointer
    /// Uses a trait object for flexibility
    pub func: BuiltinFnPtr,
}

impl BuiltinFn {
    /// Invoke the native function.
    pub fn call(&self, args: &[Value]) -> Result<Value, String> {
        (self.func)(args)
    }
}

impl fmt::Debug for BuiltinFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BuiltinFn({})", self.name)
    }
}
