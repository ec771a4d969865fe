//! Value representation for runtime values

mod callable;
mod coerce;
mod display;
mod impls;
mod object;

pub use callable::{BuiltinFn, BuiltinFnPtr, FunctionValue};
pub use coerce::{
    compare, loose_equals, number_to_string, strict_equals, string_to_number, to_int32,
    to_primitive, to_property_key, to_uint32,
};
pub use object::{ArrayLengthError, ArrayRef, ObjectRef, MAX_ARRAY_LENGTH};

use std::rc::Rc;

/// Runtime value representation for the Hornbeam interpreter.
///
/// Values are organized into three tiers:
/// - Tier 1: Primitives, compared by value
/// - Tier 2: Shared mutable containers, compared by identity
/// - Tier 3: Callable types (closures, builtins)
#[derive(Clone)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Tier 1: Primitives
    // ═══════════════════════════════════════════════════════════════════
    /// `undefined`
    Undefined,

    /// `null`
    Null,

    /// Boolean: `true` or `false`
    Bool(bool),

    /// IEEE 754 double, the only numeric type
    Number(f64),

    /// Immutable string
    String(Rc<str>),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 2: Shared Containers
    // ═══════════════════════════════════════════════════════════════════
    /// Ordered string-keyed properties plus a prototype link
    Object(ObjectRef),

    /// Ordered sequence
    Array(ArrayRef),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 3: Callable Types
    // ═══════════════════════════════════════════════════════════════════
    /// User-defined function with its captured scope
    Function(Rc<FunctionValue>),

    /// Built-in native function
    Builtin(BuiltinFn),
}
