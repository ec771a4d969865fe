//! # Hornbeam
//!
//! A tree-walking interpreter for ESTree syntax trees of a small
//! JavaScript subset.
//!
//! Hornbeam takes an already-parsed tree (built with [`ast::build`] or
//! decoded from acorn-style JSON) and evaluates it directly: lexical
//! scopes, closures, prototype-linked objects, `new`/`instanceof`, labeled
//! loops, `switch`, and `try`/`catch`/`finally`.
//!
//! ## Architecture
//!
//! - **Syntax tree** ([`ast`]): ESTree node kinds, serde-decoded
//! - **Scopes** ([`environment`]): shared, parent-linked binding tables
//! - **Values** ([`value`]): the runtime value model and its coercions
//! - **Evaluation** ([`eval`]): one dispatcher over node kinds, with
//!   `return`/`break`/`continue` travelling as [`InterruptSignal`]s
//!
//! ```
//! use hornbeam::ast::build::*;
//! use hornbeam::ast::BinaryOperator;
//! use hornbeam::{evaluate, Value};
//!
//! let tree = program(vec![
//!     let_("a", num(2.0)),
//!     expr_stmt(binary(BinaryOperator::Mul, ident("a"), num(21.0))),
//! ]);
//! assert_eq!(evaluate(&tree, None).unwrap(), Value::Number(42.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod context;
pub mod environment;
pub mod error;
pub mod eval;
pub mod evaluator;
pub mod interrupt;
pub mod value;

// Re-export main types
pub use ast::{Node, NodeKind, Span};
pub use context::EvalContext;
pub use environment::{Binding, DeclarationKind, EnvironmentError, Scope, ScopeGuard};
pub use error::EvalError;
pub use eval::{call_value, Evaluate};
pub use evaluator::{evaluate, Evaluator};
pub use interrupt::InterruptSignal;
pub use value::{ArrayRef, BuiltinFn, FunctionValue, ObjectRef, Value};

/// Hornbeam version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
