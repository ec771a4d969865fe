//! Error types for Hornbeam evaluation

use thiserror::Error;

use crate::ast::Span;
use crate::environment::EnvironmentError;
use crate::interrupt::InterruptSignal;
use crate::value::{ArrayLengthError, Value};

/// Everything that can stop the evaluation of a node from producing a value.
///
/// Besides genuine failures this also carries [`InterruptSignal`]s in
/// transit: `return`, `break` and `continue` travel up the `Err` channel
/// until the construct responsible for them absorbs them.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Read or write of an undeclared identifier
    #[error("NameError: {name} is not defined")]
    NameError {
        /// The identifier
        name: String,
        /// Where it was referenced
        span: Option<Span>,
    },

    /// Invoking a non-callable, constructing a non-constructible value,
    /// reading a property of `undefined`, assigning to a constant...
    #[error("TypeError: {message}")]
    TypeError {
        /// Human-readable description
        message: String,
        /// Where it happened
        span: Option<Span>,
    },

    /// A numeric argument outside its allowed range, such as an array
    /// length that is negative, fractional or too large
    #[error("RangeError: {message}")]
    RangeError {
        /// Human-readable description
        message: String,
        /// Where it happened
        span: Option<Span>,
    },

    /// A value raised by `throw`, carried verbatim
    #[error("Uncaught {0:?}")]
    Thrown(Value),

    /// A native builtin reported a failure
    #[error("{name}: {message}")]
    BuiltinError {
        /// Builtin name
        name: String,
        /// Failure description
        message: String,
    },

    /// A node kind outside the supported language subset
    #[error("unsupported syntax: {kind} at {span}")]
    UnsupportedSyntax {
        /// ESTree type name of the node
        kind: String,
        /// Its location
        span: Span,
    },

    /// A return/break/continue signal on its way to the construct that
    /// absorbs it. Never observed by callers of [`crate::Evaluator`].
    #[error("{0} signal was not absorbed")]
    Interrupt(InterruptSignal),

    /// `break` reached a function or program boundary
    #[error("break{} outside of an enclosing loop", fmt_label(.label))]
    BreakOutsideLoop {
        /// The break's label, if any
        label: Option<String>,
    },

    /// `continue` reached a function or program boundary
    #[error("continue{} outside of an enclosing loop", fmt_label(.label))]
    ContinueOutsideLoop {
        /// The continue's label, if any
        label: Option<String>,
    },

    /// Call depth budget exceeded
    #[error("Stack overflow: call depth {depth} exceeds maximum {max}")]
    StackOverflow {
        /// Depth reached
        depth: usize,
        /// Configured maximum
        max: usize,
    },

    /// The interrupt flag was raised
    #[error("Evaluation interrupted")]
    Interrupted,

    /// The ESTree JSON could not be decoded
    #[error("invalid syntax tree: {0}")]
    InvalidTree(#[from] serde_json::Error),
}

fn fmt_label(label: &Option<String>) -> String {
    match label {
        Some(l) => format!(" {}", l),
        None => String::new(),
    }
}

impl EvalError {
    /// Build a type error without a location.
    pub fn type_error(message: impl Into<String>) -> Self {
        EvalError::TypeError {
            message: message.into(),
            span: None,
        }
    }

    /// Build a range error without a location.
    pub fn range_error(message: impl Into<String>) -> Self {
        EvalError::RangeError {
            message: message.into(),
            span: None,
        }
    }

    /// Attach `span` to name, type and range errors that do not carry one yet.
    pub fn with_span(self, span: Span) -> Self {
        match self {
            EvalError::NameError { name, span: None } => EvalError::NameError {
                name,
                span: Some(span),
            },
            EvalError::TypeError {
                message,
                span: None,
            } => EvalError::TypeError {
                message,
                span: Some(span),
            },
            EvalError::RangeError {
                message,
                span: None,
            } => EvalError::RangeError {
                message,
                span: Some(span),
            },
            other => other,
        }
    }

    /// Whether a `catch` clause may handle this error.
    ///
    /// Signals, resource limits, interruption and unsupported syntax are
    /// never catchable.
    pub fn is_catchable(&self) -> bool {
        matches!(
            self,
            EvalError::Thrown(_)
                | EvalError::NameError { .. }
                | EvalError::TypeError { .. }
                | EvalError::RangeError { .. }
                | EvalError::BuiltinError { .. }
        )
    }

    /// The value a `catch` parameter binds for this error.
    ///
    /// Thrown values come back verbatim; engine errors become
    /// `{ name, message }` objects. Uncatchable errors are handed back.
    pub fn into_thrown_value(self) -> Result<Value, EvalError> {
        match self {
            EvalError::Thrown(value) => Ok(value),
            EvalError::NameError { name, .. } => {
                Ok(Value::error("NameError", format!("{} is not defined", name)))
            }
            EvalError::TypeError { message, .. } => Ok(Value::error("TypeError", message)),
            EvalError::RangeError { message, .. } => Ok(Value::error("RangeError", message)),
            EvalError::BuiltinError { name, message } => {
                Ok(Value::error("Error", format!("{}: {}", name, message)))
            }
            other => Err(other),
        }
    }
}

impl From<EnvironmentError> for EvalError {
    fn from(err: EnvironmentError) -> Self {
        match err {
            EnvironmentError::UndefinedVariable { name } => EvalError::NameError { name, span: None },
            EnvironmentError::ImmutableBinding { name } => EvalError::TypeError {
                message: format!("Assignment to constant variable '{}'", name),
                span: None,
            },
        }
    }
}

impl From<ArrayLengthError> for EvalError {
    fn from(err: ArrayLengthError) -> Self {
        EvalError::range_error(err.to_string())
    }
}

impl From<InterruptSignal> for EvalError {
    fn from(signal: InterruptSignal) -> Self {
        EvalError::Interrupt(signal)
    }
}

/// Runtime type name of a value, as used in diagnostics.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Undefined => "undefined",
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Object(_) => "object",
        Value::Array(_) => "array",
        Value::Function(_) | Value::Builtin(_) => "function",
    }
}
