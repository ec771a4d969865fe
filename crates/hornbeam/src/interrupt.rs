//! Interruption signals for return/break/continue

use std::fmt;

use crate::Value;

/// Non-local exit produced by `return`, `break` or `continue`.
///
/// A signal does not evaluate to a value. It travels up the `Err` channel
/// as [`crate::EvalError::Interrupt`] until caught by the construct that
/// owns it: loops absorb matching breaks and continues, function calls
/// unwrap returns.
#[derive(Debug, Clone, PartialEq)]
pub enum InterruptSignal {
    /// Return from the current function with a payload.
    Return(Value),

    /// Exit a loop (or labeled statement). The label, when present, names
    /// the target.
    Break(Option<String>),

    /// Skip to the next iteration of a loop, optionally a labeled one.
    Continue(Option<String>),
}

/// The variant of an [`InterruptSignal`] without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptKind {
    /// `return`
    Return,
    /// `break`
    Break,
    /// `continue`
    Continue,
}

impl InterruptSignal {
    /// Which variant this is.
    pub fn kind(&self) -> InterruptKind {
        match self {
            InterruptSignal::Return(_) => InterruptKind::Return,
            InterruptSignal::Break(_) => InterruptKind::Break,
            InterruptSignal::Continue(_) => InterruptKind::Continue,
        }
    }

    /// The break/continue label, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            InterruptSignal::Break(label) | InterruptSignal::Continue(label) => label.as_deref(),
            InterruptSignal::Return(_) => None,
        }
    }

    /// The return payload, if this is a return.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            InterruptSignal::Return(value) => Some(value),
            _ => None,
        }
    }

    /// Check if this signal targets a loop carrying `loop_label`.
    /// An unlabeled signal matches any loop; a labeled one only its own.
    pub fn matches_label(&self, loop_label: Option<&str>) -> bool {
        match self {
            InterruptSignal::Break(label) | InterruptSignal::Continue(label) => {
                match (label.as_deref(), loop_label) {
                    (None, _) => true,
                    (Some(l), Some(ll)) => l == ll,
                    (Some(_), None) => false,
                }
            }
            InterruptSignal::Return(_) => false,
        }
    }
}

impl fmt::Display for InterruptSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.kind() {
            InterruptKind::Return => "return",
            InterruptKind::Break => "break",
            InterruptKind::Continue => "continue",
        };
        match self.label() {
            Some(label) => write!(f, "{} {}", name, label),
            None => f.write_str(name),
        }
    }
}
