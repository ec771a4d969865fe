//! Evaluation entry point
//!
//! [`Evaluator`] bundles an [`EvalContext`] with the optional source text
//! and turns whatever escapes the top-level program into a plain result:
//! a top-level `return` yields its value, a stray `break`/`continue`
//! becomes an error.

use std::rc::Rc;

use tracing::debug;

use crate::ast::Node;
use crate::eval::Evaluate;
use crate::{EvalContext, EvalError, InterruptSignal, Scope, ScopeGuard, Value};

/// A configured interpreter.
#[derive(Debug, Default)]
pub struct Evaluator {
    ctx: EvalContext,
}

impl Evaluator {
    /// An evaluator with the default context.
    pub fn new() -> Self {
        Self::default()
    }

    /// An evaluator with an explicit context (call depth, interrupt flag,
    /// tracing).
    pub fn with_context(ctx: EvalContext) -> Self {
        Self { ctx }
    }

    /// Attach the source text the tree was parsed from. Used for error
    /// messages and the printable form of functions.
    pub fn with_source(mut self, source: impl Into<Rc<str>>) -> Self {
        self.ctx = self.ctx.with_source(source);
        self
    }

    /// The evaluation context.
    pub fn context(&self) -> &EvalContext {
        &self.ctx
    }

    /// Evaluate `node` in `scope`, or in a fresh scope holding the prelude.
    ///
    /// A fresh scope is reclaimed once evaluation ends; a caller's scope is
    /// left as the program left it.
    ///
    /// # Errors
    ///
    /// Any uncaught failure. Control-flow signals never escape: `return`
    /// at the top level yields its payload, and an unabsorbed `break` or
    /// `continue` becomes `BreakOutsideLoop`/`ContinueOutsideLoop`.
    #[tracing::instrument(level = "debug", skip_all, fields(kind = node.kind_name()))]
    pub fn evaluate(&self, node: &Node, scope: Option<Scope>) -> Result<Value, EvalError> {
        match scope {
            Some(scope) => self.evaluate_in(node, &scope),
            None => self.evaluate_in(node, &ScopeGuard::new(Scope::with_prelude())),
        }
    }

    fn evaluate_in(&self, node: &Node, scope: &Scope) -> Result<Value, EvalError> {
        match node.eval(scope, &self.ctx) {
            Err(EvalError::Interrupt(signal)) => {
                debug!(%signal, "signal reached top level");
                match signal {
                    InterruptSignal::Return(value) => Ok(value),
                    InterruptSignal::Break(label) => Err(EvalError::BreakOutsideLoop { label }),
                    InterruptSignal::Continue(label) => {
                        Err(EvalError::ContinueOutsideLoop { label })
                    }
                }
            }
            result => result,
        }
    }

    /// Decode an ESTree JSON tree and evaluate it.
    ///
    /// # Errors
    ///
    /// `InvalidTree` when the JSON does not describe a syntax tree, then
    /// anything [`Evaluator::evaluate`] reports.
    pub fn evaluate_json(&self, json: &str, scope: Option<Scope>) -> Result<Value, EvalError> {
        let node = Node::from_json(json)?;
        self.evaluate(&node, scope)
    }
}

/// Evaluate `node` with a default [`Evaluator`].
pub fn evaluate(node: &Node, scope: Option<Scope>) -> Result<Value, EvalError> {
    Evaluator::new().evaluate(node, scope)
}
