//! Evaluation context configuration

use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::ast::{Node, NodeKind, Span};
use crate::EvalError;

/// Configuration and state for evaluation.
///
/// This is passed through all evaluation calls and controls
/// behavior like recursion limits and interruption.
#[derive(Debug, Clone)]
pub struct EvalContext {
    /// Maximum call depth (stack overflow protection)
    pub max_call_depth: usize,

    /// Interrupt flag - set to true to abort evaluation
    pub interrupt: Arc<AtomicBool>,

    /// Whether to trace evaluation (for debugging)
    pub trace: bool,

    /// Source text the tree was parsed from, for diagnostics
    source: Option<Rc<str>>,

    /// Current number of active function invocations
    call_depth: Cell<usize>,
}

impl Default for EvalContext {
    fn default() -> Self {
        Self {
            max_call_depth: 1000,
            interrupt: Arc::new(AtomicBool::new(false)),
            trace: false,
            source: None,
            call_depth: Cell::new(0),
        }
    }
}

impl EvalContext {
    /// Create a new context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with a custom call depth limit.
    pub fn with_max_call_depth(max_depth: usize) -> Self {
        Self {
            max_call_depth: max_depth,
            ..Default::default()
        }
    }

    /// Enable or disable per-node trace events.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Attach the source text the tree was parsed from.
    pub fn with_source(mut self, source: impl Into<Rc<str>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The attached source text, if any.
    pub fn source(&self) -> Option<&Rc<str>> {
        self.source.as_ref()
    }

    /// Check if evaluation has been interrupted.
    pub fn is_interrupted(&self) -> bool {
        self.interrupt.load(Ordering::Relaxed)
    }

    /// Request interruption of evaluation.
    pub fn interrupt(&self) {
        self.interrupt.store(true, Ordering::Relaxed);
    }

    /// Reset the interrupt flag.
    pub fn reset_interrupt(&self) {
        self.interrupt.store(false, Ordering::Relaxed);
    }

    // ═══════════════════════════════════════════════════════════════════
    // Call Depth Tracking (Stack Overflow Protection)
    // ═══════════════════════════════════════════════════════════════════

    /// Enter a function call. Returns error if max depth exceeded.
    ///
    /// The depth is released when the returned guard is dropped.
    pub fn enter_call(&self) -> Result<CallGuard<'_>, EvalError> {
        let depth = self.call_depth.get();
        if depth >= self.max_call_depth {
            return Err(EvalError::StackOverflow {
                depth: depth + 1,
                max: self.max_call_depth,
            });
        }
        self.call_depth.set(depth + 1);
        Ok(CallGuard { ctx: self })
    }

    /// Get current call depth.
    pub fn call_depth(&self) -> usize {
        self.call_depth.get()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Diagnostics
    // ═══════════════════════════════════════════════════════════════════

    /// The source text covered by `span`, if the source is known.
    pub fn source_text(&self, span: Span) -> Option<&str> {
        let source = self.source.as_deref()?;
        if span.start == span.end {
            return None;
        }
        span.slice(source)
    }

    /// A short printable description of `node` for error messages.
    ///
    /// Uses the source text when available, otherwise renders identifier
    /// and member paths (`a.b.c`), falling back to the node kind.
    pub fn describe(&self, node: &Node) -> String {
        if let Some(text) = self.source_text(node.span) {
            return text.to_string();
        }
        render_path(node).unwrap_or_else(|| node.kind_name().to_string())
    }
}

fn render_path(node: &Node) -> Option<String> {
    match &node.kind {
        NodeKind::Identifier { name } => Some(name.clone()),
        NodeKind::ThisExpression => Some("this".to_string()),
        NodeKind::MemberExpression {
            object,
            property,
            computed: false,
        } => Some(format!(
            "{}.{}",
            render_path(object)?,
            property.as_identifier()?
        )),
        NodeKind::MemberExpression {
            object,
            computed: true,
            ..
        } => Some(format!("{}[...]", render_path(object)?)),
        _ => None,
    }
}

/// RAII guard that releases one level of call depth when dropped.
pub struct CallGuard<'a> {
    ctx: &'a EvalContext,
}

impl<'a> Drop for CallGuard<'a> {
    fn drop(&mut self) {
        let depth = self.ctx.call_depth.get();
        self.ctx.call_depth.set(depth.saturating_sub(1));
    }
}
