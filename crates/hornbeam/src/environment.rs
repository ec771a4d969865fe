//! Lexical scope chain managing variable and function bindings

mod prelude;
mod reclaim;

pub use reclaim::ScopeGuard;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use thiserror::Error;

use crate::ast::VariableKind;
use crate::value::Value;

/// Errors raised by scope operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    /// No scope in the chain binds the name
    #[error("Undefined variable: {name}")]
    UndefinedVariable {
        /// The missing name
        name: String,
    },

    /// Assignment to a `const` binding
    #[error("Cannot assign to constant binding '{name}'")]
    ImmutableBinding {
        /// The constant's name
        name: String,
    },
}

/// How a binding was introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    /// `var x`
    Var,
    /// `let x`
    Let,
    /// `const x`, rejects reassignment
    Const,
    /// `function x() {}`
    Function,
    /// A function parameter
    Param,
}

impl From<VariableKind> for DeclarationKind {
    fn from(kind: VariableKind) -> Self {
        match kind {
            VariableKind::Var => DeclarationKind::Var,
            VariableKind::Let => DeclarationKind::Let,
            VariableKind::Const => DeclarationKind::Const,
        }
    }
}

/// A single name binding.
#[derive(Debug, Clone)]
pub struct Binding {
    /// How the binding was declared
    pub kind: DeclarationKind,

    /// The bound value
    pub value: Value,
}

/// Whether a scope marks a function invocation boundary.
#[derive(Debug, Clone)]
pub enum ScopeKind {
    /// Created per invocation; carries the receiver `this` resolves to
    Function {
        /// The bound receiver
        receiver: Value,
    },

    /// Created per control-structure body
    Block,
}

struct Frame {
    kind: ScopeKind,
    bindings: RefCell<IndexMap<String, Binding>>,
    parent: Option<Scope>,
}

/// A lexical scope: a binding table linked to its enclosing scope.
///
/// Scopes are reference counted. Cloning a `Scope` yields another handle
/// to the same table, which is how closures capture their defining scope
/// and keep it alive after the defining call returns. A child keeps its
/// ancestors alive, since lookups walk through them.
///
/// A closure stored in the scope it captures forms a cycle. Scopes the
/// evaluator creates are held by a [`ScopeGuard`], which breaks such cycles
/// once nothing outside them refers to the scope.
///
/// Declarations always land in the scope they are made on; nothing is
/// hoisted to an enclosing function scope.
///
/// # Example
///
/// ```
/// use hornbeam::{DeclarationKind, Scope, Value};
///
/// let global = Scope::new();
/// global.declare(DeclarationKind::Let, "x", Value::Number(1.0));
///
/// let inner = global.child();
/// inner.declare(DeclarationKind::Let, "y", Value::Number(2.0));
/// inner.set("x", Value::Number(10.0)).unwrap();
///
/// assert_eq!(global.get("x").unwrap(), Value::Number(10.0));
/// assert!(global.get("y").is_err());
/// ```
#[derive(Clone)]
pub struct Scope(Rc<Frame>);

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope {
    /// Create a root scope whose receiver is `undefined`.
    pub fn new() -> Self {
        Self::with_receiver(Value::Undefined)
    }

    /// Create a root scope with an explicit ambient receiver.
    pub fn with_receiver(receiver: Value) -> Self {
        Self::from_parts(ScopeKind::Function { receiver }, None)
    }

    fn from_parts(kind: ScopeKind, parent: Option<Scope>) -> Self {
        Scope(Rc::new(Frame {
            kind,
            bindings: RefCell::new(IndexMap::new()),
            parent,
        }))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Scope Creation
    // ═══════════════════════════════════════════════════════════════════

    /// Create a block scope nested in this one.
    pub fn child(&self) -> Scope {
        Self::from_parts(ScopeKind::Block, Some(self.clone()))
    }

    /// Create a function-invocation scope nested in this one.
    pub fn child_function(&self, receiver: Value) -> Scope {
        Self::from_parts(ScopeKind::Function { receiver }, Some(self.clone()))
    }

    /// Enter a block scope nested in this one, reclaimed when the guard drops.
    pub fn enter(&self) -> ScopeGuard {
        ScopeGuard::new(self.child())
    }

    /// Enter a function-invocation scope nested in this one, reclaimed when
    /// the guard drops.
    pub fn enter_function(&self, receiver: Value) -> ScopeGuard {
        ScopeGuard::new(self.child_function(receiver))
    }

    /// The enclosing scope, if any.
    pub fn parent(&self) -> Option<&Scope> {
        self.0.parent.as_ref()
    }

    /// Number of enclosing scopes; a root has depth 0.
    pub fn depth(&self) -> usize {
        self.ancestors().count() - 1
    }

    /// Whether this scope was created for a function invocation (or is a root).
    pub fn is_function_boundary(&self) -> bool {
        matches!(self.0.kind, ScopeKind::Function { .. })
    }

    /// Whether two handles refer to the same scope.
    pub fn ptr_eq(&self, other: &Scope) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn ancestors(&self) -> impl Iterator<Item = &Scope> {
        std::iter::successors(Some(self), |scope| scope.parent())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Declaration
    // ═══════════════════════════════════════════════════════════════════

    /// Bind `name` in this scope, replacing any binding of the same name
    /// here. Returns the bound value.
    pub fn declare(&self, kind: DeclarationKind, name: impl Into<String>, value: Value) -> Value {
        self.0.bindings.borrow_mut().insert(
            name.into(),
            Binding {
                kind,
                value: value.clone(),
            },
        );
        value
    }

    // ═══════════════════════════════════════════════════════════════════
    // Lookup
    // ═══════════════════════════════════════════════════════════════════

    /// Resolve `name`, searching from this scope outward.
    ///
    /// # Errors
    ///
    /// `UndefinedVariable` if no scope up to the root binds it.
    pub fn get(&self, name: &str) -> Result<Value, EnvironmentError> {
        self.lookup(name)
            .ok_or_else(|| EnvironmentError::UndefinedVariable {
                name: name.to_string(),
            })
    }

    /// Resolve `name`, or `None` if it is not bound anywhere.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.ancestors()
            .find_map(|scope| scope.0.bindings.borrow().get(name).map(|b| b.value.clone()))
    }

    /// The full binding for `name` in the nearest scope that has one.
    pub fn binding(&self, name: &str) -> Option<Binding> {
        self.ancestors()
            .find_map(|scope| scope.0.bindings.borrow().get(name).cloned())
    }

    /// Check if a binding exists anywhere in the chain.
    pub fn contains(&self, name: &str) -> bool {
        self.ancestors().any(|scope| scope.contains_local(name))
    }

    /// Check if a binding exists in this scope only.
    pub fn contains_local(&self, name: &str) -> bool {
        self.0.bindings.borrow().contains_key(name)
    }

    /// Names bound directly in this scope, in declaration order.
    pub fn local_names(&self) -> Vec<String> {
        self.0.bindings.borrow().keys().cloned().collect()
    }

    /// The receiver of the nearest enclosing function scope.
    pub fn receiver(&self) -> Value {
        self.ancestors()
            .find_map(|scope| match &scope.0.kind {
                ScopeKind::Function { receiver } => Some(receiver.clone()),
                ScopeKind::Block => None,
            })
            .unwrap_or_default()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Assignment (Mutation)
    // ═══════════════════════════════════════════════════════════════════

    /// Overwrite the nearest existing binding of `name`.
    ///
    /// Assignment never creates a binding.
    ///
    /// # Errors
    ///
    /// - `UndefinedVariable` if no scope binds the name
    /// - `ImmutableBinding` if the nearest binding is `const`
    pub fn set(&self, name: &str, value: Value) -> Result<(), EnvironmentError> {
        for scope in self.ancestors() {
            let mut bindings = scope.0.bindings.borrow_mut();
            if let Some(binding) = bindings.get_mut(name) {
                if binding.kind == DeclarationKind::Const {
                    return Err(EnvironmentError::ImmutableBinding {
                        name: name.to_string(),
                    });
                }
                binding.value = value;
                return Ok(());
            }
        }
        Err(EnvironmentError::UndefinedVariable {
            name: name.to_string(),
        })
    }

    /// Copy the local bindings of `self` into `target`, keeping their kinds.
    ///
    /// Used to give each loop iteration its own copy of the loop variables.
    pub(crate) fn copy_locals_into(&self, target: &Scope) {
        let source = self.0.bindings.borrow();
        let mut dest = target.0.bindings.borrow_mut();
        for (name, binding) in source.iter() {
            dest.insert(name.clone(), binding.clone());
        }
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("function", &self.is_function_boundary())
            .field("depth", &self.depth())
            .field("names", &self.local_names())
            .finish()
    }
}
