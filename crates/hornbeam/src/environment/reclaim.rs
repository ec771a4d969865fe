//! Reclaiming scopes caught in reference cycles
//!
//! A function declared in a scope captures that scope, so the binding table
//! and the closure keep each other alive. When evaluation leaves a scope it
//! created, [`ScopeGuard`] looks at the subgraph reachable from that scope
//! (descendant scopes, and the objects, arrays and functions they hold) and
//! compares each node's strong count with the references coming from inside
//! the subgraph. Nodes that nothing outside refers to, directly or through a
//! live node, are cleared so reference counting can free them.

use std::ops::Deref;
use std::rc::Rc;

use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::trace;

use super::{Scope, ScopeKind};
use crate::value::{ArrayRef, FunctionValue, ObjectRef, Value};

/// Owns a scope created for one evaluation step and reclaims it on drop.
///
/// Dereferences to the guarded [`Scope`].
pub struct ScopeGuard {
    scope: Scope,
}

impl ScopeGuard {
    /// Guard `scope`. Cycles rooted in it are broken when the guard drops.
    pub fn new(scope: Scope) -> Self {
        Self { scope }
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        reclaim(&self.scope);
    }
}

impl Deref for ScopeGuard {
    type Target = Scope;

    fn deref(&self) -> &Scope {
        &self.scope
    }
}

/// Break the cycles rooted at `root` that nothing outside them can reach.
///
/// The caller holds one handle to `root`. Returns the number of nodes
/// cleared.
pub(crate) fn reclaim(root: &Scope) -> usize {
    // Only the caller's handle: dropping it frees the scope.
    if Rc::strong_count(&root.0) <= 1 {
        return 0;
    }

    let graph = Graph::discover(root);
    let garbage = graph.garbage();
    for &index in &garbage {
        graph.node(index).clear();
    }
    if !garbage.is_empty() {
        trace!(cleared = garbage.len(), visited = graph.len(), "reclaimed scope cycle");
    }
    garbage.len()
}

// ═══════════════════════════════════════════════════════════════════════
// Heap Nodes
// ═══════════════════════════════════════════════════════════════════════

enum Node {
    Scope(Scope),
    Object(ObjectRef),
    Array(ArrayRef),
    Function(Rc<FunctionValue>),
}

impl Node {
    fn from_value(value: &Value) -> Option<Node> {
        match value {
            Value::Object(object) => Some(Node::Object(object.clone())),
            Value::Array(items) => Some(Node::Array(items.clone())),
            Value::Function(func) => Some(Node::Function(Rc::clone(func))),
            _ => None,
        }
    }

    fn id(&self) -> usize {
        match self {
            Node::Scope(scope) => Rc::as_ptr(&scope.0) as usize,
            Node::Object(object) => object.addr(),
            Node::Array(items) => items.addr(),
            Node::Function(func) => Rc::as_ptr(func) as usize,
        }
    }

    fn strong_count(&self) -> usize {
        match self {
            Node::Scope(scope) => Rc::strong_count(&scope.0),
            Node::Object(object) => object.strong_count(),
            Node::Array(items) => items.strong_count(),
            Node::Function(func) => Rc::strong_count(func),
        }
    }

    /// Outgoing strong references, one entry per reference.
    fn children(&self, root: &Scope) -> Vec<Node> {
        match self {
            Node::Scope(scope) => {
                let mut children = Vec::new();
                if let Ok(bindings) = scope.0.bindings.try_borrow() {
                    children.extend(bindings.values().filter_map(|b| Node::from_value(&b.value)));
                }
                if let ScopeKind::Function { receiver } = &scope.0.kind {
                    children.extend(Node::from_value(receiver));
                }
                // A region scope's parent is the root or another region scope.
                if !scope.ptr_eq(root) {
                    children.extend(scope.parent().cloned().map(Node::Scope));
                }
                children
            }
            Node::Object(object) => {
                let mut children: Vec<Node> = object
                    .entries()
                    .iter()
                    .filter_map(|(_, value)| Node::from_value(value))
                    .collect();
                children.extend(object.prototype().map(Node::Object));
                children
            }
            Node::Array(items) => items.to_vec().iter().filter_map(Node::from_value).collect(),
            Node::Function(func) => {
                let mut children = vec![Node::Object(func.properties.clone())];
                if descends_from(&func.scope, root) {
                    children.push(Node::Scope(func.scope.clone()));
                }
                children
            }
        }
    }

    fn clear(&self) {
        match self {
            Node::Scope(scope) => {
                if let Ok(mut bindings) = scope.0.bindings.try_borrow_mut() {
                    bindings.clear();
                }
            }
            Node::Object(object) => object.clear(),
            Node::Array(items) => items.clear(),
            Node::Function(_) => {}
        }
    }
}

fn descends_from(scope: &Scope, root: &Scope) -> bool {
    scope.ancestors().any(|ancestor| ancestor.ptr_eq(root))
}

// ═══════════════════════════════════════════════════════════════════════
// Reachability Graph
// ═══════════════════════════════════════════════════════════════════════

/// Nodes reachable from the root, keyed by address. Holds one handle to
/// each node, which the liveness test accounts for.
struct Graph {
    nodes: IndexMap<usize, Node>,
    edges: Vec<Vec<usize>>,
    internal: Vec<usize>,
}

impl Graph {
    fn discover(root: &Scope) -> Self {
        let mut graph = Graph {
            nodes: IndexMap::new(),
            edges: Vec::new(),
            internal: Vec::new(),
        };
        graph.insert(Node::Scope(root.clone()));

        let mut next = 0;
        while next < graph.nodes.len() {
            for child in graph.node(next).children(root) {
                let index = graph.insert(child);
                graph.edges[next].push(index);
                graph.internal[index] += 1;
            }
            next += 1;
        }
        graph
    }

    fn insert(&mut self, node: Node) -> usize {
        match self.nodes.entry(node.id()) {
            Entry::Occupied(entry) => entry.index(),
            Entry::Vacant(entry) => {
                let index = entry.index();
                entry.insert(node);
                self.edges.push(Vec::new());
                self.internal.push(0);
                index
            }
        }
    }

    fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Indices of nodes unreachable from anything outside the graph.
    fn garbage(&self) -> Vec<usize> {
        let mut live = vec![false; self.len()];
        let mut pending: Vec<usize> = (0..self.len())
            .filter(|&index| {
                // The graph's own handle, plus the caller's handle on the root.
                let held_here = 1 + usize::from(index == 0);
                self.node(index).strong_count() > self.internal[index] + held_here
            })
            .collect();

        while let Some(index) = pending.pop() {
            if live[index] {
                continue;
            }
            live[index] = true;
            pending.extend(self.edges[index].iter().copied().filter(|&to| !live[to]));
        }

        (0..self.len()).filter(|&index| !live[index]).collect()
    }
}
