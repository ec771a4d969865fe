//! Programmatic tree builders
//!
//! Embedders that do not go through an ESTree JSON parser, and the test
//! suites, construct trees with these helpers. Every node gets an empty
//! [`Span`].
//!
//! ```
//! use hornbeam::ast::build::*;
//! use hornbeam::ast::BinaryOperator;
//! use hornbeam::{evaluate, Value};
//!
//! let tree = program(vec![expr_stmt(binary(BinaryOperator::Add, num(1.0), num(2.0)))]);
//! assert_eq!(evaluate(&tree, None).unwrap(), Value::Number(3.0));
//! ```

use std::rc::Rc;

use super::{
    AssignmentOperator, BinaryOperator, CatchClause, Function, Ident, LiteralValue,
    LogicalOperator, Node, NodeKind, PropertyKind, Span, SwitchCase, UnaryOperator,
    UpdateOperator, VariableDeclarator, VariableKind,
};

fn node(kind: NodeKind) -> Node {
    Node::new(kind, Span::default())
}

fn label(name: Option<&str>) -> Option<Ident> {
    name.map(Ident::new)
}

// ═══════════════════════════════════════════════════════════════════════
// Statements
// ═══════════════════════════════════════════════════════════════════════

/// `body...`
pub fn program(body: Vec<Node>) -> Node {
    node(NodeKind::Program { body })
}

/// `expression;`
pub fn expr_stmt(expression: Node) -> Node {
    node(NodeKind::ExpressionStatement {
        expression: Box::new(expression),
    })
}

/// `{ body... }`
pub fn block(body: Vec<Node>) -> Node {
    node(NodeKind::BlockStatement { body })
}

/// `;`
pub fn empty() -> Node {
    node(NodeKind::EmptyStatement)
}

/// A single-declarator variable declaration of any kind.
pub fn declare(kind: VariableKind, name: &str, init: Option<Node>) -> Node {
    node(NodeKind::VariableDeclaration {
        kind,
        declarations: vec![VariableDeclarator { id: ident(name), init }],
    })
}

/// `let name = init;`
pub fn let_(name: &str, init: Node) -> Node {
    declare(VariableKind::Let, name, Some(init))
}

/// `const name = init;`
pub fn const_(name: &str, init: Node) -> Node {
    declare(VariableKind::Const, name, Some(init))
}

/// `var name = init;`
pub fn var_(name: &str, init: Node) -> Node {
    declare(VariableKind::Var, name, Some(init))
}

fn function(name: Option<&str>, params: &[&str], body: Node, expression: bool) -> Rc<Function> {
    Rc::new(Function {
        id: name.map(Ident::new),
        params: params.iter().map(|p| ident(p)).collect(),
        body,
        expression,
        generator: false,
        is_async: false,
    })
}

/// `function name(params) { body }`
pub fn func_decl(name: &str, params: &[&str], body: Vec<Node>) -> Node {
    node(NodeKind::FunctionDeclaration(function(
        Some(name),
        params,
        block(body),
        false,
    )))
}

/// `function [name](params) { body }`
pub fn func_expr(name: Option<&str>, params: &[&str], body: Vec<Node>) -> Node {
    node(NodeKind::FunctionExpression(function(
        name,
        params,
        block(body),
        false,
    )))
}

/// `(params) => { body }`
pub fn arrow(params: &[&str], body: Vec<Node>) -> Node {
    node(NodeKind::ArrowFunctionExpression(function(
        None,
        params,
        block(body),
        false,
    )))
}

/// `(params) => expression`
pub fn arrow_expr(params: &[&str], body: Node) -> Node {
    node(NodeKind::ArrowFunctionExpression(function(
        None, params, body, true,
    )))
}

/// `return argument;`
pub fn ret(argument: Option<Node>) -> Node {
    node(NodeKind::ReturnStatement {
        argument: argument.map(Box::new),
    })
}

/// `if (test) consequent else alternate`
pub fn if_(test: Node, consequent: Node, alternate: Option<Node>) -> Node {
    node(NodeKind::IfStatement {
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: alternate.map(Box::new),
    })
}

/// `while (test) body`
pub fn while_(test: Node, body: Node) -> Node {
    node(NodeKind::WhileStatement {
        test: Box::new(test),
        body: Box::new(body),
    })
}

/// `do body while (test)`
pub fn do_while(body: Node, test: Node) -> Node {
    node(NodeKind::DoWhileStatement {
        body: Box::new(body),
        test: Box::new(test),
    })
}

/// `for (init; test; update) body`
pub fn for_(init: Option<Node>, test: Option<Node>, update: Option<Node>, body: Node) -> Node {
    node(NodeKind::ForStatement {
        init: init.map(Box::new),
        test: test.map(Box::new),
        update: update.map(Box::new),
        body: Box::new(body),
    })
}

/// `for (left in right) body`
pub fn for_in(left: Node, right: Node, body: Node) -> Node {
    node(NodeKind::ForInStatement {
        left: Box::new(left),
        right: Box::new(right),
        body: Box::new(body),
    })
}

/// `name: body`
pub fn labeled(name: &str, body: Node) -> Node {
    node(NodeKind::LabeledStatement {
        label: Ident::new(name),
        body: Box::new(body),
    })
}

/// `break [label];`
pub fn brk(name: Option<&str>) -> Node {
    node(NodeKind::BreakStatement { label: label(name) })
}

/// `continue [label];`
pub fn cont(name: Option<&str>) -> Node {
    node(NodeKind::ContinueStatement { label: label(name) })
}

/// `throw argument;`
pub fn throw(argument: Node) -> Node {
    node(NodeKind::ThrowStatement {
        argument: Box::new(argument),
    })
}

/// `try block catch (param) handler finally finalizer`
pub fn try_(
    block: Node,
    handler: Option<(Option<&str>, Node)>,
    finalizer: Option<Node>,
) -> Node {
    node(NodeKind::TryStatement {
        block: Box::new(block),
        handler: handler.map(|(param, body)| {
            Box::new(CatchClause {
                param: param.map(ident),
                body,
            })
        }),
        finalizer: finalizer.map(Box::new),
    })
}

/// `switch (discriminant) { cases }`
pub fn switch(discriminant: Node, cases: Vec<SwitchCase>) -> Node {
    node(NodeKind::SwitchStatement {
        discriminant: Box::new(discriminant),
        cases,
    })
}

/// `case test: consequent`
pub fn case(test: Node, consequent: Vec<Node>) -> SwitchCase {
    SwitchCase {
        test: Some(test),
        consequent,
    }
}

/// `default: consequent`
pub fn default_case(consequent: Vec<Node>) -> SwitchCase {
    SwitchCase {
        test: None,
        consequent,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Expressions
// ═══════════════════════════════════════════════════════════════════════

/// An identifier reference.
pub fn ident(name: &str) -> Node {
    node(NodeKind::Identifier {
        name: name.to_string(),
    })
}

fn literal(value: Option<LiteralValue>) -> Node {
    node(NodeKind::Literal {
        value,
        regex: None,
        bigint: None,
    })
}

/// A numeric literal.
pub fn num(n: f64) -> Node {
    literal(Some(LiteralValue::Number(n)))
}

/// A string literal.
pub fn str_(s: &str) -> Node {
    literal(Some(LiteralValue::String(s.to_string())))
}

/// A boolean literal.
pub fn bool_(b: bool) -> Node {
    literal(Some(LiteralValue::Bool(b)))
}

/// `null`
pub fn null() -> Node {
    literal(None)
}

/// `this`
pub fn this() -> Node {
    node(NodeKind::ThisExpression)
}

/// `[elements]`
pub fn array(elements: Vec<Node>) -> Node {
    node(NodeKind::ArrayExpression {
        elements: elements.into_iter().map(Some).collect(),
    })
}

/// `{ key: value, ... }` with static keys.
pub fn object(properties: Vec<(&str, Node)>) -> Node {
    node(NodeKind::ObjectExpression {
        properties: properties
            .into_iter()
            .map(|(key, value)| {
                node(NodeKind::Property {
                    key: Box::new(ident(key)),
                    value: Box::new(value),
                    kind: PropertyKind::Init,
                    computed: false,
                    shorthand: false,
                    method: false,
                })
            })
            .collect(),
    })
}

/// `object.name`
pub fn member(object: Node, name: &str) -> Node {
    node(NodeKind::MemberExpression {
        object: Box::new(object),
        property: Box::new(ident(name)),
        computed: false,
    })
}

/// `object[property]`
pub fn index(object: Node, property: Node) -> Node {
    node(NodeKind::MemberExpression {
        object: Box::new(object),
        property: Box::new(property),
        computed: true,
    })
}

/// `callee(arguments)`
pub fn call(callee: Node, arguments: Vec<Node>) -> Node {
    node(NodeKind::CallExpression {
        callee: Box::new(callee),
        arguments,
    })
}

/// `new callee(arguments)`
pub fn new_(callee: Node, arguments: Vec<Node>) -> Node {
    node(NodeKind::NewExpression {
        callee: Box::new(callee),
        arguments,
    })
}

/// `left op right`
pub fn binary(operator: BinaryOperator, left: Node, right: Node) -> Node {
    node(NodeKind::BinaryExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// `left && right`, `left || right`, `left ?? right`
pub fn logical(operator: LogicalOperator, left: Node, right: Node) -> Node {
    node(NodeKind::LogicalExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// `op argument`
pub fn unary(operator: UnaryOperator, argument: Node) -> Node {
    node(NodeKind::UnaryExpression {
        operator,
        argument: Box::new(argument),
    })
}

/// `left op= right`
pub fn assign(operator: AssignmentOperator, left: Node, right: Node) -> Node {
    node(NodeKind::AssignmentExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// `++argument`, `argument--`, ...
pub fn update(operator: UpdateOperator, prefix: bool, argument: Node) -> Node {
    node(NodeKind::UpdateExpression {
        operator,
        prefix,
        argument: Box::new(argument),
    })
}

/// `test ? consequent : alternate`
pub fn cond(test: Node, consequent: Node, alternate: Node) -> Node {
    node(NodeKind::ConditionalExpression {
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: Box::new(alternate),
    })
}

/// `a, b, c`
pub fn seq(expressions: Vec<Node>) -> Node {
    node(NodeKind::SequenceExpression { expressions })
}

/// A node of a kind the evaluator does not support.
pub fn unsupported(kind: &str) -> Node {
    Node::new(NodeKind::Unsupported(kind.to_string()), Span::default())
}
