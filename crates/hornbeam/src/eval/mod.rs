//! Node evaluation

pub mod array;
pub mod assign;
pub mod binary;
pub mod call;
pub mod field;
pub mod function;
pub mod if_expr;
pub mod literal;
pub mod loops;
pub mod object;
pub mod reference;
pub mod stmt;
pub mod switch;
pub mod try_stmt;
pub mod unary;

use tracing::trace;

use crate::ast::{Node, NodeKind};
use crate::{EvalContext, EvalError, InterruptSignal, Scope, Value};

/// Trait for evaluating syntax tree nodes to values.
///
/// This is the core abstraction for the tree-walking interpreter.
/// Control-flow signals come back as `Err(EvalError::Interrupt(..))`.
pub trait Evaluate {
    /// Evaluate this node in the given scope.
    fn eval(&self, scope: &Scope, ctx: &EvalContext) -> Result<Value, EvalError>;
}

impl Evaluate for Node {
    fn eval(&self, scope: &Scope, ctx: &EvalContext) -> Result<Value, EvalError> {
        eval_node(self, scope, ctx, EvalOptions::default())
    }
}

/// Per-evaluation options threaded from a parent node to a child.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalOptions<'a> {
    /// Label of the enclosing labeled statement, consulted by loops
    pub label: Option<&'a str>,
}

// ═══════════════════════════════════════════════════════════════════════
// Main Node Dispatcher
// ═══════════════════════════════════════════════════════════════════════

/// Evaluate `node` with explicit options.
pub fn eval_node(
    node: &Node,
    scope: &Scope,
    ctx: &EvalContext,
    options: EvalOptions<'_>,
) -> Result<Value, EvalError> {
    // Check for interruption before each node
    if ctx.is_interrupted() {
        return Err(EvalError::Interrupted);
    }

    if ctx.trace {
        trace!(kind = node.kind_name(), span = %node.span, "eval");
    }

    match &node.kind {
        // Statements
        NodeKind::Program { body } => stmt::eval_program(body, scope, ctx),
        NodeKind::EmptyStatement => Ok(Value::Undefined),
        NodeKind::ExpressionStatement { expression } => expression.eval(scope, ctx),
        NodeKind::BlockStatement { body } => stmt::eval_block(body, scope, ctx),
        NodeKind::VariableDeclaration { kind, declarations } => {
            stmt::eval_variable_declaration(*kind, declarations, scope, ctx)
        }
        NodeKind::FunctionDeclaration(function) => {
            function::eval_function_declaration(function, node, scope, ctx)
        }
        NodeKind::ReturnStatement { argument } => {
            stmt::eval_return(argument.as_deref(), scope, ctx)
        }
        NodeKind::IfStatement {
            test,
            consequent,
            alternate,
        } => if_expr::eval_if(test, consequent, alternate.as_deref(), scope, ctx),
        NodeKind::SwitchStatement {
            discriminant,
            cases,
        } => switch::eval_switch(discriminant, cases, scope, ctx),
        NodeKind::WhileStatement { test, body } => {
            loops::eval_while(test, body, scope, ctx, options.label)
        }
        NodeKind::DoWhileStatement { body, test } => {
            loops::eval_do_while(body, test, scope, ctx, options.label)
        }
        NodeKind::ForStatement {
            init,
            test,
            update,
            body,
        } => loops::eval_for(
            init.as_deref(),
            test.as_deref(),
            update.as_deref(),
            body,
            scope,
            ctx,
            options.label,
        ),
        NodeKind::ForInStatement { left, right, body } => {
            loops::eval_for_in(left, right, body, scope, ctx, options.label)
        }
        NodeKind::BreakStatement { label } => Err(InterruptSignal::Break(
            label.as_ref().map(|l| l.name.clone()),
        )
        .into()),
        NodeKind::ContinueStatement { label } => Err(InterruptSignal::Continue(
            label.as_ref().map(|l| l.name.clone()),
        )
        .into()),
        NodeKind::LabeledStatement { label, body } => {
            stmt::eval_labeled(&label.name, body, scope, ctx)
        }
        NodeKind::ThrowStatement { argument } => stmt::eval_throw(argument, scope, ctx),
        NodeKind::TryStatement {
            block,
            handler,
            finalizer,
        } => try_stmt::eval_try(block, handler.as_deref(), finalizer.as_deref(), scope, ctx),

        // Expressions
        NodeKind::Identifier { name } => scope
            .get(name)
            .map_err(|err| EvalError::from(err).with_span(node.span)),
        NodeKind::Literal {
            value,
            regex,
            bigint,
        } => literal::eval_literal(node, value.as_ref(), regex.is_some() || bigint.is_some()),
        NodeKind::ThisExpression => Ok(scope.receiver()),
        NodeKind::ArrayExpression { elements } => array::eval_array(elements, scope, ctx),
        NodeKind::ObjectExpression { properties } => {
            object::eval_object(properties, scope, ctx)
        }
        NodeKind::FunctionExpression(function) => {
            function::create_closure(function, node, scope, ctx, false).map(Value::Function)
        }
        NodeKind::ArrowFunctionExpression(function) => {
            function::create_closure(function, node, scope, ctx, true).map(Value::Function)
        }
        NodeKind::UnaryExpression { operator, argument } => {
            unary::eval_unary(*operator, argument, node, scope, ctx)
        }
        NodeKind::UpdateExpression {
            operator,
            prefix,
            argument,
        } => assign::eval_update(*operator, *prefix, argument, node, scope, ctx),
        NodeKind::BinaryExpression {
            operator,
            left,
            right,
        } => binary::eval_binary(*operator, left, right, node, scope, ctx),
        NodeKind::LogicalExpression {
            operator,
            left,
            right,
        } => binary::eval_logical(*operator, left, right, scope, ctx),
        NodeKind::AssignmentExpression {
            operator,
            left,
            right,
        } => assign::eval_assignment(*operator, left, right, node, scope, ctx),
        NodeKind::ConditionalExpression {
            test,
            consequent,
            alternate,
        } => if_expr::eval_conditional(test, consequent, alternate, scope, ctx),
        NodeKind::CallExpression { callee, arguments } => {
            call::eval_call(callee, arguments, node, scope, ctx)
        }
        NodeKind::NewExpression { callee, arguments } => {
            call::eval_new(callee, arguments, node, scope, ctx)
        }
        NodeKind::MemberExpression {
            object,
            property,
            computed,
        } => field::eval_member(object, property, *computed, node, scope, ctx),
        NodeKind::SequenceExpression { expressions } => {
            let mut last = Value::Undefined;
            for expression in expressions {
                last = expression.eval(scope, ctx)?;
            }
            Ok(last)
        }

        // Properties only appear inside object literals
        NodeKind::Property { .. } | NodeKind::Unsupported(_) | NodeKind::Unrecognized => {
            Err(unsupported(node))
        }
    }
}

/// Create an "unsupported syntax" error for `node`.
pub fn unsupported(node: &Node) -> EvalError {
    EvalError::UnsupportedSyntax {
        kind: node.kind_name().to_string(),
        span: node.span,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Convenience Functions
// ═══════════════════════════════════════════════════════════════════════

/// Evaluate a node (convenience wrapper).
pub fn eval_expr(node: &Node, scope: &Scope, ctx: &EvalContext) -> Result<Value, EvalError> {
    node.eval(scope, ctx)
}

pub use call::call_value;
pub use stmt::eval_block;
