//! Scope chain behavior through the public API

use hornbeam::ast::build::*;
use hornbeam::ast::AssignmentOperator;
use hornbeam::*;
use pretty_assertions::assert_eq;

// ═══════════════════════════════════════════════════════════════════════
// Declaration and Lookup
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_lookup_walks_outward() {
    let root = Scope::new();
    root.declare(DeclarationKind::Let, "x", Value::Number(1.0));
    let inner = root.child().child();
    assert_eq!(inner.get("x").unwrap(), Value::Number(1.0));
    assert_eq!(inner.depth(), 2);
}

#[test]
fn test_shadowing_is_local() {
    let root = Scope::new();
    root.declare(DeclarationKind::Let, "x", Value::Number(1.0));
    let inner = root.child();
    inner.declare(DeclarationKind::Let, "x", Value::Number(2.0));

    assert_eq!(inner.get("x").unwrap(), Value::Number(2.0));
    assert_eq!(root.get("x").unwrap(), Value::Number(1.0));
}

#[test]
fn test_set_updates_nearest_binding() {
    let root = Scope::new();
    root.declare(DeclarationKind::Let, "x", Value::Number(1.0));
    let inner = root.child();
    inner.set("x", Value::Number(5.0)).unwrap();

    assert_eq!(root.get("x").unwrap(), Value::Number(5.0));
    assert!(!inner.contains_local("x"));
}

#[test]
fn test_set_never_creates() {
    let scope = Scope::new();
    assert_eq!(
        scope.set("missing", Value::Null),
        Err(EnvironmentError::UndefinedVariable {
            name: "missing".to_string()
        })
    );
    assert!(!scope.contains("missing"));
}

#[test]
fn test_const_rejects_writes() {
    let scope = Scope::new();
    scope.declare(DeclarationKind::Const, "k", Value::Number(1.0));
    assert!(matches!(
        scope.set("k", Value::Number(2.0)),
        Err(EnvironmentError::ImmutableBinding { .. })
    ));
    assert_eq!(scope.get("k").unwrap(), Value::Number(1.0));
}

#[test]
fn test_local_names_in_declaration_order() {
    let scope = Scope::new();
    scope.declare(DeclarationKind::Let, "b", Value::Null);
    scope.declare(DeclarationKind::Var, "a", Value::Null);
    assert_eq!(scope.local_names(), vec!["b".to_string(), "a".to_string()]);
    assert_eq!(scope.binding("a").unwrap().kind, DeclarationKind::Var);
}

#[test]
fn test_receiver_from_nearest_function_scope() {
    let root = Scope::with_receiver(Value::from("global"));
    let call = root.child_function(Value::from("method"));
    let block = call.child();

    assert_eq!(block.receiver(), Value::from("method"));
    assert_eq!(root.child().receiver(), Value::from("global"));
    assert!(call.is_function_boundary());
    assert!(!block.is_function_boundary());
}

#[test]
fn test_clones_share_bindings() {
    let scope = Scope::new();
    let alias = scope.clone();
    alias.declare(DeclarationKind::Let, "x", Value::Bool(true));
    assert!(scope.ptr_eq(&alias));
    assert_eq!(scope.get("x").unwrap(), Value::Bool(true));
}

// ═══════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_prelude_bindings() {
    let scope = Scope::with_prelude();
    assert_eq!(scope.get("undefined").unwrap(), Value::Undefined);
    assert_eq!(
        scope.get("Infinity").unwrap(),
        Value::Number(f64::INFINITY)
    );
    assert!(scope.get("print").unwrap().is_callable());
    assert!(scope
        .get("console")
        .unwrap()
        .as_object()
        .unwrap()
        .get("log")
        .is_callable());
}

#[test]
fn test_prelude_constants_are_read_only() {
    let result = evaluate(
        &program(vec![expr_stmt(assign(
            AssignmentOperator::Assign,
            ident("undefined"),
            num(1.0),
        ))]),
        None,
    );
    assert!(matches!(result, Err(EvalError::TypeError { .. })));
}

// ═══════════════════════════════════════════════════════════════════════
// Scopes Created by Evaluation
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_block_scoped_let_in_if() {
    // if (true) { let y = 1; } y
    let result = evaluate(
        &program(vec![
            if_(bool_(true), block(vec![let_("y", num(1.0))]), None),
            expr_stmt(ident("y")),
        ]),
        None,
    );
    assert!(matches!(result, Err(EvalError::NameError { ref name, .. }) if name == "y"));
}

#[test]
fn test_top_level_declarations_land_in_given_scope() {
    let scope = Scope::new();
    evaluate(
        &program(vec![let_("a", num(1.0)), func_decl("f", &[], vec![])]),
        Some(scope.clone()),
    )
    .unwrap();
    assert_eq!(scope.get("a").unwrap(), Value::Number(1.0));
    assert_eq!(scope.binding("f").unwrap().kind, DeclarationKind::Function);
}

#[test]
fn test_function_locals_do_not_escape() {
    let scope = Scope::new();
    evaluate(
        &program(vec![
            func_decl("f", &["p"], vec![let_("local", num(1.0))]),
            expr_stmt(call(ident("f"), vec![num(2.0)])),
        ]),
        Some(scope.clone()),
    )
    .unwrap();
    assert!(!scope.contains("local"));
    assert!(!scope.contains("p"));
}
