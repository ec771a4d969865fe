//! Evaluating acorn-shaped ESTree JSON

use hornbeam::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn ident(name: &str, start: usize, end: usize) -> serde_json::Value {
    json!({ "type": "Identifier", "start": start, "end": end, "name": name })
}

fn number(n: f64) -> serde_json::Value {
    json!({ "type": "Literal", "value": n, "raw": n.to_string() })
}

fn run(tree: serde_json::Value) -> Result<Value, EvalError> {
    Evaluator::new().evaluate_json(&tree.to_string(), None)
}

#[test]
fn test_function_reading_outer_binding() {
    // let x = 1; function f(){ return x + 1; } f();
    let tree = json!({
        "type": "Program",
        "start": 0,
        "end": 42,
        "sourceType": "script",
        "body": [
            {
                "type": "VariableDeclaration",
                "kind": "let",
                "declarations": [{
                    "type": "VariableDeclarator",
                    "id": ident("x", 4, 5),
                    "init": number(1.0)
                }]
            },
            {
                "type": "FunctionDeclaration",
                "id": ident("f", 20, 21),
                "expression": false,
                "generator": false,
                "async": false,
                "params": [],
                "body": {
                    "type": "BlockStatement",
                    "body": [{
                        "type": "ReturnStatement",
                        "argument": {
                            "type": "BinaryExpression",
                            "operator": "+",
                            "left": ident("x", 32, 33),
                            "right": number(1.0)
                        }
                    }]
                }
            },
            {
                "type": "ExpressionStatement",
                "expression": {
                    "type": "CallExpression",
                    "callee": ident("f", 38, 39),
                    "arguments": [],
                    "optional": false
                }
            }
        ]
    });
    assert_eq!(run(tree).unwrap(), Value::Number(2.0));
}

#[test]
fn test_operators_decode_from_symbols() {
    // let s = 0; s += 2 ** 3; s >>>= 1; s
    let tree = json!({
        "type": "Program",
        "body": [
            {
                "type": "VariableDeclaration",
                "kind": "let",
                "declarations": [{
                    "type": "VariableDeclarator",
                    "id": ident("s", 0, 0),
                    "init": number(0.0)
                }]
            },
            {
                "type": "ExpressionStatement",
                "expression": {
                    "type": "AssignmentExpression",
                    "operator": "+=",
                    "left": ident("s", 0, 0),
                    "right": {
                        "type": "BinaryExpression",
                        "operator": "**",
                        "left": number(2.0),
                        "right": number(3.0)
                    }
                }
            },
            {
                "type": "ExpressionStatement",
                "expression": {
                    "type": "AssignmentExpression",
                    "operator": ">>>=",
                    "left": ident("s", 0, 0),
                    "right": number(1.0)
                }
            },
            { "type": "ExpressionStatement", "expression": ident("s", 0, 0) }
        ]
    });
    assert_eq!(run(tree).unwrap(), Value::Number(4.0));
}

#[test]
fn test_null_literal_and_logical() {
    // null ?? "default"
    let tree = json!({
        "type": "Program",
        "body": [{
            "type": "ExpressionStatement",
            "expression": {
                "type": "LogicalExpression",
                "operator": "??",
                "left": { "type": "Literal", "value": null, "raw": "null" },
                "right": { "type": "Literal", "value": "default", "raw": "\"default\"" }
            }
        }]
    });
    assert_eq!(run(tree).unwrap(), Value::from("default"));
}

#[test]
fn test_try_catch_decodes_and_runs() {
    // try { throw "boom"; } catch (e) { e + "!" }
    let tree = json!({
        "type": "Program",
        "body": [{
            "type": "TryStatement",
            "block": {
                "type": "BlockStatement",
                "body": [{
                    "type": "ThrowStatement",
                    "argument": { "type": "Literal", "value": "boom", "raw": "\"boom\"" }
                }]
            },
            "handler": {
                "type": "CatchClause",
                "param": ident("e", 0, 0),
                "body": {
                    "type": "BlockStatement",
                    "body": [{
                        "type": "ExpressionStatement",
                        "expression": {
                            "type": "BinaryExpression",
                            "operator": "+",
                            "left": ident("e", 0, 0),
                            "right": { "type": "Literal", "value": "!", "raw": "\"!\"" }
                        }
                    }]
                }
            },
            "finalizer": null
        }]
    });
    assert_eq!(run(tree).unwrap(), Value::from("boom!"));
}

#[test]
fn test_unknown_kind_reports_name_and_span() {
    // class A {}
    let tree = json!({
        "type": "Program",
        "body": [{
            "type": "ClassDeclaration",
            "start": 0,
            "end": 10,
            "id": ident("A", 6, 7),
            "superClass": null,
            "body": { "type": "ClassBody", "body": [] }
        }]
    });
    let err = run(tree).unwrap_err();
    assert!(matches!(
        &err,
        EvalError::UnsupportedSyntax { kind, span } if kind == "ClassDeclaration" && *span == Span::new(0, 10)
    ));
    assert_eq!(err.to_string(), "unsupported syntax: ClassDeclaration at 0:10");
}

#[test]
fn test_unsupported_variants_of_known_kinds() {
    // function* g() {}
    let generator = json!({
        "type": "Program",
        "body": [{
            "type": "FunctionDeclaration",
            "start": 0,
            "end": 16,
            "id": ident("g", 10, 11),
            "generator": true,
            "async": false,
            "params": [],
            "body": { "type": "BlockStatement", "body": [] }
        }]
    });
    assert!(matches!(
        run(generator),
        Err(EvalError::UnsupportedSyntax { ref kind, .. }) if kind == "FunctionDeclaration"
    ));

    // /ab/
    let regex = json!({
        "type": "Program",
        "body": [{
            "type": "ExpressionStatement",
            "expression": {
                "type": "Literal",
                "value": {},
                "raw": "/ab/",
                "regex": { "pattern": "ab", "flags": "" }
            }
        }]
    });
    assert!(matches!(
        run(regex),
        Err(EvalError::UnsupportedSyntax { ref kind, .. }) if kind == "Literal"
    ));
}

#[test]
fn test_source_text_names_the_callee() {
    let source = "const n = 5;\nn();";
    let tree = json!({
        "type": "Program",
        "start": 0,
        "end": 17,
        "body": [
            {
                "type": "VariableDeclaration",
                "start": 0,
                "end": 12,
                "kind": "const",
                "declarations": [{
                    "type": "VariableDeclarator",
                    "id": ident("n", 6, 7),
                    "init": number(5.0)
                }]
            },
            {
                "type": "ExpressionStatement",
                "start": 13,
                "end": 17,
                "expression": {
                    "type": "CallExpression",
                    "start": 13,
                    "end": 16,
                    "callee": ident("n", 13, 14),
                    "arguments": []
                }
            }
        ]
    });
    let result = Evaluator::new()
        .with_source(source)
        .evaluate_json(&tree.to_string(), None);
    assert!(matches!(
        result,
        Err(EvalError::TypeError { ref message, span: Some(span) })
            if message == "n is not a function" && span == Span::new(13, 16)
    ));
}

#[test]
fn test_function_prints_its_source() {
    let source = "const f = function () { return 1; };";
    let tree = json!({
        "type": "Program",
        "body": [
            {
                "type": "VariableDeclaration",
                "kind": "const",
                "declarations": [{
                    "type": "VariableDeclarator",
                    "id": ident("f", 6, 7),
                    "init": {
                        "type": "FunctionExpression",
                        "start": 10,
                        "end": 35,
                        "id": null,
                        "expression": false,
                        "generator": false,
                        "async": false,
                        "params": [],
                        "body": {
                            "type": "BlockStatement",
                            "body": [{ "type": "ReturnStatement", "argument": number(1.0) }]
                        }
                    }
                }]
            },
            { "type": "ExpressionStatement", "expression": ident("f", 0, 0) }
        ]
    });
    let value = Evaluator::new()
        .with_source(source)
        .evaluate_json(&tree.to_string(), None)
        .unwrap();
    assert_eq!(value.to_string(), "function () { return 1; }");
}

#[test]
fn test_malformed_tree() {
    assert!(matches!(
        Evaluator::new().evaluate_json("{ \"body\": [] }", None),
        Err(EvalError::InvalidTree(_))
    ));
    assert!(matches!(
        Evaluator::new().evaluate_json("not json", None),
        Err(EvalError::InvalidTree(_))
    ));
}
