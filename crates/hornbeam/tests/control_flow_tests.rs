//! Loops, labels, switch and try/finally

use hornbeam::ast::build::*;
use hornbeam::ast::{AssignmentOperator, BinaryOperator, UpdateOperator, VariableKind};
use hornbeam::*;
use pretty_assertions::assert_eq;

fn eval(body: Vec<Node>) -> Result<Value, EvalError> {
    evaluate(&program(body), None)
}

fn lt(name: &str, n: f64) -> Node {
    binary(BinaryOperator::Lt, ident(name), num(n))
}

fn inc(name: &str) -> Node {
    update(UpdateOperator::Increment, false, ident(name))
}

fn add_to(name: &str, value: Node) -> Node {
    expr_stmt(assign(AssignmentOperator::AddAssign, ident(name), value))
}

fn counted_for(var: &str, limit: f64, body: Vec<Node>) -> Node {
    for_(
        Some(let_(var, num(0.0))),
        Some(lt(var, limit)),
        Some(inc(var)),
        block(body),
    )
}

// ═══════════════════════════════════════════════════════════════════════
// Loops
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_while_loop() {
    let result = eval(vec![
        let_("i", num(0.0)),
        let_("sum", num(0.0)),
        while_(
            lt("i", 5.0),
            block(vec![add_to("sum", ident("i")), expr_stmt(inc("i"))]),
        ),
        expr_stmt(ident("sum")),
    ]);
    assert_eq!(result.unwrap(), Value::Number(10.0));
}

#[test]
fn test_do_while_runs_once() {
    let result = eval(vec![
        let_("runs", num(0.0)),
        do_while(block(vec![expr_stmt(inc("runs"))]), bool_(false)),
        expr_stmt(ident("runs")),
    ]);
    assert_eq!(result.unwrap(), Value::Number(1.0));
}

#[test]
fn test_for_without_clauses_needs_break() {
    let result = eval(vec![
        let_("i", num(0.0)),
        for_(
            None,
            None,
            None,
            block(vec![
                expr_stmt(inc("i")),
                if_(
                    binary(BinaryOperator::StrictEq, ident("i"), num(4.0)),
                    brk(None),
                    None,
                ),
            ]),
        ),
        expr_stmt(ident("i")),
    ]);
    assert_eq!(result.unwrap(), Value::Number(4.0));
}

#[test]
fn test_loop_variable_not_visible_after_loop() {
    let result = eval(vec![counted_for("i", 2.0, vec![]), expr_stmt(ident("i"))]);
    assert!(matches!(result, Err(EvalError::NameError { .. })));
}

#[test]
fn test_var_loop_variable_survives() {
    let result = eval(vec![
        var_("i", num(0.0)),
        for_(None, Some(lt("i", 3.0)), Some(inc("i")), block(vec![])),
        expr_stmt(ident("i")),
    ]);
    assert_eq!(result.unwrap(), Value::Number(3.0));
}

#[test]
fn test_continue_skips_rest_of_body() {
    // for (let i = 0; i < 5; i++) { if (i % 2) continue; sum += i; }
    let result = eval(vec![
        let_("sum", num(0.0)),
        counted_for(
            "i",
            5.0,
            vec![
                if_(
                    binary(BinaryOperator::Rem, ident("i"), num(2.0)),
                    cont(None),
                    None,
                ),
                add_to("sum", ident("i")),
            ],
        ),
        expr_stmt(ident("sum")),
    ]);
    assert_eq!(result.unwrap(), Value::Number(6.0));
}

#[test]
fn test_for_in_over_array_and_object() {
    let result = eval(vec![
        let_("keys", str_("")),
        for_in(
            declare(hornbeam::ast::VariableKind::Let, "k", None),
            array(vec![str_("x"), str_("y")]),
            block(vec![add_to("keys", ident("k"))]),
        ),
        for_in(
            declare(hornbeam::ast::VariableKind::Let, "k", None),
            object(vec![("p", num(1.0)), ("q", num(2.0))]),
            block(vec![add_to("keys", ident("k"))]),
        ),
        expr_stmt(ident("keys")),
    ]);
    assert_eq!(result.unwrap(), Value::from("01pq"));
}

#[test]
fn test_for_in_over_nullish_runs_nothing() {
    let result = eval(vec![
        let_("runs", num(0.0)),
        for_in(
            declare(hornbeam::ast::VariableKind::Let, "k", None),
            null(),
            block(vec![expr_stmt(inc("runs"))]),
        ),
        expr_stmt(ident("runs")),
    ]);
    assert_eq!(result.unwrap(), Value::Number(0.0));
}

// ═══════════════════════════════════════════════════════════════════════
// Per-Iteration Closures
// ═══════════════════════════════════════════════════════════════════════

/// `fns[fns.length] = value;`
fn push_fn(value: Node) -> Node {
    expr_stmt(assign(
        AssignmentOperator::Assign,
        index(ident("fns"), member(ident("fns"), "length")),
        value,
    ))
}

/// `[fns[0](), fns[1](), ...]` for the first `count` entries.
fn call_all(count: usize) -> Node {
    expr_stmt(array(
        (0..count)
            .map(|i| call(index(ident("fns"), num(i as f64)), vec![]))
            .collect(),
    ))
}

fn numbers(values: &[f64]) -> Vec<Value> {
    values.iter().map(|n| Value::Number(*n)).collect()
}

#[test]
fn test_for_in_closures_capture_their_key() {
    // const fns = []; for (const k in { a: 1, b: 2, c: 3 }) { fns[fns.length] = () => k; }
    let result = eval(vec![
        const_("fns", array(vec![])),
        for_in(
            declare(VariableKind::Const, "k", None),
            object(vec![("a", num(1.0)), ("b", num(2.0)), ("c", num(3.0))]),
            block(vec![push_fn(arrow_expr(&[], ident("k")))]),
        ),
        call_all(3),
    ]);
    assert_eq!(
        result.unwrap().as_array().unwrap().to_vec(),
        vec![Value::from("a"), Value::from("b"), Value::from("c")]
    );
}

#[test]
fn test_while_body_let_is_per_iteration() {
    // let i = 0; const fns = [];
    // while (i < 3) { let v = i * 10; fns[fns.length] = () => v; i++; }
    let result = eval(vec![
        let_("i", num(0.0)),
        const_("fns", array(vec![])),
        while_(
            lt("i", 3.0),
            block(vec![
                let_("v", binary(BinaryOperator::Mul, ident("i"), num(10.0))),
                push_fn(arrow_expr(&[], ident("v"))),
                expr_stmt(inc("i")),
            ]),
        ),
        call_all(3),
    ]);
    assert_eq!(
        result.unwrap().as_array().unwrap().to_vec(),
        numbers(&[0.0, 10.0, 20.0])
    );
}

#[test]
fn test_do_while_body_let_is_per_iteration() {
    // let i = 0; const fns = [];
    // do { let v = i; fns[fns.length] = () => v; i++; } while (i < 3);
    let result = eval(vec![
        let_("i", num(0.0)),
        const_("fns", array(vec![])),
        do_while(
            block(vec![
                let_("v", ident("i")),
                push_fn(arrow_expr(&[], ident("v"))),
                expr_stmt(inc("i")),
            ]),
            lt("i", 3.0),
        ),
        call_all(3),
    ]);
    assert_eq!(
        result.unwrap().as_array().unwrap().to_vec(),
        numbers(&[0.0, 1.0, 2.0])
    );
}

#[test]
fn test_closure_created_before_continue_keeps_its_iteration() {
    // const fns = [];
    // for (let i = 0; i < 4; i++) {
    //   fns[fns.length] = () => i;
    //   if (i % 2 === 0) continue;
    //   fns[fns.length] = () => i * 100;
    // }
    let result = eval(vec![
        const_("fns", array(vec![])),
        counted_for(
            "i",
            4.0,
            vec![
                push_fn(arrow_expr(&[], ident("i"))),
                if_(
                    binary(
                        BinaryOperator::StrictEq,
                        binary(BinaryOperator::Rem, ident("i"), num(2.0)),
                        num(0.0),
                    ),
                    cont(None),
                    None,
                ),
                push_fn(arrow_expr(
                    &[],
                    binary(BinaryOperator::Mul, ident("i"), num(100.0)),
                )),
            ],
        ),
        call_all(6),
    ]);
    assert_eq!(
        result.unwrap().as_array().unwrap().to_vec(),
        numbers(&[0.0, 1.0, 100.0, 2.0, 3.0, 300.0])
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Labels
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_unlabeled_break_exits_inner_only() {
    // outer loop runs 3 times, inner breaks immediately each time
    let result = eval(vec![
        let_("outer_runs", num(0.0)),
        counted_for(
            "i",
            3.0,
            vec![
                expr_stmt(inc("outer_runs")),
                counted_for("j", 3.0, vec![brk(None)]),
            ],
        ),
        expr_stmt(ident("outer_runs")),
    ]);
    assert_eq!(result.unwrap(), Value::Number(3.0));
}

#[test]
fn test_labeled_continue_targets_outer() {
    // outer: for (i < 3) { for (j < 3) { if (j == 1) continue outer; n++; } }
    let result = eval(vec![
        let_("n", num(0.0)),
        labeled(
            "outer",
            counted_for(
                "i",
                3.0,
                vec![counted_for(
                    "j",
                    3.0,
                    vec![
                        if_(
                            binary(BinaryOperator::LooseEq, ident("j"), num(1.0)),
                            cont(Some("outer")),
                            None,
                        ),
                        expr_stmt(inc("n")),
                    ],
                )],
            ),
        ),
        expr_stmt(ident("n")),
    ]);
    assert_eq!(result.unwrap(), Value::Number(3.0));
}

#[test]
fn test_labeled_break_leaves_unrelated_loop_running() {
    // for (i < 2) { inner: for (j < 5) { break inner; } total++; }
    let result = eval(vec![
        let_("total", num(0.0)),
        counted_for(
            "i",
            2.0,
            vec![
                labeled("inner", counted_for("j", 5.0, vec![brk(Some("inner"))])),
                expr_stmt(inc("total")),
            ],
        ),
        expr_stmt(ident("total")),
    ]);
    assert_eq!(result.unwrap(), Value::Number(2.0));
}

#[test]
fn test_labeled_block_break() {
    // done: { x = 1; break done; x = 2; }
    let result = eval(vec![
        let_("x", num(0.0)),
        labeled(
            "done",
            block(vec![
                expr_stmt(assign(AssignmentOperator::Assign, ident("x"), num(1.0))),
                brk(Some("done")),
                expr_stmt(assign(AssignmentOperator::Assign, ident("x"), num(2.0))),
            ]),
        ),
        expr_stmt(ident("x")),
    ]);
    assert_eq!(result.unwrap(), Value::Number(1.0));
}

#[test]
fn test_break_outside_loop() {
    assert!(matches!(
        eval(vec![brk(None)]),
        Err(EvalError::BreakOutsideLoop { label: None })
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// Switch
// ═══════════════════════════════════════════════════════════════════════

fn switch_program(discriminant: Node, cases: Vec<hornbeam::ast::SwitchCase>) -> Vec<Node> {
    vec![
        let_("out", str_("")),
        switch(discriminant, cases),
        expr_stmt(ident("out")),
    ]
}

#[test]
fn test_switch_uses_strict_equality() {
    let result = eval(switch_program(
        str_("1"),
        vec![
            case(num(1.0), vec![add_to("out", str_("number")), brk(None)]),
            case(str_("1"), vec![add_to("out", str_("string")), brk(None)]),
        ],
    ));
    assert_eq!(result.unwrap(), Value::from("string"));
}

#[test]
fn test_switch_default_when_nothing_matches() {
    let result = eval(switch_program(
        num(9.0),
        vec![
            case(num(1.0), vec![add_to("out", str_("a"))]),
            default_case(vec![add_to("out", str_("d"))]),
            case(num(2.0), vec![add_to("out", str_("b"))]),
        ],
    ));
    assert_eq!(result.unwrap(), Value::from("db"));
}

#[test]
fn test_switch_without_match_or_default() {
    let result = eval(switch_program(
        num(9.0),
        vec![case(num(1.0), vec![add_to("out", str_("a"))])],
    ));
    assert_eq!(result.unwrap(), Value::from(""));
}

#[test]
fn test_switch_break_inside_loop_only_exits_switch() {
    let result = eval(vec![
        let_("n", num(0.0)),
        counted_for(
            "i",
            3.0,
            vec![
                switch(ident("i"), vec![default_case(vec![brk(None)])]),
                expr_stmt(inc("n")),
            ],
        ),
        expr_stmt(ident("n")),
    ]);
    assert_eq!(result.unwrap(), Value::Number(3.0));
}

// ═══════════════════════════════════════════════════════════════════════
// Try / Catch / Finally
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_finalizer_runs_once_without_failure() {
    let result = eval(vec![
        let_("runs", num(0.0)),
        try_(block(vec![]), None, Some(block(vec![expr_stmt(inc("runs"))]))),
        expr_stmt(ident("runs")),
    ]);
    assert_eq!(result.unwrap(), Value::Number(1.0));
}

#[test]
fn test_finalizer_runs_once_with_failure() {
    let result = eval(vec![
        let_("runs", num(0.0)),
        try_(
            block(vec![throw(str_("boom"))]),
            Some((Some("e"), block(vec![]))),
            Some(block(vec![expr_stmt(inc("runs"))])),
        ),
        expr_stmt(ident("runs")),
    ]);
    assert_eq!(result.unwrap(), Value::Number(1.0));
}

#[test]
fn test_uncaught_failure_still_runs_finalizer() {
    let scope = Scope::with_prelude();
    scope.declare(DeclarationKind::Let, "runs", Value::Number(0.0));
    let result = evaluate(
        &program(vec![try_(
            block(vec![throw(num(1.0))]),
            None,
            Some(block(vec![expr_stmt(inc("runs"))])),
        )]),
        Some(scope.clone()),
    );
    assert!(matches!(result, Err(EvalError::Thrown(Value::Number(n))) if n == 1.0));
    assert_eq!(scope.get("runs").unwrap(), Value::Number(1.0));
}

#[test]
fn test_caught_value_is_what_was_thrown() {
    let obj = Value::object([("code", Value::Number(7.0))]);
    let scope = Scope::with_prelude();
    scope.declare(DeclarationKind::Const, "payload", obj.clone());
    let result = evaluate(
        &program(vec![
            let_("seen", null()),
            try_(
                block(vec![throw(ident("payload"))]),
                Some((
                    Some("e"),
                    block(vec![expr_stmt(assign(
                        AssignmentOperator::Assign,
                        ident("seen"),
                        ident("e"),
                    ))]),
                )),
                None,
            ),
            expr_stmt(ident("seen")),
        ]),
        Some(scope),
    )
    .unwrap();
    assert_eq!(result, obj);
}

#[test]
fn test_guarded_block_result_is_discarded() {
    let result = eval(vec![try_(block(vec![expr_stmt(num(1.0))]), None, None)]);
    assert_eq!(result.unwrap(), Value::Undefined);
}

#[test]
fn test_return_from_try_runs_finalizer() {
    // function f() { try { return 1; } finally { runs++; } }  [f(), runs]
    let result = eval(vec![
        let_("runs", num(0.0)),
        func_decl(
            "f",
            &[],
            vec![try_(
                block(vec![ret(Some(num(1.0)))]),
                None,
                Some(block(vec![expr_stmt(inc("runs"))])),
            )],
        ),
        expr_stmt(array(vec![call(ident("f"), vec![]), ident("runs")])),
    ]);
    assert_eq!(
        result.unwrap().as_array().unwrap().to_vec(),
        vec![Value::Number(1.0), Value::Number(1.0)]
    );
}

#[test]
fn test_finalizer_return_overrides() {
    // function f() { try { throw 1; } finally { return 2; } } f()
    let result = eval(vec![
        func_decl(
            "f",
            &[],
            vec![try_(
                block(vec![throw(num(1.0))]),
                None,
                Some(block(vec![ret(Some(num(2.0)))])),
            )],
        ),
        expr_stmt(call(ident("f"), vec![])),
    ]);
    assert_eq!(result.unwrap(), Value::Number(2.0));
}

#[test]
fn test_break_passes_through_catch() {
    // for (;;) { try { break; } catch (e) { caught = true; } } caught
    let result = eval(vec![
        let_("caught", bool_(false)),
        for_(
            None,
            None,
            None,
            block(vec![try_(
                block(vec![brk(None)]),
                Some((
                    Some("e"),
                    block(vec![expr_stmt(assign(
                        AssignmentOperator::Assign,
                        ident("caught"),
                        bool_(true),
                    ))]),
                )),
                None,
            )]),
        ),
        expr_stmt(ident("caught")),
    ]);
    assert_eq!(result.unwrap(), Value::Bool(false));
}
