//! End-to-end plan behavior through the row-oriented entry point.

mod common;

use common::*;
use planbridge::ErrorCode;
use planbridge::plan::builder::*;
use planbridge::plan::{DataType, Expr, PlanBuilder};
use polars::prelude::{IpcReader, SerReader};
use serde_json::{Value, json};

#[test]
fn project_keeps_rows_in_order() {
    let out = run(
        PlanBuilder::memory_scan(&[]).select(vec![col("name"), col("age")]),
        &people(),
    )
    .unwrap();
    assert_eq!(out, people());
    assert_eq!(keys(&out[0]), ["name", "age"]);
}

#[test]
fn project_reorders_and_renames() {
    let out = run(
        PlanBuilder::memory_scan(&[]).select(vec![alias(col("age"), "years"), col("name")]),
        &people(),
    )
    .unwrap();
    assert_eq!(keys(&out[0]), ["years", "name"]);
    assert_eq!(out[1], json!({"years": 30, "name": "Bob"}));
}

#[test]
fn filter_then_limit() {
    let out = run(
        PlanBuilder::memory_scan(&[])
            .filter(gt(col("age"), lit_i64(28)))
            .limit(1),
        &people(),
    )
    .unwrap();
    assert_eq!(out, vec![json!({"name": "Bob", "age": 30})]);
}

#[test]
fn non_strict_cast_yields_null() {
    let out = run(
        PlanBuilder::memory_scan(&[]).select(vec![alias(cast(col("v"), DataType::Int8), "v")]),
        &[json!({"v": 200})],
    )
    .unwrap();
    assert_eq!(out, vec![json!({"v": null})]);
}

#[test]
fn strict_cast_is_an_execution_error() {
    let err = run(
        PlanBuilder::memory_scan(&[]).select(vec![strict_cast(col("v"), DataType::Int8)]),
        &[json!({"v": 200})],
    )
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::Execution);
    assert!(err.message.starts_with("[ERR_EXECUTION]"));
}

#[test]
fn strict_cast_of_representable_values_succeeds() {
    let out = run(
        PlanBuilder::memory_scan(&[]).select(vec![strict_cast(col("v"), DataType::Int8)]),
        &[json!({"v": 100}), json!({"v": null})],
    )
    .unwrap();
    assert_eq!(out, vec![json!({"v": 100}), json!({"v": null})]);
}

#[test]
fn limit_zero_keeps_schema() {
    let handle = compile(&PlanBuilder::memory_scan(&[]).limit(0).encode());
    let input = json!([
        {"name": "age", "values": [25, 30]},
        {"name": "name", "values": ["Alice", "Bob"]},
    ]);
    let frame = frame_from_columns(&input).unwrap();
    let mut out = 0u64;
    let status = planbridge::planbridge_plan_collect_dataframe(handle, frame, &mut out);
    assert_eq!(status, 0, "{}", last_error());
    assert!(frame_rows(out).unwrap().is_empty());

    let ipc = frame_ipc(out).unwrap();
    let df = IpcReader::new(std::io::Cursor::new(ipc))
        .finish()
        .unwrap();
    assert_eq!(df.height(), 0);
    assert_eq!(df.get_column_names_str(), ["age", "name"]);

    for h in [out, frame] {
        planbridge::planbridge_dataframe_free(h);
    }
    planbridge::planbridge_plan_free(handle);
}

#[test]
fn limit_beyond_row_count_is_identity() {
    for n in [2, 3, u64::MAX] {
        let out = run(PlanBuilder::memory_scan(&[]).limit(n), &people()).unwrap();
        assert_eq!(out, people());
    }
}

#[test]
fn filter_selecting_nothing_keeps_schema() {
    let handle = compile(
        &PlanBuilder::memory_scan(&[])
            .filter(gt(col("age"), lit_i64(100)))
            .encode(),
    );
    let frame = frame_from_columns(&json!([
        {"name": "name", "values": ["Alice", "Bob"]},
        {"name": "age", "values": [25, 30]},
    ]))
    .unwrap();
    let mut out = 0u64;
    assert_eq!(
        planbridge::planbridge_plan_collect_dataframe(handle, frame, &mut out),
        0
    );
    let df = IpcReader::new(std::io::Cursor::new(frame_ipc(out).unwrap()))
        .finish()
        .unwrap();
    assert_eq!(df.height(), 0);
    assert_eq!(df.get_column_names_str(), ["name", "age"]);
    planbridge::planbridge_dataframe_free(out);
    planbridge::planbridge_dataframe_free(frame);
    planbridge::planbridge_plan_free(handle);
}

#[test]
fn null_predicate_excludes_row() {
    let out = run(
        PlanBuilder::memory_scan(&[]).filter(gt(col("age"), lit_i64(20))),
        &[
            json!({"name": "Alice", "age": 25}),
            json!({"name": "Nobody", "age": null}),
        ],
    )
    .unwrap();
    assert_eq!(out, vec![json!({"name": "Alice", "age": 25})]);
}

#[test]
fn with_columns_appends_and_replaces() {
    let out = run(
        PlanBuilder::memory_scan(&[]).with_columns(vec![
            alias(add(col("age"), lit_i64(1)), "age"),
            alias(is_null(col("name")), "missing"),
        ]),
        &people(),
    )
    .unwrap();
    assert_eq!(keys(&out[0]), ["name", "age", "missing"]);
    assert_eq!(out[0], json!({"name": "Alice", "age": 26, "missing": false}));
}

#[test]
fn memory_scan_projects_named_columns() {
    let out = run(PlanBuilder::memory_scan(&["age"]), &people()).unwrap();
    assert_eq!(out, vec![json!({"age": 25}), json!({"age": 30})]);
}

#[test]
fn boolean_logic_and_arithmetic() {
    let out = run(
        PlanBuilder::memory_scan(&[])
            .filter(or_(
                eq(col("name"), lit_str("Alice")),
                and_(ge(col("age"), lit_i64(30)), not_(is_null(col("name")))),
            ))
            .select(vec![
                col("name"),
                alias(mul(col("age"), lit_i64(2)), "double"),
                alias(modulo(col("age"), lit_i64(7)), "rem"),
            ]),
        &people(),
    )
    .unwrap();
    assert_eq!(
        out,
        vec![
            json!({"name": "Alice", "double": 50, "rem": 4}),
            json!({"name": "Bob", "double": 60, "rem": 2}),
        ]
    );
}

#[test]
fn wildcard_selects_everything() {
    let out = run(PlanBuilder::memory_scan(&[]).select(vec![wildcard()]), &people()).unwrap();
    assert_eq!(out, people());
}

#[test]
fn memory_scan_without_input_fails() {
    let err = run(PlanBuilder::memory_scan(&[]).limit(1), &[]).unwrap_err();
    assert_eq!(err.code, ErrorCode::Execution);
    assert!(err.message.contains("none was provided"));
}

#[test]
fn every_binary_operator() {
    let age = || col("age");
    let cases: Vec<(&str, Expr, [Value; 2])> = vec![
        ("add", add(age(), lit_i64(1)), [json!(26), json!(31)]),
        ("sub", sub(age(), lit_i64(5)), [json!(20), json!(25)]),
        ("mul", mul(age(), lit_i64(2)), [json!(50), json!(60)]),
        ("div", div(age(), lit_i64(5)), [json!(5), json!(6)]),
        ("mod", modulo(age(), lit_i64(7)), [json!(4), json!(2)]),
        ("pow", pow(age(), lit_i64(2)), [json!(625), json!(900)]),
        ("eq", eq(age(), lit_i64(30)), [json!(false), json!(true)]),
        ("ne", ne(age(), lit_i64(30)), [json!(true), json!(false)]),
        ("lt", lt(age(), lit_i64(30)), [json!(true), json!(false)]),
        ("le", le(age(), lit_i64(30)), [json!(true), json!(true)]),
        ("gt", gt(age(), lit_i64(25)), [json!(false), json!(true)]),
        ("ge", ge(age(), lit_i64(30)), [json!(false), json!(true)]),
        (
            "and",
            and_(gt(age(), lit_i64(20)), lt(age(), lit_i64(28))),
            [json!(true), json!(false)],
        ),
        (
            "or",
            or_(lt(age(), lit_i64(20)), gt(age(), lit_i64(28))),
            [json!(false), json!(true)],
        ),
        (
            "xor",
            xor(gt(age(), lit_i64(20)), gt(age(), lit_i64(28))),
            [json!(true), json!(false)],
        ),
    ];
    for (name, e, expected) in cases {
        let out = run(
            PlanBuilder::memory_scan(&[]).select(vec![alias(e, "out")]),
            &people(),
        )
        .unwrap_or_else(|f| panic!("{name}: {f:?}"));
        let got: Vec<Value> = out.iter().map(|r| r["out"].clone()).collect();
        assert_eq!(got, expected, "{name}");
    }
}

#[test]
fn integer_division_by_zero_is_null() {
    let out = run(
        PlanBuilder::memory_scan(&[]).select(vec![alias(div(col("age"), lit_i64(0)), "q")]),
        &people(),
    )
    .unwrap();
    assert_eq!(out, vec![json!({"q": null}), json!({"q": null})]);
}

#[test]
fn comparing_string_with_number_is_semantic() {
    let err = run(
        PlanBuilder::memory_scan(&[]).filter(gt(col("name"), lit_i64(28))),
        &people(),
    )
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::PlanSemantic, "{}", err.message);
    assert!(err.message.starts_with("[ERR_PLAN_SEMANTIC]"), "{}", err.message);
}

#[test]
fn empty_projection_keeps_one_row_per_input_row() {
    let out = run(PlanBuilder::memory_scan(&[]).select(vec![]), &people()).unwrap();
    assert_eq!(out, vec![json!({}), json!({})]);
}
