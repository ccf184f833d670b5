//! Error codes, the per-thread diagnostic channel and argument checking.

mod common;

use std::ffi::c_char;
use std::ptr;
use std::sync::{Arc, Barrier};
use std::thread;

use common::*;
use planbridge::plan::builder::*;
use planbridge::plan::{DataType, PlanBuilder};
use planbridge::*;
use serde_json::json;

fn assert_failure(result: Result<impl std::fmt::Debug, Failure>, code: ErrorCode) -> String {
    let err = result.expect_err("call should fail");
    assert_eq!(err.code, code, "{}", err.message);
    assert!(
        err.message.starts_with(&format!("[{}]", code.name())),
        "{}",
        err.message
    );
    err.message
}

#[test]
fn garbage_bytes_are_decode_errors() {
    assert_failure(try_compile(&[0xff, 0xff, 0xff, 0xff]), ErrorCode::PlanDecode);
    assert_failure(try_compile(&[]), ErrorCode::PlanDecode);
}

#[test]
fn out_of_range_version_is_rejected_before_interpretation() {
    let mut bytes = PlanBuilder::memory_scan(&[]).encode();
    // Field 1 (plan_version) is the first varint.
    assert_eq!(&bytes[..2], &[0x08u8, 0x01]);
    bytes[1] = 0x02;
    let msg = assert_failure(try_compile(&bytes), ErrorCode::PlanVersionUnsupported);
    assert!(msg.contains("plan version 2"));

    bytes[1] = 0x00;
    assert_failure(try_compile(&bytes), ErrorCode::PlanVersionUnsupported);
}

#[test]
fn unknown_node_tag_is_unsupported() {
    // plan_version 1, root { id 1, <field 55: empty message> }
    let bytes = [0x08, 0x01, 0x12, 5, 0x08, 0x01, 0xba, 0x03, 0x00];
    assert_failure(try_compile(&bytes), ErrorCode::Unsupported);
}

#[test]
fn invalid_plans_fail_at_compile_time() {
    let unspecified_cast = PlanBuilder::memory_scan(&[])
        .select(vec![cast(col("a"), DataType::Unspecified)])
        .encode();
    assert_failure(try_compile(&unspecified_cast), ErrorCode::Unsupported);

    let empty_alias = PlanBuilder::memory_scan(&[])
        .select(vec![alias(col("a"), "")])
        .encode();
    assert_failure(try_compile(&empty_alias), ErrorCode::PlanSemantic);

    let bad_fill = PlanBuilder::memory_scan(&[])
        .select(vec![str_pad_start(col("a"), 5, "ab")])
        .encode();
    assert_failure(try_compile(&bad_fill), ErrorCode::PlanSemantic);
}

#[test]
fn unknown_column_is_semantic() {
    let msg = assert_failure(
        run(
            PlanBuilder::memory_scan(&[]).select(vec![col("salary")]),
            &people(),
        ),
        ErrorCode::PlanSemantic,
    );
    assert!(msg.contains("salary"));
}

#[test]
fn stale_handle_is_invalid_argument() {
    let handle = compile(&PlanBuilder::memory_scan(&[]).encode());
    planbridge_plan_free(handle);
    let msg = assert_failure(try_execute_rows(handle, &people()), ErrorCode::InvalidArgument);
    assert!(msg.len() > "[ERR_INVALID_ARGUMENT]".len());

    assert_failure(try_execute_rows(0, &people()), ErrorCode::InvalidArgument);
    assert_failure(try_execute_rows(987_654_321, &people()), ErrorCode::InvalidArgument);
}

#[test]
fn null_out_pointers_are_invalid_arguments() {
    let bytes = PlanBuilder::memory_scan(&[]).encode();
    let status = planbridge_plan_compile(bytes.as_ptr(), bytes.len(), ptr::null_mut());
    assert_eq!(ErrorCode::from_status(status), ErrorCode::InvalidArgument);
    assert!(last_error().contains("out_handle"));

    let status = planbridge_plan_compile(ptr::null(), 4, &mut 0u64);
    assert_eq!(ErrorCode::from_status(status), ErrorCode::InvalidArgument);

    let mut len = 0usize;
    let status = planbridge_engine_version(ptr::null_mut(), &mut len);
    assert_eq!(ErrorCode::from_status(status), ErrorCode::InvalidArgument);

    let handle = compile(&bytes);
    let mut out: *mut u8 = ptr::null_mut();
    let status = planbridge_plan_execute_simple(handle, ptr::null(), 0, &mut out, ptr::null_mut());
    assert_eq!(ErrorCode::from_status(status), ErrorCode::InvalidArgument);
    assert!(out.is_null());
    planbridge_plan_free(handle);
}

#[test]
fn malformed_inputs_are_invalid_arguments() {
    let handle = compile(&PlanBuilder::memory_scan(&[]).encode());
    let input = b"{\"a\": 1}\nnot json\n";
    let mut out: *mut u8 = ptr::null_mut();
    let mut len = 0usize;
    let status =
        planbridge_plan_execute_simple(handle, input.as_ptr(), input.len(), &mut out, &mut len);
    assert_eq!(ErrorCode::from_status(status), ErrorCode::InvalidArgument);
    assert!(last_error().contains("line 2"));
    planbridge_plan_free(handle);

    assert_failure(
        frame_from_columns(&json!([
            {"name": "a", "values": [1]},
            {"name": "a", "values": [2]},
        ])),
        ErrorCode::InvalidArgument,
    );
    assert_failure(
        frame_from_columns(&json!([
            {"name": "a", "values": [1, 2]},
            {"name": "b", "values": [2]},
        ])),
        ErrorCode::InvalidArgument,
    );
    assert_failure(frame_from_columns(&json!([])), ErrorCode::InvalidArgument);
    assert_failure(frame_from_columns(&json!({"a": 1})), ErrorCode::InvalidArgument);
}

#[test]
fn mixed_value_kinds_in_a_column_are_rejected() {
    let handle = compile(&PlanBuilder::memory_scan(&[]).encode());
    let msg = assert_failure(
        try_execute_rows(handle, &[json!({"v": 1}), json!({"v": "x"})]),
        ErrorCode::InvalidArgument,
    );
    assert!(msg.contains("mixes number and string"), "{msg}");
    assert_failure(
        try_execute_rows(handle, &[json!({"v": u64::MAX})]),
        ErrorCode::InvalidArgument,
    );
    planbridge_plan_free(handle);
}

#[test]
fn success_clears_and_release_calls_keep_the_diagnostic() {
    assert_ne!(planbridge_check_abi(ABI_VERSION + 7), 0);
    let first = last_error();
    assert!(first.starts_with("[ERR_ABI_MISMATCH]"));

    // Release calls are not fallible and leave the slot alone.
    planbridge_plan_free(424_242);
    planbridge_output_free(ptr::null_mut(), 0);
    assert_eq!(last_error(), first);

    assert_eq!(planbridge_check_abi(ABI_VERSION), 0);
    assert!(planbridge_last_error().is_null());
}

#[test]
fn last_error_free_clears_slot() {
    assert_ne!(planbridge_check_abi(0), 0);
    assert!(!planbridge_last_error().is_null());
    planbridge_last_error_free();
    assert!(planbridge_last_error().is_null());
    planbridge_last_error_free();
}

#[test]
fn ten_threads_negotiate_without_sharing_diagnostics() {
    let barrier = Arc::new(Barrier::new(10));
    let workers: Vec<_> = (0..10u32)
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..50 {
                    let mut p: *const c_char = ptr::null();
                    let mut len = 0usize;
                    assert_eq!(planbridge_engine_version(&mut p, &mut len), 0);
                    assert!(planbridge_last_error().is_null());
                    assert_eq!(planbridge_capabilities(&mut p, &mut len), 0);
                    assert!(planbridge_last_error().is_null());

                    if i % 2 == 0 {
                        let expected = 1000 + i;
                        assert_ne!(planbridge_check_abi(expected), 0);
                        let text = last_error();
                        assert!(text.contains(&format!("caller expects {expected}")), "{text}");
                    } else {
                        assert!(last_error().is_empty());
                    }
                }
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }
}

#[test]
fn distinct_plans_execute_concurrently() {
    let workers: Vec<_> = (0..8i64)
        .map(|i| {
            thread::spawn(move || {
                let handle = compile(
                    &PlanBuilder::memory_scan(&[])
                        .with_columns(vec![alias(lit_i64(i), "worker")])
                        .encode(),
                );
                for _ in 0..10 {
                    let out = execute_rows(handle, &people());
                    assert_eq!(out.len(), 2);
                    assert_eq!(out[0]["worker"], json!(i));
                }
                planbridge_plan_free(handle);
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }
}
