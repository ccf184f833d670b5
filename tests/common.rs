//! Shared helpers for integration tests: drive the C entry points the way a
//! host would and decode their outputs.

#![allow(dead_code)]

use std::ffi::CStr;
use std::ptr;

use planbridge::*;
use serde_json::Value;

/// Status and diagnostic of a failed call.
#[derive(Debug)]
pub struct Failure {
    pub code: ErrorCode,
    pub message: String,
}

pub fn last_error() -> String {
    let p = planbridge_last_error();
    if p.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(p) }.to_string_lossy().into_owned()
}

fn check(status: i32) -> Result<(), Failure> {
    if status == 0 {
        Ok(())
    } else {
        Err(Failure {
            code: ErrorCode::from_status(status),
            message: last_error(),
        })
    }
}

pub fn try_compile(bytes: &[u8]) -> Result<u64, Failure> {
    let mut handle = 0u64;
    check(planbridge_plan_compile(bytes.as_ptr(), bytes.len(), &mut handle))?;
    Ok(handle)
}

/// Compile a plan, panicking with the diagnostic on failure.
pub fn compile(bytes: &[u8]) -> u64 {
    try_compile(bytes).unwrap_or_else(|f| panic!("compile failed: {f:?}"))
}

pub fn ndjson(rows: &[Value]) -> Vec<u8> {
    let mut out = Vec::new();
    for r in rows {
        out.extend_from_slice(r.to_string().as_bytes());
        out.push(b'\n');
    }
    out
}

pub fn parse_ndjson(bytes: &[u8]) -> Vec<Value> {
    std::str::from_utf8(bytes)
        .unwrap()
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

/// Take ownership of a returned buffer, copy it out and release it.
fn take_buffer(p: *mut u8, len: usize) -> Vec<u8> {
    let bytes = unsafe { std::slice::from_raw_parts(p, len) }.to_vec();
    planbridge_output_free(p, len);
    bytes
}

/// Execute with NDJSON rows; an empty `rows` slice passes no input.
pub fn try_execute_rows(handle: u64, rows: &[Value]) -> Result<Vec<Value>, Failure> {
    let input = ndjson(rows);
    let (input_ptr, input_len) = if input.is_empty() {
        (ptr::null(), 0)
    } else {
        (input.as_ptr(), input.len())
    };
    let mut out: *mut u8 = ptr::null_mut();
    let mut out_len = 0usize;
    check(planbridge_plan_execute_simple(
        handle, input_ptr, input_len, &mut out, &mut out_len,
    ))?;
    Ok(parse_ndjson(&take_buffer(out, out_len)))
}

pub fn execute_rows(handle: u64, rows: &[Value]) -> Vec<Value> {
    try_execute_rows(handle, rows).unwrap_or_else(|f| panic!("execute failed: {f:?}"))
}

/// Compile, execute once and free.
pub fn run(plan: plan::PlanBuilder, rows: &[Value]) -> Result<Vec<Value>, Failure> {
    let handle = try_compile(&plan.encode())?;
    let result = try_execute_rows(handle, rows);
    planbridge_plan_free(handle);
    result
}

pub fn frame_from_columns(columns: &Value) -> Result<u64, Failure> {
    let json = columns.to_string();
    let mut handle = 0u64;
    check(planbridge_dataframe_from_columns(
        json.as_ptr(),
        json.len(),
        &mut handle,
    ))?;
    Ok(handle)
}

pub fn frame_rows(frame: u64) -> Result<Vec<Value>, Failure> {
    let mut out: *mut u8 = ptr::null_mut();
    let mut len = 0usize;
    check(planbridge_dataframe_to_row_bytes(frame, &mut out, &mut len))?;
    Ok(parse_ndjson(&take_buffer(out, len)))
}

pub fn frame_ipc(frame: u64) -> Result<Vec<u8>, Failure> {
    let mut out: *mut u8 = ptr::null_mut();
    let mut len = 0usize;
    check(planbridge_dataframe_to_columnar_bytes(frame, &mut out, &mut len))?;
    Ok(take_buffer(out, len))
}

/// Export a frame as a caller-owned C Data batch.
pub fn export(frame: u64) -> Result<(FfiSchema, FfiArray), Failure> {
    let mut schema = FfiSchema::empty();
    let mut array = FfiArray::empty();
    check(planbridge_dataframe_export_columnar(
        frame,
        &mut schema,
        &mut array,
    ))?;
    Ok((schema, array))
}

pub fn release(mut schema: FfiSchema, mut array: FfiArray) {
    unsafe {
        array.release();
        schema.release();
    }
}

/// The keys of a JSON row in order.
pub fn keys(row: &Value) -> Vec<&str> {
    row.as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect()
}

/// Two people, the fixture used by most scenarios.
pub fn people() -> Vec<Value> {
    vec![
        serde_json::json!({"name": "Alice", "age": 25}),
        serde_json::json!({"name": "Bob", "age": 30}),
    ]
}
