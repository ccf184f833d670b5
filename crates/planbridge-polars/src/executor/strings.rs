//! String function expressions (`Str*` variants).

use planbridge_core::plan::{
    StringContains, StringExtract, StringPad, StringReplace, StringSlice, StringStripChars,
    expr::Kind,
};
use planbridge_core::{BridgeError, Result};
use polars::prelude::*;

use super::expr::build_operand;

/// Returns `None` when `kind` is not a string function.
pub(super) fn build_string_expr(kind: &Kind) -> Option<Result<Expr>> {
    let built = match kind {
        Kind::StrLenBytes(f) => build_operand(&f.expr, "StrLenBytes").map(|e| e.str().len_bytes()),
        Kind::StrLenChars(f) => build_operand(&f.expr, "StrLenChars").map(|e| e.str().len_chars()),
        Kind::StrToLowercase(f) => {
            build_operand(&f.expr, "StrToLowercase").map(|e| e.str().to_lowercase())
        }
        Kind::StrToUppercase(f) => {
            build_operand(&f.expr, "StrToUppercase").map(|e| e.str().to_uppercase())
        }
        Kind::StrContains(c) => contains(c),
        Kind::StrStartsWith(s) => build_operand(&s.expr, "StrStartsWith")
            .map(|e| e.str().starts_with(lit(s.prefix.as_str()))),
        Kind::StrEndsWith(s) => build_operand(&s.expr, "StrEndsWith")
            .map(|e| e.str().ends_with(lit(s.suffix.as_str()))),
        Kind::StrExtract(x) => extract(x),
        Kind::StrReplace(r) => replace(r, "StrReplace", false),
        Kind::StrReplaceAll(r) => replace(r, "StrReplaceAll", true),
        Kind::StrStripChars(s) => strip_chars(s),
        Kind::StrSlice(s) => slice(s),
        Kind::StrSplit(s) => {
            build_operand(&s.expr, "StrSplit").map(|e| e.str().split(lit(s.by.as_str())))
        }
        Kind::StrPadStart(p) => pad(p, "StrPadStart", false),
        Kind::StrPadEnd(p) => pad(p, "StrPadEnd", true),
        _ => return None,
    };
    Some(built)
}

fn contains(c: &StringContains) -> Result<Expr> {
    let e = build_operand(&c.expr, "StrContains")?;
    let pattern = lit(c.pattern.as_str());
    if c.literal {
        Ok(e.str().contains_literal(pattern))
    } else {
        Ok(e.str().contains(pattern, true))
    }
}

fn extract(x: &StringExtract) -> Result<Expr> {
    let e = build_operand(&x.expr, "StrExtract")?;
    Ok(e.str()
        .extract(lit(x.pattern.as_str()), x.group_index as usize))
}

fn replace(r: &StringReplace, name: &str, all: bool) -> Result<Expr> {
    let e = build_operand(&r.expr, name)?;
    let pattern = lit(r.pattern.as_str());
    let value = lit(r.value.as_str());
    if all {
        Ok(e.str().replace_all(pattern, value, r.literal))
    } else {
        Ok(e.str().replace(pattern, value, r.literal))
    }
}

fn strip_chars(s: &StringStripChars) -> Result<Expr> {
    let e = build_operand(&s.expr, "StrStripChars")?;
    // A null pattern strips whitespace.
    let matches = if s.chars.is_empty() {
        lit(NULL).cast(DataType::String)
    } else {
        lit(s.chars.as_str())
    };
    Ok(e.str().strip_chars(matches))
}

fn slice(s: &StringSlice) -> Result<Expr> {
    let e = build_operand(&s.expr, "StrSlice")?;
    let length = match s.length {
        Some(n) => lit(n),
        None => lit(NULL).cast(DataType::UInt64),
    };
    Ok(e.str().slice(lit(s.offset), length))
}

fn pad(p: &StringPad, name: &str, end: bool) -> Result<Expr> {
    let e = build_operand(&p.expr, name)?;
    let fill_char = single_char(&p.fill_char, name)?;
    let length = lit(p.length);
    if end {
        Ok(e.str().pad_end(length, fill_char))
    } else {
        Ok(e.str().pad_start(length, fill_char))
    }
}

fn single_char(value: &str, name: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(BridgeError::PlanSemantic(format!(
            "{name} fill_char must be exactly one character, got {value:?}"
        ))),
    }
}
