//! Plan expressions to Polars expressions.

use planbridge_core::plan::{self, BinaryOperator, expr::Kind, literal::Value};
use planbridge_core::{BridgeError, Result};
use polars::prelude::*;

use super::strings;
use crate::dtype::polars_dtype;

/// Convert one plan expression (recursively) to a Polars `Expr`.
pub fn build_expr(e: &plan::Expr) -> Result<Expr> {
    let kind = e
        .kind
        .as_ref()
        .ok_or_else(|| BridgeError::Unsupported("expression has no recognized variant".into()))?;

    if let Some(result) = strings::build_string_expr(kind) {
        return result;
    }

    match kind {
        Kind::Col(c) => Ok(col(c.name.as_str())),
        Kind::Wildcard(_) => Ok(col("*")),
        Kind::Lit(l) => match l.value.as_ref() {
            Some(Value::IntVal(v)) => Ok(lit(*v)),
            Some(Value::FloatVal(v)) => Ok(lit(*v)),
            Some(Value::BoolVal(v)) => Ok(lit(*v)),
            Some(Value::StringVal(v)) => Ok(lit(v.as_str())),
            Some(Value::NullVal(_)) => Ok(lit(NULL)),
            None => Err(BridgeError::Unsupported(
                "literal has no recognized value variant".into(),
            )),
        },
        Kind::Binary(b) => {
            let left = build_operand(&b.left, "Binary")?;
            let right = build_operand(&b.right, "Binary")?;
            binary(b.op, left, right)
        }
        Kind::Alias(a) => Ok(build_operand(&a.expr, "Alias")?.alias(a.name.as_str())),
        Kind::IsNull(u) => Ok(build_operand(&u.expr, "IsNull")?.is_null()),
        Kind::IsNotNull(u) => Ok(build_operand(&u.expr, "IsNotNull")?.is_not_null()),
        Kind::Not(u) => Ok(build_operand(&u.expr, "Not")?.not()),
        Kind::Cast(c) => {
            let inner = build_operand(&c.expr, "Cast")?;
            let target = polars_dtype(c.data_type)?;
            if c.strict {
                Ok(inner.strict_cast(target))
            } else {
                Ok(inner.cast(target))
            }
        }
        other => Err(BridgeError::Unsupported(format!(
            "expression {} is not supported",
            other.name()
        ))),
    }
}

/// Build a required sub-expression.
pub(super) fn build_operand(operand: &Option<Box<plan::Expr>>, parent: &str) -> Result<Expr> {
    let operand = operand
        .as_deref()
        .ok_or_else(|| BridgeError::PlanSemantic(format!("{parent} is missing an operand")))?;
    build_expr(operand)
}

fn binary(op: i32, left: Expr, right: Expr) -> Result<Expr> {
    let op = BinaryOperator::try_from(op)
        .map_err(|_| BridgeError::Unsupported(format!("unknown binary operator {op}")))?;
    Ok(match op {
        BinaryOperator::Add => left + right,
        BinaryOperator::Sub => left - right,
        BinaryOperator::Mul => left * right,
        BinaryOperator::Div => left / right,
        BinaryOperator::Mod => left % right,
        BinaryOperator::Pow => left.pow(right),
        BinaryOperator::Eq => left.eq(right),
        BinaryOperator::Ne => left.neq(right),
        BinaryOperator::Lt => left.lt(right),
        BinaryOperator::Le => left.lt_eq(right),
        BinaryOperator::Gt => left.gt(right),
        BinaryOperator::Ge => left.gt_eq(right),
        BinaryOperator::And => left.and(right),
        BinaryOperator::Or => left.or(right),
        BinaryOperator::Xor => left.xor(right),
        BinaryOperator::Unspecified => {
            return Err(BridgeError::Unsupported(
                "binary operator is unspecified".into(),
            ));
        }
    })
}
