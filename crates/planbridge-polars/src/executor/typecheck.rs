//! Binary operand checks against the input schema.
//!
//! Polars only notices some type mismatches (a string compared with a number)
//! while collecting, which would report a plan bug as a data failure. Operands
//! are resolved here before anything is materialized.

use planbridge_core::plan::{self, BinaryOperator, Node, expr::Kind};
use planbridge_core::{BridgeError, Result};
use polars::prelude::{DataType, LazyFrame};

use super::expr::build_expr;
use crate::error::{Phase, classify};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Numeric,
    Boolean,
    String,
    Other,
}

fn family(dtype: &DataType) -> Family {
    if dtype.is_bool() {
        Family::Boolean
    } else if dtype.is_primitive_numeric() {
        Family::Numeric
    } else if dtype.is_string() {
        Family::String
    } else {
        Family::Other
    }
}

/// Reject binary expressions in `exprs` whose operand types cannot be combined
/// when evaluated over `input`.
pub(super) fn check_operands(node: &Node, input: &LazyFrame, exprs: &[plan::Expr]) -> Result<()> {
    exprs.iter().try_for_each(|e| check_expr(node, input, e))
}

fn check_expr(node: &Node, input: &LazyFrame, e: &plan::Expr) -> Result<()> {
    let Some(kind) = e.kind.as_ref() else {
        return Ok(());
    };
    for operand in kind.operands().into_iter().flatten() {
        check_expr(node, input, operand)?;
    }
    let Kind::Binary(b) = kind else {
        return Ok(());
    };
    let (Some(left), Some(right), Ok(op)) = (
        b.left.as_deref(),
        b.right.as_deref(),
        BinaryOperator::try_from(b.op),
    ) else {
        return Ok(());
    };
    let (Some(l), Some(r)) = (operand_dtype(input, left)?, operand_dtype(input, right)?) else {
        return Ok(());
    };
    if compatible(op, family(&l), family(&r)) {
        Ok(())
    } else {
        Err(BridgeError::PlanSemantic(format!(
            "node {}: {op:?} cannot combine {l} with {r}",
            node.id
        )))
    }
}

/// Output dtype of `e` over `input`, or `None` when it does not resolve to a
/// single column.
fn operand_dtype(input: &LazyFrame, e: &plan::Expr) -> Result<Option<DataType>> {
    let mut query = input.clone().select([build_expr(e)?]);
    let schema = query
        .collect_schema()
        .map_err(|err| classify(err, Phase::Resolve))?;
    if schema.len() != 1 {
        return Ok(None);
    }
    Ok(schema.iter_values().next().cloned())
}

fn compatible(op: BinaryOperator, left: Family, right: Family) -> bool {
    use Family::*;
    match (left, right) {
        (String, String) => matches!(
            op,
            BinaryOperator::Add
                | BinaryOperator::Eq
                | BinaryOperator::Ne
                | BinaryOperator::Lt
                | BinaryOperator::Le
                | BinaryOperator::Gt
                | BinaryOperator::Ge
        ),
        (String, Numeric | Boolean) | (Numeric | Boolean, String) => false,
        _ => true,
    }
}
