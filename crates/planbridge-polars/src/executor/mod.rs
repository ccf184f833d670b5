//! Plan interpretation: Node tree to Polars `LazyFrame`, then collect.

mod expr;
mod strings;
mod typecheck;

use planbridge_core::plan::{CsvScan, Node, Plan, node};
use planbridge_core::{BridgeError, Result};
use polars::prelude::*;

use crate::error::{Phase, classify};

pub use expr::build_expr;

/// Carries the row count through a projection with no expressions. Dropped
/// from the result, leaving a zero-width frame of the input's height.
const ROW_CARRIER: &str = "__planbridge_rows";

/// Execute `plan`, optionally against a caller-supplied frame.
///
/// Output schema is resolved before any data is materialized, so a plan that
/// references missing columns or mismatched types fails with `PlanSemantic`
/// and only data-dependent failures surface as `Execution`.
pub fn execute_plan(plan: &Plan, input: Option<&DataFrame>) -> Result<DataFrame> {
    let root = plan
        .root
        .as_ref()
        .ok_or_else(|| BridgeError::PlanSemantic("plan has no root node".into()))?;
    let mut lf = build_lazy_frame(root, input)?;
    let schema = lf
        .collect_schema()
        .map_err(|e| classify(e, Phase::Resolve))?;
    tracing::trace!(columns = schema.len(), "resolved output schema");
    let mut df = lf.collect().map_err(|e| classify(e, Phase::Collect))?;
    if df.get_column_index(ROW_CARRIER).is_some() {
        df.drop_in_place(ROW_CARRIER)
            .map_err(|e| classify(e, Phase::Collect))?;
    }
    tracing::debug!(rows = df.height(), columns = df.width(), "plan executed");
    Ok(df)
}

/// Build the lazy query for `node` and everything below it.
pub fn build_lazy_frame(node: &Node, input: Option<&DataFrame>) -> Result<LazyFrame> {
    let kind = node.kind.as_ref().ok_or_else(|| {
        BridgeError::Unsupported(format!("node {} has no recognized operator variant", node.id))
    })?;

    match kind {
        node::Kind::MemoryScan(scan) => {
            let df = input.ok_or_else(|| {
                BridgeError::Execution(
                    "plan reads a caller-supplied frame but none was provided".into(),
                )
            })?;
            // Columns are reference counted; the clone does not copy buffers.
            let lf = df.clone().lazy();
            if scan.column_names.is_empty() {
                Ok(lf)
            } else {
                let exprs: Vec<Expr> = scan
                    .column_names
                    .iter()
                    .map(|name| col(name.as_str()))
                    .collect();
                Ok(lf.select(exprs))
            }
        }
        node::Kind::CsvScan(scan) => csv_scan(scan),
        node::Kind::ParquetScan(scan) => parquet_scan(&scan.path),
        node::Kind::Project(p) => {
            let lf = build_input(node, &p.input, input)?;
            if p.expressions.is_empty() {
                return Ok(lf
                    .with_row_index(ROW_CARRIER, None)
                    .select([col(ROW_CARRIER)]));
            }
            typecheck::check_operands(node, &lf, &p.expressions)?;
            Ok(lf.select(build_exprs(&p.expressions)?))
        }
        node::Kind::Filter(f) => {
            let lf = build_input(node, &f.input, input)?;
            let predicate = f.predicate.as_ref().ok_or_else(|| {
                BridgeError::PlanSemantic(format!("node {}: Filter requires a predicate", node.id))
            })?;
            typecheck::check_operands(node, &lf, std::slice::from_ref(predicate))?;
            Ok(lf.filter(build_expr(predicate)?))
        }
        node::Kind::WithColumns(w) => {
            let lf = build_input(node, &w.input, input)?;
            typecheck::check_operands(node, &lf, &w.expressions)?;
            Ok(lf.with_columns(build_exprs(&w.expressions)?))
        }
        node::Kind::Limit(l) => {
            let lf = build_input(node, &l.input, input)?;
            Ok(lf.limit(IdxSize::try_from(l.n).unwrap_or(IdxSize::MAX)))
        }
    }
}

fn build_input(
    parent: &Node,
    child: &Option<Box<Node>>,
    input: Option<&DataFrame>,
) -> Result<LazyFrame> {
    let child = child.as_deref().ok_or_else(|| {
        BridgeError::PlanSemantic(format!("node {}: operator requires an input", parent.id))
    })?;
    build_lazy_frame(child, input)
}

fn build_exprs(exprs: &[planbridge_core::plan::Expr]) -> Result<Vec<Expr>> {
    exprs.iter().map(build_expr).collect()
}

fn csv_scan(scan: &CsvScan) -> Result<LazyFrame> {
    let mut reader = LazyCsvReader::new(PlPath::new(scan.path.as_str()))
        .with_has_header(scan.has_header.unwrap_or(true));
    if let Some(b) = scan.separator.bytes().next() {
        reader = reader.with_separator(b);
    }
    if let Some(n) = scan.infer_schema_length {
        reader = reader.with_infer_schema_length(Some(usize::try_from(n).unwrap_or(usize::MAX)));
    }
    reader.finish().map_err(|e| {
        BridgeError::Execution(format!("CsvScan of {:?} failed: {e}", scan.path))
    })
}

#[cfg(feature = "parquet")]
fn parquet_scan(path: &str) -> Result<LazyFrame> {
    LazyFrame::scan_parquet(PlPath::new(path), ScanArgsParquet::default())
        .map_err(|e| BridgeError::Execution(format!("ParquetScan of {path:?} failed: {e}")))
}

#[cfg(not(feature = "parquet"))]
fn parquet_scan(path: &str) -> Result<LazyFrame> {
    Err(BridgeError::Unsupported(format!(
        "ParquetScan of {path:?}: engine built without parquet support"
    )))
}
