//! Structural validation of a decoded plan against a capability set.

use super::Plan;
use super::relational::{Node, node};
use super::scalar::{BinaryOperator, DataType, Expr, expr};
use crate::capabilities::Capabilities;
use crate::error::{BridgeError, Result};

/// Facts about a plan gathered while validating it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanSummary {
    pub node_count: usize,
    /// The plan reads the caller-supplied frame (it contains a `MemoryScan`).
    pub requires_input: bool,
}

pub fn check_version(version: u32, caps: &Capabilities) -> Result<()> {
    if version < caps.min_plan_version_supported || version > caps.max_plan_version_supported {
        return Err(BridgeError::PlanVersionUnsupported {
            version,
            min: caps.min_plan_version_supported,
            max: caps.max_plan_version_supported,
        });
    }
    Ok(())
}

/// Walk the whole tree and reject anything this engine cannot interpret.
pub fn validate(plan: &Plan, caps: &Capabilities) -> Result<PlanSummary> {
    let root = plan
        .root
        .as_ref()
        .ok_or_else(|| BridgeError::PlanSemantic("plan has no root node".into()))?;
    let mut summary = PlanSummary::default();
    validate_node(root, caps, &mut summary)?;
    Ok(summary)
}

fn validate_node(node: &Node, caps: &Capabilities, summary: &mut PlanSummary) -> Result<()> {
    summary.node_count += 1;
    let kind = node.kind.as_ref().ok_or_else(|| {
        BridgeError::Unsupported(format!(
            "node {} has no recognized operator variant",
            node.id
        ))
    })?;
    if !caps.supports_node(kind.name()) {
        return Err(BridgeError::Unsupported(format!(
            "node {}: operator {} is not supported by this engine",
            node.id,
            kind.name()
        )));
    }

    match kind {
        node::Kind::MemoryScan(_) => summary.requires_input = true,
        node::Kind::CsvScan(scan) => {
            if scan.path.is_empty() {
                return Err(semantic(node, "CsvScan requires a path"));
            }
            if scan.separator.len() > 1 {
                return Err(semantic(
                    node,
                    &format!("CsvScan separator must be one byte, got {:?}", scan.separator),
                ));
            }
        }
        node::Kind::ParquetScan(scan) => {
            if scan.path.is_empty() {
                return Err(semantic(node, "ParquetScan requires a path"));
            }
        }
        node::Kind::Project(p) => validate_exprs(node, &p.expressions, caps)?,
        node::Kind::Filter(f) => {
            let predicate = f
                .predicate
                .as_ref()
                .ok_or_else(|| semantic(node, "Filter requires a predicate"))?;
            validate_expr(node, predicate, caps)?;
        }
        node::Kind::WithColumns(w) => validate_exprs(node, &w.expressions, caps)?,
        node::Kind::Limit(_) => {}
    }

    if let Some(input) = kind.input() {
        let child = input
            .as_deref()
            .ok_or_else(|| semantic(node, &format!("{} requires an input", kind.name())))?;
        validate_node(child, caps, summary)?;
    }
    Ok(())
}

fn validate_exprs(node: &Node, exprs: &[Expr], caps: &Capabilities) -> Result<()> {
    exprs.iter().try_for_each(|e| validate_expr(node, e, caps))
}

fn validate_expr(node: &Node, e: &Expr, caps: &Capabilities) -> Result<()> {
    let kind = e.kind.as_ref().ok_or_else(|| {
        BridgeError::Unsupported(format!(
            "node {}: expression has no recognized variant",
            node.id
        ))
    })?;
    if !caps.supports_expr(kind.name()) {
        return Err(BridgeError::Unsupported(format!(
            "node {}: expression {} is not supported by this engine",
            node.id,
            kind.name()
        )));
    }

    match kind {
        expr::Kind::Lit(lit) if lit.value.is_none() => {
            return Err(BridgeError::Unsupported(format!(
                "node {}: literal has no recognized value variant",
                node.id
            )));
        }
        expr::Kind::Binary(b) => match BinaryOperator::try_from(b.op) {
            Ok(BinaryOperator::Unspecified) | Err(_) => {
                return Err(BridgeError::Unsupported(format!(
                    "node {}: binary operator {} is not supported",
                    node.id, b.op
                )));
            }
            Ok(_) => {}
        },
        expr::Kind::Alias(a) if a.name.is_empty() => {
            return Err(semantic(node, "Alias requires a name"));
        }
        expr::Kind::Cast(c) => match DataType::try_from(c.data_type) {
            Ok(DataType::Unspecified) | Err(_) => {
                return Err(BridgeError::Unsupported(format!(
                    "node {}: cast target type {} is not supported",
                    node.id, c.data_type
                )));
            }
            Ok(dt) if !caps.supports_dtype(dt.name()) => {
                return Err(BridgeError::Unsupported(format!(
                    "node {}: cast target type {} is not supported by this engine",
                    node.id,
                    dt.name()
                )));
            }
            Ok(_) => {}
        },
        expr::Kind::StrPadStart(p) | expr::Kind::StrPadEnd(p) if p.fill_char.chars().count() != 1 => {
            return Err(semantic(
                node,
                &format!("fill_char must be exactly one character, got {:?}", p.fill_char),
            ));
        }
        _ => {}
    }

    for operand in kind.operands() {
        let operand = operand.ok_or_else(|| {
            semantic(node, &format!("{} is missing an operand", kind.name()))
        })?;
        validate_expr(node, operand, caps)?;
    }
    Ok(())
}

fn semantic(node: &Node, msg: &str) -> BridgeError {
    BridgeError::PlanSemantic(format!("node {}: {}", node.id, msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::plan::builder::*;
    use crate::plan::*;

    fn plan_with_root(root: Node) -> Plan {
        Plan {
            plan_version: PLAN_VERSION,
            root: Some(root),
        }
    }

    fn filter_on_memory(predicate: Expr) -> Plan {
        PlanBuilder::memory_scan(&[]).filter(predicate).build()
    }

    #[test]
    fn missing_root_is_semantic() {
        let plan = Plan {
            plan_version: PLAN_VERSION,
            root: None,
        };
        let err = validate(&plan, &Capabilities::all_core()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PlanSemantic);
    }

    #[test]
    fn missing_child_is_semantic() {
        let plan = plan_with_root(Node {
            id: 4,
            kind: Some(node::Kind::Limit(Limit { input: None, n: 3 })),
        });
        let err = validate(&plan, &Capabilities::all_core()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PlanSemantic);
        assert!(err.to_string().contains("node 4"));
    }

    #[test]
    fn empty_expression_variant_is_unsupported() {
        let err = validate(&filter_on_memory(Expr { kind: None }), &Capabilities::all_core())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unsupported);
    }

    #[test]
    fn unknown_binary_operator_is_unsupported() {
        let predicate = Expr {
            kind: Some(expr::Kind::Binary(BinaryExpr {
                left: Some(Box::new(col("a"))),
                op: 99,
                right: Some(Box::new(lit_i64(1))),
            })),
        };
        let err = validate(&filter_on_memory(predicate), &Capabilities::all_core()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unsupported);
    }

    #[test]
    fn binary_with_missing_operand_is_semantic() {
        let predicate = Expr {
            kind: Some(expr::Kind::Binary(BinaryExpr {
                left: Some(Box::new(col("a"))),
                op: BinaryOperator::Gt as i32,
                right: None,
            })),
        };
        let err = validate(&filter_on_memory(predicate), &Capabilities::all_core()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PlanSemantic);
    }

    #[test]
    fn names_outside_capabilities_are_unsupported() {
        let mut caps = Capabilities::all_core();
        caps.supported_nodes.retain(|n| n != "CsvScan");
        caps.supported_exprs.retain(|n| n != "StrSplit");

        let csv = PlanBuilder::csv_scan("data.csv").build();
        assert_eq!(
            validate(&csv, &caps).unwrap_err().code(),
            ErrorCode::Unsupported
        );

        let split = PlanBuilder::memory_scan(&[])
            .select(vec![str_split(col("s"), ",")])
            .build();
        assert_eq!(
            validate(&split, &caps).unwrap_err().code(),
            ErrorCode::Unsupported
        );
    }

    #[test]
    fn pad_fill_must_be_single_char() {
        let plan = PlanBuilder::memory_scan(&[])
            .select(vec![str_pad_start(col("s"), 5, "ab")])
            .build();
        let err = validate(&plan, &Capabilities::all_core()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PlanSemantic);
    }

    #[test]
    fn file_scans_do_not_require_input() {
        let plan = PlanBuilder::csv_scan("people.csv")
            .select(vec![col("name")])
            .build();
        let summary = validate(&plan, &Capabilities::all_core()).unwrap();
        assert!(!summary.requires_input);
        assert_eq!(summary.node_count, 2);
    }
}
