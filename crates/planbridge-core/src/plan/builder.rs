//! Builders for assembling plans in Rust, mainly for embedders and tests.
//!
//! ```
//! use planbridge_core::plan::builder::*;
//!
//! let bytes = PlanBuilder::memory_scan(&[])
//!     .filter(gt(col("age"), lit_i64(28)))
//!     .select(vec![col("name"), alias(col("age"), "years")])
//!     .limit(1)
//!     .encode();
//! assert!(!bytes.is_empty());
//! ```

use prost::Message;

use super::relational::{CsvScan, Filter, Limit, MemoryScan, Node, ParquetScan, Project, WithColumns, node};
use super::scalar::*;
use super::{PLAN_VERSION, Plan};

// ---------- Leaves ----------

/// Column reference: `col("name")`
pub fn col(name: &str) -> Expr {
    kind(expr::Kind::Col(Column {
        name: name.to_string(),
    }))
}

/// All columns of the input.
pub fn wildcard() -> Expr {
    kind(expr::Kind::Wildcard(Wildcard {}))
}

pub fn lit_i64(n: i64) -> Expr {
    literal(literal::Value::IntVal(n))
}

pub fn lit_f64(n: f64) -> Expr {
    literal(literal::Value::FloatVal(n))
}

pub fn lit_bool(b: bool) -> Expr {
    literal(literal::Value::BoolVal(b))
}

pub fn lit_str(s: &str) -> Expr {
    literal(literal::Value::StringVal(s.to_string()))
}

pub fn lit_null() -> Expr {
    literal(literal::Value::NullVal(NullValue {}))
}

fn literal(value: literal::Value) -> Expr {
    kind(expr::Kind::Lit(Literal { value: Some(value) }))
}

fn kind(k: expr::Kind) -> Expr {
    Expr { kind: Some(k) }
}

fn boxed(e: Expr) -> Option<Box<Expr>> {
    Some(Box::new(e))
}

// ---------- Binary operators ----------

pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Expr {
    kind(expr::Kind::Binary(BinaryExpr {
        left: boxed(left),
        op: op as i32,
        right: boxed(right),
    }))
}

pub fn add(a: Expr, b: Expr) -> Expr {
    binary(BinaryOperator::Add, a, b)
}

pub fn sub(a: Expr, b: Expr) -> Expr {
    binary(BinaryOperator::Sub, a, b)
}

pub fn mul(a: Expr, b: Expr) -> Expr {
    binary(BinaryOperator::Mul, a, b)
}

/// Integer operands divide as integers; division by zero yields null.
pub fn div(a: Expr, b: Expr) -> Expr {
    binary(BinaryOperator::Div, a, b)
}

pub fn modulo(a: Expr, b: Expr) -> Expr {
    binary(BinaryOperator::Mod, a, b)
}

pub fn pow(a: Expr, b: Expr) -> Expr {
    binary(BinaryOperator::Pow, a, b)
}

pub fn eq(a: Expr, b: Expr) -> Expr {
    binary(BinaryOperator::Eq, a, b)
}

pub fn ne(a: Expr, b: Expr) -> Expr {
    binary(BinaryOperator::Ne, a, b)
}

pub fn gt(a: Expr, b: Expr) -> Expr {
    binary(BinaryOperator::Gt, a, b)
}

pub fn ge(a: Expr, b: Expr) -> Expr {
    binary(BinaryOperator::Ge, a, b)
}

pub fn lt(a: Expr, b: Expr) -> Expr {
    binary(BinaryOperator::Lt, a, b)
}

pub fn le(a: Expr, b: Expr) -> Expr {
    binary(BinaryOperator::Le, a, b)
}

pub fn and_(a: Expr, b: Expr) -> Expr {
    binary(BinaryOperator::And, a, b)
}

pub fn or_(a: Expr, b: Expr) -> Expr {
    binary(BinaryOperator::Or, a, b)
}

pub fn xor(a: Expr, b: Expr) -> Expr {
    binary(BinaryOperator::Xor, a, b)
}

// ---------- Unary and naming ----------

pub fn not_(a: Expr) -> Expr {
    kind(expr::Kind::Not(UnaryExpr { expr: boxed(a) }))
}

pub fn is_null(a: Expr) -> Expr {
    kind(expr::Kind::IsNull(UnaryExpr { expr: boxed(a) }))
}

pub fn is_not_null(a: Expr) -> Expr {
    kind(expr::Kind::IsNotNull(UnaryExpr { expr: boxed(a) }))
}

pub fn alias(a: Expr, name: &str) -> Expr {
    kind(expr::Kind::Alias(Alias {
        expr: boxed(a),
        name: name.to_string(),
    }))
}

/// Non-strict cast: unrepresentable values become null.
pub fn cast(a: Expr, to: DataType) -> Expr {
    cast_with(a, to, false)
}

/// Strict cast: unrepresentable values fail execution.
pub fn strict_cast(a: Expr, to: DataType) -> Expr {
    cast_with(a, to, true)
}

fn cast_with(a: Expr, to: DataType, strict: bool) -> Expr {
    kind(expr::Kind::Cast(Cast {
        expr: boxed(a),
        data_type: to as i32,
        strict,
    }))
}

// ---------- String functions ----------

pub fn str_len_bytes(a: Expr) -> Expr {
    kind(expr::Kind::StrLenBytes(StringFunction { expr: boxed(a) }))
}

pub fn str_len_chars(a: Expr) -> Expr {
    kind(expr::Kind::StrLenChars(StringFunction { expr: boxed(a) }))
}

pub fn str_to_lowercase(a: Expr) -> Expr {
    kind(expr::Kind::StrToLowercase(StringFunction { expr: boxed(a) }))
}

pub fn str_to_uppercase(a: Expr) -> Expr {
    kind(expr::Kind::StrToUppercase(StringFunction { expr: boxed(a) }))
}

pub fn str_contains(a: Expr, pattern: &str, literal: bool) -> Expr {
    kind(expr::Kind::StrContains(StringContains {
        expr: boxed(a),
        pattern: pattern.to_string(),
        literal,
    }))
}

pub fn str_starts_with(a: Expr, prefix: &str) -> Expr {
    kind(expr::Kind::StrStartsWith(StringStartsWith {
        expr: boxed(a),
        prefix: prefix.to_string(),
    }))
}

pub fn str_ends_with(a: Expr, suffix: &str) -> Expr {
    kind(expr::Kind::StrEndsWith(StringEndsWith {
        expr: boxed(a),
        suffix: suffix.to_string(),
    }))
}

pub fn str_extract(a: Expr, pattern: &str, group_index: u32) -> Expr {
    kind(expr::Kind::StrExtract(StringExtract {
        expr: boxed(a),
        pattern: pattern.to_string(),
        group_index,
    }))
}

/// Replace the first match.
pub fn str_replace(a: Expr, pattern: &str, value: &str, literal: bool) -> Expr {
    kind(expr::Kind::StrReplace(replace_args(a, pattern, value, literal)))
}

pub fn str_replace_all(a: Expr, pattern: &str, value: &str, literal: bool) -> Expr {
    kind(expr::Kind::StrReplaceAll(replace_args(a, pattern, value, literal)))
}

fn replace_args(a: Expr, pattern: &str, value: &str, literal: bool) -> StringReplace {
    StringReplace {
        expr: boxed(a),
        pattern: pattern.to_string(),
        value: value.to_string(),
        literal,
    }
}

/// Strip `chars` from both ends; an empty `chars` strips whitespace.
pub fn str_strip_chars(a: Expr, chars: &str) -> Expr {
    kind(expr::Kind::StrStripChars(StringStripChars {
        expr: boxed(a),
        chars: chars.to_string(),
    }))
}

pub fn str_slice(a: Expr, offset: i64, length: Option<u64>) -> Expr {
    kind(expr::Kind::StrSlice(StringSlice {
        expr: boxed(a),
        offset,
        length,
    }))
}

pub fn str_split(a: Expr, by: &str) -> Expr {
    kind(expr::Kind::StrSplit(StringSplit {
        expr: boxed(a),
        by: by.to_string(),
    }))
}

pub fn str_pad_start(a: Expr, length: u64, fill_char: &str) -> Expr {
    kind(expr::Kind::StrPadStart(pad_args(a, length, fill_char)))
}

pub fn str_pad_end(a: Expr, length: u64, fill_char: &str) -> Expr {
    kind(expr::Kind::StrPadEnd(pad_args(a, length, fill_char)))
}

fn pad_args(a: Expr, length: u64, fill_char: &str) -> StringPad {
    StringPad {
        expr: boxed(a),
        length,
        fill_char: fill_char.to_string(),
    }
}

// ---------- Plans ----------

/// Chains operators on top of a scan, assigning increasing node ids from the
/// leaf upwards.
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    root: Node,
    next_id: u32,
}

impl PlanBuilder {
    /// Scan the caller-supplied frame, optionally keeping only `columns`.
    pub fn memory_scan(columns: &[&str]) -> Self {
        Self::leaf(node::Kind::MemoryScan(MemoryScan {
            column_names: columns.iter().map(|c| c.to_string()).collect(),
        }))
    }

    /// CSV scan with a header row and inferred schema.
    pub fn csv_scan(path: &str) -> Self {
        Self::csv_scan_with(CsvScan {
            path: path.to_string(),
            ..Default::default()
        })
    }

    pub fn csv_scan_with(scan: CsvScan) -> Self {
        Self::leaf(node::Kind::CsvScan(scan))
    }

    pub fn parquet_scan(path: &str) -> Self {
        Self::leaf(node::Kind::ParquetScan(ParquetScan {
            path: path.to_string(),
        }))
    }

    fn leaf(kind: node::Kind) -> Self {
        PlanBuilder {
            root: Node {
                id: 1,
                kind: Some(kind),
            },
            next_id: 2,
        }
    }

    fn wrap(self, f: impl FnOnce(Option<Box<Node>>) -> node::Kind) -> Self {
        let id = self.next_id;
        PlanBuilder {
            root: Node {
                id,
                kind: Some(f(Some(Box::new(self.root)))),
            },
            next_id: id + 1,
        }
    }

    pub fn select(self, expressions: Vec<Expr>) -> Self {
        self.wrap(|input| node::Kind::Project(Project { input, expressions }))
    }

    pub fn filter(self, predicate: Expr) -> Self {
        self.wrap(|input| {
            node::Kind::Filter(Filter {
                input,
                predicate: Some(predicate),
            })
        })
    }

    pub fn with_columns(self, expressions: Vec<Expr>) -> Self {
        self.wrap(|input| node::Kind::WithColumns(WithColumns { input, expressions }))
    }

    pub fn limit(self, n: u64) -> Self {
        self.wrap(|input| node::Kind::Limit(Limit { input, n }))
    }

    pub fn build(self) -> Plan {
        Plan {
            plan_version: PLAN_VERSION,
            root: Some(self.root),
        }
    }

    pub fn encode(self) -> Vec<u8> {
        self.build().encode_to_vec()
    }
}
