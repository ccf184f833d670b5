//! Scalar and column expressions.
//!
//! Oneof tags 10..=29 are core expressions, 30..=69 string functions, and
//! 70..=99 are reserved for window, aggregate and UDF expressions.

use prost::{Enumeration, Message};

#[derive(Clone, PartialEq, Message)]
pub struct Expr {
    #[prost(
        oneof = "expr::Kind",
        tags = "10, 11, 12, 13, 14, 15, 16, 17, 18, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43, 44"
    )]
    pub kind: Option<expr::Kind>,
}

pub mod expr {
    use prost::Oneof;

    #[derive(Clone, PartialEq, Oneof)]
    pub enum Kind {
        #[prost(message, tag = "10")]
        Col(super::Column),
        #[prost(message, tag = "11")]
        Lit(super::Literal),
        #[prost(message, tag = "12")]
        Binary(super::BinaryExpr),
        #[prost(message, tag = "13")]
        Alias(super::Alias),
        #[prost(message, tag = "14")]
        IsNull(super::UnaryExpr),
        #[prost(message, tag = "15")]
        Not(super::UnaryExpr),
        #[prost(message, tag = "16")]
        Wildcard(super::Wildcard),
        #[prost(message, tag = "17")]
        Cast(super::Cast),
        #[prost(message, tag = "18")]
        IsNotNull(super::UnaryExpr),

        #[prost(message, tag = "30")]
        StrLenBytes(super::StringFunction),
        #[prost(message, tag = "31")]
        StrLenChars(super::StringFunction),
        #[prost(message, tag = "32")]
        StrContains(super::StringContains),
        #[prost(message, tag = "33")]
        StrStartsWith(super::StringStartsWith),
        #[prost(message, tag = "34")]
        StrEndsWith(super::StringEndsWith),
        #[prost(message, tag = "35")]
        StrExtract(super::StringExtract),
        #[prost(message, tag = "36")]
        StrReplace(super::StringReplace),
        #[prost(message, tag = "37")]
        StrReplaceAll(super::StringReplace),
        #[prost(message, tag = "38")]
        StrToLowercase(super::StringFunction),
        #[prost(message, tag = "39")]
        StrToUppercase(super::StringFunction),
        #[prost(message, tag = "40")]
        StrStripChars(super::StringStripChars),
        #[prost(message, tag = "41")]
        StrSlice(super::StringSlice),
        #[prost(message, tag = "42")]
        StrSplit(super::StringSplit),
        #[prost(message, tag = "43")]
        StrPadStart(super::StringPad),
        #[prost(message, tag = "44")]
        StrPadEnd(super::StringPad),
    }

    impl Kind {
        pub const ALL_NAMES: &'static [&'static str] = &[
            "Col",
            "Lit",
            "Binary",
            "Alias",
            "IsNull",
            "Not",
            "Wildcard",
            "Cast",
            "IsNotNull",
            "StrLenBytes",
            "StrLenChars",
            "StrContains",
            "StrStartsWith",
            "StrEndsWith",
            "StrExtract",
            "StrReplace",
            "StrReplaceAll",
            "StrToLowercase",
            "StrToUppercase",
            "StrStripChars",
            "StrSlice",
            "StrSplit",
            "StrPadStart",
            "StrPadEnd",
        ];

        /// Name used in the capability descriptor's `supported_exprs`.
        pub fn name(&self) -> &'static str {
            match self {
                Kind::Col(_) => "Col",
                Kind::Lit(_) => "Lit",
                Kind::Binary(_) => "Binary",
                Kind::Alias(_) => "Alias",
                Kind::IsNull(_) => "IsNull",
                Kind::Not(_) => "Not",
                Kind::Wildcard(_) => "Wildcard",
                Kind::Cast(_) => "Cast",
                Kind::IsNotNull(_) => "IsNotNull",
                Kind::StrLenBytes(_) => "StrLenBytes",
                Kind::StrLenChars(_) => "StrLenChars",
                Kind::StrContains(_) => "StrContains",
                Kind::StrStartsWith(_) => "StrStartsWith",
                Kind::StrEndsWith(_) => "StrEndsWith",
                Kind::StrExtract(_) => "StrExtract",
                Kind::StrReplace(_) => "StrReplace",
                Kind::StrReplaceAll(_) => "StrReplaceAll",
                Kind::StrToLowercase(_) => "StrToLowercase",
                Kind::StrToUppercase(_) => "StrToUppercase",
                Kind::StrStripChars(_) => "StrStripChars",
                Kind::StrSlice(_) => "StrSlice",
                Kind::StrSplit(_) => "StrSplit",
                Kind::StrPadStart(_) => "StrPadStart",
                Kind::StrPadEnd(_) => "StrPadEnd",
            }
        }

        /// Direct sub-expressions, in evaluation order. `None` entries are
        /// required operands the producer left empty.
        pub fn operands(&self) -> Vec<Option<&super::Expr>> {
            match self {
                Kind::Col(_) | Kind::Lit(_) | Kind::Wildcard(_) => Vec::new(),
                Kind::Binary(b) => vec![b.left.as_deref(), b.right.as_deref()],
                Kind::Alias(a) => vec![a.expr.as_deref()],
                Kind::IsNull(u) | Kind::Not(u) | Kind::IsNotNull(u) => vec![u.expr.as_deref()],
                Kind::Cast(c) => vec![c.expr.as_deref()],
                Kind::StrLenBytes(f)
                | Kind::StrLenChars(f)
                | Kind::StrToLowercase(f)
                | Kind::StrToUppercase(f) => vec![f.expr.as_deref()],
                Kind::StrContains(c) => vec![c.expr.as_deref()],
                Kind::StrStartsWith(s) => vec![s.expr.as_deref()],
                Kind::StrEndsWith(e) => vec![e.expr.as_deref()],
                Kind::StrExtract(e) => vec![e.expr.as_deref()],
                Kind::StrReplace(r) | Kind::StrReplaceAll(r) => vec![r.expr.as_deref()],
                Kind::StrStripChars(s) => vec![s.expr.as_deref()],
                Kind::StrSlice(s) => vec![s.expr.as_deref()],
                Kind::StrSplit(s) => vec![s.expr.as_deref()],
                Kind::StrPadStart(p) | Kind::StrPadEnd(p) => vec![p.expr.as_deref()],
            }
        }
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct Column {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct Literal {
    #[prost(oneof = "literal::Value", tags = "1, 2, 3, 4, 5")]
    pub value: Option<literal::Value>,
}

pub mod literal {
    use prost::Oneof;

    #[derive(Clone, PartialEq, Oneof)]
    pub enum Value {
        #[prost(int64, tag = "1")]
        IntVal(i64),
        #[prost(double, tag = "2")]
        FloatVal(f64),
        #[prost(bool, tag = "3")]
        BoolVal(bool),
        #[prost(string, tag = "4")]
        StringVal(String),
        #[prost(message, tag = "5")]
        NullVal(super::NullValue),
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct NullValue {}

#[derive(Clone, PartialEq, Message)]
pub struct Wildcard {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum BinaryOperator {
    Unspecified = 0,
    Add = 1,
    Sub = 2,
    Mul = 3,
    Div = 4,
    Eq = 5,
    Ne = 6,
    Lt = 7,
    Le = 8,
    Gt = 9,
    Ge = 10,
    And = 11,
    Or = 12,
    Mod = 13,
    Pow = 14,
    Xor = 15,
}

#[derive(Clone, PartialEq, Message)]
pub struct BinaryExpr {
    #[prost(message, optional, boxed, tag = "1")]
    pub left: Option<Box<Expr>>,
    #[prost(enumeration = "BinaryOperator", tag = "2")]
    pub op: i32,
    #[prost(message, optional, boxed, tag = "3")]
    pub right: Option<Box<Expr>>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Alias {
    #[prost(message, optional, boxed, tag = "1")]
    pub expr: Option<Box<Expr>>,
    #[prost(string, tag = "2")]
    pub name: String,
}

/// Operand of `IsNull`, `IsNotNull` and `Not`.
#[derive(Clone, PartialEq, Message)]
pub struct UnaryExpr {
    #[prost(message, optional, boxed, tag = "1")]
    pub expr: Option<Box<Expr>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum DataType {
    Unspecified = 0,
    Int64 = 1,
    Int32 = 2,
    Int16 = 3,
    Int8 = 4,
    Uint64 = 5,
    Uint32 = 6,
    Uint16 = 7,
    Uint8 = 8,
    Float64 = 9,
    Float32 = 10,
    Bool = 11,
    Utf8 = 12,
    Date = 13,
    Datetime = 14,
    Time = 15,
}

impl DataType {
    pub const ALL_NAMES: &'static [&'static str] = &[
        "Int64", "Int32", "Int16", "Int8", "UInt64", "UInt32", "UInt16", "UInt8", "Float64",
        "Float32", "Bool", "Utf8", "Date", "Datetime", "Time",
    ];

    /// Name used in the capability descriptor's `supported_dtypes`.
    pub fn name(self) -> &'static str {
        match self {
            DataType::Unspecified => "Unspecified",
            DataType::Int64 => "Int64",
            DataType::Int32 => "Int32",
            DataType::Int16 => "Int16",
            DataType::Int8 => "Int8",
            DataType::Uint64 => "UInt64",
            DataType::Uint32 => "UInt32",
            DataType::Uint16 => "UInt16",
            DataType::Uint8 => "UInt8",
            DataType::Float64 => "Float64",
            DataType::Float32 => "Float32",
            DataType::Bool => "Bool",
            DataType::Utf8 => "Utf8",
            DataType::Date => "Date",
            DataType::Datetime => "Datetime",
            DataType::Time => "Time",
        }
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct Cast {
    #[prost(message, optional, boxed, tag = "1")]
    pub expr: Option<Box<Expr>>,
    #[prost(enumeration = "DataType", tag = "2")]
    pub data_type: i32,
    /// Strict casts fail on unrepresentable values; non-strict casts yield null.
    #[prost(bool, tag = "3")]
    pub strict: bool,
}

#[derive(Clone, PartialEq, Message)]
pub struct StringFunction {
    #[prost(message, optional, boxed, tag = "1")]
    pub expr: Option<Box<Expr>>,
}

#[derive(Clone, PartialEq, Message)]
pub struct StringContains {
    #[prost(message, optional, boxed, tag = "1")]
    pub expr: Option<Box<Expr>>,
    #[prost(string, tag = "2")]
    pub pattern: String,
    /// Match `pattern` literally instead of as a regex.
    #[prost(bool, tag = "3")]
    pub literal: bool,
}

#[derive(Clone, PartialEq, Message)]
pub struct StringStartsWith {
    #[prost(message, optional, boxed, tag = "1")]
    pub expr: Option<Box<Expr>>,
    #[prost(string, tag = "2")]
    pub prefix: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct StringEndsWith {
    #[prost(message, optional, boxed, tag = "1")]
    pub expr: Option<Box<Expr>>,
    #[prost(string, tag = "2")]
    pub suffix: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct StringExtract {
    #[prost(message, optional, boxed, tag = "1")]
    pub expr: Option<Box<Expr>>,
    #[prost(string, tag = "2")]
    pub pattern: String,
    #[prost(uint32, tag = "3")]
    pub group_index: u32,
}

#[derive(Clone, PartialEq, Message)]
pub struct StringReplace {
    #[prost(message, optional, boxed, tag = "1")]
    pub expr: Option<Box<Expr>>,
    #[prost(string, tag = "2")]
    pub pattern: String,
    #[prost(string, tag = "3")]
    pub value: String,
    #[prost(bool, tag = "4")]
    pub literal: bool,
}

#[derive(Clone, PartialEq, Message)]
pub struct StringStripChars {
    #[prost(message, optional, boxed, tag = "1")]
    pub expr: Option<Box<Expr>>,
    /// Characters to strip; empty strips whitespace.
    #[prost(string, tag = "2")]
    pub chars: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct StringSlice {
    #[prost(message, optional, boxed, tag = "1")]
    pub expr: Option<Box<Expr>>,
    #[prost(int64, tag = "2")]
    pub offset: i64,
    #[prost(uint64, optional, tag = "3")]
    pub length: Option<u64>,
}

#[derive(Clone, PartialEq, Message)]
pub struct StringSplit {
    #[prost(message, optional, boxed, tag = "1")]
    pub expr: Option<Box<Expr>>,
    #[prost(string, tag = "2")]
    pub by: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct StringPad {
    #[prost(message, optional, boxed, tag = "1")]
    pub expr: Option<Box<Expr>>,
    #[prost(uint64, tag = "2")]
    pub length: u64,
    /// Exactly one character.
    #[prost(string, tag = "3")]
    pub fill_char: String,
}
