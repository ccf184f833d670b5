//! Relational operators.
//!
//! Oneof tags 10..=49 hold core operators. Tags 50..=99 are reserved for
//! future operator families (join 50..=59, window 60..=69, UDF 70..=79,
//! sort/aggregate 80..=99) so independent extensions cannot collide. A tag is
//! never reused once assigned.

use prost::Message;

use super::scalar::Expr;

#[derive(Clone, PartialEq, Message)]
pub struct Node {
    /// Diagnostic id, only used in error messages.
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(oneof = "node::Kind", tags = "10, 11, 12, 13, 14, 15, 16")]
    pub kind: Option<node::Kind>,
}

pub mod node {
    use prost::Oneof;

    #[derive(Clone, PartialEq, Oneof)]
    pub enum Kind {
        #[prost(message, tag = "10")]
        MemoryScan(super::MemoryScan),
        #[prost(message, tag = "11")]
        CsvScan(super::CsvScan),
        #[prost(message, tag = "12")]
        ParquetScan(super::ParquetScan),
        #[prost(message, tag = "13")]
        Project(super::Project),
        #[prost(message, tag = "14")]
        Filter(super::Filter),
        #[prost(message, tag = "15")]
        WithColumns(super::WithColumns),
        #[prost(message, tag = "16")]
        Limit(super::Limit),
    }

    impl Kind {
        /// Every operator name this IR version defines, in tag order.
        pub const ALL_NAMES: &'static [&'static str] = &[
            "MemoryScan",
            "CsvScan",
            "ParquetScan",
            "Project",
            "Filter",
            "WithColumns",
            "Limit",
        ];

        /// Name used in the capability descriptor's `supported_nodes`.
        pub fn name(&self) -> &'static str {
            match self {
                Kind::MemoryScan(_) => "MemoryScan",
                Kind::CsvScan(_) => "CsvScan",
                Kind::ParquetScan(_) => "ParquetScan",
                Kind::Project(_) => "Project",
                Kind::Filter(_) => "Filter",
                Kind::WithColumns(_) => "WithColumns",
                Kind::Limit(_) => "Limit",
            }
        }

        /// The single child operator, if this is not a leaf.
        pub fn input(&self) -> Option<&Option<Box<super::Node>>> {
            match self {
                Kind::MemoryScan(_) | Kind::CsvScan(_) | Kind::ParquetScan(_) => None,
                Kind::Project(p) => Some(&p.input),
                Kind::Filter(f) => Some(&f.input),
                Kind::WithColumns(w) => Some(&w.input),
                Kind::Limit(l) => Some(&l.input),
            }
        }
    }
}

/// Scan of the caller-supplied frame. An empty `column_names` keeps every column.
#[derive(Clone, PartialEq, Message)]
pub struct MemoryScan {
    #[prost(string, repeated, tag = "1")]
    pub column_names: Vec<String>,
}

#[derive(Clone, PartialEq, Message)]
pub struct CsvScan {
    #[prost(string, tag = "1")]
    pub path: String,
    /// Defaults to `true` when absent.
    #[prost(bool, optional, tag = "2")]
    pub has_header: Option<bool>,
    /// Single-byte separator; empty means `,`.
    #[prost(string, tag = "3")]
    pub separator: String,
    #[prost(uint64, optional, tag = "4")]
    pub infer_schema_length: Option<u64>,
}

#[derive(Clone, PartialEq, Message)]
pub struct ParquetScan {
    #[prost(string, tag = "1")]
    pub path: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct Project {
    #[prost(message, optional, boxed, tag = "1")]
    pub input: Option<Box<Node>>,
    #[prost(message, repeated, tag = "2")]
    pub expressions: Vec<Expr>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Filter {
    #[prost(message, optional, boxed, tag = "1")]
    pub input: Option<Box<Node>>,
    #[prost(message, optional, tag = "2")]
    pub predicate: Option<Expr>,
}

#[derive(Clone, PartialEq, Message)]
pub struct WithColumns {
    #[prost(message, optional, boxed, tag = "1")]
    pub input: Option<Box<Node>>,
    #[prost(message, repeated, tag = "2")]
    pub expressions: Vec<Expr>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Limit {
    #[prost(message, optional, boxed, tag = "1")]
    pub input: Option<Box<Node>>,
    #[prost(uint64, tag = "2")]
    pub n: u64,
}
