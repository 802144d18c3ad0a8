//! SQL script scanner

mod scan;
pub mod sql;

pub use scan::{Pos, ScanError, Scanner, Span, SplitResult, Splitter};
