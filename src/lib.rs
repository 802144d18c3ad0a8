//! SQL script splitter and comment stripper
#![warn(missing_docs)]

pub mod dialect;
pub mod lexer;

pub use lexer::sql::SqlScriptParser;
