use std::error;
use std::fmt;

use crate::lexer::scan::{Pos, ScanError};

/// Errors reported by strict scanning
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Missing closing quote or double-quote
    UnterminatedLiteral(Option<Pos>),
    /// Missing `*/` (block comment or hint)
    UnterminatedBlockComment(Option<Pos>),
}

impl Error {
    /// Where the faulty token starts
    pub fn pos(&self) -> Option<Pos> {
        match *self {
            Self::UnterminatedLiteral(pos) | Self::UnterminatedBlockComment(pos) => pos,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::UnterminatedLiteral(_) => "non-terminated literal",
            Self::UnterminatedBlockComment(_) => "non-terminated block comment",
        };
        match self.pos() {
            Some(pos) => write!(f, "{msg} at {pos}"),
            None => f.write_str(msg),
        }
    }
}

impl error::Error for Error {}

impl ScanError for Error {
    fn position(&mut self, p: Pos) {
        match *self {
            Self::UnterminatedLiteral(ref mut pos) => *pos = Some(p),
            Self::UnterminatedBlockComment(ref mut pos) => *pos = Some(p),
        }
    }
}
