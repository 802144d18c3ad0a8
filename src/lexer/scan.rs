//! Adaptation/port of [Go scanner](http://tip.golang.org/pkg/bufio/#Scanner).

use fallible_iterator::FallibleIterator;
use log::debug;
use memchr::{memchr_iter, memrchr};

use std::convert::Infallible;
use std::error::Error;
use std::fmt;

/// Position of a token in the input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pos {
    /// line number (1-based)
    pub line: u64,
    /// column number (1-based, in chars)
    pub column: usize,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line: {}, column: {}", self.line, self.column)
    }
}

/// Error reported by a [`Splitter`]
pub trait ScanError: Error + Sized {
    /// Record where the faulty token starts.
    fn position(&mut self, pos: Pos);
}

impl ScanError for Infallible {
    fn position(&mut self, _: Pos) {
        match *self {}
    }
}

/// The `(&str, TokenType)` is the token.
/// And the `usize` is the amount of bytes to consume.
pub type SplitResult<'input, TokenType, Error> =
    Result<(Option<(&'input str, TokenType)>, usize), Error>;

/// Split function used to tokenize the input
pub trait Splitter: Sized {
    /// Error returned when the input cannot be tokenized
    type Error: ScanError;
    /// Classification of the returned tokens
    type TokenType: Copy;

    /// The argument is the remaining unprocessed input.
    ///
    /// If the returned error is non-nil, scanning stops and the error
    /// is returned to the client.
    ///
    /// The function is never called with an empty data slice.
    fn split<'input>(
        &mut self,
        data: &'input str,
    ) -> SplitResult<'input, Self::TokenType, Self::Error>;
}

/// A classified slice of the input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span<'input, TokenType> {
    /// Input text covered by this span
    pub text: &'input str,
    /// Token classification
    pub token_type: TokenType,
    /// Byte offset of the first byte of `text` in the input
    pub start: usize,
}

impl<TokenType> Span<'_, TokenType> {
    /// Byte offset just past the end of this span (exclusive)
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Successive calls to the `scan` method will step through the 'tokens'
/// of the input, skipping the bytes between the tokens.
///
/// Scanning stops unrecoverably at the end of the input or on the first
/// error.
pub struct Scanner<'input, S: Splitter> {
    /// The input provided by the client.
    input: &'input str,
    /// The function to tokenize the input.
    splitter: S,
    /// byte offset of `input` in the whole input
    offset: usize,
    /// current line number
    line: u64,
    /// current column number (char offset, not byte offset)
    column: usize,
}

impl<'input, S: Splitter> Scanner<'input, S> {
    /// Constructor
    pub fn new(input: &'input str, splitter: S) -> Scanner<'input, S> {
        Scanner {
            input,
            splitter,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Current line number
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Current column number (char offset, not byte offset)
    pub fn column(&self) -> usize {
        self.column
    }

    /// Current byte offset
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Current position
    pub fn position(&self) -> Pos {
        Pos {
            line: self.line,
            column: self.column,
        }
    }

    /// Associated splitter
    pub fn splitter(&self) -> &S {
        &self.splitter
    }

    /// Reset the scanner such that it behaves as if it had never been used.
    pub fn reset(&mut self, input: &'input str) {
        self.input = input;
        self.offset = 0;
        self.line = 1;
        self.column = 1;
    }
}

type ScanResult<'input, TokenType, Error> = Result<Option<Span<'input, TokenType>>, Error>;

impl<'input, S: Splitter> Scanner<'input, S> {
    /// Advance the Scanner to next token.
    /// Return the token as a span of the input.
    /// Return `None` when the end of the input is reached.
    /// Return any error reported by the splitter.
    pub fn scan(&mut self) -> ScanResult<'input, S::TokenType, S::Error> {
        debug!(target: "scanner", "scan(line: {}, column: {})", self.line, self.column);
        // Loop until we have a token.
        while !self.input.is_empty() {
            let data = self.input;
            match self.splitter.split(data) {
                Err(mut e) => {
                    e.position(Scanner::position(self));
                    return Err(e);
                }
                Ok((None, 0)) => {
                    // Nothing more can be extracted
                    break;
                }
                Ok((None, amt)) => {
                    // Ignore/skip this data
                    self.consume(amt);
                }
                Ok((Some((text, token_type)), amt)) => {
                    let start = self.offset;
                    self.consume(amt);
                    return Ok(Some(Span {
                        text,
                        token_type,
                        start,
                    }));
                }
            }
        }
        Ok(None)
    }

    /// Consume `amt` bytes of the input.
    fn consume(&mut self, amt: usize) {
        debug!(target: "scanner", "consume({})", amt);
        #[cfg(feature = "extra_checks")]
        assert!(
            amt > 0 && self.input.is_char_boundary(amt),
            "invalid amount consumed: {amt}"
        );
        debug_assert!(amt <= self.input.len());
        let (consumed, rest) = self.input.split_at(amt);
        let bytes = consumed.as_bytes();
        match memrchr(b'\n', bytes) {
            Some(i) => {
                self.line += memchr_iter(b'\n', bytes).count() as u64;
                self.column = 1 + consumed[i + 1..].chars().count();
            }
            None => self.column += consumed.chars().count(),
        }
        self.offset += amt;
        self.input = rest;
    }
}

impl<'input, S: Splitter> FallibleIterator for Scanner<'input, S> {
    type Item = Span<'input, S::TokenType>;
    type Error = S::Error;

    fn next(&mut self) -> Result<Option<Self::Item>, Self::Error> {
        Scanner::scan(self)
    }
}

impl<S: Splitter> fmt::Debug for Scanner<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("input", &self.input)
            .field("offset", &self.offset)
            .field("line", &self.line)
            .field("column", &self.column)
            .finish()
    }
}
