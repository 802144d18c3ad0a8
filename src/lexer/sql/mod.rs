//! SQL script tokenizer: statement splitting and comment removal
//!
//! The tokenizer only tracks what is needed to find statement boundaries and
//! comments: string literals, line comments, block comments and optimizer
//! hints. Everything else is plain [`Context::Normal`] text.
use std::borrow::Cow;
use std::convert::Infallible;

pub use fallible_iterator::FallibleIterator;
use log::{debug, trace};
use memchr::{memchr, memchr2, memmem};

use crate::dialect::{DatabaseType, Dialect};
pub use crate::lexer::scan::Splitter;
use crate::lexer::scan::SplitResult;
use crate::lexer::{Scanner, Span};

mod error;

pub use error::Error;

/// Lexical context of a span
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Context {
    /// Outside of any literal or comment
    Normal,
    /// `'...'`
    SingleQuote,
    /// `"..."`
    DoubleQuote,
    /// `-- ...` up to (excluding) the end of line
    LineComment,
    /// `/* ... */`
    BlockComment,
    /// `/*+ ... */`: optimizer hint, kept by comment removal
    HintComment,
}

impl Context {
    /// `'...'` or `"..."`
    pub fn is_literal(self) -> bool {
        matches!(self, Self::SingleQuote | Self::DoubleQuote)
    }

    /// Line or block comment (hints excluded)
    pub fn is_comment(self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }
}

/// Token classification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TokenType {
    /// Lexical context of the whole token
    pub context: Context,
    /// `false` when the input ends before the closing quote or `*/`
    pub closed: bool,
}

impl TokenType {
    fn closed(context: Context) -> Self {
        Self {
            context,
            closed: true,
        }
    }
}

/// Classified span of a script
pub type Token<'input> = Span<'input, TokenType>;

/// Whether `token` is a statement terminator (`;` outside of literals and
/// comments)
pub fn is_terminator(token: &Token<'_>) -> bool {
    token.token_type.context == Context::Normal && token.text == ";"
}

/// Lenient tokenizer: never fails, unterminated literals and comments extend
/// to the end of the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tokenizer {
    escapes: bool,
}

impl Tokenizer {
    /// `escapes`: whether `\` escapes the next character inside literals
    pub fn new(escapes: bool) -> Tokenizer {
        Tokenizer { escapes }
    }

    /// Whether `\` escapes the next character inside literals
    pub fn escapes(&self) -> bool {
        self.escapes
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Splitter for Tokenizer {
    type Error = Infallible;
    type TokenType = TokenType;

    fn split<'input>(
        &mut self,
        data: &'input str,
    ) -> SplitResult<'input, TokenType, Infallible> {
        let bytes = data.as_bytes();
        debug_assert!(!bytes.is_empty());
        let (token_type, end) = match bytes[0] {
            b';' => (TokenType::closed(Context::Normal), 1),
            b'\'' => literal(bytes, Context::SingleQuote, b'\'', self.escapes),
            b'"' => literal(bytes, Context::DoubleQuote, b'"', self.escapes),
            b'-' if bytes.get(1) == Some(&b'-') => {
                // the newline is not part of the comment
                let end = memchr(b'\n', bytes).unwrap_or(bytes.len());
                (TokenType::closed(Context::LineComment), end)
            }
            b'/' if bytes.get(1) == Some(&b'*') => {
                if bytes.get(2) == Some(&b'+') {
                    block_comment(bytes, Context::HintComment, 3)
                } else {
                    block_comment(bytes, Context::BlockComment, 2)
                }
            }
            _ => (TokenType::closed(Context::Normal), normal(bytes)),
        };
        trace!(target: "scanner", "{:?} ({} bytes)", token_type, end);
        Ok((Some((&data[..end], token_type)), end))
    }
}

/// Up to (excluding) the next literal, comment or terminator
fn normal(data: &[u8]) -> usize {
    // data[0] is not the start of a literal, comment or terminator => skip(1)
    let mut i = 1;
    while i < data.len() {
        match data[i] {
            b'\'' | b'"' | b';' => return i,
            b'-' if data.get(i + 1) == Some(&b'-') => return i,
            b'/' if data.get(i + 1) == Some(&b'*') => return i,
            _ => i += 1,
        }
    }
    data.len()
}

fn literal(data: &[u8], context: Context, quote: u8, escapes: bool) -> (TokenType, usize) {
    debug_assert_eq!(data[0], quote);
    // data[0] == quote => skip(1)
    let mut i = 1;
    while i < data.len() {
        let found = if escapes {
            memchr2(quote, b'\\', &data[i..])
        } else {
            memchr(quote, &data[i..])
        };
        match found {
            Some(j) if data[i + j] == quote => {
                return (TokenType::closed(context), i + j + 1);
            }
            Some(j) => {
                // escaped char
                i += j + 2;
            }
            None => break,
        }
    }
    let token_type = TokenType {
        context,
        closed: false,
    };
    (token_type, data.len())
}

fn block_comment(data: &[u8], context: Context, marker: usize) -> (TokenType, usize) {
    debug_assert!(data.starts_with(b"/*"));
    match memmem::find(&data[marker..], b"*/") {
        Some(i) => (TokenType::closed(context), marker + i + 2),
        None => {
            let token_type = TokenType {
                context,
                closed: false,
            };
            (token_type, data.len())
        }
    }
}

/// Strict tokenizer: same tokens as [`Tokenizer`] but fails on unterminated
/// literals and block comments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Strict(pub Tokenizer);

impl Splitter for Strict {
    type Error = Error;
    type TokenType = TokenType;

    fn split<'input>(&mut self, data: &'input str) -> SplitResult<'input, TokenType, Error> {
        let (token, amt) = infallible(self.0.split(data));
        if let Some((_, TokenType { context, closed: false })) = token {
            return Err(if context.is_literal() {
                Error::UnterminatedLiteral(None)
            } else {
                Error::UnterminatedBlockComment(None)
            });
        }
        Ok((token, amt))
    }
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => match e {},
    }
}

fn is_blank(statement: &str) -> bool {
    statement.trim().is_empty()
}

/// Statements of a script, in source order.
///
/// Each statement is the verbatim text between two terminators (the
/// terminators excluded). Blank statements are skipped.
pub struct Statements<'input, S: Splitter<TokenType = TokenType>> {
    input: &'input str,
    scanner: Scanner<'input, S>,
    /// start of the current statement
    start: usize,
}

impl<'input, S: Splitter<TokenType = TokenType>> Statements<'input, S> {
    /// Constructor
    pub fn new(input: &'input str, splitter: S) -> Self {
        Statements {
            input,
            scanner: Scanner::new(input, splitter),
            start: 0,
        }
    }

    /// Current line number
    pub fn line(&self) -> u64 {
        self.scanner.line()
    }

    /// Current column number
    pub fn column(&self) -> usize {
        self.scanner.column()
    }
}

impl<'input, S: Splitter<TokenType = TokenType>> FallibleIterator for Statements<'input, S> {
    type Item = &'input str;
    type Error = S::Error;

    fn next(&mut self) -> Result<Option<&'input str>, S::Error> {
        loop {
            let statement = match Scanner::scan(&mut self.scanner)? {
                Some(token) if is_terminator(&token) => {
                    let statement = &self.input[self.start..token.start];
                    self.start = token.end();
                    statement
                }
                Some(_) => continue,
                None if self.start < self.input.len() => {
                    let statement = &self.input[self.start..];
                    self.start = self.input.len();
                    statement
                }
                None => return Ok(None),
            };
            if !is_blank(statement) {
                debug!(target: "scanner", "statement ending at line {}: {} bytes", self.line(), statement.len());
                return Ok(Some(statement));
            }
        }
    }
}

/// Splits SQL scripts into statements and strips comments.
///
/// ```
/// use sql_script_parser::SqlScriptParser;
///
/// let parser = SqlScriptParser::new(true);
/// assert_eq!(vec!["SELECT 1", "SELECT '2;3'"], parser.split("SELECT 1;SELECT '2;3';"));
/// assert_eq!(Some("SELECT  1".into()), parser.remove_comments("SELECT /* one */ 1"));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SqlScriptParser {
    tokenizer: Tokenizer,
}

impl SqlScriptParser {
    /// `escapes`: whether `\` escapes the next character inside literals
    pub fn new(escapes: bool) -> SqlScriptParser {
        SqlScriptParser {
            tokenizer: Tokenizer::new(escapes),
        }
    }

    /// Parser for the string escaping convention of `dialect`
    pub fn for_dialect<D: Dialect + ?Sized>(dialect: &D) -> SqlScriptParser {
        debug!(
            "{} escapes: {}",
            dialect.name(),
            dialect.escapes_enabled()
        );
        Self::new(dialect.escapes_enabled())
    }

    /// Parser for the built-in dialect registered under `name`
    pub fn for_database(name: &str) -> Option<SqlScriptParser> {
        DatabaseType::from_name(name).map(|database_type| Self::for_dialect(&database_type))
    }

    /// Whether `\` escapes the next character inside literals
    pub fn escapes(&self) -> bool {
        self.tokenizer.escapes()
    }

    /// Classified spans of `script`, covering the whole input
    pub fn tokens<'input>(&self, script: &'input str) -> Scanner<'input, Tokenizer> {
        Scanner::new(script, self.tokenizer)
    }

    /// Lazily split `script` into statements
    pub fn statements<'input>(&self, script: &'input str) -> Statements<'input, Tokenizer> {
        Statements::new(script, self.tokenizer)
    }

    /// Like [`statements`](Self::statements) but fails on an unterminated
    /// literal or block comment.
    pub fn strict_statements<'input>(&self, script: &'input str) -> Statements<'input, Strict> {
        Statements::new(script, Strict(self.tokenizer))
    }

    /// Check that every literal and block comment of `script` is terminated.
    pub fn check(&self, script: &str) -> Result<(), Error> {
        let mut scanner = Scanner::new(script, Strict(self.tokenizer));
        while Scanner::scan(&mut scanner)?.is_some() {}
        Ok(())
    }

    /// Split `script` on terminators found outside of literals and comments.
    ///
    /// Statements are returned verbatim, blank ones are dropped.
    /// An absent script has no statement.
    pub fn split<'input, I>(&self, script: I) -> Vec<&'input str>
    where
        I: Into<Option<&'input str>>,
    {
        match script.into() {
            Some(script) => infallible(self.statements(script).collect()),
            None => Vec::new(),
        }
    }

    /// Remove line and block comments from `sql`, keeping literals and
    /// optimizer hints untouched.
    ///
    /// Comments are removed without replacement, whitespace around them is
    /// kept. The end of line following a line comment is kept.
    /// An absent input gives an absent output.
    pub fn remove_comments<'input, I>(&self, sql: I) -> Option<Cow<'input, str>>
    where
        I: Into<Option<&'input str>>,
    {
        let sql = sql.into()?;
        let mut cleaned: Option<String> = None;
        let mut tokens = self.tokens(sql);
        while let Some(token) = infallible(Scanner::scan(&mut tokens)) {
            if token.token_type.context.is_comment() {
                trace!(target: "scanner", "removing {:?}", token.text);
                if cleaned.is_none() {
                    // everything before the first comment is kept as is
                    let mut buf = String::with_capacity(sql.len());
                    buf.push_str(&sql[..token.start]);
                    cleaned = Some(buf);
                }
            } else if let Some(ref mut buf) = cleaned {
                buf.push_str(token.text);
            }
        }
        Some(cleaned.map_or(Cow::Borrowed(sql), Cow::Owned))
    }
}

impl Default for SqlScriptParser {
    fn default() -> Self {
        Self::new(true)
    }
}
