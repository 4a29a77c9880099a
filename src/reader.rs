use crate::buffer::{self, BufferError, TokenSource, PROMPT};
use crate::config::Config;
use crate::tokens::Token;
use crate::types::{Expr, NIL};
use linefeed::{Interface, Terminal};
use std::fmt;

/// How many lists or quotes may be open at once before reading gives up. Reading, printing,
/// comparing and dropping all recurse once per level, so this has to fit a 2 MB thread stack
/// in a debug build.
pub const DEFAULT_MAX_DEPTH: usize = 256;

pub type Result<T = Expr> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Input ran out before an expression was complete. A line-at-a-time caller can supply
    /// more input and try again.
    Eof,
    Syntax(SyntaxError),
    TooDeep(usize),
    Buffer(BufferError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxError {
    Unexpected(Token),
    ExpectedOneAfterDot(Token),
    TrailingTokens,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxError::Unexpected(token) => write!(f, "unexpected token: {}", token),
            SyntaxError::ExpectedOneAfterDot(token) => {
                write!(f, "expected one element after ., found {}", token)
            }
            SyntaxError::TrailingTokens => {
                write!(f, "expected a single expression, but the line holds more")
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Eof => write!(f, "unexpected end of file"),
            Error::Syntax(e) => write!(f, "syntax error: {}", e),
            Error::TooDeep(limit) => write!(f, "nesting too deep: more than {} levels", limit),
            Error::Buffer(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<BufferError> for Error {
    fn from(e: BufferError) -> Self {
        Self::Buffer(e)
    }
}

impl From<SyntaxError> for Error {
    fn from(e: SyntaxError) -> Self {
        Self::Syntax(e)
    }
}

/// What a driver should do with the result of one read.
#[derive(Debug)]
pub enum Outcome {
    Complete(Expr),
    NeedMoreInput,
    Malformed(Error),
}

impl From<Result> for Outcome {
    fn from(result: Result) -> Self {
        match result {
            Ok(expr) => Outcome::Complete(expr),
            Err(Error::Eof) => Outcome::NeedMoreInput,
            Err(e) => Outcome::Malformed(e),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Reader {
    max_depth: usize,
}

impl Default for Reader {
    fn default() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }
}

impl Reader {
    pub fn new(config: &Config) -> Self {
        Self::with_max_depth(config.max_depth)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Reads exactly one expression, leaving `src` just past it.
    pub fn read<S: TokenSource + ?Sized>(&self, src: &mut S) -> Result {
        self.read_expr(src, 0)
    }

    /// Like `read`, but a source with nothing left in it gives `Ok(None)` rather than `Eof`.
    pub fn read_next<S: TokenSource + ?Sized>(&self, src: &mut S) -> Result<Option<Expr>> {
        match src.peek()? {
            None => Ok(None),
            Some(_) => self.read(src).map(Some),
        }
    }

    /// Reads every expression until the source runs dry.
    pub fn read_all<S: TokenSource + ?Sized>(&self, src: &mut S) -> Result<Vec<Expr>> {
        let mut exprs = Vec::new();
        while let Some(expr) = self.read_next(src)? {
            exprs.push(expr);
        }
        Ok(exprs)
    }

    fn deeper(&self, depth: usize) -> Result<usize> {
        match depth < self.max_depth {
            true => Ok(depth + 1),
            false => Err(Error::TooDeep(self.max_depth)),
        }
    }

    fn read_expr<S: TokenSource + ?Sized>(&self, src: &mut S, depth: usize) -> Result {
        match src.pop()?.ok_or(Error::Eof)? {
            Token::Nil => Ok(NIL),
            Token::Atom(value) => Ok(value),
            Token::Quote => {
                let quoted = self.read_expr(src, self.deeper(depth)?)?;
                Ok(Expr::list(vec![Expr::symbol("quote"), quoted]))
            }
            Token::Open => self.read_tail(src, self.deeper(depth)?),
            token => Err(SyntaxError::Unexpected(token).into()),
        }
    }

    // The opening paren has been consumed. Elements are gathered in order and folded into
    // pairs once the list closes, so only nesting, not length, costs stack.
    fn read_tail<S: TokenSource + ?Sized>(&self, src: &mut S, depth: usize) -> Result {
        let mut elements = Vec::new();
        loop {
            match src.peek()? {
                None => return Err(Error::Eof),
                Some(Token::Close) => {
                    src.pop()?;
                    return Ok(Expr::list(elements));
                }
                Some(Token::Dot) if elements.is_empty() => {
                    return Err(SyntaxError::Unexpected(Token::Dot).into());
                }
                Some(Token::Dot) => {
                    src.pop()?;
                    let tail = self.read_expr(src, depth)?;
                    return match src.pop()? {
                        Some(Token::Close) => Ok(Expr::dotted(elements, tail)),
                        Some(token) => Err(SyntaxError::ExpectedOneAfterDot(token).into()),
                        None => Err(Error::Eof),
                    };
                }
                Some(_) => elements.push(self.read_expr(src, depth)?),
            }
        }
    }
}

/// Reads one expression with the default nesting limit.
pub fn scheme_read<S: TokenSource + ?Sized>(src: &mut S) -> Result {
    Reader::default().read(src)
}

/// Parses a line holding exactly one expression.
pub fn read_line(line: &str) -> Result {
    let mut src = buffer::buffer_line(line);
    let expr = scheme_read(&mut src)?;
    match src.more_on_line() {
        true => Err(SyntaxError::TrailingTokens.into()),
        false => Ok(expr),
    }
}

/// Reads the first expression from a batch of lines.
pub fn read_lines<I: IntoIterator<Item = String>>(lines: I) -> Result {
    scheme_read(&mut buffer::buffer_lines(lines))
}

/// Prompts at the terminal until one expression has been read.
pub fn read_interactive<T: Terminal>(interface: &Interface<T>) -> Result {
    scheme_read(&mut buffer::buffer_input(interface, PROMPT))
}
