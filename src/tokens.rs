use crate::types::Expr;
use regex::Regex;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Open,
    Close,
    Quote,
    Dot,
    /// The literal `nil`, read as the empty list.
    Nil,
    /// A number, boolean or symbol, already converted to its value.
    Atom(Expr),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Open => write!(f, "("),
            Token::Close => write!(f, ")"),
            Token::Quote => write!(f, "'"),
            Token::Dot => write!(f, "."),
            Token::Nil => write!(f, "nil"),
            Token::Atom(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizerError {
    InvalidToken(String),
}

impl fmt::Display for TokenizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizerError::InvalidToken(token) => write!(f, "invalid token: {}", token),
        }
    }
}

impl std::error::Error for TokenizerError {}

// Characters with a meaning in full Scheme that this reader does not support.
const RESERVED: &[char] = &['"', '[', ']', '{', '}', '`', ',', '|', '\\'];

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(
        r#"(?x)                          # ignore whitespace in this pattern & allow comments
            ^(
                [()']                    # delimiters and the quote abbreviation
                |;.*                     # comment, up to the end of the line
                |[^\s()';]+              # one or more plain characters
            )
        "#
    )
    .unwrap();
    static ref NUMBER_RE: Regex =
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").unwrap();
}

fn create_token(captured: &str) -> Result<Token, TokenizerError> {
    match captured {
        "(" => Ok(Token::Open),
        ")" => Ok(Token::Close),
        "'" => Ok(Token::Quote),
        "." => Ok(Token::Dot),
        _ => create_atom(captured),
    }
}

fn create_atom(chars: &str) -> Result<Token, TokenizerError> {
    let lowered = chars.to_lowercase();
    match lowered.as_str() {
        "nil" => return Ok(Token::Nil),
        "#t" | "true" => return Ok(Token::Atom(Expr::Bool(true))),
        "#f" | "false" => return Ok(Token::Atom(Expr::Bool(false))),
        _ => (),
    }
    if NUMBER_RE.is_match(&lowered) {
        // Integers too large for i64 fall through to floats.
        if let Ok(value) = lowered.parse::<i64>() {
            return Ok(Token::Atom(Expr::Integer(value)));
        }
        // Out-of-range literals like `1e400` parse to infinity, which has no written form.
        return match lowered.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Token::Atom(Expr::Float(value))),
            _ => Err(TokenizerError::InvalidToken(String::from(chars))),
        };
    }
    if lowered.starts_with('#') || lowered.contains(RESERVED) {
        return Err(TokenizerError::InvalidToken(String::from(chars)));
    }
    Ok(Token::Atom(Expr::symbol(&lowered)))
}

/// Splits one line into tokens. Comments are dropped.
pub fn tokenize(line: &str) -> Result<Vec<Token>, TokenizerError> {
    let mut input = line.trim_start();
    let mut tokens = Vec::new();
    // Every non-whitespace character starts a match, so this only stops at the end of the line.
    while let Some(found) = TOKEN_RE.find(input) {
        let captured = found.as_str();
        if !captured.starts_with(';') {
            tokens.push(create_token(captured)?);
        }
        input = input[found.end()..].trim_start();
    }
    Ok(tokens)
}
