use crate::tokens::{tokenize, Token, TokenizerError};
use linefeed::{Interface, ReadResult, Signal, Terminal};
use std::collections::VecDeque;
use std::{fmt, io, iter};

pub const PROMPT: &str = "scm> ";

pub type Result<T> = std::result::Result<T, BufferError>;

#[derive(Debug)]
pub enum BufferError {
    Tokenizer(TokenizerError),
    Io(io::Error),
    Signal(Signal),
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::Tokenizer(e) => write!(f, "{}", e),
            BufferError::Io(e) => write!(f, "io error: {}", e),
            BufferError::Signal(sig) => write!(f, "received signal {:?}", sig),
        }
    }
}

impl std::error::Error for BufferError {}

impl From<TokenizerError> for BufferError {
    fn from(e: TokenizerError) -> Self {
        Self::Tokenizer(e)
    }
}

impl From<io::Error> for BufferError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Peekable, forward-only stream of tokens. `None` means no more input is available.
pub trait TokenSource {
    fn peek(&mut self) -> Result<Option<&Token>>;
    fn pop(&mut self) -> Result<Option<Token>>;
}

/// Supplies lines of text on demand.
pub trait LineSource {
    fn next_line(&mut self) -> Result<Option<String>>;
}

/// A fixed batch of lines.
pub struct Lines<I> {
    lines: I,
}

impl<I: Iterator<Item = String>> LineSource for Lines<I> {
    fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self.lines.next())
    }
}

/// Lines typed at a terminal. The first line gets the prompt; later lines, read while an
/// expression is still open, get a blank prompt of the same width.
pub struct Prompter<'a, T: Terminal> {
    interface: &'a Interface<T>,
    prompt: String,
    continuation: String,
    started: bool,
}

impl<'a, T: Terminal> Prompter<'a, T> {
    pub fn new(interface: &'a Interface<T>, prompt: &str) -> Self {
        Self {
            interface,
            prompt: String::from(prompt),
            continuation: " ".repeat(prompt.chars().count()),
            started: false,
        }
    }
}

impl<T: Terminal> LineSource for Prompter<'_, T> {
    fn next_line(&mut self) -> Result<Option<String>> {
        let prompt = match self.started {
            true => &self.continuation,
            false => &self.prompt,
        };
        self.interface.set_prompt(prompt)?;
        self.started = true;
        match self.interface.read_line()? {
            ReadResult::Eof => Ok(None),
            ReadResult::Signal(sig) => Err(BufferError::Signal(sig)),
            ReadResult::Input(line) => {
                if !line.trim().is_empty() {
                    self.interface.add_history_unique(line.clone());
                }
                Ok(Some(line))
            }
        }
    }
}

/// Tokens pulled lazily from a `LineSource`, one line at a time. A new line is only
/// requested once every token of the current one has been consumed.
pub struct Buffer<L> {
    source: L,
    current: VecDeque<Token>,
    line_number: usize,
    exhausted: bool,
}

impl<L: LineSource> Buffer<L> {
    pub fn new(source: L) -> Self {
        Self {
            source,
            current: VecDeque::new(),
            line_number: 0,
            exhausted: false,
        }
    }

    /// Whether tokens remain on the line most recently read.
    pub fn more_on_line(&self) -> bool {
        !self.current.is_empty()
    }

    /// Number of lines read so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Whether the line source has reported that it has nothing more to give.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn fill(&mut self) -> Result<()> {
        while self.current.is_empty() && !self.exhausted {
            match self.source.next_line()? {
                None => {
                    log::trace!("line source exhausted after {} lines", self.line_number);
                    self.exhausted = true;
                }
                Some(line) => {
                    self.line_number += 1;
                    let tokens = tokenize(&line)?;
                    log::trace!("line {}: {:?}", self.line_number, tokens);
                    self.current.extend(tokens);
                }
            }
        }
        Ok(())
    }
}

impl<L: LineSource> TokenSource for Buffer<L> {
    fn peek(&mut self) -> Result<Option<&Token>> {
        self.fill()?;
        Ok(self.current.front())
    }

    fn pop(&mut self) -> Result<Option<Token>> {
        self.fill()?;
        Ok(self.current.pop_front())
    }
}

pub fn buffer_lines<I>(lines: I) -> Buffer<Lines<I::IntoIter>>
where
    I: IntoIterator<Item = String>,
{
    Buffer::new(Lines {
        lines: lines.into_iter(),
    })
}

pub fn buffer_line(line: &str) -> Buffer<Lines<iter::Once<String>>> {
    buffer_lines(iter::once(String::from(line)))
}

pub fn buffer_input<'a, T: Terminal>(
    interface: &'a Interface<T>,
    prompt: &str,
) -> Buffer<Prompter<'a, T>> {
    Buffer::new(Prompter::new(interface, prompt))
}
