use crate::buffer::{self, BufferError, LineSource, TokenSource, PROMPT};
use crate::config::{Config, ConfigError, USAGE};
use crate::printer::{self, PrintMode};
use crate::reader::{self, Outcome, Reader};
use ansi_term::Colour;
use linefeed::{DefaultTerminal, Interface, Signal, Terminal};
use std::io::Write;
use std::path::Path;
use std::{fmt, fs, io};

#[derive(Debug)]
pub enum Error {
    Config(ConfigError),
    Io(io::Error),
    Read(reader::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "{}\n\n{}", e, USAGE),
            Error::Io(e) => write!(f, "io error: {}", e),
            Error::Read(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<reader::Error> for Error {
    fn from(e: reader::Error) -> Self {
        Self::Read(e)
    }
}

pub fn setup(config: &Config) -> io::Result<Interface<DefaultTerminal>> {
    let interface = Interface::new("scheme-reader")?;
    interface.set_report_signal(Signal::Interrupt, true);
    load_history(&interface, config);
    Ok(interface)
}

/// A missing or unreadable history file just means starting with none.
pub fn load_history<T: Terminal>(interface: &Interface<T>, config: &Config) {
    if let Some(path) = &config.history {
        if let Err(e) = interface.load_history(path) {
            log::debug!("no history loaded from {}: {}", path.display(), e);
        }
    }
}

pub fn save_history<T: Terminal>(interface: &Interface<T>, config: &Config) -> io::Result<()> {
    match &config.history {
        Some(path) => interface.save_history(path),
        None => Ok(()),
    }
}

/// `Error: ...`, in red when stdout is a terminal.
pub fn error_text(e: &dyn fmt::Display) -> String {
    let text = format!("Error: {}", e);
    match atty::is(atty::Stream::Stdout) {
        true => Colour::Red.paint(text).to_string(),
        false => text,
    }
}

/// Prompts for expressions and prints each one back until the terminal reaches end of input.
/// Every expression typed on one line is read before prompting again. Malformed input is
/// reported and the rest of its line discarded.
pub fn repl<T: Terminal>(
    interface: &Interface<T>,
    reader: &Reader,
    mode: PrintMode,
) -> io::Result<()> {
    loop {
        let mut src = buffer::buffer_input(interface, PROMPT);
        match src.peek() {
            Ok(Some(_)) => (),
            Ok(None) => break,
            Err(BufferError::Signal(sig)) => {
                writeln!(interface, "\n{:?}", sig)?;
                continue;
            }
            Err(e) => {
                writeln!(interface, "{}", error_text(&e))?;
                continue;
            }
        }
        while src.more_on_line() {
            let outcome = Outcome::from(reader.read(&mut src));
            log::debug!("read {:?} on line {}", outcome, src.line_number());
            match outcome {
                Outcome::Complete(expr) => {
                    writeln!(interface, "{}", printer::pr_str(&expr, mode))?;
                }
                // The terminal closed with an expression still open.
                Outcome::NeedMoreInput => {
                    writeln!(interface)?;
                    return Ok(());
                }
                Outcome::Malformed(reader::Error::Buffer(BufferError::Signal(sig))) => {
                    writeln!(interface, "\n{:?}", sig)?;
                    break;
                }
                Outcome::Malformed(e) => {
                    writeln!(interface, "{}", error_text(&e))?;
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Reads every expression from `src`, writing each to `out` as it is read. Stops at the
/// first malformed or incomplete expression.
pub fn print_all<L: LineSource, W: Write>(
    src: &mut buffer::Buffer<L>,
    reader: &Reader,
    mode: PrintMode,
    out: &mut W,
) -> Result<usize, Error> {
    let mut count = 0;
    while let Some(expr) = reader.read_next(src)? {
        writeln!(out, "{}", printer::pr_str(&expr, mode))?;
        count += 1;
    }
    log::debug!("read {} expressions from {} lines", count, src.line_number());
    Ok(count)
}

pub fn run_file(path: &Path, reader: &Reader, mode: PrintMode) -> Result<(), Error> {
    log::debug!("reading {}", path.display());
    let text = fs::read_to_string(path)?;
    let mut src = buffer::buffer_lines(text.lines().map(String::from));
    let stdout = io::stdout();
    print_all(&mut src, reader, mode, &mut stdout.lock())?;
    Ok(())
}

pub fn launch(args: Vec<String>) -> Result<(), Error> {
    let config = match Config::from_args(&args) {
        Err(ConfigError::HelpRequested) => {
            print!("{}", USAGE);
            return Ok(());
        }
        config => config?,
    };
    log::debug!("{:?}", config);
    let reader = Reader::new(&config);
    match &config.input {
        Some(path) => run_file(path, &reader, config.print_mode),
        None => {
            let interface = setup(&config)?;
            repl(&interface, &reader, config.print_mode)?;
            save_history(&interface, &config)?;
            Ok(())
        }
    }
}
