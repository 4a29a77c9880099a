use crate::printer::PrintMode;
use crate::reader::DEFAULT_MAX_DEPTH;
use std::fmt;
use std::path::PathBuf;

pub const USAGE: &str = "\
usage: read_print [--max-depth N] [--repr] [--no-history] [FILE]

Reads expressions and prints them back. With FILE, reads every expression in
the file; otherwise starts an interactive prompt.

    --max-depth N   fail on lists or quotes nested more than N levels deep
    --repr          print the constructor form, e.g. Pair(1, Pair(2, nil))
    --no-history    neither load nor save the prompt history
    -h, --help      show this message
";

/// Kept in the user's data directory.
pub const HISTORY_FILE: &str = ".scheme_reader_history";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub max_depth: usize,
    pub print_mode: PrintMode,
    pub input: Option<PathBuf>,
    /// Where the interactive prompt keeps its history, if anywhere.
    pub history: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            print_mode: PrintMode::Display,
            input: None,
            history: dirs::data_dir().map(|dir| dir.join(HISTORY_FILE)),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    HelpRequested,
    MissingValue(&'static str),
    BadDepth(String),
    UnknownFlag(String),
    TooManyInputs,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::HelpRequested => write!(f, "help requested"),
            ConfigError::MissingValue(flag) => write!(f, "{} expects a value", flag),
            ConfigError::BadDepth(value) => {
                write!(f, "--max-depth expects a positive integer, got '{}'", value)
            }
            ConfigError::UnknownFlag(flag) => write!(f, "unknown option '{}'", flag),
            ConfigError::TooManyInputs => write!(f, "at most one input file may be given"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Parses `std::env::args()`-style arguments; the first is the program name.
    pub fn from_args(args: &[String]) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        let mut args = args.iter().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Err(ConfigError::HelpRequested),
                "--repr" => config.print_mode = PrintMode::Repr,
                "--no-history" => config.history = None,
                "--max-depth" => {
                    let value = args.next().ok_or(ConfigError::MissingValue("--max-depth"))?;
                    config.max_depth = match value.parse::<usize>() {
                        Ok(depth) if depth > 0 => depth,
                        _ => return Err(ConfigError::BadDepth(value.clone())),
                    };
                }
                flag if flag.starts_with('-') => {
                    return Err(ConfigError::UnknownFlag(String::from(flag)))
                }
                path => {
                    if config.input.is_some() {
                        return Err(ConfigError::TooManyInputs);
                    }
                    config.input = Some(PathBuf::from(path));
                }
            }
        }
        Ok(config)
    }
}
