pub mod buffer;
pub mod cmdline;
pub mod config;
pub mod printer;
pub mod reader;
pub mod tokens;
pub mod types;

#[macro_use]
extern crate lazy_static;

pub use reader::{read_line, scheme_read, Outcome, Reader};
pub use types::{Expr, ListError, Pair, NIL};
