use crate::types::{Expr, Pair};
use itertools::Itertools;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    /// Surface syntax: `(1 2 . 3)`.
    Display,
    /// Constructor syntax: `Pair(1, Pair(2, 3))`.
    Repr,
}

pub fn pr_str(obj: &Expr, mode: PrintMode) -> String {
    match mode {
        PrintMode::Display => obj.to_string(),
        PrintMode::Repr => repr(obj),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Nil => write!(f, "()"),
            Expr::Integer(value) => write!(f, "{}", value),
            // Debug keeps the fractional part, so `2.0` doesn't come back as an integer.
            Expr::Float(value) => write!(f, "{:?}", value),
            Expr::Bool(true) => write!(f, "#t"),
            Expr::Bool(false) => write!(f, "#f"),
            Expr::Symbol(name) => write!(f, "{}", name.as_ref()),
            Expr::Pair(pair) => write!(f, "{}", pair),
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (elements, tail) = self.split_tail();
        write!(f, "({}", elements.iter().join(" "))?;
        if !tail.is_nil() {
            write!(f, " . {}", tail)?;
        }
        write!(f, ")")
    }
}

pub fn repr(obj: &Expr) -> String {
    match obj {
        Expr::Nil => String::from("nil"),
        Expr::Integer(value) => value.to_string(),
        Expr::Float(value) => format!("{:?}", value),
        Expr::Bool(value) => value.to_string(),
        Expr::Symbol(name) => format!("{:?}", name.as_ref()),
        Expr::Pair(pair) => {
            let (elements, tail) = pair.split_tail();
            let mut output = String::new();
            for element in &elements {
                output.push_str("Pair(");
                output.push_str(&repr(element));
                output.push_str(", ");
            }
            output.push_str(&repr(tail));
            output.push_str(&")".repeat(elements.len()));
            output
        }
    }
}
