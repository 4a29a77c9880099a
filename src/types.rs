extern crate derive_more;
use derive_more::Deref;
use std::fmt;
use std::iter::FromIterator;
use std::rc::Rc;

#[derive(Deref, Debug, PartialEq, Eq, Hash, Clone)]
pub struct Symbol(pub String);

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol(String::from(name))
    }
}

/// A cons cell. Pairs are shared through `Rc` and never mutated once built.
#[derive(Debug)]
pub struct Pair {
    pub first: Expr,
    pub second: Expr,
}

impl Pair {
    /// Walks the `second` chain, returning every `first` and the value the chain ends in
    /// (`Nil` for a proper list).
    pub fn split_tail(&self) -> (Vec<&Expr>, &Expr) {
        let mut elements = vec![&self.first];
        let mut rest = &self.second;
        while let Expr::Pair(pair) = rest {
            elements.push(&pair.first);
            rest = &pair.second;
        }
        (elements, rest)
    }
}

// The default drop glue recurses once per element of a list. Unlink the spine iteratively
// instead; nesting through `first` is bounded by the reader.
impl Drop for Pair {
    fn drop(&mut self) {
        let mut tail = std::mem::replace(&mut self.second, Expr::Nil);
        while let Expr::Pair(rc) = tail {
            match Rc::try_unwrap(rc) {
                Ok(mut pair) => tail = std::mem::replace(&mut pair.second, Expr::Nil),
                Err(_) => break,
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    Nil,
    Integer(i64),
    Float(f64),
    Bool(bool),
    Symbol(Symbol),
    Pair(Rc<Pair>),
}

/// The empty list.
pub const NIL: Expr = Expr::Nil;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    NotAProperList,
    IllFormedList,
    NegativeIndex(isize),
    IndexOutOfBounds(isize),
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListError::NotAProperList => write!(f, "length attempted on improper list"),
            ListError::IllFormedList => write!(f, "ill-formed list"),
            ListError::NegativeIndex(k) => write!(f, "negative index into list: {}", k),
            ListError::IndexOutOfBounds(k) => write!(f, "list index out of bounds: {}", k),
        }
    }
}

impl std::error::Error for ListError {}

impl Expr {
    pub fn cons(first: Expr, second: Expr) -> Self {
        Expr::Pair(Rc::new(Pair { first, second }))
    }

    pub fn symbol(name: &str) -> Self {
        Expr::Symbol(Symbol::from(name))
    }

    /// Builds `(e1 e2 ... en . tail)`. With a `Nil` tail this is a proper list.
    pub fn dotted(elements: Vec<Expr>, tail: Expr) -> Self {
        elements
            .into_iter()
            .rev()
            .fold(tail, |rest, first| Expr::cons(first, rest))
    }

    pub fn list(elements: Vec<Expr>) -> Self {
        Self::dotted(elements, NIL)
    }

    pub fn is_nil(&self) -> bool {
        match self {
            Expr::Nil => true,
            _ => false,
        }
    }

    pub fn is_pair(&self) -> bool {
        self.as_pair().is_some()
    }

    /// True for `Nil` and for pair chains ending in `Nil`.
    pub fn is_list(&self) -> bool {
        self.len().is_ok()
    }

    pub fn as_pair(&self) -> Option<&Pair> {
        match self {
            Expr::Pair(pair) => Some(pair),
            _ => None,
        }
    }

    pub fn len(&self) -> Result<usize, ListError> {
        let mut length = 0;
        let mut rest = self;
        loop {
            match rest {
                Expr::Nil => return Ok(length),
                Expr::Pair(pair) => {
                    length += 1;
                    rest = &pair.second;
                }
                _ => return Err(ListError::NotAProperList),
            }
        }
    }

    /// Zero-based element access along the `second` chain.
    pub fn get(&self, k: isize) -> Result<Expr, ListError> {
        if k < 0 {
            return Err(ListError::NegativeIndex(k));
        }
        let mut rest = self;
        for _ in 0..k {
            match rest {
                Expr::Pair(pair) => rest = &pair.second,
                Expr::Nil => return Err(ListError::IndexOutOfBounds(k)),
                _ => return Err(ListError::IllFormedList),
            }
        }
        match rest {
            Expr::Pair(pair) => Ok(pair.first.clone()),
            Expr::Nil => Err(ListError::IndexOutOfBounds(k)),
            _ => Err(ListError::IllFormedList),
        }
    }

    pub fn iter(&self) -> ListIter<'_> {
        ListIter { rest: Some(self) }
    }

    /// Applies `f` to every element, keeping the list shape. Mapping over `Nil` gives `Nil`;
    /// a chain ending in anything other than `Nil` is an error.
    pub fn map<F>(&self, mut f: F) -> Result<Expr, ListError>
    where
        F: FnMut(&Expr) -> Expr,
    {
        let mapped: Result<Vec<Expr>, ListError> =
            self.iter().map(|el| el.map(|x| f(x))).collect();
        mapped.map(Expr::list)
    }
}

/// Iterates the elements of a list, yielding one `IllFormedList` error if the chain ends in
/// something other than `Nil`.
pub struct ListIter<'a> {
    rest: Option<&'a Expr>,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = Result<&'a Expr, ListError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.rest.take()? {
            Expr::Nil => None,
            Expr::Pair(pair) => {
                self.rest = Some(&pair.second);
                Some(Ok(&pair.first))
            }
            _ => Some(Err(ListError::IllFormedList)),
        }
    }
}

impl FromIterator<Expr> for Expr {
    fn from_iter<I: IntoIterator<Item = Expr>>(iter: I) -> Self {
        Expr::list(iter.into_iter().collect())
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::Integer(value)
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Float(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Expr::Bool(value)
    }
}

impl From<&str> for Expr {
    fn from(name: &str) -> Self {
        Expr::symbol(name)
    }
}

impl From<Symbol> for Expr {
    fn from(symbol: Symbol) -> Self {
        Expr::Symbol(symbol)
    }
}

// Iterative along `second` so long lists compare without deep recursion.
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        let (mut lhs, mut rhs) = (self, other);
        loop {
            match (lhs, rhs) {
                (Expr::Pair(x), Expr::Pair(y)) => {
                    if Rc::ptr_eq(x, y) {
                        return true;
                    }
                    if x.first != y.first {
                        return false;
                    }
                    lhs = &x.second;
                    rhs = &y.second;
                }
                (Expr::Nil, Expr::Nil) => return true,
                (Expr::Integer(x), Expr::Integer(y)) => return x == y,
                (Expr::Float(x), Expr::Float(y)) => return x == y,
                (Expr::Bool(x), Expr::Bool(y)) => return x == y,
                (Expr::Symbol(x), Expr::Symbol(y)) => return x == y,
                (_, _) => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> Expr {
        Expr::Integer(n)
    }

    fn one_two_three() -> Expr {
        Expr::list(vec![int(1), int(2), int(3)])
    }

    #[test]
    fn nil_is_an_empty_list() {
        assert_eq!(NIL.len(), Ok(0));
        assert!(NIL.is_list());
        assert!(!NIL.is_pair());
        assert_eq!(NIL.get(0), Err(ListError::IndexOutOfBounds(0)));
    }

    #[test]
    fn proper_list_length_and_indexing() {
        let list = one_two_three();
        assert_eq!(list.len(), Ok(3));
        assert_eq!(list.get(0), Ok(Expr::Integer(1)));
        assert_eq!(list.get(2), Ok(Expr::Integer(3)));
        assert_eq!(list.get(3), Err(ListError::IndexOutOfBounds(3)));
        assert_eq!(list.get(-1), Err(ListError::NegativeIndex(-1)));
    }

    #[test]
    fn improper_lists_are_rejected() {
        let dotted = Expr::cons(int(1), int(2));
        assert_eq!(dotted.len(), Err(ListError::NotAProperList));
        assert!(!dotted.is_list());
        assert_eq!(dotted.get(0), Ok(Expr::Integer(1)));
        assert_eq!(dotted.get(1), Err(ListError::IllFormedList));
        assert_eq!(dotted.get(5), Err(ListError::IllFormedList));

        let longer = Expr::dotted(vec![int(1), int(2)], int(3));
        assert_eq!(longer.len(), Err(ListError::NotAProperList));
        assert_eq!(longer.get(1), Ok(Expr::Integer(2)));
        assert_eq!(longer.get(2), Err(ListError::IllFormedList));
    }

    #[test]
    fn atoms_are_not_lists() {
        assert_eq!(Expr::from("x").len(), Err(ListError::NotAProperList));
        assert_eq!(int(4).get(0), Err(ListError::IllFormedList));
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(one_two_three(), one_two_three());
        assert_ne!(one_two_three(), Expr::list(vec![int(1), int(2)]));
        assert_ne!(Expr::cons(int(1), int(2)), Expr::list(vec![int(1), int(2)]));
        assert_ne!(Expr::list(vec![int(1)]), int(1));
        assert_ne!(int(1), Expr::from(1.0));
        assert_eq!(
            Expr::list(vec![Expr::list(vec!["a".into()]), true.into()]),
            Expr::list(vec![Expr::list(vec!["a".into()]), true.into()])
        );
    }

    #[test]
    fn map_preserves_shape() {
        let doubled = one_two_three().map(|x| match x {
            Expr::Integer(n) => Expr::Integer(n * 2),
            other => other.clone(),
        });
        assert_eq!(doubled, Ok(Expr::list(vec![int(2), int(4), int(6)])));
    }

    #[test]
    fn map_over_nil_is_nil() {
        let mut calls = 0;
        let mapped = NIL.map(|x| {
            calls += 1;
            x.clone()
        });
        assert_eq!(mapped, Ok(NIL));
        assert_eq!(calls, 0);
    }

    #[test]
    fn map_over_improper_list_fails() {
        let dotted = Expr::cons(int(1), int(2));
        assert_eq!(dotted.map(Expr::clone), Err(ListError::IllFormedList));
    }

    #[test]
    fn iter_reports_improper_tail() {
        let dotted = Expr::dotted(vec![int(1)], int(2));
        let items: Vec<_> = dotted.iter().collect();
        assert_eq!(items, vec![Ok(&Expr::Integer(1)), Err(ListError::IllFormedList)]);
    }

    #[test]
    fn collect_builds_a_proper_list() {
        let list: Expr = (1..=3).map(Expr::Integer).collect();
        assert_eq!(list, one_two_three());
        let empty: Expr = Vec::<Expr>::new().into_iter().collect();
        assert_eq!(empty, NIL);
    }

    #[test]
    fn split_tail_exposes_the_terminator() {
        let dotted = Expr::dotted(vec![int(1), int(2)], "z".into());
        let (elements, tail) = dotted.as_pair().unwrap().split_tail();
        assert_eq!(elements, vec![&Expr::Integer(1), &Expr::Integer(2)]);
        assert_eq!(tail, &Expr::symbol("z"));
    }

    #[test]
    fn long_lists_do_not_overflow() {
        let long: Expr = (0..200_000).map(Expr::Integer).collect();
        assert_eq!(long.len(), Ok(200_000));
        assert_eq!(long.clone(), long);
        drop(long);
    }
}
