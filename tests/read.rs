use scheme_reader::buffer::{buffer_lines, TokenSource};
use scheme_reader::printer::repr;
use scheme_reader::reader::{read_lines, Error, SyntaxError};
use scheme_reader::{read_line, scheme_read, Expr, ListError, Outcome, NIL};

fn lines(text: &str) -> Vec<String> {
    text.lines().map(String::from).collect()
}

#[test]
fn reads_into_constructor_form() {
    let cases = [
        ("()", "nil"),
        ("(1 2)", "Pair(1, Pair(2, nil))"),
        ("(1 . 2)", "Pair(1, 2)"),
        ("(1 2 . 3)", "Pair(1, Pair(2, 3))"),
        ("'hello", r#"Pair("quote", Pair("hello", nil))"#),
        (
            "(car '(1 2))",
            r#"Pair("car", Pair(Pair("quote", Pair(Pair(1, Pair(2, nil)), nil)), nil))"#,
        ),
    ];
    for (input, expected) in cases.iter() {
        assert_eq!(&repr(&read_line(input).unwrap()), expected, "{}", input);
    }
}

#[test]
fn dotted_pair_is_not_a_list() {
    let pair = read_line("(1 . 2)").unwrap();
    assert_eq!(pair.len(), Err(ListError::NotAProperList));
    assert_eq!(pair.to_string(), "(1 . 2)");
}

#[test]
fn extra_element_after_dot() {
    let err = read_line("(1 . 2 3)").unwrap_err();
    assert_eq!(
        err.to_string(),
        "syntax error: expected one element after ., found 3"
    );
}

#[test]
fn unclosed_list_across_lines_needs_more_input() {
    let result = read_lines(lines("(define x\n  (+ 1\n"));
    assert!(matches!(Outcome::from(result), Outcome::NeedMoreInput));
    assert!(matches!(read_lines(lines("(")), Err(Error::Eof)));
}

#[test]
fn stray_close_is_a_syntax_error() {
    match read_line(")") {
        Err(Error::Syntax(SyntaxError::Unexpected(token))) => assert_eq!(token.to_string(), ")"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn reading_a_program() {
    let program = "\
; squares
(define (square x) (* x x))
(square 4) 'done
";
    let mut src = buffer_lines(lines(program));
    let mut exprs = Vec::new();
    while src.peek().unwrap().is_some() {
        exprs.push(scheme_read(&mut src).unwrap());
    }
    let shown: Vec<String> = exprs.iter().map(Expr::to_string).collect();
    assert_eq!(
        shown,
        vec![
            "(define (square x) (* x x))",
            "(square 4)",
            "(quote done)",
        ]
    );
}

#[test]
fn nil_literal_and_empty_list_agree() {
    assert_eq!(read_line("nil").unwrap(), read_line("()").unwrap());
    assert_eq!(read_line("(nil)").unwrap(), Expr::list(vec![NIL]));
}
