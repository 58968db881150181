//! End-to-end edit scenarios against a live buffer.

mod helpers;

use helpers::{buffer, handle_of, nth_handle_of};
use regraft::printer::{FunctionStructure, PrintSettings, Structure};
use regraft::{Error, SyntaxKind, TextRange, TextSize};

#[test]
fn removing_a_statement_keeps_the_function_alive() {
    let mut buffer = buffer("function f() { return 1; }");
    let function = handle_of(&buffer, SyntaxKind::FUNCTION_DECL);
    let ret = handle_of(&buffer, SyntaxKind::RETURN_STMT);
    let literal = handle_of(&buffer, SyntaxKind::LITERAL);

    buffer.remove_node(&ret).unwrap();

    assert_eq!(buffer.text(), "function f() {  }");
    assert!(!ret.is_alive());
    assert!(!literal.is_alive());
    assert!(function.is_alive());
    assert_eq!(
        function.range().unwrap(),
        TextRange::new(0.into(), 17.into())
    );
}

#[test]
fn unreconcilable_insert_rolls_back_completely() {
    let mut buffer = buffer("let a = 1;");
    let stmt = handle_of(&buffer, SyntaxKind::LET_STMT);

    // "x" glues onto "let", producing a tree with no recognizable
    // counterpart for the old statement shape.
    let err = buffer.insert_text(TextSize::new(0), "x").unwrap_err();
    assert!(matches!(err, Error::Reconcile(_)));

    // Nothing changed: text, tree, and handle are all as before.
    assert_eq!(buffer.text(), "let a = 1;");
    assert!(stmt.is_alive());
    assert_eq!(stmt.range().unwrap(), TextRange::new(0.into(), 10.into()));
}

#[test]
fn renaming_the_middle_list_element_spares_its_siblings() {
    let mut buffer = buffer("let v = [a, b, c];");
    let a = nth_handle_of(&buffer, SyntaxKind::NAME_REF, 0);
    let b = nth_handle_of(&buffer, SyntaxKind::NAME_REF, 1);
    let c = nth_handle_of(&buffer, SyntaxKind::NAME_REF, 2);
    let list = handle_of(&buffer, SyntaxKind::ELEMENT_LIST);

    buffer.rename(&b, "beta").unwrap();
    assert_eq!(buffer.text(), "let v = [a, beta, c];");

    // The renamed element is rebound, not invalidated: its kind never
    // changed, only its text.
    assert!(b.is_alive());
    assert_eq!(b.range().unwrap(), TextRange::new(12.into(), 16.into()));
    assert_eq!(b.text().unwrap(), "beta");

    // Siblings survive: the one before is untouched, the one after
    // shifts by exactly the edit's length delta.
    assert_eq!(a.range().unwrap(), TextRange::new(9.into(), 10.into()));
    assert_eq!(c.range().unwrap(), TextRange::new(18.into(), 19.into()));
    assert_eq!(list.range().unwrap(), TextRange::new(9.into(), 19.into()));
}

#[test]
fn growing_an_argument_list_in_place() {
    let mut buffer = buffer("f(a);");
    let call = handle_of(&buffer, SyntaxKind::CALL_EXPR);
    let args = handle_of(&buffer, SyntaxKind::ARG_LIST);
    let first = nth_handle_of(&buffer, SyntaxKind::NAME_REF, 1);

    buffer.insert_text(TextSize::new(3), ", b").unwrap();
    assert_eq!(buffer.text(), "f(a, b);");

    assert!(call.is_alive());
    assert!(args.is_alive());
    assert_eq!(args.range().unwrap(), TextRange::new(2.into(), 6.into()));
    // The existing argument kept both identity and position
    assert!(first.is_alive());
    assert_eq!(first.range().unwrap(), TextRange::new(2.into(), 3.into()));
}

#[test]
fn removing_the_only_array_element_collapses_the_list() {
    let mut buffer = buffer("let a = [1];");
    let array = handle_of(&buffer, SyntaxKind::ARRAY_EXPR);
    let list = handle_of(&buffer, SyntaxKind::ELEMENT_LIST);
    let element = handle_of(&buffer, SyntaxKind::LITERAL);

    buffer.remove_node(&element).unwrap();

    assert_eq!(buffer.text(), "let a = [];");
    assert!(!element.is_alive());
    // The grouping node went with its only child; the array itself stays.
    assert!(!list.is_alive());
    assert!(array.is_alive());
    assert_eq!(array.range().unwrap(), TextRange::new(8.into(), 10.into()));
}

#[test]
fn removing_a_leading_statement_swallows_trailing_spaces() {
    let mut buffer = buffer("let a = 1;  let b = 2;");
    let first = nth_handle_of(&buffer, SyntaxKind::LET_STMT, 0);
    let second = nth_handle_of(&buffer, SyntaxKind::LET_STMT, 1);

    buffer.remove_node(&first).unwrap();

    assert_eq!(buffer.text(), "let b = 2;");
    assert!(!first.is_alive());
    assert!(second.is_alive());
    assert_eq!(second.range().unwrap(), TextRange::new(0.into(), 10.into()));
}

#[test]
fn inserting_a_printed_structure() {
    let mut buffer = buffer("let a = 1;\n");
    let existing = handle_of(&buffer, SyntaxKind::LET_STMT);

    let structure = Structure::Function(FunctionStructure {
        name: "twice".into(),
        params: vec!["x".into()],
        body: vec!["return x + x;".to_string()],
        declaration_only: false,
    });
    let end = TextSize::of(buffer.text());
    buffer
        .insert_structure(end, &structure, &PrintSettings::default())
        .unwrap();

    assert_eq!(
        buffer.text(),
        "let a = 1;\nfunction twice(x) {\n    return x + x;\n}\n"
    );
    assert!(existing.is_alive());
    assert_eq!(existing.range().unwrap(), TextRange::new(0.into(), 10.into()));

    // The fresh function is reachable through the typed layer
    let file = buffer.source_file().unwrap();
    let function = file.functions().next().unwrap();
    assert_eq!(
        regraft::parser::HasName::name(&function).unwrap().text(),
        Some("twice".into())
    );
}

#[test]
fn replacing_an_initializer_wholesale() {
    let mut buffer = buffer("let a = [1, 2];");
    let stmt = handle_of(&buffer, SyntaxKind::LET_STMT);
    let old_array = handle_of(&buffer, SyntaxKind::ARRAY_EXPR);

    buffer
        .replace_text(TextSize::new(8), TextSize::new(14), "f(9)")
        .unwrap();

    assert_eq!(buffer.text(), "let a = f(9);");
    assert!(stmt.is_alive());
    assert!(!old_array.is_alive());
    assert!(helpers::try_handle_of(&buffer, SyntaxKind::CALL_EXPR).is_some());
}
