//! Handle lifecycle: staleness, forgetting, and argument validation.

mod helpers;

use helpers::{buffer, handle_of, try_handle_of};
use regraft::{Error, SyntaxKind, TextSize};

#[test]
fn dead_handles_fail_every_operation() {
    let mut buffer = buffer("function f() { return 1; }");
    let ret = handle_of(&buffer, SyntaxKind::RETURN_STMT);
    buffer.remove_node(&ret).unwrap();

    assert_eq!(ret.kind().unwrap_err(), Error::StaleNode);
    assert_eq!(ret.range().unwrap_err(), Error::StaleNode);
    assert_eq!(ret.text().unwrap_err(), Error::StaleNode);
    assert_eq!(buffer.children(&ret).unwrap_err(), Error::StaleNode);
    assert_eq!(buffer.rename(&ret, "x").unwrap_err(), Error::StaleNode);
    assert_eq!(buffer.remove_node(&ret).unwrap_err(), Error::StaleNode);
}

#[test]
fn dead_handles_stay_dead_when_identical_text_returns() {
    let mut buffer = buffer("let a = 1;");
    let stmt = handle_of(&buffer, SyntaxKind::LET_STMT);

    buffer
        .remove_range(TextSize::new(0), TextSize::new(10))
        .unwrap();
    assert!(!stmt.is_alive());

    buffer.insert_text(TextSize::new(0), "let a = 1;").unwrap();
    assert_eq!(buffer.text(), "let a = 1;");

    // Identical text, brand-new identity
    assert!(!stmt.is_alive());
    let fresh = handle_of(&buffer, SyntaxKind::LET_STMT);
    assert_ne!(fresh, stmt);
    assert!(fresh.is_alive());
}

#[test]
fn forget_releases_a_subtree_without_editing() {
    let mut buffer = buffer("function f() { return 1; }");
    let function = handle_of(&buffer, SyntaxKind::FUNCTION_DECL);
    let ret = handle_of(&buffer, SyntaxKind::RETURN_STMT);
    let literal = handle_of(&buffer, SyntaxKind::LITERAL);

    buffer.forget(&ret).unwrap();

    // Text untouched, but the forgotten subtree's handles are dead
    assert_eq!(buffer.text(), "function f() { return 1; }");
    assert!(!ret.is_alive());
    assert!(!literal.is_alive());
    assert!(function.is_alive());

    // The node is still in the tree; asking again yields a new handle
    let again = handle_of(&buffer, SyntaxKind::RETURN_STMT);
    assert_ne!(again, ret);
    assert!(again.is_alive());
}

#[test]
fn malformed_ranges_are_rejected_before_parsing() {
    let mut buffer = buffer("let a = 1;");

    let err = buffer
        .remove_range(TextSize::new(7), TextSize::new(3))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRange { .. }));

    let err = buffer
        .replace_text(TextSize::new(0), TextSize::new(99), "x")
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRange { .. }));

    let err = buffer.insert_text(TextSize::new(99), "x").unwrap_err();
    assert!(matches!(err, Error::InvalidRange { .. }));

    // The buffer is untouched by rejected edits
    assert_eq!(buffer.text(), "let a = 1;");
}

#[test]
fn rename_validates_capability_and_identifier() {
    let mut buffer = buffer("function f() { return 1; }");
    let function = handle_of(&buffer, SyntaxKind::FUNCTION_DECL);
    let ret = handle_of(&buffer, SyntaxKind::RETURN_STMT);

    let err = buffer.rename(&function, "not an ident").unwrap_err();
    assert!(matches!(err, Error::InvalidIdentifier(_)));

    let err = buffer.rename(&ret, "fine").unwrap_err();
    assert_eq!(
        err,
        Error::NotSupported {
            kind: SyntaxKind::RETURN_STMT,
            operation: "rename",
        }
    );

    // Recoverable: the right operation still works afterwards
    buffer.rename(&function, "g").unwrap();
    assert_eq!(buffer.text(), "function g() { return 1; }");
}

#[test]
fn handles_are_created_lazily_for_fresh_nodes() {
    let mut buffer = buffer("let a = 1;\n");
    assert!(try_handle_of(&buffer, SyntaxKind::FUNCTION_DECL).is_none());

    buffer
        .insert_text(TextSize::new(11), "function f() { }\n")
        .unwrap();

    let function = try_handle_of(&buffer, SyntaxKind::FUNCTION_DECL)
        .expect("fresh node must be reachable after the edit");
    assert!(function.is_alive());
    assert_eq!(function.text().unwrap(), "function f() { }");
}
