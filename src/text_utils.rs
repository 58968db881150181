//! Text utilities for working with source code.

/// Check if a character can start an identifier.
///
/// Uses Unicode Standard Annex #31 rules, plus `_` which XID_Start excludes.
#[inline]
pub fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

/// Check if a character can continue an identifier.
#[inline]
pub fn is_ident_continue(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

/// Check if an entire string is a valid identifier.
///
/// Used to validate replacement names before a rename edit is applied.
pub fn is_valid_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if is_ident_start(first) => chars.all(is_ident_continue),
        _ => false,
    }
}
