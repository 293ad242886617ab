//! Identifier rules for schema names.
//!
//! Entity-type and field names share one grammar: an ASCII letter or
//! underscore followed by letters, digits, underscores, or hyphens.
//! Entity identifiers (the keys of a type's table) are not restricted;
//! they are caller-chosen strings.

/// Returns true if `name` is a well-formed entity-type or field name.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
