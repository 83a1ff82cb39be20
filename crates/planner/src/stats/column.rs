//! Column references and the alias-qualification rule.

use serde::{Serialize, Serializer};
use std::fmt;

/// A column reference qualified with the alias of the relation it belongs to,
/// e.g. `me.name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub qualifier: String,
    pub name: String,
}

impl ColumnRef {
    pub fn new(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            qualifier: qualifier.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.qualifier, self.name)
    }
}

impl Serialize for ColumnRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Splits `ident` into `(qualifier, rest)` when it starts with one or more
/// word characters followed by a dot.
fn split_qualifier(ident: &str) -> Option<(&str, &str)> {
    let dot = ident.find(|c: char| !(c.is_alphanumeric() || c == '_'))?;
    if dot == 0 || !ident[dot..].starts_with('.') {
        return None;
    }
    Some((&ident[..dot], &ident[dot + 1..]))
}

/// Qualifies `ident` with `alias` unless it already carries a qualifier.
pub fn qualify(alias: &str, ident: &str) -> ColumnRef {
    match split_qualifier(ident) {
        Some((qualifier, name)) => ColumnRef::new(qualifier, name),
        None => ColumnRef::new(alias, ident),
    }
}

/// Strips a leading `alias.` qualifier, if any.
pub fn unqualified(ident: &str) -> &str {
    match split_qualifier(ident) {
        Some((_, name)) => name,
        None => ident,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify_bare_column() {
        let col = qualify("me", "name");
        assert_eq!(col, ColumnRef::new("me", "name"));
        assert_eq!(col.to_string(), "me.name");
    }

    #[test]
    fn test_qualify_keeps_existing_qualifier() {
        assert_eq!(qualify("me", "other.name").to_string(), "other.name");
        assert_eq!(qualify("me", "me.name"), qualify("me", "name"));
    }

    #[test]
    fn test_only_leading_word_prefix_counts() {
        assert_eq!(split_qualifier("t_1.col"), Some(("t_1", "col")));
        assert_eq!(split_qualifier(".col"), None);
        assert_eq!(split_qualifier("a-b.col"), None);
        assert_eq!(split_qualifier("col"), None);
        assert_eq!(qualify("me", "a-b.col").to_string(), "me.a-b.col");
    }

    #[test]
    fn test_unqualified() {
        assert_eq!(unqualified("me.cost"), "cost");
        assert_eq!(unqualified("cost"), "cost");
        assert_eq!(unqualified("a.b.c"), "b.c");
    }
}
