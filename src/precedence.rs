use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Rank shared by `(` and `)`. Parentheses are never compared by rank during
/// conversion; the rank only keeps them out of the adjacency check.
pub const PARENTHESIS_RANK: u8 = 6;

const ENTRIES: [(&str, u8); 10] = [
    ("+", 1),
    ("-", 1),
    ("*", 2),
    ("/", 2),
    ("^", 3),
    ("sin", 4),
    ("cos", 4),
    ("~", 5),
    ("(", PARENTHESIS_RANK),
    (")", PARENTHESIS_RANK),
];

static PRECEDENCE: Lazy<HashMap<&'static str, u8>> = Lazy::new(|| ENTRIES.into_iter().collect());

/// Precedence rank of an operator, function or parenthesis token.
///
/// Returns `None` for numeric literals and anything else outside the table.
pub fn rank(token: &str) -> Option<u8> {
    PRECEDENCE.get(token).copied()
}

/// Whether `token` is an operator or function, i.e. a table member other than
/// a parenthesis.
pub fn is_operator(token: &str) -> bool {
    matches!(rank(token), Some(r) if r < PARENTHESIS_RANK)
}

/// All table entries, in a fixed order.
pub fn entries() -> impl Iterator<Item = (&'static str, u8)> {
    ENTRIES.into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_follow_binding_strength() {
        assert_eq!(rank("+"), rank("-"));
        assert_eq!(rank("*"), rank("/"));
        assert!(rank("+") < rank("*"));
        assert!(rank("*") < rank("^"));
        assert!(rank("^") < rank("sin"));
        assert_eq!(rank("sin"), rank("cos"));
        assert!(rank("cos") < rank("~"));
        assert_eq!(rank("("), Some(PARENTHESIS_RANK));
        assert_eq!(rank(")"), Some(PARENTHESIS_RANK));
    }

    #[test]
    fn literals_are_not_in_the_table() {
        assert_eq!(rank("12.5"), None);
        assert_eq!(rank("tan"), None);
        assert!(!is_operator("("));
        assert!(is_operator("~"));
        assert_eq!(entries().count(), PRECEDENCE.len());
    }
}
