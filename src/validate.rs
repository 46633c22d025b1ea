use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::precedence::{self, PARENTHESIS_RANK};

/// Two or more adjacent operators, markers or decimal points, or two or more
/// adjacent function names.
static ADJACENCY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&adjacency_pattern()).expect("adjacency pattern is built from fixed symbols")
});

fn adjacency_pattern() -> String {
    let operators = precedence::entries()
        .filter(|&(symbol, rank)| rank < PARENTHESIS_RANK && symbol.len() < 3)
        .map(|(symbol, _)| regex::escape(symbol))
        .chain(std::iter::once(regex::escape(".")))
        .collect::<String>();
    let functions = precedence::entries()
        .filter(|&(symbol, rank)| rank < PARENTHESIS_RANK && symbol.len() > 2)
        .map(|(symbol, _)| regex::escape(symbol))
        .collect::<Vec<_>>()
        .join("|");
    format!("[{operators}]{{2,}}|(?:{functions}){{2,}}")
}

/// Rejects a normalized expression with unbalanced parentheses or with
/// operators, decimal points or function names stacked back to back.
///
/// Passing expressions are not modified.
pub fn validate(normalized: &str) -> Result<()> {
    check_parentheses(normalized)?;

    if let Some(m) = ADJACENCY.find(normalized) {
        return Err(Error::InvalidCharacterSequence {
            sequence: m.as_str().to_string(),
            position: m.start(),
        });
    }
    Ok(())
}

fn check_parentheses(input: &str) -> Result<()> {
    let mut open = Vec::new();
    for (position, c) in input.char_indices() {
        match c {
            '(' => open.push(position),
            ')' => {
                if open.pop().is_none() {
                    return Err(Error::UnmatchedParenthesis { position });
                }
            }
            _ => {}
        }
    }
    match open.pop() {
        Some(position) => Err(Error::UnmatchedParenthesis { position }),
        None => Ok(()),
    }
}
