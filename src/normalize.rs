use crate::config::Notation;
use crate::error::{Error, Result};

/// Rewrites raw input into the canonical form the other stages expect.
///
/// Whitespace is dropped, alternate decimal separators and bracket styles are
/// folded into `.` and `(`/`)`, and every unary minus becomes the `~` marker.
/// A `-` is unary when it starts the expression or follows anything other
/// than a digit or `)`. Running this on its own output changes nothing.
pub fn normalize(input: &str, notation: &Notation) -> Result<String> {
    if input.is_empty() {
        return Err(Error::EmptyInput);
    }

    let folded: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| notation.canonical_char(c))
        .collect();

    // Each decision looks at the previous character as already rewritten.
    let mut output = String::with_capacity(folded.len());
    for c in folded.chars() {
        let unary = c == '-'
            && output
                .chars()
                .next_back()
                .map_or(true, |prev| !prev.is_ascii_digit() && prev != ')');
        output.push(if unary { '~' } else { c });
    }

    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(trimmed.to_string())
}
