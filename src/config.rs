#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Alternate spellings accepted in raw input and folded into the canonical
/// `.` decimal point and `(`/`)` parentheses during normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Notation {
    /// Characters treated as a decimal point in addition to `.`.
    pub decimal_separators: Vec<char>,
    /// Bracket pairs treated as `(` and `)`.
    pub bracket_pairs: Vec<(char, char)>,
}

impl Notation {
    /// Only the canonical `.` and `(`/`)` are accepted.
    pub fn parentheses_only() -> Self {
        Self {
            decimal_separators: vec![],
            bracket_pairs: vec![],
        }
    }

    pub(crate) fn canonical_char(&self, c: char) -> char {
        if self.decimal_separators.contains(&c) {
            return '.';
        }
        for &(open, close) in &self.bracket_pairs {
            if c == open {
                return '(';
            }
            if c == close {
                return ')';
            }
        }
        c
    }
}

impl Default for Notation {
    fn default() -> Self {
        Self {
            decimal_separators: vec![','],
            bracket_pairs: vec![('{', '}'), ('[', ']')],
        }
    }
}

/// What the evaluator does with a postfix sequence whose operand stack does not
/// line up with its operators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OperandPolicy {
    /// Missing operands read as zero and leftover operands are ignored.
    #[default]
    Lenient,
    /// Missing or leftover operands are errors.
    Strict,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    pub notation: Notation,
    pub operand_policy: OperandPolicy,
}
