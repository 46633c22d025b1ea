use thiserror::Error;

use crate::parse::ParseError;
use crate::token::Operator;

/// Everything that can stop an expression on its way through the pipeline.
///
/// Every variant is terminal for the call that produced it.
#[derive(Error, Debug)]
pub enum Error {
    #[error("expression is empty")]
    EmptyInput,

    #[error("unmatched parenthesis at offset {position}")]
    UnmatchedParenthesis { position: usize },

    #[error("invalid character sequence {sequence:?} at offset {position}")]
    InvalidCharacterSequence { sequence: String, position: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("syntax error: {0}")]
    Syntax(Box<ParseError>),

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("unrecognized postfix token: {0}")]
    UnrecognizedToken(String),

    #[error("operator {operator} is missing an operand")]
    MissingOperand { operator: Operator },

    #[error("{count} operands left over after evaluation")]
    DanglingOperands { count: usize },

    #[error("postfix sequence produced no value")]
    NoResult,
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Syntax(Box::new(e))
    }
}
