use std::fmt;

use crate::precedence;
use crate::FloatExt;

/// One lexical unit of a normalized expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// Decimal literal as written, possibly with a stray `,` separator.
    Number(&'a str),
    /// One of `+ - * / ^`.
    Operator(&'a str),
    /// A run of letters, e.g. `sin`.
    Function(&'a str),
    /// The unary negation marker `~`.
    UnaryMarker,
    LeftParen,
    RightParen,
}

impl<'a> Token<'a> {
    /// The text used to look this token up in the precedence table.
    pub fn symbol(&self) -> &'a str {
        match *self {
            Self::Number(s) | Self::Operator(s) | Self::Function(s) => s,
            Self::UnaryMarker => Operator::Negate.symbol(),
            Self::LeftParen => "(",
            Self::RightParen => ")",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Arity {
    Unary,
    Binary,
}

/// Every operator and function the evaluator can apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    // Binary.
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,

    // Unary.
    Negate,
    Sin,
    Cos,
}

impl Operator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => Self::Add,
            "-" => Self::Subtract,
            "*" => Self::Multiply,
            "/" => Self::Divide,
            "^" => Self::Power,
            "~" => Self::Negate,
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Power => "^",
            Self::Negate => "~",
            Self::Sin => "sin",
            Self::Cos => "cos",
        }
    }

    pub fn rank(self) -> u8 {
        // Every symbol above is a table entry.
        precedence::rank(self.symbol()).unwrap_or_default()
    }

    pub fn arity(self) -> Arity {
        match self {
            Self::Negate | Self::Sin | Self::Cos => Arity::Unary,
            _ => Arity::Binary,
        }
    }

    /// Applies a unary operator. Binary operators pass `only` through.
    pub fn apply_unary<R: FloatExt>(self, only: R) -> R {
        match self {
            Self::Negate => -only,
            Self::Sin => only.sin(),
            Self::Cos => only.cos(),
            _ => only,
        }
    }

    /// Applies a binary operator. Unary operators apply to `lhs` alone.
    ///
    /// Division is plain IEEE division; the zero-divisor check belongs to the
    /// evaluator.
    pub fn apply_binary<R: FloatExt>(self, lhs: R, rhs: R) -> R {
        match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide => lhs / rhs,
            Self::Power => lhs.powf(rhs),
            unary => unary.apply_unary(lhs),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
