//! Infix expression to Reverse Polish Notation converter and step-by-step
//! evaluator.
//!
//! Raw input goes through four stages, each of which can also be run on its
//! own through an [`Engine`]:
//!
//! 1. **normalize**: strip whitespace, fold `,` into `.` and `{}`/`[]` into
//!    `()`, and rewrite unary minus as `~`;
//! 2. **validate**: check parenthesis balance and reject stacked operators;
//! 3. **convert**: shunting-yard into space-separated postfix;
//! 4. **evaluate**: run the postfix on an operand stack, publishing an
//!    [`OperationStep`] for every operator application.
//!
//! Numbers are always read and written with a `.` decimal point, whatever the
//! host locale; see [`format_number`].
//!
//! # Example
//!
//! ```rust
//! use rpn_expr::*;
//!
//! let engine = Engine::<f64>::new();
//! assert_eq!(
//!     engine.to_postfix("10*  {-15+19)*sin(90]").unwrap(),
//!     "10 15 ~ 19 + * 90 sin *"
//! );
//!
//! let mut steps = vec![];
//! let value = engine
//!     .evaluate_with("10/(5-3)", |step| {
//!         steps.push((step.operator.symbol(), step.first, step.second, step.result))
//!     })
//!     .unwrap();
//! assert_eq!(value, 5.0);
//! assert_eq!(
//!     steps,
//!     [("-", 5.0, Some(3.0), 2.0), ("/", 10.0, Some(2.0), 5.0)]
//! );
//! ```

mod config;
mod convert;
mod engine;
mod error;
mod evaluate;
mod normalize;
mod parse;
mod pipeline;
mod precedence;
mod token;
mod validate;

/// Token grammar, written in the [`pest`] parsing expression grammar
/// language.
///
/// ```text
#[doc = include_str!("grammar.pest")]
/// ```
pub mod grammar_doc {}

pub use config::*;
pub use convert::to_postfix;
pub use engine::*;
pub use error::{Error, Result};
pub use evaluate::*;
pub use normalize::normalize;
pub use parse::ParseError;
pub use pipeline::*;
pub use precedence::{rank, PARENTHESIS_RANK};
pub use token::{Arity, Operator};
pub use validate::validate;

pub trait FloatExt:
    num_traits::Float
    + std::str::FromStr
    + std::fmt::Display
    + std::fmt::Debug
    + Send
    + Sync
    + 'static
{
}
impl FloatExt for f32 {}
impl FloatExt for f64 {}

/// Formats a result with a `.` decimal point and no exponent, e.g.
/// `5` or `-945395657.7878376`.
pub fn format_number<R: FloatExt>(value: R) -> String {
    value.to_string()
}
