use crate::token::Token;

use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar.pest"] // relative to project `src`
struct TokenParser;

pub type ParseError = pest::error::Error<Rule>;

/// Splits a normalized expression into [`Token`]s.
///
/// Classification is purely lexical: digit runs (with `.` or `,`) are numbers,
/// letter runs are function names, and single symbols are operators, the unary
/// marker or parentheses. Whether a letter run names a known function is left
/// to the caller. Any character outside that alphabet is a [`ParseError`].
///
/// Each token comes with its byte offset in `input`.
pub fn tokenize(input: &str) -> Result<Vec<(usize, Token<'_>)>, ParseError> {
    let pairs = TokenParser::parse(Rule::expression, input)?;
    Ok(pairs
        .filter_map(|pair| {
            let text = pair.as_str();
            let token = match pair.as_rule() {
                Rule::number => Token::Number(text),
                Rule::function => Token::Function(text),
                Rule::operator => Token::Operator(text),
                Rule::marker => Token::UnaryMarker,
                Rule::left_paren => Token::LeftParen,
                Rule::right_paren => Token::RightParen,
                _ => return None,
            };
            Some((pair.as_span().start(), token))
        })
        .collect())
}
