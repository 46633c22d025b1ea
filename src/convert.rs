use crate::error::{Error, Result};
use crate::parse::tokenize;
use crate::token::{Operator, Token};

/// What the shunting-yard keeps on its operator stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    Operator(Operator),
    Group { position: usize },
}

/// Converts a normalized, validated infix expression into space-separated
/// postfix form.
///
/// Operators of equal rank associate left to right, so `2-3-4` becomes
/// `2 3 - 4 -`. A number written with a `,` separator (which normalization
/// would have folded) is emitted with a `.`.
pub fn to_postfix(normalized: &str) -> Result<String> {
    let tokens = tokenize(normalized)?;

    let mut output: Vec<String> = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Pending> = Vec::new();

    for (position, token) in tokens {
        match token {
            Token::Number(literal) => output.push(literal.replace(',', ".")),
            Token::LeftParen => stack.push(Pending::Group { position }),
            Token::RightParen => loop {
                match stack.pop() {
                    Some(Pending::Operator(op)) => output.push(op.symbol().to_string()),
                    Some(Pending::Group { .. }) => break,
                    None => return Err(Error::UnmatchedParenthesis { position }),
                }
            },
            Token::Operator(_) | Token::Function(_) | Token::UnaryMarker => {
                let symbol = token.symbol();
                let op = Operator::from_symbol(symbol)
                    .ok_or_else(|| Error::UnknownFunction(symbol.to_string()))?;
                push_operator(op, &mut stack, &mut output);
            }
        }
    }

    while let Some(pending) = stack.pop() {
        match pending {
            Pending::Operator(op) => output.push(op.symbol().to_string()),
            Pending::Group { position } => return Err(Error::UnmatchedParenthesis { position }),
        }
    }

    Ok(output.join(" "))
}

/// Pops every stacked operator that binds at least as tightly as `op`, then
/// stacks `op`.
fn push_operator(op: Operator, stack: &mut Vec<Pending>, output: &mut Vec<String>) {
    while let Some(&Pending::Operator(top)) = stack.last() {
        if top.rank() < op.rank() {
            break;
        }
        output.push(top.symbol().to_string());
        stack.pop();
    }
    stack.push(Pending::Operator(op));
}
