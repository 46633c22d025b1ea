use crate::config::OperandPolicy;
use crate::error::{Error, Result};
use crate::precedence;
use crate::token::{Arity, Operator};
use crate::FloatExt;

/// One operator application, published as soon as it has been computed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OperationStep<R> {
    pub operator: Operator,
    pub first: R,
    /// `None` for unary operators.
    pub second: Option<R>,
    pub result: R,
}

impl<R> OperationStep<R> {
    pub fn arity(&self) -> Arity {
        if self.second.is_some() {
            Arity::Binary
        } else {
            Arity::Unary
        }
    }
}

/// Runs a space-separated postfix sequence on an operand stack.
///
/// `on_step` sees every operator application in evaluation order. A `/` whose
/// right-hand operand is zero fails before anything is computed for it.
/// How missing and leftover operands are treated depends on `policy`.
pub fn evaluate_postfix<R: FloatExt>(
    postfix: &str,
    policy: OperandPolicy,
    mut on_step: impl FnMut(&OperationStep<R>),
) -> Result<R> {
    let mut stack: Vec<R> = Vec::new();

    for token in postfix.split_whitespace() {
        if let Ok(value) = token.parse::<R>() {
            stack.push(value);
            continue;
        }
        let operator = Operator::from_symbol(token)
            .filter(|_| precedence::is_operator(token))
            .ok_or_else(|| Error::UnrecognizedToken(token.to_string()))?;

        let step = match operator.arity() {
            Arity::Unary => {
                let first = pop_operand(&mut stack, operator, policy)?;
                OperationStep {
                    operator,
                    first,
                    second: None,
                    result: operator.apply_unary(first),
                }
            }
            Arity::Binary => {
                let second = pop_operand(&mut stack, operator, policy)?;
                if operator == Operator::Divide && second == R::zero() {
                    return Err(Error::DivisionByZero);
                }
                let first = pop_operand(&mut stack, operator, policy)?;
                OperationStep {
                    operator,
                    first,
                    second: Some(second),
                    result: operator.apply_binary(first, second),
                }
            }
        };
        tracing::trace!(
            operator = %step.operator,
            first = %step.first,
            second = ?step.second,
            result = %step.result,
            "step"
        );
        stack.push(step.result);
        on_step(&step);
    }

    let leftover = stack.len().saturating_sub(1);
    if leftover > 0 {
        match policy {
            OperandPolicy::Strict => return Err(Error::DanglingOperands { count: leftover }),
            OperandPolicy::Lenient => {
                tracing::warn!(leftover, "ignoring leftover operands");
            }
        }
    }
    // Leniency covers operators short of operands, not a sequence with no
    // value at all.
    stack.pop().ok_or(Error::NoResult)
}

fn pop_operand<R: FloatExt>(
    stack: &mut Vec<R>,
    operator: Operator,
    policy: OperandPolicy,
) -> Result<R> {
    match (stack.pop(), policy) {
        (Some(value), _) => Ok(value),
        (None, OperandPolicy::Strict) => Err(Error::MissingOperand { operator }),
        (None, OperandPolicy::Lenient) => {
            tracing::warn!(%operator, "missing operand, substituting zero");
            Ok(R::zero())
        }
    }
}
