use crate::config::EngineConfig;
use crate::convert::to_postfix;
use crate::error::Result;
use crate::evaluate::{evaluate_postfix, OperationStep};
use crate::normalize::normalize;
use crate::validate::validate;
use crate::FloatExt;

#[cfg(feature = "rayon")]
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

/// The processing stages, in the order an expression passes through them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Normalize,
    Validate,
    Convert,
    Evaluate,
}

type TextStage = fn(String, &EngineConfig) -> Result<String>;

/// Every stage that maps text to text. Evaluation consumes the output of the
/// last one.
const TEXT_STAGES: [(Stage, TextStage); 3] = [
    (Stage::Normalize, normalize_stage),
    (Stage::Validate, validate_stage),
    (Stage::Convert, convert_stage),
];

fn normalize_stage(input: String, config: &EngineConfig) -> Result<String> {
    normalize(&input, &config.notation)
}

fn validate_stage(input: String, _config: &EngineConfig) -> Result<String> {
    validate(&input)?;
    Ok(input)
}

fn convert_stage(input: String, _config: &EngineConfig) -> Result<String> {
    to_postfix(&input)
}

/// A fixed chain of stages. Running part of the chain selects a prefix of it;
/// the stages themselves never change.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    config: EngineConfig,
}

impl Pipeline {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs every text stage up to and including `through`.
    ///
    /// `Stage::Evaluate` yields the postfix text the evaluator would consume.
    pub fn run_text(&self, input: &str, through: Stage) -> Result<String> {
        TEXT_STAGES
            .iter()
            .take_while(|(stage, _)| *stage <= through)
            .try_fold(input.to_string(), |text, (stage, run)| {
                let text = run(text, &self.config)?;
                tracing::debug!(?stage, %text, "stage finished");
                Ok(text)
            })
    }

    /// Runs the whole chain, reporting every operator application to
    /// `on_step`.
    pub fn evaluate<R: FloatExt>(
        &self,
        input: &str,
        on_step: impl FnMut(&OperationStep<R>),
    ) -> Result<R> {
        let postfix = self.run_text(input, Stage::Convert)?;
        let value = evaluate_postfix(&postfix, self.config.operand_policy, on_step)?;
        tracing::debug!(stage = ?Stage::Evaluate, %value, "stage finished");
        Ok(value)
    }
}

/// Evaluates independent expressions without publishing any steps.
///
/// With the `rayon` feature the expressions are spread over the thread pool;
/// each one is still evaluated on a single thread.
pub fn evaluate_all<R: FloatExt, S: AsRef<str> + Sync>(
    inputs: &[S],
    config: &EngineConfig,
) -> Vec<Result<R>> {
    let pipeline = Pipeline::new(config.clone());

    #[cfg(feature = "rayon")]
    {
        inputs
            .par_iter()
            .map(|input| pipeline.evaluate(input.as_ref(), |_| {}))
            .collect()
    }
    #[cfg(not(feature = "rayon"))]
    {
        inputs
            .iter()
            .map(|input| pipeline.evaluate(input.as_ref(), |_| {}))
            .collect()
    }
}
