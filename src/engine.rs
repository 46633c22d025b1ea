use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::evaluate::OperationStep;
use crate::pipeline::{Pipeline, Stage};
use crate::FloatExt;

/// Returns `false` once it wants no further steps.
type Observer<R> = Box<dyn FnMut(&OperationStep<R>) -> bool + Send>;

/// Handle returned by [`Engine::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

struct Session<R> {
    observers: Vec<(ObserverId, Observer<R>)>,
    next_id: u64,
}

/// Entry point for embedding applications.
///
/// Every operation runs the pipeline prefix it needs while holding the
/// engine's lock, so at most one call is in flight per engine and the step
/// events of one evaluation are never interleaved with another's.
///
/// The lock is not re-entrant: an observer that calls back into the engine
/// that is notifying it will deadlock.
pub struct Engine<R = f64> {
    pipeline: Pipeline,
    session: Mutex<Session<R>>,
}

impl<R: FloatExt> Default for Engine<R> {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl<R: FloatExt> Engine<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            pipeline: Pipeline::new(config),
            session: Mutex::new(Session {
                observers: vec![],
                next_id: 0,
            }),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        self.pipeline.config()
    }

    /// Registers `observer` for the steps of every later evaluation.
    ///
    /// An observer that panics is dropped; the evaluation it was notified
    /// from carries on.
    pub fn subscribe(
        &self,
        mut observer: impl FnMut(&OperationStep<R>) + Send + 'static,
    ) -> ObserverId {
        self.register(Box::new(move |step| {
            observer(step);
            true
        }))
    }

    /// Returns `false` if `id` was not registered.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut session = self.lock();
        let before = session.observers.len();
        session.observers.retain(|(registered, _)| *registered != id);
        session.observers.len() != before
    }

    /// Subscribes a channel. Steps queue up until the receiver drains them.
    ///
    /// The subscription ends at the first step sent after the receiver is
    /// dropped, or earlier through [`Engine::unsubscribe`].
    pub fn step_channel(&self) -> (ObserverId, mpsc::Receiver<OperationStep<R>>) {
        let (sender, receiver) = mpsc::channel();
        let id = self.register(Box::new(move |step| sender.send(*step).is_ok()));
        (id, receiver)
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.lock().observers.len()
    }

    fn register(&self, observer: Observer<R>) -> ObserverId {
        let mut session = self.lock();
        let id = ObserverId(session.next_id);
        session.next_id += 1;
        session.observers.push((id, observer));
        id
    }

    /// Strips whitespace, folds alternate notation and marks unary minus.
    pub fn normalize(&self, expression: &str) -> Result<String> {
        self.run_text(expression, Stage::Normalize)
    }

    /// Returns `true` when `expression` is well formed, or the reason it is
    /// not.
    pub fn validate(&self, expression: &str) -> Result<bool> {
        self.run_text(expression, Stage::Validate).map(|_| true)
    }

    /// Space-separated postfix form of `expression`.
    pub fn to_postfix(&self, expression: &str) -> Result<String> {
        self.run_text(expression, Stage::Convert)
    }

    pub fn evaluate(&self, expression: &str) -> Result<R> {
        self.evaluate_with(expression, |_| {})
    }

    /// Evaluates `expression`, reporting each step to the registered
    /// observers and then to `on_step`.
    pub fn evaluate_with(
        &self,
        expression: &str,
        mut on_step: impl FnMut(&OperationStep<R>),
    ) -> Result<R> {
        let mut session = self.lock();
        tracing::debug!(expression, "evaluate");
        self.pipeline.evaluate(expression, |step| {
            session.observers.retain_mut(|(id, observer)| {
                match panic::catch_unwind(AssertUnwindSafe(|| observer(step))) {
                    Ok(keep) => keep,
                    Err(_) => {
                        tracing::error!(?id, "observer panicked, removing it");
                        false
                    }
                }
            });
            on_step(step);
        })
    }

    fn run_text(&self, expression: &str, through: Stage) -> Result<String> {
        let _session = self.lock();
        tracing::debug!(expression, ?through, "run");
        self.pipeline.run_text(expression, through)
    }

    // Only a panicking per-call `on_step` can poison the lock; registered
    // observers are isolated above.
    fn lock(&self) -> MutexGuard<'_, Session<R>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::thread;

    use super::*;
    use crate::config::OperandPolicy;
    use crate::error::Error;
    use crate::token::Operator;

    #[test]
    fn observers_see_every_step() {
        let engine = Engine::<f64>::new();
        let seen = Arc::new(Mutex::new(vec![]));
        let sink = seen.clone();
        engine.subscribe(move |step| sink.lock().unwrap().push(*step));

        assert_eq!(engine.evaluate("10/(5-3)").unwrap(), 5.0);

        let seen = seen.lock().unwrap();
        let summary: Vec<_> = seen
            .iter()
            .map(|s| (s.operator, s.first, s.second, s.result))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Operator::Subtract, 5.0, Some(3.0), 2.0),
                (Operator::Divide, 10.0, Some(2.0), 5.0),
            ]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let engine = Engine::<f64>::new();
        let count = Arc::new(Mutex::new(0));
        let counter = count.clone();
        let id = engine.subscribe(move |_| *counter.lock().unwrap() += 1);

        engine.evaluate("1+2").unwrap();
        assert!(engine.unsubscribe(id));
        assert!(!engine.unsubscribe(id));
        engine.evaluate("1+2").unwrap();

        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn channel_receives_steps_in_order() {
        let engine = Engine::<f64>::new();
        let (_, steps) = engine.step_channel();
        engine.evaluate("sin(0)+2*3").unwrap();
        let operators: Vec<_> = steps.try_iter().map(|s| s.operator).collect();
        assert_eq!(
            operators,
            vec![Operator::Sin, Operator::Multiply, Operator::Add]
        );
    }

    #[test]
    fn per_call_observer_runs_after_registered_ones() {
        let engine = Engine::<f64>::new();
        let order = Arc::new(Mutex::new(vec![]));
        let registered = order.clone();
        engine.subscribe(move |_| registered.lock().unwrap().push("registered"));

        engine
            .evaluate_with("2*3", |_| order.lock().unwrap().push("call"))
            .unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["registered", "call"]);
    }

    #[test]
    fn events_from_concurrent_calls_do_not_interleave() {
        const OPERANDS: usize = 6;
        let engine = Arc::new(Engine::<f64>::new());
        let seen = Arc::new(Mutex::new(vec![]));
        let sink = seen.clone();
        engine.subscribe(move |step| sink.lock().unwrap().push(step.second));

        let handles: Vec<_> = (1..=8)
            .map(|k| {
                let engine = engine.clone();
                thread::spawn(move || {
                    let expression = vec![k.to_string(); OPERANDS].join("+");
                    for _ in 0..10 {
                        engine.evaluate(&expression).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 8 * 10 * (OPERANDS - 1));
        for run in seen.chunks(OPERANDS - 1) {
            assert!(run.iter().all(|second| *second == run[0]), "{run:?}");
        }
    }

    #[test]
    fn configuration_reaches_the_stages() {
        let engine = Engine::<f64>::with_config(EngineConfig {
            operand_policy: OperandPolicy::Strict,
            ..Default::default()
        });
        assert_eq!(engine.config().operand_policy, OperandPolicy::Strict);
        assert!(matches!(engine.evaluate("()"), Err(Error::NoResult)));

        let lenient = Engine::<f64>::new();
        assert!(matches!(lenient.evaluate("()"), Err(Error::NoResult)));
    }

    #[test]
    fn dropped_channels_are_unsubscribed() {
        let engine = Engine::<f64>::new();
        for _ in 0..100 {
            let (_, steps) = engine.step_channel();
            engine.evaluate("1+2").unwrap();
            drop(steps);
        }
        engine.evaluate("1+2").unwrap();
        assert_eq!(engine.observer_count(), 0);

        let (id, _steps) = engine.step_channel();
        engine.evaluate("1+2").unwrap();
        assert_eq!(engine.observer_count(), 1);
        assert!(engine.unsubscribe(id));
    }

    #[test]
    fn panicking_observer_is_dropped() {
        let engine = Engine::<f64>::new();
        engine.subscribe(|_| panic!("observer failure"));
        let count = Arc::new(Mutex::new(0));
        let counter = count.clone();
        engine.subscribe(move |_| *counter.lock().unwrap() += 1);

        assert_eq!(engine.evaluate("1+2").unwrap(), 3.0);
        assert_eq!(engine.observer_count(), 1);
        assert_eq!(engine.evaluate("2*3").unwrap(), 6.0);
        assert_eq!(*count.lock().unwrap(), 2);
    }

    #[test]
    fn panicking_call_observer_leaves_engine_usable() {
        let engine = Arc::new(Engine::<f64>::new());
        let shared = engine.clone();
        let outcome = thread::spawn(move || {
            shared.evaluate_with("1+2", |_| panic!("call observer failure"))
        })
        .join();
        assert!(outcome.is_err());
        assert_eq!(engine.evaluate("2*3").unwrap(), 6.0);
    }

    #[test]
    fn negated_function_applies_to_nothing() {
        // `~` outranks `sin`, so it is emitted before the argument exists.
        let lenient = Engine::<f64>::new();
        assert_eq!(lenient.to_postfix("-sin(1)").unwrap(), "~ 1 sin");
        assert_eq!(lenient.evaluate("-sin(1)").unwrap(), 1f64.sin());
        assert_eq!(lenient.evaluate("0-sin(1)").unwrap(), -(1f64.sin()));

        let strict = Engine::<f64>::with_config(EngineConfig {
            operand_policy: OperandPolicy::Strict,
            ..Default::default()
        });
        assert!(matches!(
            strict.evaluate("-sin(1)"),
            Err(Error::MissingOperand {
                operator: Operator::Negate
            })
        ));
    }

    #[test]
    fn validate_returns_true() {
        let engine = Engine::<f64>::new();
        assert!(engine.validate("-5-6*{8+  6*3} /  [5^5,8)").unwrap());
        assert!(matches!(
            engine.validate("1+(2"),
            Err(Error::UnmatchedParenthesis { .. })
        ));
    }
}
