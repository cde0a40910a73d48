//! Ordered transformation pipelines
//!
//! A [`Pipeline`] is an explicit ordered list of named steps. Running it
//! folds over the steps left to right: each step receives the current text
//! and the full map of prior outcomes, and returns new text plus its own
//! boolean outcome, recorded under the step's name. No step carries hidden
//! state; the outcome map is the only thing threaded between them.

use indexmap::IndexMap;

use crate::error::Result;

/// Accumulated step outcomes, keyed by step name in registration order.
pub type Outcomes = IndexMap<String, bool>;

/// What one step produced: the text handed to the next step, and whether
/// the step applied (found its pattern, inserted its content, ...).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    pub text: String,
    pub applied: bool,
}

impl StepOutcome {
    pub fn new(text: impl Into<String>, applied: bool) -> Self {
        Self {
            text: text.into(),
            applied,
        }
    }
}

/// Final result of a pipeline run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineResult {
    pub text: String,
    pub outcomes: Outcomes,
}

type StepFn = Box<dyn Fn(&str, &Outcomes) -> Result<StepOutcome>>;

/// An ordered list of named steps over `(text, outcomes)`.
///
/// ## Example
///
/// ```
/// use idempatch::text::{try_insert, try_replace, Pipeline, StepOutcome};
///
/// let pipeline = Pipeline::new()
///     .step("update-marker", |text, _| {
///         let (applied, text) = try_replace(text, "// MARKER", "// MARKER")?;
///         Ok(StepOutcome { text, applied })
///     })
///     .step("insert-marker", |text, outcomes| {
///         if outcomes["update-marker"] {
///             return Ok(StepOutcome::new(text, false));
///         }
///         let (applied, text) = try_insert(text, r"\{ ", "// MARKER ", false)?;
///         Ok(StepOutcome { text, applied })
///     });
///
/// let first = pipeline.run("class Foo { }").unwrap();
/// let second = pipeline.run(&first.text).unwrap();
/// assert_eq!(first.text, second.text);
/// assert_eq!(first.text.matches("// MARKER").count(), 1);
/// ```
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<(String, StepFn)>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a named step, returning the pipeline for chaining. A step
    /// registered under an already-used name overwrites that name's
    /// outcome entry when it runs.
    pub fn step(
        mut self,
        name: impl Into<String>,
        step: impl Fn(&str, &Outcomes) -> Result<StepOutcome> + 'static,
    ) -> Self {
        self.steps.push((name.into(), Box::new(step)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Fold the input text through every step in order.
    pub fn run(&self, text: &str) -> Result<PipelineResult> {
        let mut text = text.to_string();
        let mut outcomes = Outcomes::new();
        for (name, step) in &self.steps {
            let outcome = step(&text, &outcomes)?;
            text = outcome.text;
            outcomes.insert(name.clone(), outcome.applied);
        }
        Ok(PipelineResult { text, outcomes })
    }
}
