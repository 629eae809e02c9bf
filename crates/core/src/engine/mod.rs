//! The interactive collection loop.
//!
//! The engine walks a list of [`CollectionUnit`]s in order, prompting for
//! every field of every group until it validates, and folds the results into
//! one flat [`OutputMap`]. Nothing is returned unless every unit completes.

mod output;
mod prompter;

pub use output::OutputMap;
pub use prompter::{LinePrompter, PromptError, Prompter};

use std::collections::VecDeque;

use thiserror::Error;
use tracing::{debug, info};

use crate::markers::{CollectionUnit, RepeatableMarker};
use crate::schema::{ComputationError, FieldSchema, GroupSchema, Record, Value};
use crate::words::{ConversionError, Language};

/// Default repeat count above which the operator must confirm.
pub const DEFAULT_CONFIRM_ABOVE: usize = 100;

/// Failures that abort a collection run.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Computation(#[from] ComputationError),

    #[error("cannot spell out '{field}': {source}")]
    Conversion {
        field: String,
        #[source]
        source: ConversionError,
    },

    #[error("'{result}' needs at least {min} repetitions, got {count}")]
    RepeatCount { result: String, count: usize, min: usize },
}

/// Per-run engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Language for spelled-out numbers.
    pub language: Language,
    /// Repeat counts above this need an explicit confirmation.
    pub confirm_above: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { language: Language::default(), confirm_above: DEFAULT_CONFIRM_ABOVE }
    }
}

/// Extra acceptance check run after a field validates, e.g. words conversion.
///
/// Returning `Err(reason)` shows the reason and asks for the same field again.
pub type FieldCheck<'a> = dyn Fn(&FieldSchema, &Value) -> Result<(), String> + 'a;

/// Drives prompting for one run over a [`Prompter`].
pub struct CollectionEngine<'p> {
    prompter: &'p mut dyn Prompter,
    options: EngineOptions,
}

impl<'p> CollectionEngine<'p> {
    pub fn new(prompter: &'p mut dyn Prompter, options: EngineOptions) -> Self {
        Self { prompter, options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Collect every unit in order and return the merged output.
    pub fn run(&mut self, units: &[CollectionUnit]) -> Result<OutputMap, CollectError> {
        let mut output = OutputMap::new();

        for (index, unit) in units.iter().enumerate() {
            debug!(unit = index, kind = unit.kind(), group = unit.group().name(), "collecting unit");
            let part = match unit {
                CollectionUnit::Group(group) => {
                    let record = self.collect_group(group)?;
                    OutputMap::from(group.visible(&record))
                }
                CollectionUnit::Repeatable(marker) => {
                    let count = self.prompt_repeat_count(marker)?;
                    marker.collect(self, count)?
                }
                CollectionUnit::Derivable(marker) => marker.collect(self)?,
            };
            output.merge(part);
        }

        info!(units = units.len(), keys = output.len(), "collection finished");
        Ok(output)
    }

    /// One full cycle over `group`: every field, then the computed fields.
    ///
    /// The returned record holds hidden and computed values too.
    pub fn collect_group(&mut self, group: &GroupSchema) -> Result<Record, CollectError> {
        self.collect_group_checked(group, &|_, _| Ok(()))
    }

    /// Like [`collect_group`](Self::collect_group), with `check` applied to
    /// every accepted value.
    pub fn collect_group_checked(
        &mut self,
        group: &GroupSchema,
        check: &FieldCheck<'_>,
    ) -> Result<Record, CollectError> {
        let mut pending: VecDeque<&FieldSchema> = group.fields().iter().collect();
        let mut record = Record::new();

        while let Some(field) = pending.pop_front() {
            match self.prompt_field(field, check)? {
                Ok(value) => {
                    record.insert(field.name().to_string(), value);
                }
                Err(reason) => {
                    debug!(group = group.name(), field = field.name(), %reason, "value rejected");
                    self.prompter.notify(&format!("{}: {reason}", field.name()));
                    pending.push_front(field);
                }
            }
        }

        let computed = group.computed(&record)?;
        record.extend(computed);
        Ok(record)
    }

    /// Ask once for `field`. The outer error aborts the run, the inner one is a
    /// rejection reason.
    fn prompt_field(
        &mut self,
        field: &FieldSchema,
        check: &FieldCheck<'_>,
    ) -> Result<Result<Value, String>, PromptError> {
        let raw = self.prompter.read_line(&field.prompt_text())?;

        let accepted = match field.default() {
            Some(default) if raw.is_empty() => Ok(default.clone()),
            _ => field.validate(&raw).map_err(|e| e.to_string()),
        };
        Ok(accepted.and_then(|value| check(field, &value).map(|()| value)))
    }

    /// Ask how many times a repeatable group is collected.
    ///
    /// Re-asks on non-numeric input and on counts below the minimum; counts
    /// above the confirmation threshold must be confirmed.
    pub fn prompt_repeat_count(&mut self, marker: &RepeatableMarker) -> Result<usize, CollectError> {
        let prompt = format!("How many {} (at least {})? ", marker.description(), marker.min_count());

        loop {
            let raw = self.prompter.read_line(&prompt)?;
            let Ok(count) = raw.trim().parse::<usize>() else {
                self.prompter.notify("Enter a whole number.");
                continue;
            };
            if count < marker.min_count() {
                self.prompter.notify(&format!("The minimum is {}.", marker.min_count()));
                continue;
            }
            if count > self.options.confirm_above
                && !self.prompter.confirm(&format!("Collect {count} x {}?", marker.description()))?
            {
                continue;
            }
            debug!(result = marker.result(), count, "repeat count chosen");
            return Ok(count);
        }
    }

    pub(crate) fn notify(&mut self, message: &str) {
        self.prompter.notify(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    fn run(units: &[CollectionUnit], input: &str) -> (Result<OutputMap, CollectError>, String) {
        let mut prompter = LinePrompter::new(input.as_bytes(), Vec::new());
        let result = CollectionEngine::new(&mut prompter, EngineOptions::default()).run(units);
        let (_, transcript) = prompter.into_inner();
        (result, String::from_utf8(transcript).unwrap())
    }

    fn person() -> GroupSchema {
        GroupSchema::new(
            "person",
            vec![
                FieldSchema::builder("name", FieldType::String).build().unwrap(),
                FieldSchema::builder("age", FieldType::Integer).min(0.0).build().unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn invalid_value_reasks_same_field_only() {
        let (result, transcript) = run(&[CollectionUnit::Group(person())], "Ivan\n-1\n30\n");
        let out = result.unwrap();
        assert_eq!(out.get("name"), Some(&Value::from("Ivan")));
        assert_eq!(out.get("age"), Some(&Value::Integer(30)));
        assert_eq!(transcript.matches("*name").count(), 1);
        assert_eq!(transcript.matches("*age").count(), 2);
        assert!(transcript.contains("age: -1 is out of range"));
    }

    #[test]
    fn default_is_used_for_empty_input() {
        let group = GroupSchema::new(
            "division",
            vec![
                FieldSchema::builder("code", FieldType::String)
                    .pattern(r"^\d{3}-\d{3}$")
                    .default("500-127")
                    .build()
                    .unwrap(),
            ],
        )
        .unwrap();
        let (result, _) = run(&[CollectionUnit::Group(group)], "\n");
        assert_eq!(result.unwrap().get("code"), Some(&Value::from("500-127")));
    }

    #[test]
    fn empty_required_field_is_reasked() {
        let (result, transcript) = run(&[CollectionUnit::Group(person())], "\nIvan\n1\n");
        assert!(result.is_ok());
        assert!(transcript.contains("name: a value is required"));
    }

    #[test]
    fn end_of_input_aborts_without_output() {
        let (result, _) = run(&[CollectionUnit::Group(person())], "Ivan\n");
        assert!(matches!(result, Err(CollectError::Prompt(PromptError::Cancelled))));
    }

    #[test]
    fn hidden_fields_stay_out_of_output() {
        let group = GroupSchema::new(
            "g",
            vec![
                FieldSchema::builder("secret", FieldType::String).hidden(true).build().unwrap(),
                FieldSchema::builder("shown", FieldType::String).build().unwrap(),
            ],
        )
        .unwrap();
        let (result, _) = run(&[CollectionUnit::Group(group)], "s\nv\n");
        let out = result.unwrap();
        assert!(!out.contains_key("secret"));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn repeat_count_rejects_garbage_and_small_counts() {
        let item = GroupSchema::new(
            "item",
            vec![FieldSchema::builder("item", FieldType::String).build().unwrap()],
        )
        .unwrap();
        let marker = RepeatableMarker::new(item, "item", "items", "items")
            .unwrap()
            .with_min_count(2)
            .unwrap();
        let (result, transcript) =
            run(&[CollectionUnit::Repeatable(marker)], "two\n1\n2\na\nb\n");
        let out = result.unwrap();
        assert_eq!(
            out.get("items"),
            Some(&Value::List(vec![Value::from("a"), Value::from("b")]))
        );
        assert!(transcript.contains("Enter a whole number."));
        assert!(transcript.contains("The minimum is 2."));
    }

    #[test]
    fn large_repeat_count_needs_confirmation() {
        let item = GroupSchema::new(
            "item",
            vec![FieldSchema::builder("item", FieldType::String).build().unwrap()],
        )
        .unwrap();
        let marker = RepeatableMarker::new(item, "item", "items", "items").unwrap();
        let mut prompter = LinePrompter::new("3\nno\n1\nx\n".as_bytes(), Vec::new());
        let options = EngineOptions { confirm_above: 2, ..EngineOptions::default() };
        let out = CollectionEngine::new(&mut prompter, options)
            .run(&[CollectionUnit::Repeatable(marker)])
            .unwrap();
        assert_eq!(out.get("items"), Some(&Value::List(vec![Value::from("x")])));
    }
}
