use tracing::debug;

use crate::engine::{CollectError, CollectionEngine, OutputMap};
use crate::schema::{ComputationError, DefinitionError, GroupSchema, Value};

/// A group collected several times, keeping one field of every repetition.
#[derive(Debug, Clone)]
pub struct RepeatableMarker {
    group: GroupSchema,
    field: String,
    result: String,
    description: String,
    min_count: usize,
}

impl RepeatableMarker {
    /// Wrap `group`, extracting `field` into a list stored under `result`.
    pub fn new(
        group: GroupSchema,
        field: impl Into<String>,
        result: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, DefinitionError> {
        let marker = Self {
            group,
            field: field.into(),
            result: result.into(),
            description: description.into(),
            min_count: 1,
        };
        marker.validate_definition()?;
        Ok(marker)
    }

    pub fn with_min_count(mut self, min_count: usize) -> Result<Self, DefinitionError> {
        self.min_count = min_count;
        self.validate_definition()?;
        Ok(self)
    }

    pub fn group(&self) -> &GroupSchema {
        &self.group
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn min_count(&self) -> usize {
        self.min_count
    }

    pub fn validate_definition(&self) -> Result<(), DefinitionError> {
        let invalid = |message: String| DefinitionError::InvalidRepeatable {
            result: self.result.clone(),
            message,
        };

        if self.result.trim().is_empty() {
            return Err(invalid("result key must not be empty".into()));
        }
        if self.description.trim().is_empty() {
            return Err(invalid("description must not be empty".into()));
        }
        if self.min_count < 1 {
            return Err(invalid("min_count must be at least 1".into()));
        }
        if !self.group.has_field(&self.field) {
            return Err(invalid(format!(
                "group '{}' has no field '{}'",
                self.group.name(),
                self.field
            )));
        }
        Ok(())
    }

    /// Run the group `count` times and return `{result: [v1, .., vn]}`.
    pub fn collect(
        &self,
        engine: &mut CollectionEngine<'_>,
        count: usize,
    ) -> Result<OutputMap, CollectError> {
        if count < self.min_count {
            return Err(CollectError::RepeatCount {
                result: self.result.clone(),
                count,
                min: self.min_count,
            });
        }

        let mut values = Vec::with_capacity(count);
        for round in 1..=count {
            engine.notify(&format!("{} #{round}", self.description));
            let mut record = engine.collect_group(&self.group)?;
            let value = record.remove(&self.field).ok_or_else(|| {
                ComputationError::MissingDependency {
                    field: self.result.clone(),
                    missing: self.field.clone(),
                }
            })?;
            values.push(value);
        }
        debug!(result = %self.result, count, "repeatable collected");

        let mut out = OutputMap::new();
        out.insert(self.result.clone(), Value::List(values));
        Ok(out)
    }
}
