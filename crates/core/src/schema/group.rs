//! Group schemas: ordered field bundles collected as one record.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::warn;

use super::computed::{ComputedField, ComputedRule};
use super::errors::{ComputationError, DefinitionError};
use super::field::{FieldSchema, FieldType};
use super::value::Record;

/// An ordered set of fields collected together, plus computed fields
/// evaluated once all of them are valid.
#[derive(Debug, Clone)]
pub struct GroupSchema {
    name: String,
    fields: Vec<FieldSchema>,
    computed: Vec<ComputedField>,
}

impl GroupSchema {
    /// Create a group from its own fields. Field names must be unique.
    pub fn new(name: impl Into<String>, fields: Vec<FieldSchema>) -> Result<Self, DefinitionError> {
        Self::compose(name, &[], fields, Vec::new())
    }

    /// Merge `parents` (in order) and then the group's own fields into one group.
    ///
    /// Names colliding across parents resolve to the first occurrence; a
    /// duplicate among `own_fields` is an error.
    pub fn compose(
        name: impl Into<String>,
        parents: &[GroupSchema],
        own_fields: Vec<FieldSchema>,
        own_computed: Vec<ComputedField>,
    ) -> Result<Self, DefinitionError> {
        let name = name.into();

        let mut own_names = HashSet::new();
        for field in &own_fields {
            if !own_names.insert(field.name()) {
                return Err(DefinitionError::DuplicateField {
                    group: name.clone(),
                    field: field.name().to_string(),
                });
            }
        }
        for computed in &own_computed {
            if !own_names.insert(computed.name()) {
                return Err(DefinitionError::DuplicateField {
                    group: name.clone(),
                    field: computed.name().to_string(),
                });
            }
        }

        let mut fields: Vec<FieldSchema> = Vec::new();
        let mut computed: Vec<ComputedField> = Vec::new();
        let inherited = parents.iter().flat_map(|p| p.fields.iter().cloned());
        for field in inherited.chain(own_fields) {
            if fields.iter().any(|f| f.name() == field.name()) {
                warn!(group = %name, field = field.name(), "field declared by several groups; keeping the first");
                continue;
            }
            fields.push(field);
        }
        let inherited = parents.iter().flat_map(|p| p.computed.iter().cloned());
        for field in inherited.chain(own_computed) {
            if computed.iter().any(|c| c.name() == field.name()) {
                warn!(group = %name, field = field.name(), "computed field declared by several groups; keeping the first");
                continue;
            }
            computed.push(field);
        }

        let group = Self { name, fields, computed };
        group.check_computed()?;
        Ok(group)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Prompted fields, in prompt order.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn computed_fields(&self) -> &[ComputedField] {
        &self.computed
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Whether `name` is a prompted or computed field of this group.
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some() || self.computed.iter().any(|c| c.name() == name)
    }

    /// Evaluate computed fields, in declaration order, over `collected`.
    ///
    /// Returns only the computed values; later rules see earlier results.
    pub fn computed(&self, collected: &Record) -> Result<Record, ComputationError> {
        let mut snapshot = collected.clone();
        let mut out = Record::new();
        for computed in &self.computed {
            let value = computed.rule().evaluate(computed.name(), &snapshot)?;
            snapshot.insert(computed.name().to_string(), value.clone());
            out.insert(computed.name().to_string(), value);
        }
        Ok(out)
    }

    /// The part of a collected record that goes into the output map.
    pub fn visible(&self, record: &Record) -> Record {
        record
            .iter()
            .filter(|(name, _)| !self.is_hidden(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    fn is_hidden(&self, name: &str) -> bool {
        self.field(name).is_some_and(FieldSchema::is_hidden)
            || self.computed.iter().any(|c| c.name() == name && c.is_hidden())
    }

    /// Computed rules may only read prompted fields and computed fields
    /// declared before them.
    fn check_computed(&self) -> Result<(), DefinitionError> {
        let mut known: HashSet<&str> = self.fields.iter().map(FieldSchema::name).collect();

        for computed in &self.computed {
            if known.contains(computed.name()) {
                return Err(DefinitionError::DuplicateField {
                    group: self.name.clone(),
                    field: computed.name().to_string(),
                });
            }
            for reference in computed.rule().references() {
                if !known.contains(reference) {
                    return Err(DefinitionError::UnknownReference {
                        group: self.name.clone(),
                        field: computed.name().to_string(),
                        reference: reference.to_string(),
                    });
                }
            }
            match computed.rule() {
                ComputedRule::Map { source, values } => self.check_map(computed, source, values)?,
                ComputedRule::Sum { fields, .. } => self.check_sum(computed, fields)?,
                ComputedRule::Format { .. } => {}
            }
            known.insert(computed.name());
        }
        Ok(())
    }

    /// A map reads an enum field it covers completely, or an earlier map
    /// whose every result it has a key for.
    fn check_map(
        &self,
        computed: &ComputedField,
        source: &str,
        values: &BTreeMap<String, String>,
    ) -> Result<(), DefinitionError> {
        let missing: Vec<String> = if let Some(field) = self.field(source) {
            if field.field_type() != FieldType::Enum {
                return Err(self.invalid_computed(
                    computed,
                    format!("maps '{source}', which is a {} field, not an enum", field.field_type()),
                ));
            }
            field.values().iter().filter(|v| !values.contains_key(*v)).cloned().collect()
        } else {
            match self.computed_rule(source) {
                Some(ComputedRule::Map { values: results, .. }) => results
                    .values()
                    .filter(|v| !values.contains_key(*v))
                    .cloned()
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect(),
                _ => {
                    return Err(self.invalid_computed(
                        computed,
                        format!("maps '{source}', which is neither an enum nor a map"),
                    ));
                }
            }
        };
        if !missing.is_empty() {
            return Err(DefinitionError::UnmappedEnumValues {
                group: self.name.clone(),
                field: computed.name().to_string(),
                missing,
            });
        }
        Ok(())
    }

    /// Sum operands are numeric fields or earlier sums.
    fn check_sum(
        &self,
        computed: &ComputedField,
        operands: &[String],
    ) -> Result<(), DefinitionError> {
        for operand in operands {
            let numeric = match self.field(operand) {
                Some(field) => field.field_type().is_numeric(),
                None => matches!(self.computed_rule(operand), Some(ComputedRule::Sum { .. })),
            };
            if !numeric {
                return Err(self.invalid_computed(
                    computed,
                    format!("cannot add '{operand}', which is not numeric"),
                ));
            }
        }
        Ok(())
    }

    fn computed_rule(&self, name: &str) -> Option<&ComputedRule> {
        self.computed.iter().find(|c| c.name() == name).map(ComputedField::rule)
    }

    fn invalid_computed(&self, computed: &ComputedField, message: String) -> DefinitionError {
        DefinitionError::InvalidComputed {
            group: self.name.clone(),
            field: computed.name().to_string(),
            message,
        }
    }
}
