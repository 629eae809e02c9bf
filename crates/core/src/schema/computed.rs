//! Computed fields: values derived from already-collected fields of a group.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::errors::ComputationError;
use super::value::{Record, Value};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").expect("valid regex"));

/// How a computed field derives its value.
#[derive(Debug, Clone, PartialEq)]
pub enum ComputedRule {
    /// Look the source value up in a table.
    Map { source: String, values: BTreeMap<String, String> },
    /// Substitute `{{field}}` placeholders in a sentence.
    Format { template: String },
    /// Add numeric fields, rounding to `precision` decimals. `Null` if any
    /// operand is `Null`.
    Sum { fields: Vec<String>, precision: u32 },
}

impl ComputedRule {
    /// Names of the fields this rule reads.
    pub fn references(&self) -> Vec<&str> {
        match self {
            Self::Map { source, .. } => vec![source.as_str()],
            Self::Format { template } => PLACEHOLDER
                .captures_iter(template)
                .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
                .collect(),
            Self::Sum { fields, .. } => fields.iter().map(String::as_str).collect(),
        }
    }

    /// Evaluate the rule for computed field `field` over `snapshot`.
    pub fn evaluate(&self, field: &str, snapshot: &Record) -> Result<Value, ComputationError> {
        let lookup = |name: &str| {
            snapshot.get(name).ok_or_else(|| ComputationError::MissingDependency {
                field: field.to_string(),
                missing: name.to_string(),
            })
        };

        match self {
            Self::Map { source, values } => {
                let value = lookup(source)?;
                if value.is_null() {
                    return Ok(Value::Null);
                }
                let key = value.to_string();
                values.get(&key).map(|mapped| Value::Text(mapped.clone())).ok_or_else(|| {
                    ComputationError::Unmapped { field: field.to_string(), value: key }
                })
            }
            Self::Format { template } => {
                let mut missing = None;
                let rendered = PLACEHOLDER.replace_all(template, |caps: &regex::Captures<'_>| {
                    match lookup(&caps[1]) {
                        Ok(value) => value.to_string(),
                        Err(e) => {
                            missing.get_or_insert(e);
                            String::new()
                        }
                    }
                });
                match missing {
                    Some(e) => Err(e),
                    None => Ok(Value::Text(rendered.into_owned())),
                }
            }
            Self::Sum { fields, precision } => {
                let mut operands = Vec::with_capacity(fields.len());
                for name in fields {
                    operands.push(lookup(name)?);
                }
                sum(field, &operands, *precision)
            }
        }
    }
}

fn sum(field: &str, operands: &[&Value], precision: u32) -> Result<Value, ComputationError> {
    if operands.iter().any(|v| v.is_null()) {
        return Ok(Value::Null);
    }

    let mut all_integers = true;
    let mut integer_total: Option<i64> = Some(0);
    let mut float_total = 0.0;
    for operand in operands {
        match operand {
            Value::Integer(n) => {
                integer_total = integer_total.and_then(|t| t.checked_add(*n));
                float_total += *n as f64;
            }
            Value::Float(f) => {
                all_integers = false;
                float_total += f;
            }
            other => {
                return Err(ComputationError::NotNumeric {
                    field: field.to_string(),
                    operand: other.to_string(),
                });
            }
        }
    }

    if all_integers {
        if let Some(total) = integer_total {
            return Ok(Value::Integer(total));
        }
    }
    let scale = 10_f64.powi(precision.min(15) as i32);
    Ok(Value::Float((float_total * scale).round() / scale))
}

/// A field computed after every primary field of its group is collected.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedField {
    name: String,
    rule: ComputedRule,
    hidden: bool,
}

impl ComputedField {
    pub fn new(name: impl Into<String>, rule: ComputedRule) -> Self {
        Self { name: name.into(), rule, hidden: false }
    }

    /// Keep the value available to later rules and markers but out of the output.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rule(&self) -> &ComputedRule {
        &self.rule
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}
